//! # vigieau-geo — Zone Geometry and Spatial Lookup
//!
//! Loads the prepared snapshot pair (zone attributes + zone polygons) into an
//! immutable [`ZoneStore`], bulk-loads a static R-tree over the polygons'
//! bounding boxes, and answers point and commune lookups.
//!
//! ## Architecture
//!
//! ```text
//! zones.json ──┐
//!              ├─> ZoneStore::build ──> SpatialIndex (rstar, bulk-loaded)
//! zones.geojson┘        │                 slot i ↔ geometry i ↔ zone id
//!                       └─> commune → zones mapping
//!
//! locate_by_point:   index.query_point → exact polygon test → zones
//! locate_by_commune: mapping lookup → zones
//! ```
//!
//! ## Containment Policy
//!
//! Point-in-polygon is **inclusive**: a point on a ring edge or vertex is
//! inside. A point strictly inside a hole is outside.
//!
//! ## Concurrency
//!
//! A built store is never mutated. All lookups take `&self` and the store is
//! `Send + Sync`, so one instance can serve any number of threads.

pub mod error;
pub mod geometry;
pub mod index;
pub mod locator;
pub mod snapshot;
pub mod store;

pub use error::{GeometryError, SnapshotError};
pub use geometry::{BoundingBox, ZoneGeometry};
pub use index::{Slot, SpatialIndex};
pub use locator::{zone_ids, ZoneLocator};
pub use snapshot::GeometryFeature;
pub use store::ZoneStore;
