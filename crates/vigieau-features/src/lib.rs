//! # vigieau-features — Binary Feature Store
//!
//! A standalone build-then-serve alternative to the in-memory snapshot:
//! zone records are encoded once into a local key-value database, keyed by
//! their spatial index slot, and the index is persisted next to them. A
//! query fetches only the records whose bounding box matches the point.
//!
//! Query results are attributes of every containing feature, unresolved:
//! disambiguation stays in `vigieau-resolve`.

pub mod error;
pub mod index_file;
pub mod record;
pub mod store;

pub use error::{FeatureStoreError, FeatureStoreResult};
pub use record::{Feature, FeatureAttributes, COORDINATE_SCALE, MAX_COORDINATE_ERROR};
pub use store::{BuildReport, FeatureStore};
