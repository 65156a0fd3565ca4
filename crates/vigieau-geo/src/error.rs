//! Snapshot loading and geometry errors.
//!
//! Loading errors carry the file path so a bad data refresh can be traced
//! back to the artifact that caused it.

use std::path::PathBuf;

use thiserror::Error;
use vigieau_core::ZoneId;

/// A polygon that cannot be used for containment tests.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("geometry has no polygon")]
    Empty,

    #[error("ring {ring} of polygon {polygon} has {positions} positions (minimum 3)")]
    DegenerateRing {
        polygon: usize,
        ring: usize,
        positions: usize,
    },

    #[error("position has {0} ordinates (minimum 2)")]
    ShortPosition(usize),

    #[error("non-finite ordinate in position")]
    NonFinite,
}

/// Errors raised while loading a snapshot into a [`ZoneStore`](crate::ZoneStore).
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// A required file was not found.
    #[error("required file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// JSON parsing failed.
    #[error("failed to parse JSON at {path}: {source}")]
    JsonParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A feature's polygon is unusable.
    #[error("invalid geometry for zone {zone}: {source}")]
    InvalidGeometry {
        zone: ZoneId,
        source: GeometryError,
    },

    /// A geometry names a zone absent from the attribute snapshot.
    #[error("geometry references zone {zone} which has no attribute record")]
    MissingAttributes { zone: ZoneId },

    /// Two geometries name the same zone.
    #[error("zone {zone} has more than one geometry")]
    DuplicateGeometry { zone: ZoneId },

    /// Two attribute records share an identifier.
    #[error("zone {zone} appears more than once in the attribute snapshot")]
    DuplicateZone { zone: ZoneId },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
