//! Feature store errors.
//!
//! Every variant names what failed and where, so a broken artifact can be
//! traced without re-running the build.

use std::path::PathBuf;

use thiserror::Error;
use vigieau_core::ZoneId;
use vigieau_geo::GeometryError;

/// Errors raised while building, opening or querying a [`FeatureStore`](crate::FeatureStore).
#[derive(Debug, Error)]
pub enum FeatureStoreError {
    /// RocksDB operation failed.
    #[error("RocksDB {operation} failed at {path}: {source}")]
    RocksDb {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: rocksdb::Error,
    },

    /// A build target already holds a store.
    #[error("feature store already exists at {path}")]
    AlreadyExists { path: PathBuf },

    /// Index buffer or record file missing.
    #[error("required file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The index buffer does not start with the expected magic bytes.
    #[error("{path} is not a feature index")]
    IndexFormat { path: PathBuf },

    /// The index buffer was written by an incompatible build.
    #[error("{path} has index format version {found}, expected {expected}")]
    IndexVersion {
        path: PathBuf,
        found: u32,
        expected: u32,
    },

    /// Index buffer payload could not be decoded.
    #[error("failed to decode index buffer {path}: {message}")]
    IndexDecode { path: PathBuf, message: String },

    /// The index and the record database disagree on the slot count.
    #[error("index slot {slot} has no record")]
    MissingRecord { slot: u32 },

    /// A stored record could not be decoded.
    #[error("failed to decode record for slot {slot}: {message}")]
    RecordDecode { slot: u32, message: String },

    /// A feature's polygon is unusable.
    #[error("invalid geometry for zone {zone}: {source}")]
    InvalidGeometry {
        zone: ZoneId,
        #[source]
        source: GeometryError,
    },

    /// Zone attributes could not be serialized.
    #[error("failed to encode attributes of zone {zone}: {source}")]
    AttributeEncode {
        zone: ZoneId,
        #[source]
        source: serde_json::Error,
    },

    /// Slots are stored as `u32` keys.
    #[error("{count} features exceed the u32 slot key space")]
    TooManyFeatures { count: usize },
}

pub type FeatureStoreResult<T> = Result<T, FeatureStoreError>;
