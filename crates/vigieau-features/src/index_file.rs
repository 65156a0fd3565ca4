//! # Index Buffer
//!
//! Persisted spatial index, `index.bin`. Layout (little-endian):
//!
//! ```text
//! [0..4]  magic bytes "VGIX"
//! [4..8]  format version (u32)
//! [8..]   bitcode payload: bounding boxes in slot order
//! ```
//!
//! The R-tree itself is not serialized. Opening re-bulk-loads it from the
//! boxes, which yields the same slot numbering the records were keyed with.

use std::path::Path;

use bitcode::{Decode, Encode};
use vigieau_geo::{BoundingBox, SpatialIndex};

use crate::error::{FeatureStoreError, FeatureStoreResult};

/// Magic bytes identifying a feature index buffer.
pub const MAGIC: [u8; 4] = *b"VGIX";

/// Bump when the payload layout changes.
pub const FORMAT_VERSION: u32 = 1;

const HEADER_SIZE: usize = 8;

#[derive(Debug, Encode, Decode)]
struct IndexPayload {
    /// `[min_lon, min_lat, max_lon, max_lat]` per slot.
    bboxes: Vec<[f64; 4]>,
}

/// Serialize the index's slot boxes behind the header.
pub fn to_bytes(index: &SpatialIndex) -> Vec<u8> {
    let payload = IndexPayload {
        bboxes: index
            .bboxes()
            .iter()
            .map(|b| [b.min_lon, b.min_lat, b.max_lon, b.max_lat])
            .collect(),
    };
    let encoded = bitcode::encode(&payload);

    let mut out = Vec::with_capacity(HEADER_SIZE + encoded.len());
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    out.extend_from_slice(&encoded);
    out
}

/// Parse a buffer produced by [`to_bytes`] and bulk-load the index.
///
/// `path` is only used in error messages.
pub fn from_bytes(path: &Path, bytes: &[u8]) -> FeatureStoreResult<SpatialIndex> {
    if bytes.len() < HEADER_SIZE || bytes[..4] != MAGIC {
        return Err(FeatureStoreError::IndexFormat {
            path: path.to_path_buf(),
        });
    }
    let found = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    if found != FORMAT_VERSION {
        return Err(FeatureStoreError::IndexVersion {
            path: path.to_path_buf(),
            found,
            expected: FORMAT_VERSION,
        });
    }

    let payload: IndexPayload =
        bitcode::decode(&bytes[HEADER_SIZE..]).map_err(|e| FeatureStoreError::IndexDecode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    let bboxes = payload
        .bboxes
        .into_iter()
        .map(|[min_lon, min_lat, max_lon, max_lat]| {
            BoundingBox::new(min_lon, min_lat, max_lon, max_lat)
        })
        .collect();
    Ok(SpatialIndex::build(bboxes))
}

pub fn write(path: &Path, index: &SpatialIndex) -> FeatureStoreResult<usize> {
    let bytes = to_bytes(index);
    std::fs::write(path, &bytes).map_err(|source| FeatureStoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(bytes.len())
}

pub fn read(path: &Path) -> FeatureStoreResult<SpatialIndex> {
    if !path.exists() {
        return Err(FeatureStoreError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let bytes = std::fs::read(path).map_err(|source| FeatureStoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_bytes(path, &bytes)
}
