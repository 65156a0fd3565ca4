//! # Feature Store
//!
//! On-disk layout of a built store:
//!
//! ```text
//! <dir>/
//!   index.bin   versioned flat buffer of slot bounding boxes
//!   records/    RocksDB: big-endian u32 slot → encoded record
//! ```
//!
//! Building is a one-shot batch job; serving opens the database read-only.
//! A store is never updated in place: rebuild into a fresh directory.

use std::path::{Path, PathBuf};

use rocksdb::{DBCompressionType, Options, WriteBatch, DB};
use vigieau_core::Coordinates;
use vigieau_geo::{Slot, SpatialIndex};

use crate::error::{FeatureStoreError, FeatureStoreResult};
use crate::index_file;
use crate::record::{self, Feature, FeatureAttributes};

pub const INDEX_FILE: &str = "index.bin";
pub const RECORDS_DIR: &str = "records";

/// Records per RocksDB write batch during a build.
const BATCH_SIZE: usize = 1024;

/// Outcome of [`FeatureStore::build`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildReport {
    pub features: usize,
    pub index_bytes: usize,
}

/// Read-only handle over a built store.
pub struct FeatureStore {
    db: DB,
    index: SpatialIndex,
    dir: PathBuf,
}

impl std::fmt::Debug for FeatureStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureStore")
            .field("dir", &self.dir)
            .field("slots", &self.index.len())
            .finish()
    }
}

fn slot_key(slot: Slot) -> FeatureStoreResult<[u8; 4]> {
    u32::try_from(slot)
        .map(u32::to_be_bytes)
        .map_err(|_| FeatureStoreError::TooManyFeatures { count: slot + 1 })
}

fn rocks(operation: &'static str, path: &Path) -> impl FnOnce(rocksdb::Error) -> FeatureStoreError {
    let path = path.to_path_buf();
    move |source| FeatureStoreError::RocksDb {
        operation,
        path,
        source,
    }
}

fn write_store(
    dir: &Path,
    records_path: &Path,
    features: impl IntoIterator<Item = Feature>,
) -> FeatureStoreResult<BuildReport> {
    let mut options = Options::default();
    options.create_if_missing(true);
    options.set_compression_type(DBCompressionType::Lz4);
    let db = DB::open(&options, records_path).map_err(rocks("open", records_path))?;

    let mut bboxes = Vec::new();
    let mut batch = WriteBatch::default();
    for (slot, feature) in features.into_iter().enumerate() {
        let key = slot_key(slot)?;
        batch.put(key, record::encode(&feature)?);
        bboxes.push(feature.geometry.bbox());
        if batch.len() >= BATCH_SIZE {
            db.write(std::mem::take(&mut batch))
                .map_err(rocks("write", records_path))?;
        }
    }
    db.write(batch).map_err(rocks("write", records_path))?;
    db.flush().map_err(rocks("flush", records_path))?;
    drop(db);

    let features = bboxes.len();
    let index = SpatialIndex::build(bboxes);
    let index_bytes = index_file::write(&dir.join(INDEX_FILE), &index)?;
    Ok(BuildReport {
        features,
        index_bytes,
    })
}

/// Delete the record database and any index file left by a failed build.
fn remove_partial_build(dir: &Path, records_path: &Path) {
    if records_path.exists() {
        if let Err(e) = std::fs::remove_dir_all(records_path) {
            tracing::warn!(path = %records_path.display(), error = %e, "could not remove partial records");
        }
    }
    let index_path = dir.join(INDEX_FILE);
    if index_path.is_file() {
        if let Err(e) = std::fs::remove_file(&index_path) {
            tracing::warn!(path = %index_path.display(), error = %e, "could not remove partial index");
        }
    }
}

impl FeatureStore {
    /// Write `features` to a new store under `dir`.
    ///
    /// Slot *i* is the *i*-th feature yielded. Fails if `dir` already holds
    /// a record database. A failed build removes what it wrote, so the same
    /// directory can be built into again.
    pub fn build(
        dir: &Path,
        features: impl IntoIterator<Item = Feature>,
    ) -> FeatureStoreResult<BuildReport> {
        let records_path = dir.join(RECORDS_DIR);
        if records_path.exists() {
            return Err(FeatureStoreError::AlreadyExists { path: records_path });
        }
        std::fs::create_dir_all(dir).map_err(|source| FeatureStoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        match write_store(dir, &records_path, features) {
            Ok(built) => {
                tracing::info!(
                    dir = %dir.display(),
                    features = built.features,
                    index_bytes = built.index_bytes,
                    "feature store built"
                );
                Ok(built)
            }
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "feature store build failed");
                remove_partial_build(dir, &records_path);
                Err(e)
            }
        }
    }

    /// Open a built store read-only.
    pub fn open(dir: &Path) -> FeatureStoreResult<Self> {
        let index = index_file::read(&dir.join(INDEX_FILE))?;

        let records_path = dir.join(RECORDS_DIR);
        if !records_path.exists() {
            return Err(FeatureStoreError::FileNotFound { path: records_path });
        }
        let db = DB::open_for_read_only(&Options::default(), &records_path, false)
            .map_err(rocks("open_for_read_only", &records_path))?;

        tracing::info!(dir = %dir.display(), slots = index.len(), "feature store opened");
        Ok(Self {
            db,
            index,
            dir: dir.to_path_buf(),
        })
    }

    /// Attributes of every feature whose polygon contains `point`
    /// (inclusive boundary), in slot order.
    pub fn query(&self, point: Coordinates) -> FeatureStoreResult<Vec<FeatureAttributes>> {
        let mut slots = self.index.query_point(point);
        slots.sort_unstable();

        let candidates = slots.len();
        let mut hits = Vec::new();
        for slot in slots {
            let feature = self.feature(slot)?;
            if feature.geometry.contains(point) {
                hits.push(feature.attributes);
            }
        }

        tracing::debug!(
            lon = point.lon,
            lat = point.lat,
            candidates,
            hits = hits.len(),
            "feature query"
        );
        Ok(hits)
    }

    /// Decode the record stored at `slot`.
    pub fn feature(&self, slot: Slot) -> FeatureStoreResult<Feature> {
        let key = slot_key(slot)?;
        let slot = u32::from_be_bytes(key);
        let bytes = self
            .db
            .get(key)
            .map_err(rocks("get", &self.dir.join(RECORDS_DIR)))?
            .ok_or(FeatureStoreError::MissingRecord { slot })?;
        record::decode(slot, &bytes)
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
