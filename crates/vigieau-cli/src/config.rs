//! # Configuration
//!
//! Where the snapshot and the feature store live. Read from `vigieau.yaml`:
//!
//! ```yaml
//! data_dir: /srv/vigieau/data
//! zones_file: zones.json
//! geometries_file: zones.geojson
//! rules_file: regles-gestion.json
//! communes_file: communes.json
//! feature_store: /srv/vigieau/features
//! ```
//!
//! Every key is optional. The file is taken from `--config`, else from
//! `VIGIEAU_CONFIG`, else defaults apply. `VIGIEAU_DATA_DIR` overrides
//! `data_dir` in all cases.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use vigieau_resolve::SnapshotPaths;

pub const CONFIG_ENV: &str = "VIGIEAU_CONFIG";
pub const DATA_DIR_ENV: &str = "VIGIEAU_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub data_dir: PathBuf,
    pub zones_file: String,
    pub geometries_file: String,
    pub rules_file: String,
    pub communes_file: String,
    /// Feature store directory. Relative paths are taken from `data_dir`.
    pub feature_store: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            zones_file: SnapshotPaths::ZONES.to_string(),
            geometries_file: SnapshotPaths::GEOMETRIES.to_string(),
            rules_file: SnapshotPaths::RULES.to_string(),
            communes_file: SnapshotPaths::COMMUNES.to_string(),
            feature_store: PathBuf::from("features"),
        }
    }
}

impl Config {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("invalid configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Configuration for this process: `explicit` path or environment.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        Self::resolve_with(
            explicit,
            std::env::var_os(CONFIG_ENV),
            std::env::var_os(DATA_DIR_ENV),
        )
    }

    fn resolve_with(
        explicit: Option<&Path>,
        config_env: Option<OsString>,
        data_dir_env: Option<OsString>,
    ) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| config_env.map(PathBuf::from));
        let mut config = match path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading configuration");
                Self::load(&path)?
            }
            None => Self::default(),
        };
        if let Some(dir) = data_dir_env {
            config.data_dir = PathBuf::from(dir);
        }
        Ok(config)
    }

    pub fn snapshot_paths(&self) -> SnapshotPaths {
        SnapshotPaths {
            zones: self.data_dir.join(&self.zones_file),
            geometries: self.data_dir.join(&self.geometries_file),
            rules: self.data_dir.join(&self.rules_file),
            communes: self.data_dir.join(&self.communes_file),
        }
    }

    pub fn feature_store_dir(&self) -> PathBuf {
        self.data_dir.join(&self.feature_store)
    }
}
