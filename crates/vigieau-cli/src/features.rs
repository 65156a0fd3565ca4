//! # Feature Store Subcommand
//!
//! - `vigieau features build [--out DIR]` writes the store from the snapshot.
//! - `vigieau features query --lon --lat [--store DIR]` prints the
//!   attributes of every containing feature.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use vigieau_features::{Feature, FeatureStore};
use vigieau_geo::snapshot;

use crate::config::Config;
use crate::query::PointArgs;
use crate::{print_json, report};

/// Arguments for `vigieau features`.
#[derive(Args, Debug)]
pub struct FeaturesArgs {
    #[command(subcommand)]
    pub command: FeaturesCommand,
}

#[derive(Subcommand, Debug)]
pub enum FeaturesCommand {
    /// Encode the snapshot into a new feature store.
    Build {
        /// Target directory. Defaults to the configured feature store.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Query a built store at a point.
    Query {
        #[command(flatten)]
        point: PointArgs,
        /// Store directory. Defaults to the configured feature store.
        #[arg(long)]
        store: Option<PathBuf>,
    },
}

pub fn run_features(args: &FeaturesArgs, config: &Config) -> Result<u8> {
    match &args.command {
        FeaturesCommand::Build { out } => {
            let dir = out.clone().unwrap_or_else(|| config.feature_store_dir());
            cmd_build(config, &dir)
        }
        FeaturesCommand::Query { point, store } => {
            let dir = store.clone().unwrap_or_else(|| config.feature_store_dir());
            cmd_query(&dir, point)
        }
    }
}

fn cmd_build(config: &Config, dir: &Path) -> Result<u8> {
    let paths = config.snapshot_paths();
    let zones = snapshot::load_zones(&paths.zones).context("failed to load zone attributes")?;
    let geometries =
        snapshot::load_geometries(&paths.geometries).context("failed to load zone geometries")?;
    let features = Feature::join(zones, geometries);

    let built = FeatureStore::build(dir, features)
        .with_context(|| format!("failed to build feature store in {}", dir.display()))?;
    print_json(&serde_json::json!({
        "dir": dir.display().to_string(),
        "features": built.features,
        "indexBytes": built.index_bytes,
    }))?;
    Ok(0)
}

fn cmd_query(dir: &Path, point: &PointArgs) -> Result<u8> {
    let point = match point.coordinates() {
        Ok(point) => point,
        Err(e) => return report::<()>(Err(e)),
    };
    let store = FeatureStore::open(dir)
        .with_context(|| format!("failed to open feature store in {}", dir.display()))?;
    let hits = store.query(point).context("feature query failed")?;
    report(Ok(hits))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_snapshot(dir: &Path) {
        std::fs::write(
            dir.join("zones.json"),
            serde_json::json!([
                {"idZone": "1", "type": "SUP", "departement": "29", "niveauAlerte": "Vigilance"}
            ])
            .to_string(),
        )
        .unwrap();
        std::fs::write(
            dir.join("zones.geojson"),
            serde_json::json!({
                "type": "FeatureCollection",
                "features": [{
                    "type": "Feature",
                    "properties": {"idZone": "1"},
                    "geometry": {"type": "Polygon",
                                 "coordinates": [[[-4.6, 48.2], [-4.0, 48.2], [-4.0, 48.6], [-4.6, 48.6], [-4.6, 48.2]]]}
                }]
            })
            .to_string(),
        )
        .unwrap();
    }

    #[test]
    fn build_then_query_through_the_cli_handlers() {
        let data = tempfile::tempdir().unwrap();
        write_snapshot(data.path());
        let config = Config {
            data_dir: data.path().to_path_buf(),
            ..Config::default()
        };

        let build = FeaturesArgs {
            command: FeaturesCommand::Build { out: None },
        };
        assert_eq!(run_features(&build, &config).unwrap(), 0);
        assert!(config.feature_store_dir().join("index.bin").exists());

        let query = FeaturesArgs {
            command: FeaturesCommand::Query {
                point: PointArgs {
                    lon: -4.3,
                    lat: 48.4,
                },
                store: None,
            },
        };
        assert_eq!(run_features(&query, &config).unwrap(), 0);

        let out_of_range = FeaturesArgs {
            command: FeaturesCommand::Query {
                point: PointArgs {
                    lon: -4.3,
                    lat: 88.0,
                },
                store: None,
            },
        };
        assert_eq!(
            run_features(&out_of_range, &config).unwrap(),
            crate::LOOKUP_FAILED
        );
    }

    #[test]
    fn query_without_store_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = cmd_query(
            dir.path(),
            &PointArgs {
                lon: 0.0,
                lat: 45.0,
            },
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("failed to open feature store"));
    }
}
