//! # Benchmark Subcommand
//!
//! `vigieau bench` runs random point lookups drawn uniformly over the
//! metropolitan France bounding box and logs the elapsed time.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use vigieau_core::Coordinates;
use vigieau_features::FeatureStore;
use vigieau_geo::ZoneLocator;

use crate::config::Config;
use crate::{load_resolver, print_json};

/// Metropolitan France, `[min_lon, min_lat, max_lon, max_lat]`.
pub const FRANCE_BOUNDS: [f64; 4] = [-5.1967, 42.2306, 8.1597, 50.6999];

/// Which lookup path to time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    /// In-memory zone store built from the snapshot.
    Memory,
    /// On-disk feature store.
    Features,
}

/// Arguments for `vigieau bench`.
#[derive(Args, Debug)]
pub struct BenchArgs {
    /// Number of random points to query.
    #[arg(long, default_value_t = 100_000)]
    pub points: usize,

    #[arg(long, value_enum, default_value = "features")]
    pub backend: Backend,

    /// Seed for reproducible runs.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Feature store directory. Defaults to the configured one.
    #[arg(long)]
    pub store: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BenchReport {
    backend: Backend,
    points: usize,
    hits: usize,
    elapsed_ms: f64,
    per_query_us: f64,
}

impl BenchReport {
    fn new(backend: Backend, points: usize, hits: usize, elapsed: Duration) -> Self {
        let elapsed_us = elapsed.as_secs_f64() * 1e6;
        Self {
            backend,
            points,
            hits,
            elapsed_ms: elapsed_us / 1e3,
            per_query_us: if points == 0 {
                0.0
            } else {
                elapsed_us / points as f64
            },
        }
    }
}

/// `count` points inside [`FRANCE_BOUNDS`].
pub fn random_points(rng: &mut impl Rng, count: usize) -> Vec<Coordinates> {
    let [min_lon, min_lat, max_lon, max_lat] = FRANCE_BOUNDS;
    (0..count)
        .map(|_| {
            Coordinates::trusted(
                rng.gen_range(min_lon..max_lon),
                rng.gen_range(min_lat..max_lat),
            )
        })
        .collect()
}

pub fn run_bench(args: &BenchArgs, config: &Config) -> Result<u8> {
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let points = random_points(&mut rng, args.points);

    let (hits, elapsed) = match args.backend {
        Backend::Memory => {
            let resolver = load_resolver(config)?;
            let started = Instant::now();
            let hits: usize = points
                .iter()
                .map(|&p| resolver.locate_by_point(p).len())
                .sum();
            (hits, started.elapsed())
        }
        Backend::Features => {
            let dir = args
                .store
                .clone()
                .unwrap_or_else(|| config.feature_store_dir());
            let store = FeatureStore::open(&dir)
                .with_context(|| format!("failed to open feature store in {}", dir.display()))?;
            let started = Instant::now();
            let mut hits = 0;
            for p in &points {
                hits += store.query(*p).context("feature query failed")?.len();
            }
            (hits, started.elapsed())
        }
    };

    let report = BenchReport::new(args.backend, points.len(), hits, elapsed);
    tracing::info!(
        backend = ?report.backend,
        points = report.points,
        hits = report.hits,
        elapsed_ms = report.elapsed_ms,
        "benchmark finished"
    );
    print_json(&report)?;
    Ok(0)
}
