//! # vigieau CLI entry point
//!
//! Parses command-line arguments, resolves the configuration and dispatches
//! to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vigieau_cli::bench::{run_bench, BenchArgs};
use vigieau_cli::config::Config;
use vigieau_cli::features::{run_features, FeaturesArgs};
use vigieau_cli::query::{
    run_applicable, run_cascade, run_commune, run_departments, run_levels, run_locate,
    ApplicableArgs, CascadeArgs, CommuneArgs, LevelsArgs, LocateArgs,
};

/// Water restriction zone engine.
///
/// Finds the drought restriction zones covering a location or commune and
/// resolves which regulation applies.
#[derive(Parser, Debug)]
#[command(name = "vigieau", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file (else `VIGIEAU_CONFIG`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Zones whose polygon contains a point.
    Locate(LocateArgs),

    /// Zones covering a commune.
    Commune(CommuneArgs),

    /// The single zone whose restrictions apply.
    Applicable(ApplicableArgs),

    /// The zone at a point by descending alert level.
    Cascade(CascadeArgs),

    /// Alert levels for a subscriber profile.
    Levels(LevelsArgs),

    /// Maximum alert level per department.
    Departments,

    /// Build or query the binary feature store.
    Features(FeaturesArgs),

    /// Time random point lookups over metropolitan France.
    Bench(BenchArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::resolve(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(1);
        }
    };
    tracing::debug!(data_dir = %config.data_dir.display(), "resolved configuration");

    let result = match &cli.command {
        Commands::Locate(args) => run_locate(args, &config),
        Commands::Commune(args) => run_commune(args, &config),
        Commands::Applicable(args) => run_applicable(args, &config),
        Commands::Cascade(args) => run_cascade(args, &config),
        Commands::Levels(args) => run_levels(args, &config),
        Commands::Departments => run_departments(&config),
        Commands::Features(args) => run_features(args, &config),
        Commands::Bench(args) => run_bench(args, &config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_locate_with_negative_longitude() {
        let cli = Cli::try_parse_from(["vigieau", "locate", "--lon", "-1.55", "--lat", "47.21"])
            .unwrap();
        match cli.command {
            Commands::Locate(args) => {
                assert_eq!(args.point.lon, -1.55);
                assert_eq!(args.point.lat, 47.21);
            }
            other => panic!("expected Locate, got {other:?}"),
        }
    }

    #[test]
    fn cli_parse_applicable_without_point() {
        let cli = Cli::try_parse_from(["vigieau", "applicable", "--commune", "34172"]).unwrap();
        assert!(matches!(cli.command, Commands::Applicable(_)));
    }

    #[test]
    fn cli_parse_half_point_errors() {
        let result = Cli::try_parse_from(["vigieau", "applicable", "--commune", "34172", "--lon", "3.8"]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parse_levels_defaults() {
        let cli = Cli::try_parse_from(["vigieau", "levels", "--commune", "34172"]).unwrap();
        match cli.command {
            Commands::Levels(args) => {
                assert_eq!(args.profile, "particulier");
                assert_eq!(args.types, vec!["SUP".to_string(), "SOU".to_string()]);
            }
            other => panic!("expected Levels, got {other:?}"),
        }
    }

    #[test]
    fn cli_parse_features_subcommands() {
        let cli = Cli::try_parse_from(["vigieau", "features", "build", "--out", "/tmp/store"]).unwrap();
        assert!(matches!(cli.command, Commands::Features(_)));

        let cli = Cli::try_parse_from([
            "vigieau", "features", "query", "--lon", "2.35", "--lat", "48.85",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Features(_)));
    }

    #[test]
    fn cli_parse_bench_defaults() {
        let cli = Cli::try_parse_from(["vigieau", "bench"]).unwrap();
        match cli.command {
            Commands::Bench(args) => {
                assert_eq!(args.points, 100_000);
                assert_eq!(args.backend, vigieau_cli::bench::Backend::Features);
                assert_eq!(args.seed, None);
            }
            other => panic!("expected Bench, got {other:?}"),
        }
    }

    #[test]
    fn cli_parse_verbose_levels() {
        let cli0 = Cli::try_parse_from(["vigieau", "departments"]).unwrap();
        assert_eq!(cli0.verbose, 0);

        let cli2 = Cli::try_parse_from(["vigieau", "-vv", "departments"]).unwrap();
        assert_eq!(cli2.verbose, 2);
    }

    #[test]
    fn cli_parse_config_option() {
        let cli =
            Cli::try_parse_from(["vigieau", "--config", "vigieau.yaml", "departments"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("vigieau.yaml")));
    }

    #[test]
    fn cli_parse_no_subcommand_errors() {
        assert!(Cli::try_parse_from(["vigieau"]).is_err());
    }
}
