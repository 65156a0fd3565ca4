//! # Lookup Subcommands
//!
//! Thin wrappers over [`Resolver`]: parse and validate arguments, run one
//! query, print the result.

use anyhow::Result;
use clap::Args;
use vigieau_core::{CommuneCode, Coordinates, LookupResult, Zone, ZoneType};
use vigieau_geo::ZoneLocator;
use vigieau_resolve::{AlertLevelQuery, Profile, Resolver};

use crate::config::Config;
use crate::{load_resolver, report};

/// A required point.
#[derive(Args, Debug, Clone)]
pub struct PointArgs {
    /// Longitude, WGS84 degrees.
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,
    /// Latitude, WGS84 degrees.
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,
}

impl PointArgs {
    pub(crate) fn coordinates(&self) -> LookupResult<Coordinates> {
        Ok(Coordinates::new(self.lon, self.lat)?)
    }
}

/// An optional point: both ordinates or neither.
#[derive(Args, Debug, Clone)]
pub struct OptionalPointArgs {
    /// Longitude, WGS84 degrees.
    #[arg(long, allow_negative_numbers = true, requires = "lat")]
    pub lon: Option<f64>,
    /// Latitude, WGS84 degrees.
    #[arg(long, allow_negative_numbers = true, requires = "lon")]
    pub lat: Option<f64>,
}

impl OptionalPointArgs {
    fn coordinates(&self) -> LookupResult<Option<Coordinates>> {
        match (self.lon, self.lat) {
            (Some(lon), Some(lat)) => Ok(Some(Coordinates::new(lon, lat)?)),
            _ => Ok(None),
        }
    }
}

fn commune_code(code: &str) -> LookupResult<CommuneCode> {
    Ok(CommuneCode::new(code)?)
}

/// Arguments for `vigieau locate`.
#[derive(Args, Debug)]
pub struct LocateArgs {
    #[command(flatten)]
    pub point: PointArgs,
}

/// Arguments for `vigieau commune`.
#[derive(Args, Debug)]
pub struct CommuneArgs {
    /// Five-character commune code (INSEE).
    pub code: String,
}

/// Arguments for `vigieau applicable`.
#[derive(Args, Debug)]
pub struct ApplicableArgs {
    /// Commune code the query is made in.
    #[arg(long)]
    pub commune: String,
    #[command(flatten)]
    pub point: OptionalPointArgs,
}

/// Arguments for `vigieau cascade`.
#[derive(Args, Debug)]
pub struct CascadeArgs {
    #[command(flatten)]
    pub point: PointArgs,
}

/// Arguments for `vigieau levels`.
#[derive(Args, Debug)]
pub struct LevelsArgs {
    #[arg(long)]
    pub commune: String,
    /// particulier, entreprise, collectivite or exploitation.
    #[arg(long, default_value = "particulier")]
    pub profile: String,
    /// Zone types reported for non-individual profiles.
    #[arg(long, value_delimiter = ',', default_value = "SUP,SOU")]
    pub types: Vec<String>,
    #[command(flatten)]
    pub point: OptionalPointArgs,
}

pub fn run_locate(args: &LocateArgs, config: &Config) -> Result<u8> {
    let resolver = load_resolver(config)?;
    report(
        args.point
            .coordinates()
            .map(|point| resolver.locate_by_point(point)),
    )
}

pub fn run_commune(args: &CommuneArgs, config: &Config) -> Result<u8> {
    let resolver = load_resolver(config)?;
    report(commune_code(&args.code).map(|code| resolver.locate_by_commune(&code)))
}

pub fn run_applicable(args: &ApplicableArgs, config: &Config) -> Result<u8> {
    let resolver = load_resolver(config)?;
    report(applicable(&resolver, args))
}

fn applicable<'a>(resolver: &'a Resolver, args: &ApplicableArgs) -> LookupResult<&'a Zone> {
    let commune = commune_code(&args.commune)?;
    let point = args.point.coordinates()?;
    resolver.applicable_zone(point, &commune)
}

pub fn run_cascade(args: &CascadeArgs, config: &Config) -> Result<u8> {
    let resolver = load_resolver(config)?;
    report(
        args.point
            .coordinates()
            .and_then(|point| resolver.cascade(point)),
    )
}

pub fn run_levels(args: &LevelsArgs, config: &Config) -> Result<u8> {
    let resolver = load_resolver(config)?;
    report(levels_query(args).and_then(|query| resolver.alert_levels(&query)))
}

fn levels_query(args: &LevelsArgs) -> LookupResult<AlertLevelQuery> {
    let zone_types = args
        .types
        .iter()
        .map(|t| t.parse::<ZoneType>())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(AlertLevelQuery {
        point: args.point.coordinates()?,
        commune: commune_code(&args.commune)?,
        profile: args.profile.parse::<Profile>()?,
        zone_types,
    })
}

pub fn run_departments(config: &Config) -> Result<u8> {
    let resolver = load_resolver(config)?;
    report(Ok(resolver.department_summaries()))
}
