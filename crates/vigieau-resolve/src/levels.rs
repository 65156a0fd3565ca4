//! # Alert Levels by Profile
//!
//! Subscribers and exports ask for the alert level that concerns them rather
//! than a full zone. Individuals get the level of the single applicable zone;
//! businesses, local authorities and farms get one level per requested zone
//! type, since they may draw from surface and groundwater resources alike.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use vigieau_core::{
    AlertLevel, CommuneCode, Coordinates, LookupError, LookupResult, NotFound, ValidationError,
    Zone, ZoneId, ZoneType,
};

/// Who the alert levels are computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Profile {
    #[serde(rename = "particulier")]
    Individual,
    #[serde(rename = "entreprise")]
    Business,
    #[serde(rename = "collectivite")]
    LocalAuthority,
    #[serde(rename = "exploitation")]
    Farm,
}

impl Profile {
    pub fn code(self) -> &'static str {
        match self {
            Self::Individual => "particulier",
            Self::Business => "entreprise",
            Self::LocalAuthority => "collectivite",
            Self::Farm => "exploitation",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Profile {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "particulier" => Ok(Self::Individual),
            "entreprise" => Ok(Self::Business),
            "collectivite" => Ok(Self::LocalAuthority),
            "exploitation" => Ok(Self::Farm),
            other => Err(ValidationError::UnknownProfile(other.to_string())),
        }
    }
}

/// Inputs of an alert level computation.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertLevelQuery {
    pub point: Option<Coordinates>,
    pub commune: CommuneCode,
    pub profile: Profile,
    /// Zone types reported for non-individual profiles.
    pub zone_types: Vec<ZoneType>,
}

/// Alert levels for one query. Fields not relevant to the profile are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlertLevels {
    #[serde(rename = "particulier", skip_serializing_if = "Option::is_none")]
    pub individual: Option<AlertLevel>,
    #[serde(rename = "sup", skip_serializing_if = "Option::is_none")]
    pub surface: Option<AlertLevel>,
    #[serde(rename = "sou", skip_serializing_if = "Option::is_none")]
    pub groundwater: Option<AlertLevel>,
    /// Zones the reported levels come from.
    pub zones: Vec<ZoneId>,
}

/// Levels for an individual, from the applicable zone outcome.
///
/// No applicable zone is a valid answer (`Aucun`); every other failure
/// propagates.
pub fn individual_levels(outcome: LookupResult<&Zone>) -> LookupResult<AlertLevels> {
    match outcome {
        Ok(zone) => Ok(AlertLevels {
            individual: Some(zone.alert_level),
            zones: vec![zone.id.clone()],
            ..AlertLevels::default()
        }),
        Err(LookupError::NotFound(NotFound::NoZone)) => Ok(AlertLevels {
            individual: Some(AlertLevel::None),
            ..AlertLevels::default()
        }),
        Err(e) => Err(e),
    }
}

/// Per-type levels: the first zone of each requested type, `Aucun` when the
/// type is absent.
pub fn levels_by_type(zones: &[&Zone], zone_types: &[ZoneType]) -> AlertLevels {
    let mut levels = AlertLevels::default();
    for zone_type in ZoneType::all() {
        if !zone_types.contains(&zone_type) {
            continue;
        }
        let first = zones.iter().find(|z| z.zone_type == zone_type);
        let level = match first {
            Some(zone) => {
                levels.zones.push(zone.id.clone());
                zone.alert_level
            }
            None => AlertLevel::None,
        };
        match zone_type {
            ZoneType::Surface => levels.surface = Some(level),
            ZoneType::Groundwater => levels.groundwater = Some(level),
        }
    }
    levels
}
