//! # Restriction Zones
//!
//! A zone is a regulatory area (surface water or groundwater) carrying the
//! alert level of the decree currently in force and the list of usage
//! restrictions that decree imposes.
//!
//! Geometry is not part of this record. Polygons and bounding boxes live in
//! the geometry store (`vigieau-geo`), keyed by [`ZoneId`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::commune::CommuneCode;
use crate::department::DepartmentCode;
use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// ZoneId
// ---------------------------------------------------------------------------

/// Stable identifier of a restriction zone (`idZone` in the snapshots).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(String);

impl ZoneId {
    /// Wrap a zone identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Access the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// ZoneType
// ---------------------------------------------------------------------------

/// Water resource a zone regulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneType {
    /// Surface water (`SUP`).
    #[serde(rename = "SUP")]
    Surface,
    /// Groundwater (`SOU`).
    #[serde(rename = "SOU")]
    Groundwater,
}

impl ZoneType {
    /// Both zone types, surface first.
    pub fn all() -> [ZoneType; 2] {
        [Self::Surface, Self::Groundwater]
    }

    /// The wire code (`SUP` or `SOU`).
    pub fn code(self) -> &'static str {
        match self {
            Self::Surface => "SUP",
            Self::Groundwater => "SOU",
        }
    }
}

impl fmt::Display for ZoneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ZoneType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SUP" => Ok(Self::Surface),
            "SOU" => Ok(Self::Groundwater),
            _ => Err(ValidationError::UnknownZoneType(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// AlertLevel
// ---------------------------------------------------------------------------

/// Severity of the decree in force on a zone.
///
/// Variants are declared in increasing severity, so the derived `Ord` is the
/// regulatory order:
///
/// ```text
/// None < Watch < Alert < HeightenedAlert < Crisis
/// ```
///
/// On the wire the levels use the labels of the source decrees
/// (`Vigilance`, `Alerte`, `Alerte renforcée`, `Crise`). Any other label,
/// including `Aucun`, reads as [`AlertLevel::None`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum AlertLevel {
    /// No decree in force, or an unrecognized level.
    #[default]
    None,
    /// `Vigilance`.
    Watch,
    /// `Alerte`.
    Alert,
    /// `Alerte renforcée`.
    HeightenedAlert,
    /// `Crise`.
    Crisis,
}

impl AlertLevel {
    /// Levels visited by the severity cascade, most severe first.
    pub const CASCADE_ORDER: [AlertLevel; 4] = [
        Self::Crisis,
        Self::HeightenedAlert,
        Self::Alert,
        Self::Watch,
    ];

    /// Scoring rank: Crisis 5, HeightenedAlert 4, Alert 3, Watch 2, None 1.
    pub fn rank(self) -> u8 {
        match self {
            Self::None => 1,
            Self::Watch => 2,
            Self::Alert => 3,
            Self::HeightenedAlert => 4,
            Self::Crisis => 5,
        }
    }

    /// Inverse of [`rank`](Self::rank).
    pub fn from_rank(rank: u8) -> Option<Self> {
        match rank {
            1 => Some(Self::None),
            2 => Some(Self::Watch),
            3 => Some(Self::Alert),
            4 => Some(Self::HeightenedAlert),
            5 => Some(Self::Crisis),
            _ => None,
        }
    }

    /// The label used in decrees and snapshot files.
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "Aucun",
            Self::Watch => "Vigilance",
            Self::Alert => "Alerte",
            Self::HeightenedAlert => "Alerte renforcée",
            Self::Crisis => "Crise",
        }
    }

    /// Parse a decree label. Unknown labels map to [`AlertLevel::None`].
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Vigilance" => Self::Watch,
            "Alerte" => Self::Alert,
            "Alerte renforcée" => Self::HeightenedAlert,
            "Crise" => Self::Crisis,
            _ => Self::None,
        }
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for AlertLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for AlertLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = Option::<String>::deserialize(deserializer)?;
        Ok(label.as_deref().map(Self::from_label).unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// Usage restrictions and decree reference
// ---------------------------------------------------------------------------

/// One restricted water usage, as listed by the decree in force.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Thematic grouping (`thematique`).
    #[serde(rename = "thematique", default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    /// Usage name.
    pub usage: String,
    /// Restriction level (`niveauRestriction`), e.g. `Interdiction`.
    #[serde(rename = "niveauRestriction", default, skip_serializing_if = "Option::is_none")]
    pub restriction_level: Option<String>,
    /// Free-text details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Start of a time-window ban, `HH:00`.
    #[serde(rename = "heureDebut", default, skip_serializing_if = "Option::is_none")]
    pub start_hour: Option<String>,
    /// End of a time-window ban, `HH:00`.
    #[serde(rename = "heureFin", default, skip_serializing_if = "Option::is_none")]
    pub end_hour: Option<String>,
    /// Set when the restrictions could not be merged and the decree must be read.
    #[serde(rename = "erreur", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Reference to the decree (`arrêté`) that set a zone's level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecreeRef {
    /// Decree identifier (`idArrete`).
    #[serde(rename = "idArrete")]
    pub id: String,
    #[serde(rename = "dateDebutValidite", default, skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<String>,
    #[serde(rename = "dateFinValidite", default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<String>,
    /// Path of the published decree document.
    #[serde(rename = "cheminFichier", default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    /// Path of the framework decree (`arrêté cadre`) document.
    #[serde(rename = "cheminFichierArreteCadre", default, skip_serializing_if = "Option::is_none")]
    pub framework_file_path: Option<String>,
}

// ---------------------------------------------------------------------------
// Zone
// ---------------------------------------------------------------------------

/// Attribute record of a restriction zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    #[serde(rename = "idZone")]
    pub id: ZoneId,
    #[serde(rename = "type")]
    pub zone_type: ZoneType,
    #[serde(rename = "nom", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Owning department. A zone belongs to exactly one.
    #[serde(rename = "departement")]
    pub department: DepartmentCode,
    #[serde(rename = "niveauAlerte", default)]
    pub alert_level: AlertLevel,
    /// Restricted usages, in decree order.
    #[serde(default)]
    pub usages: Vec<Usage>,
    /// Communes the zone covers.
    #[serde(default)]
    pub communes: Vec<CommuneCode>,
    #[serde(rename = "arrete", default, skip_serializing_if = "Option::is_none")]
    pub decree: Option<DecreeRef>,
}

impl Zone {
    /// Whether the decree in force restricts at least one usage here.
    pub fn has_usages(&self) -> bool {
        !self.usages.is_empty()
    }

    /// Identifier of the decree in force, if known.
    pub fn decree_id(&self) -> Option<&str> {
        self.decree.as_ref().map(|d| d.id.as_str())
    }
}
