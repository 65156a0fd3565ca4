//! # Department Rules
//!
//! Each department declares how overlapping surface and groundwater zones
//! are reconciled: which zone type, if any, takes precedence, and whether
//! the most severe level across types applies commune-wide.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::zone::ZoneType;

/// Department code (`01`..`95`, `2A`, `2B`, `971`..).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepartmentCode(String);

impl DepartmentCode {
    /// Wrap a department code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Access the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DepartmentCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Disambiguation rules declared by one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentRules {
    pub code: DepartmentCode,
    #[serde(rename = "nom", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Whether the department's restriction data is considered reliable.
    #[serde(rename = "estValide", default = "default_valid")]
    pub valid: bool,
    /// Zone type displayed first when both types overlap.
    #[serde(
        rename = "affichageRestrictionSiSuperpositionTypeZone",
        with = "display_rule",
        default
    )]
    pub priority_type: Option<ZoneType>,
    /// Whether the highest level across zone types applies to the whole commune.
    #[serde(
        rename = "appliqueNiveauGraviteMaxSiPlusieursTypeZoneMemeCommune",
        default
    )]
    pub max_severity_across_types: bool,
}

fn default_valid() -> bool {
    true
}

impl DepartmentRules {
    /// Rules with no type priority and the per-point candidate set.
    pub fn new(code: DepartmentCode) -> Self {
        Self {
            code,
            name: None,
            valid: true,
            priority_type: None,
            max_severity_across_types: false,
        }
    }

    pub fn with_priority(mut self, priority_type: Option<ZoneType>) -> Self {
        self.priority_type = priority_type;
        self
    }

    pub fn with_max_severity_across_types(mut self, enabled: bool) -> Self {
        self.max_severity_across_types = enabled;
        self
    }
}

/// Wire mapping of the overlap display rule.
///
/// `Affichage Prio Eau Sup` prioritizes surface zones, `Affichage Prio Eau Sou`
/// groundwater zones; any other value means no priority.
mod display_rule {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::zone::ZoneType;

    const PRIORITY_SURFACE: &str = "Affichage Prio Eau Sup";
    const PRIORITY_GROUNDWATER: &str = "Affichage Prio Eau Sou";

    pub fn serialize<S: Serializer>(
        value: &Option<ZoneType>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(ZoneType::Surface) => serializer.serialize_str(PRIORITY_SURFACE),
            Some(ZoneType::Groundwater) => serializer.serialize_str(PRIORITY_GROUNDWATER),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<ZoneType>, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(match value.as_deref().map(str::trim) {
            Some(PRIORITY_SURFACE) => Some(ZoneType::Surface),
            Some(PRIORITY_GROUNDWATER) => Some(ZoneType::Groundwater),
            _ => None,
        })
    }
}
