//! # Communes
//!
//! Commune codes (5 characters, digits except the Corsican `2A`/`2B`
//! prefixes) and the registry mapping each code to its department.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::department::DepartmentCode;
use crate::error::ValidationError;

/// Whole-city codes of Paris, Marseille and Lyon. These cities are
/// represented by their municipal arrondissements instead.
pub const WHOLE_CITY_CODES: [&str; 3] = ["75056", "13055", "69123"];

/// Validated 5-character commune code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommuneCode(String);

impl CommuneCode {
    /// Validate and wrap a commune code.
    pub fn new(code: &str) -> Result<Self, ValidationError> {
        let code = code.trim().to_ascii_uppercase();
        let valid = code.len() == 5
            && code.chars().all(|c| c.is_ascii_alphanumeric())
            && code[2..].chars().all(|c| c.is_ascii_digit());
        if valid {
            Ok(Self(code))
        } else {
            Err(ValidationError::InvalidCommuneCode(code))
        }
    }

    /// Access the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CommuneCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<CommuneCode> for String {
    fn from(code: CommuneCode) -> Self {
        code.0
    }
}

impl fmt::Display for CommuneCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A commune of the official geographic code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commune {
    pub code: CommuneCode,
    #[serde(rename = "departement")]
    pub department: DepartmentCode,
    #[serde(rename = "nom")]
    pub name: String,
}

/// Commune lookup by code.
#[derive(Debug, Clone, Default)]
pub struct CommuneRegistry {
    communes: HashMap<CommuneCode, Commune>,
}

impl CommuneRegistry {
    /// Build the registry, dropping the whole-city codes of
    /// [`WHOLE_CITY_CODES`].
    pub fn from_communes(communes: impl IntoIterator<Item = Commune>) -> Self {
        let communes = communes
            .into_iter()
            .filter(|c| !WHOLE_CITY_CODES.contains(&c.code.as_str()))
            .map(|c| (c.code.clone(), c))
            .collect();
        Self { communes }
    }

    pub fn get(&self, code: &CommuneCode) -> Option<&Commune> {
        self.communes.get(code)
    }

    pub fn len(&self) -> usize {
        self.communes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.communes.is_empty()
    }
}
