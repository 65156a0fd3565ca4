//! # Error Types — Lookup Failure Taxonomy
//!
//! Every way a lookup can fail is a tagged [`LookupError`] variant with a
//! structured payload. The serving layer maps variants to responses through
//! [`LookupError::kind`] and [`LookupError::http_status`], never by message.
//!
//! ## Classes
//!
//! - `Validation` — malformed caller input. Never retried.
//! - `NotFound` — a valid empty result (no zone, unknown commune/department).
//! - `Ambiguous` — a commune-level answer needs a precise address.
//! - `DataConflict` — two zones of the same level cover the same point.
//!   Carries the decree identifiers so the data can be fixed upstream.
//! - `DataInconsistency` — an invariant expected by construction does not
//!   hold. Fatal-class: surfaced as an internal error, never guessed around.

use std::fmt;

use thiserror::Error;

use crate::commune::CommuneCode;
use crate::department::DepartmentCode;
use crate::zone::{AlertLevel, ZoneId};

/// Result alias for lookup operations.
pub type LookupResult<T> = Result<T, LookupError>;

/// Malformed caller input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("coordinates out of range: lon={lon}, lat={lat}")]
    CoordinatesOutOfRange { lon: f64, lat: f64 },

    #[error("invalid commune code: {0:?}")]
    InvalidCommuneCode(String),

    #[error("unknown profile: {0:?}")]
    UnknownProfile(String),

    #[error("unknown zone type: {0:?}")]
    UnknownZoneType(String),
}

/// What a lookup could not find.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFound {
    /// No zone applies to the location or commune.
    NoZone,
    /// The commune code is not in the registry.
    UnknownCommune(CommuneCode),
    /// No rules are published for the department.
    UnknownDepartment(DepartmentCode),
    /// No zone carries this identifier.
    UnknownZone(ZoneId),
}

impl fmt::Display for NotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoZone => write!(f, "no restriction zone applies"),
            Self::UnknownCommune(code) => write!(f, "unknown commune {code}"),
            Self::UnknownDepartment(code) => {
                write!(f, "no rules available for department {code}")
            }
            Self::UnknownZone(id) => write!(f, "unknown zone {id}"),
        }
    }
}

/// Coarse failure class, for mapping to responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Ambiguous,
    DataConflict,
    DataInconsistency,
}

impl ErrorKind {
    /// Stable snake_case code for machine-readable output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Ambiguous => "ambiguous",
            Self::DataConflict => "data_conflict",
            Self::DataInconsistency => "data_inconsistency",
        }
    }
}

/// A failed zone lookup.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    /// Caller input rejected.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Nothing to return.
    #[error("not found: {0}")]
    NotFound(NotFound),

    /// The commune is covered by several candidate zones; an address is needed.
    #[error("commune {commune} is covered by several zones ({}); a precise address is required", join_ids(.candidates))]
    Ambiguous {
        commune: CommuneCode,
        candidates: Vec<ZoneId>,
    },

    /// Several zones of the same level cover the point.
    #[error("conflicting {level} zones ({}) from decrees [{}]", join_ids(.zones), .decrees.join(", "))]
    DataConflict {
        level: AlertLevel,
        zones: Vec<ZoneId>,
        decrees: Vec<String>,
    },

    /// An invariant of the prepared data does not hold.
    #[error("data inconsistency: {reason}")]
    DataInconsistency { reason: String },
}

fn join_ids(ids: &[ZoneId]) -> String {
    ids.iter().map(ZoneId::as_str).collect::<Vec<_>>().join(", ")
}

impl LookupError {
    /// Shorthand for `NotFound(NotFound::NoZone)`.
    pub fn no_zone() -> Self {
        Self::NotFound(NotFound::NoZone)
    }

    pub fn inconsistency(reason: impl Into<String>) -> Self {
        Self::DataInconsistency {
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Ambiguous { .. } => ErrorKind::Ambiguous,
            Self::DataConflict { .. } => ErrorKind::DataConflict,
            Self::DataInconsistency { .. } => ErrorKind::DataInconsistency,
        }
    }

    /// HTTP status a serving layer should answer with.
    pub fn http_status(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Ambiguous | ErrorKind::DataConflict => 409,
            ErrorKind::DataInconsistency => 500,
        }
    }

    /// Whether this is a valid empty result rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<NotFound> for LookupError {
    fn from(value: NotFound) -> Self {
        Self::NotFound(value)
    }
}
