//! # vigieau-core — Foundational Types for the Zone Engine
//!
//! This crate defines the vocabulary shared by every other crate in the
//! workspace: restriction zones and their alert levels, department rule
//! configuration, the commune registry, validated coordinates, and the
//! typed lookup failures the serving layer maps to responses.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `ZoneId`, `DepartmentCode`,
//!    `CommuneCode`. No bare strings cross crate boundaries.
//!
//! 2. **Single `AlertLevel` enum.** The total order
//!    None < Watch < Alert < HeightenedAlert < Crisis is the `Ord` impl;
//!    scoring and the severity cascade both read it from here.
//!
//! 3. **Tagged failures.** Every lookup failure is a [`LookupError`] variant
//!    with its own structured payload. Nothing is matched by message text.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `vigieau-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Wire field names follow the snapshot files produced by the data
//!   preparation pipeline (`idZone`, `niveauAlerte`, ...).

pub mod commune;
pub mod coordinates;
pub mod department;
pub mod error;
pub mod zone;

// Re-export primary types for ergonomic imports.
pub use commune::{Commune, CommuneCode, CommuneRegistry};
pub use coordinates::Coordinates;
pub use department::{DepartmentCode, DepartmentRules};
pub use error::{ErrorKind, LookupError, LookupResult, NotFound, ValidationError};
pub use zone::{AlertLevel, DecreeRef, Usage, Zone, ZoneId, ZoneType};
