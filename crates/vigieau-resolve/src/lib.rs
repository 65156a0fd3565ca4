//! # vigieau-resolve — Disambiguation Engine
//!
//! Zones of both types overlap, and communes straddle zone boundaries, so a
//! point or commune lookup usually returns several zones. This crate reduces
//! them to the answer a user should see.
//!
//! ## Strategies
//!
//! - [`compute_applicable_zone`]: single winner by score, honouring the
//!   department's type priority and max-severity rule.
//! - [`resolve_by_severity_cascade`]: single winner at a point by descending
//!   alert level among zones with restricted usages.
//! - [`Resolver::alert_levels`]: one level per profile or per zone type.
//! - [`Resolver::department_summaries`]: maximum level per department.
//!
//! Both strategies are generic over [`vigieau_geo::ZoneLocator`], so they
//! run against the production [`vigieau_geo::ZoneStore`] or an in-memory
//! double in tests.

pub mod applicable;
pub mod cascade;
pub mod levels;
pub mod resolver;
pub mod score;

pub use applicable::compute_applicable_zone;
pub use cascade::resolve_by_severity_cascade;
pub use levels::{AlertLevelQuery, AlertLevels, Profile};
pub use resolver::{DepartmentSummary, Resolver, SnapshotPaths};
pub use score::{score_zone, ZoneScore};
