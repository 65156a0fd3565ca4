//! # Zone Scoring
//!
//! Candidate score for single-winner resolution:
//!
//! ```text
//! score = 10   if zone type is the department's priority type
//!       + rank(alert level)          Crisis 5 … Watch 2, other 1
//!       + 1    if the zone contains the queried point
//!       + 0.1  if the zone is groundwater
//! ```
//!
//! Type priority dominates severity; severity dominates containment;
//! the groundwater bonus only separates otherwise exact ties.
//!
//! Scores are held in tenths as integers so equal scores compare equal.

use std::fmt;

use vigieau_core::{Zone, ZoneType};

const PRIORITY_BONUS: u32 = 100;
const RANK_UNIT: u32 = 10;
const INTERSECTION_BONUS: u32 = 10;
const GROUNDWATER_BONUS: u32 = 1;

/// Candidate score, in tenths of a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZoneScore(u32);

impl ZoneScore {
    pub fn tenths(self) -> u32 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 10.0
    }
}

impl fmt::Display for ZoneScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

/// Score a candidate zone.
pub fn score_zone(zone: &Zone, intersecting: bool, priority: Option<ZoneType>) -> ZoneScore {
    let mut score = u32::from(zone.alert_level.rank()) * RANK_UNIT;
    if priority == Some(zone.zone_type) {
        score += PRIORITY_BONUS;
    }
    if intersecting {
        score += INTERSECTION_BONUS;
    }
    if zone.zone_type == ZoneType::Groundwater {
        score += GROUNDWATER_BONUS;
    }
    ZoneScore(score)
}
