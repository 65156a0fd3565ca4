//! # Applicable Zone
//!
//! Reduces the zones relevant to a query to the single zone whose
//! restrictions apply, following the department's display rules.
//!
//! ## Candidate Set
//!
//! Without coordinates the commune's zones are the only information. With
//! coordinates, the zones containing the point are used, unless the
//! department asks for the maximum severity across zone types in a commune,
//! in which case the whole commune set competes and containment only adds a
//! bonus (see [`crate::score`]).
//!
//! ## Outcomes
//!
//! | winners | coordinates | result                    |
//! |---------|-------------|---------------------------|
//! | 0       | any         | `NotFound(NoZone)`        |
//! | 1       | any         | the winner                |
//! | >1      | absent      | `Ambiguous`               |
//! | >1      | present     | `DataInconsistency`       |

use std::collections::HashSet;

use vigieau_core::{
    CommuneCode, Coordinates, DepartmentRules, LookupError, LookupResult, Zone, ZoneId,
};
use vigieau_geo::{zone_ids, ZoneLocator};

use crate::score::score_zone;

/// Select the single applicable zone for a commune, optionally refined by a
/// point inside it.
pub fn compute_applicable_zone<'a, L>(
    locator: &'a L,
    point: Option<Coordinates>,
    commune: &CommuneCode,
    rules: &DepartmentRules,
) -> LookupResult<&'a Zone>
where
    L: ZoneLocator + ?Sized,
{
    let intersecting = match point {
        Some(point) => locator.locate_by_point(point),
        None => Vec::new(),
    };
    let commune_zones = locator.locate_by_commune(commune);
    let priority = rules.priority_type;

    if point.is_none() {
        let contenders: Vec<&Zone> = commune_zones
            .iter()
            .copied()
            .filter(|z| priority.map_or(true, |t| z.zone_type == t))
            .collect();
        if contenders.len() > 1 {
            return Err(LookupError::Ambiguous {
                commune: commune.clone(),
                candidates: zone_ids(&contenders),
            });
        }
    }

    let candidates = if point.is_some() && !rules.max_severity_across_types {
        &intersecting
    } else {
        &commune_zones
    };

    let inside: HashSet<&ZoneId> = intersecting.iter().map(|z| &z.id).collect();
    let scored: Vec<(&Zone, _)> = candidates
        .iter()
        .map(|&z| (z, score_zone(z, inside.contains(&z.id), priority)))
        .collect();
    let Some(best) = scored.iter().map(|(_, s)| *s).max() else {
        return Err(LookupError::no_zone());
    };
    let winners: Vec<&Zone> = scored
        .iter()
        .filter(|(_, s)| *s == best)
        .map(|(z, _)| *z)
        .collect();

    match (winners.as_slice(), point) {
        ([zone], _) => {
            tracing::debug!(
                commune = %commune,
                zone = %zone.id,
                score = %best,
                "applicable zone"
            );
            Ok(*zone)
        }
        (_, None) => Err(LookupError::Ambiguous {
            commune: commune.clone(),
            candidates: zone_ids(&winners),
        }),
        (_, Some(point)) => {
            let ids: Vec<&str> = winners.iter().map(|z| z.id.as_str()).collect();
            tracing::error!(
                commune = %commune,
                lon = point.lon,
                lat = point.lat,
                score = %best,
                zones = %ids.join(","),
                "several zones tie for the applicable zone at a point"
            );
            Err(LookupError::inconsistency(format!(
                "zones {} tie at ({}, {}) in commune {commune}",
                ids.join(", "),
                point.lon,
                point.lat
            )))
        }
    }
}
