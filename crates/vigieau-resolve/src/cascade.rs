//! # Severity Cascade
//!
//! Alternative single-zone resolution for a point, used when department
//! rules are not consulted: among the zones containing the point, the one
//! with restricted usages at the highest alert level wins.
//!
//! Two zones with usages at the same highest level are a genuine conflict in
//! the published decrees and are reported with the decree identifiers.

use vigieau_core::{AlertLevel, Coordinates, LookupError, LookupResult, Zone};
use vigieau_geo::{zone_ids, ZoneLocator};

/// Resolve the zone at `point` by descending alert level.
pub fn resolve_by_severity_cascade<L>(locator: &L, point: Coordinates) -> LookupResult<&Zone>
where
    L: ZoneLocator + ?Sized,
{
    let zones = locator.locate_by_point(point);
    if zones.is_empty() {
        return Err(LookupError::no_zone());
    }

    let with_usages: Vec<&Zone> = zones.iter().copied().filter(|z| z.has_usages()).collect();
    if let [zone] = with_usages.as_slice() {
        return Ok(*zone);
    }

    for level in AlertLevel::CASCADE_ORDER {
        let at_level: Vec<&Zone> = with_usages
            .iter()
            .copied()
            .filter(|z| z.alert_level == level)
            .collect();
        match at_level.as_slice() {
            [] => continue,
            [zone] => return Ok(*zone),
            _ => {
                let decrees: Vec<String> = at_level
                    .iter()
                    .filter_map(|z| z.decree_id())
                    .map(str::to_owned)
                    .collect();
                tracing::warn!(
                    lon = point.lon,
                    lat = point.lat,
                    level = %level,
                    decrees = %decrees.join(","),
                    "conflicting zones at the same alert level"
                );
                return Err(LookupError::DataConflict {
                    level,
                    zones: zone_ids(&at_level),
                    decrees,
                });
            }
        }
    }

    if zones
        .iter()
        .all(|z| z.alert_level == AlertLevel::Watch && !z.has_usages())
    {
        return Ok(zones[0]);
    }

    tracing::error!(
        lon = point.lon,
        lat = point.lat,
        zones = zones.len(),
        with_usages = with_usages.len(),
        "severity cascade reached an unreachable state"
    );
    Err(LookupError::inconsistency(format!(
        "unreachable state resolving ({}, {}) over {} zones",
        point.lon,
        point.lat,
        zones.len()
    )))
}
