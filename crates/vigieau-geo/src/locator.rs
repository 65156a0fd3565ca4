//! # Point and Commune Locators
//!
//! [`ZoneLocator`] is the seam between lookup and disambiguation: the
//! resolvers in `vigieau-resolve` only need these two queries, and
//! [`ZoneStore`] is the production implementation.
//!
//! The strict variants (`zones_at_point`, `zones_in_commune`) additionally
//! refuse results holding two zones of the same type, the shape the
//! per-type alert level summaries expect.

use vigieau_core::{CommuneCode, Coordinates, LookupError, LookupResult, Zone, ZoneId, ZoneType};

use crate::store::ZoneStore;

/// Point and commune lookup over an immutable zone set.
pub trait ZoneLocator {
    /// Zones whose polygon contains `point` (inclusive boundary), in index
    /// slot order.
    fn locate_by_point(&self, point: Coordinates) -> Vec<&Zone>;

    /// Zones covering the commune, in snapshot order. Unknown code: empty.
    fn locate_by_commune(&self, code: &CommuneCode) -> Vec<&Zone>;
}

impl ZoneLocator for ZoneStore {
    fn locate_by_point(&self, point: Coordinates) -> Vec<&Zone> {
        let mut candidates = self.index().query_point(point);
        candidates.sort_unstable();

        let zones: Vec<&Zone> = candidates
            .into_iter()
            .filter_map(|slot| self.slot(slot))
            .filter(|entry| entry.geometry.contains(point))
            .map(|entry| self.zone_at(entry.zone))
            .collect();

        tracing::debug!(
            lon = point.lon,
            lat = point.lat,
            hits = zones.len(),
            "point lookup"
        );
        zones
    }

    fn locate_by_commune(&self, code: &CommuneCode) -> Vec<&Zone> {
        self.commune_positions(code)
            .iter()
            .map(|&position| self.zone_at(position))
            .collect()
    }
}

impl ZoneStore {
    /// Point lookup refusing two zones of the same type at one point.
    ///
    /// Overlapping same-type polygons mean the prepared data is broken, so
    /// this is a [`LookupError::DataInconsistency`].
    pub fn zones_at_point(&self, point: Coordinates) -> LookupResult<Vec<&Zone>> {
        let zones = self.locate_by_point(point);
        if let Some(zone_type) = repeated_type(&zones) {
            tracing::error!(
                lon = point.lon,
                lat = point.lat,
                zone_type = %zone_type,
                zones = %ids(&zones).join(","),
                "several zones of the same type contain one point"
            );
            return Err(LookupError::inconsistency(format!(
                "several {zone_type} zones contain ({}, {})",
                point.lon, point.lat
            )));
        }
        Ok(zones)
    }

    /// Commune lookup refusing two zones of the same type in one commune.
    ///
    /// Several same-type zones in a commune are legitimate; the caller must
    /// supply an address, hence [`LookupError::Ambiguous`].
    pub fn zones_in_commune(&self, code: &CommuneCode) -> LookupResult<Vec<&Zone>> {
        let zones = self.locate_by_commune(code);
        if repeated_type(&zones).is_some() {
            return Err(LookupError::Ambiguous {
                commune: code.clone(),
                candidates: zones.iter().map(|z| z.id.clone()).collect(),
            });
        }
        Ok(zones)
    }
}

fn repeated_type(zones: &[&Zone]) -> Option<ZoneType> {
    ZoneType::all()
        .into_iter()
        .find(|&t| zones.iter().filter(|z| z.zone_type == t).count() > 1)
}

fn ids(zones: &[&Zone]) -> Vec<String> {
    zones.iter().map(|z| z.id.to_string()).collect()
}

/// Zone ids, for logging and error payloads.
pub fn zone_ids(zones: &[&Zone]) -> Vec<ZoneId> {
    zones.iter().map(|z| z.id.clone()).collect()
}
