//! # Zone Store
//!
//! The immutable handle every lookup goes through. Built once per snapshot
//! from the attribute records and the zone polygons:
//!
//! - slot *i* of the spatial index is geometry *i*, and each slot records the
//!   id of the zone it was built from, so attributes are joined by id and
//!   never by position;
//! - the commune → zones mapping is precomputed from each zone's commune
//!   list, keeping snapshot order.
//!
//! Replacing the data means building a new store; there is no mutation API.

use std::collections::HashMap;
use std::path::Path;

use vigieau_core::{CommuneCode, Zone, ZoneId};

use crate::error::SnapshotError;
use crate::geometry::ZoneGeometry;
use crate::index::{Slot, SpatialIndex};
use crate::snapshot::{self, GeometryFeature};

/// One index slot: the zone it belongs to and its polygon.
#[derive(Debug)]
pub(crate) struct SlotEntry {
    pub(crate) zone_id: ZoneId,
    pub(crate) zone: usize,
    pub(crate) geometry: ZoneGeometry,
}

/// Zones, polygons, spatial index and commune mapping for one snapshot.
#[derive(Debug)]
pub struct ZoneStore {
    zones: Vec<Zone>,
    by_id: HashMap<ZoneId, usize>,
    slots: Vec<SlotEntry>,
    index: SpatialIndex,
    by_commune: HashMap<CommuneCode, Vec<usize>>,
}

impl ZoneStore {
    /// Build the store from attribute records and geometries.
    ///
    /// Fails when a geometry names an unknown zone, when a zone has two
    /// geometries, or when two attribute records share an id. Zones without
    /// geometry are kept: commune lookups still reach them.
    pub fn build(zones: Vec<Zone>, geometries: Vec<GeometryFeature>) -> Result<Self, SnapshotError> {
        let mut by_id = HashMap::with_capacity(zones.len());
        for (position, zone) in zones.iter().enumerate() {
            if by_id.insert(zone.id.clone(), position).is_some() {
                return Err(SnapshotError::DuplicateZone {
                    zone: zone.id.clone(),
                });
            }
        }

        let mut slots = Vec::with_capacity(geometries.len());
        let mut has_geometry = vec![false; zones.len()];
        for feature in geometries {
            let Some(&zone) = by_id.get(&feature.zone_id) else {
                return Err(SnapshotError::MissingAttributes {
                    zone: feature.zone_id,
                });
            };
            if std::mem::replace(&mut has_geometry[zone], true) {
                return Err(SnapshotError::DuplicateGeometry {
                    zone: feature.zone_id,
                });
            }
            slots.push(SlotEntry {
                zone_id: feature.zone_id,
                zone,
                geometry: feature.geometry,
            });
        }

        let without_geometry = has_geometry.iter().filter(|present| !**present).count();
        if without_geometry > 0 {
            tracing::warn!(
                zones = without_geometry,
                "zones without geometry are reachable by commune only"
            );
        }

        let index = SpatialIndex::from_geometries(slots.iter().map(|s| &s.geometry));

        let mut by_commune: HashMap<CommuneCode, Vec<usize>> = HashMap::new();
        for (position, zone) in zones.iter().enumerate() {
            for commune in &zone.communes {
                by_commune.entry(commune.clone()).or_default().push(position);
            }
        }

        tracing::info!(
            zones = zones.len(),
            geometries = slots.len(),
            communes = by_commune.len(),
            "zone store built"
        );

        Ok(Self {
            zones,
            by_id,
            slots,
            index,
            by_commune,
        })
    }

    /// Load `zones.json` and `zones.geojson` and build the store.
    pub fn load(zones_path: &Path, geometries_path: &Path) -> Result<Self, SnapshotError> {
        let zones = snapshot::load_zones(zones_path)?;
        let geometries = snapshot::load_geometries(geometries_path)?;
        Self::build(zones, geometries)
    }

    /// Zone by id.
    pub fn zone(&self, id: &ZoneId) -> Option<&Zone> {
        self.by_id.get(id).map(|&i| &self.zones[i])
    }

    /// All zones, in snapshot order.
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Polygon of a zone, if it has one.
    pub fn geometry(&self, id: &ZoneId) -> Option<&ZoneGeometry> {
        self.slots
            .iter()
            .find(|slot| &slot.zone_id == id)
            .map(|slot| &slot.geometry)
    }

    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    /// Number of polygons, equal to the index slot count.
    pub fn geometry_count(&self) -> usize {
        self.slots.len()
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    pub(crate) fn slot(&self, slot: Slot) -> Option<&SlotEntry> {
        self.slots.get(slot)
    }

    pub(crate) fn zone_at(&self, position: usize) -> &Zone {
        &self.zones[position]
    }

    pub(crate) fn commune_positions(&self, code: &CommuneCode) -> &[usize] {
        self.by_commune.get(code).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigieau_core::{AlertLevel, DepartmentCode, ZoneType};

    fn zone(id: &str, communes: &[&str]) -> Zone {
        Zone {
            id: ZoneId::new(id),
            zone_type: ZoneType::Surface,
            name: None,
            department: DepartmentCode::new("30"),
            alert_level: AlertLevel::Alert,
            usages: Vec::new(),
            communes: communes.iter().map(|c| CommuneCode::new(c).unwrap()).collect(),
            decree: None,
        }
    }

    fn feature(id: &str, min: f64, max: f64) -> GeometryFeature {
        let ring = vec![[min, min], [max, min], [max, max], [min, max], [min, min]];
        GeometryFeature {
            zone_id: ZoneId::new(id),
            geometry: ZoneGeometry::from_rings(&[vec![ring]]).unwrap(),
        }
    }

    #[test]
    fn slots_match_geometry_count() {
        let store = ZoneStore::build(
            vec![zone("a", &[]), zone("b", &[]), zone("c", &[])],
            vec![feature("b", 0.0, 1.0), feature("a", 2.0, 3.0)],
        )
        .unwrap();

        assert_eq!(store.zone_count(), 3);
        assert_eq!(store.geometry_count(), 2);
        assert_eq!(store.index().len(), 2);
        assert_eq!(store.slot(0).unwrap().zone_id.as_str(), "b");
        assert_eq!(store.zone_at(store.slot(0).unwrap().zone).id.as_str(), "b");
        assert!(store.geometry(&ZoneId::new("c")).is_none());
    }

    #[test]
    fn geometry_without_attributes_is_rejected() {
        let err = ZoneStore::build(vec![zone("a", &[])], vec![feature("z", 0.0, 1.0)]).unwrap_err();
        assert!(matches!(err, SnapshotError::MissingAttributes { zone } if zone.as_str() == "z"));
    }

    #[test]
    fn duplicate_geometry_is_rejected() {
        let err = ZoneStore::build(
            vec![zone("a", &[])],
            vec![feature("a", 0.0, 1.0), feature("a", 2.0, 3.0)],
        )
        .unwrap_err();
        assert!(matches!(err, SnapshotError::DuplicateGeometry { .. }));
    }

    #[test]
    fn duplicate_zone_is_rejected() {
        let err = ZoneStore::build(vec![zone("a", &[]), zone("a", &[])], Vec::new()).unwrap_err();
        assert!(matches!(err, SnapshotError::DuplicateZone { .. }));
    }

    #[test]
    fn commune_mapping_keeps_snapshot_order() {
        let store = ZoneStore::build(
            vec![zone("a", &["30189"]), zone("b", &["30189", "30007"])],
            Vec::new(),
        )
        .unwrap();
        let code = CommuneCode::new("30189").unwrap();
        assert_eq!(store.commune_positions(&code), &[0, 1]);
        assert!(store
            .commune_positions(&CommuneCode::new("99999").unwrap())
            .is_empty());
    }

    #[test]
    fn empty_snapshot_builds_empty_store() {
        let store = ZoneStore::build(Vec::new(), Vec::new()).unwrap();
        assert_eq!(store.zone_count(), 0);
        assert!(store.index().is_empty());
    }
}
