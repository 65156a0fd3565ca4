//! # Resolver
//!
//! Snapshot-level entry point: owns the zone store, the department rules and
//! the commune registry, and answers the high-level queries that need all
//! three. Immutable once built; share it by reference across threads.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use vigieau_core::{
    AlertLevel, Commune, CommuneCode, CommuneRegistry, Coordinates, DepartmentCode,
    DepartmentRules, LookupError, LookupResult, NotFound, Zone, ZoneId,
};
use vigieau_geo::{snapshot, SnapshotError, ZoneLocator, ZoneStore};

use crate::applicable::compute_applicable_zone;
use crate::cascade::resolve_by_severity_cascade;
use crate::levels::{individual_levels, levels_by_type, AlertLevelQuery, AlertLevels, Profile};

/// Locations of the four snapshot files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotPaths {
    pub zones: PathBuf,
    pub geometries: PathBuf,
    pub rules: PathBuf,
    pub communes: PathBuf,
}

impl SnapshotPaths {
    pub const ZONES: &'static str = "zones.json";
    pub const GEOMETRIES: &'static str = "zones.geojson";
    pub const RULES: &'static str = "regles-gestion.json";
    pub const COMMUNES: &'static str = "communes.json";

    /// Default file names inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            zones: dir.join(Self::ZONES),
            geometries: dir.join(Self::GEOMETRIES),
            rules: dir.join(Self::RULES),
            communes: dir.join(Self::COMMUNES),
        }
    }
}

/// Maximum alert level of one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentSummary {
    pub code: DepartmentCode,
    #[serde(rename = "nom")]
    pub name: Option<String>,
    /// Absent when no zone belongs to the department.
    #[serde(rename = "niveauGraviteMax")]
    pub max_alert_level: Option<AlertLevel>,
}

#[derive(Debug)]
pub struct Resolver {
    store: ZoneStore,
    rules: Vec<DepartmentRules>,
    rules_by_code: HashMap<DepartmentCode, usize>,
    communes: CommuneRegistry,
}

impl Resolver {
    pub fn new(
        store: ZoneStore,
        rules: impl IntoIterator<Item = DepartmentRules>,
        communes: CommuneRegistry,
    ) -> Self {
        let rules: Vec<DepartmentRules> = rules.into_iter().collect();
        let mut rules_by_code = HashMap::with_capacity(rules.len());
        for (position, rule) in rules.iter().enumerate() {
            if rules_by_code.insert(rule.code.clone(), position).is_some() {
                tracing::warn!(department = %rule.code, "duplicate department rules, keeping the last");
            }
        }
        let invalid = rules.iter().filter(|r| !r.valid).count();
        if invalid > 0 {
            tracing::warn!(departments = invalid, "department rules flagged as not valid");
        }

        tracing::info!(
            departments = rules.len(),
            communes = communes.len(),
            zones = store.zone_count(),
            "resolver ready"
        );

        Self {
            store,
            rules,
            rules_by_code,
            communes,
        }
    }

    /// Load the four snapshot files and build the resolver.
    pub fn load(paths: &SnapshotPaths) -> Result<Self, SnapshotError> {
        let store = ZoneStore::load(&paths.zones, &paths.geometries)?;
        let rules = snapshot::load_department_rules(&paths.rules)?;
        let communes = CommuneRegistry::from_communes(snapshot::load_communes(&paths.communes)?);
        Ok(Self::new(store, rules, communes))
    }

    pub fn store(&self) -> &ZoneStore {
        &self.store
    }

    pub fn department_rules(&self, code: &DepartmentCode) -> Option<&DepartmentRules> {
        self.rules_by_code.get(code).map(|&i| &self.rules[i])
    }

    pub fn commune(&self, code: &CommuneCode) -> LookupResult<&Commune> {
        self.communes
            .get(code)
            .ok_or_else(|| NotFound::UnknownCommune(code.clone()).into())
    }

    pub fn zone(&self, id: &ZoneId) -> LookupResult<&Zone> {
        self.store
            .zone(id)
            .ok_or_else(|| NotFound::UnknownZone(id.clone()).into())
    }

    /// The single zone whose restrictions apply in `commune`, refined by
    /// `point` when given.
    pub fn applicable_zone(
        &self,
        point: Option<Coordinates>,
        commune: &CommuneCode,
    ) -> LookupResult<&Zone> {
        let department = &self.commune(commune)?.department;
        let rules = self
            .department_rules(department)
            .ok_or_else(|| LookupError::from(NotFound::UnknownDepartment(department.clone())))?;
        compute_applicable_zone(&self.store, point, commune, rules)
    }

    /// The zone at `point` by descending alert level.
    pub fn cascade(&self, point: Coordinates) -> LookupResult<&Zone> {
        resolve_by_severity_cascade(&self.store, point)
    }

    pub fn alert_levels(&self, query: &AlertLevelQuery) -> LookupResult<AlertLevels> {
        if query.profile == Profile::Individual {
            return individual_levels(self.applicable_zone(query.point, &query.commune));
        }
        let zones = match query.point {
            Some(point) => self.store.zones_at_point(point)?,
            None => self.store.zones_in_commune(&query.commune)?,
        };
        Ok(levels_by_type(&zones, &query.zone_types))
    }

    /// Maximum alert level per department, in rule order.
    pub fn department_summaries(&self) -> Vec<DepartmentSummary> {
        let mut max_levels: HashMap<&DepartmentCode, AlertLevel> = HashMap::new();
        for zone in self.store.zones() {
            let level = max_levels.entry(&zone.department).or_insert(zone.alert_level);
            *level = (*level).max(zone.alert_level);
        }

        self.rules
            .iter()
            .enumerate()
            .filter(|(position, rule)| self.rules_by_code.get(&rule.code) == Some(position))
            .map(|(_, rule)| DepartmentSummary {
                code: rule.code.clone(),
                name: rule.name.clone(),
                max_alert_level: max_levels.get(&rule.code).copied(),
            })
            .collect()
    }
}

impl ZoneLocator for Resolver {
    fn locate_by_point(&self, point: Coordinates) -> Vec<&Zone> {
        self.store.locate_by_point(point)
    }

    fn locate_by_commune(&self, code: &CommuneCode) -> Vec<&Zone> {
        self.store.locate_by_commune(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigieau_core::{ErrorKind, ZoneType};

    fn zone(id: &str, department: &str, alert_level: AlertLevel, communes: &[&str]) -> Zone {
        Zone {
            id: ZoneId::new(id),
            zone_type: ZoneType::Surface,
            name: None,
            department: DepartmentCode::new(department),
            alert_level,
            usages: Vec::new(),
            communes: communes.iter().map(|c| CommuneCode::new(c).unwrap()).collect(),
            decree: None,
        }
    }

    fn commune(code: &str, department: &str) -> Commune {
        Commune {
            code: CommuneCode::new(code).unwrap(),
            department: DepartmentCode::new(department),
            name: code.to_string(),
        }
    }

    fn resolver() -> Resolver {
        let store = ZoneStore::build(
            vec![
                zone("a", "01", AlertLevel::Watch, &["01001"]),
                zone("b", "01", AlertLevel::Crisis, &["01002"]),
                zone("c", "02", AlertLevel::Alert, &["02001"]),
            ],
            Vec::new(),
        )
        .unwrap();
        let rules = vec![
            DepartmentRules::new(DepartmentCode::new("01")),
            DepartmentRules::new(DepartmentCode::new("02")),
            DepartmentRules::new(DepartmentCode::new("03")),
        ];
        let communes = CommuneRegistry::from_communes(vec![
            commune("01001", "01"),
            commune("01002", "01"),
            commune("02001", "02"),
            commune("04001", "04"),
        ]);
        Resolver::new(store, rules, communes)
    }

    #[test]
    fn unknown_commune_and_department_are_typed() {
        let resolver = resolver();

        let err = resolver
            .applicable_zone(None, &CommuneCode::new("99999").unwrap())
            .unwrap_err();
        assert!(matches!(err, LookupError::NotFound(NotFound::UnknownCommune(_))));

        let err = resolver
            .applicable_zone(None, &CommuneCode::new("04001").unwrap())
            .unwrap_err();
        assert!(matches!(err, LookupError::NotFound(NotFound::UnknownDepartment(ref d)) if d.as_str() == "04"));
        assert_eq!(err.http_status(), 404);
    }

    #[test]
    fn commune_only_resolution() {
        let resolver = resolver();
        let found = resolver
            .applicable_zone(None, &CommuneCode::new("01002").unwrap())
            .unwrap();
        assert_eq!(found.id.as_str(), "b");
    }

    #[test]
    fn unknown_zone_is_not_found() {
        let err = resolver().zone(&ZoneId::new("zz")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn summaries_report_max_severity_per_department() {
        let summaries = resolver().department_summaries();
        let levels: Vec<(&str, Option<AlertLevel>)> = summaries
            .iter()
            .map(|s| (s.code.as_str(), s.max_alert_level))
            .collect();
        assert_eq!(
            levels,
            vec![
                ("01", Some(AlertLevel::Crisis)),
                ("02", Some(AlertLevel::Alert)),
                ("03", None),
            ]
        );
    }

    #[test]
    fn snapshot_paths_use_default_names() {
        let paths = SnapshotPaths::in_dir(Path::new("/data"));
        assert_eq!(paths.rules, PathBuf::from("/data/regles-gestion.json"));
        assert_eq!(paths.geometries, PathBuf::from("/data/zones.geojson"));
    }
}
