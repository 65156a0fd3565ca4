//! # Resolution Scenarios
//!
//! End-to-end checks over a real [`ZoneStore`]: polygons go through the
//! spatial index and the exact containment test before disambiguation.

use vigieau_core::{
    AlertLevel, Commune, CommuneCode, CommuneRegistry, Coordinates, DecreeRef, DepartmentCode,
    DepartmentRules, ErrorKind, LookupError, Usage, Zone, ZoneId, ZoneType,
};
use vigieau_geo::{GeometryFeature, ZoneGeometry, ZoneStore};
use vigieau_resolve::{AlertLevelQuery, Profile, Resolver};

const DEPARTMENT: &str = "12";
const COMMUNE: &str = "12345";

struct ZoneFixture {
    id: &'static str,
    zone_type: ZoneType,
    level: AlertLevel,
    usages: bool,
    /// `[min_lon, min_lat, max_lon, max_lat]` of a square polygon.
    square: [f64; 4],
}

fn build(fixtures: &[ZoneFixture], rules: DepartmentRules) -> Resolver {
    let mut zones = Vec::new();
    let mut geometries = Vec::new();
    for fixture in fixtures {
        zones.push(Zone {
            id: ZoneId::new(fixture.id),
            zone_type: fixture.zone_type,
            name: Some(format!("Zone {}", fixture.id)),
            department: DepartmentCode::new(DEPARTMENT),
            alert_level: fixture.level,
            usages: if fixture.usages {
                vec![Usage {
                    usage: "Remplissage des piscines".into(),
                    restriction_level: Some("Interdiction".into()),
                    ..Usage::default()
                }]
            } else {
                Vec::new()
            },
            communes: vec![CommuneCode::new(COMMUNE).unwrap()],
            decree: Some(DecreeRef {
                id: format!("arrete-{}", fixture.id),
                valid_from: Some("2026-07-01".into()),
                valid_until: None,
                file_path: None,
                framework_file_path: None,
            }),
        });
        let [x0, y0, x1, y1] = fixture.square;
        let ring = vec![[x0, y0], [x1, y0], [x1, y1], [x0, y1], [x0, y0]];
        geometries.push(GeometryFeature {
            zone_id: ZoneId::new(fixture.id),
            geometry: ZoneGeometry::from_rings(&[vec![ring]]).unwrap(),
        });
    }

    let store = ZoneStore::build(zones, geometries).unwrap();
    let communes = CommuneRegistry::from_communes(vec![Commune {
        code: CommuneCode::new(COMMUNE).unwrap(),
        department: DepartmentCode::new(DEPARTMENT),
        name: "Villefranche".into(),
    }]);
    Resolver::new(store, vec![rules], communes)
}

fn rules() -> DepartmentRules {
    DepartmentRules::new(DepartmentCode::new(DEPARTMENT))
}

fn commune() -> CommuneCode {
    CommuneCode::new(COMMUNE).unwrap()
}

#[test]
fn surface_priority_beats_more_severe_groundwater() {
    let resolver = build(
        &[
            ZoneFixture {
                id: "sup",
                zone_type: ZoneType::Surface,
                level: AlertLevel::Alert,
                usages: true,
                square: [2.0, 44.0, 2.5, 44.5],
            },
            ZoneFixture {
                id: "sou",
                zone_type: ZoneType::Groundwater,
                level: AlertLevel::Crisis,
                usages: true,
                square: [2.0, 44.0, 2.5, 44.5],
            },
        ],
        rules().with_priority(Some(ZoneType::Surface)),
    );

    let zone = resolver.applicable_zone(None, &commune()).unwrap();
    assert_eq!(zone.id.as_str(), "sup");
    assert_eq!(zone.alert_level, AlertLevel::Alert);
}

#[test]
fn two_equal_surface_zones_without_coordinates_are_ambiguous() {
    let resolver = build(
        &[
            ZoneFixture {
                id: "north",
                zone_type: ZoneType::Surface,
                level: AlertLevel::Alert,
                usages: true,
                square: [2.0, 44.5, 2.5, 45.0],
            },
            ZoneFixture {
                id: "south",
                zone_type: ZoneType::Surface,
                level: AlertLevel::Alert,
                usages: true,
                square: [2.0, 44.0, 2.5, 44.5],
            },
        ],
        rules().with_priority(Some(ZoneType::Surface)),
    );

    let err = resolver.applicable_zone(None, &commune()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Ambiguous);
    assert_eq!(err.http_status(), 409);
    match err {
        LookupError::Ambiguous { commune, candidates } => {
            assert_eq!(commune.as_str(), COMMUNE);
            assert_eq!(candidates, vec![ZoneId::new("north"), ZoneId::new("south")]);
        }
        other => panic!("expected Ambiguous, got {other:?}"),
    }

    // An address inside one of them settles it.
    let zone = resolver
        .applicable_zone(Some(Coordinates::new(2.25, 44.75).unwrap()), &commune())
        .unwrap();
    assert_eq!(zone.id.as_str(), "north");
}

fn three_surface_zones(rules: DepartmentRules) -> Resolver {
    build(
        &[
            ZoneFixture {
                id: "west",
                zone_type: ZoneType::Surface,
                level: AlertLevel::Watch,
                usages: true,
                square: [1.0, 44.0, 1.5, 44.5],
            },
            ZoneFixture {
                id: "centre",
                zone_type: ZoneType::Surface,
                level: AlertLevel::Watch,
                usages: true,
                square: [1.5, 44.0, 2.0, 44.5],
            },
            ZoneFixture {
                id: "east",
                zone_type: ZoneType::Surface,
                level: AlertLevel::Watch,
                usages: true,
                square: [2.0, 44.0, 2.5, 44.5],
            },
        ],
        rules,
    )
}

#[test]
fn intersecting_zone_wins_among_same_type_commune_zones() {
    let inside_centre = Some(Coordinates::new(1.75, 44.25).unwrap());

    let resolver = three_surface_zones(rules());
    let zone = resolver.applicable_zone(inside_centre, &commune()).unwrap();
    assert_eq!(zone.id.as_str(), "centre");

    // With the whole commune competing, containment is the tie-breaker.
    let resolver = three_surface_zones(rules().with_max_severity_across_types(true));
    let zone = resolver.applicable_zone(inside_centre, &commune()).unwrap();
    assert_eq!(zone.id.as_str(), "centre");
}

#[test]
fn shared_edge_point_is_a_data_inconsistency() {
    // Containment is boundary inclusive: x = 1.5 lies in both west and centre.
    let resolver = three_surface_zones(rules());
    let err = resolver
        .applicable_zone(Some(Coordinates::new(1.5, 44.25).unwrap()), &commune())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DataInconsistency);
    assert_eq!(err.http_status(), 500);
}

#[test]
fn resolver_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Resolver>();

    let resolver = three_surface_zones(rules());
    let inside_centre = Some(Coordinates::new(1.75, 44.25).unwrap());
    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let zone = resolver.applicable_zone(inside_centre, &commune()).unwrap();
                assert_eq!(zone.id.as_str(), "centre");
            });
        }
    });
}

#[test]
fn cascade_picks_crisis_over_watch_zones() {
    let resolver = build(
        &[
            ZoneFixture {
                id: "watch-with-usages",
                zone_type: ZoneType::Surface,
                level: AlertLevel::Watch,
                usages: true,
                square: [3.0, 45.0, 4.0, 46.0],
            },
            ZoneFixture {
                id: "crisis",
                zone_type: ZoneType::Groundwater,
                level: AlertLevel::Crisis,
                usages: true,
                square: [3.0, 45.0, 4.0, 46.0],
            },
            ZoneFixture {
                id: "watch-bare",
                zone_type: ZoneType::Surface,
                level: AlertLevel::Watch,
                usages: false,
                square: [3.2, 45.2, 3.8, 45.8],
            },
        ],
        rules(),
    );

    let zone = resolver
        .cascade(Coordinates::new(3.5, 45.5).unwrap())
        .unwrap();
    assert_eq!(zone.id.as_str(), "crisis");
    assert_eq!(zone.decree_id(), Some("arrete-crisis"));
}

#[test]
fn alert_levels_per_profile() {
    let resolver = build(
        &[
            ZoneFixture {
                id: "sup",
                zone_type: ZoneType::Surface,
                level: AlertLevel::HeightenedAlert,
                usages: true,
                square: [2.0, 44.0, 2.5, 44.5],
            },
            ZoneFixture {
                id: "sou",
                zone_type: ZoneType::Groundwater,
                level: AlertLevel::Watch,
                usages: true,
                square: [2.0, 44.0, 3.0, 45.0],
            },
        ],
        rules().with_priority(Some(ZoneType::Groundwater)),
    );

    let individual = resolver
        .alert_levels(&AlertLevelQuery {
            point: Some(Coordinates::new(2.25, 44.25).unwrap()),
            commune: commune(),
            profile: Profile::Individual,
            zone_types: Vec::new(),
        })
        .unwrap();
    assert_eq!(individual.individual, Some(AlertLevel::Watch));
    assert_eq!(individual.zones, vec![ZoneId::new("sou")]);

    let farm = resolver
        .alert_levels(&AlertLevelQuery {
            point: Some(Coordinates::new(2.25, 44.25).unwrap()),
            commune: commune(),
            profile: Profile::Farm,
            zone_types: vec![ZoneType::Surface, ZoneType::Groundwater],
        })
        .unwrap();
    assert_eq!(farm.individual, None);
    assert_eq!(farm.surface, Some(AlertLevel::HeightenedAlert));
    assert_eq!(farm.groundwater, Some(AlertLevel::Watch));
    assert_eq!(farm.zones, vec![ZoneId::new("sup"), ZoneId::new("sou")]);

    // Outside the surface zone only groundwater is reported.
    let business = resolver
        .alert_levels(&AlertLevelQuery {
            point: Some(Coordinates::new(2.75, 44.75).unwrap()),
            commune: commune(),
            profile: Profile::Business,
            zone_types: vec![ZoneType::Surface, ZoneType::Groundwater],
        })
        .unwrap();
    assert_eq!(business.surface, Some(AlertLevel::None));
    assert_eq!(business.groundwater, Some(AlertLevel::Watch));
    assert_eq!(business.zones, vec![ZoneId::new("sou")]);
}

#[test]
fn alert_levels_for_individual_outside_every_zone() {
    let resolver = three_surface_zones(rules());
    let levels = resolver
        .alert_levels(&AlertLevelQuery {
            point: Some(Coordinates::new(5.0, 47.0).unwrap()),
            commune: commune(),
            profile: Profile::Individual,
            zone_types: Vec::new(),
        })
        .unwrap();
    assert_eq!(levels.individual, Some(AlertLevel::None));
    assert!(levels.zones.is_empty());
}

#[test]
fn resolver_loads_a_snapshot_directory() {
    use vigieau_resolve::SnapshotPaths;

    let dir = tempfile::tempdir().unwrap();
    let paths = SnapshotPaths::in_dir(dir.path());
    let write = |path: &std::path::Path, value: serde_json::Value| {
        std::fs::write(path, value.to_string()).unwrap();
    };

    write(
        &paths.zones,
        serde_json::json!([
            {"idZone": "7001", "type": "SUP", "departement": "12", "niveauAlerte": "Crise",
             "communes": ["12345"], "usages": [{"usage": "Arrosage des pelouses"}]}
        ]),
    );
    write(
        &paths.geometries,
        serde_json::json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {"idZone": 7001},
                "geometry": {"type": "Polygon",
                             "coordinates": [[[2.0, 44.0], [3.0, 44.0], [3.0, 45.0], [2.0, 45.0], [2.0, 44.0]]]}
            }]
        }),
    );
    write(
        &paths.rules,
        serde_json::json!([
            {"code": "12", "nom": "Aveyron",
             "affichageRestrictionSiSuperpositionTypeZone": "Affichage Prio Eau Sup"}
        ]),
    );
    write(
        &paths.communes,
        serde_json::json!([
            {"code": "12345", "departement": "12", "nom": "Villefranche"},
            {"code": "75056", "departement": "75", "nom": "Paris"}
        ]),
    );

    let resolver = Resolver::load(&paths).unwrap();
    assert!(resolver
        .commune(&CommuneCode::new("75056").unwrap())
        .is_err());

    let zone = resolver
        .applicable_zone(Some(Coordinates::new(2.5, 44.5).unwrap()), &commune())
        .unwrap();
    assert_eq!(zone.id.as_str(), "7001");
    assert_eq!(zone.alert_level, AlertLevel::Crisis);

    let summaries = resolver.department_summaries();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].name.as_deref(), Some("Aveyron"));
    assert_eq!(summaries[0].max_alert_level, Some(AlertLevel::Crisis));
}
