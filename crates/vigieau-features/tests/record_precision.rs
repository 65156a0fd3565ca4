//! Quantization error stays within the stated bound for arbitrary rings.

use proptest::prelude::*;
use vigieau_core::{AlertLevel, DepartmentCode, Zone, ZoneId, ZoneType};
use vigieau_features::record::{decode, encode};
use vigieau_features::{Feature, MAX_COORDINATE_ERROR};
use vigieau_geo::ZoneGeometry;

fn ring() -> impl Strategy<Value = Vec<[f64; 2]>> {
    prop::collection::vec((-5.2f64..8.2, 42.2f64..50.7), 3..40).prop_map(|points| {
        let mut ring: Vec<[f64; 2]> = points.into_iter().map(|(lon, lat)| [lon, lat]).collect();
        ring.push(ring[0]);
        ring
    })
}

proptest! {
    #[test]
    fn decoded_positions_are_within_bound(ring in ring()) {
        let feature = Feature {
            attributes: Zone {
                id: ZoneId::new("p"),
                zone_type: ZoneType::Surface,
                name: None,
                department: DepartmentCode::new("01"),
                alert_level: AlertLevel::Watch,
                usages: Vec::new(),
                communes: Vec::new(),
                decree: None,
            },
            geometry: ZoneGeometry::from_rings(&[vec![ring.clone()]]).unwrap(),
        };
        let decoded = decode(0, &encode(&feature).unwrap()).unwrap();
        let rings = decoded.geometry.to_rings();
        let decoded_ring = &rings[0][0];
        prop_assert_eq!(decoded_ring.len(), ring.len());
        for (a, b) in ring.iter().zip(decoded_ring) {
            prop_assert!((a[0] - b[0]).abs() <= MAX_COORDINATE_ERROR + 1e-12);
            prop_assert!((a[1] - b[1]).abs() <= MAX_COORDINATE_ERROR + 1e-12);
        }
    }
}
