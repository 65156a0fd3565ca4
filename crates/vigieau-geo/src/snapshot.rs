//! Snapshot file loading.
//!
//! The data preparation pipeline publishes two collections per refresh:
//! `zones.json` (attribute records) and `zones.geojson` (one polygon feature
//! per zone, `properties.idZone` naming the zone). Department rules and the
//! commune registry are plain JSON arrays.
//!
//! All loaders share the same error reporting: a missing file is
//! [`SnapshotError::FileNotFound`], a parse failure carries the path.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use vigieau_core::{Commune, DepartmentRules, Zone, ZoneId};

use crate::error::{GeometryError, SnapshotError};
use crate::geometry::{Rings, ZoneGeometry};

/// A zone polygon tagged with the zone it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryFeature {
    pub zone_id: ZoneId,
    pub geometry: ZoneGeometry,
}

/// Load a JSON file into a strongly-typed value.
pub fn load_json_typed<T: DeserializeOwned>(path: &Path) -> Result<T, SnapshotError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SnapshotError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            SnapshotError::Io(e)
        }
    })?;
    serde_json::from_str(&content).map_err(|e| SnapshotError::JsonParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load `zones.json`.
pub fn load_zones(path: &Path) -> Result<Vec<Zone>, SnapshotError> {
    load_json_typed(path)
}

/// Load the department rules collection.
pub fn load_department_rules(path: &Path) -> Result<Vec<DepartmentRules>, SnapshotError> {
    load_json_typed(path)
}

/// Load the commune registry.
pub fn load_communes(path: &Path) -> Result<Vec<Commune>, SnapshotError> {
    load_json_typed(path)
}

/// Load `zones.geojson`, in feature order.
///
/// Features without geometry are skipped with a warning; their zones stay
/// reachable through commune lookups only.
pub fn load_geometries(path: &Path) -> Result<Vec<GeometryFeature>, SnapshotError> {
    let collection: FeatureCollection = load_json_typed(path)?;
    collection.into_geometries()
}

/// Parse a GeoJSON FeatureCollection held in memory.
pub fn parse_geometries(geojson: &str) -> Result<Vec<GeometryFeature>, SnapshotError> {
    let collection: FeatureCollection =
        serde_json::from_str(geojson).map_err(|e| SnapshotError::JsonParse {
            path: "<memory>".into(),
            source: e,
        })?;
    collection.into_geometries()
}

// ---------------------------------------------------------------------------
// GeoJSON wire types
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    properties: FeatureProperties,
    geometry: Option<GeoJsonGeometry>,
}

#[derive(Deserialize)]
struct FeatureProperties {
    #[serde(rename = "idZone", deserialize_with = "zone_id_from_string_or_number")]
    id_zone: ZoneId,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum GeoJsonGeometry {
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
}

fn zone_id_from_string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<ZoneId, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(ZoneId::new(s)),
        serde_json::Value::Number(n) => Ok(ZoneId::new(n.to_string())),
        other => Err(serde::de::Error::custom(format!(
            "idZone must be a string or number, got {other}"
        ))),
    }
}

impl FeatureCollection {
    fn into_geometries(self) -> Result<Vec<GeometryFeature>, SnapshotError> {
        let mut geometries = Vec::with_capacity(self.features.len());
        for feature in self.features {
            let zone_id = feature.properties.id_zone;
            let Some(raw) = feature.geometry else {
                tracing::warn!(zone = %zone_id, "feature has no geometry, skipping");
                continue;
            };
            let geometry = raw
                .into_zone_geometry()
                .map_err(|source| SnapshotError::InvalidGeometry {
                    zone: zone_id.clone(),
                    source,
                })?;
            geometries.push(GeometryFeature { zone_id, geometry });
        }
        Ok(geometries)
    }
}

impl GeoJsonGeometry {
    fn into_zone_geometry(self) -> Result<ZoneGeometry, GeometryError> {
        let polygons = match self {
            Self::Polygon { coordinates } => vec![coordinates],
            Self::MultiPolygon { coordinates } => coordinates,
        };
        let mut rings: Rings = Vec::with_capacity(polygons.len());
        for polygon in polygons {
            let mut converted = Vec::with_capacity(polygon.len());
            for ring in polygon {
                let positions = ring
                    .into_iter()
                    .map(to_position)
                    .collect::<Result<Vec<[f64; 2]>, GeometryError>>()?;
                converted.push(positions);
            }
            rings.push(converted);
        }
        ZoneGeometry::from_rings(&rings)
    }
}

/// `[lon, lat]` from a GeoJSON position; a third (altitude) ordinate is ignored.
fn to_position(position: Vec<f64>) -> Result<[f64; 2], GeometryError> {
    match position.as_slice() {
        [lon, lat, ..] => Ok([*lon, *lat]),
        _ => Err(GeometryError::ShortPosition(position.len())),
    }
}
