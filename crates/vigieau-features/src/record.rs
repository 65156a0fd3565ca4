//! # Feature Records
//!
//! One record per index slot: the zone's attributes and its polygon.
//!
//! ## Wire Format
//!
//! `bitcode`-encoded [`WireRecord`]:
//!
//! ```text
//! attributes: JSON of the zone record
//! polygons:   [ rings: [ lon: [i64], lat: [i64] ] ]
//! ```
//!
//! Ordinates are quantized to 1e-7 degree. Within a ring the first position
//! is absolute and every following one is the delta from its predecessor,
//! which keeps bitcode's integer packing tight for dense boundaries.
//!
//! ## Precision
//!
//! Decoded ordinates are within [`MAX_COORDINATE_ERROR`] of the input.
//! Attributes round-trip exactly.

use bitcode::{Decode, Encode};
use vigieau_core::Zone;
use vigieau_geo::geometry::Rings;
use vigieau_geo::{GeometryError, GeometryFeature, ZoneGeometry};

use crate::error::{FeatureStoreError, FeatureStoreResult};

/// Quantization steps per degree.
pub const COORDINATE_SCALE: f64 = 1e7;

/// Largest distance, in degrees, between an encoded and a decoded ordinate.
pub const MAX_COORDINATE_ERROR: f64 = 0.5 / COORDINATE_SCALE;

/// Attributes stored with each feature: the full zone record.
pub type FeatureAttributes = Zone;

/// A zone's attributes and polygon, as written to the store.
#[derive(Debug, Clone)]
pub struct Feature {
    pub attributes: FeatureAttributes,
    pub geometry: ZoneGeometry,
}

impl Feature {
    /// Pair attribute records with their geometries by zone id, in geometry
    /// order. Geometries without attributes are dropped with a warning.
    pub fn join(zones: Vec<Zone>, geometries: Vec<GeometryFeature>) -> Vec<Feature> {
        let mut by_id: std::collections::HashMap<_, _> =
            zones.into_iter().map(|z| (z.id.clone(), z)).collect();
        let mut features = Vec::with_capacity(geometries.len());
        for GeometryFeature { zone_id, geometry } in geometries {
            match by_id.remove(&zone_id) {
                Some(attributes) => features.push(Feature {
                    attributes,
                    geometry,
                }),
                None => tracing::warn!(zone = %zone_id, "geometry without attributes skipped"),
            }
        }
        features
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
struct WireRing {
    lon: Vec<i64>,
    lat: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
struct WirePolygon {
    rings: Vec<WireRing>,
}

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
struct WireRecord {
    attributes: String,
    polygons: Vec<WirePolygon>,
}

fn quantize(value: f64) -> i64 {
    (value * COORDINATE_SCALE).round() as i64
}

fn dequantize(value: i64) -> f64 {
    value as f64 / COORDINATE_SCALE
}

fn encode_ring(ring: &[[f64; 2]]) -> WireRing {
    let mut wire = WireRing {
        lon: Vec::with_capacity(ring.len()),
        lat: Vec::with_capacity(ring.len()),
    };
    let (mut prev_lon, mut prev_lat) = (0i64, 0i64);
    for &[lon, lat] in ring {
        let (q_lon, q_lat) = (quantize(lon), quantize(lat));
        wire.lon.push(q_lon - prev_lon);
        wire.lat.push(q_lat - prev_lat);
        prev_lon = q_lon;
        prev_lat = q_lat;
    }
    wire
}

fn decode_ring(wire: &WireRing) -> Vec<[f64; 2]> {
    let (mut lon, mut lat) = (0i64, 0i64);
    wire.lon
        .iter()
        .zip(&wire.lat)
        .map(|(d_lon, d_lat)| {
            lon += d_lon;
            lat += d_lat;
            [dequantize(lon), dequantize(lat)]
        })
        .collect()
}

/// Encode one feature.
pub fn encode(feature: &Feature) -> FeatureStoreResult<Vec<u8>> {
    let attributes = serde_json::to_string(&feature.attributes).map_err(|source| {
        FeatureStoreError::AttributeEncode {
            zone: feature.attributes.id.clone(),
            source,
        }
    })?;
    let polygons = feature
        .geometry
        .to_rings()
        .iter()
        .map(|polygon| WirePolygon {
            rings: polygon.iter().map(|ring| encode_ring(ring)).collect(),
        })
        .collect();
    Ok(bitcode::encode(&WireRecord {
        attributes,
        polygons,
    }))
}

/// Decode the record stored at `slot`.
pub fn decode(slot: u32, bytes: &[u8]) -> FeatureStoreResult<Feature> {
    let wire: WireRecord = bitcode::decode(bytes).map_err(|e| FeatureStoreError::RecordDecode {
        slot,
        message: e.to_string(),
    })?;
    let attributes: Zone =
        serde_json::from_str(&wire.attributes).map_err(|e| FeatureStoreError::RecordDecode {
            slot,
            message: e.to_string(),
        })?;

    let mut rings: Rings = Vec::with_capacity(wire.polygons.len());
    for polygon in &wire.polygons {
        rings.push(polygon.rings.iter().map(decode_ring).collect());
    }
    let geometry = ZoneGeometry::from_rings(&rings).map_err(|source: GeometryError| {
        FeatureStoreError::InvalidGeometry {
            zone: attributes.id.clone(),
            source,
        }
    })?;

    Ok(Feature {
        attributes,
        geometry,
    })
}
