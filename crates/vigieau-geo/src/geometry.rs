//! # Zone Geometry
//!
//! A zone's area as a `geo::MultiPolygon`, with its bounding box computed
//! once at construction.

use geo::{BoundingRect, Coord, Intersects, LineString, MultiPolygon, Polygon};
use serde::{Deserialize, Serialize};
use vigieau_core::Coordinates;

use crate::error::GeometryError;

/// Axis-aligned bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Degenerate box around a single point.
    pub fn point(point: Coordinates) -> Self {
        Self::new(point.lon, point.lat, point.lon, point.lat)
    }

    /// Closed-interval overlap test; touching boxes intersect.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_lon <= other.max_lon
            && other.min_lon <= self.max_lon
            && self.min_lat <= other.max_lat
            && other.min_lat <= self.max_lat
    }

    pub fn contains_point(&self, point: Coordinates) -> bool {
        self.intersects(&Self::point(point))
    }
}

/// Polygon rings as nested position arrays: polygons → rings → `[lon, lat]`.
/// The first ring of each polygon is the exterior, the rest are holes.
pub type Rings = Vec<Vec<Vec<[f64; 2]>>>;

/// The area covered by one zone.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneGeometry {
    shape: MultiPolygon<f64>,
    bbox: BoundingBox,
}

impl ZoneGeometry {
    /// Wrap a multipolygon. Fails when it has no polygon.
    pub fn new(shape: MultiPolygon<f64>) -> Result<Self, GeometryError> {
        let rect = shape.bounding_rect().ok_or(GeometryError::Empty)?;
        let bbox = BoundingBox::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y);
        Ok(Self { shape, bbox })
    }

    /// Build from raw rings, validating each position and ring.
    pub fn from_rings(polygons: &[Vec<Vec<[f64; 2]>>]) -> Result<Self, GeometryError> {
        if polygons.is_empty() {
            return Err(GeometryError::Empty);
        }
        let mut built = Vec::with_capacity(polygons.len());
        for (p, rings) in polygons.iter().enumerate() {
            let mut line_strings = Vec::with_capacity(rings.len());
            for (r, ring) in rings.iter().enumerate() {
                if ring.len() < 3 {
                    return Err(GeometryError::DegenerateRing {
                        polygon: p,
                        ring: r,
                        positions: ring.len(),
                    });
                }
                if ring.iter().flatten().any(|v| !v.is_finite()) {
                    return Err(GeometryError::NonFinite);
                }
                let coords: Vec<Coord<f64>> =
                    ring.iter().map(|[x, y]| Coord { x: *x, y: *y }).collect();
                line_strings.push(LineString::new(coords));
            }
            let mut line_strings = line_strings.into_iter();
            let exterior = line_strings.next().ok_or(GeometryError::Empty)?;
            built.push(Polygon::new(exterior, line_strings.collect()));
        }
        Self::new(MultiPolygon::new(built))
    }

    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    pub fn shape(&self) -> &MultiPolygon<f64> {
        &self.shape
    }

    /// Inclusive point-in-polygon test.
    ///
    /// Points on an edge or vertex are contained; points inside a hole are not.
    pub fn contains(&self, point: Coordinates) -> bool {
        if !self.bbox.contains_point(point) {
            return false;
        }
        let coord = Coord {
            x: point.lon,
            y: point.lat,
        };
        self.shape.0.iter().any(|polygon| polygon.intersects(&coord))
    }

    /// Raw rings, closing positions included.
    pub fn to_rings(&self) -> Rings {
        self.shape
            .0
            .iter()
            .map(|polygon| {
                std::iter::once(polygon.exterior())
                    .chain(polygon.interiors())
                    .map(|ring| ring.0.iter().map(|c| [c.x, c.y]).collect())
                    .collect()
            })
            .collect()
    }
}
