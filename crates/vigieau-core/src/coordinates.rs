//! # Coordinates
//!
//! WGS84 longitude/latitude pairs. Lookups assume coordinates were
//! validated by the caller; [`Coordinates::new`] is the validating
//! constructor offered for that purpose.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Exclusive longitude bound.
pub const MAX_ABS_LON: f64 = 180.0;
/// Exclusive latitude bound (Web Mercator usable range).
pub const MAX_ABS_LAT: f64 = 85.0;

/// A WGS84 point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinates {
    /// Validate a point: finite, lon in (-180, 180), lat in (-85, 85).
    pub fn new(lon: f64, lat: f64) -> Result<Self, ValidationError> {
        let in_range = lon.is_finite()
            && lat.is_finite()
            && lon.abs() < MAX_ABS_LON
            && lat.abs() < MAX_ABS_LAT;
        if in_range {
            Ok(Self { lon, lat })
        } else {
            Err(ValidationError::CoordinatesOutOfRange { lon, lat })
        }
    }

    /// Wrap a point already validated upstream.
    pub fn trusted(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_points_in_range() {
        let p = Coordinates::new(4.8357, 45.7640).unwrap();
        assert_eq!(p.lon, 4.8357);
        assert_eq!(p.lat, 45.7640);
    }

    #[test]
    fn bounds_are_exclusive() {
        assert!(Coordinates::new(180.0, 0.0).is_err());
        assert!(Coordinates::new(-180.0, 0.0).is_err());
        assert!(Coordinates::new(0.0, 85.0).is_err());
        assert!(Coordinates::new(0.0, -85.0).is_err());
        assert!(Coordinates::new(179.999, 84.999).is_ok());
    }

    #[test]
    fn rejects_non_finite_values() {
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
        assert!(Coordinates::new(0.0, f64::INFINITY).is_err());
    }
}
