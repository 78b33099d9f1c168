//! Great-circle geodesy for waypoint display.
//!
//! Spherical-earth formulas only; accurate to the metre for the short
//! distances a start line or mark sits from the boat.

use serde::{Deserialize, Serialize};

use crate::angle::normalize_unsigned;

/// Mean earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (positive north).
    pub latitude: f64,
    /// Longitude in degrees (positive east).
    pub longitude: f64,
}

impl Coordinate {
    /// Create a new coordinate.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Great-circle distance between two coordinates in metres (haversine).
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Clamp guards asin against h drifting past 1.0 for antipodal points
    let c = 2.0 * h.sqrt().min(1.0).asin();

    EARTH_RADIUS_M * c
}

/// Initial bearing (forward azimuth) from `a` to `b`.
///
/// Returns degrees in `[0, 360)`, 0 = north, increasing clockwise. When
/// `a == b` the bearing is undefined; the formula yields `atan2(0, 0) = 0`
/// and that value is returned as-is.
pub fn bearing_degrees(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();

    normalize_unsigned(y.atan2(x).to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_zero_for_same_point() {
        let p = Coordinate::new(50.8, -1.3);
        assert!(distance_meters(p, p).abs() < 1e-9);
    }

    #[test]
    fn test_distance_one_arcminute_of_latitude() {
        // One minute of latitude is close to one nautical mile
        let a = Coordinate::new(50.0, -1.0);
        let b = Coordinate::new(50.0 + 1.0 / 60.0, -1.0);
        let d = distance_meters(a, b);
        assert!((d - 1853.2).abs() < 1.0, "got {d}");
    }

    #[test]
    fn test_distance_symmetric() {
        let a = Coordinate::new(43.29, 5.36);
        let b = Coordinate::new(43.21, 5.34);
        assert!((distance_meters(a, b) - distance_meters(b, a)).abs() < 1e-6);
    }

    #[test]
    fn test_bearing_cardinals() {
        let origin = Coordinate::new(0.0, 0.0);
        let north = bearing_degrees(origin, Coordinate::new(1.0, 0.0));
        let east = bearing_degrees(origin, Coordinate::new(0.0, 1.0));
        let south = bearing_degrees(origin, Coordinate::new(-1.0, 0.0));
        let west = bearing_degrees(origin, Coordinate::new(0.0, -1.0));

        assert!(north.abs() < 1e-9);
        assert!((east - 90.0).abs() < 1e-9);
        assert!((south - 180.0).abs() < 1e-9);
        assert!((west - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_bearing_same_point_does_not_fail() {
        let p = Coordinate::new(50.8, -1.3);
        let bearing = bearing_degrees(p, p);
        assert!((0.0..360.0).contains(&bearing));
    }
}
