//! Geodesy Utilities
//!
//! Pure great-circle math used by hazard ranking:
//! - Haversine distance
//! - Initial bearing
//! - Signed minimal angle difference
//! - Cross-track (lateral offset) approximation
//!
//! All functions are stateless and bit-stable for identical f64 inputs.

use std::f64::consts::PI;

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine great-circle distance between two coordinates, in meters
pub fn distance_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

/// Initial bearing from point 1 to point 2, in radians
///
/// 0 = north, positive clockwise; result is in (-pi, pi].
pub fn bearing_rad(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let y = d_lon.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lon.cos();
    y.atan2(x)
}

/// Signed minimal angular difference `b - a`, normalized into (-pi, pi]
pub fn angle_delta(a: f64, b: f64) -> f64 {
    let mut d = (b - a + PI) % (2.0 * PI);
    if d < 0.0 {
        d += 2.0 * PI;
    }
    d - PI
}

/// Approximate cross-track distance of a target seen at `bearing_to_rad`
/// while traveling along `heading_rad`, in meters
///
/// Sign indicates the side of the travel line the target falls on.
pub fn lateral_offset_m(distance_m: f64, heading_rad: f64, bearing_to_rad: f64) -> f64 {
    distance_m * (bearing_to_rad - heading_rad).sin()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MUNICH: (f64, f64) = (48.137, 11.575);

    #[test]
    fn test_distance_to_self_is_zero() {
        assert_eq!(distance_m(MUNICH.0, MUNICH.1, MUNICH.0, MUNICH.1), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let d1 = distance_m(48.137, 11.575, 48.150, 11.600);
        let d2 = distance_m(48.150, 11.600, 48.137, 11.575);
        assert!((d1 - d2).abs() < 1e-6);
    }

    #[test]
    fn test_distance_one_degree_latitude() {
        // One degree of latitude is ~111.2 km everywhere
        let d = distance_m(48.0, 11.0, 49.0, 11.0);
        assert!((d - 111_195.0).abs() < 200.0, "got {d}");
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        // Due north
        let north = bearing_rad(48.0, 11.0, 48.1, 11.0);
        assert!(north.abs() < 0.01);
        // Due east (small offset so meridian convergence is negligible)
        let east = bearing_rad(48.0, 11.0, 48.0, 11.1);
        assert!((east - PI / 2.0).abs() < 0.01);
        // Due south
        let south = bearing_rad(48.1, 11.0, 48.0, 11.0);
        assert!((south.abs() - PI).abs() < 0.01);
    }

    #[test]
    fn test_angle_delta_wraps_across_pi() {
        // 170 degrees to -170 degrees is a 20 degree step, not 340
        let a = 170.0_f64.to_radians();
        let b = -170.0_f64.to_radians();
        let d = angle_delta(a, b);
        assert!((d - 20.0_f64.to_radians()).abs() < 1e-9);
    }

    #[test]
    fn test_angle_delta_sign() {
        assert!(angle_delta(0.0, 0.5) > 0.0);
        assert!(angle_delta(0.5, 0.0) < 0.0);
    }

    #[test]
    fn test_lateral_offset_sign_and_magnitude() {
        // Target 30 degrees right of heading at 100 m: offset = 100 * sin(30) = 50
        let off = lateral_offset_m(100.0, 0.0, 30.0_f64.to_radians());
        assert!((off - 50.0).abs() < 1e-9);
        // Same target on the left: negative
        let off = lateral_offset_m(100.0, 0.0, -30.0_f64.to_radians());
        assert!((off + 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_lateral_offset_dead_ahead_is_zero() {
        assert_eq!(lateral_offset_m(250.0, 1.2, 1.2), 0.0);
    }
}
