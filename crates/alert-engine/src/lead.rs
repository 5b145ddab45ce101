//! Speed-adaptive lead distance

pub use prefs::LeadCurve;

/// Alert lookahead distance for the given speed, in meters
///
/// Piecewise-linear with breakpoints at 0/50/100/120 km/h, saturating above
/// 120. Total for all inputs (negative speeds clamp to the 0 km/h value)
/// and monotonic non-decreasing.
pub fn lead_distance_m(curve: LeadCurve, speed_kph: f64) -> f64 {
    let v = speed_kph.max(0.0);
    let (base, b50, b100, b120, cap) = match curve {
        LeadCurve::Conservative => (100.0, 200.0, 450.0, 700.0, 700.0),
        LeadCurve::Normal => (150.0, 300.0, 600.0, 900.0, 900.0),
        LeadCurve::Aggressive => (200.0, 400.0, 800.0, 1200.0, 1200.0),
    };
    if v <= 0.0 {
        base
    } else if v <= 50.0 {
        base + (v / 50.0) * (b50 - base)
    } else if v <= 100.0 {
        b50 + ((v - 50.0) / 50.0) * (b100 - b50)
    } else if v <= 120.0 {
        b100 + ((v - 100.0) / 20.0) * (b120 - b100)
    } else {
        cap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const CURVES: [LeadCurve; 3] =
        [LeadCurve::Conservative, LeadCurve::Normal, LeadCurve::Aggressive];

    #[test]
    fn test_breakpoint_values() {
        assert_eq!(lead_distance_m(LeadCurve::Normal, 0.0), 150.0);
        assert_eq!(lead_distance_m(LeadCurve::Normal, 50.0), 300.0);
        assert_eq!(lead_distance_m(LeadCurve::Normal, 100.0), 600.0);
        assert_eq!(lead_distance_m(LeadCurve::Normal, 120.0), 900.0);
        assert_eq!(lead_distance_m(LeadCurve::Normal, 200.0), 900.0);

        assert_eq!(lead_distance_m(LeadCurve::Conservative, 120.0), 700.0);
        assert_eq!(lead_distance_m(LeadCurve::Aggressive, 120.0), 1200.0);
    }

    #[test]
    fn test_negative_speed_clamps() {
        assert_eq!(lead_distance_m(LeadCurve::Aggressive, -5.0), 200.0);
    }

    #[test]
    fn test_interpolation_midpoints() {
        // Halfway through each segment
        assert_eq!(lead_distance_m(LeadCurve::Normal, 25.0), 225.0);
        assert_eq!(lead_distance_m(LeadCurve::Normal, 75.0), 450.0);
        assert_eq!(lead_distance_m(LeadCurve::Normal, 110.0), 750.0);
    }

    proptest! {
        #[test]
        fn prop_monotonic_non_decreasing(v1 in 0.0f64..300.0, v2 in 0.0f64..300.0) {
            let (lo, hi) = if v1 <= v2 { (v1, v2) } else { (v2, v1) };
            for curve in CURVES {
                prop_assert!(lead_distance_m(curve, lo) <= lead_distance_m(curve, hi));
            }
        }

        #[test]
        fn prop_bounded_by_cap(v in 0.0f64..1000.0) {
            prop_assert!(lead_distance_m(LeadCurve::Conservative, v) <= 700.0);
            prop_assert!(lead_distance_m(LeadCurve::Normal, v) <= 900.0);
            prop_assert!(lead_distance_m(LeadCurve::Aggressive, v) <= 1200.0);
        }

        #[test]
        fn prop_floor_is_zero_speed_value(v in 0.0f64..1000.0) {
            for curve in CURVES {
                prop_assert!(lead_distance_m(curve, v) >= lead_distance_m(curve, 0.0));
            }
        }
    }
}
