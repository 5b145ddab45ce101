//! Directional filter & ranker
//!
//! Decides which hazards are "ahead, in-lane, in-direction" for a fix and
//! orders them by along-track distance. Handles dual carriageways via the
//! lateral-offset gate and divided-highway hazards via directionality tags.

use geodesy::{angle_delta, bearing_rad, distance_m, lateral_offset_m};
use hazard_store::{Directionality, Hazard};

use crate::config::EngineConfig;
use crate::fix::LocationFix;

/// A hazard that survived filtering, with its geometry relative to the fix
#[derive(Debug, Clone)]
pub struct AheadHazard {
    pub hazard: Hazard,
    /// Straight-line distance to the hazard, meters
    pub distance_m: f64,
    /// Distance projected onto the travel direction; equals `distance_m`
    /// when no bearing was available
    pub along_m: f64,
}

/// Geometry of one hazard relative to the fix, or None if filtered out
fn evaluate(
    fix: &LocationFix,
    target: (f64, f64),
    directionality: Directionality,
    lead_m: f64,
    cfg: &EngineConfig,
    require_strictly_ahead: bool,
) -> Option<(f64, f64)> {
    if directionality == Directionality::Opposite {
        return None;
    }
    let d = distance_m(fix.lat, fix.lon, target.0, target.1);
    if d > lead_m {
        return None;
    }
    let Some(heading) = fix.heading_rad() else {
        // No bearing: nearest-by-distance fallback, no directional gates
        return Some((d, d));
    };
    let bearing_to = bearing_rad(fix.lat, fix.lon, target.0, target.1);
    let heading_diff_deg = angle_delta(heading, bearing_to).abs().to_degrees();
    if directionality == Directionality::OneWay && heading_diff_deg > cfg.one_way_max_heading_deg {
        return None;
    }
    if heading_diff_deg > cfg.heading_agree_max_deg {
        return None;
    }
    let lateral = lateral_offset_m(d, heading, bearing_to);
    if lateral.abs() > cfg.max_lateral_offset_m {
        return None;
    }
    let along = d * angle_delta(heading, bearing_to).cos();
    if require_strictly_ahead {
        if along <= 0.0 {
            return None;
        }
    } else if along < 0.0 {
        return None;
    }
    Some((d, along))
}

/// All hazards ahead within `lead_m`, sorted by along-track distance
pub fn ahead_hazards(
    fix: &LocationFix,
    hazards: &[Hazard],
    lead_m: f64,
    cfg: &EngineConfig,
) -> Vec<AheadHazard> {
    let mut out: Vec<AheadHazard> = hazards
        .iter()
        .filter_map(|h| {
            evaluate(fix, (h.lat, h.lon), h.directionality, lead_m, cfg, false).map(
                |(distance_m, along_m)| AheadHazard { hazard: h.clone(), distance_m, along_m },
            )
        })
        .collect();
    out.sort_by(|a, b| a.along_m.total_cmp(&b.along_m));
    out
}

/// The closest hazard ahead of the fix, if any
///
/// With a valid bearing this is the minimum along-track survivor of the
/// full directional pipeline; without one it degrades to nearest by
/// straight-line distance (never rejected solely for missing bearing).
pub fn upcoming_hazard(
    fix: &LocationFix,
    hazards: &[Hazard],
    lead_m: f64,
    cfg: &EngineConfig,
) -> Option<AheadHazard> {
    hazards
        .iter()
        .filter_map(|h| {
            evaluate(fix, (h.lat, h.lon), h.directionality, lead_m, cfg, true).map(
                |(distance_m, along_m)| AheadHazard { hazard: h.clone(), distance_m, along_m },
            )
        })
        .min_by(|a, b| a.along_m.total_cmp(&b.along_m))
}

/// The hazard strictly beyond `current`, for "then, X ahead" follow-ups
///
/// Zone hazards aim at their start point. A candidate must be more than
/// `min_along_separation_m` farther than the current selection so the same
/// physical obstacle is never announced twice.
pub fn next_hazard_after(
    fix: &LocationFix,
    hazards: &[Hazard],
    current: &AheadHazard,
    lead_m: f64,
    cfg: &EngineConfig,
) -> Option<AheadHazard> {
    let current_key = current.hazard.key();
    hazards
        .iter()
        .filter(|h| h.key() != current_key)
        .filter_map(|h| {
            let target = h.target_point();
            let (d, along) =
                evaluate(fix, target, h.directionality, lead_m, cfg, true)?;
            if d <= current.distance_m + cfg.min_along_separation_m {
                return None;
            }
            Some(AheadHazard { hazard: h.clone(), distance_m: d, along_m: along })
        })
        .min_by(|a, b| a.along_m.total_cmp(&b.along_m))
}
