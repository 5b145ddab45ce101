//! Hazard clustering
//!
//! Groups ahead-hazards that sit close together along-track so a run of
//! speed bumps becomes one spoken cue instead of one announcement per bump.

use hazard_store::HazardType;

use crate::config::EngineConfig;
use crate::ranking::AheadHazard;

/// Gap threshold for joining the current cluster, meters
pub fn gap_threshold_m(lead_m: f64, cfg: &EngineConfig) -> f64 {
    (cfg.cluster_gap_factor * lead_m).clamp(cfg.cluster_gap_min_m, cfg.cluster_gap_max_m)
}

/// Walk the along-track-sorted list and group members whose spacing stays
/// within the gap threshold
pub fn build_clusters(
    ahead: Vec<AheadHazard>,
    lead_m: f64,
    cfg: &EngineConfig,
) -> Vec<Vec<AheadHazard>> {
    if ahead.is_empty() {
        return Vec::new();
    }
    let gap = gap_threshold_m(lead_m, cfg);
    let mut clusters: Vec<Vec<AheadHazard>> = Vec::new();
    let mut current: Vec<AheadHazard> = Vec::new();
    let mut prev_along = 0.0;
    for (i, a) in ahead.into_iter().enumerate() {
        if i == 0 || a.along_m - prev_along <= gap {
            prev_along = a.along_m;
            current.push(a);
        } else {
            prev_along = a.along_m;
            clusters.push(std::mem::replace(&mut current, vec![a]));
        }
    }
    clusters.push(current);
    clusters
}

/// Label for a cluster plus whether the label names a concrete type
///
/// Speed bumps dominate, then rumble strips; otherwise the nearest member
/// names the cluster. Mixed multi-hazard clusters of other types are
/// announced generically ("Multiple hazards").
pub fn cluster_label(cluster: &[AheadHazard]) -> (&'static str, bool) {
    let has_bump = cluster.iter().any(|a| a.hazard.hazard_type == HazardType::SpeedBump);
    let has_rumble = cluster.iter().any(|a| a.hazard.hazard_type == HazardType::RumbleStrip);
    let label = if has_bump {
        "Speed bump"
    } else if has_rumble {
        "Rumble strip"
    } else {
        cluster[0].hazard.hazard_type.spoken_name()
    };
    if cluster.len() == 1 {
        (label, true)
    } else {
        (label, has_bump || has_rumble)
    }
}
