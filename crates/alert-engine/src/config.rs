//! Engine tuning constants

use serde::{Deserialize, Serialize};

/// Alerting engine configuration
///
/// Defaults are the shipping values; every threshold the filter, cooldown,
/// cluster, and zone logic uses lives here so tests can tighten or relax
/// them independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum wall-clock gap between any two announcements (ms)
    pub min_gap_ms: u64,
    /// Per-hazard suppression window after an announcement (ms)
    pub per_hazard_quiet_ms: u64,
    /// Quiet-until window set on a hazard mentioned as "next" at slow speed (ms)
    pub next_quiet_slow_ms: u64,
    /// General heading agreement tolerance (degrees)
    pub heading_agree_max_deg: f64,
    /// Tighter tolerance for one-way-tagged hazards (degrees)
    pub one_way_max_heading_deg: f64,
    /// Maximum cross-track offset before a hazard is treated as another
    /// carriageway (meters)
    pub max_lateral_offset_m: f64,
    /// A "next" hazard must be at least this much farther than the current
    /// selection (meters)
    pub min_along_separation_m: f64,
    /// Below this speed, point-hazard callouts are skipped entirely (m/s)
    pub low_motion_cutoff_mps: f64,
    /// Below this speed a "next" mention quiets the follow-up hazard (km/h)
    pub slow_speed_kph: f64,
    /// Cluster gap threshold = clamp(factor * lead, min, max)
    pub cluster_gap_factor: f64,
    pub cluster_gap_min_m: f64,
    pub cluster_gap_max_m: f64,
    /// Radius that counts as being inside a speed-limit zone (meters)
    pub zone_radius_m: f64,
    /// Exit pre-warning fires when remaining zone length falls in
    /// (0, zone_exit_warn_m] (meters)
    pub zone_exit_warn_m: f64,
    /// Inferred-endpoint search band when zone length is unknown (meters)
    pub zone_infer_min_m: f64,
    pub zone_infer_max_m: f64,
    /// Heading tolerance for the inferred endpoint (degrees)
    pub zone_infer_max_heading_deg: f64,
    /// Overspeed beyond the limit that escalates WARNING to CRITICAL (km/h)
    pub zone_overspeed_critical_kph: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_gap_ms: 10_000,
            per_hazard_quiet_ms: 30_000,
            next_quiet_slow_ms: 20_000,
            heading_agree_max_deg: 15.0,
            one_way_max_heading_deg: 10.0,
            max_lateral_offset_m: 7.0,
            min_along_separation_m: 15.0,
            low_motion_cutoff_mps: 1.5,
            slow_speed_kph: 40.0,
            cluster_gap_factor: 0.3,
            cluster_gap_min_m: 30.0,
            cluster_gap_max_m: 150.0,
            zone_radius_m: 100.0,
            zone_exit_warn_m: 200.0,
            zone_infer_min_m: 50.0,
            zone_infer_max_m: 2000.0,
            zone_infer_max_heading_deg: 30.0,
            zone_overspeed_critical_kph: 10.0,
        }
    }
}
