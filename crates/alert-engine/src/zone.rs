//! Speed-limit-zone tracker
//!
//! Small OUTSIDE/INSIDE state machine that runs on every fix, independently
//! of point-hazard alerting. Tracks at most one active zone: entry point,
//! length when known, limit, exit-warned flag, and repeat timing.

use geodesy::{angle_delta, bearing_rad, distance_m};
use hazard_store::Hazard;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::fix::LocationFix;

/// Spoken/visual transitions emitted by the tracker
#[derive(Debug, Clone, PartialEq)]
pub enum ZoneEvent {
    Entered { limit_kph: Option<u32> },
    Repeat { limit_kph: Option<u32> },
    ExitSoon { remaining_m: f64 },
    Exited { limit_kph: Option<u32> },
}

/// Side-channel speed evaluation while inside a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedStatus {
    Normal,
    /// Over the limit by up to the critical margin
    Warning,
    /// More than the critical margin over
    Critical,
}

/// Single-active-zone state machine
#[derive(Debug, Default)]
pub struct ZoneTracker {
    inside: bool,
    entry: Option<(f64, f64)>,
    length_m: Option<f64>,
    limit_kph: Option<u32>,
    exit_warned: bool,
    last_repeat_ms: u64,
}

impl ZoneTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_inside(&self) -> bool {
        self.inside
    }

    pub fn active_limit_kph(&self) -> Option<u32> {
        if self.inside {
            self.limit_kph
        } else {
            None
        }
    }

    /// Advance the state machine with one fix
    ///
    /// Hazards that claim zone type but lack required fields never
    /// participate here; they were already screened by `is_valid_zone`.
    pub fn update(
        &mut self,
        fix: &LocationFix,
        hazards: &[Hazard],
        repeat_interval_ms: u64,
        cfg: &EngineConfig,
    ) -> (Vec<ZoneEvent>, Option<SpeedStatus>) {
        let zones: Vec<&Hazard> = hazards.iter().filter(|h| h.is_valid_zone()).collect();
        if zones.is_empty() && !self.inside {
            return (Vec::new(), None);
        }

        let nearest = zones
            .iter()
            .map(|z| (*z, distance_m(fix.lat, fix.lon, z.lat, z.lon)))
            .min_by(|a, b| a.1.total_cmp(&b.1));
        let nearest_dist = nearest.map_or(f64::MAX, |(_, d)| d);
        let now = fix.timestamp_ms;

        let mut events = Vec::new();
        if let (false, Some((zone, d))) = (self.inside, nearest) {
            if d >= cfg.zone_radius_m {
                return (events, None);
            }
            self.inside = true;
            self.entry = Some((fix.lat, fix.lon));
            self.length_m = zone.zone_length_m;
            self.limit_kph = zone.speed_limit_kph;
            self.exit_warned = false;
            self.last_repeat_ms = now;
            debug!(limit = ?self.limit_kph, "Entered speed limit zone");
            events.push(ZoneEvent::Entered { limit_kph: self.limit_kph });
        } else if self.inside && nearest_dist < cfg.zone_radius_m {
            if now.saturating_sub(self.last_repeat_ms) >= repeat_interval_ms {
                self.last_repeat_ms = now;
                events.push(ZoneEvent::Repeat { limit_kph: self.limit_kph });
            }
            if let Some(remaining) = self.remaining_m(fix, &zones, cfg) {
                if !self.exit_warned && remaining > 0.0 && remaining <= cfg.zone_exit_warn_m {
                    self.exit_warned = true;
                    events.push(ZoneEvent::ExitSoon { remaining_m: remaining });
                }
            }
        } else if self.inside {
            debug!("Left speed limit zone");
            events.push(ZoneEvent::Exited { limit_kph: self.limit_kph });
            *self = Self::default();
            return (events, None);
        }

        let status = self.speed_status(fix, cfg);
        (events, status)
    }

    /// Remaining distance in the zone: traveled-from-entry against the
    /// known length, or the nearest aligned zone hazard ahead as an
    /// inferred endpoint when length is unknown
    fn remaining_m(&self, fix: &LocationFix, zones: &[&Hazard], cfg: &EngineConfig) -> Option<f64> {
        if let (Some(length), Some(entry)) = (self.length_m, self.entry) {
            let traveled = distance_m(entry.0, entry.1, fix.lat, fix.lon);
            return Some(length - traveled);
        }
        let heading = fix.heading_rad()?;
        zones
            .iter()
            .map(|z| (z, distance_m(fix.lat, fix.lon, z.lat, z.lon)))
            .filter(|(_, d)| *d > cfg.zone_infer_min_m && *d < cfg.zone_infer_max_m)
            .filter(|(z, _)| {
                let b = bearing_rad(fix.lat, fix.lon, z.lat, z.lon);
                angle_delta(heading, b).abs().to_degrees() < cfg.zone_infer_max_heading_deg
            })
            .map(|(_, d)| d)
            .min_by(f64::total_cmp)
    }

    fn speed_status(&self, fix: &LocationFix, cfg: &EngineConfig) -> Option<SpeedStatus> {
        if !self.inside {
            return None;
        }
        let limit = self.limit_kph? as f64;
        let over = fix.speed_kph() - limit;
        let status = if over <= 0.0 {
            SpeedStatus::Normal
        } else if over <= cfg.zone_overspeed_critical_kph {
            SpeedStatus::Warning
        } else {
            SpeedStatus::Critical
        };
        Some(status)
    }
}
