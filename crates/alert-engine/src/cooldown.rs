//! Alert state & cooldown tracking
//!
//! Enforces the minimum gap between announcements, the per-hazard
//! suppression window, and the quiet-until override used when a hazard was
//! just mentioned as a "next" follow-up. All timestamps are fix-clock epoch
//! millis, so the tracker is deterministic under test and resets with the
//! process (no persistence).

use std::collections::HashMap;

use tracing::debug;

use crate::config::EngineConfig;

/// Per-session cooldown state, owned exclusively by the engine
#[derive(Debug, Default)]
pub struct CooldownTracker {
    /// Last accepted announcement of any kind, ms
    last_alert_ms: u64,
    /// Last announcement per hazard key, ms
    last_per_key: HashMap<String, u64>,
    /// Keys skipped outright until the stored time
    quiet_until: HashMap<String, u64>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the global minimum gap has elapsed
    pub fn global_gap_ok(&self, now_ms: u64, cfg: &EngineConfig) -> bool {
        self.last_alert_ms == 0 || now_ms.saturating_sub(self.last_alert_ms) >= cfg.min_gap_ms
    }

    /// Whether this key is inside its quiet-until override window
    pub fn is_quieted(&self, key: &str, now_ms: u64) -> bool {
        self.quiet_until.get(key).is_some_and(|&until| until > now_ms)
    }

    /// Whether this key was announced recently enough to suppress a repeat
    ///
    /// The window is a fixed span from the last announcement and expires
    /// exactly at `per_hazard_quiet_ms`; re-evaluation never extends it,
    /// so a stopped vehicle re-hears a hazard once the window ends.
    pub fn is_suppressed(&self, key: &str, now_ms: u64, cfg: &EngineConfig) -> bool {
        self.last_per_key
            .get(key)
            .is_some_and(|&last| now_ms.saturating_sub(last) < cfg.per_hazard_quiet_ms)
    }

    /// Skip `key` entirely until `until_ms`
    pub fn quiet_key_until(&mut self, key: String, until_ms: u64) {
        debug!(%key, until_ms, "Quieting follow-up hazard");
        self.quiet_until.insert(key, until_ms);
    }

    /// Record an accepted announcement for `key` at `now_ms`
    pub fn record(&mut self, key: String, now_ms: u64) {
        self.last_per_key.insert(key, now_ms);
        self.last_alert_ms = now_ms;
    }

    /// Record an accepted announcement covering several keys (clusters)
    pub fn record_all<I: IntoIterator<Item = String>>(&mut self, keys: I, now_ms: u64) {
        for key in keys {
            self.last_per_key.insert(key, now_ms);
        }
        self.last_alert_ms = now_ms;
    }

    /// Drop entries whose windows lie entirely in the past, bounding memory
    /// on long drives
    pub fn prune(&mut self, now_ms: u64, cfg: &EngineConfig) {
        self.last_per_key
            .retain(|_, &mut last| now_ms.saturating_sub(last) < cfg.per_hazard_quiet_ms);
        self.quiet_until.retain(|_, &mut until| until > now_ms);
    }
}
