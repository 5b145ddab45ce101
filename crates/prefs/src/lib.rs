//! Preference Store
//!
//! Named configuration reads consumed by the alert engine and the
//! announcement dispatcher: mute window, lead-distance curve, cluster
//! gating, audio focus mode, channel switches, and zone phrases.

use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Errors loading preferences from file/environment
#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("Failed to load preferences: {0}")]
    Load(#[from] config::ConfigError),
}

/// How the speaker acquires audio focus while announcing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AudioFocusMode {
    /// Duck other audio (music keeps playing quietly)
    #[default]
    Duck,
    /// Pause other audio entirely
    Exclusive,
}

/// Named lead-distance curve selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadCurve {
    Conservative,
    #[default]
    Normal,
    Aggressive,
}

/// One snapshot of every preference the core reads
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrefsSnapshot {
    /// Epoch millis until which all alerting is muted; 0 = not muted
    pub muted_until_ms: u64,
    pub lead_curve: LeadCurve,
    pub cluster_enabled: bool,
    /// Minimum speed for clustered announcements, km/h
    pub cluster_speed_kph: f64,
    pub audio_focus: AudioFocusMode,
    pub haptics_enabled: bool,
    pub audio_enabled: bool,
    pub visual_enabled: bool,
    /// Spoken when entering a zone with no known limit
    pub zone_enter_phrase: String,
    /// Spoken when leaving a zone with no known limit
    pub zone_exit_phrase: String,
    /// Interval between in-zone limit repeats, millis
    pub zone_repeat_ms: u64,
}

impl Default for PrefsSnapshot {
    fn default() -> Self {
        Self {
            muted_until_ms: 0,
            lead_curve: LeadCurve::Normal,
            cluster_enabled: true,
            cluster_speed_kph: 30.0,
            audio_focus: AudioFocusMode::Duck,
            haptics_enabled: true,
            audio_enabled: true,
            visual_enabled: true,
            zone_enter_phrase: "Entering speed limit zone".to_string(),
            zone_exit_phrase: "Exiting speed limit zone".to_string(),
            zone_repeat_ms: 60_000,
        }
    }
}

/// Read side consumed by the engine; implementations own persistence
pub trait PreferenceStore: Send + Sync {
    fn snapshot(&self) -> PrefsSnapshot;

    fn is_muted(&self, now_ms: u64) -> bool {
        let until = self.snapshot().muted_until_ms;
        until > now_ms
    }
}

/// Preference store held in memory, with a write side for settings surfaces
#[derive(Default)]
pub struct MemoryPrefs {
    inner: RwLock<PrefsSnapshot>,
}

impl MemoryPrefs {
    pub fn new(snapshot: PrefsSnapshot) -> Self {
        Self { inner: RwLock::new(snapshot) }
    }

    pub fn set_muted_until(&self, until_ms: u64) {
        self.update(|p| p.muted_until_ms = until_ms);
    }

    pub fn set_lead_curve(&self, curve: LeadCurve) {
        self.update(|p| p.lead_curve = curve);
    }

    pub fn set_cluster(&self, enabled: bool, speed_kph: f64) {
        self.update(|p| {
            p.cluster_enabled = enabled;
            p.cluster_speed_kph = speed_kph;
        });
    }

    pub fn set_audio_focus(&self, mode: AudioFocusMode) {
        self.update(|p| p.audio_focus = mode);
    }

    pub fn set_channels(&self, audio: bool, visual: bool, haptics: bool) {
        self.update(|p| {
            p.audio_enabled = audio;
            p.visual_enabled = visual;
            p.haptics_enabled = haptics;
        });
    }

    pub fn set_zone_config(&self, enter: String, exit: String, repeat_ms: u64) {
        self.update(|p| {
            p.zone_enter_phrase = enter;
            p.zone_exit_phrase = exit;
            p.zone_repeat_ms = repeat_ms;
        });
    }

    fn update(&self, f: impl FnOnce(&mut PrefsSnapshot)) {
        // Poisoning only happens if a writer panicked; recover the data
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        f(&mut guard);
    }
}

impl PreferenceStore for MemoryPrefs {
    fn snapshot(&self) -> PrefsSnapshot {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

/// Load preferences from an optional file layered under `ROADWATCH_`
/// environment overrides
pub fn load_prefs(path: Option<&str>) -> Result<PrefsSnapshot, PrefsError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::with_name(path).required(false));
    }
    let cfg = builder
        .add_source(
            config::Environment::with_prefix("ROADWATCH")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;
    let snapshot: PrefsSnapshot = cfg.try_deserialize()?;
    info!(curve = ?snapshot.lead_curve, "Preferences loaded");
    Ok(snapshot)
}
