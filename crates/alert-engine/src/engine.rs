//! Alerting session
//!
//! Owns every piece of ephemeral alerting state (cooldowns, zone tracking)
//! and turns location fixes into announcements through the output ports.
//! Designed for a single execution context; wrap the engine in a mutex or
//! an actor if fixes are ever fanned out across threads.

use std::sync::Arc;

use hazard_store::{Hazard, HazardSource, HazardType};
use prefs::{PreferenceStore, PrefsSnapshot};
use tracing::{debug, warn};

use crate::cluster;
use crate::config::EngineConfig;
use crate::cooldown::CooldownTracker;
use crate::fix::LocationFix;
use crate::lead::lead_distance_m;
use crate::phrase;
use crate::ports::{Announcement, AnnouncementSink, HapticSink, UiStateSink, UiStateTag};
use crate::ranking;
use crate::zone::{SpeedStatus, ZoneEvent, ZoneTracker};

/// What one fix produced, for observability and tests
#[derive(Debug, Default)]
pub struct FixOutcome {
    /// The announcement dispatched for point hazards, if any
    pub announced: Option<Announcement>,
    pub zone_events: Vec<ZoneEvent>,
    pub speed_status: Option<SpeedStatus>,
}

/// The proximity alerting engine
pub struct AlertEngine {
    config: EngineConfig,
    prefs: Arc<dyn PreferenceStore>,
    source: Arc<dyn HazardSource>,
    announcer: Arc<dyn AnnouncementSink>,
    ui: Arc<dyn UiStateSink>,
    haptics: Arc<dyn HapticSink>,
    cooldowns: CooldownTracker,
    zone: ZoneTracker,
}

impl AlertEngine {
    pub fn new(
        config: EngineConfig,
        prefs: Arc<dyn PreferenceStore>,
        source: Arc<dyn HazardSource>,
        announcer: Arc<dyn AnnouncementSink>,
        ui: Arc<dyn UiStateSink>,
        haptics: Arc<dyn HapticSink>,
    ) -> Self {
        Self {
            config,
            prefs,
            source,
            announcer,
            ui,
            haptics,
            cooldowns: CooldownTracker::new(),
            zone: ZoneTracker::new(),
        }
    }

    /// Process one location fix end-to-end
    ///
    /// Never panics and never returns an error: sink faults degrade to
    /// silence, data faults degrade to point semantics, and a missing
    /// bearing routes through the nearest-hazard fallback.
    pub fn process_fix(&mut self, fix: &LocationFix) -> FixOutcome {
        let mut outcome = FixOutcome::default();
        let now = fix.timestamp_ms;
        let prefs = self.prefs.snapshot();

        if prefs.muted_until_ms > now {
            debug!("Alerting muted, skipping fix");
            return outcome;
        }

        let hazards = self.source.candidates_near(fix.lat, fix.lon);

        // Zone tracking runs on every fix, independently of point alerting
        let (zone_events, speed_status) =
            self.zone.update(fix, &hazards, prefs.zone_repeat_ms, &self.config);
        for event in &zone_events {
            let text =
                phrase::zone_message(event, &prefs.zone_enter_phrase, &prefs.zone_exit_phrase);
            let ann =
                Announcement { primary: text, follow_up: None, focus: prefs.audio_focus };
            self.deliver(&prefs, &ann, false);
        }
        if let Some(status) = speed_status {
            let tag = match status {
                SpeedStatus::Normal => UiStateTag::Normal,
                SpeedStatus::Warning => UiStateTag::Warning,
                SpeedStatus::Critical => UiStateTag::Critical,
            };
            if let Err(e) = self.ui.state(tag, self.zone.active_limit_kph()) {
                warn!(error = %e, "UI state sink failed");
            }
        }
        outcome.zone_events = zone_events;
        outcome.speed_status = speed_status;

        // Low-motion throttling: no point callouts while crawling
        if fix.speed_mps < self.config.low_motion_cutoff_mps {
            return outcome;
        }
        if !self.cooldowns.global_gap_ok(now, &self.config) {
            return outcome;
        }

        let speed_kph = fix.speed_kph();
        let lead = lead_distance_m(prefs.lead_curve, speed_kph);
        let non_zones: Vec<_> = hazards
            .iter()
            .filter(|h| h.hazard_type != HazardType::SpeedLimitZone)
            .cloned()
            .collect();

        // Clustered callouts at speed, when a bearing exists
        if prefs.cluster_enabled
            && speed_kph >= prefs.cluster_speed_kph
            && fix.bearing_deg.is_some()
        {
            if let Some(ann) = self.try_cluster_alert(fix, &non_zones, lead, now, &prefs) {
                outcome.announced = Some(ann);
                self.cooldowns.prune(now, &self.config);
                return outcome;
            }
        }

        // Single-hazard selection
        let Some(target) = ranking::upcoming_hazard(fix, &non_zones, lead, &self.config) else {
            self.cooldowns.prune(now, &self.config);
            return outcome;
        };
        let key = target.hazard.key();
        if self.cooldowns.is_quieted(&key, now) {
            return outcome;
        }
        if self.cooldowns.is_suppressed(&key, now, &self.config) {
            return outcome;
        }

        let text = phrase::point_alert(target.hazard.hazard_type, target.distance_m);
        let mut follow_up = None;
        if let Some(next) = ranking::next_hazard_after(fix, &hazards, &target, lead, &self.config)
        {
            follow_up = Some(phrase::next_follow_up(next.hazard.hazard_type, next.distance_m));
            // A hazard just mentioned as "next" would otherwise be announced
            // again moments later at slow speeds
            if speed_kph < self.config.slow_speed_kph {
                self.cooldowns
                    .quiet_key_until(next.hazard.key(), now + self.config.next_quiet_slow_ms);
            }
        }

        self.cooldowns.record(key, now);
        let ann = Announcement { primary: text, follow_up, focus: prefs.audio_focus };
        self.deliver(&prefs, &ann, true);
        outcome.announced = Some(ann);
        self.cooldowns.prune(now, &self.config);
        outcome
    }

    fn try_cluster_alert(
        &mut self,
        fix: &LocationFix,
        non_zones: &[Hazard],
        lead: f64,
        now: u64,
        prefs: &PrefsSnapshot,
    ) -> Option<Announcement> {
        let ahead = ranking::ahead_hazards(fix, non_zones, lead, &self.config);
        if ahead.is_empty() {
            return None;
        }
        let clusters = cluster::build_clusters(ahead, lead, &self.config);
        let first = clusters.first()?;
        let suppressed = first
            .iter()
            .any(|a| self.cooldowns.is_suppressed(&a.hazard.key(), now, &self.config));
        if suppressed {
            // Fall through to single-hazard selection
            return None;
        }

        let (label, show_type) = cluster::cluster_label(first);
        let text = phrase::cluster_alert(label, show_type, first.len(), first[0].distance_m);
        let follow_up = clusters.get(1).and_then(|second| {
            let d = second[0].distance_m;
            (d > lead && d <= 2.0 * lead).then(|| phrase::cluster_follow_up(d))
        });

        self.cooldowns.record_all(first.iter().map(|a| a.hazard.key()), now);
        let ann = Announcement { primary: text, follow_up, focus: prefs.audio_focus };
        self.deliver(prefs, &ann, true);
        Some(ann)
    }

    /// Push one announcement through every enabled side channel
    ///
    /// `hazard_tag` distinguishes point/cluster callouts (haptic tap plus a
    /// HAZARD_APPROACHING state event) from zone transitions.
    fn deliver(&self, prefs: &PrefsSnapshot, ann: &Announcement, hazard_tag: bool) {
        if hazard_tag && prefs.haptics_enabled {
            if let Err(e) = self.haptics.tap() {
                warn!(error = %e, "Haptic sink failed");
            }
        }
        if prefs.audio_enabled {
            if let Err(e) = self.announcer.announce(ann) {
                warn!(error = %e, "Announcement sink failed");
            }
        }
        if prefs.visual_enabled {
            if let Err(e) = self.ui.overlay_text(&ann.primary) {
                warn!(error = %e, "Overlay sink failed");
            }
        }
        if hazard_tag {
            if let Err(e) = self.ui.state(UiStateTag::HazardApproaching, None) {
                warn!(error = %e, "UI state sink failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hazard_store::{Hazard, MemoryHazardStore};
    use prefs::MemoryPrefs;
    use std::sync::Mutex;

    use crate::ports::SinkError;

    const LAT_PER_M: f64 = 1.0 / 111_195.0;

    #[derive(Default)]
    struct Recorder {
        announcements: Mutex<Vec<Announcement>>,
        overlays: Mutex<Vec<String>>,
        states: Mutex<Vec<(UiStateTag, Option<u32>)>>,
        taps: Mutex<usize>,
        fail_speech: bool,
    }

    impl AnnouncementSink for Recorder {
        fn announce(&self, announcement: &Announcement) -> Result<(), SinkError> {
            if self.fail_speech {
                return Err(SinkError("engine not ready".into()));
            }
            self.announcements.lock().unwrap().push(announcement.clone());
            Ok(())
        }
    }

    impl UiStateSink for Recorder {
        fn overlay_text(&self, text: &str) -> Result<(), SinkError> {
            self.overlays.lock().unwrap().push(text.to_string());
            Ok(())
        }
        fn state(&self, tag: UiStateTag, speed_limit_kph: Option<u32>) -> Result<(), SinkError> {
            self.states.lock().unwrap().push((tag, speed_limit_kph));
            Ok(())
        }
    }

    impl HapticSink for Recorder {
        fn tap(&self) -> Result<(), SinkError> {
            *self.taps.lock().unwrap() += 1;
            Ok(())
        }
    }

    struct Harness {
        engine: AlertEngine,
        recorder: Arc<Recorder>,
        prefs: Arc<MemoryPrefs>,
    }

    fn harness(hazards: Vec<Hazard>) -> Harness {
        let mut store = MemoryHazardStore::new();
        store.load_seed(hazards);
        let recorder = Arc::new(Recorder::default());
        let prefs = Arc::new(MemoryPrefs::default());
        let engine = AlertEngine::new(
            EngineConfig::default(),
            prefs.clone(),
            Arc::new(store),
            recorder.clone(),
            recorder.clone(),
            recorder.clone(),
        );
        Harness { engine, recorder, prefs }
    }

    fn fix_north(north_m: f64, speed_mps: f64, bearing: Option<f64>, t_ms: u64) -> LocationFix {
        LocationFix {
            lat: 48.0 + north_m * LAT_PER_M,
            lon: 11.0,
            speed_mps,
            bearing_deg: bearing,
            timestamp_ms: t_ms,
        }
    }

    fn bump_at(north_m: f64) -> Hazard {
        Hazard::point(HazardType::SpeedBump, 48.0 + north_m * LAT_PER_M, 11.0)
    }

    #[test]
    fn test_single_hazard_ahead_announced() {
        let mut h = harness(vec![bump_at(100.0)]);
        h.prefs.set_cluster(false, 30.0);

        let outcome = h.engine.process_fix(&fix_north(0.0, 15.0, Some(0.0), 1_000));
        let ann = outcome.announced.expect("should announce");
        assert_eq!(ann.primary, "Speed bump in 100 m");
        assert_eq!(*h.recorder.taps.lock().unwrap(), 1);
        assert!(h
            .recorder
            .states
            .lock()
            .unwrap()
            .contains(&(UiStateTag::HazardApproaching, None)));
    }

    #[test]
    fn test_per_hazard_cooldown_across_fixes() {
        let mut h = harness(vec![bump_at(150.0)]);
        h.prefs.set_cluster(false, 30.0);

        let first = h.engine.process_fix(&fix_north(0.0, 15.0, Some(0.0), 1_000));
        assert!(first.announced.is_some());

        // 10 s later: same key suppressed (global gap has passed)
        let second = h.engine.process_fix(&fix_north(0.0, 15.0, Some(0.0), 11_000));
        assert!(second.announced.is_none());

        // 31 s later: the 30 s window elapsed
        let third = h.engine.process_fix(&fix_north(0.0, 15.0, Some(0.0), 32_000));
        assert!(third.announced.is_some());
    }

    #[test]
    fn test_global_gap_blocks_other_hazards() {
        let mut h = harness(vec![bump_at(100.0), bump_at(400.0)]);
        h.prefs.set_cluster(false, 30.0);

        assert!(h.engine.process_fix(&fix_north(0.0, 15.0, Some(0.0), 1_000)).announced.is_some());
        // 5 s later a different hazard is in range, but the global 10 s gap holds
        let out = h.engine.process_fix(&fix_north(290.0, 15.0, Some(0.0), 6_000));
        assert!(out.announced.is_none());
    }

    #[test]
    fn test_low_motion_skips_point_callouts() {
        let mut h = harness(vec![bump_at(50.0)]);
        let out = h.engine.process_fix(&fix_north(0.0, 1.0, Some(0.0), 1_000));
        assert!(out.announced.is_none());
    }

    #[test]
    fn test_mute_silences_everything() {
        let mut h = harness(vec![bump_at(100.0)]);
        h.prefs.set_muted_until(1_000_000);
        let out = h.engine.process_fix(&fix_north(0.0, 15.0, Some(0.0), 1_000));
        assert!(out.announced.is_none());
        assert!(h.recorder.overlays.lock().unwrap().is_empty());
    }

    #[test]
    fn test_no_bearing_fallback_selects_nearest() {
        let mut h = harness(vec![bump_at(120.0), bump_at(50.0), bump_at(80.0)]);
        let out = h.engine.process_fix(&fix_north(0.0, 5.0, None, 1_000));
        let ann = out.announced.expect("fallback must not reject for missing bearing");
        assert_eq!(ann.primary, "Speed bump in 50 m");
    }

    #[test]
    fn test_cluster_path_groups_nearby_bumps() {
        // 72 km/h with bearing: cluster path active; two bumps 20 m apart
        let mut h = harness(vec![bump_at(100.0), bump_at(120.0)]);
        let out = h.engine.process_fix(&fix_north(0.0, 20.0, Some(0.0), 1_000));
        let ann = out.announced.expect("cluster should announce");
        assert_eq!(ann.primary, "Speed bump cluster in 100 m");
    }

    #[test]
    fn test_follow_up_quiets_next_hazard_at_slow_speed() {
        let mut h = harness(vec![bump_at(80.0), bump_at(200.0)]);
        h.prefs.set_cluster(false, 30.0);

        // 27 km/h: below the 40 km/h threshold
        let out = h.engine.process_fix(&fix_north(0.0, 7.5, Some(0.0), 1_000));
        let ann = out.announced.unwrap();
        assert_eq!(ann.primary, "Speed bump in 80 m");
        assert_eq!(ann.follow_up.as_deref(), Some("Next, Speed bump 200 m away"));

        // Drive past the first bump; the second was just mentioned and is
        // quieted even though it is now the upcoming selection
        let out = h.engine.process_fix(&fix_north(120.0, 7.5, Some(0.0), 12_000));
        assert!(out.announced.is_none());

        // After the quiet window the second bump may be announced
        let out = h.engine.process_fix(&fix_north(120.0, 7.5, Some(0.0), 22_000));
        assert!(out.announced.is_some());
    }

    #[test]
    fn test_zone_entry_and_warning_state() {
        let zone = Hazard::zone(48.0, 11.0, 60);
        let mut h = harness(vec![zone]);
        h.prefs.set_cluster(false, 30.0);

        // 150 m out: still outside
        let out = h.engine.process_fix(&fix_north(-150.0, 15.0, Some(0.0), 1_000));
        assert!(out.zone_events.is_empty());

        // 50 m out at 54 km/h: entry with the limit in the message
        let out = h.engine.process_fix(&fix_north(-50.0, 15.0, Some(0.0), 2_000));
        assert_eq!(out.zone_events, vec![ZoneEvent::Entered { limit_kph: Some(60) }]);
        assert!(h
            .recorder
            .overlays
            .lock()
            .unwrap()
            .iter()
            .any(|t| t.contains("60")));
        assert_eq!(out.speed_status, Some(SpeedStatus::Normal));

        // Inside at 75 km/h: over by 15 -> CRITICAL
        let out = h.engine.process_fix(&fix_north(-40.0, 20.83, Some(0.0), 3_000));
        assert_eq!(out.speed_status, Some(SpeedStatus::Critical));

        // Inside at 68 km/h: over by 8 -> WARNING, limit carried on the tag
        let out = h.engine.process_fix(&fix_north(-30.0, 18.9, Some(0.0), 4_000));
        assert_eq!(out.speed_status, Some(SpeedStatus::Warning));
        assert!(h
            .recorder
            .states
            .lock()
            .unwrap()
            .contains(&(UiStateTag::Warning, Some(60))));
    }

    #[test]
    fn test_speech_failure_degrades_silently() {
        let mut store = MemoryHazardStore::new();
        store.load_seed(vec![bump_at(100.0)]);
        let recorder = Arc::new(Recorder { fail_speech: true, ..Default::default() });
        let prefs = Arc::new(MemoryPrefs::default());
        prefs.set_cluster(false, 30.0);
        let mut engine = AlertEngine::new(
            EngineConfig::default(),
            prefs,
            Arc::new(store),
            recorder.clone(),
            recorder.clone(),
            recorder.clone(),
        );

        // Speech errors: the fix still completes and the overlay still fires
        let out = engine.process_fix(&fix_north(0.0, 15.0, Some(0.0), 1_000));
        assert!(out.announced.is_some());
        assert_eq!(h_overlay_count(&recorder), 1);
    }

    fn h_overlay_count(r: &Recorder) -> usize {
        r.overlays.lock().unwrap().len()
    }
}
