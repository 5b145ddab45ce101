//! Drive Simulator - Main Entry Point
//!
//! Replays a recorded GPS trace against a hazard seed file and logs every
//! decision the alert engine makes. Useful for tuning curves and
//! thresholds without a car.

use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;

use anyhow::Context;
use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use alert_engine::{
    AlertEngine, Announcement, EngineConfig, HapticSink, LocationFix, SinkError, UiStateSink,
    UiStateTag,
};
use announcer::{
    AudioDevice, AudioOutput, Dispatcher, RouteDecision, SpeechOutcome, SpeechSynth, Utterance,
};
use hazard_store::{Directionality, Hazard, HazardType, MemoryHazardStore};
use prefs::{AudioFocusMode, MemoryPrefs};

/// One row of the hazard seed file
#[derive(Debug, Deserialize)]
struct SeedRecord {
    #[serde(rename = "type")]
    hazard_type: String,
    lat: f64,
    lon: f64,
    #[serde(default)]
    directionality: Option<Directionality>,
    #[serde(default)]
    speed_limit_kph: Option<u32>,
    #[serde(default)]
    zone_length_m: Option<f64>,
}

impl SeedRecord {
    fn into_hazard(self) -> anyhow::Result<Hazard> {
        let hazard_type = HazardType::parse(&self.hazard_type)?;
        let mut h = match (hazard_type, self.speed_limit_kph) {
            (HazardType::SpeedLimitZone, Some(limit)) => Hazard::zone(self.lat, self.lon, limit),
            (HazardType::SpeedLimitZone, None) => {
                warn!(lat = self.lat, lon = self.lon, "Zone record without limit, keeping as point");
                Hazard::point(hazard_type, self.lat, self.lon)
            }
            _ => Hazard::point(hazard_type, self.lat, self.lon),
        };
        if let Some(d) = self.directionality {
            h.directionality = d;
        }
        if let Some(len) = self.zone_length_m {
            h.zone_length_m = Some(len);
        }
        Ok(h)
    }
}

/// Speaks to the log and completes instantly
struct ConsoleSynth;

impl SpeechSynth for ConsoleSynth {
    fn is_ready(&self) -> bool {
        true
    }

    fn speak(
        &self,
        utterances: Vec<Utterance>,
        route: RouteDecision,
        on_complete: Box<dyn FnOnce(SpeechOutcome) + Send>,
    ) -> Result<(), announcer::AnnounceError> {
        for u in &utterances {
            info!(route = ?route.output, "TTS: {}", u.text);
        }
        on_complete(SpeechOutcome::Done);
        Ok(())
    }
}

/// Phone-speaker-only device with no focus contention
struct ConsoleDevice;

impl AudioDevice for ConsoleDevice {
    fn available_outputs(&self) -> Vec<AudioOutput> {
        vec![AudioOutput::Speaker]
    }
    fn request_focus(&self, _mode: AudioFocusMode) -> bool {
        true
    }
    fn release_focus(&self) {}
    fn enter_comm_mode(&self) -> Result<(), announcer::AnnounceError> {
        Ok(())
    }
    fn exit_comm_mode(&self) {}
    fn stream_volume(&self) -> (u32, u32) {
        (10, 10)
    }
    fn set_stream_volume(&self, _level: u32) {}
}

struct ConsoleUi;

impl UiStateSink for ConsoleUi {
    fn overlay_text(&self, text: &str) -> Result<(), SinkError> {
        info!("Overlay: {text}");
        Ok(())
    }
    fn state(&self, tag: UiStateTag, speed_limit_kph: Option<u32>) -> Result<(), SinkError> {
        info!(?tag, limit = ?speed_limit_kph, "UI state");
        Ok(())
    }
}

struct ConsoleHaptics;

impl HapticSink for ConsoleHaptics {
    fn tap(&self) -> Result<(), SinkError> {
        info!("Haptic tap");
        Ok(())
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
}

fn load_json<T: serde::de::DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let file = File::open(path).with_context(|| format!("opening {path}"))?;
    serde_json::from_reader(BufReader::new(file)).with_context(|| format!("parsing {path}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    info!("=== RoadWatch Drive Simulator v{} ===", env!("CARGO_PKG_VERSION"));

    let mut args = std::env::args().skip(1);
    let hazards_path = args.next().unwrap_or_else(|| "data/hazards.json".to_string());
    let trace_path = args.next().unwrap_or_else(|| "data/trace.json".to_string());
    let prefs_path = args.next();

    let seed: Vec<SeedRecord> = load_json(&hazards_path)?;
    let fixes: Vec<LocationFix> = load_json(&trace_path)?;

    let mut store = MemoryHazardStore::new();
    let hazards: Vec<Hazard> =
        seed.into_iter().map(SeedRecord::into_hazard).collect::<Result<_, _>>()?;
    let loaded = store.load_seed(hazards);
    info!(hazards = loaded, fixes = fixes.len(), "Simulation input loaded");

    let snapshot = prefs::load_prefs(prefs_path.as_deref())?;
    let prefs = Arc::new(MemoryPrefs::new(snapshot));

    let dispatcher = Dispatcher::new(Arc::new(ConsoleDevice), Arc::new(ConsoleSynth));
    let mut engine = AlertEngine::new(
        EngineConfig::default(),
        prefs,
        Arc::new(store),
        Arc::new(dispatcher),
        Arc::new(ConsoleUi),
        Arc::new(ConsoleHaptics),
    );

    let mut announced: Vec<Announcement> = Vec::new();
    let mut zone_events = 0usize;
    for fix in &fixes {
        let outcome = engine.process_fix(fix);
        zone_events += outcome.zone_events.len();
        if let Some(ann) = outcome.announced {
            announced.push(ann);
        }
    }

    info!(
        fixes = fixes.len(),
        announcements = announced.len(),
        zone_events,
        "Simulation complete"
    );
    Ok(())
}
