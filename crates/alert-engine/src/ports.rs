//! Output ports
//!
//! The engine depends only on these interfaces, never on a concrete
//! delivery mechanism. Implementations live with the platform glue
//! (speech dispatcher, overlay broadcaster, vibrator).

use prefs::AudioFocusMode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A sink failed transiently; the engine degrades, it never aborts
#[derive(Debug, Clone, Error)]
#[error("Output sink failed: {0}")]
pub struct SinkError(pub String);

/// One spoken decision: a primary message plus an optional short follow-up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub primary: String,
    pub follow_up: Option<String>,
    /// How to acquire audio focus while speaking
    pub focus: AudioFocusMode,
}

/// Coarse state tag carried on the UI side channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UiStateTag {
    Normal,
    Warning,
    Critical,
    HazardApproaching,
}

/// Renders an ordered speech request
pub trait AnnouncementSink: Send + Sync {
    fn announce(&self, announcement: &Announcement) -> Result<(), SinkError>;
}

/// In-app overlay / state channel
pub trait UiStateSink: Send + Sync {
    fn overlay_text(&self, text: &str) -> Result<(), SinkError>;
    fn state(&self, tag: UiStateTag, speed_limit_kph: Option<u32>) -> Result<(), SinkError>;
}

/// Single short tap, at most once per announcement
pub trait HapticSink: Send + Sync {
    fn tap(&self) -> Result<(), SinkError>;
}
