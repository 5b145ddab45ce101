//! Audio output route selection

use prefs::AudioFocusMode;
use serde::{Deserialize, Serialize};

use crate::AnnounceError;

/// An audio sink the device currently exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AudioOutput {
    /// Stereo Bluetooth (car audio / media profile)
    BluetoothA2dp,
    /// Bluetooth hands-free voice link; requires communication mode
    BluetoothHandsFree,
    WiredHeadset,
    Speaker,
}

/// Chosen output plus whether the device must enter communication mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDecision {
    pub output: AudioOutput,
    pub comm_mode: bool,
}

/// Pick the best available output
///
/// Preference order: car audio (A2DP), then the hands-free voice link
/// (switching into communication mode), then a wired headset, then the
/// phone's own speaker. Pure so route logic is testable without hardware.
pub fn select_route(available: &[AudioOutput]) -> RouteDecision {
    if available.contains(&AudioOutput::BluetoothA2dp) {
        RouteDecision { output: AudioOutput::BluetoothA2dp, comm_mode: false }
    } else if available.contains(&AudioOutput::BluetoothHandsFree) {
        RouteDecision { output: AudioOutput::BluetoothHandsFree, comm_mode: true }
    } else if available.contains(&AudioOutput::WiredHeadset) {
        RouteDecision { output: AudioOutput::WiredHeadset, comm_mode: false }
    } else {
        RouteDecision { output: AudioOutput::Speaker, comm_mode: false }
    }
}

/// Injected hardware boundary: output enumeration, focus, communication
/// mode, and stream volume
pub trait AudioDevice: Send + Sync {
    fn available_outputs(&self) -> Vec<AudioOutput>;

    /// Request transient focus; false means denied
    fn request_focus(&self, mode: AudioFocusMode) -> bool;
    fn release_focus(&self);

    /// Switch into the hands-free communication profile
    fn enter_comm_mode(&self) -> Result<(), AnnounceError>;
    /// Restore the prior device audio mode; must be safe to call when
    /// communication mode was never entered
    fn exit_comm_mode(&self);

    /// (current, max) volume of the alert output stream
    fn stream_volume(&self) -> (u32, u32);
    fn set_stream_volume(&self, level: u32);
}
