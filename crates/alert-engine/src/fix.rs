//! Location fix

use serde::{Deserialize, Serialize};

/// One GPS observation
///
/// Fixes arrive on a single logical stream, monotonically in time, and are
/// never retroactively revised. Bearing validity may be absent on any fix
/// (typically at very low speed); consumers must route through the
/// no-bearing fallback rather than fail.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LocationFix {
    pub lat: f64,
    pub lon: f64,
    /// Ground speed, meters per second; near-zero when stationary
    pub speed_mps: f64,
    /// Travel heading in degrees from north, if the receiver reported one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearing_deg: Option<f64>,
    /// Epoch milliseconds; also the engine's clock for cooldown windows
    pub timestamp_ms: u64,
}

impl LocationFix {
    pub fn speed_kph(&self) -> f64 {
        self.speed_mps * 3.6
    }

    /// Heading in radians, when a valid bearing exists
    pub fn heading_rad(&self) -> Option<f64> {
        self.bearing_deg.map(f64::to_radians)
    }
}
