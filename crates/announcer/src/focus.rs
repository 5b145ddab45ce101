//! Audio focus lifecycle

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::route::AudioDevice;

/// Releases audio focus and any temporary route change exactly once
///
/// One guard is created per announcement, whether or not focus was granted
/// or the route was ever usable. `release` is idempotent and fires on every
/// exit path: speech done, speech error, or the guard being dropped without
/// a completion callback ever arriving.
pub struct FocusGuard {
    device: Arc<dyn AudioDevice>,
    granted: bool,
    comm_entered: bool,
    released: AtomicBool,
}

impl FocusGuard {
    pub fn new(device: Arc<dyn AudioDevice>, granted: bool, comm_entered: bool) -> Self {
        Self { device, granted, comm_entered, released: AtomicBool::new(false) }
    }

    /// Release focus and restore the device audio mode; later calls are no-ops
    pub fn release(&self) {
        if self.released.swap(true, Ordering::SeqCst) {
            return;
        }
        if self.granted {
            self.device.release_focus();
        }
        if self.comm_entered {
            self.device.exit_comm_mode();
        }
        debug!(granted = self.granted, comm = self.comm_entered, "Audio focus released");
    }
}

impl Drop for FocusGuard {
    fn drop(&mut self) {
        self.release();
    }
}
