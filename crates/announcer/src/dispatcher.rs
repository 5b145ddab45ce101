//! Speech dispatch

use std::sync::Arc;

use alert_engine::{Announcement, AnnouncementSink, SinkError};
use tracing::{debug, warn};

use crate::focus::FocusGuard;
use crate::route::{select_route, AudioDevice, AudioOutput, RouteDecision};
use crate::AnnounceError;

/// One queued text-to-speech request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub id: String,
    pub text: String,
}

/// Terminal state of a speech queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechOutcome {
    Done,
    Error,
}

/// Asynchronous speech engine boundary
///
/// `speak` must return immediately; queuing flushes (interrupts and
/// replaces) any pending utterances. The completion callback fires once
/// when the whole queue finishes or fails and is the release point for
/// focus and route changes.
pub trait SpeechSynth: Send + Sync {
    fn is_ready(&self) -> bool;

    fn speak(
        &self,
        utterances: Vec<Utterance>,
        route: RouteDecision,
        on_complete: Box<dyn FnOnce(SpeechOutcome) + Send>,
    ) -> Result<(), AnnounceError>;
}

/// Renders engine announcements through real audio hardware
///
/// Every failure path degrades to silent/visual-only operation; nothing
/// here ever propagates an error back into fix processing.
pub struct Dispatcher {
    device: Arc<dyn AudioDevice>,
    synth: Arc<dyn SpeechSynth>,
}

impl Dispatcher {
    pub fn new(device: Arc<dyn AudioDevice>, synth: Arc<dyn SpeechSynth>) -> Self {
        Self { device, synth }
    }

    /// Raise the alert stream to full volume when it sits below half
    fn ensure_volume(&self) {
        let (current, max) = self.device.stream_volume();
        if current < max / 2 {
            debug!(current, max, "Raising alert stream volume");
            self.device.set_stream_volume(max);
        }
    }

    fn utterances(announcement: &Announcement) -> Vec<Utterance> {
        match &announcement.follow_up {
            None => vec![Utterance { id: "rw_live".into(), text: announcement.primary.clone() }],
            Some(follow_up) => vec![
                Utterance { id: "rw_next_1".into(), text: announcement.primary.clone() },
                Utterance { id: "rw_next_2".into(), text: follow_up.clone() },
            ],
        }
    }
}

impl AnnouncementSink for Dispatcher {
    fn announce(&self, announcement: &Announcement) -> Result<(), SinkError> {
        if !self.synth.is_ready() {
            warn!("Speech engine not ready, dropping announcement");
            return Ok(());
        }

        let mut route = select_route(&self.device.available_outputs());
        let mut comm_entered = false;
        if route.comm_mode {
            match self.device.enter_comm_mode() {
                Ok(()) => comm_entered = true,
                Err(e) => {
                    // Hands-free link refused: drop down to the speaker
                    warn!(error = %e, "Communication mode unavailable, using speaker");
                    route = RouteDecision { output: AudioOutput::Speaker, comm_mode: false };
                }
            }
        }

        self.ensure_volume();

        let granted = self.device.request_focus(announcement.focus);
        if !granted {
            warn!("Audio focus denied, speaking anyway");
        }
        let guard = Arc::new(FocusGuard::new(self.device.clone(), granted, comm_entered));

        let callback_guard = guard.clone();
        let result = self.synth.speak(
            Self::utterances(announcement),
            route,
            Box::new(move |outcome| {
                if outcome == SpeechOutcome::Error {
                    warn!("Speech queue ended in error");
                }
                callback_guard.release();
            }),
        );

        if let Err(e) = result {
            warn!(error = %e, "Speech enqueue failed");
            guard.release();
        }
        Ok(())
    }
}
