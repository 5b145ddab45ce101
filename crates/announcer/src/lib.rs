//! Announcement Dispatcher
//!
//! Turns an alert decision into an ordered speech request:
//! - Picks an audio output route (car audio over hands-free over speaker)
//! - Acquires transient audio focus (duck or exclusive) and releases it
//!   exactly once when all queued utterances complete or fail
//! - Raises output volume when it would be inaudible
//! - Degrades to silent operation on any hardware fault

mod dispatcher;
mod focus;
mod route;

pub use dispatcher::{Dispatcher, SpeechOutcome, SpeechSynth, Utterance};
pub use focus::FocusGuard;
pub use route::{select_route, AudioDevice, AudioOutput, RouteDecision};

use thiserror::Error;

/// Errors surfaced by audio hardware or the speech engine
#[derive(Debug, Clone, Error)]
pub enum AnnounceError {
    #[error("Audio route unavailable: {0}")]
    RouteUnavailable(String),

    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),
}
