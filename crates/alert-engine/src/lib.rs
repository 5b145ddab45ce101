//! Proximity Alert Engine
//!
//! Decides which hazard (if any) to announce for each GPS fix:
//! - Speed-adaptive lookahead (lead distance) with named curves
//! - Directional filtering (heading agreement, lateral offset, along-track)
//! - Clustering of nearby hazards into a single spoken cue
//! - Per-hazard and global cooldowns with quiet-until overrides
//! - Speed-limit-zone entry/inside/exit state machine
//!
//! The engine owns all ephemeral alerting state exclusively and is designed
//! to run on a single execution context; fix processing never panics and
//! never propagates an error to its caller.

pub mod cluster;
pub mod config;
pub mod cooldown;
pub mod engine;
pub mod fix;
pub mod lead;
pub mod phrase;
pub mod ports;
pub mod ranking;
pub mod zone;

pub use config::EngineConfig;
pub use engine::{AlertEngine, FixOutcome};
pub use fix::LocationFix;
pub use ports::{Announcement, AnnouncementSink, HapticSink, SinkError, UiStateSink, UiStateTag};
pub use zone::{SpeedStatus, ZoneEvent, ZoneTracker};
