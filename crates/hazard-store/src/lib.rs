//! Hazard Catalog
//!
//! Record model and in-memory store for road hazards:
//! - Point hazards (speed bumps, potholes, rumble strips)
//! - Zone hazards (speed-limit zones with start/end and limit)
//! - Deterministic keys for deduplication, voting, and cooldown tracking
//!
//! The store is the sole writer of hazard records. Consumers receive
//! snapshots and never mutate them.

mod hazard;
mod store;

pub use hazard::{Directionality, Hazard, HazardType, ParseHazardError, Provenance};
pub use store::{HazardSource, MemoryHazardStore};
