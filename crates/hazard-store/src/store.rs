//! In-memory hazard store

use std::collections::HashMap;

use chrono::Utc;
use tracing::{debug, info};

use crate::hazard::{Hazard, Provenance};

/// Snapshot access to hazards plausibly near a point
///
/// Implementations own freshness and fallback policy. Consumers must not
/// assume the result is pre-filtered by distance or direction.
pub trait HazardSource: Send + Sync {
    fn candidates_near(&self, lat: f64, lon: f64) -> Vec<Hazard>;
}

/// Hazard catalog held in memory, keyed by deterministic hazard key
///
/// Seed loads are bulk and dedup on key; user reports are mutable
/// (toggle/remove/vote). The store is the only writer of hazard records.
#[derive(Default)]
pub struct MemoryHazardStore {
    by_key: HashMap<String, Hazard>,
}

impl MemoryHazardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bulk-load a seed set; duplicate keys collapse onto the first record.
    /// Returns the number of records actually inserted.
    pub fn load_seed(&mut self, hazards: Vec<Hazard>) -> usize {
        let mut inserted = 0;
        for h in hazards {
            let key = h.key();
            if self.by_key.contains_key(&key) {
                debug!(%key, "Skipping duplicate seed hazard");
                continue;
            }
            self.by_key.insert(key, h);
            inserted += 1;
        }
        info!(count = inserted, "Seed hazards loaded");
        inserted
    }

    /// Record a user report; returns the assigned key
    pub fn report(&mut self, mut hazard: Hazard) -> String {
        hazard.provenance = Provenance::User;
        hazard.updated_at = Utc::now();
        let key = hazard.key();
        info!(%key, hazard_type = ?hazard.hazard_type, "User hazard reported");
        self.by_key.insert(key.clone(), hazard);
        key
    }

    /// Flip a hazard's active flag; returns the new state, or None if unknown
    pub fn toggle_active(&mut self, key: &str) -> Option<bool> {
        let h = self.by_key.get_mut(key)?;
        h.active = !h.active;
        h.updated_at = Utc::now();
        Some(h.active)
    }

    pub fn remove(&mut self, key: &str) -> Option<Hazard> {
        self.by_key.remove(key)
    }

    /// Add a community confidence vote; returns the new count
    pub fn vote(&mut self, key: &str) -> Option<u32> {
        let h = self.by_key.get_mut(key)?;
        h.votes += 1;
        h.updated_at = Utc::now();
        Some(h.votes)
    }

    pub fn get(&self, key: &str) -> Option<&Hazard> {
        self.by_key.get(key)
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// All active hazards, unordered
    pub fn active_hazards(&self) -> Vec<Hazard> {
        self.by_key.values().filter(|h| h.active).cloned().collect()
    }
}

impl HazardSource for MemoryHazardStore {
    fn candidates_near(&self, _lat: f64, _lon: f64) -> Vec<Hazard> {
        // Catalog sizes here do not warrant spatial indexing; the alert
        // engine performs full distance/direction filtering itself.
        self.active_hazards()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hazard::HazardType;

    #[test]
    fn test_seed_load_dedups_on_key() {
        let mut store = MemoryHazardStore::new();
        let inserted = store.load_seed(vec![
            Hazard::point(HazardType::SpeedBump, 48.1, 11.5),
            Hazard::point(HazardType::SpeedBump, 48.1, 11.5),
            Hazard::point(HazardType::Pothole, 48.1, 11.5),
        ]);
        assert_eq!(inserted, 2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_user_reports_never_collide() {
        let mut store = MemoryHazardStore::new();
        let k1 = store.report(Hazard::point(HazardType::Pothole, 48.1, 11.5));
        let k2 = store.report(Hazard::point(HazardType::Pothole, 48.1, 11.5));
        assert_ne!(k1, k2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_toggle_and_snapshot() {
        let mut store = MemoryHazardStore::new();
        let key = store.report(Hazard::point(HazardType::SpeedBump, 48.1, 11.5));
        assert_eq!(store.candidates_near(48.1, 11.5).len(), 1);

        assert_eq!(store.toggle_active(&key), Some(false));
        assert!(store.candidates_near(48.1, 11.5).is_empty());
        assert_eq!(store.toggle_active(&key), Some(true));
        assert_eq!(store.candidates_near(48.1, 11.5).len(), 1);
    }

    #[test]
    fn test_vote_accumulates() {
        let mut store = MemoryHazardStore::new();
        let key = store.report(Hazard::point(HazardType::Pothole, 48.1, 11.5));
        assert_eq!(store.vote(&key), Some(1));
        assert_eq!(store.vote(&key), Some(2));
        assert_eq!(store.vote("no-such-key"), None);
    }

    #[test]
    fn test_remove() {
        let mut store = MemoryHazardStore::new();
        let key = store.report(Hazard::point(HazardType::Pothole, 48.1, 11.5));
        assert!(store.remove(&key).is_some());
        assert!(store.is_empty());
    }
}
