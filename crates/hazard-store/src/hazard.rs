//! Hazard record model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error parsing a hazard enum from text
#[derive(Debug, Clone, Error)]
pub enum ParseHazardError {
    #[error("Unknown hazard type: {0}")]
    UnknownType(String),

    #[error("Unknown directionality: {0}")]
    UnknownDirectionality(String),
}

/// Kind of road hazard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HazardType {
    SpeedBump,
    Pothole,
    RumbleStrip,
    SpeedLimitZone,
}

impl HazardType {
    /// Name as spoken in announcements ("Speed bump", "Pothole", ...)
    pub fn spoken_name(&self) -> &'static str {
        match self {
            HazardType::SpeedBump => "Speed bump",
            HazardType::Pothole => "Pothole",
            HazardType::RumbleStrip => "Rumble strip",
            HazardType::SpeedLimitZone => "Speed limit zone",
        }
    }

    /// Stable uppercase token used in deterministic keys
    pub fn token(&self) -> &'static str {
        match self {
            HazardType::SpeedBump => "SPEED_BUMP",
            HazardType::Pothole => "POTHOLE",
            HazardType::RumbleStrip => "RUMBLE_STRIP",
            HazardType::SpeedLimitZone => "SPEED_LIMIT_ZONE",
        }
    }

    /// Parse case- and space-tolerant input ("speed bump", "SPEED_BUMP", ...)
    pub fn parse(raw: &str) -> Result<Self, ParseHazardError> {
        let key = raw.trim().to_uppercase().replace(' ', "_");
        match key.as_str() {
            "SPEED_BUMP" => Ok(HazardType::SpeedBump),
            "POTHOLE" => Ok(HazardType::Pothole),
            "RUMBLE_STRIP" => Ok(HazardType::RumbleStrip),
            "SPEED_LIMIT_ZONE" => Ok(HazardType::SpeedLimitZone),
            _ => Err(ParseHazardError::UnknownType(raw.to_string())),
        }
    }
}

/// Which travel direction a hazard applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Directionality {
    /// Applies only along the heading reported at creation time
    OneWay,
    /// Applies to both travel directions
    Bidirectional,
    /// Relevant only to oncoming traffic (divided highways)
    Opposite,
    #[default]
    Unknown,
}

/// Where a hazard record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Provenance {
    /// Bulk-loaded immutable reference set
    #[default]
    Seed,
    /// Crowd-sourced user report (mutable)
    User,
    /// Pulled from the remote backend
    RemoteSync,
}

/// A point or zone of interest to drivers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    /// Identity for user-reported hazards; seed hazards derive their key
    /// from (type, rounded position) instead
    pub id: Uuid,
    pub hazard_type: HazardType,
    pub lat: f64,
    pub lon: f64,
    /// Heading of the reporting vehicle at creation time, degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading_deg: Option<f64>,
    #[serde(default)]
    pub directionality: Directionality,
    pub active: bool,
    #[serde(default)]
    pub provenance: Provenance,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Zones only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_limit_kph: Option<u32>,
    /// Zone start point; a zone hazard always carries one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_start: Option<(f64, f64)>,
    /// Zone end point; may be absent (length inferred from heading continuity)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_end: Option<(f64, f64)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_length_m: Option<f64>,
    /// Community confidence signal
    #[serde(default)]
    pub votes: u32,
}

impl Hazard {
    /// New point hazard at the given position
    pub fn point(hazard_type: HazardType, lat: f64, lon: f64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            hazard_type,
            lat,
            lon,
            heading_deg: None,
            directionality: Directionality::Unknown,
            active: true,
            provenance: Provenance::Seed,
            created_at: now,
            updated_at: now,
            speed_limit_kph: None,
            zone_start: None,
            zone_end: None,
            zone_length_m: None,
            votes: 0,
        }
    }

    /// New speed-limit zone; the limit and start point are mandatory
    pub fn zone(lat: f64, lon: f64, limit_kph: u32) -> Self {
        let mut h = Self::point(HazardType::SpeedLimitZone, lat, lon);
        h.speed_limit_kph = Some(limit_kph);
        h.zone_start = Some((lat, lon));
        h
    }

    pub fn with_directionality(mut self, d: Directionality) -> Self {
        self.directionality = d;
        self
    }

    pub fn with_provenance(mut self, p: Provenance) -> Self {
        self.provenance = p;
        self
    }

    pub fn with_zone_length(mut self, length_m: f64) -> Self {
        self.zone_length_m = Some(length_m);
        self
    }

    /// Deterministic key governing dedup, votes, and cooldown bookkeeping
    ///
    /// Seed and remote hazards key on (type, position rounded to 6 decimals)
    /// so re-imports collapse onto the same record; user reports key on
    /// their generation-time id.
    pub fn key(&self) -> String {
        match self.provenance {
            Provenance::User => self.id.to_string(),
            _ => format!("{}|{:.6}|{:.6}", self.hazard_type.token(), self.lat, self.lon),
        }
    }

    /// Whether this record is usable as a speed-limit zone
    ///
    /// A record claiming zone type but missing the limit or start point is a
    /// data fault: it stays eligible as an ordinary point hazard but never
    /// drives zone behavior.
    pub fn is_valid_zone(&self) -> bool {
        self.hazard_type == HazardType::SpeedLimitZone
            && self.speed_limit_kph.is_some()
            && self.zone_start.is_some()
    }

    /// The point announcements aim at: zone start for valid zones, else the
    /// hazard's own coordinates
    pub fn target_point(&self) -> (f64, f64) {
        if self.hazard_type == HazardType::SpeedLimitZone {
            if let Some(start) = self.zone_start {
                return start;
            }
        }
        (self.lat, self.lon)
    }
}
