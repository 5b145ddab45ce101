//! Spoken message construction

use hazard_store::HazardType;

use crate::zone::ZoneEvent;

/// Round a distance the way a voice prompt should say it
pub fn nice_distance(meters: f64) -> String {
    let m = meters.round() as i64;
    if m < 50 {
        "<50 m".to_string()
    } else if m < 200 {
        format!("{} m", (m / 10) * 10)
    } else if m < 1000 {
        format!("{} m", (m / 50) * 50)
    } else {
        format!("{:.1} km", m as f64 / 1000.0)
    }
}

/// "Speed bump in 150 m"
pub fn point_alert(hazard_type: HazardType, distance_m: f64) -> String {
    format!("{} in {}", hazard_type.spoken_name(), nice_distance(distance_m))
}

/// "Next, Pothole 250 m away"
pub fn next_follow_up(hazard_type: HazardType, distance_m: f64) -> String {
    format!("Next, {} {} away", hazard_type.spoken_name(), nice_distance(distance_m))
}

/// Cluster text: singleton keeps its own label; typed runs get "cluster";
/// mixed runs of other types announce generically
pub fn cluster_alert(label: &str, show_type: bool, size: usize, start_m: f64) -> String {
    let prefix = if size == 1 {
        label.to_string()
    } else if show_type {
        format!("{label} cluster")
    } else {
        "Multiple hazards".to_string()
    };
    format!("{prefix} in {}", nice_distance(start_m))
}

/// "Then another cluster 600 m away"
pub fn cluster_follow_up(start_m: f64) -> String {
    format!("Then another cluster {} away", nice_distance(start_m))
}

/// Spoken rendering of a zone-tracker event; the enter/exit phrases from
/// preferences cover zones with no known limit
pub fn zone_message(event: &ZoneEvent, enter_phrase: &str, exit_phrase: &str) -> String {
    match event {
        ZoneEvent::Entered { limit_kph: Some(limit) } => {
            format!("Entering speed limit zone: limit is {limit} km/h")
        }
        ZoneEvent::Entered { limit_kph: None } => enter_phrase.to_string(),
        ZoneEvent::Repeat { limit_kph: Some(limit) } => format!("Speed limit {limit} km/h"),
        ZoneEvent::Repeat { limit_kph: None } => enter_phrase.to_string(),
        ZoneEvent::ExitSoon { remaining_m } => {
            format!("Exiting speed limit zone in {}", nice_distance(*remaining_m))
        }
        ZoneEvent::Exited { limit_kph: Some(_) } => "Exiting speed limit zone".to_string(),
        ZoneEvent::Exited { limit_kph: None } => exit_phrase.to_string(),
    }
}
