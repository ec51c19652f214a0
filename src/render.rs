//! Text shown for a workout: marker popups and list entries.

use crate::types::WorkoutKind;
use crate::workout::{Metrics, Workout};

pub const fn icon(kind: WorkoutKind) -> &'static str {
    match kind {
        WorkoutKind::Running => "🏃‍♂️",
        WorkoutKind::Cycling => "🚴‍♀️",
    }
}

pub fn popup_text(w: &Workout) -> String {
    format!("{} {}", icon(w.kind()), w.description())
}

pub fn popup_class(kind: WorkoutKind) -> String {
    format!("{kind}-popup")
}

/// One workout as a block of lines for the list panel.
pub fn list_entry(w: &Workout) -> String {
    let mut out = format!(
        "[{}] {}\n  {} {} km\n  ⏱ {} min\n",
        w.id(),
        w.description(),
        icon(w.kind()),
        w.distance_km(),
        w.duration_min()
    );
    match w.metrics() {
        Metrics::Running(r) => {
            out.push_str(&format!("  ⚡️ {:.1} min/km\n", r.pace_min_per_km));
            out.push_str(&format!("  🦶🏼 {} spm", r.cadence_spm));
        }
        Metrics::Cycling(c) => {
            out.push_str(&format!("  ⚡️ {:.1} km/h\n", c.speed_km_per_h));
            out.push_str(&format!("  ⛰ {} m", c.elevation_gain_m));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coords;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_popup() {
        let t = Utc.with_ymd_and_hms(2024, 4, 14, 12, 0, 0).unwrap();
        let w = Workout::cycling_at(t, Coords::new(0.0, 0.0), 10.0, 30.0, 50.0).unwrap();
        assert_eq!(popup_text(&w), format!("🚴‍♀️ {}", w.description()));
        assert_eq!(popup_class(w.kind()), "cycling-popup");
    }

    #[test]
    fn test_list_entry_running() {
        let t = Utc.with_ymd_and_hms(2024, 4, 14, 12, 0, 0).unwrap();
        let w = Workout::running_at(t, Coords::new(0.0, 0.0), 5.0, 26.0, 178).unwrap();
        let entry = list_entry(&w);
        assert!(entry.contains("5 km"));
        assert!(entry.contains("26 min"));
        assert!(entry.contains("5.2 min/km"));
        assert!(entry.contains("178 spm"));
    }

    #[test]
    fn test_list_entry_cycling() {
        let t = Utc.with_ymd_and_hms(2024, 4, 14, 12, 0, 0).unwrap();
        let w = Workout::cycling_at(t, Coords::new(0.0, 0.0), 12.0, 40.0, -10.0).unwrap();
        let entry = list_entry(&w);
        assert!(entry.contains("12 km"));
        assert!(entry.contains("18.0 km/h"));
        assert!(entry.contains("-10 m"));
    }
}
