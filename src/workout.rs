//! The workout record and its two variants.
//!
//! Derived values (pace, speed, description) are computed once when a workout is
//! built and stored alongside the raw fields; nothing here recomputes them later.

use crate::error::InvalidMetricError;
use crate::types::{Coords, WorkoutKind};
use chrono::{DateTime, Datelike, Local, SubsecRound, TimeZone, Utc};
use serde::{Deserialize, Serialize};

pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Number of trailing epoch-millisecond digits kept as the id.
const ID_DIGITS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    id: String,
    #[serde(rename = "createdAtEpoch", with = "chrono::serde::ts_milliseconds")]
    created_at: DateTime<Utc>,
    coords: Coords,
    distance_km: f64,
    duration_min: f64,
    description: String,
    #[serde(flatten)]
    metrics: Metrics,
}

/// Variant payload. The `type` tag drives rehydration from storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Metrics {
    Running(Running),
    Cycling(Cycling),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Running {
    pub cadence_spm: u32,
    pub pace_min_per_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cycling {
    pub elevation_gain_m: f64,
    pub speed_km_per_h: f64,
}

impl Metrics {
    pub const fn kind(&self) -> WorkoutKind {
        match self {
            Self::Running(_) => WorkoutKind::Running,
            Self::Cycling(_) => WorkoutKind::Cycling,
        }
    }
}

impl Workout {
    pub fn running(
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        cadence_spm: u32,
    ) -> Result<Self, InvalidMetricError> {
        Self::running_at(Utc::now(), coords, distance_km, duration_min, cadence_spm)
    }

    pub fn cycling(
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
    ) -> Result<Self, InvalidMetricError> {
        Self::cycling_at(Utc::now(), coords, distance_km, duration_min, elevation_gain_m)
    }

    pub fn running_at(
        created_at: DateTime<Utc>,
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        cadence_spm: u32,
    ) -> Result<Self, InvalidMetricError> {
        ensure_located(coords)?;
        ensure_usable("distance_km", distance_km)?;
        ensure_usable("duration_min", duration_min)?;

        let pace_min_per_km = duration_min / distance_km;
        ensure_usable("pace_min_per_km", pace_min_per_km)?;
        let metrics = Metrics::Running(Running {
            cadence_spm,
            pace_min_per_km,
        });
        Ok(Self::assemble(
            created_at,
            coords,
            distance_km,
            duration_min,
            metrics,
        ))
    }

    pub fn cycling_at(
        created_at: DateTime<Utc>,
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
    ) -> Result<Self, InvalidMetricError> {
        ensure_located(coords)?;
        ensure_usable("distance_km", distance_km)?;
        ensure_usable("duration_min", duration_min)?;
        // Any finite elevation is fine, including zero and descents.
        if !elevation_gain_m.is_finite() {
            return Err(InvalidMetricError {
                field: "elevation_gain_m",
                value: elevation_gain_m,
            });
        }

        let speed_km_per_h = distance_km / (duration_min / 60.0);
        ensure_usable("speed_km_per_h", speed_km_per_h)?;
        let metrics = Metrics::Cycling(Cycling {
            elevation_gain_m,
            speed_km_per_h,
        });
        Ok(Self::assemble(
            created_at,
            coords,
            distance_km,
            duration_min,
            metrics,
        ))
    }

    fn assemble(
        created_at: DateTime<Utc>,
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        metrics: Metrics,
    ) -> Self {
        // Storage keeps epoch milliseconds; anything finer would not survive a reload.
        let created_at = created_at.trunc_subsecs(3);
        Self {
            id: id_for(&created_at),
            description: describe_in(metrics.kind(), &created_at, &Local),
            created_at,
            coords,
            distance_km,
            duration_min,
            metrics,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub const fn coords(&self) -> Coords {
        self.coords
    }

    pub const fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub const fn duration_min(&self) -> f64 {
        self.duration_min
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub const fn kind(&self) -> WorkoutKind {
        self.metrics.kind()
    }

    pub const fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub const fn pace_min_per_km(&self) -> Option<f64> {
        match &self.metrics {
            Metrics::Running(r) => Some(r.pace_min_per_km),
            Metrics::Cycling(_) => None,
        }
    }

    pub const fn speed_km_per_h(&self) -> Option<f64> {
        match &self.metrics {
            Metrics::Cycling(c) => Some(c.speed_km_per_h),
            Metrics::Running(_) => None,
        }
    }
}

/// Non-finite coordinates would be written to storage as `null` and break the next load.
fn ensure_located(coords: Coords) -> Result<(), InvalidMetricError> {
    if !(-90.0..=90.0).contains(&coords.lat) {
        return Err(InvalidMetricError {
            field: "latitude",
            value: coords.lat,
        });
    }
    if !coords.is_valid() {
        return Err(InvalidMetricError {
            field: "longitude",
            value: coords.lng,
        });
    }
    Ok(())
}

fn ensure_usable(field: &'static str, value: f64) -> Result<(), InvalidMetricError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(InvalidMetricError { field, value })
    }
}

/// Last ten digits of the creation time in epoch milliseconds.
pub fn id_for(created_at: &DateTime<Utc>) -> String {
    let ms = created_at.timestamp_millis().to_string();
    ms[ms.len().saturating_sub(ID_DIGITS)..].to_string()
}

/// `"<Type> on <Month> <day>"`.
///
/// The month comes from the UTC date while the day of month comes from `tz`.
/// Around midnight at a month boundary the two can disagree; that mix is kept
/// as-is so descriptions match what earlier sessions stored.
pub fn describe_in<Tz: TimeZone>(
    kind: WorkoutKind,
    created_at: &DateTime<Utc>,
    tz: &Tz,
) -> String {
    let month = MONTHS[created_at.month0() as usize];
    let day = created_at.with_timezone(tz).day();
    format!("{} on {month} {day}", kind.label())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    const HERE: Coords = Coords::new(39.47, -0.37);

    #[test]
    fn test_running_pace() {
        let w = Workout::running(HERE, 5.0, 25.0, 180).unwrap();
        assert_eq!(w.kind(), WorkoutKind::Running);
        assert_eq!(w.pace_min_per_km(), Some(5.0));
        assert_eq!(w.speed_km_per_h(), None);

        let w = Workout::running(HERE, 7.3, 41.9, 170).unwrap();
        assert_eq!(w.pace_min_per_km(), Some(41.9 / 7.3));
    }

    #[test]
    fn test_cycling_speed_any_elevation() {
        for elevation in [-10.0, 0.0, 523.5] {
            let w = Workout::cycling(HERE, 27.0, 95.0, elevation).unwrap();
            assert_eq!(w.speed_km_per_h(), Some(27.0 / (95.0 / 60.0)));
            assert_eq!(w.pace_min_per_km(), None);
        }
    }

    #[test]
    fn test_rejects_unusable_divisors() {
        let err = Workout::running(HERE, 0.0, 30.0, 170).unwrap_err();
        assert_eq!(err.field, "distance_km");
        assert!(Workout::running(HERE, 5.0, -1.0, 170).is_err());
        assert!(Workout::cycling(HERE, f64::NAN, 30.0, 0.0).is_err());
        assert!(Workout::cycling(HERE, 5.0, f64::INFINITY, 0.0).is_err());
        assert!(Workout::cycling(HERE, 5.0, 30.0, f64::NAN).is_err());
    }

    #[test]
    fn test_rejects_overflowing_derived_metrics() {
        let err = Workout::cycling(HERE, 1e300, 1e-300, 0.0).unwrap_err();
        assert_eq!(err.field, "speed_km_per_h");
        assert_eq!(err.value, f64::INFINITY);

        let err = Workout::running(HERE, 1e-300, 1e300, 170).unwrap_err();
        assert_eq!(err.field, "pace_min_per_km");

        // Underflow to zero is just as unusable as a pace.
        let err = Workout::running(HERE, 1e300, 1e-300, 170).unwrap_err();
        assert_eq!(err.field, "pace_min_per_km");
    }

    #[test]
    fn test_rejects_unplaceable_coords() {
        let err = Workout::running(Coords::new(f64::NAN, 1.0), 5.0, 25.0, 180).unwrap_err();
        assert_eq!(err.field, "latitude");
        let err =
            Workout::cycling(Coords::new(1.0, f64::INFINITY), 5.0, 25.0, 0.0).unwrap_err();
        assert_eq!(err.field, "longitude");
        assert!(Workout::cycling(Coords::new(91.0, 0.0), 5.0, 25.0, 0.0).is_err());
        assert!(Workout::running(Coords::new(-90.0, 180.0), 5.0, 25.0, 180).is_ok());
    }

    #[test]
    fn test_id_is_last_ten_ms_digits() {
        let t = at("2024-04-14T10:20:30.123456Z");
        let w = Workout::running_at(t, HERE, 5.0, 25.0, 180).unwrap();
        let ms = t.timestamp_millis().to_string();
        assert_eq!(w.id(), &ms[ms.len() - 10..]);
        assert_eq!(w.id().len(), 10);
        // Sub-millisecond precision is dropped at construction.
        assert_eq!(w.created_at().timestamp_subsec_nanos(), 123_000_000);
    }

    #[test]
    fn test_description_utc_month_local_day() {
        let t = at("2024-03-31T23:30:00Z");
        let east = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(
            describe_in(WorkoutKind::Running, &t, &east),
            "Running on March 1"
        );
        assert_eq!(
            describe_in(WorkoutKind::Cycling, &t, &Utc),
            "Cycling on March 31"
        );
    }

    #[test]
    fn test_description_uses_local_zone() {
        let t = at("2024-04-14T12:00:00Z");
        let w = Workout::running_at(t, HERE, 5.0, 25.0, 180).unwrap();
        assert_eq!(
            w.description(),
            format!("Running on April {}", t.with_timezone(&Local).day())
        );
    }

    #[test]
    fn test_persisted_shape() {
        let t = at("2024-04-14T12:00:00Z");
        let w = Workout::cycling_at(t, HERE, 20.0, 60.0, -10.0).unwrap();
        let v = serde_json::to_value(&w).unwrap();
        assert_eq!(v["type"], "cycling");
        assert_eq!(v["createdAtEpoch"], t.timestamp_millis());
        assert_eq!(v["coords"], serde_json::json!([39.47, -0.37]));
        assert_eq!(v["distanceKm"], 20.0);
        assert_eq!(v["durationMin"], 60.0);
        assert_eq!(v["elevationGainM"], -10.0);
        assert_eq!(v["speedKmPerH"], 20.0);
        assert!(v.get("cadenceSpm").is_none());
    }
}
