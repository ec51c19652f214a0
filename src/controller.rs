//! Application state: the workout list, the form, and the map lifecycle.
//!
//! Everything runs on one thread; each public method is one event handler and
//! finishes its state change before returning.

use crate::dlog;
use crate::error::{LocationUnavailable, NotFoundError, PersistenceError, ValidationError};
use crate::form::FormInput;
use crate::map::{MAP_ZOOM, MapAdapter, Marker, WorkoutView};
use crate::storage::WorkoutStorage;
use crate::types::{Coords, WorkoutKind};
use crate::workout::{Workout, id_for};
use chrono::{DateTime, Duration, Utc};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FormState {
    #[default]
    Idle,
    Open { coords: Coords, kind: WorkoutKind },
}

type Clock = Box<dyn FnMut() -> DateTime<Utc>>;

pub struct Controller<M, S, V> {
    map: M,
    storage: S,
    view: V,
    workouts: Vec<Workout>,
    form: FormState,
    /// Set once the map has been centered on the user's position.
    position: Option<Coords>,
    pending_markers: VecDeque<Marker>,
    clock: Clock,
}

impl<M: MapAdapter, S: WorkoutStorage, V: WorkoutView> Controller<M, S, V> {
    pub fn new(map: M, storage: S, view: V) -> Self {
        Self {
            map,
            storage,
            view,
            workouts: Vec::new(),
            form: FormState::Idle,
            position: None,
            pending_markers: VecDeque::new(),
            clock: Box::new(Utc::now),
        }
    }

    /// Replace the creation-time source.
    #[must_use]
    pub fn with_clock(mut self, clock: impl FnMut() -> DateTime<Utc> + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Restore the stored workouts and list them.
    ///
    /// Markers wait for [`Self::init_map`] unless the map is already up.
    pub fn bootstrap(&mut self) -> Result<usize, PersistenceError> {
        let workouts = match self.storage.load() {
            Ok(w) => w,
            Err(e) => {
                tracing::error!(err = %e, "loading stored workouts failed");
                self.view.alert(&format!("Could not load saved workouts: {e}"));
                return Err(e);
            }
        };

        if workouts.is_empty() {
            dlog!("bootstrap: nothing stored");
            return Ok(0);
        }

        self.workouts = workouts;
        for w in &self.workouts {
            self.view.render_workout(w);
        }
        let markers: Vec<Marker> = self.workouts.iter().map(Marker::for_workout).collect();
        for m in markers {
            self.show_marker(m);
        }

        tracing::info!(
            workouts = self.workouts.len(),
            pending_markers = self.pending_markers.len(),
            "restored workouts"
        );
        Ok(self.workouts.len())
    }

    /// Ask for the current position and open the map there.
    pub fn init_map(&mut self) -> Result<Coords, LocationUnavailable> {
        if let Some(pos) = self.position {
            dlog!("init_map: already initialized at {pos}");
            return Ok(pos);
        }

        let pos = match self.map.current_position() {
            Ok(pos) => pos,
            Err(e) => {
                tracing::warn!(err = %e, "map not initialized");
                self.view.alert("Could not get your position");
                return Err(e);
            }
        };

        self.map.center_on(pos, MAP_ZOOM);
        self.position = Some(pos);
        tracing::info!(position = %pos, pending = self.pending_markers.len(), "map ready");

        while let Some(m) = self.pending_markers.pop_front() {
            self.map.place_marker(&m);
        }
        Ok(pos)
    }

    /// A double-click on the map: open the form for that spot.
    pub fn pick_location(&mut self, coords: Coords) -> Result<(), LocationUnavailable> {
        if self.position.is_none() {
            return Err(LocationUnavailable("map is not ready".to_string()));
        }
        if !coords.is_valid() {
            tracing::warn!(lat = coords.lat, lng = coords.lng, "ignoring pick outside the map");
            return Err(LocationUnavailable(format!(
                "{},{} is not a place on the map",
                coords.lat, coords.lng
            )));
        }

        let kind = match self.form {
            FormState::Open { kind, .. } => kind,
            FormState::Idle => WorkoutKind::default(),
        };
        self.form = FormState::Open { coords, kind };
        self.view.show_form();
        dlog!("form open at {coords} kind={kind}");
        Ok(())
    }

    /// Switch between the cadence and elevation inputs.
    pub fn toggle_kind(&mut self, kind: WorkoutKind) {
        if let FormState::Open { kind: current, .. } = &mut self.form {
            if *current != kind {
                *current = kind;
                self.view.toggle_metric_field(kind);
            }
        } else {
            dlog!("toggle ignored, form is not open");
        }
    }

    pub fn cancel(&mut self) {
        if matches!(self.form, FormState::Open { .. }) {
            self.close_form();
        }
    }

    pub fn submit_form(&mut self, input: &FormInput) -> Result<Workout, ValidationError> {
        let submission = match input.coerce() {
            Ok(s) => s,
            Err(e) => return Err(self.reject(e)),
        };
        self.submit_workout(
            submission.kind,
            submission.distance_km,
            submission.duration_min,
            submission.metric,
        )
    }

    /// Validate, create, store, and show a workout at the picked location.
    ///
    /// `metric` is the cadence for running and the elevation gain for cycling.
    /// Elevation only has to be finite; every other value must also be positive.
    pub fn submit_workout(
        &mut self,
        kind: WorkoutKind,
        distance_km: f64,
        duration_min: f64,
        metric: f64,
    ) -> Result<Workout, ValidationError> {
        let FormState::Open { coords, .. } = self.form else {
            return Err(self.reject(ValidationError::NoLocation));
        };

        let workout = match self.build(kind, coords, distance_km, duration_min, metric) {
            Ok(w) => w,
            Err(e) => return Err(self.reject(e)),
        };

        self.workouts.push(workout.clone());
        tracing::info!(
            id = workout.id(),
            kind = %kind,
            distance_km,
            duration_min,
            "workout added"
        );

        self.persist();
        self.show_marker(Marker::for_workout(&workout));
        self.view.render_workout(&workout);
        self.close_form();

        Ok(workout)
    }

    /// Fly the map to a listed workout.
    pub fn locate_workout(&mut self, id: &str) -> Result<Coords, NotFoundError> {
        let Some(w) = self.workouts.iter().find(|w| w.id() == id) else {
            dlog!("locate: unknown id={id}");
            return Err(NotFoundError { id: id.to_string() });
        };

        let coords = w.coords();
        if self.position.is_some() {
            self.map.center_on(coords, MAP_ZOOM);
        }
        Ok(coords)
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub const fn form_state(&self) -> FormState {
        self.form
    }

    pub const fn is_map_ready(&self) -> bool {
        self.position.is_some()
    }

    pub const fn pending_markers(&self) -> &VecDeque<Marker> {
        &self.pending_markers
    }

    pub const fn map(&self) -> &M {
        &self.map
    }

    pub const fn view(&self) -> &V {
        &self.view
    }

    pub const fn storage(&self) -> &S {
        &self.storage
    }

    fn build(
        &mut self,
        kind: WorkoutKind,
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        metric: f64,
    ) -> Result<Workout, ValidationError> {
        let metric_field = match kind {
            WorkoutKind::Running => "cadence",
            WorkoutKind::Cycling => "elevation",
        };
        for (field, value) in [
            ("distance", distance_km),
            ("duration", duration_min),
            (metric_field, metric),
        ] {
            if !value.is_finite() {
                return Err(ValidationError::NotFinite { field, value });
            }
        }
        for (field, value) in [("distance", distance_km), ("duration", duration_min)] {
            if value <= 0.0 {
                return Err(ValidationError::NotPositive { field, value });
            }
        }

        let created_at = self.next_creation_time();
        let workout = match kind {
            WorkoutKind::Running => {
                if metric <= 0.0 {
                    return Err(ValidationError::NotPositive {
                        field: metric_field,
                        value: metric,
                    });
                }
                if metric.fract() != 0.0 || metric > f64::from(u32::MAX) {
                    return Err(ValidationError::NotWhole {
                        field: metric_field,
                        value: metric,
                    });
                }
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let cadence = metric as u32;
                Workout::running_at(created_at, coords, distance_km, duration_min, cadence)?
            }
            WorkoutKind::Cycling => {
                Workout::cycling_at(created_at, coords, distance_km, duration_min, metric)?
            }
        };
        Ok(workout)
    }

    /// Ids come from the creation millisecond; step past any already taken.
    fn next_creation_time(&mut self) -> DateTime<Utc> {
        let mut at = (self.clock)();
        while self.workouts.iter().any(|w| w.id() == id_for(&at)) {
            at += Duration::milliseconds(1);
        }
        at
    }

    fn persist(&mut self) {
        if let Err(e) = self.storage.save(&self.workouts) {
            tracing::error!(err = %e, workouts = self.workouts.len(), "saving workouts failed");
            self.view.alert(&format!("Could not save workouts: {e}"));
        }
    }

    fn show_marker(&mut self, marker: Marker) {
        if self.position.is_some() {
            self.map.place_marker(&marker);
        } else {
            self.pending_markers.push_back(marker);
        }
    }

    fn close_form(&mut self) {
        self.form = FormState::Idle;
        self.view.hide_form();
    }

    fn reject(&mut self, e: ValidationError) -> ValidationError {
        tracing::warn!(err = %e, "workout rejected");
        self.view.alert(&format!("Invalid workout: {e}"));
        e
    }
}
