use crate::error::LocationUnavailable;
use crate::render;
use crate::types::{Coords, WorkoutKind};
use crate::workout::Workout;

/// Zoom level used when the map opens and when it flies to a workout.
pub const MAP_ZOOM: u8 = 15;

/// A pin with an always-open popup.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub coords: Coords,
    pub popup: String,
    pub style_class: String,
}

impl Marker {
    pub fn for_workout(w: &Workout) -> Self {
        Self {
            coords: w.coords(),
            popup: render::popup_text(w),
            style_class: render::popup_class(w.kind()),
        }
    }
}

/// The map widget plus geolocation.
///
/// Location picks travel the other way: whoever owns the widget forwards them to
/// [`Controller::pick_location`](crate::controller::Controller::pick_location).
pub trait MapAdapter {
    /// One-shot position lookup; no retry.
    fn current_position(&mut self) -> Result<Coords, LocationUnavailable>;
    fn place_marker(&mut self, marker: &Marker);
    fn center_on(&mut self, coords: Coords, zoom: u8);
}

/// The form and the workout list.
pub trait WorkoutView {
    fn render_workout(&mut self, workout: &Workout);
    fn show_form(&mut self);
    /// Clear the inputs and hide the form. Any redisplay delay is the view's business.
    fn hide_form(&mut self);
    fn toggle_metric_field(&mut self, kind: WorkoutKind);
    fn alert(&mut self, message: &str);
}
