//! Map and view implementations that print to a terminal.

use crate::error::LocationUnavailable;
use crate::map::{MapAdapter, Marker, WorkoutView};
use crate::render;
use crate::types::{Coords, WorkoutKind};
use crate::workout::Workout;
use std::io::{self, Write};

/// A "map" that reports what it would draw.
///
/// The position is whatever the user passed on the command line; without one
/// geolocation is considered denied.
pub struct TerminalMap<W> {
    position: Option<Coords>,
    out: W,
}

impl TerminalMap<io::Stdout> {
    pub fn stdout(position: Option<Coords>) -> Self {
        Self::new(position, io::stdout())
    }
}

impl<W: Write> TerminalMap<W> {
    pub const fn new(position: Option<Coords>, out: W) -> Self {
        Self { position, out }
    }

    pub const fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}") {
            tracing::warn!(err = %e, "writing map output failed");
        }
    }
}

impl<W: Write> MapAdapter for TerminalMap<W> {
    fn current_position(&mut self) -> Result<Coords, LocationUnavailable> {
        self.position
            .ok_or_else(|| LocationUnavailable("no --position given".to_string()))
    }

    fn place_marker(&mut self, marker: &Marker) {
        tracing::debug!(coords = %marker.coords, class = %marker.style_class, "marker");
        self.line(&format!("📍 {} {}", marker.coords, marker.popup));
    }

    fn center_on(&mut self, coords: Coords, zoom: u8) {
        self.line(&format!("🗺  centered on {coords} (zoom {zoom})"));
    }
}

/// Workout list and form feedback on a terminal.
pub struct TerminalView<W> {
    out: W,
}

impl TerminalView<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalView<W> {
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    pub const fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}") {
            tracing::warn!(err = %e, "writing view output failed");
        }
    }
}

impl<W: Write> WorkoutView for TerminalView<W> {
    fn render_workout(&mut self, workout: &Workout) {
        self.line(&render::list_entry(workout));
    }

    fn show_form(&mut self) {
        crate::dlog!("form shown");
    }

    fn hide_form(&mut self) {
        crate::dlog!("form hidden");
    }

    fn toggle_metric_field(&mut self, kind: WorkoutKind) {
        let field = match kind {
            WorkoutKind::Running => "cadence",
            WorkoutKind::Cycling => "elevation",
        };
        crate::dlog!("metric field: {field}");
    }

    fn alert(&mut self, message: &str) {
        self.line(&format!("⚠ {message}"));
    }
}
