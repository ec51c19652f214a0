//! Workout log pinned to map locations.
//!
//! A [`controller::Controller`] owns the workout list and talks to three
//! collaborators: a [`map::MapAdapter`], a [`storage::WorkoutStorage`], and a
//! [`map::WorkoutView`]. The binary wires them to a terminal and a SQLite file.

pub mod cli;
pub mod controller;
pub mod error;
pub mod form;
pub mod map;
pub mod render;
pub mod storage;
pub mod terminal;
pub mod types;
pub mod utils;
pub mod workout;
