use crate::types::Coords;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

const DEFAULT_STORE: &str = "mapty.sqlite3";

#[derive(Parser, Debug)]
#[command(
    name = "mapty",
    about = "Log running and cycling workouts at map locations"
)]
pub struct Cli {
    /// SQLite file holding the saved workouts.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_STORE, global = true)]
    pub store: PathBuf,

    /// Your current position as LAT,LNG. Without it the map stays closed.
    #[arg(long, value_name = "LAT,LNG", global = true, allow_hyphen_values = true)]
    pub position: Option<Coords>,

    /// Increase log verbosity (-v, -vv). Defaults to INFO.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease log verbosity (-q, -qq). Defaults to INFO.
    #[arg(short = 'q', long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[command(subcommand)]
    pub cmd: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Show saved workouts (default).
    List,

    /// Record a workout at a picked location.
    ///
    /// Values are taken as typed into a form: blank counts as zero.
    Add {
        /// running | cycling
        #[arg(long = "type", value_name = "TYPE", default_value = "running")]
        kind: String,

        /// Where the workout happened, as LAT,LNG.
        #[arg(long, value_name = "LAT,LNG", allow_hyphen_values = true)]
        at: Coords,

        /// Distance in km.
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        distance: String,

        /// Duration in minutes.
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        duration: String,

        /// Steps per minute (running).
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        cadence: String,

        /// Elevation gain in meters (cycling).
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        elevation: String,
    },

    /// Center the map on a saved workout.
    Locate {
        /// Workout id as shown by `list`.
        id: String,
    },
}
