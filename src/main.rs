#![deny(
    warnings,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

use anyhow::{Context, Result};
use clap::Parser;
use mapty::{
    cli::{self, Cmd},
    controller::Controller,
    form::FormInput,
    storage::{KvWorkoutStorage, SqliteStore},
    terminal::{TerminalMap, TerminalView},
    types::WorkoutKind,
    utils,
};

#[macro_use]
extern crate mapty;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    utils::init_logging(cli.verbose, cli.quiet);

    let store = SqliteStore::open(&cli.store)
        .with_context(|| format!("Opening workout store: {}", cli.store.display()))?;
    let mut app = Controller::new(
        TerminalMap::stdout(cli.position),
        KvWorkoutStorage::new(store),
        TerminalView::stdout(),
    );

    match cli.cmd.unwrap_or(Cmd::List) {
        Cmd::List => {
            dlog!("mode=list store={}", cli.store.display());
            let restored = app.bootstrap().context("Loading saved workouts")?;
            if restored == 0 {
                println!("No workouts yet. Add one with `mapty add`.");
                return Ok(());
            }
            if cli.position.is_some() {
                app.init_map()?;
            }
            Ok(())
        }
        Cmd::Add {
            kind,
            at,
            distance,
            duration,
            cadence,
            elevation,
        } => {
            dlog!("mode=add store={} at={at} type={kind}", cli.store.display());
            // Saving rewrites the whole list, so never start from a failed load.
            app.bootstrap().context("Loading saved workouts")?;
            app.init_map()?;
            app.pick_location(at)?;
            if let Ok(k) = kind.parse::<WorkoutKind>() {
                app.toggle_kind(k);
            }

            let workout = app.submit_form(&FormInput {
                kind,
                distance,
                duration,
                cadence,
                elevation,
            })?;
            tracing::info!(id = workout.id(), total = app.workouts().len(), "saved");
            println!("Saved {} ({})", workout.description(), workout.id());
            Ok(())
        }
        Cmd::Locate { id } => {
            dlog!("mode=locate store={} id={id}", cli.store.display());
            app.bootstrap().context("Loading saved workouts")?;
            if let Err(e) = app.init_map() {
                tracing::warn!(err = %e, "locating without a map");
            }
            let coords = app.locate_workout(&id)?;
            println!("{id}\t{coords}");
            Ok(())
        }
    }
}
