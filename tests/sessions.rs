//! Workouts recorded in one session show up in the next one.

use mapty::controller::{Controller, FormState};
use mapty::error::NotFoundError;
use mapty::form::FormInput;
use mapty::map::MAP_ZOOM;
use mapty::storage::{KeyValueStore, KvWorkoutStorage, SqliteStore, WorkoutStorage};
use mapty::terminal::{TerminalMap, TerminalView};
use mapty::types::{Coords, WorkoutKind};
use std::path::Path;

const HOME: Coords = Coords::new(48.8566, 2.3522);
const TRACK: Coords = Coords::new(48.8462, 2.3371);
const RIVER: Coords = Coords::new(48.8606, 2.3376);

type Session = Controller<TerminalMap<Vec<u8>>, KvWorkoutStorage<SqliteStore>, TerminalView<Vec<u8>>>;

fn open_session(db: &Path, position: Option<Coords>) -> Session {
    Controller::new(
        TerminalMap::new(position, Vec::new()),
        KvWorkoutStorage::new(SqliteStore::open(db).unwrap()),
        TerminalView::new(Vec::new()),
    )
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[test]
fn workouts_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("mapty.sqlite3");

    let mut first = open_session(&db, Some(HOME));
    assert_eq!(first.bootstrap().unwrap(), 0);
    first.init_map().unwrap();

    first.pick_location(TRACK).unwrap();
    let run = first
        .submit_form(&FormInput {
            kind: "running".into(),
            distance: "5".into(),
            duration: "25".into(),
            cadence: "180".into(),
            elevation: String::new(),
        })
        .unwrap();

    first.pick_location(RIVER).unwrap();
    first.toggle_kind(WorkoutKind::Cycling);
    let ride = first
        .submit_form(&FormInput {
            kind: "cycling".into(),
            distance: "30".into(),
            duration: "90".into(),
            cadence: String::new(),
            elevation: "-10".into(),
        })
        .unwrap();
    assert_eq!(first.form_state(), FormState::Idle);

    let map_out = text(first.map().get_ref());
    assert!(map_out.contains(run.description()));
    assert!(map_out.contains(ride.description()));
    drop(first);

    // No position: the list renders, the markers wait.
    let mut second = open_session(&db, None);
    assert_eq!(second.bootstrap().unwrap(), 2);
    assert_eq!(second.workouts(), &[run.clone(), ride.clone()]);
    assert_eq!(second.workouts()[0].pace_min_per_km(), Some(5.0));
    assert_eq!(second.workouts()[1].speed_km_per_h(), Some(20.0));
    assert_eq!(second.pending_markers().len(), 2);
    assert!(second.map().get_ref().is_empty());

    let listed = text(second.view().get_ref());
    let run_at = listed.find(run.id()).unwrap();
    let ride_at = listed.find(ride.id()).unwrap();
    assert!(run_at < ride_at);
    assert!(listed.contains("5.0 min/km"));
    assert!(listed.contains("20.0 km/h"));

    assert!(second.init_map().is_err());
    assert!(text(second.view().get_ref()).contains("Could not get your position"));
    assert!(second.pick_location(TRACK).is_err());

    // Locating still answers even though nothing can be drawn.
    assert_eq!(second.locate_workout(ride.id()), Ok(RIVER));
    assert_eq!(
        second.locate_workout("0000000000"),
        Err(NotFoundError {
            id: "0000000000".into()
        })
    );
}

#[test]
fn markers_flush_once_map_is_ready() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("mapty.sqlite3");

    let mut first = open_session(&db, Some(HOME));
    first.init_map().unwrap();
    first.pick_location(TRACK).unwrap();
    let run = first
        .submit_workout(WorkoutKind::Running, 10.0, 52.0, 172.0)
        .unwrap();
    drop(first);

    let mut second = open_session(&db, Some(HOME));
    second.bootstrap().unwrap();
    assert_eq!(second.pending_markers().len(), 1);
    second.init_map().unwrap();
    assert!(second.pending_markers().is_empty());

    let map_out = text(second.map().get_ref());
    let centered = map_out
        .find(&format!("centered on {HOME} (zoom {MAP_ZOOM})"))
        .unwrap();
    let marker = map_out.find(run.description()).unwrap();
    assert!(centered < marker);

    second.locate_workout(run.id()).unwrap();
    assert!(
        text(second.map().get_ref())
            .ends_with(&format!("centered on {TRACK} (zoom {MAP_ZOOM})\n"))
    );
}

#[test]
fn corrupted_store_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("mapty.sqlite3");

    let mut raw = SqliteStore::open(&db).unwrap();
    raw.set("workouts", "[{\"type\":\"running\"").unwrap();
    drop(raw);

    let storage = KvWorkoutStorage::new(SqliteStore::open(&db).unwrap());
    assert!(storage.load().unwrap().is_empty());

    let mut session = open_session(&db, Some(HOME));
    assert_eq!(session.bootstrap().unwrap(), 0);
    assert!(session.workouts().is_empty());
}
