//! Persistence of the workout list.
//!
//! The whole list lives as one JSON string under a single key of a
//! [`KeyValueStore`]. Saving rewrites the entry; loading rehydrates every record
//! into a full [`Workout`] by dispatching on its `type` tag.

use crate::dlog;
use crate::error::PersistenceError;
use crate::workout::Workout;
use rusqlite::{Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;

pub const DEFAULT_KEY: &str = "workouts";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

/// Saves and restores the complete workout list.
pub trait WorkoutStorage {
    fn save(&mut self, workouts: &[Workout]) -> Result<(), PersistenceError>;

    /// Missing or unreadable data yields an empty list; only a failing backend is an error.
    fn load(&self) -> Result<Vec<Workout>, PersistenceError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Key-value table in a local SQLite file.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, PersistenceError> {
        tracing::debug!(path = %path.display(), "opening sqlite store");
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, PersistenceError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, PersistenceError> {
        conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS kv (
              key    text PRIMARY KEY,
              value  text NOT NULL
            );
            ",
        )?;
        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.conn.execute(
            r"
            INSERT INTO kv (key, value) VALUES (?1, ?2)
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value
            ",
            [key, value],
        )?;
        Ok(())
    }
}

/// JSON-encoded workout list kept under one key of `S`.
pub struct KvWorkoutStorage<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> KvWorkoutStorage<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_KEY)
    }

    pub fn with_key(store: S, key: &str) -> Self {
        Self {
            store,
            key: key.to_string(),
        }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> WorkoutStorage for KvWorkoutStorage<S> {
    fn save(&mut self, workouts: &[Workout]) -> Result<(), PersistenceError> {
        // Encode first so a serialization failure never reaches the store.
        let json = serde_json::to_string(workouts)?;
        self.store.set(&self.key, &json)?;
        dlog!("saved key={} workouts={}", self.key, workouts.len());
        Ok(())
    }

    fn load(&self) -> Result<Vec<Workout>, PersistenceError> {
        let Some(raw) = self.store.get(&self.key)? else {
            dlog!("no stored workouts key={}", self.key);
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<Workout>>(&raw) {
            Ok(workouts) => {
                tracing::debug!(key = %self.key, workouts = workouts.len(), "loaded workouts");
                Ok(workouts)
            }
            Err(e) => {
                tracing::warn!(key = %self.key, err = %e, "stored workouts are malformed; starting empty");
                Ok(Vec::new())
            }
        }
    }
}
