use thiserror::Error;

/// Rejected form input. Recovered locally: the user is alerted and nothing changes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("unknown workout type: {0:?}")]
    UnknownType(String),
    #[error("{field} must be a number, got {value}")]
    NotFinite { field: &'static str, value: f64 },
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must be a whole number, got {value}")]
    NotWhole { field: &'static str, value: f64 },
    #[error("no location picked on the map")]
    NoLocation,
}

/// Raised by the workout constructors for an unusable input or derived value.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid {field}: {value}")]
pub struct InvalidMetricError {
    pub field: &'static str,
    pub value: f64,
}

impl From<InvalidMetricError> for ValidationError {
    fn from(e: InvalidMetricError) -> Self {
        if e.value.is_finite() {
            Self::NotPositive {
                field: e.field,
                value: e.value,
            }
        } else {
            Self::NotFinite {
                field: e.field,
                value: e.value,
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("serializing workouts: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("sqlite store: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("could not get your position: {0}")]
pub struct LocationUnavailable(pub String);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no workout with id {id:?}")]
pub struct NotFoundError {
    pub id: String,
}
