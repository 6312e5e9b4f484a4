//! Error taxonomy shared by the storage layer and the HTTP surface.

use rusqlite::ErrorCode;
use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, WorkoutError>;

#[derive(Debug, Error)]
pub enum WorkoutError {
    /// No identity was presented with the request.
    #[error("Unauthenticated: user identity required")]
    Unauthenticated,

    /// The entity does not exist or is not reachable from the caller.
    ///
    /// Used for both cases so that other users' records cannot be probed.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: Uuid },

    #[error("Invalid input: {0}")]
    Validation(String),

    /// A uniqueness, check or foreign-key constraint rejected the write.
    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Database error: {0}")]
    Database(rusqlite::Error),

    #[error("Database connection lock poisoned")]
    Poisoned,
}

impl WorkoutError {
    pub fn not_found(kind: &'static str, id: Uuid) -> Self {
        Self::NotFound { kind, id }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Whether retrying with freshly computed values may succeed.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Constraint(_))
    }
}

impl From<rusqlite::Error> for WorkoutError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(failure, msg)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                Self::Constraint(msg.unwrap_or_else(|| failure.to_string()))
            }
            other => Self::Database(other),
        }
    }
}
