//! Ownership guard.
//!
//! Each entity kind describes how to walk from its id to the owning user;
//! [`ensure_owned`] runs that walk for any kind. A record that does not exist
//! and a record owned by someone else produce the same `NotFound` error.

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::Database;
use crate::error::{Result, WorkoutError};
use crate::models::{Exercise, Workout, WorkoutExercise, WorkoutSet};

/// An entity whose visibility is decided by following its owner chain.
pub trait OwnedResource {
    /// Name used in `NotFound` errors.
    const KIND: &'static str;

    /// Returns a row when entity `?1` is reachable from user `?2`.
    const OWNER_CHAIN_SQL: &'static str;
}

impl OwnedResource for Workout {
    const KIND: &'static str = "Workout";
    const OWNER_CHAIN_SQL: &'static str = "SELECT 1 FROM workouts WHERE id = ?1 AND user_id = ?2";
}

impl OwnedResource for WorkoutExercise {
    const KIND: &'static str = "Workout exercise";
    const OWNER_CHAIN_SQL: &'static str = "SELECT 1
         FROM workout_exercises we
         JOIN workouts w ON w.id = we.workout_id
         WHERE we.id = ?1 AND w.user_id = ?2";
}

impl OwnedResource for WorkoutSet {
    const KIND: &'static str = "Set";
    const OWNER_CHAIN_SQL: &'static str = "SELECT 1
         FROM sets s
         JOIN workout_exercises we ON we.id = s.workout_exercise_id
         JOIN workouts w ON w.id = we.workout_id
         WHERE s.id = ?1 AND w.user_id = ?2";
}

/// Global exercises are visible to everyone, private ones only to their owner.
impl OwnedResource for Exercise {
    const KIND: &'static str = "Exercise";
    const OWNER_CHAIN_SQL: &'static str =
        "SELECT 1 FROM exercises WHERE id = ?1 AND (is_global = 1 OR user_id = ?2)";
}

/// Fails with `NotFound` unless `id` resolves to a record visible to `user_id`.
///
/// Pass the transaction that performs the subsequent write.
pub(crate) fn ensure_owned<R: OwnedResource>(
    conn: &Connection,
    user_id: &str,
    id: Uuid,
) -> Result<()> {
    let found = conn
        .query_row(R::OWNER_CHAIN_SQL, params![id.to_string(), user_id], |_| {
            Ok(())
        })
        .optional()?;

    match found {
        Some(()) => Ok(()),
        None => {
            tracing::debug!("{} {} is not visible to user {}", R::KIND, id, user_id);
            Err(WorkoutError::not_found(R::KIND, id))
        }
    }
}

impl Database {
    /// Standalone ownership check, for callers that only need to authorize.
    pub fn ensure_owned<R: OwnedResource>(&self, user_id: &str, id: Uuid) -> Result<()> {
        self.read(|conn| ensure_owned::<R>(conn, user_id, id))
    }
}
