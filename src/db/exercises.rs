use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::ownership::OwnedResource;
use super::{format_timestamp, timestamp_at, uuid_at, Database};
use crate::error::{Result, WorkoutError};
use crate::models::*;

/// Global exercises inserted by `liftlog seed`.
pub const DEFAULT_GLOBAL_EXERCISES: &[&str] = &[
    "Back Squat",
    "Barbell Row",
    "Bench Press",
    "Deadlift",
    "Dumbbell Curl",
    "Front Squat",
    "Incline Bench Press",
    "Lat Pulldown",
    "Leg Press",
    "Overhead Press",
    "Pull Up",
    "Romanian Deadlift",
];

const EXERCISE_COLUMNS: &str = "id, name, is_global, user_id, created_at, updated_at";

fn exercise_from_row(row: &Row<'_>) -> rusqlite::Result<Exercise> {
    Ok(Exercise {
        id: uuid_at(row, 0)?,
        name: row.get(1)?,
        is_global: row.get(2)?,
        user_id: row.get(3)?,
        created_at: timestamp_at(row, 4)?,
        updated_at: timestamp_at(row, 5)?,
    })
}

fn load_exercise(conn: &Connection, id: Uuid) -> Result<Exercise> {
    conn.query_row(
        &format!("SELECT {EXERCISE_COLUMNS} FROM exercises WHERE id = ?"),
        [id.to_string()],
        exercise_from_row,
    )
    .optional()?
    .ok_or_else(|| WorkoutError::not_found(Exercise::KIND, id))
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(WorkoutError::validation("exercise name must not be empty"));
    }
    if name.chars().count() > MAX_EXERCISE_NAME_LEN {
        return Err(WorkoutError::validation(format!(
            "exercise name must be at most {} characters",
            MAX_EXERCISE_NAME_LEN
        )));
    }
    Ok(())
}

/// Inserts a private exercise. A duplicate name for the same owner is left
/// to the unique index and surfaces as `Constraint`.
pub(super) fn insert_user_exercise(conn: &Connection, user_id: &str, name: &str) -> Result<Exercise> {
    validate_name(name)?;

    let id = Uuid::new_v4();
    let now = format_timestamp(&Utc::now());
    conn.execute(
        "INSERT INTO exercises (id, name, is_global, user_id, created_at, updated_at)
         VALUES (?, ?, 0, ?, ?, ?)",
        params![id.to_string(), name, user_id, now, now],
    )?;

    load_exercise(conn, id)
}

impl Database {
    /// Global exercises plus the caller's own, ordered by name.
    pub fn list_available_exercises(&self, user_id: &str) -> Result<Vec<Exercise>> {
        self.read(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {EXERCISE_COLUMNS} FROM exercises
                 WHERE is_global = 1 OR user_id = ?
                 ORDER BY name, id"
            ))?;

            let exercises = stmt
                .query_map([user_id], exercise_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(exercises)
        })
    }

    pub fn create_exercise(&self, user_id: &str, input: CreateExerciseInput) -> Result<Exercise> {
        let exercise = self.write(|tx| insert_user_exercise(tx, user_id, &input.name))?;
        tracing::debug!("Created exercise {} for user {}", exercise.id, user_id);
        Ok(exercise)
    }

    /// Adds global exercises, skipping names that already exist globally.
    ///
    /// Returns the number of rows inserted.
    pub fn seed_global_exercises(&self, names: &[&str]) -> Result<usize> {
        for name in names {
            validate_name(name)?;
        }

        let inserted = self.write(|tx| {
            let now = format_timestamp(&Utc::now());
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO exercises (id, name, is_global, user_id, created_at, updated_at)
                 VALUES (?, ?, 1, NULL, ?, ?)",
            )?;

            let mut inserted = 0;
            for name in names {
                inserted += stmt.execute(params![Uuid::new_v4().to_string(), name, now, now])?;
            }
            Ok(inserted)
        })?;

        tracing::info!("Seeded {} global exercises", inserted);
        Ok(inserted)
    }
}
