use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};
use uuid::Uuid;

use super::ownership::{ensure_owned, OwnedResource};
use super::{format_timestamp, opt_timestamp_at, timestamp_at, uuid_at, Database};
use crate::error::{Result, WorkoutError};
use crate::models::*;

const WORKOUT_COLUMNS: &str =
    "id, user_id, title, notes, status, started_at, completed_at, created_at, updated_at";

fn workout_from_row(row: &Row<'_>) -> rusqlite::Result<Workout> {
    let status: String = row.get(4)?;
    Ok(Workout {
        id: uuid_at(row, 0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        notes: row.get(3)?,
        status: WorkoutStatus::from_str(&status)
            .ok_or_else(|| super::conversion_error(4, format!("unknown status {status}")))?,
        started_at: timestamp_at(row, 5)?,
        completed_at: opt_timestamp_at(row, 6)?,
        created_at: timestamp_at(row, 7)?,
        updated_at: timestamp_at(row, 8)?,
    })
}

fn load_workout(conn: &Connection, id: Uuid) -> Result<Workout> {
    conn.query_row(
        &format!("SELECT {WORKOUT_COLUMNS} FROM workouts WHERE id = ?"),
        [id.to_string()],
        workout_from_row,
    )
    .optional()?
    .ok_or_else(|| WorkoutError::not_found(Workout::KIND, id))
}

/// Empty strings clear optional text columns.
fn normalize_text(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn validate_title(title: Option<&str>) -> Result<()> {
    match title {
        Some(title) if title.chars().count() > MAX_TITLE_LEN => Err(WorkoutError::validation(
            format!("title must be at most {} characters", MAX_TITLE_LEN),
        )),
        _ => Ok(()),
    }
}

impl Database {
    pub fn create_workout(&self, user_id: &str, input: CreateWorkoutInput) -> Result<Workout> {
        let title = normalize_text(input.title);
        let notes = normalize_text(input.notes);
        validate_title(title.as_deref())?;

        let status = input.status.unwrap_or_default();
        let now = Utc::now();
        let started_at = input.started_at.unwrap_or(now);
        let id = Uuid::new_v4();

        let workout = self.write(|tx| {
            tx.execute(
                "INSERT INTO workouts (id, user_id, title, notes, status, started_at, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    id.to_string(),
                    user_id,
                    title,
                    notes,
                    status.as_str(),
                    format_timestamp(&started_at),
                    format_timestamp(&now),
                    format_timestamp(&now),
                ],
            )?;
            load_workout(tx, id)
        })?;

        tracing::debug!("Created workout {} for user {}", workout.id, user_id);
        Ok(workout)
    }

    /// Returns `None` both for unknown ids and for workouts owned by others.
    pub fn get_workout(&self, user_id: &str, id: Uuid) -> Result<Option<Workout>> {
        self.read(|conn| {
            let workout = conn
                .query_row(
                    &format!("SELECT {WORKOUT_COLUMNS} FROM workouts WHERE id = ? AND user_id = ?"),
                    params![id.to_string(), user_id],
                    workout_from_row,
                )
                .optional()?;
            Ok(workout)
        })
    }

    /// Updates only the supplied columns and returns the resulting row.
    ///
    /// Moving `completed_at` before `started_at` (from either side) is
    /// rejected by the table's CHECK constraint as `Constraint`.
    pub fn update_workout(
        &self,
        user_id: &str,
        id: Uuid,
        input: UpdateWorkoutInput,
    ) -> Result<Workout> {
        let mut updates = Vec::new();
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(title) = input.title {
            let title = normalize_text(title);
            validate_title(title.as_deref())?;
            updates.push("title = ?");
            params.push(Box::new(title));
        }
        if let Some(notes) = input.notes {
            updates.push("notes = ?");
            params.push(Box::new(normalize_text(notes)));
        }
        if let Some(status) = input.status {
            updates.push("status = ?");
            params.push(Box::new(status.as_str()));
        }
        if let Some(started_at) = input.started_at {
            updates.push("started_at = ?");
            params.push(Box::new(format_timestamp(&started_at)));
        }
        if let Some(completed_at) = input.completed_at {
            updates.push("completed_at = ?");
            params.push(Box::new(completed_at.as_ref().map(format_timestamp)));
        }

        let workout = self.write(|tx| {
            ensure_owned::<Workout>(tx, user_id, id)?;

            if !updates.is_empty() {
                updates.push("updated_at = ?");
                params.push(Box::new(format_timestamp(&Utc::now())));
                params.push(Box::new(id.to_string()));

                let sql = format!("UPDATE workouts SET {} WHERE id = ?", updates.join(", "));
                let params_ref: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
                tx.execute(&sql, params_ref.as_slice())?;
            }

            load_workout(tx, id)
        })?;

        tracing::debug!("Updated workout {} for user {}", id, user_id);
        Ok(workout)
    }
}
