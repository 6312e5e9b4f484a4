use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use super::ownership::{ensure_owned, OwnedResource};
use super::{format_timestamp, opt_decimal_at, timestamp_at, uuid_at, Database};
use crate::error::{Result, WorkoutError};
use crate::models::*;

const SET_COLUMNS: &str =
    "id, workout_exercise_id, set_number, reps, weight, is_completed, created_at, updated_at";

/// Weights are stored with two decimal places, at most 9999.99.
const WEIGHT_SCALE: u32 = 2;

fn max_weight() -> Decimal {
    Decimal::new(999_999, WEIGHT_SCALE)
}

fn set_from_row(row: &Row<'_>) -> rusqlite::Result<WorkoutSet> {
    Ok(WorkoutSet {
        id: uuid_at(row, 0)?,
        workout_exercise_id: uuid_at(row, 1)?,
        set_number: row.get(2)?,
        reps: row.get(3)?,
        weight: opt_decimal_at(row, 4)?,
        is_completed: row.get(5)?,
        created_at: timestamp_at(row, 6)?,
        updated_at: timestamp_at(row, 7)?,
    })
}

fn load_set(conn: &Connection, id: Uuid) -> Result<WorkoutSet> {
    conn.query_row(
        &format!("SELECT {SET_COLUMNS} FROM sets WHERE id = ?"),
        [id.to_string()],
        set_from_row,
    )
    .optional()?
    .ok_or_else(|| WorkoutError::not_found(WorkoutSet::KIND, id))
}

fn next_set_number_in(conn: &Connection, workout_exercise_id: Uuid) -> Result<i32> {
    let next = conn.query_row(
        "SELECT COALESCE(MAX(set_number), 0) + 1 FROM sets WHERE workout_exercise_id = ?",
        [workout_exercise_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(next)
}

fn validate_reps(reps: Option<i32>) -> Result<Option<i32>> {
    match reps {
        Some(reps) if reps < 0 => Err(WorkoutError::validation("reps must not be negative")),
        other => Ok(other),
    }
}

/// Rounds to the stored scale and encodes as text, e.g. `185` → `"185.00"`.
fn encode_weight(weight: Option<Decimal>) -> Result<Option<String>> {
    let Some(weight) = weight else {
        return Ok(None);
    };
    if weight < Decimal::ZERO {
        return Err(WorkoutError::validation("weight must not be negative"));
    }

    let mut weight =
        weight.round_dp_with_strategy(WEIGHT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    if weight > max_weight() {
        return Err(WorkoutError::validation(format!(
            "weight must be at most {}",
            max_weight()
        )));
    }
    weight.rescale(WEIGHT_SCALE);
    Ok(Some(weight.to_string()))
}

impl Database {
    /// Number the next set of `workout_exercise_id` would take.
    ///
    /// Informational only; [`Database::add_set`] without a number computes
    /// and inserts atomically.
    pub fn next_set_number(&self, user_id: &str, workout_exercise_id: Uuid) -> Result<i32> {
        self.read(|conn| {
            ensure_owned::<WorkoutExercise>(conn, user_id, workout_exercise_id)?;
            next_set_number_in(conn, workout_exercise_id)
        })
    }

    /// Logs a new, not yet completed set.
    pub fn add_set(&self, user_id: &str, input: AddSetInput) -> Result<WorkoutSet> {
        if matches!(input.set_number, Some(n) if n <= 0) {
            return Err(WorkoutError::validation("set number must be positive"));
        }
        let reps = validate_reps(input.reps)?;
        let weight = encode_weight(input.weight)?;

        let set = self.write(|tx| {
            ensure_owned::<WorkoutExercise>(tx, user_id, input.workout_exercise_id)?;

            let set_number = match input.set_number {
                Some(n) => n,
                None => next_set_number_in(tx, input.workout_exercise_id)?,
            };
            let id = Uuid::new_v4();
            let now = format_timestamp(&Utc::now());

            tx.execute(
                "INSERT INTO sets (id, workout_exercise_id, set_number, reps, weight, is_completed, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, 0, ?, ?)",
                params![
                    id.to_string(),
                    input.workout_exercise_id.to_string(),
                    set_number,
                    reps,
                    weight,
                    now,
                    now,
                ],
            )?;

            load_set(tx, id)
        })?;

        tracing::debug!(
            "Added set {} to workout exercise {}",
            set.set_number,
            set.workout_exercise_id
        );
        Ok(set)
    }

    /// Updates only the supplied fields of a set.
    ///
    /// `Some(None)` for reps or weight clears the column; `None` leaves it.
    pub fn update_set(&self, user_id: &str, set_id: Uuid, input: UpdateSetInput) -> Result<WorkoutSet> {
        let mut updates = Vec::new();
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(reps) = input.reps {
            updates.push("reps = ?");
            params.push(Box::new(validate_reps(reps)?));
        }
        if let Some(weight) = input.weight {
            updates.push("weight = ?");
            params.push(Box::new(encode_weight(weight)?));
        }
        if let Some(is_completed) = input.is_completed {
            updates.push("is_completed = ?");
            params.push(Box::new(is_completed));
        }

        let set = self.write(|tx| {
            ensure_owned::<WorkoutSet>(tx, user_id, set_id)?;

            if !updates.is_empty() {
                updates.push("updated_at = ?");
                params.push(Box::new(format_timestamp(&Utc::now())));
                params.push(Box::new(set_id.to_string()));

                let sql = format!("UPDATE sets SET {} WHERE id = ?", updates.join(", "));
                let params_ref: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
                tx.execute(&sql, params_ref.as_slice())?;
            }

            load_set(tx, set_id)
        })?;

        tracing::debug!("Updated set {}", set_id);
        Ok(set)
    }

    pub fn remove_set(&self, user_id: &str, set_id: Uuid) -> Result<()> {
        self.write(|tx| {
            ensure_owned::<WorkoutSet>(tx, user_id, set_id)?;
            tx.execute("DELETE FROM sets WHERE id = ?", [set_id.to_string()])?;
            Ok(())
        })?;

        tracing::debug!("Removed set {}", set_id);
        Ok(())
    }
}
