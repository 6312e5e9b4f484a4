use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::exercises::insert_user_exercise;
use super::ownership::{ensure_owned, OwnedResource};
use super::{format_timestamp, timestamp_at, uuid_at, Database};
use crate::error::{Result, WorkoutError};
use crate::models::*;

fn assignment_from_row(row: &Row<'_>) -> rusqlite::Result<WorkoutExercise> {
    Ok(WorkoutExercise {
        id: uuid_at(row, 0)?,
        workout_id: uuid_at(row, 1)?,
        exercise_id: uuid_at(row, 2)?,
        order: row.get(3)?,
        created_at: timestamp_at(row, 4)?,
    })
}

fn load_assignment(conn: &Connection, id: Uuid) -> Result<WorkoutExercise> {
    conn.query_row(
        r#"SELECT id, workout_id, exercise_id, "order", created_at
           FROM workout_exercises WHERE id = ?"#,
        [id.to_string()],
        assignment_from_row,
    )
    .optional()?
    .ok_or_else(|| WorkoutError::not_found(WorkoutExercise::KIND, id))
}

fn next_order_in(conn: &Connection, workout_id: Uuid) -> Result<i32> {
    let next = conn.query_row(
        r#"SELECT COALESCE(MAX("order"), 0) + 1 FROM workout_exercises WHERE workout_id = ?"#,
        [workout_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(next)
}

/// Inserts an assignment at `order`, or after the current maximum when `None`.
///
/// The caller has already verified the workout; the exercise is checked here.
fn insert_assignment(
    conn: &Connection,
    user_id: &str,
    workout_id: Uuid,
    exercise_id: Uuid,
    order: Option<i32>,
) -> Result<WorkoutExercise> {
    ensure_owned::<Exercise>(conn, user_id, exercise_id)?;

    let order = match order {
        Some(order) if order <= 0 => {
            return Err(WorkoutError::validation("order must be positive"));
        }
        Some(order) => order,
        None => next_order_in(conn, workout_id)?,
    };

    let id = Uuid::new_v4();
    conn.execute(
        r#"INSERT INTO workout_exercises (id, workout_id, exercise_id, "order", created_at)
           VALUES (?, ?, ?, ?, ?)"#,
        params![
            id.to_string(),
            workout_id.to_string(),
            exercise_id.to_string(),
            order,
            format_timestamp(&Utc::now()),
        ],
    )?;

    load_assignment(conn, id)
}

impl Database {
    /// Position the next assignment of `workout_id` would take.
    ///
    /// Informational only: two callers can read the same value. Use
    /// [`Database::assign_exercise`] without an order to compute and insert
    /// atomically.
    pub fn next_exercise_order(&self, user_id: &str, workout_id: Uuid) -> Result<i32> {
        self.read(|conn| {
            ensure_owned::<Workout>(conn, user_id, workout_id)?;
            next_order_in(conn, workout_id)
        })
    }

    /// Attaches a catalog exercise to a workout.
    ///
    /// The exercise must be global or owned by the caller. An explicit order
    /// already used in the workout fails with `Constraint`.
    pub fn assign_exercise(
        &self,
        user_id: &str,
        input: AssignExerciseInput,
    ) -> Result<WorkoutExercise> {
        let assignment = self.write(|tx| {
            ensure_owned::<Workout>(tx, user_id, input.workout_id)?;
            insert_assignment(tx, user_id, input.workout_id, input.exercise_id, input.order)
        })?;

        tracing::debug!(
            "Assigned exercise {} to workout {} at order {}",
            assignment.exercise_id,
            assignment.workout_id,
            assignment.order
        );
        Ok(assignment)
    }

    /// Creates a private exercise and assigns it at the next order.
    ///
    /// Both writes share one transaction: a duplicate name leaves neither.
    pub fn create_and_assign_exercise(
        &self,
        user_id: &str,
        workout_id: Uuid,
        input: CreateExerciseInput,
    ) -> Result<CreatedAssignment> {
        let created = self.write(|tx| {
            ensure_owned::<Workout>(tx, user_id, workout_id)?;
            let exercise = insert_user_exercise(tx, user_id, &input.name)?;
            let assignment = insert_assignment(tx, user_id, workout_id, exercise.id, None)?;
            Ok(CreatedAssignment {
                exercise,
                assignment,
            })
        })?;

        tracing::debug!(
            "Created exercise {} and assigned it to workout {}",
            created.exercise.id,
            workout_id
        );
        Ok(created)
    }

    /// Removes an assignment together with its sets.
    ///
    /// Sibling assignments keep their order; the gap is not compacted.
    pub fn unassign_exercise(&self, user_id: &str, workout_exercise_id: Uuid) -> Result<()> {
        self.write(|tx| {
            ensure_owned::<WorkoutExercise>(tx, user_id, workout_exercise_id)?;
            tx.execute(
                "DELETE FROM workout_exercises WHERE id = ?",
                [workout_exercise_id.to_string()],
            )?;
            Ok(())
        })?;

        tracing::debug!("Removed workout exercise {}", workout_exercise_id);
        Ok(())
    }
}
