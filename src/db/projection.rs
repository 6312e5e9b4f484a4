//! Nested workout views assembled from flat joined rows.
//!
//! The joins are left joins, so a workout without assignments (or an
//! assignment without sets) still yields one row with NULLs in the child
//! columns. Grouping keys rows by id at every level and keeps first-seen
//! order, so rows of one parent do not have to be adjacent.

use std::collections::HashMap;
use std::hash::Hash;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rusqlite::{params, Connection, Params, Row};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::{format_timestamp, opt_decimal_at, opt_timestamp_at, opt_uuid_at, timestamp_at, uuid_at, Database};
use crate::error::{Result, WorkoutError};
use crate::models::*;

/// One row of workout ⋈ workout_exercises ⋈ exercises ⋈ sets.
///
/// Assignment and set columns are `None` where the left join found nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutRow {
    pub workout_id: Uuid,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub status: WorkoutStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub workout_exercise_id: Option<Uuid>,
    pub exercise_id: Option<Uuid>,
    pub exercise_name: Option<String>,
    pub order: Option<i32>,
    pub set_id: Option<Uuid>,
    pub set_number: Option<i32>,
    pub reps: Option<i32>,
    pub weight: Option<Decimal>,
    pub is_completed: Option<bool>,
}

/// Values keyed by id, iterated in first-insertion order.
struct OrderedGroups<K, V> {
    index: HashMap<K, usize>,
    values: Vec<V>,
}

impl<K: Eq + Hash, V> OrderedGroups<K, V> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            values: Vec::new(),
        }
    }

    fn get_or_insert_with(&mut self, key: K, make: impl FnOnce() -> V) -> &mut V {
        let values = &mut self.values;
        let slot = *self.index.entry(key).or_insert_with(|| {
            values.push(make());
            values.len() - 1
        });
        &mut values[slot]
    }

    fn into_values(self) -> Vec<V> {
        self.values
    }
}

struct WorkoutGroup {
    view: WorkoutWithExercises,
    exercises: OrderedGroups<Uuid, ExerciseGroup>,
}

struct ExerciseGroup {
    entry: WorkoutExerciseEntry,
    sets: OrderedGroups<Uuid, SetEntry>,
}

/// Groups flat rows into workouts → exercises (by `order`) → sets (by
/// `set_number`). Workouts keep the order in which they first appear.
pub fn group_workout_rows(rows: impl IntoIterator<Item = WorkoutRow>) -> Vec<WorkoutWithExercises> {
    let mut workouts: OrderedGroups<Uuid, WorkoutGroup> = OrderedGroups::new();

    for row in rows {
        let workout = workouts.get_or_insert_with(row.workout_id, || WorkoutGroup {
            view: WorkoutWithExercises {
                id: row.workout_id,
                title: row.title.clone(),
                notes: row.notes.clone(),
                status: row.status,
                started_at: row.started_at,
                completed_at: row.completed_at,
                exercises: Vec::new(),
            },
            exercises: OrderedGroups::new(),
        });

        let (Some(workout_exercise_id), Some(exercise_id), Some(exercise_name), Some(order)) = (
            row.workout_exercise_id,
            row.exercise_id,
            row.exercise_name,
            row.order,
        ) else {
            continue;
        };

        let exercise = workout
            .exercises
            .get_or_insert_with(workout_exercise_id, || ExerciseGroup {
                entry: WorkoutExerciseEntry {
                    workout_exercise_id,
                    exercise_id,
                    exercise_name,
                    order,
                    sets: Vec::new(),
                },
                sets: OrderedGroups::new(),
            });

        if let (Some(set_id), Some(set_number)) = (row.set_id, row.set_number) {
            exercise.sets.get_or_insert_with(set_id, || SetEntry {
                id: set_id,
                set_number,
                reps: row.reps,
                weight: row.weight,
                is_completed: row.is_completed.unwrap_or(false),
            });
        }
    }

    workouts
        .into_values()
        .into_iter()
        .map(|group| {
            let mut view = group.view;
            view.exercises = group
                .exercises
                .into_values()
                .into_iter()
                .map(|exercise| {
                    let mut entry = exercise.entry;
                    entry.sets = exercise.sets.into_values();
                    entry.sets.sort_by_key(|set| set.set_number);
                    entry
                })
                .collect();
            view.exercises.sort_by_key(|exercise| exercise.order);
            view
        })
        .collect()
}

const WORKOUT_ROWS_SQL: &str = r#"
    SELECT w.id, w.title, w.notes, w.status, w.started_at, w.completed_at,
           we.id, we.exercise_id, e.name, we."order",
           s.id, s.set_number, s.reps, s.weight, s.is_completed
    FROM workouts w
    LEFT JOIN workout_exercises we ON we.workout_id = w.id
    LEFT JOIN exercises e ON e.id = we.exercise_id
    LEFT JOIN sets s ON s.workout_exercise_id = we.id
"#;

fn workout_row(row: &Row<'_>) -> rusqlite::Result<WorkoutRow> {
    let status: String = row.get(3)?;
    Ok(WorkoutRow {
        workout_id: uuid_at(row, 0)?,
        title: row.get(1)?,
        notes: row.get(2)?,
        status: WorkoutStatus::from_str(&status)
            .ok_or_else(|| super::conversion_error(3, format!("unknown status {status}")))?,
        started_at: timestamp_at(row, 4)?,
        completed_at: opt_timestamp_at(row, 5)?,
        workout_exercise_id: opt_uuid_at(row, 6)?,
        exercise_id: opt_uuid_at(row, 7)?,
        exercise_name: row.get(8)?,
        order: row.get(9)?,
        set_id: opt_uuid_at(row, 10)?,
        set_number: row.get(11)?,
        reps: row.get(12)?,
        weight: opt_decimal_at(row, 13)?,
        is_completed: row.get(14)?,
    })
}

fn load_workout_rows(conn: &Connection, filter: &str, params: impl Params) -> Result<Vec<WorkoutRow>> {
    let sql = format!(
        r#"{WORKOUT_ROWS_SQL} WHERE {filter}
           ORDER BY w.started_at, w.id, we."order", s.set_number"#
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params, workout_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

impl Database {
    /// The caller's workouts started on `date` (UTC day), fully nested.
    pub fn get_workouts_by_date(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<WorkoutWithExercises>> {
        let day_start = date.and_time(NaiveTime::MIN).and_utc();
        let next_day_start = date
            .succ_opt()
            .ok_or_else(|| WorkoutError::validation(format!("date out of range: {date}")))?
            .and_time(NaiveTime::MIN)
            .and_utc();

        let rows = self.read(|conn| {
            load_workout_rows(
                conn,
                "w.user_id = ?1 AND w.started_at >= ?2 AND w.started_at < ?3",
                params![
                    user_id,
                    format_timestamp(&day_start),
                    format_timestamp(&next_day_start)
                ],
            )
        })?;

        Ok(group_workout_rows(rows))
    }

    /// One of the caller's workouts, fully nested. `None` if not visible.
    pub fn get_workout_detail(
        &self,
        user_id: &str,
        workout_id: Uuid,
    ) -> Result<Option<WorkoutWithExercises>> {
        let rows = self.read(|conn| {
            load_workout_rows(
                conn,
                "w.id = ?1 AND w.user_id = ?2",
                params![workout_id.to_string(), user_id],
            )
        })?;

        Ok(group_workout_rows(rows).into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn workout(id: Uuid) -> WorkoutRow {
        WorkoutRow {
            workout_id: id,
            title: Some("Push day".to_string()),
            notes: None,
            status: WorkoutStatus::InProgress,
            started_at: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
            completed_at: None,
            workout_exercise_id: None,
            exercise_id: None,
            exercise_name: None,
            order: None,
            set_id: None,
            set_number: None,
            reps: None,
            weight: None,
            is_completed: None,
        }
    }

    fn with_exercise(row: WorkoutRow, we_id: Uuid, name: &str, order: i32) -> WorkoutRow {
        WorkoutRow {
            workout_exercise_id: Some(we_id),
            exercise_id: Some(Uuid::from_u128(order as u128)),
            exercise_name: Some(name.to_string()),
            order: Some(order),
            ..row
        }
    }

    fn with_set(row: WorkoutRow, set_id: Uuid, set_number: i32, reps: i32) -> WorkoutRow {
        WorkoutRow {
            set_id: Some(set_id),
            set_number: Some(set_number),
            reps: Some(reps),
            weight: Some(Decimal::new(18500, 2)),
            is_completed: Some(false),
            ..row
        }
    }

    #[test]
    fn workout_without_children_has_no_placeholders() {
        let id = Uuid::new_v4();
        let grouped = group_workout_rows(vec![workout(id)]);

        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].id, id);
        assert!(grouped[0].exercises.is_empty());
    }

    #[test]
    fn exercise_without_sets_has_empty_set_list() {
        let id = Uuid::new_v4();
        let we = Uuid::new_v4();
        let grouped = group_workout_rows(vec![with_exercise(workout(id), we, "Bench Press", 1)]);

        assert_eq!(grouped[0].exercises.len(), 1);
        assert_eq!(grouped[0].exercises[0].exercise_name, "Bench Press");
        assert!(grouped[0].exercises[0].sets.is_empty());
    }

    #[test]
    fn interleaved_rows_are_grouped_and_sorted() {
        let w1 = Uuid::new_v4();
        let w2 = Uuid::new_v4();
        let bench = Uuid::new_v4();
        let squat = Uuid::new_v4();
        let (s1, s2, s3) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        let rows = vec![
            with_set(with_exercise(workout(w1), squat, "Squat", 2), s3, 1, 5),
            workout(w2),
            with_set(with_exercise(workout(w1), bench, "Bench Press", 1), s2, 2, 6),
            with_set(with_exercise(workout(w1), bench, "Bench Press", 1), s1, 1, 8),
        ];

        let grouped = group_workout_rows(rows);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].id, w1);
        assert_eq!(grouped[1].id, w2);
        assert!(grouped[1].exercises.is_empty());

        let exercises = &grouped[0].exercises;
        assert_eq!(exercises.len(), 2);
        assert_eq!(exercises[0].exercise_name, "Bench Press");
        assert_eq!(exercises[1].exercise_name, "Squat");

        let bench_sets: Vec<i32> = exercises[0].sets.iter().map(|s| s.set_number).collect();
        assert_eq!(bench_sets, vec![1, 2]);
        assert_eq!(exercises[0].sets[0].reps, Some(8));
        assert_eq!(exercises[1].sets.len(), 1);
    }

    #[test]
    fn duplicate_rows_do_not_duplicate_sets() {
        let id = Uuid::new_v4();
        let we = Uuid::new_v4();
        let set = Uuid::new_v4();
        let row = with_set(with_exercise(workout(id), we, "Deadlift", 1), set, 1, 3);

        let grouped = group_workout_rows(vec![row.clone(), row]);

        assert_eq!(grouped[0].exercises.len(), 1);
        assert_eq!(grouped[0].exercises[0].sets.len(), 1);
    }
}
