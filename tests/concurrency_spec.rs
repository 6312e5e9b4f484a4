//! Several connections writing to one database file at the same time.

use std::collections::HashSet;
use std::path::Path;
use std::thread;

use liftlog::db::Database;
use liftlog::models::*;

const USER: &str = "user-alice";
const WRITERS: usize = 8;

fn open(path: &Path) -> Database {
    let db = Database::open(path).expect("Failed to open database");
    db.migrate().expect("Failed to run migrations");
    db
}

#[test]
fn concurrent_assignments_get_distinct_orders() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("liftlog.db");

    let db = open(&path);
    let workout = db
        .create_workout(USER, CreateWorkoutInput::default())
        .expect("Failed to create workout");
    let exercise = db
        .create_exercise(
            USER,
            CreateExerciseInput {
                name: "Bench Press".to_string(),
            },
        )
        .expect("Failed to create exercise");

    let handles: Vec<_> = (0..WRITERS)
        .map(|_| {
            let path = path.clone();
            thread::spawn(move || {
                let db = Database::open(&path).expect("Failed to open database");
                db.assign_exercise(
                    USER,
                    AssignExerciseInput {
                        workout_id: workout.id,
                        exercise_id: exercise.id,
                        order: None,
                    },
                )
                .expect("Concurrent assignment failed")
                .order
            })
        })
        .collect();

    let orders: HashSet<i32> = handles
        .into_iter()
        .map(|h| h.join().expect("Writer thread panicked"))
        .collect();

    let expected: HashSet<i32> = (1..=WRITERS as i32).collect();
    assert_eq!(orders, expected);
}

#[test]
fn concurrent_sets_get_distinct_numbers() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("liftlog.db");

    let db = open(&path);
    let workout = db
        .create_workout(USER, CreateWorkoutInput::default())
        .expect("Failed to create workout");
    let exercise = db
        .create_exercise(
            USER,
            CreateExerciseInput {
                name: "Squat".to_string(),
            },
        )
        .expect("Failed to create exercise");
    let assignment = db
        .assign_exercise(
            USER,
            AssignExerciseInput {
                workout_id: workout.id,
                exercise_id: exercise.id,
                order: None,
            },
        )
        .expect("Failed to assign exercise");

    let handles: Vec<_> = (0..WRITERS)
        .map(|i| {
            let path = path.clone();
            thread::spawn(move || {
                let db = Database::open(&path).expect("Failed to open database");
                db.add_set(
                    USER,
                    AddSetInput {
                        workout_exercise_id: assignment.id,
                        reps: Some(i as i32),
                        ..Default::default()
                    },
                )
                .expect("Concurrent add_set failed")
                .set_number
            })
        })
        .collect();

    let numbers: HashSet<i32> = handles
        .into_iter()
        .map(|h| h.join().expect("Writer thread panicked"))
        .collect();

    let expected: HashSet<i32> = (1..=WRITERS as i32).collect();
    assert_eq!(numbers, expected);

    let detail = db
        .get_workout_detail(USER, workout.id)
        .expect("Query failed")
        .expect("Workout missing");
    assert_eq!(detail.exercises[0].sets.len(), WRITERS);
}

#[test]
fn shared_handle_serializes_writers() {
    let db = Database::open_memory().expect("Failed to create database");
    db.migrate().expect("Failed to run migrations");
    let workout = db
        .create_workout(USER, CreateWorkoutInput::default())
        .expect("Failed to create workout");
    let exercise = db
        .create_exercise(
            USER,
            CreateExerciseInput {
                name: "Deadlift".to_string(),
            },
        )
        .expect("Failed to create exercise");

    let handles: Vec<_> = (0..WRITERS)
        .map(|_| {
            let db = db.clone();
            thread::spawn(move || {
                db.assign_exercise(
                    USER,
                    AssignExerciseInput {
                        workout_id: workout.id,
                        exercise_id: exercise.id,
                        order: None,
                    },
                )
                .expect("Concurrent assignment failed")
                .order
            })
        })
        .collect();

    let orders: HashSet<i32> = handles
        .into_iter()
        .map(|h| h.join().expect("Writer thread panicked"))
        .collect();

    assert_eq!(orders.len(), WRITERS);
    assert_eq!(
        db.next_exercise_order(USER, workout.id).expect("Query failed"),
        WRITERS as i32 + 1
    );
}
