use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use super::CurrentUser;
use crate::db::{Database, OwnedResource};
use crate::error::WorkoutError;
use crate::models::*;

type ApiResult<T> = Result<T, (StatusCode, String)>;

// ============================================================
// Error Handling
// ============================================================

/// Maps a domain error to a status code and body.
///
/// Client errors carry their message. Storage failures are logged in full
/// and answered with a generic message.
pub(crate) fn api_error(e: WorkoutError) -> (StatusCode, String) {
    let status = match &e {
        WorkoutError::Unauthenticated => StatusCode::UNAUTHORIZED,
        WorkoutError::NotFound { .. } => StatusCode::NOT_FOUND,
        WorkoutError::Validation(_) => StatusCode::BAD_REQUEST,
        err if err.is_conflict() => StatusCode::CONFLICT,
        _ => {
            tracing::error!("Internal error: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            );
        }
    };

    tracing::warn!("Rejected request: {}", e);
    (status, e.to_string())
}

fn workout_not_found(id: Uuid) -> (StatusCode, String) {
    api_error(WorkoutError::not_found(Workout::KIND, id))
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Exercises
// ============================================================

pub async fn list_exercises(
    State(db): State<Database>,
    user: CurrentUser,
) -> ApiResult<Json<Vec<Exercise>>> {
    db.list_available_exercises(user.id())
        .map(Json)
        .map_err(api_error)
}

pub async fn create_exercise(
    State(db): State<Database>,
    user: CurrentUser,
    Json(input): Json<CreateExerciseInput>,
) -> ApiResult<(StatusCode, Json<Exercise>)> {
    db.create_exercise(user.id(), input)
        .map(|e| (StatusCode::CREATED, Json(e)))
        .map_err(api_error)
}

// ============================================================
// Workouts
// ============================================================

/// Query parameters for listing workouts of one day.
#[derive(Debug, Deserialize)]
pub struct WorkoutsByDateQuery {
    pub date: NaiveDate,
}

pub async fn list_workouts_by_date(
    State(db): State<Database>,
    user: CurrentUser,
    Query(query): Query<WorkoutsByDateQuery>,
) -> ApiResult<Json<Vec<WorkoutWithExercises>>> {
    db.get_workouts_by_date(user.id(), query.date)
        .map(Json)
        .map_err(api_error)
}

pub async fn create_workout(
    State(db): State<Database>,
    user: CurrentUser,
    Json(input): Json<CreateWorkoutInput>,
) -> ApiResult<(StatusCode, Json<Workout>)> {
    db.create_workout(user.id(), input)
        .map(|w| (StatusCode::CREATED, Json(w)))
        .map_err(api_error)
}

pub async fn get_workout(
    State(db): State<Database>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Workout>> {
    db.get_workout(user.id(), id)
        .map_err(api_error)?
        .map(Json)
        .ok_or_else(|| workout_not_found(id))
}

pub async fn update_workout(
    State(db): State<Database>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateWorkoutInput>,
) -> ApiResult<Json<Workout>> {
    db.update_workout(user.id(), id, input)
        .map(Json)
        .map_err(api_error)
}

pub async fn get_workout_detail(
    State(db): State<Database>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<WorkoutWithExercises>> {
    db.get_workout_detail(user.id(), id)
        .map_err(api_error)?
        .map(Json)
        .ok_or_else(|| workout_not_found(id))
}

// ============================================================
// Assignments
// ============================================================

/// Body for assigning an existing exercise; the workout comes from the path.
#[derive(Debug, Deserialize)]
pub struct AssignExerciseBody {
    pub exercise_id: Uuid,
    #[serde(default)]
    pub order: Option<i32>,
}

pub async fn next_exercise_order(
    State(db): State<Database>,
    user: CurrentUser,
    Path(workout_id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    db.next_exercise_order(user.id(), workout_id)
        .map(|order| Json(serde_json::json!({ "order": order })))
        .map_err(api_error)
}

pub async fn assign_exercise(
    State(db): State<Database>,
    user: CurrentUser,
    Path(workout_id): Path<Uuid>,
    Json(body): Json<AssignExerciseBody>,
) -> ApiResult<(StatusCode, Json<WorkoutExercise>)> {
    let input = AssignExerciseInput {
        workout_id,
        exercise_id: body.exercise_id,
        order: body.order,
    };
    db.assign_exercise(user.id(), input)
        .map(|a| (StatusCode::CREATED, Json(a)))
        .map_err(api_error)
}

pub async fn create_and_assign_exercise(
    State(db): State<Database>,
    user: CurrentUser,
    Path(workout_id): Path<Uuid>,
    Json(input): Json<CreateExerciseInput>,
) -> ApiResult<(StatusCode, Json<CreatedAssignment>)> {
    db.create_and_assign_exercise(user.id(), workout_id, input)
        .map(|created| (StatusCode::CREATED, Json(created)))
        .map_err(api_error)
}

pub async fn unassign_exercise(
    State(db): State<Database>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    db.unassign_exercise(user.id(), id)
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(api_error)
}

// ============================================================
// Sets
// ============================================================

/// Body for logging a set; the assignment comes from the path.
#[derive(Debug, Deserialize)]
pub struct AddSetBody {
    #[serde(default)]
    pub set_number: Option<i32>,
    #[serde(default)]
    pub reps: Option<i32>,
    #[serde(default)]
    pub weight: Option<Decimal>,
}

pub async fn next_set_number(
    State(db): State<Database>,
    user: CurrentUser,
    Path(workout_exercise_id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    db.next_set_number(user.id(), workout_exercise_id)
        .map(|n| Json(serde_json::json!({ "set_number": n })))
        .map_err(api_error)
}

pub async fn add_set(
    State(db): State<Database>,
    user: CurrentUser,
    Path(workout_exercise_id): Path<Uuid>,
    Json(body): Json<AddSetBody>,
) -> ApiResult<(StatusCode, Json<WorkoutSet>)> {
    let input = AddSetInput {
        workout_exercise_id,
        set_number: body.set_number,
        reps: body.reps,
        weight: body.weight,
    };
    db.add_set(user.id(), input)
        .map(|s| (StatusCode::CREATED, Json(s)))
        .map_err(api_error)
}

pub async fn update_set(
    State(db): State<Database>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateSetInput>,
) -> ApiResult<Json<WorkoutSet>> {
    db.update_set(user.id(), id, input)
        .map(Json)
        .map_err(api_error)
}

pub async fn remove_set(
    State(db): State<Database>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    db.remove_set(user.id(), id)
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(api_error)
}
