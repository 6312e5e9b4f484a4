mod handlers;
mod identity;

use axum::{
    extract::FromRef,
    http::HeaderName,
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::DEFAULT_USER_HEADER;
use crate::db::Database;

pub use identity::{CurrentUser, UserHeader};

/// Shared state for every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub user_header: UserHeader,
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for UserHeader {
    fn from_ref(state: &AppState) -> Self {
        state.user_header.clone()
    }
}

/// Router reading the user id from the default `x-user-id` header.
pub fn create_router(db: Database) -> Router {
    create_router_with(db, HeaderName::from_static(DEFAULT_USER_HEADER))
}

pub fn create_router_with(db: Database, user_header: HeaderName) -> Router {
    let api = Router::new()
        // Exercise catalog
        .route("/exercises", get(handlers::list_exercises))
        .route("/exercises", post(handlers::create_exercise))
        // Workouts
        .route("/workouts", get(handlers::list_workouts_by_date))
        .route("/workouts", post(handlers::create_workout))
        .route("/workouts/{id}", get(handlers::get_workout))
        .route("/workouts/{id}", put(handlers::update_workout))
        .route("/workouts/{id}/detail", get(handlers::get_workout_detail))
        // Assignments
        .route(
            "/workouts/{id}/exercises/next-order",
            get(handlers::next_exercise_order),
        )
        .route("/workouts/{id}/exercises", post(handlers::assign_exercise))
        .route(
            "/workouts/{id}/exercises/new",
            post(handlers::create_and_assign_exercise),
        )
        .route(
            "/workout-exercises/{id}",
            delete(handlers::unassign_exercise),
        )
        // Sets
        .route(
            "/workout-exercises/{id}/sets/next-number",
            get(handlers::next_set_number),
        )
        .route("/workout-exercises/{id}/sets", post(handlers::add_set))
        .route("/sets/{id}", put(handlers::update_set))
        .route("/sets/{id}", delete(handlers::remove_set))
        // Health
        .route("/health", get(handlers::health));

    let state = AppState {
        db,
        user_header: UserHeader(user_header),
    };

    Router::new()
        .nest("/api/v1", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
