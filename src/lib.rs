//! liftlog: a personal workout log.
//!
//! Users keep a catalog of exercises (shared global ones plus their own),
//! record workouts, assign exercises to them in order and log numbered sets
//! with reps and weight. Every record is scoped to the user who owns it.
//!
//! - [`db`]: SQLite storage and all domain operations
//! - [`api`]: HTTP surface over [`db::Database`]
//! - [`config`]: runtime settings read from the environment

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
