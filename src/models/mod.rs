//! Domain models for liftlog.
//!
//! # Core Concepts
//!
//! - [`Exercise`]: Catalog entry. Either global (shared by everyone, no owner)
//!   or private to one user.
//! - [`Workout`]: A training session owned by one user.
//! - [`WorkoutExercise`]: Assignment of a catalog exercise to a workout at a
//!   given `order` position.
//! - [`WorkoutSet`]: One logged set of an assignment, numbered by `set_number`.
//!
//! Ownership is transitive: a set belongs to whoever owns the workout reached
//! through its assignment.
//!
//! ## Read views
//!
//! [`WorkoutWithExercises`] is the nested workout → exercises → sets shape
//! served to the presentation layer.

mod exercise;
mod set;
mod view;
mod workout;
mod workout_exercise;

pub use exercise::*;
pub use set::*;
pub use view::*;
pub use workout::*;
pub use workout_exercise::*;

/// Serde support for three-state patch fields (`Option<Option<T>>`).
///
/// An absent key stays `None`, an explicit `null` becomes `Some(None)` and a
/// value becomes `Some(Some(v))`. Pair with `#[serde(default)]`.
pub(crate) mod patch {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}
