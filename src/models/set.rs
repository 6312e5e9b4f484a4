use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One logged set of an assigned exercise.
///
/// `set_number` is unique per assignment and strictly positive. `weight` is
/// kept at two decimal places.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkoutSet {
    pub id: Uuid,
    pub workout_exercise_id: Uuid,
    pub set_number: i32,
    pub reps: Option<i32>,
    pub weight: Option<Decimal>,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for logging a new set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddSetInput {
    pub workout_exercise_id: Uuid,
    /// Explicit set number. Computed as `max + 1` when omitted.
    #[serde(default)]
    pub set_number: Option<i32>,
    #[serde(default)]
    pub reps: Option<i32>,
    #[serde(default)]
    pub weight: Option<Decimal>,
}

/// Partial update of a set.
///
/// `reps` and `weight` are three-state: absent leaves the column alone,
/// `null` clears it and a value overwrites it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSetInput {
    #[serde(
        default,
        deserialize_with = "crate::models::patch::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub reps: Option<Option<i32>>,
    #[serde(
        default,
        deserialize_with = "crate::models::patch::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub weight: Option<Option<Decimal>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_keeps_three_states_apart() {
        let absent: UpdateSetInput = serde_json::from_str(r#"{"is_completed": true}"#).unwrap();
        assert_eq!(absent.reps, None);
        assert_eq!(absent.weight, None);
        assert_eq!(absent.is_completed, Some(true));

        let cleared: UpdateSetInput = serde_json::from_str(r#"{"reps": null}"#).unwrap();
        assert_eq!(cleared.reps, Some(None));

        let set: UpdateSetInput =
            serde_json::from_str(r#"{"reps": 0, "weight": "102.5"}"#).unwrap();
        assert_eq!(set.reps, Some(Some(0)));
        assert_eq!(set.weight, Some(Some(Decimal::new(1025, 1))));
    }

    #[test]
    fn serializing_an_update_omits_untouched_fields() {
        let input = UpdateSetInput {
            reps: Some(None),
            ..Default::default()
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json, serde_json::json!({ "reps": null }));
    }
}
