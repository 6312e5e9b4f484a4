use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest workout title accepted.
pub const MAX_TITLE_LEN: usize = 255;

/// A training session owned by a single user.
///
/// `completed_at`, when set, is never earlier than `started_at`. The storage
/// layer enforces this with a CHECK constraint so that partial updates touching
/// only one of the two timestamps are covered as well.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Workout {
    pub id: Uuid,
    pub user_id: String,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub status: WorkoutStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Progress of a workout.
///
/// - `Planned`: Scheduled, nothing logged yet
/// - `InProgress`: Currently being performed
/// - `Completed`: Finished
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutStatus {
    #[default]
    Planned,
    InProgress,
    Completed,
}

impl WorkoutStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "planned" => Some(Self::Planned),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Input for creating a workout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateWorkoutInput {
    pub title: Option<String>,
    pub notes: Option<String>,
    /// Defaults to `Planned` if not specified.
    #[serde(default)]
    pub status: Option<WorkoutStatus>,
    /// Defaults to the current time if not specified.
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
}

/// Partial update of a workout.
///
/// Outer `None` leaves the column untouched. For the nullable columns
/// `Some(None)` clears the value, and an empty title or notes string is
/// treated the same as clearing it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateWorkoutInput {
    #[serde(
        default,
        deserialize_with = "crate::models::patch::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "crate::models::patch::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<WorkoutStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "crate::models::patch::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_at: Option<Option<DateTime<Utc>>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_str() {
        for status in [
            WorkoutStatus::Planned,
            WorkoutStatus::InProgress,
            WorkoutStatus::Completed,
        ] {
            assert_eq!(WorkoutStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(WorkoutStatus::from_str("abandoned"), None);
    }

    #[test]
    fn update_distinguishes_absent_from_null() {
        let absent: UpdateWorkoutInput = serde_json::from_str("{}").unwrap();
        assert!(absent.title.is_none());
        assert!(absent.completed_at.is_none());

        let cleared: UpdateWorkoutInput =
            serde_json::from_str(r#"{"title": null, "completed_at": null}"#).unwrap();
        assert_eq!(cleared.title, Some(None));
        assert_eq!(cleared.completed_at, Some(None));
        assert!(cleared.notes.is_none());

        let set: UpdateWorkoutInput =
            serde_json::from_str(r#"{"notes": "felt strong", "status": "in_progress"}"#).unwrap();
        assert_eq!(set.notes, Some(Some("felt strong".to_string())));
        assert_eq!(set.status, Some(WorkoutStatus::InProgress));
    }
}
