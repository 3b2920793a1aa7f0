use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub status: GoalStatus,
    pub created_at: DateTime<Utc>,
}

/// Closed set of goal states. Unknown strings fail deserialization and can
/// never reach storage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq)]
#[sqlx(type_name = "goal_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Active,
    Completed,
}

impl Default for GoalStatus {
    fn default() -> Self {
        Self::Active
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateGoalRequest {
    pub objective: GoalDraft,
}

#[derive(Debug, Deserialize)]
pub struct GoalDraft {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateGoalRequest {
    pub title: Option<String>,
    pub status: Option<GoalStatus>,
}

#[derive(Debug, Deserialize)]
pub struct GoalQuery {
    pub status: Option<GoalStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&GoalStatus::Active).unwrap(),
            "\"active\""
        );
        assert_eq!(
            serde_json::to_string(&GoalStatus::Completed).unwrap(),
            "\"completed\""
        );
    }

    #[test]
    fn unknown_status_rejected() {
        let result: Result<GoalStatus, _> = serde_json::from_str("\"abandoned\"");
        assert!(result.is_err());
    }

    #[test]
    fn update_request_accepts_partial_body() {
        let req: UpdateGoalRequest = serde_json::from_str(r#"{"status":"completed"}"#).unwrap();
        assert!(req.title.is_none());
        assert_eq!(req.status, Some(GoalStatus::Completed));
    }
}
