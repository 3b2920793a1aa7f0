use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A generated trend assessment over a user's recent reports. At most one
/// row per user; regenerating replaces it wholesale.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Evaluation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub eval_date: NaiveDate,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
