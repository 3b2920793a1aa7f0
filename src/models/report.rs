use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// One day's submitted answers plus the generated summary. Immutable once
/// written; uniqueness per (user_id, report_date) is enforced by the schema.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Report {
    pub id: Uuid,
    pub user_id: Uuid,
    pub report_date: NaiveDate,
    pub answers: Json<ReportAnswers>,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

/// The day's raw answers: a mood plus three free-text reflections.
///
/// `mood` is client-defined (a numeric scale or a label) and is stored and
/// returned exactly as submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportAnswers {
    pub mood: serde_json::Value,
    pub q1: String,
    pub q2: String,
    pub q3: String,
}

impl ReportAnswers {
    /// Presence checks only; content is free-form.
    pub fn validate(&self) -> Result<(), String> {
        if self.mood.is_null() {
            return Err("Mood is required".into());
        }
        for (name, text) in [("q1", &self.q1), ("q2", &self.q2), ("q3", &self.q3)] {
            if text.trim().is_empty() {
                return Err(format!("Answer {name} must not be empty"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct SubmitReportRequest {
    pub answers: ReportAnswers,
}

#[derive(Debug, Deserialize)]
pub struct CreateAdviseRequest {
    pub advisor: i16,
}

/// A summary with its date, as fed to the evaluation gateway.
#[derive(Debug, Clone, FromRow)]
pub struct ReportDigest {
    pub report_date: NaiveDate,
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn answers_roundtrip_numeric_mood() {
        let answers = ReportAnswers {
            mood: json!(7),
            q1: "A".into(),
            q2: "B".into(),
            q3: "C".into(),
        };
        let encoded = serde_json::to_string(&answers).unwrap();
        let decoded: ReportAnswers = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, answers);
    }

    #[test]
    fn answers_roundtrip_label_mood() {
        let answers = ReportAnswers {
            mood: json!("😊 Happy"),
            q1: "Good day".into(),
            q2: "Shipped the release".into(),
            q3: "Tired but content".into(),
        };
        let encoded = serde_json::to_value(&answers).unwrap();
        let decoded: ReportAnswers = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, answers);
    }

    #[test]
    fn empty_answer_rejected() {
        let answers = ReportAnswers {
            mood: json!(5),
            q1: "   ".into(),
            q2: "B".into(),
            q3: "C".into(),
        };
        assert!(answers.validate().is_err());
    }

    #[test]
    fn missing_mood_rejected() {
        let answers = ReportAnswers {
            mood: serde_json::Value::Null,
            q1: "A".into(),
            q2: "B".into(),
            q3: "C".into(),
        };
        assert!(answers.validate().is_err());
    }
}
