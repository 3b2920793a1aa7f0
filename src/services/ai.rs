//! Gateway to the Claude completion API.
//!
//! Two operations: summarize one day's answers, and evaluate the trend
//! across recent summaries in a persona's voice. Both are a single
//! system + user exchange; the generated text is returned verbatim.
//! Failures surface as `AppError::Upstream` and are never retried here,
//! so a handler that calls the gateway before writing leaves no orphan
//! rows when generation fails.

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::report::{ReportAnswers, ReportDigest};
use crate::personas::Persona;

const SUMMARY_SYSTEM: &str =
    "You are an empathetic assistant who reviews daily journal entries. \
     You respond with a single short summary, addressed to the journal's author.";

/// Process-scoped client. Holds the only copy of the API credential; shared
/// read-only across requests via `Arc`.
pub struct AiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl AiClient {
    pub fn new(config: &Config) -> Self {
        // Bounded timeout so a slow upstream cannot hold a worker indefinitely.
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            api_key: config.claude_api_key.clone(),
            model: config.claude_model.clone(),
        }
    }

    pub async fn generate_summary(
        &self,
        answers: &ReportAnswers,
        active_goal_titles: &[String],
    ) -> AppResult<String> {
        let prompt = summary_prompt(answers, active_goal_titles);
        self.complete(SUMMARY_SYSTEM, &prompt).await
    }

    pub async fn generate_evaluation(
        &self,
        history: &[ReportDigest],
        persona: &Persona,
    ) -> AppResult<String> {
        let prompt = evaluation_prompt(history);
        self.complete(persona.voice, &prompt).await
    }

    async fn complete(&self, system: &str, prompt: &str) -> AppResult<String> {
        let response = self
            .http
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&serde_json::json!({
                "model": self.model,
                "max_tokens": 1024,
                "system": system,
                "messages": [{
                    "role": "user",
                    "content": prompt
                }]
            }))
            .send()
            .await
            .map_err(|e| AppError::Upstream(anyhow::anyhow!("Claude API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(anyhow::anyhow!(
                "Claude API error {}: {}",
                status,
                body
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(anyhow::anyhow!("Claude API bad response: {}", e)))?;

        body["content"][0]["text"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| {
                AppError::Upstream(anyhow::anyhow!("Claude API response missing content text"))
            })
    }
}

/// Compose the day's answers and active goals into the summary prompt.
pub fn summary_prompt(answers: &ReportAnswers, active_goal_titles: &[String]) -> String {
    let goals = if active_goal_titles.is_empty() {
        "(none)".to_string()
    } else {
        active_goal_titles
            .iter()
            .map(|t| format!("- {t}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "Here are today's answers to three questions about the day:\n\
         \n\
         Mood: {mood}\n\
         How did your day go? {q1}\n\
         What did you accomplish today? {q2}\n\
         How do you feel this evening? {q3}\n\
         \n\
         Current goals:\n{goals}\n\
         \n\
         Write a concise, empathetic summary of this day, keeping the goals in mind.",
        mood = answers.mood,
        q1 = answers.q1,
        q2 = answers.q2,
        q3 = answers.q3,
    )
}

/// Concatenate recent summaries, each tagged with its date, into the
/// trend-evaluation prompt.
pub fn evaluation_prompt(history: &[ReportDigest]) -> String {
    let days = history
        .iter()
        .map(|d| format!("{} ({})", d.summary, d.report_date))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Here are the summaries from the last few days:\n\
         {days}\n\
         \n\
         Analyze the progression and provide a constructive evaluation of the \
         trends you observe."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn answers() -> ReportAnswers {
        ReportAnswers {
            mood: json!(7),
            q1: "I finished an important project".into(),
            q2: "The day was productive".into(),
            q3: "I feel satisfied".into(),
        }
    }

    #[test]
    fn summary_prompt_embeds_answers_and_goals() {
        let goals = vec!["Learn Rust".to_string(), "Exercise".to_string()];
        let prompt = summary_prompt(&answers(), &goals);

        assert!(prompt.contains("I finished an important project"));
        assert!(prompt.contains("The day was productive"));
        assert!(prompt.contains("I feel satisfied"));
        assert!(prompt.contains('7'));
        assert!(prompt.contains("- Learn Rust"));
        assert!(prompt.contains("- Exercise"));
    }

    #[test]
    fn summary_prompt_accepts_empty_goal_list() {
        let prompt = summary_prompt(&answers(), &[]);
        assert!(prompt.contains("(none)"));
    }

    #[test]
    fn evaluation_prompt_tags_each_summary_with_its_date() {
        let history = vec![
            ReportDigest {
                report_date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
                summary: "A productive day".into(),
            },
            ReportDigest {
                report_date: NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
                summary: "A difficult day".into(),
            },
        ];
        let prompt = evaluation_prompt(&history);

        assert!(prompt.contains("A productive day (2025-03-03)"));
        assert!(prompt.contains("A difficult day (2025-03-02)"));
    }
}
