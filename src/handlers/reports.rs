use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::evaluation::Evaluation;
use crate::models::goal::GoalStatus;
use crate::models::report::{
    CreateAdviseRequest, Report, ReportAnswers, ReportDigest, SubmitReportRequest,
};
use crate::personas::Persona;
use crate::AppState;

/// How many recent reports feed a trend evaluation.
const EVALUATION_HISTORY_LIMIT: i64 = 10;

#[derive(Debug, Serialize)]
pub struct TodayReportResponse {
    pub date: NaiveDate,
    pub answers: ReportAnswers,
    pub summary: String,
    pub evaluation: Option<String>,
}

pub async fn submit_report(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<SubmitReportRequest>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    body.answers.validate().map_err(AppError::Validation)?;

    let today = Utc::now().date_naive();

    // Check before the expensive generation call; the unique constraint
    // below backstops the concurrent case.
    let already_submitted =
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM reports WHERE user_id = $1 AND report_date = $2",
        )
        .bind(auth_user.id)
        .bind(today)
        .fetch_one(&state.db)
        .await?;

    if already_submitted > 0 {
        return Err(AppError::Conflict("Report already submitted for today".into()));
    }

    let active_goal_titles = sqlx::query_scalar::<_, String>(
        "SELECT title FROM goals WHERE user_id = $1 AND status = $2 ORDER BY created_at ASC",
    )
    .bind(auth_user.id)
    .bind(GoalStatus::Active)
    .fetch_all(&state.db)
    .await?;

    // Generation first; a failed call must leave no orphan row.
    let summary = state
        .ai
        .generate_summary(&body.answers, &active_goal_titles)
        .await?;

    let inserted = sqlx::query(
        r#"
        INSERT INTO reports (id, user_id, report_date, answers, summary)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (user_id, report_date) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(auth_user.id)
    .bind(today)
    .bind(sqlx::types::Json(&body.answers))
    .bind(&summary)
    .execute(&state.db)
    .await?;

    if inserted.rows_affected() == 0 {
        return Err(AppError::Conflict("Report already submitted for today".into()));
    }

    tracing::info!(user_id = %auth_user.id, date = %today, "Report submitted");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Report submitted successfully",
            "summary": summary,
        })),
    ))
}

pub async fn create_advise(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateAdviseRequest>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let persona = Persona::by_id(body.advisor)
        .ok_or_else(|| AppError::Validation(format!("Unknown advisor id {}", body.advisor)))?;

    let history = sqlx::query_as::<_, ReportDigest>(
        r#"
        SELECT report_date, summary FROM reports
        WHERE user_id = $1
        ORDER BY report_date DESC
        LIMIT $2
        "#,
    )
    .bind(auth_user.id)
    .bind(EVALUATION_HISTORY_LIMIT)
    .fetch_all(&state.db)
    .await?;

    let content = state.ai.generate_evaluation(&history, persona).await?;

    // Atomic replace keyed by user id: concurrent requests cannot leave zero
    // or two surviving rows.
    sqlx::query(
        r#"
        INSERT INTO evaluations (id, user_id, eval_date, content)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id) DO UPDATE SET
            eval_date = EXCLUDED.eval_date,
            content = EXCLUDED.content,
            created_at = NOW()
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(auth_user.id)
    .bind(Utc::now().date_naive())
    .bind(&content)
    .execute(&state.db)
    .await?;

    tracing::info!(user_id = %auth_user.id, advisor = persona.name, "Evaluation created");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Evaluation created successfully",
            "evaluation": content,
        })),
    ))
}

pub async fn get_today_report(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<TodayReportResponse>> {
    let today = Utc::now().date_naive();

    let report = sqlx::query_as::<_, Report>(
        "SELECT * FROM reports WHERE user_id = $1 AND report_date = $2",
    )
    .bind(auth_user.id)
    .bind(today)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::NotFound("No report found for today".into()))?;

    let evaluation =
        sqlx::query_as::<_, Evaluation>("SELECT * FROM evaluations WHERE user_id = $1")
            .bind(auth_user.id)
            .fetch_optional(&state.db)
            .await?;

    Ok(Json(TodayReportResponse {
        date: report.report_date,
        answers: report.answers.0,
        summary: report.summary,
        evaluation: evaluation.map(|e| e.content),
    }))
}
