use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::goal::{CreateGoalRequest, Goal, GoalQuery, UpdateGoalRequest};
use crate::AppState;

pub async fn add_goal(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateGoalRequest>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let title = body.objective.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Goal title is required".into()));
    }

    let goal = sqlx::query_as::<_, Goal>(
        r#"
        INSERT INTO goals (id, user_id, title)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(auth_user.id)
    .bind(title)
    .fetch_one(&state.db)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Goal added successfully",
            "goal": goal,
        })),
    ))
}

pub async fn get_goals(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<GoalQuery>,
) -> AppResult<Json<Vec<Goal>>> {
    let status = query.status.unwrap_or_default();

    let goals = sqlx::query_as::<_, Goal>(
        r#"
        SELECT * FROM goals
        WHERE user_id = $1 AND status = $2
        ORDER BY created_at ASC
        "#,
    )
    .bind(auth_user.id)
    .bind(status)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(goals))
}

pub async fn update_goal(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(goal_id): Path<Uuid>,
    Json(body): Json<UpdateGoalRequest>,
) -> AppResult<Json<serde_json::Value>> {
    if let Some(title) = &body.title {
        if title.trim().is_empty() {
            return Err(AppError::Validation("Goal title must not be empty".into()));
        }
    }

    // Scoped by both id and owner: a foreign goal is indistinguishable from
    // a missing one.
    let goal = sqlx::query_as::<_, Goal>(
        r#"
        UPDATE goals SET
            title = COALESCE($3, title),
            status = COALESCE($4, status)
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(goal_id)
    .bind(auth_user.id)
    .bind(&body.title)
    .bind(body.status)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::NotFound("Goal not found".into()))?;

    Ok(Json(serde_json::json!({
        "message": "Goal updated successfully",
        "goal": goal,
    })))
}

pub async fn delete_goal(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(goal_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM goals WHERE id = $1 AND user_id = $2")
        .bind(goal_id)
        .bind(auth_user.id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Goal not found".into()));
    }

    Ok(Json(serde_json::json!({ "message": "Goal deleted successfully" })))
}
