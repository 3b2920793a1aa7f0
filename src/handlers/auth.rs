use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::auth::{
    jwt::{create_token_pair, hash_token, verify_token, TokenType},
    middleware::AuthUser,
    password::{hash_password, verify_password},
};
use crate::error::{AppError, AppResult};
use crate::models::user::{PublicUser, RefreshTokenRow, User};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 80, message = "Username must be 3-80 characters"))]
    pub username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Token envelope returned by register, token, and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: PublicUser,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

async fn store_refresh_token(
    db: &sqlx::PgPool,
    user_id: Uuid,
    raw_refresh_token: &str,
    ttl_secs: i64,
    parent_token_id: Option<Uuid>,
) -> AppResult<Uuid> {
    let token_hash = hash_token(raw_refresh_token);
    let expires_at = Utc::now() + Duration::seconds(ttl_secs);
    let id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO refresh_tokens (id, user_id, token_hash, expires_at, parent_token_id)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(&token_hash)
    .bind(expires_at)
    .bind(parent_token_id)
    .execute(db)
    .await?;

    Ok(id)
}

/// Create a token pair and persist the refresh token hash.
async fn issue_auth_response(
    state: &AppState,
    user_id: Uuid,
    username: &str,
    message: &str,
    parent_token_id: Option<Uuid>,
) -> AppResult<AuthResponse> {
    let tokens = create_token_pair(user_id, username, &state.config)?;
    store_refresh_token(
        &state.db,
        user_id,
        &tokens.refresh_token,
        state.config.jwt_refresh_ttl_secs,
        parent_token_id,
    )
    .await?;

    Ok(AuthResponse {
        message: message.to_string(),
        user: PublicUser {
            id: user_id,
            username: username.to_string(),
        },
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        token_type: "bearer",
        expires_in: tokens.expires_in,
    })
}

async fn revoke_all_user_tokens(db: &sqlx::PgPool, user_id: Uuid) -> AppResult<()> {
    sqlx::query(
        r#"
        UPDATE refresh_tokens
        SET revoked = true, revoked_at = NOW()
        WHERE user_id = $1 AND revoked = false
        "#,
    )
    .bind(user_id)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE username = $1")
        .bind(&body.username)
        .fetch_one(&state.db)
        .await?;

    if existing > 0 {
        return Err(AppError::Conflict("Username already exists".into()));
    }

    let pwd_hash = hash_password(&body.password)?;
    let user_id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO users (id, username, password_hash)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(user_id)
    .bind(&body.username)
    .bind(&pwd_hash)
    .execute(&state.db)
    .await
    .map_err(|e| {
        // two concurrent registrations can slip past the COUNT check
        if e.as_database_error()
            .is_some_and(|d| d.is_unique_violation())
        {
            AppError::Conflict("Username already exists".into())
        } else {
            AppError::Database(e)
        }
    })?;

    tracing::info!(user_id = %user_id, "User registered");

    let response = issue_auth_response(
        &state,
        user_id,
        &body.username,
        "User created successfully",
        None,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn token(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    // Unknown user and wrong password must be indistinguishable to the caller.
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
        .bind(&body.username)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !verify_password(&body.password, &user.password_hash)? {
        return Err(AppError::Unauthorized);
    }

    let response =
        issue_auth_response(&state, user.id, &user.username, "Login successful", None).await?;
    Ok(Json(response))
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let token_data = verify_token(&body.refresh_token, &state.config)?;

    if token_data.claims.token_type != TokenType::Refresh {
        return Err(AppError::Unauthorized);
    }

    let token_hash = hash_token(&body.refresh_token);

    let stored = sqlx::query_as::<_, RefreshTokenRow>(
        "SELECT * FROM refresh_tokens WHERE token_hash = $1",
    )
    .bind(&token_hash)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::Unauthorized)?;

    // Reuse detection: a revoked token presented again revokes the family.
    if stored.revoked {
        tracing::warn!(
            user_id = %stored.user_id,
            token_id = %stored.id,
            "Refresh token reuse detected, revoking all tokens for user"
        );
        revoke_all_user_tokens(&state.db, stored.user_id).await?;
        return Err(AppError::Unauthorized);
    }

    if stored.user_id != token_data.claims.sub {
        return Err(AppError::Unauthorized);
    }

    // Single-use rotation.
    sqlx::query(
        r#"
        UPDATE refresh_tokens
        SET revoked = true, revoked_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(stored.id)
    .execute(&state.db)
    .await?;

    let response = issue_auth_response(
        &state,
        token_data.claims.sub,
        &token_data.claims.username,
        "Token refreshed",
        Some(stored.id),
    )
    .await?;
    Ok(Json(response))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<serde_json::Value>> {
    revoke_all_user_tokens(&state.db, auth_user.id).await?;
    Ok(Json(serde_json::json!({ "message": "Logged out successfully" })))
}

pub async fn verify_token_handler(
    Extension(auth_user): Extension<AuthUser>,
) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Token is valid",
        "user": {
            "id": auth_user.id,
            "username": auth_user.username,
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_rejects_short_password() {
        let req = RegisterRequest {
            username: "alice".into(),
            password: "short".into(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn register_request_rejects_short_username() {
        let req = RegisterRequest {
            username: "ab".into(),
            password: "long enough password".into(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn register_request_accepts_valid_input() {
        let req = RegisterRequest {
            username: "alice".into(),
            password: "long enough password".into(),
        };
        assert!(req.validate().is_ok());
    }
}
