use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod auth;
mod config;
mod db;
mod error;
mod handlers;
mod models;
mod personas;
mod services;

use auth::rate_limit::RateLimitState;
use config::Config;
use services::ai::AiClient;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
    pub ai: Arc<AiClient>,
    pub rate_limiter: RateLimitState,
}

fn app(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/token", post(handlers::auth::token))
        .route("/refresh", post(handlers::auth::refresh))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::rate_limit::rate_limit_auth,
        ));

    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        .merge(auth_routes);

    let protected_routes = Router::new()
        .route("/verify-token", get(handlers::auth::verify_token_handler))
        .route("/logout", post(handlers::auth::logout))
        // Reports & evaluations
        .route("/submit-report", post(handlers::reports::submit_report))
        .route("/create-advise", post(handlers::reports::create_advise))
        .route("/get-today-report", get(handlers::reports::get_today_report))
        // Goals
        .route("/add-goal", post(handlers::goals::add_goal))
        .route("/get-goals", get(handlers::goals::get_goals))
        .route("/update-goal/:id", put(handlers::goals::update_goal))
        .route("/delete-goal/:id", delete(handlers::goals::delete_goal))
        // Personas
        .route("/get-personas", get(handlers::personas::list_personas))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    let cors = CorsLayer::new()
        .allow_origin(
            state
                .config
                .frontend_url
                .parse::<axum::http::HeaderValue>()
                .expect("FRONTEND_URL must be a valid origin"),
        )
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reflecta_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Arc::new(Config::from_env());

    let db = db::create_pool(&config.database_url).await;

    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations applied");

    let ai = Arc::new(AiClient::new(&config));

    let state = AppState {
        db,
        config: config.clone(),
        ai,
        rate_limiter: RateLimitState::new(),
    };

    // Purge stale rate-limit windows every 5 minutes.
    let limiter = state.rate_limiter.clone();
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(std::time::Duration::from_secs(300));
        loop {
            tick.tick().await;
            limiter.cleanup().await;
        }
    });

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    // Connect info provides the client IP for rate limiting.
    axum::serve(
        listener,
        app(state).into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::ConnectInfo;
    use axum::http::{self, Request, StatusCode};
    use http_body_util::BodyExt;
    use std::net::SocketAddr;
    use tower::ServiceExt;

    // A lazy pool never connects unless a handler touches the database, so
    // these tests exercise routing, auth rejection, and validation only.
    fn test_state() -> AppState {
        let config = Arc::new(Config::for_tests());
        let db = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .expect("Failed to build lazy pool");
        AppState {
            db,
            ai: Arc::new(AiClient::new(&config)),
            config,
            rate_limiter: RateLimitState::new(),
        }
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let response = app(test_state())
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "reflecta-api");
    }

    #[tokio::test]
    async fn protected_route_without_token_is_unauthorized() {
        let response = app(test_state())
            .oneshot(
                Request::builder()
                    .uri("/get-goals")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn garbage_bearer_token_is_unauthorized() {
        let response = app(test_state())
            .oneshot(
                Request::builder()
                    .uri("/verify-token")
                    .header(http::header::AUTHORIZATION, "Bearer not-a-jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn register_rejects_short_password_before_touching_storage() {
        let mut request = Request::builder()
            .method(http::Method::POST)
            .uri("/register")
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"username":"alice","password":"short"}"#))
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))));

        let response = app(test_state()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], 400);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let response = app(test_state())
            .oneshot(
                Request::builder()
                    .uri("/no-such-route")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
