//! Router assembly: HTTP endpoints, WebSocket upgrade, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
  routing::{get, post},
  Router,
};
use tower::ServiceBuilder;
use tower_http::{
  cors::{Any, CorsLayer},
  services::{ServeDir, ServeFile},
  trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod ws;

/// API routes without the static fallback.
pub fn api_router(state: Arc<AppState>) -> Router {
  Router::new()
    // WebSocket
    .route("/ws", get(ws::ws_upgrade))
    // HTTP API
    .route("/api/health", get(http::http_health))
    .route("/api/questions", get(http::http_get_questions))
    .route("/api/feedback", post(http::http_post_feedback))
    .route("/api/export", post(http::http_post_export))
    .route("/api/sessions", get(http::http_list_sessions).post(http::http_post_session))
    .route("/api/sessions/:id", get(http::http_get_session))
    .route("/api/sessions/:id/report", get(http::http_get_session_report))
    .with_state(state)
}

/// Build the application router with:
/// - WebSocket quiz at `/ws`
/// - JSON API under `/api/...`
/// - Static SPA from `static_dir` with index fallback
/// - CORS (allow any origin/method/headers)
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>, static_dir: &str) -> Router {
  let static_service = ServeDir::new(static_dir)
    .append_index_html_on_directories(true)
    .not_found_service(ServeFile::new(format!("{static_dir}/index.html")));

  api_router(state)
    .layer(
      ServiceBuilder::new()
        .layer(
          TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)),
    )
    // Frontend fallback
    .fallback_service(static_service)
}
