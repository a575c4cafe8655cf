//! Interview Buddy · Mock Interview Backend
//!
//! - Axum HTTP + WebSocket API
//! - Heuristic answer scoring, optional OpenAI scoring (via environment variables)
//! - Session history (in memory or JSONL file) and PDF scorecards
//! - Static SPA fallback (STATIC_DIR/index.html)
//!
//! Important env variables:
//!   PORT                : u16 (default 3000)
//!   OPENAI_API_KEY      : enables OpenAI scoring if present
//!   OPENAI_BASE_URL     : default "https://api.openai.com/v1"
//!   OPENAI_MODEL        : default "gpt-4o-mini"
//!   OPENAI_TIMEOUT_SECS : default 20
//!   AGENT_CONFIG_PATH   : path to TOML config (prompts + extra questions)
//!   HISTORY_PATH        : JSONL file for session history (in memory if unset)
//!   STATIC_DIR          : default "./static"
//!   LOG_LEVEL           : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT          : "pretty" (default) or "json"

mod bank;
mod config;
mod domain;
mod error;
mod heuristic;
mod history;
mod logic;
mod openai;
mod protocol;
mod quiz;
mod remote;
mod report;
mod routes;
mod session;
mod state;
mod telemetry;
mod util;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use crate::routes::build_router;
use crate::state::AppState;

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "interview_backend", error = %e, "Failed to listen for shutdown signal");
  }
  info!(target: "interview_backend", "Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Shared application state (question bank, remote scorer, history).
  let state = Arc::new(AppState::from_env());

  let static_dir = std::env::var("STATIC_DIR").unwrap_or_else(|_| "./static".into());
  let app = build_router(state, &static_dir);

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "interview_backend", %addr, %static_dir, "HTTP server listening");
  axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
  Ok(())
}
