//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;

use axum::{
  extract::{rejection::JsonRejection, Path, Query, State},
  http::header,
  response::IntoResponse,
  Json,
};
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::logic::*;
use crate::protocol::*;
use crate::report::report_filename;
use crate::state::AppState;

fn pdf_response(bytes: Vec<u8>, filename: &str) -> impl IntoResponse {
  (
    [
      (header::CONTENT_TYPE, "application/pdf".to_string()),
      (header::CONTENT_DISPOSITION, format!("attachment; filename={filename}")),
    ],
    bytes,
  )
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse {
  Json(HealthOut { ok: true })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_questions(
  State(state): State<Arc<AppState>>,
  Query(q): Query<QuestionsQuery>,
) -> impl IntoResponse {
  let qs = questions_for(&state, q.role.as_deref(), q.difficulty.as_deref());
  Json(qs)
}

#[instrument(level = "info", skip_all)]
pub async fn http_post_feedback(
  State(state): State<Arc<AppState>>,
  body: Result<Json<FeedbackIn>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(body) = body?;
  info!(target: "interview_backend", role = ?body.role, difficulty = ?body.difficulty, answer_len = body.answer.len(), "HTTP feedback requested");
  let fb = evaluate_answer(
    &state,
    keyword_role(body.role.as_deref()),
    difficulty_of(body.difficulty.as_deref()),
    &body.question,
    &body.answer,
  )
  .await;
  Ok(Json(fb))
}

#[instrument(level = "info", skip_all)]
pub async fn http_post_export(body: Result<Json<ExportIn>, JsonRejection>) -> Result<impl IntoResponse, ApiError> {
  let Json(body) = body?;
  let session = body.session.ok_or_else(|| ApiError::BadRequest("Missing session".into()))?;
  let bytes = render_report(&session)?;
  info!(target: "interview_backend", id = %session.id, bytes = bytes.len(), "HTTP export rendered");
  Ok(pdf_response(bytes, "Interview_Report.pdf"))
}

#[instrument(level = "info", skip_all)]
pub async fn http_post_session(
  State(state): State<Arc<AppState>>,
  body: Result<Json<SessionIn>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(body) = body?;
  let session = record_session(&state, body).await?;
  Ok(Json(session))
}

#[instrument(level = "info", skip(state))]
pub async fn http_list_sessions(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
  Ok(Json(list_sessions(&state).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_session(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
  Ok(Json(find_session(&state, &id).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_session_report(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
  let session = find_session(&state, &id).await?;
  let bytes = render_report(&session)?;
  Ok(pdf_response(bytes, &report_filename(&session)))
}
