//! HTTP-facing error type. Every variant renders as `{"error": "..."}` with a status code.

use axum::{
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use thiserror::Error;
use tracing::error;

use crate::history::HistoryError;
use crate::protocol::ErrorOut;
use crate::report::ReportError;
use crate::session::SessionError;

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  BadRequest(String),

  #[error("session not found: {0}")]
  NotFound(String),

  #[error(transparent)]
  Session(#[from] SessionError),

  #[error(transparent)]
  History(#[from] HistoryError),

  #[error(transparent)]
  Report(#[from] ReportError),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::BadRequest(_) | ApiError::Session(_) => StatusCode::BAD_REQUEST,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::History(HistoryError::DuplicateId(_)) => StatusCode::CONFLICT,
      ApiError::History(_) | ApiError::Report(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

/// Malformed JSON bodies answer 400 in the same `{"error": ...}` envelope.
impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    ApiError::BadRequest(rejection.body_text())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      error!(target: "interview_backend", error = %self, "Request failed");
    }
    (status, Json(ErrorOut { error: self.to_string() })).into_response()
  }
}
