//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{Feedback, Session};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
  Ping,
  StartQuiz {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    difficulty: Option<String>,
  },
  SubmitAnswer {
    #[serde(default)]
    answer: String,
  },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
  Pong,
  Question {
    index: usize,
    total: usize,
    text: String,
  },
  Feedback {
    index: usize,
    feedback: Feedback,
  },
  Scorecard {
    session: Session,
  },
  Error {
    message: String,
  },
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct QuestionsQuery {
  pub role: Option<String>,
  pub difficulty: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FeedbackIn {
  pub role: Option<String>,
  pub difficulty: Option<String>,
  pub question: String,
  pub answer: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExportIn {
  pub session: Option<Session>,
}

/// A completed run submitted for aggregation and storage.
#[derive(Debug, Deserialize)]
pub struct SessionIn {
  #[serde(default)]
  pub role: Option<String>,
  #[serde(default)]
  pub difficulty: Option<String>,
  pub questions: Vec<String>,
  pub answers: Vec<String>,
  pub feedback: Vec<Feedback>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthOut {
  pub ok: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorOut {
  pub error: String,
}
