//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Drawing a question set (lenient role/difficulty parsing)
//!   - Scoring an answer (remote when configured, heuristic otherwise)
//!   - Finalizing and recording sessions in history
//!   - Rendering reports

use tracing::{info, instrument};

use crate::domain::{Difficulty, Feedback, Role, Session};
use crate::error::ApiError;
use crate::protocol::SessionIn;
use crate::remote::score_with_fallback;
use crate::report::render_session_pdf;
use crate::session::finalize;
use crate::state::AppState;

const DEFAULT_ROLE: &str = "software";
const DEFAULT_DIFFICULTY: &str = "medium";

/// Unknown or missing roles draw from the default pool.
pub fn question_role(role: Option<&str>) -> Role {
  Role::parse_or_default(role.unwrap_or(DEFAULT_ROLE))
}

/// Unknown roles score keywords against an empty list; a missing role means the default.
pub fn keyword_role(role: Option<&str>) -> Option<Role> {
  Role::parse(role.unwrap_or(DEFAULT_ROLE))
}

pub fn difficulty_of(difficulty: Option<&str>) -> Difficulty {
  Difficulty::parse_or_default(difficulty.unwrap_or(DEFAULT_DIFFICULTY))
}

#[instrument(level = "info", skip(state))]
pub fn questions_for(state: &AppState, role: Option<&str>, difficulty: Option<&str>) -> Vec<String> {
  let role = question_role(role);
  let difficulty = difficulty_of(difficulty);
  let qs = state.draw_questions(role, difficulty);
  info!(target: "interview_backend", role = role.as_str(), difficulty = difficulty.as_str(), count = qs.len(), "Questions drawn");
  qs
}

#[instrument(level = "info", skip(state, question, answer), fields(question_len = question.len(), answer_len = answer.len()))]
pub async fn evaluate_answer(
  state: &AppState,
  role: Option<Role>,
  difficulty: Difficulty,
  question: &str,
  answer: &str,
) -> Feedback {
  let (fb, source) = score_with_fallback(state.remote.as_deref(), question, answer, role, difficulty).await;
  info!(
    target: "scoring",
    source = source.as_str(),
    clarity = fb.clarity,
    confidence = fb.confidence,
    keywords = fb.keywords,
    "Answer scored"
  );
  fb
}

/// Append a finalized session to history and hand it back.
#[instrument(level = "info", skip_all, fields(id = %session.id))]
pub async fn store_session(state: &AppState, session: Session) -> Result<Session, ApiError> {
  state.history.append(&session).await?;
  info!(target: "interview_backend", id = %session.id, overall = session.overall, "Session saved to history");
  Ok(session)
}

/// Aggregate a submitted run and record it.
pub async fn record_session(state: &AppState, input: SessionIn) -> Result<Session, ApiError> {
  let session = finalize(
    question_role(input.role.as_deref()),
    difficulty_of(input.difficulty.as_deref()),
    input.questions,
    input.answers,
    input.feedback,
  )?;
  store_session(state, session).await
}

pub async fn list_sessions(state: &AppState) -> Result<Vec<Session>, ApiError> {
  Ok(state.history.list().await?)
}

pub async fn find_session(state: &AppState, id: &str) -> Result<Session, ApiError> {
  state
    .history
    .find(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(id.to_string()))
}

pub fn render_report(session: &Session) -> Result<Vec<u8>, ApiError> {
  Ok(render_session_pdf(session)?)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::bank::{HARD_SUFFIX, QUESTION_COUNT};
  use crate::bank::QuestionBank;
  use crate::history::MemorySessionStore;
  use crate::remote::testing::FixedScorer;
  use crate::remote::{RemoteScore, RemoteScorer};
  use std::sync::Arc;

  #[test]
  fn unknown_role_draws_software_questions() {
    let state = AppState::local();
    let qs = questions_for(&state, Some("astronaut"), None);
    assert_eq!(qs.len(), QUESTION_COUNT);
    let pool = state.bank.pool(Role::Software);
    assert!(qs.iter().all(|q| pool.contains(q)));
  }

  #[test]
  fn hard_questions_are_annotated() {
    let state = AppState::local();
    let qs = questions_for(&state, Some("cybersecurity"), Some("hard"));
    assert!(qs.iter().all(|q| q.ends_with(HARD_SUFFIX)));
  }

  #[test]
  fn role_defaults() {
    assert_eq!(keyword_role(None), Some(Role::Software));
    assert_eq!(keyword_role(Some("astronaut")), None);
    assert_eq!(question_role(Some("astronaut")), Role::Software);
    assert_eq!(difficulty_of(Some("HARD")), Difficulty::Hard);
  }

  #[tokio::test]
  async fn remote_feedback_is_used_when_available() {
    let remote_fb = Feedback { clarity: 5, confidence: 5, keywords: 5, tip: "Nice.".into() };
    let scorer: Arc<dyn RemoteScorer> = Arc::new(FixedScorer::new(RemoteScore::Scored(remote_fb.clone())));
    let state = AppState::new(QuestionBank::builtin(), Some(scorer), Arc::new(MemorySessionStore::new()));
    let fb = evaluate_answer(&state, Some(Role::Software), Difficulty::Medium, "q", "").await;
    assert_eq!(fb, remote_fb);
  }

  #[tokio::test]
  async fn record_then_find_round_trips() {
    let state = AppState::local();
    let input = SessionIn {
      role: Some("frontend".into()),
      difficulty: None,
      questions: (1..=5).map(|i| format!("q{i}")).collect(),
      answers: (1..=5).map(|i| format!("a{i}")).collect(),
      feedback: vec![
        Feedback { clarity: 2, confidence: 3, keywords: 4, tip: "t".into() },
        Feedback { clarity: 4, confidence: 3, keywords: 2, tip: "u".into() },
        Feedback { clarity: 3, confidence: 3, keywords: 3, tip: "v".into() },
        Feedback { clarity: 2, confidence: 3, keywords: 4, tip: "w".into() },
        Feedback { clarity: 4, confidence: 3, keywords: 2, tip: "x".into() },
      ],
    };
    let saved = record_session(&state, input).await.expect("record");
    assert_eq!(saved.difficulty, Difficulty::Medium);
    assert_eq!(saved.overall, 3.0);
    let found = find_session(&state, &saved.id).await.expect("find");
    assert_eq!(found, saved);
    assert!(matches!(find_session(&state, "nope").await, Err(ApiError::NotFound(_))));
  }
}
