//! Session aggregation: folds per-question feedback into averaged scores and a final record.

use chrono::Utc;
use thiserror::Error;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::bank::QUESTION_COUNT;
use crate::domain::{Difficulty, Feedback, Role, Session};
use crate::util::round1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
  #[error("session has no questions")]
  Empty,

  #[error("length mismatch: {questions} questions, {answers} answers, {feedback} feedback entries")]
  LengthMismatch { questions: usize, answers: usize, feedback: usize },

  #[error("incomplete run: expected {expected} questions, got {got}")]
  IncompleteRun { expected: usize, got: usize },

  #[error("feedback #{index} has a score outside 1..=5")]
  ScoreOutOfRange { index: usize },
}

/// Running sums of the three sub-scores.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScoreTotals {
  pub clarity: u32,
  pub confidence: u32,
  pub keywords: u32,
}

impl ScoreTotals {
  pub fn add(&mut self, fb: &Feedback) {
    self.clarity += u32::from(fb.clarity);
    self.confidence += u32::from(fb.confidence);
    self.keywords += u32::from(fb.keywords);
  }
}

/// Averages rounded to one decimal, and their rounded mean.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scorecard {
  pub avg_clarity: f64,
  pub avg_confidence: f64,
  pub avg_keywords: f64,
  pub overall: f64,
}

impl Scorecard {
  pub fn from_totals(totals: ScoreTotals, count: usize) -> Self {
    let n = count.max(1) as f64;
    let avg_clarity = round1(f64::from(totals.clarity) / n);
    let avg_confidence = round1(f64::from(totals.confidence) / n);
    let avg_keywords = round1(f64::from(totals.keywords) / n);
    let overall = round1((avg_clarity + avg_confidence + avg_keywords) / 3.0);
    Self { avg_clarity, avg_confidence, avg_keywords, overall }
  }
}

fn in_range(v: u8) -> bool {
  (1..=5).contains(&v)
}

/// Build the immutable session record for a completed run.
/// All three lists must be index-aligned and hold exactly `QUESTION_COUNT` entries.
#[instrument(level = "info", skip_all, fields(role = role.as_str(), difficulty = difficulty.as_str(), count = questions.len()))]
pub fn finalize(
  role: Role,
  difficulty: Difficulty,
  questions: Vec<String>,
  answers: Vec<String>,
  feedback: Vec<Feedback>,
) -> Result<Session, SessionError> {
  if questions.len() != answers.len() || questions.len() != feedback.len() {
    return Err(SessionError::LengthMismatch {
      questions: questions.len(),
      answers: answers.len(),
      feedback: feedback.len(),
    });
  }
  if questions.is_empty() {
    return Err(SessionError::Empty);
  }
  if questions.len() != QUESTION_COUNT {
    return Err(SessionError::IncompleteRun { expected: QUESTION_COUNT, got: questions.len() });
  }

  let mut totals = ScoreTotals::default();
  for (index, fb) in feedback.iter().enumerate() {
    if !(in_range(fb.clarity) && in_range(fb.confidence) && in_range(fb.keywords)) {
      return Err(SessionError::ScoreOutOfRange { index });
    }
    totals.add(fb);
  }
  let card = Scorecard::from_totals(totals, QUESTION_COUNT);

  let session = Session {
    id: Uuid::new_v4().to_string(),
    timestamp: Utc::now(),
    role,
    difficulty,
    questions,
    answers,
    feedback,
    avg_clarity: card.avg_clarity,
    avg_confidence: card.avg_confidence,
    avg_keywords: card.avg_keywords,
    overall: card.overall,
  };
  info!(target: "interview_backend", id = %session.id, overall = session.overall, "Session finalized");
  Ok(session)
}
