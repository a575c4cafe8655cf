//! Optional remote scoring collaborator and the remote-then-heuristic fallback.

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::domain::{Difficulty, Feedback, Role};
use crate::heuristic;

/// Outcome of a remote scoring attempt. Failures of any kind collapse to `Unavailable`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemoteScore {
  Scored(Feedback),
  Unavailable,
}

/// A scorer backed by an external service. Implementations never return errors.
#[async_trait]
pub trait RemoteScorer: Send + Sync {
  async fn try_score(&self, question: &str, answer: &str) -> RemoteScore;

  /// Short label for logs.
  fn name(&self) -> &str;
}

/// Which path produced a piece of feedback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedbackSource {
  Remote,
  Heuristic,
}

impl FeedbackSource {
  pub fn as_str(&self) -> &'static str {
    match self {
      FeedbackSource::Remote => "remote",
      FeedbackSource::Heuristic => "heuristic",
    }
  }
}

/// Try the remote scorer when configured, otherwise (or on `Unavailable`) use the heuristic.
#[instrument(level = "debug", skip(remote, question, answer), fields(question_len = question.len(), answer_len = answer.len()))]
pub async fn score_with_fallback(
  remote: Option<&dyn RemoteScorer>,
  question: &str,
  answer: &str,
  role: Option<Role>,
  difficulty: Difficulty,
) -> (Feedback, FeedbackSource) {
  if let Some(r) = remote {
    match r.try_score(question, answer).await {
      RemoteScore::Scored(fb) => return (fb, FeedbackSource::Remote),
      RemoteScore::Unavailable => {
        debug!(target: "scoring", scorer = r.name(), "Remote scorer unavailable; using heuristic");
      }
    }
  }
  (heuristic::score(answer, role, difficulty), FeedbackSource::Heuristic)
}


#[cfg(test)]
mod tests {
  use super::testing::FixedScorer;
  use super::*;
  use std::sync::atomic::Ordering;

  fn remote_fb() -> Feedback {
    Feedback { clarity: 4, confidence: 5, keywords: 3, tip: "Quantify impact.".into() }
  }

  #[tokio::test]
  async fn remote_result_wins_when_available() {
    let scorer = FixedScorer::new(RemoteScore::Scored(remote_fb()));
    let (fb, src) = score_with_fallback(Some(&scorer as &dyn RemoteScorer), "q", "", Some(Role::Software), Difficulty::Medium).await;
    assert_eq!(fb, remote_fb());
    assert_eq!(src, FeedbackSource::Remote);
    assert_eq!(scorer.calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn unavailable_remote_falls_back_to_heuristic() {
    let scorer = FixedScorer::new(RemoteScore::Unavailable);
    let (fb, src) = score_with_fallback(Some(&scorer as &dyn RemoteScorer), "q", "", Some(Role::Software), Difficulty::Medium).await;
    assert_eq!(src, FeedbackSource::Heuristic);
    assert_eq!(fb, heuristic::score("", Some(Role::Software), Difficulty::Medium));
  }

  #[tokio::test]
  async fn no_remote_uses_heuristic() {
    let (fb, src) = score_with_fallback(None, "q", "One. Two.", None, Difficulty::Hard).await;
    assert_eq!(src, FeedbackSource::Heuristic);
    // 2 sentences -> 2.4 -> 2, then 2 * 1.1 = 2.2 -> 2
    assert_eq!(fb.clarity, 2);
  }
}
