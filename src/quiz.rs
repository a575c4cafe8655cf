//! One guided run through a drawn question set: present, answer, score, repeat, finalize.

use crate::domain::{Difficulty, Feedback, Role, Session};
use crate::session::{finalize, SessionError};

#[derive(Debug)]
pub struct QuizRun {
  role: Role,
  /// Role used for keyword scoring; `None` when the client sent an unknown role.
  keyword_role: Option<Role>,
  difficulty: Difficulty,
  questions: Vec<String>,
  answers: Vec<String>,
  feedback: Vec<Feedback>,
}

impl QuizRun {
  pub fn new(role: Role, keyword_role: Option<Role>, difficulty: Difficulty, questions: Vec<String>) -> Self {
    let n = questions.len();
    Self {
      role,
      keyword_role,
      difficulty,
      questions,
      answers: Vec::with_capacity(n),
      feedback: Vec::with_capacity(n),
    }
  }

  pub fn total(&self) -> usize {
    self.questions.len()
  }

  pub fn keyword_role(&self) -> Option<Role> {
    self.keyword_role
  }

  pub fn difficulty(&self) -> Difficulty {
    self.difficulty
  }

  /// The question awaiting an answer, with its index.
  pub fn current(&self) -> Option<(usize, &str)> {
    let i = self.answers.len();
    self.questions.get(i).map(|q| (i, q.as_str()))
  }

  pub fn is_complete(&self) -> bool {
    self.answers.len() >= self.questions.len()
  }

  /// Record the answer and its feedback for the current question. Returns its index,
  /// or `None` if every question has already been answered.
  pub fn record(&mut self, answer: String, feedback: Feedback) -> Option<usize> {
    if self.is_complete() {
      return None;
    }
    let index = self.answers.len();
    self.answers.push(answer);
    self.feedback.push(feedback);
    Some(index)
  }

  pub fn into_session(self) -> Result<Session, SessionError> {
    finalize(self.role, self.difficulty, self.questions, self.answers, self.feedback)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::bank::QUESTION_COUNT;

  fn fb(c: u8) -> Feedback {
    Feedback { clarity: c, confidence: c, keywords: c, tip: String::new() }
  }

  #[test]
  fn walks_questions_in_order_then_finalizes() {
    let qs: Vec<String> = (0..QUESTION_COUNT).map(|i| format!("q{i}")).collect();
    let mut run = QuizRun::new(Role::Frontend, Some(Role::Frontend), Difficulty::Easy, qs);
    assert_eq!(run.total(), QUESTION_COUNT);
    assert_eq!(run.current(), Some((0, "q0")));

    assert_eq!(run.record("a0".into(), fb(1)), Some(0));
    assert_eq!(run.current(), Some((1, "q1")));
    for i in 1..QUESTION_COUNT {
      assert_eq!(run.record(format!("a{i}"), fb(i as u8 + 1)), Some(i));
    }
    assert!(run.is_complete());
    assert_eq!(run.current(), None);
    assert_eq!(run.record("extra".into(), fb(5)), None);

    let s = run.into_session().expect("session");
    assert_eq!(s.answers, vec!["a0", "a1", "a2", "a3", "a4"]);
    assert_eq!(s.avg_clarity, 3.0);
    assert_eq!(s.role, Role::Frontend);
    assert_eq!(s.difficulty, Difficulty::Easy);
  }

  #[test]
  fn unfinished_run_cannot_finalize() {
    let mut run = QuizRun::new(Role::Software, None, Difficulty::Medium, vec!["q0".into(), "q1".into()]);
    run.record("a0".into(), fb(3));
    assert!(matches!(run.into_session(), Err(SessionError::LengthMismatch { .. })));
  }
}
