//! Domain models used by the backend: roles, difficulty tiers, per-answer feedback and sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Professional domain the user is practising for.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
  #[default]
  Software,
  Cybersecurity,
  Frontend,
}

impl Role {
  pub const ALL: [Role; 3] = [Role::Software, Role::Cybersecurity, Role::Frontend];

  /// Case-insensitive lookup; `None` for anything outside the fixed set.
  pub fn parse(s: &str) -> Option<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "software" => Some(Role::Software),
      "cybersecurity" => Some(Role::Cybersecurity),
      "frontend" => Some(Role::Frontend),
      _ => None,
    }
  }

  /// Unknown roles fall back to the default (software) pool.
  pub fn parse_or_default(s: &str) -> Self {
    Self::parse(s).unwrap_or_default()
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Role::Software => "software",
      Role::Cybersecurity => "cybersecurity",
      Role::Frontend => "frontend",
    }
  }
}

/// Tier adjusting question phrasing and score weighting.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
  Easy,
  #[default]
  Medium,
  Hard,
}

impl Difficulty {
  pub fn parse(s: &str) -> Option<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "easy" => Some(Difficulty::Easy),
      "medium" => Some(Difficulty::Medium),
      "hard" => Some(Difficulty::Hard),
      _ => None,
    }
  }

  /// Unknown tiers behave like medium (weight 1.0, no annotation).
  pub fn parse_or_default(s: &str) -> Self {
    Self::parse(s).unwrap_or_default()
  }

  /// Multiplier applied to every heuristic sub-score.
  pub fn weight(&self) -> f64 {
    match self {
      Difficulty::Easy => 0.9,
      Difficulty::Medium => 1.0,
      Difficulty::Hard => 1.1,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Difficulty::Easy => "easy",
      Difficulty::Medium => "medium",
      Difficulty::Hard => "hard",
    }
  }
}

/// Scored evaluation of a single answer. Every numeric field is in 1..=5.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Feedback {
  pub clarity: u8,
  pub confidence: u8,
  pub keywords: u8,
  #[serde(default)]
  pub tip: String,
}

/// One complete run through the question set with aggregated scores.
/// Built by `session::finalize`, never mutated afterwards.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
  pub id: String,
  pub timestamp: DateTime<Utc>,
  pub role: Role,
  pub difficulty: Difficulty,
  pub questions: Vec<String>,
  pub answers: Vec<String>,
  pub feedback: Vec<Feedback>,
  pub avg_clarity: f64,
  pub avg_confidence: f64,
  pub avg_keywords: f64,
  pub overall: f64,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn role_parsing_is_case_insensitive_and_lenient() {
    assert_eq!(Role::parse("CyberSecurity"), Some(Role::Cybersecurity));
    assert_eq!(Role::parse("devops"), None);
    assert_eq!(Role::parse_or_default("devops"), Role::Software);
  }

  #[test]
  fn difficulty_weights() {
    assert_eq!(Difficulty::Easy.weight(), 0.9);
    assert_eq!(Difficulty::parse_or_default("extreme"), Difficulty::Medium);
    assert_eq!(Difficulty::Hard.weight(), 1.1);
  }

  #[test]
  fn session_uses_camel_case_on_the_wire() {
    let json = serde_json::json!({
      "id": "s1",
      "timestamp": "2024-05-01T10:00:00Z",
      "role": "frontend",
      "difficulty": "hard",
      "questions": ["q"],
      "answers": ["a"],
      "feedback": [{ "clarity": 1, "confidence": 2, "keywords": 3, "tip": "t" }],
      "avgClarity": 1.0,
      "avgConfidence": 2.0,
      "avgKeywords": 3.0,
      "overall": 2.0
    });
    let s: Session = serde_json::from_value(json).expect("session");
    assert_eq!(s.role, Role::Frontend);
    assert_eq!(s.difficulty, Difficulty::Hard);
    assert_eq!(s.avg_keywords, 3.0);
  }
}
