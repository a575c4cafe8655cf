//! Built-in question pools, role keyword lists, and random question selection.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::QuestionCfg;
use crate::domain::{Difficulty, Role};

/// Number of questions in one run.
pub const QUESTION_COUNT: usize = 5;

/// Suffix appended to every question drawn at the hardest tier.
pub const HARD_SUFFIX: &str = " (Discuss trade-offs, edge cases, metrics.)";

const SOFTWARE_QUESTIONS: &[&str] = &[
  "Explain the concept of polymorphism in OOP.",
  "What is the difference between processes and threads?",
  "How would you detect and optimize performance bottlenecks in an application?",
  "Explain Big-O notation with examples.",
  "What are REST APIs and how do they work?",
  "Describe a time you debugged a hard issue. What steps did you take?",
  "How do you design a scalable URL shortener?",
];

const CYBERSECURITY_QUESTIONS: &[&str] = &[
  "What is the difference between symmetric and asymmetric encryption?",
  "Explain the CIA triad in cybersecurity.",
  "How do firewalls protect networks?",
  "What is SQL injection and how can it be prevented?",
  "Explain zero-day vulnerability.",
  "How would you respond to a ransomware incident?",
  "What steps are in a typical vulnerability assessment?",
];

const FRONTEND_QUESTIONS: &[&str] = &[
  "What is the difference between React and plain JavaScript?",
  "Explain the CSS box model.",
  "What are the advantages of using Tailwind CSS?",
  "How does the virtual DOM improve performance?",
  "What is responsive design and how do you achieve it?",
  "How would you improve web performance for a heavy page?",
  "Explain accessibility (a11y) best practices you use.",
];

const SOFTWARE_KEYWORDS: &[&str] = &[
  "time complexity", "space complexity", "polymorphism", "inheritance", "api", "thread",
  "process", "scalable", "big-o", "rest", "http", "cache",
];

const CYBERSECURITY_KEYWORDS: &[&str] = &[
  "cia", "confidentiality", "integrity", "availability", "firewall", "encryption", "symmetric",
  "asymmetric", "sql injection", "xss", "vulnerability", "mitigation", "incident", "ransomware",
  "zero-day",
];

const FRONTEND_KEYWORDS: &[&str] = &[
  "react", "virtual dom", "css", "box model", "responsive", "tailwind", "bundle", "lazy load",
  "accessibility", "a11y", "aria", "performance", "lighthouse",
];

/// Keyword list used for substring counting when scoring an answer.
pub fn role_keywords(role: Role) -> &'static [&'static str] {
  match role {
    Role::Software => SOFTWARE_KEYWORDS,
    Role::Cybersecurity => CYBERSECURITY_KEYWORDS,
    Role::Frontend => FRONTEND_KEYWORDS,
  }
}

fn builtin_questions(role: Role) -> &'static [&'static str] {
  match role {
    Role::Software => SOFTWARE_QUESTIONS,
    Role::Cybersecurity => CYBERSECURITY_QUESTIONS,
    Role::Frontend => FRONTEND_QUESTIONS,
  }
}

/// Immutable role -> question pool mapping, built once at startup.
#[derive(Clone, Debug)]
pub struct QuestionBank {
  pools: HashMap<Role, Vec<String>>,
}

impl QuestionBank {
  /// Built-in pools only.
  pub fn builtin() -> Self {
    Self::with_extra(&[])
  }

  /// Built-in pools plus config-provided questions. Entries with an unknown role
  /// or empty text are skipped.
  pub fn with_extra(extra: &[QuestionCfg]) -> Self {
    let mut pools: HashMap<Role, Vec<String>> = Role::ALL
      .iter()
      .map(|r| (*r, builtin_questions(*r).iter().map(|q| q.to_string()).collect()))
      .collect();

    for q in extra {
      let text = q.text.trim();
      match Role::parse(&q.role) {
        Some(role) if !text.is_empty() => {
          let pool = pools.entry(role).or_default();
          if !pool.iter().any(|existing| existing == text) {
            pool.push(text.to_string());
          }
        }
        _ => {
          tracing::warn!(target: "interview_backend", role = %q.role, "Skipping config question: unknown role or empty text");
        }
      }
    }

    Self { pools }
  }

  pub fn pool(&self, role: Role) -> &[String] {
    self.pools.get(&role).map(Vec::as_slice).unwrap_or(&[])
  }

  /// Draw a run's worth of questions for the role, annotated for the difficulty.
  pub fn draw<R: Rng + ?Sized>(&self, role: Role, difficulty: Difficulty, rng: &mut R) -> Vec<String> {
    select(self.pool(role), QUESTION_COUNT, rng)
      .into_iter()
      .map(|q| annotate(q, difficulty))
      .collect()
  }
}

/// Uniform sample of `count` distinct pool entries in shuffled order.
/// Returns the whole pool (shuffled) when `count` exceeds its length.
pub fn select<R: Rng + ?Sized>(pool: &[String], count: usize, rng: &mut R) -> Vec<String> {
  let mut copy = pool.to_vec();
  copy.shuffle(rng);
  copy.truncate(count);
  copy
}

pub fn annotate(question: String, difficulty: Difficulty) -> String {
  match difficulty {
    Difficulty::Hard => format!("{question}{HARD_SUFFIX}"),
    _ => question,
  }
}
