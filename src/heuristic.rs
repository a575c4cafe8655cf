//! Deterministic rule-based answer scorer.
//!
//! Sub-scores are simple arithmetic over string matches:
//!   - clarity: sentence punctuation count, plus one if the answer uses ':' or '-'
//!   - confidence: presence of a decisive phrase, plus one for answers over 60 words
//!   - keywords: share of the role's keyword list found in the answer
//!
//! Each raw sub-score is clamped to 1..=5, multiplied by the difficulty weight,
//! then rounded and clamped again.

use crate::bank::role_keywords;
use crate::domain::{Difficulty, Feedback, Role};

const DECISIVE_PHRASES: &[&str] = &[
  "i implemented", "i would", "we did", "we used", "therefore", "so", "thus", "confident",
  "clearly", "best",
];

const LONG_ANSWER_WORDS: usize = 60;

pub const TIP_KEYWORDS: &str = "Add more technical keywords related to the topic.";
pub const TIP_CLARITY: &str = "Structure your answer into clear steps or bullets.";
pub const TIP_CONFIDENCE: &str = "State decisions and justify trade-offs.";
pub const TIP_GOOD: &str = "Good structure. Add example + metric to strengthen it.";

/// Round half up and clamp into the 1..=5 score range.
pub fn clamp_score(x: f64) -> u8 {
  if x.is_nan() {
    return 1;
  }
  x.round().clamp(1.0, 5.0) as u8
}

/// Score a free-text answer. Never fails: empty input yields the minimum scores.
/// `role = None` (unrecognised role) scores keywords against an empty list.
pub fn score(answer: &str, role: Option<Role>, difficulty: Difficulty) -> Feedback {
  let text = answer.to_lowercase();
  let keywords: &[&str] = role.map(role_keywords).unwrap_or(&[]);

  let word_count = text.split_whitespace().count();
  let sentence_count = text.chars().filter(|c| matches!(c, '.' | '!' | '?')).count();
  let has_structure = text.contains(':') || text.contains('-');

  let raw_clarity = clamp_score((sentence_count + usize::from(has_structure)) as f64 * 1.2);

  let decisive = DECISIVE_PHRASES.iter().any(|p| text.contains(p));
  let raw_confidence = clamp_score(
    (if decisive { 3.0 } else { 2.0 }) + if word_count > LONG_ANSWER_WORDS { 1.0 } else { 0.0 },
  );

  let matches = keywords.iter().filter(|kw| text.contains(*kw)).count();
  let denominator = f64::max(3.0, keywords.len() as f64 / 4.0);
  let raw_keywords = clamp_score(matches as f64 / denominator * 5.0);

  let w = difficulty.weight();
  let clarity = clamp_score(f64::from(raw_clarity) * w);
  let confidence = clamp_score(f64::from(raw_confidence) * w);
  let keywords = clamp_score(f64::from(raw_keywords) * w);

  Feedback { clarity, confidence, keywords, tip: pick_tip(clarity, confidence, keywords) }
}

/// Every breached threshold contributes its clause, in a fixed order.
pub fn pick_tip(clarity: u8, confidence: u8, keywords: u8) -> String {
  let mut parts: Vec<&str> = Vec::new();
  if keywords < 3 {
    parts.push(TIP_KEYWORDS);
  }
  if clarity < 3 {
    parts.push(TIP_CLARITY);
  }
  if confidence < 3 {
    parts.push(TIP_CONFIDENCE);
  }
  if parts.is_empty() {
    TIP_GOOD.to_string()
  } else {
    parts.join(" ")
  }
}
