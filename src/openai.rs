//! Minimal OpenAI client used as the remote answer scorer.
//!
//! We only call chat.completions and request a strict JSON object.
//! Calls are instrumented and log model names, latencies, and response sizes (not contents).
//!
//! NOTE: We never log the API key or the answer text.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::config::Prompts;
use crate::domain::Feedback;
use crate::heuristic::clamp_score;
use crate::remote::{RemoteScore, RemoteScorer};
use crate::util::fill_template;

const DEFAULT_TIMEOUT_SECS: u64 = 20;

#[derive(Clone)]
pub struct OpenAI {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub model: String,
  pub prompts: Prompts,
}

impl OpenAI {
  /// Construct the client if we find OPENAI_API_KEY; otherwise return None.
  pub fn from_env(prompts: Prompts) -> Option<Self> {
    let api_key = std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty())?;
    let base_url =
      std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
    let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
    let timeout = std::env::var("OPENAI_TIMEOUT_SECS")
      .ok()
      .and_then(|s| s.parse::<u64>().ok())
      .unwrap_or(DEFAULT_TIMEOUT_SECS);

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(timeout))
      .build()
      .ok()?;

    Some(Self { client, api_key, base_url, model, prompts })
  }

  /// JSON-object chat completion. Returns the raw message content.
  #[instrument(level = "info", skip(self, system, user), fields(model = %self.model))]
  async fn chat_json_text(&self, system: &str, user: &str, temperature: f32) -> Result<String, String> {
    let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
    let req = ChatCompletionRequest {
      model: self.model.clone(),
      messages: vec![
        ChatMessageReq { role: "system".into(), content: system.into() },
        ChatMessageReq { role: "user".into(), content: user.into() },
      ],
      temperature,
      response_format: Some(ResponseFormat { r#type: "json_object".into() }),
      max_tokens: None,
    };

    let res = self.client.post(&url)
      .header(USER_AGENT, "interview-buddy-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req).send().await.map_err(|e| e.to_string())?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let msg = extract_openai_error(&body).unwrap_or(body);
      return Err(format!("OpenAI HTTP {}: {}", status, msg));
    }

    let body: ChatCompletionResponse = res.json().await.map_err(|e| e.to_string())?;
    if let Some(usage) = &body.usage {
      info!(prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "OpenAI usage");
    }
    Ok(body.choices.first()
      .and_then(|c| c.message.content.clone())
      .unwrap_or_default())
  }

  /// Ask the model to score one answer.
  #[instrument(level = "info", skip(self, question, answer), fields(question_len = question.len(), answer_len = answer.len()))]
  pub async fn score_answer(&self, question: &str, answer: &str) -> Result<Feedback, String> {
    let user = fill_template(
      &self.prompts.feedback_user_template,
      &[("question", question), ("answer", answer)],
    );
    let start = Instant::now();
    let text = self.chat_json_text(&self.prompts.feedback_system, &user, 0.4).await?;
    info!(elapsed = ?start.elapsed(), response_len = text.len(), "Model response received");
    parse_feedback_json(&text)
  }
}

#[async_trait]
impl RemoteScorer for OpenAI {
  async fn try_score(&self, question: &str, answer: &str) -> RemoteScore {
    match self.score_answer(question, answer).await {
      Ok(fb) => RemoteScore::Scored(fb),
      Err(e) => {
        error!(target: "scoring", model = %self.model, error = %e, "OpenAI scoring failed; falling back to heuristic");
        RemoteScore::Unavailable
      }
    }
  }

  fn name(&self) -> &str {
    "openai"
  }
}

#[derive(Deserialize)]
struct RawFeedback {
  clarity: f64,
  confidence: f64,
  keywords: f64,
  #[serde(default)]
  tip: String,
}

/// Parse the model's JSON reply into clamped feedback.
pub fn parse_feedback_json(text: &str) -> Result<Feedback, String> {
  let raw: RawFeedback = serde_json::from_str(text.trim()).map_err(|e| format!("JSON parse error: {}", e))?;
  Ok(Feedback {
    clarity: clamp_score(raw.clarity),
    confidence: clamp_score(raw.confidence),
    keywords: clamp_score(raw.keywords),
    tip: raw.tip.trim().to_string(),
  })
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
  temperature: f32,
  #[serde(skip_serializing_if = "Option::is_none")]
  response_format: Option<ResponseFormat>,
  #[serde(skip_serializing_if = "Option::is_none")]
  max_tokens: Option<u32>,
}
#[derive(Serialize)]
struct ChatMessageReq { role: String, content: String }
#[derive(Serialize)]
struct ResponseFormat { #[serde(rename = "type")] r#type: String }

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
  #[serde(default)] total_tokens: Option<u32>,
}

/// Try to extract a clean error message from OpenAI error body.
fn extract_openai_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  serde_json::from_str::<EWrap>(body).ok().map(|w| w.error.message)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_and_clamps_model_scores() {
    let fb = parse_feedback_json(r#"{"clarity": 7, "confidence": 0, "keywords": 3.6, "tip": " Add a metric. "}"#)
      .expect("feedback");
    assert_eq!((fb.clarity, fb.confidence, fb.keywords), (5, 1, 4));
    assert_eq!(fb.tip, "Add a metric.");
  }

  #[test]
  fn rejects_wrong_shape() {
    assert!(parse_feedback_json("not json").is_err());
    assert!(parse_feedback_json(r#"{"clarity": 3, "tip": "x"}"#).is_err());
    assert!(parse_feedback_json(r#"{"clarity": "high", "confidence": 3, "keywords": 3}"#).is_err());
  }

  #[test]
  fn extracts_api_error_message() {
    let body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
    assert_eq!(extract_openai_error(body).as_deref(), Some("Incorrect API key provided"));
    assert_eq!(extract_openai_error("<html>"), None);
  }

  #[tokio::test]
  async fn unreachable_service_is_unavailable() {
    let oa = OpenAI {
      client: reqwest::Client::builder().timeout(Duration::from_secs(2)).build().expect("client"),
      api_key: "sk-test".into(),
      base_url: "http://127.0.0.1:9".into(),
      model: "gpt-4o-mini".into(),
      prompts: Prompts::default(),
    };
    assert_eq!(oa.try_score("q", "a").await, RemoteScore::Unavailable);
  }
}
