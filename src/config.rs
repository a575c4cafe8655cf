//! Loading agent configuration (prompts + optional extra questions) from TOML.
//!
//! See `AgentConfig` and `Prompts` for expected schema.

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AgentConfig {
  #[serde(default)]
  pub prompts: Prompts,
  #[serde(default)]
  pub questions: Vec<QuestionCfg>,
}

/// Extra question accepted in TOML configuration, appended to the role's built-in pool.
#[derive(Clone, Debug, Deserialize)]
pub struct QuestionCfg {
  pub role: String,
  pub text: String,
}

/// Prompts used by the remote scorer. `{question}` and `{answer}` are substituted.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  pub feedback_system: String,
  pub feedback_user_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      feedback_system: "You are an interview coach. Respond ONLY with strict JSON.".into(),
      feedback_user_template: "Score the following answer from 1-5 for clarity, confidence, and keyword coverage. Then give one concise improvement tip.\nQuestion: {question}\nAnswer: {answer}\nRespond as JSON: {\"clarity\":<1-5>,\"confidence\":<1-5>,\"keywords\":<1-5>,\"tip\":\"...\"}".into(),
    }
  }
}

pub fn parse_agent_config(s: &str) -> Result<AgentConfig, toml::de::Error> {
  toml::from_str::<AgentConfig>(s)
}

/// Attempt to load `AgentConfig` from AGENT_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_agent_config_from_env() -> Option<AgentConfig> {
  let path = std::env::var("AGENT_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_agent_config(&s) {
      Ok(cfg) => {
        info!(target: "interview_backend", %path, extra_questions = cfg.questions.len(), "Loaded agent config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "interview_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "interview_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
