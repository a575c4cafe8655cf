//! Application state: question bank, optional remote scorer, and session history.
//!
//! Everything here is built once at startup and shared read-only through `Arc<AppState>`;
//! the history store serializes its own appends.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::bank::QuestionBank;
use crate::config::load_agent_config_from_env;
use crate::domain::{Difficulty, Role};
use crate::history::{JsonlSessionStore, MemorySessionStore, SessionStore};
use crate::openai::OpenAI;
use crate::remote::RemoteScorer;

#[derive(Clone)]
pub struct AppState {
  pub bank: Arc<QuestionBank>,
  pub remote: Option<Arc<dyn RemoteScorer>>,
  pub history: Arc<dyn SessionStore>,
}

impl AppState {
  /// Build state from env: load config, build the bank, init OpenAI, open history.
  #[instrument(level = "info", skip_all)]
  pub fn from_env() -> Self {
    let cfg = load_agent_config_from_env().unwrap_or_default();
    let bank = QuestionBank::with_extra(&cfg.questions);

    for role in Role::ALL {
      info!(target: "interview_backend", role = role.as_str(), questions = bank.pool(role).len(), "Startup question inventory");
    }

    let remote: Option<Arc<dyn RemoteScorer>> = match OpenAI::from_env(cfg.prompts) {
      Some(oa) => {
        info!(target: "interview_backend", base_url = %oa.base_url, model = %oa.model, "OpenAI scoring enabled.");
        Some(Arc::new(oa) as Arc<dyn RemoteScorer>)
      }
      None => {
        info!(target: "interview_backend", "OpenAI disabled (no OPENAI_API_KEY). Using heuristic scoring.");
        None
      }
    };

    let history: Arc<dyn SessionStore> = match std::env::var("HISTORY_PATH") {
      Ok(path) if !path.trim().is_empty() => {
        let store = JsonlSessionStore::new(path);
        info!(target: "interview_backend", path = %store.path().display(), "Session history persisted to JSONL file");
        Arc::new(store)
      }
      _ => {
        info!(target: "interview_backend", "HISTORY_PATH not set; session history kept in memory");
        Arc::new(MemorySessionStore::new())
      }
    };

    Self::new(bank, remote, history)
  }

  pub fn new(bank: QuestionBank, remote: Option<Arc<dyn RemoteScorer>>, history: Arc<dyn SessionStore>) -> Self {
    Self { bank: Arc::new(bank), remote, history }
  }

  /// Built-in bank, no remote scorer, in-memory history.
  #[cfg(test)]
  pub fn local() -> Self {
    Self::new(QuestionBank::builtin(), None, Arc::new(MemorySessionStore::new()))
  }

  /// Draw a fresh question set. The RNG never crosses an await point.
  #[instrument(level = "debug", skip(self), fields(role = role.as_str(), difficulty = difficulty.as_str()))]
  pub fn draw_questions(&self, role: Role, difficulty: Difficulty) -> Vec<String> {
    let mut rng = rand::thread_rng();
    self.bank.draw(role, difficulty, &mut rng)
  }
}
