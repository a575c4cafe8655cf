//! Persisted session history: an append-only collection addressable by id.
//!
//! Two backends:
//!   - `MemorySessionStore` for a single process lifetime
//!   - `JsonlSessionStore`, one JSON session per line in a file
//!
//! Appends go through a mutex so concurrent runs cannot interleave writes.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::Session;

#[derive(Debug, Error)]
pub enum HistoryError {
  #[error("session id already exists: {0}")]
  DuplicateId(String),

  #[error("history I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("history serialization error: {0}")]
  Serde(#[from] serde_json::Error),
}

pub type HistoryResult<T> = Result<T, HistoryError>;

/// Storage for finalized sessions. Records are never updated once appended.
#[async_trait]
pub trait SessionStore: Send + Sync {
  /// Append a session; fails if its id is already present.
  async fn append(&self, session: &Session) -> HistoryResult<()>;

  /// All sessions in append order.
  async fn list(&self) -> HistoryResult<Vec<Session>>;

  async fn find(&self, id: &str) -> HistoryResult<Option<Session>>;
}

#[derive(Default)]
pub struct MemorySessionStore {
  sessions: Mutex<Vec<Session>>,
}

impl MemorySessionStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
  async fn append(&self, session: &Session) -> HistoryResult<()> {
    let mut sessions = self.sessions.lock().await;
    if sessions.iter().any(|s| s.id == session.id) {
      return Err(HistoryError::DuplicateId(session.id.clone()));
    }
    sessions.push(session.clone());
    Ok(())
  }

  async fn list(&self) -> HistoryResult<Vec<Session>> {
    Ok(self.sessions.lock().await.clone())
  }

  async fn find(&self, id: &str) -> HistoryResult<Option<Session>> {
    Ok(self.sessions.lock().await.iter().find(|s| s.id == id).cloned())
  }
}

/// JSON-lines file store. Unparseable lines are skipped on read.
///
/// Known ids are read from the file on the first append and tracked in memory afterwards;
/// the same mutex serializes writes.
pub struct JsonlSessionStore {
  path: PathBuf,
  known_ids: Mutex<Option<HashSet<String>>>,
}

impl JsonlSessionStore {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into(), known_ids: Mutex::new(None) }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  async fn ensure_parent_dir(&self) -> HistoryResult<()> {
    if let Some(parent) = self.path.parent() {
      if !parent.as_os_str().is_empty() {
        tokio::fs::create_dir_all(parent).await?;
      }
    }
    Ok(())
  }

  fn parse_line(line: &str) -> Option<Session> {
    if line.trim().is_empty() {
      return None;
    }
    match serde_json::from_str(line) {
      Ok(s) => Some(s),
      Err(e) => {
        warn!(target: "interview_backend", error = %e, "Skipping unreadable history line");
        None
      }
    }
  }

  async fn read_all(&self) -> HistoryResult<Vec<Session>> {
    let file = match File::open(&self.path).await {
      Ok(f) => f,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
      Err(e) => return Err(e.into()),
    };
    let mut lines = BufReader::new(file).lines();
    let mut out = Vec::new();
    while let Some(line) = lines.next_line().await? {
      if let Some(s) = Self::parse_line(&line) {
        out.push(s);
      }
    }
    Ok(out)
  }
}

#[async_trait]
impl SessionStore for JsonlSessionStore {
  async fn append(&self, session: &Session) -> HistoryResult<()> {
    let mut known = self.known_ids.lock().await;
    if known.is_none() {
      let loaded: HashSet<String> = self.read_all().await?.into_iter().map(|s| s.id).collect();
      debug!(target: "interview_backend", count = loaded.len(), "History ids loaded");
      *known = Some(loaded);
    }
    let ids = known.get_or_insert_with(HashSet::new);
    if ids.contains(&session.id) {
      return Err(HistoryError::DuplicateId(session.id.clone()));
    }
    self.ensure_parent_dir().await?;

    let mut json = serde_json::to_string(session)?;
    json.push('\n');

    let mut file = OpenOptions::new().create(true).append(true).open(&self.path).await?;
    file.write_all(json.as_bytes()).await?;
    file.flush().await?;
    ids.insert(session.id.clone());
    debug!(target: "interview_backend", id = %session.id, path = %self.path.display(), "Session appended to history");
    Ok(())
  }

  async fn list(&self) -> HistoryResult<Vec<Session>> {
    self.read_all().await
  }

  async fn find(&self, id: &str) -> HistoryResult<Option<Session>> {
    Ok(self.read_all().await?.into_iter().find(|s| s.id == id))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::bank::QUESTION_COUNT;
  use crate::domain::{Difficulty, Feedback, Role};
  use crate::session::finalize;

  fn sample_session() -> Session {
    let mut questions: Vec<String> = vec!["Explain the CIA triad.".into(), "How do firewalls work?".into()];
    let mut answers = vec![String::new(), "Stateful \"inspection\", na\u{ef}ve rules: allow/deny.\nSecond line.".into()];
    let mut feedback = vec![
      Feedback { clarity: 1, confidence: 2, keywords: 1, tip: "Add more technical keywords related to the topic.".into() },
      Feedback { clarity: 4, confidence: 3, keywords: 5, tip: "Good structure. Add example + metric to strengthen it.".into() },
    ];
    for i in questions.len()..QUESTION_COUNT {
      questions.push(format!("Question {i}?"));
      answers.push(format!("Answer {i}."));
      feedback.push(Feedback { clarity: 3, confidence: 3, keywords: 3, tip: String::new() });
    }
    finalize(Role::Cybersecurity, Difficulty::Hard, questions, answers, feedback).expect("session")
  }

  #[test]
  fn stores_are_object_safe() {
    fn _takes_boxed(_: Box<dyn SessionStore>) {}
  }

  #[tokio::test]
  async fn memory_store_round_trip() {
    let store = MemorySessionStore::new();
    let s = sample_session();
    store.append(&s).await.expect("append");
    assert_eq!(store.find(&s.id).await.expect("find"), Some(s.clone()));
    assert_eq!(store.find("missing").await.expect("find"), None);
    assert!(matches!(store.append(&s).await, Err(HistoryError::DuplicateId(_))));
    assert_eq!(store.list().await.expect("list").len(), 1);
  }

  #[tokio::test]
  async fn jsonl_store_round_trip_is_field_for_field() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonlSessionStore::new(dir.path().join("nested").join("history.jsonl"));
    let a = sample_session();
    let b = sample_session();
    store.append(&a).await.expect("append a");
    store.append(&b).await.expect("append b");

    let found = store.find(&a.id).await.expect("find").expect("present");
    assert_eq!(found, a);

    let all = store.list().await.expect("list");
    assert_eq!(all, vec![a.clone(), b]);

    // A second handle on the same file sees the same records.
    let reopened = JsonlSessionStore::new(store.path());
    assert_eq!(reopened.find(&a.id).await.expect("find"), Some(a));
  }

  #[tokio::test]
  async fn jsonl_store_rejects_duplicate_ids_and_skips_garbage() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("history.jsonl");
    tokio::fs::write(&path, "not json\n\n").await.expect("seed file");

    let store = JsonlSessionStore::new(&path);
    assert!(store.list().await.expect("list").is_empty());

    let s = sample_session();
    store.append(&s).await.expect("append");
    assert!(matches!(store.append(&s).await, Err(HistoryError::DuplicateId(_))));
    assert_eq!(store.list().await.expect("list").len(), 1);
  }

  #[tokio::test]
  async fn jsonl_store_knows_ids_already_on_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("history.jsonl");
    let s = sample_session();
    let line = format!("{}\n", serde_json::to_string(&s).expect("json"));
    tokio::fs::write(&path, line).await.expect("seed file");

    let store = JsonlSessionStore::new(&path);
    assert!(matches!(store.append(&s).await, Err(HistoryError::DuplicateId(_))));
    let other = sample_session();
    store.append(&other).await.expect("append");
    assert!(matches!(store.append(&other).await, Err(HistoryError::DuplicateId(_))));
    assert_eq!(store.list().await.expect("list"), vec![s, other]);
  }

  #[tokio::test]
  async fn missing_file_is_empty_history() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonlSessionStore::new(dir.path().join("none.jsonl"));
    assert!(store.list().await.expect("list").is_empty());
    assert_eq!(store.find("x").await.expect("find"), None);
  }
}
