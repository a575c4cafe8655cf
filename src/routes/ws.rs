//! WebSocket upgrade + guided quiz loop. Each connection owns at most one run;
//! answers are scored one at a time, in order.

use std::sync::Arc;

use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{debug, error, info, instrument};

use crate::logic::*;
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::quiz::QuizRun;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "interview_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "interview_backend", "WebSocket connected");
  let mut run: Option<QuizRun> = None;

  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        let replies = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "interview_backend", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state, &mut run).await
          }
          Err(e) => vec![ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) }],
        };

        for reply in replies {
          let out = serde_json::to_string(&reply).unwrap_or_else(|e| {
            serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
          });
          if let Err(e) = socket.send(Message::Text(out)).await {
            error!(target: "interview_backend", error = %e, "WS send error");
            return;
          }
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "interview_backend", "WebSocket disconnected");
}

fn question_message(run: &QuizRun) -> Option<ServerWsMessage> {
  run.current().map(|(index, text)| ServerWsMessage::Question { index, total: run.total(), text: text.to_string() })
}

/// Advance the connection's run by one client message. Returns the replies in send order.
#[instrument(level = "info", skip(state, run))]
pub async fn handle_client_ws(msg: ClientWsMessage, state: &AppState, run: &mut Option<QuizRun>) -> Vec<ServerWsMessage> {
  match msg {
    ClientWsMessage::Ping => vec![ServerWsMessage::Pong],

    ClientWsMessage::StartQuiz { role, difficulty } => {
      let questions = questions_for(state, role.as_deref(), difficulty.as_deref());
      let next = QuizRun::new(
        question_role(role.as_deref()),
        keyword_role(role.as_deref()),
        difficulty_of(difficulty.as_deref()),
        questions,
      );
      match question_message(&next) {
        Some(q) => {
          *run = Some(next);
          vec![q]
        }
        None => {
          *run = None;
          vec![ServerWsMessage::Error { message: "No questions available for this role.".into() }]
        }
      }
    }

    ClientWsMessage::SubmitAnswer { answer } => {
      let Some(active) = run.as_mut() else {
        return vec![ServerWsMessage::Error { message: "No quiz in progress. Send start_quiz first.".into() }];
      };
      let Some((_, question)) = active.current() else {
        return vec![ServerWsMessage::Error { message: "Quiz already complete.".into() }];
      };
      let question = question.to_string();

      let feedback = evaluate_answer(state, active.keyword_role(), active.difficulty(), &question, &answer).await;
      let mut replies = Vec::with_capacity(2);
      if let Some(index) = active.record(answer, feedback.clone()) {
        replies.push(ServerWsMessage::Feedback { index, feedback });
      }

      if !active.is_complete() {
        replies.extend(question_message(active));
        return replies;
      }

      let Some(done) = run.take() else {
        return replies;
      };
      let outcome = match done.into_session() {
        Ok(session) => store_session(state, session).await,
        Err(e) => Err(e.into()),
      };
      match outcome {
        Ok(session) => {
          info!(target: "interview_backend", id = %session.id, overall = session.overall, "WS quiz completed");
          replies.push(ServerWsMessage::Scorecard { session });
        }
        Err(e) => {
          error!(target: "interview_backend", error = %e, "WS quiz could not be saved");
          replies.push(ServerWsMessage::Error { message: e.to_string() });
        }
      }
      replies
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::bank::QUESTION_COUNT;

  #[tokio::test]
  async fn submit_without_run_is_an_error() {
    let state = AppState::local();
    let mut run = None;
    let replies = handle_client_ws(ClientWsMessage::SubmitAnswer { answer: "x".into() }, &state, &mut run).await;
    assert!(matches!(replies.as_slice(), [ServerWsMessage::Error { .. }]));
  }

  #[tokio::test]
  async fn full_run_ends_with_saved_scorecard() {
    let state = AppState::local();
    let mut run = None;

    let replies = handle_client_ws(
      ClientWsMessage::StartQuiz { role: Some("frontend".into()), difficulty: Some("easy".into()) },
      &state,
      &mut run,
    )
    .await;
    assert!(matches!(replies.as_slice(), [ServerWsMessage::Question { index: 0, total: QUESTION_COUNT, .. }]));

    let mut last = Vec::new();
    for i in 0..QUESTION_COUNT {
      last = handle_client_ws(ClientWsMessage::SubmitAnswer { answer: format!("React and CSS. Answer {i}.") }, &state, &mut run).await;
      if i + 1 < QUESTION_COUNT {
        assert!(matches!(last.as_slice(), [ServerWsMessage::Feedback { .. }, ServerWsMessage::Question { .. }]));
      }
    }

    let [ServerWsMessage::Feedback { index, .. }, ServerWsMessage::Scorecard { session }] = last.as_slice() else {
      panic!("unexpected final replies: {last:?}");
    };
    assert_eq!(*index, QUESTION_COUNT - 1);
    assert_eq!(session.answers.len(), QUESTION_COUNT);
    assert!(run.is_none());

    let stored = find_session(&state, &session.id).await.expect("stored");
    assert_eq!(&stored, session);
  }

  #[tokio::test]
  async fn ping_pongs() {
    let state = AppState::local();
    let mut run = None;
    let replies = handle_client_ws(ClientWsMessage::Ping, &state, &mut run).await;
    assert!(matches!(replies.as_slice(), [ServerWsMessage::Pong]));
  }
}
