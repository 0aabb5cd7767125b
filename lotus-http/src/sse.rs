//! Server-to-client SSE stream for `GET /mcp`.
//!
//! The server never initiates messages, so the stream carries a `connected`
//! event, keep-alives, and a final `closed` event when the session goes away.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::routes::session_id_from;
use crate::state::{AppState, SessionEvent, lock_slot};

#[derive(Serialize)]
struct SsePayload<'a> {
    #[serde(rename = "sessionId")]
    session_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'static str>,
}

impl SessionEvent {
    fn reason(&self) -> &'static str {
        match self {
            SessionEvent::Closed { .. } => "deleted",
            SessionEvent::Evicted { .. } => "idle_timeout",
        }
    }
}

/// GET /mcp handler.
pub async fn stream_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(session_id) = session_id_from(&headers) else {
        return invalid_session();
    };
    let Some(slot) = state.session(&session_id).await else {
        return invalid_session();
    };
    lock_slot(&slot).touch();

    let mut rx = state.event_tx.subscribe();
    debug!(session_id = %session_id, "sse stream opened");

    let stream = async_stream::stream! {
        let connected = SsePayload { session_id: &session_id, reason: None };
        if let Ok(json) = serde_json::to_string(&connected) {
            yield Ok::<_, Infallible>(Event::default().event("connected").data(json));
        }

        loop {
            match rx.recv().await {
                Ok(event) if event.session_id() == session_id => {
                    let payload = SsePayload {
                        session_id: &session_id,
                        reason: Some(event.reason()),
                    };
                    if let Ok(json) = serde_json::to_string(&payload) {
                        yield Ok(Event::default().event("closed").data(json));
                    }
                    break;
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(skipped = n, "SSE client lagged, some events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    break;
                }
            }
        }
        debug!(session_id = %session_id, "sse stream ended");
    };

    Sse::new(stream)
        .keep_alive(
            KeepAlive::new()
                .interval(Duration::from_secs(15))
                .text("ping"),
        )
        .into_response()
}

pub fn invalid_session() -> Response {
    (StatusCode::BAD_REQUEST, "Invalid or missing session ID").into_response()
}
