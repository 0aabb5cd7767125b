//! HTTP route handlers for the streamable MCP endpoint.

use axum::Router;
use axum::extract::State;
use axum::http::header::HeaderName;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use lotus::protocol::{JsonRpcResponse, error_codes, is_initialize_request};
use lotus::server::SERVER_NAME;
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error};

use crate::sse;
use crate::state::{AppState, SESSION_HEADER, SharedSlot, lock_slot};

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static(SESSION_HEADER)]);

    Router::new()
        .route("/", get(landing))
        .route("/health", get(health))
        .route(
            "/mcp",
            get(sse::stream_handler).post(post_mcp).delete(delete_mcp),
        )
        .layer(cors)
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn landing() -> String {
    format!(
        "{SERVER_NAME} MCP server v{}\n\nEndpoint: POST /mcp (streamable HTTP)\n\
         Tools: lotuswisdom, lotuswisdom_summary, lotuswisdom_framework\n",
        env!("CARGO_PKG_VERSION")
    )
}

/// Session id from the `mcp-session-id` header, if present and readable.
pub fn session_id_from(headers: &HeaderMap) -> Option<String> {
    headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// POST /mcp - client-to-server JSON-RPC.
///
/// A known session id dispatches to that session. No session id plus an
/// `initialize` body opens a new session. Anything else is rejected.
async fn post_mcp(State(state): State<AppState>, headers: HeaderMap, body: String) -> Response {
    let parsed: Value = match serde_json::from_str(&body) {
        Ok(value) => value,
        Err(err) => {
            let response = JsonRpcResponse::error(
                None,
                error_codes::PARSE_ERROR,
                format!("Parse error: {err}"),
            );
            return (StatusCode::BAD_REQUEST, Json(response)).into_response();
        }
    };

    match session_id_from(&headers) {
        Some(session_id) => match state.session(&session_id).await {
            Some(slot) => dispatch(&slot, &body),
            None => no_valid_session(),
        },
        None if is_initialize_request(&parsed) => initialize(&state, &body).await,
        None => no_valid_session(),
    }
}

/// Run `initialize` on a fresh session. The session is registered, and its
/// id returned in the header, only if initialization succeeded.
async fn initialize(state: &AppState, body: &str) -> Response {
    let mut session = match state.new_session() {
        Ok(session) => session,
        Err(err) => {
            error!(error = %err, "failed to create session");
            let response = JsonRpcResponse::error(
                None,
                error_codes::INTERNAL_ERROR,
                format!("create session: {err:#}"),
            );
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(response)).into_response();
        }
    };

    let Some(reply) = session.handle_line(body) else {
        return no_valid_session();
    };
    if reply.error.is_some() {
        debug!("initialize rejected; no session registered");
        return (StatusCode::BAD_REQUEST, Json(reply)).into_response();
    }

    let (session_id, _) = state.insert_session(session).await;
    let mut response = (StatusCode::OK, Json(reply)).into_response();
    match HeaderValue::from_str(&session_id) {
        Ok(value) => {
            response
                .headers_mut()
                .insert(HeaderName::from_static(SESSION_HEADER), value);
        }
        Err(err) => error!(error = %err, "session id is not a valid header value"),
    }
    response
}

/// Run one request through a session. Notifications get 202 with no body.
fn dispatch(slot: &SharedSlot, body: &str) -> Response {
    let outcome = {
        let mut slot = lock_slot(slot);
        slot.touch();
        slot.session.handle_line(body)
    };

    match outcome {
        Some(reply) => (StatusCode::OK, Json(reply)).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

fn no_valid_session() -> Response {
    debug!("rejecting request without a valid session");
    let response = JsonRpcResponse::error(
        None,
        error_codes::NO_SESSION,
        "Bad Request: No valid session ID provided",
    );
    (StatusCode::BAD_REQUEST, Json(response)).into_response()
}

/// DELETE /mcp - terminate a session.
async fn delete_mcp(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(session_id) = session_id_from(&headers) else {
        return sse::invalid_session();
    };
    if state.remove_session(&session_id).await {
        StatusCode::NO_CONTENT.into_response()
    } else {
        sse::invalid_session()
    }
}
