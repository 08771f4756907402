use std::sync::Arc;

use axum::{Extension, extract::Query, http::StatusCode, response::Html};
use tokio::sync::{Mutex, oneshot};

use crate::{types::CallbackParams, warning};

/// What the redirect told us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    Code(String),
    Denied(String),
}

/// Shared between the route and the waiting authorization flow. The sender
/// is taken by the first valid callback, so only one outcome is ever sent.
pub struct CallbackState {
    expected_state: String,
    sender: Mutex<Option<oneshot::Sender<CallbackOutcome>>>,
}

impl CallbackState {
    pub fn new(expected_state: String, sender: oneshot::Sender<CallbackOutcome>) -> Self {
        Self {
            expected_state,
            sender: Mutex::new(Some(sender)),
        }
    }
}

pub async fn auth_callback(
    Query(params): Query<CallbackParams>,
    Extension(shared_state): Extension<Arc<CallbackState>>,
) -> (StatusCode, Html<&'static str>) {
    if params.state.as_deref() != Some(shared_state.expected_state.as_str()) {
        warning!("Ignoring authorization callback with an unexpected state value.");
        return (StatusCode::BAD_REQUEST, Html("<h4>State mismatch.</h4>"));
    }

    let outcome = match (params.code, params.error) {
        (Some(code), _) => CallbackOutcome::Code(code),
        (None, Some(reason)) => CallbackOutcome::Denied(reason),
        (None, None) => {
            return (
                StatusCode::BAD_REQUEST,
                Html("<h4>Missing authorization code.</h4>"),
            );
        }
    };

    let Some(sender) = shared_state.sender.lock().await.take() else {
        return (
            StatusCode::CONFLICT,
            Html("<h4>Authorization was already handled.</h4>"),
        );
    };

    let denied = matches!(outcome, CallbackOutcome::Denied(_));
    if sender.send(outcome).is_err() {
        return (
            StatusCode::GONE,
            Html("<h4>Nobody is waiting for this authorization anymore.</h4>"),
        );
    }

    if denied {
        (StatusCode::OK, Html("<h4>Login failed.</h4>"))
    } else {
        (
            StatusCode::OK,
            Html("<h2>Authorization received.</h2><p>Close this browser window.</p>"),
        )
    }
}
