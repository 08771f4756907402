use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpotifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Spotify API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Spotify rejected the tracks ({status}): {message}")]
    AppendRejected { status: u16, message: String },

    #[error("Unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Authorization was denied: {0}")]
    AuthorizationDenied(String),

    #[error("No authorization callback received within {0:?}")]
    AuthorizationTimeout(Duration),

    #[error("Authorization callback closed before a code arrived")]
    CallbackClosed,

    #[error("Callback listener failed: {0}")]
    Listener(#[from] std::io::Error),
}
