//! # Spotify Integration Module
//!
//! This module is the integration layer between phraselist and the Spotify
//! Web API. It covers the OAuth authorization-code flow, the paged title
//! search the resolver relies on, and playlist creation.
//!
//! ## Architecture
//!
//! ```text
//! CLI pipeline
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (authorization code + client secret)
//!     ├── Search (paged exact-title lookup)
//!     └── Playlist Operations (create, append)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Access Token Handling
//!
//! There is no global token. After the code exchange the caller builds one
//! [`SpotifyContext`] holding the HTTP client, the API base URL and the
//! token, and passes it to every remote operation.
//!
//! ## API Coverage
//!
//! - `GET /search` - Track search by title
//! - `POST /users/{user_id}/playlists` - Create the playlist
//! - `POST /playlists/{playlist_id}/tracks` - Append tracks
//! - `POST /api/token` - Authorization code exchange
//!
//! ## Error Types
//!
//! Every function returns [`SpotifyError`]. Response bodies are decoded into
//! typed structs from [`crate::types`]; a missing field is a decoding error
//! rather than a panic. There are no retries.

use std::time::Duration;

use indicatif::ProgressBar;
use reqwest::{Client, Response};

use crate::{
    config::MAX_SEARCH_PAGE_SIZE,
    types::{AccessToken, ApiErrorResponse, AuthErrorResponse},
};

pub mod auth;
mod error;
pub mod playlist;
pub mod search;

pub use error::SpotifyError;

/// Everything a remote call needs after authorization.
#[derive(Debug, Clone)]
pub struct SpotifyContext {
    client: Client,
    api_url: String,
    token: AccessToken,
    page_size: u32,
    progress: ProgressBar,
}

impl SpotifyContext {
    pub fn new(client: Client, api_url: impl Into<String>, token: AccessToken) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token,
            page_size: MAX_SEARCH_PAGE_SIZE,
            progress: ProgressBar::hidden(),
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_SEARCH_PAGE_SIZE);
        self
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn access_token(&self) -> &str {
        &self.token.access_token
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn progress(&self) -> &ProgressBar {
        &self.progress
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }
}

/// Builds the one HTTP client used for every outbound call.
pub fn http_client(timeout: Duration) -> Result<Client, SpotifyError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Passes successful responses through and turns any other status into
/// [`SpotifyError::Api`], using Spotify's error message when the body has one.
pub(crate) async fn ensure_success(response: Response) -> Result<Response, SpotifyError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(SpotifyError::Api {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

fn error_message(body: &str) -> String {
    if let Ok(api) = serde_json::from_str::<ApiErrorResponse>(body) {
        return api.error.message;
    }
    if let Ok(auth) = serde_json::from_str::<AuthErrorResponse>(body) {
        return auth.error_description.unwrap_or(auth.error);
    }
    body.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_api_shape() {
        let body = r#"{"error":{"status":401,"message":"The access token expired"}}"#;
        assert_eq!(error_message(body), "The access token expired");
    }

    #[test]
    fn error_message_reads_oauth_shape() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid authorization code"}"#;
        assert_eq!(error_message(body), "Invalid authorization code");
        assert_eq!(error_message(r#"{"error":"invalid_client"}"#), "invalid_client");
    }

    #[test]
    fn error_message_falls_back_to_body() {
        assert_eq!(error_message(" Bad Gateway \n"), "Bad Gateway");
    }

    #[test]
    fn context_clamps_page_size() {
        let ctx = SpotifyContext::new(Client::new(), "http://x/v1/", AccessToken::bearer("t"))
            .with_page_size(500);
        assert_eq!(ctx.page_size(), MAX_SEARCH_PAGE_SIZE);
        assert_eq!(ctx.endpoint("/search"), "http://x/v1/search");
    }
}
