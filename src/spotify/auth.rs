use std::{fmt, net::SocketAddr, sync::Arc, time::Duration};

use reqwest::{Client, Url, header::AUTHORIZATION};
use tokio::sync::oneshot;

use crate::{
    api::{CallbackOutcome, CallbackState},
    config::Settings,
    credentials::Credentials,
    info,
    server::{CallbackServer, start_callback_server},
    spotify::{SpotifyError, ensure_success},
    types::{AccessToken, TokenResponse},
    utils, warning,
};

/// Phases of the authorization flow, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    AwaitingRedirect,
    ExchangingToken,
    Done,
}

impl AuthPhase {
    /// The phase that follows this one, `None` once the flow is done.
    pub fn next(self) -> Option<AuthPhase> {
        match self {
            AuthPhase::AwaitingRedirect => Some(AuthPhase::ExchangingToken),
            AuthPhase::ExchangingToken => Some(AuthPhase::Done),
            AuthPhase::Done => None,
        }
    }
}

impl fmt::Display for AuthPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuthPhase::AwaitingRedirect => "awaiting redirect",
            AuthPhase::ExchangingToken => "exchanging token",
            AuthPhase::Done => "done",
        };
        f.write_str(name)
    }
}

/// An authorization request that has been started but not yet answered.
///
/// Returned by [`begin_authorization`]. The callback listener is already
/// running; the user still has to visit [`PendingAuthorization::authorize_url`].
/// Calling [`PendingAuthorization::complete`] waits for the redirect and
/// finishes the flow.
pub struct PendingAuthorization {
    authorize_url: String,
    state: String,
    redirect_uri: String,
    token_url: String,
    credentials: Credentials,
    timeout: Duration,
    code_rx: oneshot::Receiver<CallbackOutcome>,
    server: CallbackServer,
}

/// Starts the OAuth 2.0 authorization-code flow.
///
/// This is the first of two phases:
/// 1. **State**: Generates a random `state` value the callback must echo back
/// 2. **Listener**: Binds the local callback listener on the path of the
///    configured redirect URI
/// 3. **URL**: Builds the authorize URL with the configured scope
///
/// Opening the URL is left to the caller so it can decide between launching a
/// browser and printing it.
///
/// # Errors
///
/// - [`SpotifyError::InvalidUrl`] if the authorize endpoint is not a URL
/// - [`SpotifyError::Listener`] if the listener address cannot be bound
///
/// # Example
///
/// ```
/// let pending = begin_authorization(&settings, &credentials).await?;
/// utils::open_in_browser(pending.authorize_url());
/// let token = pending.complete(&client).await?;
/// ```
pub async fn begin_authorization(
    settings: &Settings,
    credentials: &Credentials,
) -> Result<PendingAuthorization, SpotifyError> {
    let state = utils::generate_state();
    let authorize_url = authorize_url(
        &settings.auth_url,
        &credentials.client_id,
        &settings.scope,
        &settings.redirect_uri,
        &state,
    )?;

    let (code_tx, code_rx) = oneshot::channel();
    let callback_state = Arc::new(CallbackState::new(state.clone(), code_tx));
    let server = start_callback_server(
        settings.server_address,
        &settings.callback_path(),
        callback_state,
    )
    .await?;

    Ok(PendingAuthorization {
        authorize_url,
        state,
        redirect_uri: settings.redirect_uri.clone(),
        token_url: settings.token_url.clone(),
        credentials: credentials.clone(),
        timeout: settings.auth_timeout,
        code_rx,
        server,
    })
}

impl PendingAuthorization {
    pub fn authorize_url(&self) -> &str {
        &self.authorize_url
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn listener_addr(&self) -> SocketAddr {
        self.server.local_addr()
    }

    pub fn phase(&self) -> AuthPhase {
        AuthPhase::AwaitingRedirect
    }

    /// Waits for the redirect and exchanges the code for an access token.
    ///
    /// The listener is shut down as soon as the redirect arrives or the wait
    /// ends, whichever comes first; it never serves a second flow.
    ///
    /// # Errors
    ///
    /// - [`SpotifyError::AuthorizationTimeout`] if no callback arrives in time
    /// - [`SpotifyError::AuthorizationDenied`] if the user declined
    /// - [`SpotifyError::CallbackClosed`] if the listener went away
    /// - Any error from [`exchange_code`]
    pub async fn complete(self, client: &Client) -> Result<AccessToken, SpotifyError> {
        let Self {
            redirect_uri,
            token_url,
            credentials,
            timeout,
            code_rx,
            server,
            ..
        } = self;
        let mut phase = AuthPhase::AwaitingRedirect;

        let received = match tokio::time::timeout(timeout, code_rx).await {
            Ok(Ok(outcome)) => Ok(outcome),
            Ok(Err(_)) => Err(SpotifyError::CallbackClosed),
            Err(_) => Err(SpotifyError::AuthorizationTimeout(timeout)),
        };

        if let Err(e) = server.shutdown().await {
            warning!("Callback listener did not shut down cleanly: {}", e);
        }

        let code = match received? {
            CallbackOutcome::Code(code) => code,
            CallbackOutcome::Denied(reason) => {
                return Err(SpotifyError::AuthorizationDenied(reason));
            }
        };

        phase = phase.next().unwrap_or(phase);
        info!("Authorization {}...", phase);
        let token = exchange_code(client, &token_url, &credentials, &code, &redirect_uri).await?;

        phase = phase.next().unwrap_or(phase);
        info!("Authorization {}.", phase);
        Ok(token)
    }
}

/// Builds the URL the user visits to grant access.
pub fn authorize_url(
    auth_url: &str,
    client_id: &str,
    scope: &str,
    redirect_uri: &str,
    state: &str,
) -> Result<String, SpotifyError> {
    let url = Url::parse_with_params(
        auth_url,
        &[
            ("response_type", "code"),
            ("client_id", client_id),
            ("scope", scope),
            ("redirect_uri", redirect_uri),
            ("state", state),
        ],
    )
    .map_err(|e| SpotifyError::InvalidUrl {
        url: auth_url.to_string(),
        reason: e.to_string(),
    })?;

    Ok(url.into())
}

/// Exchanges an authorization code for an access token.
///
/// Sends the code, the redirect URI and `grant_type=authorization_code` as a
/// form, authenticated with HTTP Basic `base64(client_id:client_secret)`.
///
/// # Errors
///
/// - [`SpotifyError::Api`] for a non-success status, carrying the OAuth
///   `error_description` when present
/// - [`SpotifyError::Decode`] if the body has no `access_token`
pub async fn exchange_code(
    client: &Client,
    token_url: &str,
    credentials: &Credentials,
    code: &str,
    redirect_uri: &str,
) -> Result<AccessToken, SpotifyError> {
    let response = client
        .post(token_url)
        .header(AUTHORIZATION, credentials.basic_auth_header())
        .form(&[
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await?;

    let body = ensure_success(response).await?.text().await?;
    let token: TokenResponse = serde_json::from_str(&body)?;

    Ok(token.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_advance_in_order() {
        let mut phase = AuthPhase::AwaitingRedirect;
        let mut seen = vec![phase];
        while let Some(next) = phase.next() {
            phase = next;
            seen.push(phase);
        }
        assert_eq!(
            seen,
            [
                AuthPhase::AwaitingRedirect,
                AuthPhase::ExchangingToken,
                AuthPhase::Done
            ]
        );
    }

    #[test]
    fn authorize_url_encodes_params() {
        let url = authorize_url(
            "https://accounts.spotify.com/authorize",
            "client",
            "playlist-modify-public",
            "http://localhost:8509/auth_callback",
            "abc",
        )
        .unwrap();

        let parsed = Url::parse(&url).unwrap();
        let pairs: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("response_type".into(), "code".into())));
        assert!(pairs.contains(&(
            "redirect_uri".into(),
            "http://localhost:8509/auth_callback".into()
        )));
        assert!(pairs.contains(&("state".into(), "abc".into())));
        assert!(url.starts_with("https://accounts.spotify.com/authorize?"));
    }

    #[test]
    fn authorize_url_rejects_garbage() {
        assert!(matches!(
            authorize_url("not a url", "c", "s", "r", "x"),
            Err(SpotifyError::InvalidUrl { .. })
        ));
    }
}
