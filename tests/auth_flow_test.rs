use std::collections::HashMap;

use httpmock::prelude::*;
use reqwest::Client;
use serde_json::json;

use phraselist::config::Settings;
use phraselist::credentials::Credentials;
use phraselist::spotify::{SpotifyError, auth};

fn settings(token_url: &str, auth_timeout: &str) -> Settings {
    let vars: HashMap<&str, String> = HashMap::from([
        ("SERVER_ADDRESS", "127.0.0.1:0".to_string()),
        ("SPOTIFY_API_TOKEN_URL", token_url.to_string()),
        ("PHRASELIST_AUTH_TIMEOUT_SECS", auth_timeout.to_string()),
    ]);
    Settings::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

fn credentials() -> Credentials {
    Credentials::parse("client\nsecret").unwrap()
}

#[tokio::test]
async fn test_redirect_completes_the_flow() {
    let server = MockServer::start_async().await;
    let token_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/token").body_contains("code=abc");
            then.status(200).json_body(json!({
                "access_token": "fresh",
                "token_type": "Bearer",
                "expires_in": 3600
            }));
        })
        .await;

    let settings = settings(&server.url("/api/token"), "30");
    let pending = auth::begin_authorization(&settings, &credentials())
        .await
        .unwrap();
    assert_eq!(pending.phase(), auth::AuthPhase::AwaitingRedirect);
    assert!(pending.authorize_url().contains(pending.state()));

    let callback_url = format!(
        "http://{}/auth_callback?code=abc&state={}",
        pending.listener_addr(),
        pending.state()
    );

    let client = Client::new();
    let flow = tokio::spawn({
        let client = client.clone();
        async move { pending.complete(&client).await }
    });

    let response = client.get(&callback_url).send().await.unwrap();
    assert!(response.status().is_success());

    let token = flow.await.unwrap().unwrap();
    assert_eq!(token.access_token, "fresh");
    token_mock.assert_async().await;
}

#[tokio::test]
async fn test_denied_authorization_is_an_error() {
    let settings = settings("http://127.0.0.1:1/api/token", "30");
    let pending = auth::begin_authorization(&settings, &credentials())
        .await
        .unwrap();

    let callback_url = format!(
        "http://{}/auth_callback?error=access_denied&state={}",
        pending.listener_addr(),
        pending.state()
    );

    let client = Client::new();
    let flow = tokio::spawn({
        let client = client.clone();
        async move { pending.complete(&client).await }
    });

    client.get(&callback_url).send().await.unwrap();

    let err = flow.await.unwrap().unwrap_err();
    assert!(matches!(err, SpotifyError::AuthorizationDenied(ref reason) if reason == "access_denied"));
}

#[tokio::test]
async fn test_wrong_state_is_ignored_until_timeout() {
    let settings = settings("http://127.0.0.1:1/api/token", "1");
    let pending = auth::begin_authorization(&settings, &credentials())
        .await
        .unwrap();

    let callback_url = format!(
        "http://{}/auth_callback?code=abc&state=forged",
        pending.listener_addr()
    );

    let client = Client::new();
    let flow = tokio::spawn({
        let client = client.clone();
        async move { pending.complete(&client).await }
    });

    let response = client.get(&callback_url).send().await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

    let err = flow.await.unwrap().unwrap_err();
    assert!(matches!(err, SpotifyError::AuthorizationTimeout(_)));
}
