//! Configuration management for phraselist.
//!
//! This module loads configuration from environment variables and an optional
//! `.env` file, and resolves them into a single [`Settings`] value that the
//! rest of the application receives explicitly.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Command-line overrides (applied by the caller, e.g. `--user`)
//! 2. Environment variables
//! 3. `.env` file in the local data directory
//! 4. Application defaults (where applicable)

use std::{env, net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use reqwest::Url;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8509/auth_callback";
pub const DEFAULT_SCOPE: &str = "playlist-modify-public";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8509";

/// Largest page the Spotify search endpoint hands out.
pub const MAX_SEARCH_PAGE_SIZE: u32 = 50;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_AUTH_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    MissingVar(&'static str),

    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Credentials file must contain exactly 2 lines, found {0}")]
    CredentialLines(usize),

    #[error("Credentials file contains an empty client id or secret")]
    EmptyCredential,

    #[error("Cannot read credentials file {path}: {source}")]
    CredentialsIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot load environment file: {0}")]
    EnvFile(String),
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub auth_url: String,
    pub token_url: String,
    pub redirect_uri: String,
    pub scope: String,
    pub server_address: SocketAddr,
    pub user_id: Option<String>,
    pub credentials_path: PathBuf,
    pub search_page_size: u32,
    pub request_timeout: Duration,
    pub auth_timeout: Duration,
}

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The file lives in the platform-specific local data directory under
/// `phraselist/.env`:
/// - Linux: `~/.local/share/phraselist/.env`
/// - macOS: `~/Library/Application Support/phraselist/.env`
/// - Windows: `%LOCALAPPDATA%/phraselist/.env`
///
/// A missing file is not an error since every setting can also come from the
/// process environment. Variables that are already set are not overridden.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or the `.env`
/// file exists but cannot be parsed.
///
/// # Example
///
/// ```
/// use phraselist::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Result<(), ConfigError> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| ConfigError::EnvFile(e.to_string()))?;
    }

    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|e| ConfigError::EnvFile(e.to_string()))
}

/// Returns the application's directory inside the local data directory.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("phraselist");
    path
}

impl Settings {
    /// Resolves settings from the process environment.
    ///
    /// See [`Settings::from_lookup`] for the variables and their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolves settings through an arbitrary key lookup.
    ///
    /// # Variables
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `SPOTIFY_API_URL` | `https://api.spotify.com/v1` |
    /// | `SPOTIFY_API_AUTH_URL` | `https://accounts.spotify.com/authorize` |
    /// | `SPOTIFY_API_TOKEN_URL` | `https://accounts.spotify.com/api/token` |
    /// | `SPOTIFY_API_REDIRECT_URI` | `http://localhost:8509/auth_callback` |
    /// | `SPOTIFY_API_AUTH_SCOPE` | `playlist-modify-public` |
    /// | `SERVER_ADDRESS` | `127.0.0.1:8509` |
    /// | `SPOTIFY_USER_ID` | none, must be given here or via `--user` |
    /// | `PHRASELIST_CREDENTIALS` | `<data dir>/phraselist/credentials` |
    /// | `PHRASELIST_SEARCH_PAGE_SIZE` | `50`, accepted range 1..=50 |
    /// | `PHRASELIST_REQUEST_TIMEOUT_SECS` | `30` |
    /// | `PHRASELIST_AUTH_TIMEOUT_SECS` | `300` |
    ///
    /// Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for unparsable addresses, URLs
    /// or numbers, and for a page size outside 1..=50.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let redirect_uri = get("SPOTIFY_API_REDIRECT_URI")
            .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string());
        Url::parse(&redirect_uri).map_err(|e| ConfigError::InvalidValue {
            key: "SPOTIFY_API_REDIRECT_URI",
            value: redirect_uri.clone(),
            reason: e.to_string(),
        })?;

        let server_address = get("SERVER_ADDRESS")
            .unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string());
        let server_address =
            SocketAddr::from_str(&server_address).map_err(|e| ConfigError::InvalidValue {
                key: "SERVER_ADDRESS",
                value: server_address.clone(),
                reason: e.to_string(),
            })?;

        let search_page_size = parse_number(
            "PHRASELIST_SEARCH_PAGE_SIZE",
            get("PHRASELIST_SEARCH_PAGE_SIZE"),
            MAX_SEARCH_PAGE_SIZE,
        )?;
        if !(1..=MAX_SEARCH_PAGE_SIZE).contains(&search_page_size) {
            return Err(ConfigError::InvalidValue {
                key: "PHRASELIST_SEARCH_PAGE_SIZE",
                value: search_page_size.to_string(),
                reason: format!("must be between 1 and {}", MAX_SEARCH_PAGE_SIZE),
            });
        }

        let request_timeout = parse_number(
            "PHRASELIST_REQUEST_TIMEOUT_SECS",
            get("PHRASELIST_REQUEST_TIMEOUT_SECS"),
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?;
        let auth_timeout = parse_number(
            "PHRASELIST_AUTH_TIMEOUT_SECS",
            get("PHRASELIST_AUTH_TIMEOUT_SECS"),
            DEFAULT_AUTH_TIMEOUT_SECS,
        )?;

        Ok(Self {
            api_url: trim_slash(get("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into())),
            auth_url: get("SPOTIFY_API_AUTH_URL").unwrap_or_else(|| DEFAULT_AUTH_URL.into()),
            token_url: get("SPOTIFY_API_TOKEN_URL").unwrap_or_else(|| DEFAULT_TOKEN_URL.into()),
            redirect_uri,
            scope: get("SPOTIFY_API_AUTH_SCOPE").unwrap_or_else(|| DEFAULT_SCOPE.into()),
            server_address,
            user_id: get("SPOTIFY_USER_ID"),
            credentials_path: get("PHRASELIST_CREDENTIALS")
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir().join("credentials")),
            search_page_size,
            request_timeout: Duration::from_secs(request_timeout),
            auth_timeout: Duration::from_secs(auth_timeout),
        })
    }

    /// Returns the Spotify user id that will own the playlist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVar`] when neither `SPOTIFY_USER_ID` nor
    /// a command-line override provided one.
    pub fn require_user_id(&self) -> Result<&str, ConfigError> {
        self.user_id
            .as_deref()
            .ok_or(ConfigError::MissingVar("SPOTIFY_USER_ID"))
    }

    /// Path component of the redirect URI, used as the callback route.
    pub fn callback_path(&self) -> String {
        Url::parse(&self.redirect_uri)
            .map(|url| url.path().to_string())
            .unwrap_or_else(|_| "/auth_callback".to_string())
    }
}

fn parse_number<T>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

fn trim_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_point_at_spotify() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.api_url, DEFAULT_API_URL);
        assert_eq!(s.token_url, DEFAULT_TOKEN_URL);
        assert_eq!(s.search_page_size, 50);
        assert_eq!(s.server_address.port(), 8509);
        assert_eq!(s.callback_path(), "/auth_callback");
        assert!(s.user_id.is_none());
        assert!(s.require_user_id().is_err());
    }

    #[test]
    fn overrides_are_applied() {
        let s = settings(&[
            ("SPOTIFY_API_URL", "http://127.0.0.1:9000/v1/"),
            ("SPOTIFY_USER_ID", "someone"),
            ("SPOTIFY_API_REDIRECT_URI", "http://localhost:9999/cb"),
            ("PHRASELIST_SEARCH_PAGE_SIZE", "20"),
        ])
        .unwrap();
        assert_eq!(s.api_url, "http://127.0.0.1:9000/v1");
        assert_eq!(s.require_user_id().unwrap(), "someone");
        assert_eq!(s.callback_path(), "/cb");
        assert_eq!(s.search_page_size, 20);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let s = settings(&[("SPOTIFY_USER_ID", "  "), ("SERVER_ADDRESS", "")]).unwrap();
        assert!(s.user_id.is_none());
        assert_eq!(s.server_address.to_string(), DEFAULT_SERVER_ADDRESS);
    }

    #[test]
    fn rejects_out_of_range_page_size() {
        let err = settings(&[("PHRASELIST_SEARCH_PAGE_SIZE", "51")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "PHRASELIST_SEARCH_PAGE_SIZE",
                ..
            }
        ));
        assert!(settings(&[("PHRASELIST_SEARCH_PAGE_SIZE", "0")]).is_err());
    }

    #[test]
    fn rejects_bad_server_address() {
        assert!(settings(&[("SERVER_ADDRESS", "localhost")]).is_err());
    }
}
