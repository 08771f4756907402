use std::path::Path;

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::config::ConfigError;

/// Client id and secret of the registered Spotify application.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Reads the credential file: client id on the first line, client secret
    /// on the second, nothing else.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = async_fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::CredentialsIo {
                path: path.display().to_string(),
                source,
            })?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let lines: Vec<&str> = contents.lines().collect();
        if lines.len() != 2 {
            return Err(ConfigError::CredentialLines(lines.len()));
        }

        let client_id = lines[0].trim();
        let client_secret = lines[1].trim();
        if client_id.is_empty() || client_secret.is_empty() {
            return Err(ConfigError::EmptyCredential);
        }

        Ok(Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
        })
    }

    /// Value for the `Authorization` header of the token endpoint.
    pub fn basic_auth_header(&self) -> String {
        let encoded = STANDARD.encode(format!("{}:{}", self.client_id, self.client_secret));
        format!("Basic {}", encoded)
    }
}
