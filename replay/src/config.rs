//! Harness configuration.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use users_client::{Auth, Connectors};

use crate::error::ReplayError;

/// Whether a session talks to the network or to its transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Record,
    #[default]
    Replay,
}

/// Which credential the client authenticates with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    #[default]
    Basic,
    Token,
    Jwt,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub login: String,
    pub password: String,
    pub oauth_token: String,
    pub jwt: String,
}

impl Credentials {
    /// Fixed stand-ins used while replaying. They only ever meet recorded
    /// values after redaction.
    pub fn placeholders() -> Self {
        Self {
            login: "login".to_string(),
            password: "password".to_string(),
            oauth_token: "oauth_token".to_string(),
            jwt: "jwt".to_string(),
        }
    }

    pub fn auth(&self, mode: AuthMode) -> Auth {
        match mode {
            AuthMode::Basic => Auth::basic(&self.login, &self.password),
            AuthMode::Token => Auth::Token(self.oauth_token.clone()),
            AuthMode::Jwt => Auth::Jwt(self.jwt.clone()),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HarnessConfig {
    #[serde(default)]
    pub mode: Mode,
    /// Directory holding one transcript per test.
    pub data_dir: PathBuf,
    #[serde(default)]
    pub auth_mode: AuthMode,
    /// Real credentials, required in record mode only.
    #[serde(default)]
    pub credentials: Option<Credentials>,
    /// Transport wrapped by the recorder; the real network when unset.
    #[serde(skip)]
    pub record_connectors: Option<Connectors>,
}

impl HarnessConfig {
    pub fn replay(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            mode: Mode::Replay,
            data_dir: data_dir.into(),
            auth_mode: AuthMode::default(),
            credentials: None,
            record_connectors: None,
        }
    }

    pub fn record(data_dir: impl Into<PathBuf>, credentials: Credentials) -> Self {
        Self {
            mode: Mode::Record,
            credentials: Some(credentials),
            ..Self::replay(data_dir)
        }
    }

    pub fn with_auth_mode(mut self, auth_mode: AuthMode) -> Self {
        self.auth_mode = auth_mode;
        self
    }

    pub fn with_record_connectors(mut self, connectors: Connectors) -> Self {
        self.record_connectors = Some(connectors);
        self
    }

    /// Load a JSON config file. A relative `data_dir` is resolved against
    /// the file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let mut config: Self = serde_json::from_str(&raw)
            .map_err(|e| ReplayError::Config(format!("{}: {e}", path.display())))?;
        if config.data_dir.is_relative() {
            if let Some(parent) = path.parent() {
                config.data_dir = parent.join(&config.data_dir);
            }
        }
        Ok(config)
    }
}
