//! Authorization header rendering.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// How the client authenticates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Auth {
    #[default]
    None,
    /// HTTP Basic with a login and password.
    Basic { login: String, password: String },
    /// OAuth token, sent as `token <value>`.
    Token(String),
    /// JSON web token, sent as `Bearer <value>`.
    Jwt(String),
}

impl Auth {
    pub fn basic(login: impl Into<String>, password: impl Into<String>) -> Self {
        Auth::Basic {
            login: login.into(),
            password: password.into(),
        }
    }

    /// Value of the `Authorization` header, if any.
    pub fn header_value(&self) -> Option<String> {
        match self {
            Auth::None => None,
            Auth::Basic { login, password } => Some(format!(
                "Basic {}",
                STANDARD.encode(format!("{login}:{password}"))
            )),
            Auth::Token(token) => Some(format!("token {token}")),
            Auth::Jwt(jwt) => Some(format!("Bearer {jwt}")),
        }
    }
}
