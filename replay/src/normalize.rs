//! Request normalization shared by recording and replay.
//!
//! Everything here is pure: the same rules redact headers before they are
//! written and before live requests are compared against the transcript, so
//! a recorded value and a replayed one only ever meet in normalized form.

use std::collections::BTreeMap;

use users_client::{Headers, RequestBody};

use crate::error::ReplayError;

/// Basic credentials `fake_login:fake_password`. Left intact so transcripts
/// still pin the exact header the client produces.
pub const CANARY_AUTHORIZATION_SUFFIX: &str = "ZmFrZV9sb2dpbjpmYWtlX3Bhc3N3b3Jk";

pub const TOKEN_PLACEHOLDER: &str = "token private_token_removed";
pub const BASIC_PLACEHOLDER: &str = "Basic login_and_password_removed";
pub const JWT_PLACEHOLDER: &str = "Bearer jwt_removed";

/// Copy of `headers` with the `Authorization` value replaced by a scheme
/// placeholder. Unknown schemes and the canary value pass through unchanged.
pub fn redact_authorization(headers: &Headers) -> Headers {
    let mut redacted = headers.clone();
    let Some(value) = headers.get("Authorization") else {
        return redacted;
    };
    let placeholder = if value.ends_with(CANARY_AUTHORIZATION_SUFFIX) {
        None
    } else if value.starts_with("token ") {
        Some(TOKEN_PLACEHOLDER)
    } else if value.starts_with("Basic ") {
        Some(BASIC_PLACEHOLDER)
    } else if value.starts_with("Bearer ") {
        Some(JWT_PLACEHOLDER)
    } else {
        None
    };
    if let Some(placeholder) = placeholder {
        redacted.insert("Authorization", placeholder);
    }
    redacted
}

/// Header mapping used for comparison: names lower-cased, order dropped.
pub fn normalized_header_map(headers: &Headers) -> BTreeMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), value.to_string()))
        .collect()
}

/// A URL split into its path and its sorted query tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitUrl {
    pub path: String,
    pub query: Option<Vec<String>>,
}

/// Split on `?` and sort the `&`-separated query tokens so parameter order
/// does not matter. More than one `?` is malformed.
pub fn split_url_for_comparison(url: &str) -> Result<SplitUrl, ReplayError> {
    let mut parts = url.split('?');
    let path = parts.next().unwrap_or_default().to_string();
    let query = parts.next().map(|query| {
        let mut tokens: Vec<String> = query.split('&').map(str::to_string).collect();
        tokens.sort();
        tokens
    });
    if parts.next().is_some() {
        return Err(ReplayError::MalformedUrl(url.to_string()));
    }
    Ok(SplitUrl { path, query })
}

/// Remove embedded CR and LF so a value fits on one transcript line.
pub fn flatten_line(text: &str) -> String {
    text.chars().filter(|c| *c != '\n' && *c != '\r').collect()
}

/// Single-line rendering of a request body for the transcript.
pub fn flatten_body(body: Option<&RequestBody>) -> String {
    match body {
        None => String::new(),
        Some(RequestBody::Text(text)) => flatten_line(text),
        Some(RequestBody::Binary(bytes)) => flatten_line(&String::from_utf8_lossy(bytes)),
    }
}

/// Compare an outgoing body against its recorded line.
///
/// Non-text bodies always match. Text starting with `{` is compared as JSON,
/// and a parse failure on either side is an error; anything else is compared
/// literally after flattening.
pub fn bodies_equal(actual: Option<&RequestBody>, expected: &str) -> Result<bool, ReplayError> {
    let Some(text) = actual.and_then(RequestBody::as_text) else {
        return Ok(true);
    };
    let flattened = flatten_line(text);
    if text.starts_with('{') {
        let actual: serde_json::Value =
            serde_json::from_str(&flattened).map_err(|e| ReplayError::InvalidJsonBody {
                side: "actual",
                reason: e.to_string(),
            })?;
        let expected: serde_json::Value =
            serde_json::from_str(expected).map_err(|e| ReplayError::InvalidJsonBody {
                side: "recorded",
                reason: e.to_string(),
            })?;
        return Ok(actual == expected);
    }
    Ok(flattened == expected)
}
