//! Wire types for the token protocol.

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use crate::error::{AuthError, AuthResult};

/// Body of a successful token server reply.
///
/// Registries send `token`, `access_token`, or both (Docker Hub sends both
/// with the same value). `token` wins when both are present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default)]
    pub access_token: Option<String>,

    /// Lifetime in seconds. Logged only; cached tokens never expire.
    #[serde(default)]
    pub expires_in: Option<u64>,

    #[serde(default)]
    pub issued_at: Option<String>,
}

impl TokenResponse {
    /// Decode a token server body.
    pub fn from_slice(body: &[u8]) -> AuthResult<Self> {
        serde_json::from_slice(body).map_err(|e| AuthError::InvalidTokenResponse {
            message: e.to_string(),
        })
    }

    /// The bearer token to cache.
    pub fn into_token(self) -> AuthResult<String> {
        self.token
            .filter(|t| !t.is_empty())
            .or_else(|| self.access_token.filter(|t| !t.is_empty()))
            .ok_or_else(|| AuthError::InvalidTokenResponse {
                message: "response has no token field".to_string(),
            })
    }
}

/// Outcome of a request sent through the token-injecting path.
///
/// The body has already been read in full; the connection is released by the
/// time this is returned.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// URL the request was sent to.
    pub url: Url,

    /// Cache key of the request (host, plus port when explicit).
    pub host: String,

    /// Whether an `Authorization: Bearer` header was attached.
    pub bearer_sent: bool,

    pub status: StatusCode,

    pub headers: HeaderMap,

    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Header value as a string, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Body decoded as UTF-8, lossily.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
