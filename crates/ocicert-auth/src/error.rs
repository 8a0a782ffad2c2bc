//! Error types for the registry auth client.

/// Registry authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Request construction or network/TLS failure.
    #[error("failed to send request to {url}: {message}")]
    Transport { url: String, message: String },

    /// Probe did not answer with a 401 bearer challenge.
    #[error("received invalid result from {url}: HTTP {status} without bearer challenge")]
    UnexpectedChallenge { status: u16, url: String },

    /// Challenge had no realm.
    #[error("missing realm in bearer with challenge")]
    MissingRealm,

    /// Challenge had no service.
    #[error("missing service in bearer with challenge")]
    MissingService,

    /// Token server answered with a status other than 200 or 401.
    #[error("statusCode = {status}, request URL = {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// Token exchange itself was rejected.
    #[error("unable to retrieve auth token: {message}")]
    Unauthorized { message: String },

    /// A cached bearer token was rejected on use.
    #[error("cached token for {host} was rejected: 401 unauthorized")]
    TokenRejected { host: String },

    /// Token response body could not be decoded.
    #[error("failed to unmarshal json for token: {message}")]
    InvalidTokenResponse { message: String },

    /// Invalid registry reference.
    #[error("invalid registry reference: {reference} - {reason}")]
    InvalidReference { reference: String, reason: String },

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl AuthError {
    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => 1,
            Self::InvalidReference { .. } => 1,

            // Auth issues
            Self::Unauthorized { .. } => 2,
            Self::TokenRejected { .. } => 2,

            // Registry or token server misbehaved
            Self::UnexpectedChallenge { .. } => 3,
            Self::MissingRealm => 3,
            Self::MissingService => 3,
            Self::UnexpectedStatus { .. } => 3,
            Self::InvalidTokenResponse { .. } => 3,

            Self::Transport { .. } => 5,
        }
    }

    /// Whether the error means credentials were refused, as opposed to a
    /// malformed exchange or a network failure.
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::Unauthorized { .. } | Self::TokenRejected { .. })
    }

    pub(crate) fn transport(url: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Transport {
            url: url.into(),
            message: err.to_string(),
        }
    }
}

/// Result type for registry auth operations.
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_errors_are_distinguished() {
        let exchange = AuthError::Unauthorized {
            message: "401 unauthorized".into(),
        };
        let rejected = AuthError::TokenRejected {
            host: "registry.test".into(),
        };

        assert!(exchange.is_authorization());
        assert!(rejected.is_authorization());
        assert!(!AuthError::MissingRealm.is_authorization());
        assert_eq!(exchange.exit_code(), 2);
        assert_eq!(rejected.exit_code(), 2);
    }

    #[test]
    fn test_missing_fields_have_distinct_messages() {
        assert_ne!(
            AuthError::MissingRealm.to_string(),
            AuthError::MissingService.to_string()
        );
        assert!(AuthError::MissingRealm.to_string().contains("realm"));
        assert!(AuthError::MissingService.to_string().contains("service"));
    }

    #[test]
    fn test_transport_error_carries_url() {
        let err = AuthError::transport("https://registry.test/v2/", "connection refused");
        assert_eq!(
            err.to_string(),
            "failed to send request to https://registry.test/v2/: connection refused"
        );
        assert_eq!(err.exit_code(), 5);
    }
}
