//! Bearer challenge parsing.
//!
//! A registry that requires token auth answers `GET /v2/` with `401` and a
//! header like:
//!
//! ```text
//! WWW-Authenticate: Bearer realm="https://auth.docker.io/token",service="registry.docker.io",scope="repository:library/busybox:pull"
//! ```
//!
//! Only the `bearer realm` marker is matched case-insensitively; `service=`
//! and `scope=` must appear as written. Unknown parameters are skipped.

use std::fmt;

/// Resource and permitted actions a token is scoped to.
///
/// `Default` is the zero-valued scope (both fields empty), which callers
/// treat as "scope absent".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthScope {
    /// Repository name (e.g., "library/busybox").
    pub remote_name: String,

    /// Comma-separated actions (e.g., "pull" or "pull,push").
    pub actions: String,
}

impl AuthScope {
    /// Scope used before any challenge has been seen.
    pub fn wildcard() -> Self {
        Self {
            remote_name: String::new(),
            actions: "*".to_string(),
        }
    }

    /// Parse a `type:name:actions` scope string.
    ///
    /// Fewer than three segments yields the zero-valued scope. Segments past
    /// the third are ignored.
    ///
    /// ```
    /// use ocicert_auth::AuthScope;
    ///
    /// let scope = AuthScope::parse("repository:lib/x:pull");
    /// assert_eq!(scope.remote_name, "lib/x");
    /// assert_eq!(scope.actions, "pull");
    ///
    /// assert_eq!(AuthScope::parse("pull"), AuthScope::default());
    /// ```
    pub fn parse(input: &str) -> Self {
        let mut parts = input.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(_), Some(remote_name), Some(actions)) => Self {
                remote_name: remote_name.to_string(),
                actions: actions.to_string(),
            },
            _ => Self::default(),
        }
    }

    /// Whether the `scope` query parameter should be sent at all.
    pub fn has_actions(&self) -> bool {
        !self.actions.is_empty()
    }

    /// Value of the `scope` query parameter for the token request.
    pub fn to_query_value(&self) -> String {
        format!("repository:{}:{}", self.remote_name, self.actions)
    }
}

impl fmt::Display for AuthScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_value())
    }
}

/// Parse a scope string. See [`AuthScope::parse`].
pub fn parse_scope(input: &str) -> AuthScope {
    AuthScope::parse(input)
}

/// Parameters extracted from a `WWW-Authenticate` bearer challenge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Challenge {
    /// Token server URL. Empty when absent.
    pub realm: String,

    /// Service name to request a token for. Empty when absent.
    pub service: String,

    /// Requested scope, if the challenge carried one.
    pub scope: Option<AuthScope>,
}

/// Parse a `WWW-Authenticate` header value.
///
/// The value is split on `,`; each piece is trimmed and matched against
/// `bearer realm=`, `service=` and `scope=`. Surrounding double quotes are
/// stripped from values. When a parameter repeats, the last one wins.
pub fn parse_challenge(header: &str) -> Challenge {
    let mut challenge = Challenge::default();

    for token in header.split(',') {
        let token = token.trim();

        if let Some(value) = strip_bearer_realm(token) {
            challenge.realm = unquote(value).to_string();
        } else if let Some(value) = token.strip_prefix("service=") {
            challenge.service = unquote(value).to_string();
        } else if let Some(value) = token.strip_prefix("scope=") {
            challenge.scope = Some(AuthScope::parse(unquote(value)));
        }
    }

    challenge
}

/// Match `bearer<ws>realm=` ignoring ASCII case, returning the rest.
fn strip_bearer_realm(token: &str) -> Option<&str> {
    let scheme = token.get(..6)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let rest = &token[6..];
    let trimmed = rest.trim_start();
    if trimmed.len() == rest.len() {
        return None;
    }

    let marker = trimmed.get(..6)?;
    if !marker.eq_ignore_ascii_case("realm=") {
        return None;
    }

    Some(&trimmed[6..])
}

fn unquote(value: &str) -> &str {
    value.trim().trim_matches('"')
}
