//! Auth context: challenge discovery, token exchange and per-host token cache.
//!
//! Status handling for outgoing registry traffic lives in transport.rs; the
//! token server exchange lives in token.rs.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT, WWW_AUTHENTICATE};
use reqwest::{Method, StatusCode};
use tracing::{debug, warn};

use crate::challenge::{parse_challenge, AuthScope};
use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};

mod token;
mod transport;

pub use transport::host_key;

/// User agent sent on every request.
pub const USER_AGENT_VALUE: &str = concat!("ocicert-auth/", env!("CARGO_PKG_VERSION"));

/// Per-session registry auth state.
///
/// Construct once per registry session, call [`prepare_auth`] for each
/// registry host, then send any number of requests through
/// [`send_request_with_token`]. Cached tokens live as long as the context and
/// are never refreshed or evicted.
///
/// Mutation goes through `&mut self`; share a context across tasks behind a
/// mutex.
///
/// [`prepare_auth`]: AuthContext::prepare_auth
/// [`send_request_with_token`]: AuthContext::send_request_with_token
#[derive(Debug, Clone)]
pub struct AuthContext {
    client: reqwest::Client,
    config: AuthConfig,
    request_host: String,
    token_cache: HashMap<String, String>,
    realm: String,
    service: String,
    scope: AuthScope,
}

impl AuthContext {
    pub fn new(config: AuthConfig) -> AuthResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        if config.insecure_skip_verify {
            warn!("TLS certificate verification is disabled");
        }

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .tcp_keepalive(Duration::from_secs(config.keepalive_secs))
            .danger_accept_invalid_certs(config.insecure_skip_verify)
            .default_headers(default_headers)
            .build()
            .map_err(|e| AuthError::Config {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self::with_client(config, client))
    }

    /// Use a caller-built HTTP client. TLS and timeout fields of `config` are
    /// ignored; only `registry` and `plain_http` apply.
    pub fn with_client(config: AuthConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            config,
            request_host: String::new(),
            token_cache: HashMap::new(),
            realm: String::new(),
            service: String::new(),
            scope: AuthScope::wildcard(),
        }
    }

    pub fn from_env() -> AuthResult<Self> {
        Self::new(AuthConfig::from_env())
    }

    /// Discover the registry's bearer challenge and obtain a token for it.
    ///
    /// Probes `https://<registry_host>/v2/`, which must answer `401` with a
    /// `WWW-Authenticate` bearer challenge. The token is cached under the
    /// probe's host and confirmed by repeating the probe with it.
    pub async fn prepare_auth(&mut self, registry_host: &str) -> AuthResult<()> {
        let probe_url = format!("{}://{}/v2/", self.config.scheme(), registry_host);
        debug!(url = %probe_url, "probing registry for auth challenge");

        let probe = self
            .send_request_with_token(&probe_url, Method::GET, None)
            .await?;

        self.request_host = probe.host.clone();

        let www_auth = probe.header(WWW_AUTHENTICATE.as_str()).unwrap_or_default();
        if probe.status != StatusCode::UNAUTHORIZED || www_auth.is_empty() {
            return Err(AuthError::UnexpectedChallenge {
                status: probe.status.as_u16(),
                url: probe_url,
            });
        }

        let challenge = parse_challenge(www_auth);
        self.realm = challenge.realm;
        self.service = challenge.service;
        if let Some(scope) = challenge.scope {
            self.scope = scope;
        }

        if self.realm.is_empty() {
            return Err(AuthError::MissingRealm);
        }

        if self.service.is_empty() {
            return Err(AuthError::MissingService);
        }

        debug!(
            realm = %self.realm,
            service = %self.service,
            scope = %self.scope,
            "parsed bearer challenge"
        );

        self.get_auth_token(&probe_url).await
    }

    /// [`prepare_auth`](Self::prepare_auth) against the host of the configured
    /// registry reference.
    pub async fn prepare_registry_auth(&mut self) -> AuthResult<()> {
        let reference = self.config.reference()?;
        self.prepare_auth(&reference.host).await
    }

    /// Configured registry reference.
    pub fn registry_url(&self) -> &str {
        &self.config.registry
    }

    /// Host of the most recent probe.
    pub fn request_host(&self) -> &str {
        &self.request_host
    }

    pub fn realm(&self) -> &str {
        &self.realm
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn scope(&self) -> &AuthScope {
        &self.scope
    }

    /// Cached token for a host, if one was obtained.
    pub fn token_for(&self, host: &str) -> Option<&str> {
        self.token_cache.get(host).map(String::as_str)
    }

    /// Number of hosts with a cached token.
    pub fn cached_hosts(&self) -> usize {
        self.token_cache.len()
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_context_is_empty() {
        let ctx = AuthContext::new(AuthConfig::default()).unwrap();
        assert_eq!(ctx.registry_url(), "docker.io/busybox:latest");
        assert!(ctx.realm().is_empty());
        assert!(ctx.service().is_empty());
        assert!(ctx.request_host().is_empty());
        assert_eq!(ctx.scope(), &AuthScope::wildcard());
        assert_eq!(ctx.cached_hosts(), 0);
    }

    #[test]
    fn test_insecure_client_builds() {
        let config = AuthConfig::default().with_insecure_skip_verify(true);
        let ctx = AuthContext::new(config).unwrap();
        assert!(ctx.config().insecure_skip_verify);
    }

    #[test]
    fn test_user_agent_value() {
        assert!(USER_AGENT_VALUE.starts_with("ocicert-auth/"));
    }
}
