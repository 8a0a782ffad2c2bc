//! Client configuration.

use serde::{Deserialize, Serialize};

use crate::error::AuthResult;
use crate::reference::RegistryReference;

/// Default registry target when nothing else is configured.
pub const DEFAULT_REGISTRY: &str = "docker.io/busybox:latest";

/// Auth context configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Registry reference (`host/repository[:tag]`).
    #[serde(default = "default_registry")]
    pub registry: String,

    /// Skip TLS certificate verification. Dev/test registries only.
    #[serde(default)]
    pub insecure_skip_verify: bool,

    /// Probe registries over `http://` instead of `https://`.
    #[serde(default)]
    pub plain_http: bool,

    /// TCP connect timeout in seconds (includes the TLS handshake).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// TCP keep-alive interval in seconds.
    #[serde(default = "default_keepalive")]
    pub keepalive_secs: u64,
}

fn default_registry() -> String {
    DEFAULT_REGISTRY.to_string()
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_keepalive() -> u64 {
    30
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            registry: default_registry(),
            insecure_skip_verify: false,
            plain_http: false,
            connect_timeout_secs: default_connect_timeout(),
            keepalive_secs: default_keepalive(),
        }
    }
}

impl AuthConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `OCICERT_REGISTRY` | Registry reference |
    /// | `OCICERT_INSECURE_SKIP_VERIFY` | Disable TLS verification (`1`/`true`) |
    /// | `OCICERT_PLAIN_HTTP` | Probe over plain HTTP (`1`/`true`) |
    /// | `OCICERT_CONNECT_TIMEOUT` | Connect timeout in seconds |
    pub fn from_env() -> Self {
        Self {
            registry: std::env::var("OCICERT_REGISTRY")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(default_registry),
            insecure_skip_verify: env_flag("OCICERT_INSECURE_SKIP_VERIFY"),
            plain_http: env_flag("OCICERT_PLAIN_HTTP"),
            connect_timeout_secs: std::env::var("OCICERT_CONNECT_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_connect_timeout),
            keepalive_secs: default_keepalive(),
        }
    }

    /// Set the registry reference.
    pub fn with_registry(mut self, registry: impl Into<String>) -> Self {
        self.registry = registry.into();
        self
    }

    /// Disable TLS certificate verification.
    pub fn with_insecure_skip_verify(mut self, insecure: bool) -> Self {
        self.insecure_skip_verify = insecure;
        self
    }

    /// Probe over plain HTTP.
    pub fn with_plain_http(mut self, plain_http: bool) -> Self {
        self.plain_http = plain_http;
        self
    }

    /// Set the connect timeout.
    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    /// Parsed registry reference.
    pub fn reference(&self) -> AuthResult<RegistryReference> {
        RegistryReference::parse(&self.registry)
    }

    pub(crate) fn scheme(&self) -> &'static str {
        if self.plain_http {
            "http"
        } else {
            "https"
        }
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
