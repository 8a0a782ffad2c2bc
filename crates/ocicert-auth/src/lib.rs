//! Bearer-token authentication for OCI distribution registries.
//!
//! This crate implements the client side of the distribution v2 token-auth
//! handshake:
//!
//! - Challenge discovery: probe `/v2/` and parse the `WWW-Authenticate` header
//! - Token exchange at the challenge's realm with `service` and `scope`
//! - Per-host token cache and `Authorization: Bearer` injection
//!
//! # Quick Start
//!
//! ```no_run
//! use ocicert_auth::{AuthConfig, AuthContext};
//! use reqwest::Method;
//!
//! # async fn example() -> Result<(), ocicert_auth::AuthError> {
//! let mut ctx = AuthContext::new(AuthConfig::default())?;
//! ctx.prepare_auth("registry-1.docker.io").await?;
//!
//! let response = ctx
//!     .send_request_with_token(
//!         "https://registry-1.docker.io/v2/library/busybox/manifests/latest",
//!         Method::GET,
//!         None,
//!     )
//!     .await?;
//! println!("status: {}", response.status);
//! # Ok(())
//! # }
//! ```
//!
//! Tokens are cached for the lifetime of the context. They are never
//! refreshed; a rejected cached token is reported as
//! [`AuthError::TokenRejected`] and the caller rebuilds the context.
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `OCICERT_REGISTRY` | Registry reference (default: `docker.io/busybox:latest`) |
//! | `OCICERT_INSECURE_SKIP_VERIFY` | Disable TLS certificate verification |
//! | `OCICERT_PLAIN_HTTP` | Probe over `http://` |
//! | `OCICERT_CONNECT_TIMEOUT` | Connect timeout in seconds (default: 30) |

pub mod challenge;
pub mod config;
pub mod context;
pub mod error;
pub mod reference;
pub mod types;

pub use challenge::{parse_challenge, parse_scope, AuthScope, Challenge};
pub use config::{AuthConfig, DEFAULT_REGISTRY};
pub use context::{host_key, AuthContext, USER_AGENT_VALUE};
pub use error::{AuthError, AuthResult};
pub use reference::RegistryReference;
pub use types::{TokenResponse, TransportResponse};
