//! Token server exchange.
//!
//! Equivalent to:
//!
//! ```text
//! curl "https://auth.docker.io/token?service=registry.docker.io&scope=repository:library/busybox:pull"
//! ```

use reqwest::{Method, StatusCode};
use tracing::{debug, info};
use url::Url;

use crate::error::{AuthError, AuthResult};
use crate::types::TokenResponse;

use super::AuthContext;

impl AuthContext {
    /// Exchange the parsed challenge for a token, cache it under the probed
    /// host, and confirm it with a request to `confirm_url`.
    pub(super) async fn get_auth_token(&mut self, confirm_url: &str) -> AuthResult<()> {
        let token_url = self.token_url()?;
        debug!(url = %token_url, "requesting registry token");

        // No token exists yet, so this bypasses the injecting path.
        let response = self
            .client
            .get(token_url.clone())
            .send()
            .await
            .map_err(|e| AuthError::transport(token_url.as_str(), e))?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::UNAUTHORIZED => {
                return Err(AuthError::Unauthorized {
                    message: "401 unauthorized".to_string(),
                });
            }
            status => {
                return Err(AuthError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: token_url.to_string(),
                });
            }
        }

        let body = response.bytes().await.map_err(|e| {
            AuthError::transport(
                token_url.as_str(),
                format!("failed to read token from body: {}", e),
            )
        })?;

        let token_response = TokenResponse::from_slice(&body)?;
        let expires_in = token_response.expires_in;
        let issued_at = token_response.issued_at.clone();
        let token = token_response.into_token()?;

        info!(
            host = %self.request_host,
            service = %self.service,
            expires_in = ?expires_in,
            issued_at = ?issued_at,
            "obtained registry token"
        );

        self.token_cache.insert(self.request_host.clone(), token);

        self.send_request_with_token(confirm_url, Method::GET, None)
            .await?;

        Ok(())
    }

    /// Realm URL with `service` and, when actions are set, `scope` appended.
    fn token_url(&self) -> AuthResult<Url> {
        let mut url = Url::parse(&self.realm).map_err(|e| AuthError::transport(&self.realm, e))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("service", &self.service);
            if self.scope.has_actions() {
                query.append_pair("scope", &self.scope.to_query_value());
            }
        }

        Ok(url)
    }
}
