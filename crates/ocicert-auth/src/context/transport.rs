//! Token-injecting request path.
//!
//! Every request to a registry goes through here. The only status this
//! layer interprets is a 401 answering a request that carried a cached token.

use reqwest::header::AUTHORIZATION;
use reqwest::{Method, StatusCode};
use tracing::{debug, warn};
use url::Url;

use crate::error::{AuthError, AuthResult};
use crate::types::TransportResponse;

use super::AuthContext;

/// Token cache key for a URL: the host, plus the port when one is explicit.
pub fn host_key(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

impl AuthContext {
    /// Send a request, attaching the cached bearer token for the URL's host.
    ///
    /// The response body is always read to the end before returning. A 401 on
    /// a request that carried a cached token is an error; the cache entry is
    /// left in place. Any other status is returned for the caller to inspect.
    ///
    /// `body`, when given, is sent as the request body.
    pub async fn send_request_with_token(
        &self,
        url: &str,
        method: Method,
        body: Option<Vec<u8>>,
    ) -> AuthResult<TransportResponse> {
        let parsed = Url::parse(url).map_err(|e| AuthError::transport(url, e))?;
        let host = host_key(&parsed).ok_or_else(|| AuthError::transport(url, "URL has no host"))?;

        let mut request = self.client.request(method.clone(), parsed.clone());

        let bearer_sent = match self.token_cache.get(&host) {
            Some(token) => {
                request = request.header(AUTHORIZATION, format!("Bearer {}", token));
                true
            }
            None => false,
        };

        if let Some(body) = body {
            request = request.body(body);
        }

        debug!(%method, url = %parsed, bearer = bearer_sent, "sending registry request");

        let response = request
            .send()
            .await
            .map_err(|e| AuthError::transport(url, e))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| AuthError::transport(url, format!("failed to read response body: {}", e)))?
            .to_vec();

        if bearer_sent && status == StatusCode::UNAUTHORIZED {
            warn!(host = %host, url = %parsed, "registry rejected cached token");
            return Err(AuthError::TokenRejected { host });
        }

        Ok(TransportResponse {
            url: parsed,
            host,
            bearer_sent,
            status,
            headers,
            body,
        })
    }
}
