//! CLI command: ocicert get
//!
//! Authenticates against the URL's host, then sends a single request with
//! the obtained bearer token.
//!
//! Usage:
//!   ocicert get URL [-X METHOD] [-d BODY] [--show-body]
//!
//! Examples:
//!   ocicert get https://registry-1.docker.io/v2/library/busybox/tags/list --show-body
//!   ocicert get -X HEAD https://registry-1.docker.io/v2/library/busybox/manifests/latest

use anyhow::{anyhow, Context};
use ocicert_auth::{host_key, AuthConfig, AuthContext};
use reqwest::Method;
use url::Url;

use crate::cli::args::{ConnectionArgs, GetArgs};
use crate::exit_codes::{PROTOCOL_ERROR, SUCCESS};

/// The URL's scheme decides `plain_http`, overriding flag and environment.
pub fn config_for_url(conn: &ConnectionArgs, url: &Url) -> AuthConfig {
    conn.to_config().with_plain_http(url.scheme() == "http")
}

pub async fn run(conn: &ConnectionArgs, args: GetArgs) -> anyhow::Result<i32> {
    let url = Url::parse(&args.url).with_context(|| format!("invalid URL: {}", args.url))?;
    let host = host_key(&url).ok_or_else(|| anyhow!("URL has no host: {}", args.url))?;
    let method = Method::from_bytes(args.method.to_ascii_uppercase().as_bytes())
        .with_context(|| format!("invalid HTTP method: {}", args.method))?;

    let mut ctx = AuthContext::new(config_for_url(conn, &url))?;
    ctx.prepare_auth(&host)
        .await
        .with_context(|| format!("authenticating against {}", host))?;

    let body = args.data.map(String::into_bytes);
    let response = ctx
        .send_request_with_token(url.as_str(), method, body)
        .await
        .with_context(|| format!("requesting {}", url))?;

    println!("{}", response.status);
    if args.show_body {
        println!("{}", response.text());
    }

    if response.status.is_success() {
        Ok(SUCCESS)
    } else {
        Ok(PROTOCOL_ERROR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::Cli;
    use clap::Parser;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_https_url_ignores_plain_http_env() {
        std::env::set_var("OCICERT_PLAIN_HTTP", "1");

        let cli = Cli::parse_from(["ocicert", "get", "https://registry.test/v2/"]);
        let https = Url::parse("https://registry.test/v2/").expect("url");
        let http = Url::parse("http://registry.test/v2/").expect("url");
        let https_config = config_for_url(&cli.conn, &https);
        let http_config = config_for_url(&cli.conn, &http);
        std::env::remove_var("OCICERT_PLAIN_HTTP");

        assert!(!https_config.plain_http);
        assert!(http_config.plain_http);
    }

    #[test]
    #[serial]
    fn test_https_url_ignores_plain_http_flag() {
        let cli = Cli::parse_from(["ocicert", "--plain-http", "get", "https://registry.test/v2/"]);
        let url = Url::parse("https://registry.test/v2/").expect("url");

        assert!(cli.conn.to_config().plain_http);
        assert!(!config_for_url(&cli.conn, &url).plain_http);
    }
}
