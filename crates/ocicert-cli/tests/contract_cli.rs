#![allow(deprecated)]
//! End-to-end tests for the `ocicert` binary against a wiremock registry.

use assert_cmd::Command;
use predicates::prelude::*;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn no_authorization(req: &Request) -> bool {
    !req.headers.contains_key("authorization")
}

async fn mock_registry() -> MockServer {
    let server = MockServer::start().await;
    let challenge = format!(
        r#"Bearer realm="{}/token",service="registry.test",scope="repository:library/busybox:pull""#,
        server.uri()
    );

    Mock::given(method("GET"))
        .and(path("/v2/"))
        .and(no_authorization)
        .respond_with(ResponseTemplate::new(401).insert_header("www-authenticate", challenge.as_str()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "token": "abc" })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(header("authorization", "Bearer abc"))
        .and(path("/v2/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    server
}

fn ocicert() -> Command {
    let mut cmd = Command::cargo_bin("ocicert").expect("ocicert binary");
    for var in [
        "OCICERT_REGISTRY",
        "OCICERT_INSECURE_SKIP_VERIFY",
        "OCICERT_PLAIN_HTTP",
        "OCICERT_CONNECT_TIMEOUT",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[tokio::test(flavor = "multi_thread")]
async fn probe_prints_discovered_challenge() {
    let server = mock_registry().await;
    let host = server.address().to_string();

    tokio::task::spawn_blocking(move || {
        ocicert()
            .args(["--plain-http", "probe", host.as_str()])
            .assert()
            .success()
            .stdout(predicate::str::contains("service:   registry.test"))
            .stdout(predicate::str::contains(
                "scope:     repository:library/busybox:pull",
            ))
            .stdout(predicate::str::contains(format!("token for: {}", host)));
    })
    .await
    .expect("probe command panicked");
}

#[tokio::test(flavor = "multi_thread")]
async fn probe_uses_registry_from_env() {
    let server = mock_registry().await;
    let registry = format!("{}/library/busybox:latest", server.address());

    tokio::task::spawn_blocking(move || {
        ocicert()
            .env("OCICERT_REGISTRY", registry)
            .env("OCICERT_PLAIN_HTTP", "1")
            .arg("probe")
            .assert()
            .success()
            .stdout(predicate::str::contains("realm:"));
    })
    .await
    .expect("probe command panicked");
}

#[tokio::test(flavor = "multi_thread")]
async fn probe_without_challenge_exits_with_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let host = server.address().to_string();

    tokio::task::spawn_blocking(move || {
        ocicert()
            .args(["--plain-http", "probe", host.as_str()])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("without bearer challenge"));
    })
    .await
    .expect("probe command panicked");
}

#[tokio::test(flavor = "multi_thread")]
async fn get_sends_bearer_token() {
    let server = mock_registry().await;

    Mock::given(method("GET"))
        .and(path("/v2/library/busybox/tags/list"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"tags":["latest"]}"#))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/v2/library/busybox/tags/list", server.uri());

    tokio::task::spawn_blocking(move || {
        ocicert()
            .args(["get", url.as_str(), "--show-body"])
            .assert()
            .success()
            .stdout(predicate::str::contains("200 OK"))
            .stdout(predicate::str::contains(r#"{"tags":["latest"]}"#));
    })
    .await
    .expect("get command panicked");
}

#[test]
fn get_rejects_invalid_url() {
    ocicert()
        .args(["get", "not a url"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid URL"));
}

#[test]
fn version_prints_package_version() {
    ocicert()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
