//! CLI integration tests
//!
//! Runs the `veteran-client` binary end to end.

mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::helpers::credential;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_version_flag() {
    let mut cmd = cargo_bin_cmd!("veteran-client");
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_flag() {
    let mut cmd = cargo_bin_cmd!("veteran-client");
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("sanitize"))
        .stdout(predicate::str::contains("inspect-token"))
        .stdout(predicate::str::contains("request"));
}

#[test]
fn test_validate_prints_trimmed_input() {
    let mut cmd = cargo_bin_cmd!("veteran-client");
    cmd.args(["validate", "  こんにちは  "]);

    cmd.assert().success().stdout("こんにちは\n");
}

#[test]
fn test_validate_rejects_script() {
    let mut cmd = cargo_bin_cmd!("veteran-client");
    cmd.args(["validate", "<script>alert(1)</script>"]);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("不正な内容が含まれています"));
}

#[test]
fn test_validate_allow_html_skips_signatures() {
    let mut cmd = cargo_bin_cmd!("veteran-client");
    cmd.args(["validate", "--allow-html", "<b onclick=x>"]);

    cmd.assert().success().stdout("<b onclick=x>\n");
}

#[test]
fn test_validate_length_limit() {
    let mut cmd = cargo_bin_cmd!("veteran-client");
    cmd.args(["validate", "--max-length", "3", "あいうえ"]);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("入力は3文字以内にしてください"));
}

#[test]
fn test_sanitize_escapes_markup() {
    let mut cmd = cargo_bin_cmd!("veteran-client");
    cmd.args(["sanitize", r#"<a href="x">Tom & 'Jerry'</a>"#]);

    cmd.assert().success().stdout(
        "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;\n",
    );
}

#[test]
fn test_inspect_token_live() {
    let mut cmd = cargo_bin_cmd!("veteran-client");
    cmd.args(["inspect-token", credential(3600).as_str()]);

    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["live"], true);
    assert_eq!(report["subject"], "veteran-42");
    assert!(report["secondsRemaining"].as_i64().unwrap() > 3500);
}

#[test]
fn test_inspect_token_rejects_opaque_string() {
    let mut cmd = cargo_bin_cmd!("veteran-client");
    cmd.args(["inspect-token", "validtoken"]);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Not a structurally valid credential"));
}

#[test]
fn test_invalid_config_file_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("client.toml");
    fs::write(&config, "[api]\ntimeout_ms = 0\n").unwrap();

    let mut cmd = cargo_bin_cmd!("veteran-client");
    cmd.env_remove("VETERAN_API_TIMEOUT_MS")
        .args(["--config", config.to_str().unwrap(), "sanitize", "x"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Request timeout must be positive"));
}

#[tokio::test]
async fn test_request_prints_response_json() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let token = credential(3600);

    Mock::given(method("GET"))
        .and(path("/api/conversations"))
        .and(header("authorization", format!("Bearer {}", token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"total": 3})))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = cargo_bin_cmd!("veteran-client");
    cmd.env("VETERAN_API_BASE_URL", server.uri())
        .env("VETERAN_STORAGE_DIR", dir.path())
        .args(["request", "get", "/conversations", "--token", token.as_str()]);

    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["total"], 3);
}

#[tokio::test]
async fn test_request_failure_exits_nonzero() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let mut cmd = cargo_bin_cmd!("veteran-client");
    cmd.env("VETERAN_API_BASE_URL", server.uri())
        .env("VETERAN_STORAGE_DIR", dir.path())
        .args(["request", "GET", "/me"]);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("ログインが必要です"));
}
