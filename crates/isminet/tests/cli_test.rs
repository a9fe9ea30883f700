//! Integration tests for the `isminet` binary.
//!
//! Every command runs with an isolated HOME and working directory so the
//! user's real settings and `.env` are never read.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

const SCRUBBED_VARS: [&str; 14] = [
    "UNIFI_API_KEY",
    "UNIFI_HOST",
    "UNIFI_PORT",
    "UNIFI_VERIFY_SSL",
    "UNIFI_TIMEOUT",
    "UNIFI_SITE",
    "UNIFI_API_VERSION",
    "UNIFI_PLATFORM",
    "UNIFI_SCHEME",
    "UNIFI_AUTH_HEADER",
    "UNIFI_MAX_RETRIES",
    "UNIFI_RETRY_BASE_DELAY_MS",
    "UNIFI_CA_CERT",
    "RUST_LOG",
];

/// Build a command for the `isminet` binary inside `home`.
fn isminet_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("isminet");
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("ISMINET_LOG_LEVEL", "warn")
        .env_remove("ISMINET_DEV_MODE")
        .env_remove("ISMINET_LOG_TO_FILE")
        .env_remove("ISMINET_LOG_DIR");
    for var in SCRUBBED_VARS {
        cmd.env_remove(var);
    }
    cmd
}

/// Point the binary at a mock controller speaking plain HTTP.
fn against(cmd: &mut assert_cmd::Command, server: &MockServer) {
    cmd.env("UNIFI_HOST", "127.0.0.1")
        .env("UNIFI_PORT", server.address().port().to_string())
        .env("UNIFI_SCHEME", "http")
        .env("UNIFI_PLATFORM", "classic")
        .env("UNIFI_API_KEY", "test-key")
        .env("UNIFI_MAX_RETRIES", "0")
        .env("UNIFI_TIMEOUT", "5");
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"meta": {"rc": "ok"}, "data": data}))
}

fn device() -> Value {
    json!({
        "_id": "abc123",
        "mac": "AA:BB:CC:DD:EE:01",
        "type": "usw",
        "name": "core-switch",
        "model": "US24",
        "version": "6.5.59",
        "adopted": true
    })
}

/// Run the command off the async runtime so the mock server keeps serving.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = TempDir::new().unwrap();
    let output = isminet_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    isminet_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("devices")
            .and(predicate::str::contains("clients"))
            .and(predicate::str::contains("networks"))
            .and(predicate::str::contains("fetch")),
    );
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    isminet_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("isminet"));
}

#[test]
fn test_unknown_output_format_is_usage_error() {
    let home = TempDir::new().unwrap();
    isminet_cmd(home.path())
        .args(["--output", "xml", "sites"])
        .assert()
        .code(2);
}

#[test]
fn test_update_needs_a_payload() {
    let home = TempDir::new().unwrap();
    isminet_cmd(home.path())
        .args(["devices", "update", "aa:bb:cc:dd:ee:01"])
        .assert()
        .code(2);
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let home = TempDir::new().unwrap();
    isminet_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("isminet"));
}

#[test]
fn test_completions_invalid_shell() {
    let home = TempDir::new().unwrap();
    isminet_cmd(home.path())
        .args(["completions", "tcsh"])
        .assert()
        .failure();
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_honors_flag() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("custom.toml");
    isminet_cmd(home.path())
        .args(["config", "path", "--config"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.toml"));
}

#[test]
fn test_config_path_default() {
    let home = TempDir::new().unwrap();
    isminet_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_reads_env_file() {
    let home = TempDir::new().unwrap();
    let env_file = home.path().join("controller.env");
    std::fs::write(
        &env_file,
        "UNIFI_HOST=unifi.example\nUNIFI_API_KEY=super-secret\nUNIFI_SITE=branch\n",
    )
    .unwrap();

    isminet_cmd(home.path())
        .args(["config", "show", "--env-file"])
        .arg(&env_file)
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#"host = "unifi.example""#)
                .and(predicate::str::contains(r#"site = "branch""#))
                .and(predicate::str::contains("super-secret").not()),
        );
}

#[test]
fn test_config_show_reads_toml_file() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("settings.toml");
    std::fs::write(&file, "host = \"10.0.0.1\"\ntimeout = 30\n").unwrap();

    let output = isminet_cmd(home.path())
        .env("UNIFI_API_KEY", "k")
        .args(["config", "show", "-o", "json", "--config"])
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    let shown: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(shown["host"], "10.0.0.1");
    assert_eq!(shown["timeout"], 30);
    assert!(shown.get("api_key").is_none());
}

#[test]
fn test_missing_explicit_env_file_fails() {
    let home = TempDir::new().unwrap();
    isminet_cmd(home.path())
        .args(["config", "show", "--env-file", "nope.env"])
        .assert()
        .failure();
}

#[test]
fn test_missing_host_is_validation_error() {
    let home = TempDir::new().unwrap();
    isminet_cmd(home.path())
        .env("UNIFI_API_KEY", "k")
        .arg("sites")
        .assert()
        .code(9)
        .stderr(predicate::str::contains("host"));
}

#[test]
fn test_bad_site_flag_is_validation_error() {
    let home = TempDir::new().unwrap();
    isminet_cmd(home.path())
        .env("UNIFI_HOST", "unifi.example")
        .env("UNIFI_API_KEY", "k")
        .args(["--site", "not a site", "devices", "list"])
        .assert()
        .code(9)
        .stderr(predicate::str::contains("site"));
}

#[test]
fn test_host_with_scheme_is_rejected() {
    let home = TempDir::new().unwrap();
    isminet_cmd(home.path())
        .env("UNIFI_HOST", "https://unifi.example")
        .env("UNIFI_API_KEY", "k")
        .args(["config", "show"])
        .assert()
        .code(9);
}

// ── Against a mock controller ───────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_devices_list_json() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/s/default/stat/device"))
        .and(header("x-api-key", "test-key"))
        .respond_with(ok(json!([device()])))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = isminet_cmd(home.path());
    against(&mut cmd, &server);
    cmd.args(["devices", "list", "--output", "json"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let devices: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(devices[0]["mac"], "aa:bb:cc:dd:ee:01");
    assert_eq!(devices[0]["name"], "core-switch");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_devices_list_table() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/s/default/stat/device"))
        .respond_with(ok(json!([device()])))
        .mount(&server)
        .await;

    let mut cmd = isminet_cmd(home.path());
    against(&mut cmd, &server);
    cmd.args(["devices", "list"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("core-switch"));
    assert!(stdout.contains("US24"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_site_flag_changes_path() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/s/branch/stat/sta"))
        .respond_with(ok(json!([{
            "mac": "11:22:33:44:55:66",
            "hostname": "laptop",
            "is_wired": true,
            "first_seen": 1_700_000_000
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = isminet_cmd(home.path());
    against(&mut cmd, &server);
    cmd.args(["--site", "branch", "clients", "list", "-o", "plain"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "11:22:33:44:55:66");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_restart_device() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/s/default/cmd/devmgr"))
        .and(body_json(json!({"cmd": "restart", "mac": "aa:bb:cc:dd:ee:01"})))
        .respond_with(ok(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = isminet_cmd(home.path());
    against(&mut cmd, &server);
    cmd.args(["devices", "restart", "AA:BB:CC:DD:EE:01"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Restart requested"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unauthorized_exits_with_auth_code() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/self/sites"))
        .respond_with(ResponseTemplate::new(401).set_body_string("api.err.Invalid"))
        .mount(&server)
        .await;

    let mut cmd = isminet_cmd(home.path());
    against(&mut cmd, &server);
    cmd.arg("sites");
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("api.err.Invalid"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_device_exits_with_not_found_code() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/s/default/stat/device/aa:bb:cc:dd:ee:02"))
        .respond_with(ok(json!([])))
        .mount(&server)
        .await;

    let mut cmd = isminet_cmd(home.path());
    against(&mut cmd, &server);
    cmd.args(["devices", "get", "aa:bb:cc:dd:ee:02"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(4));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_response_exits_with_validation_code() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    let mut bad = device();
    bad["mac"] = json!("not-a-mac");
    Mock::given(method("GET"))
        .and(path("/api/s/default/stat/device"))
        .respond_with(ok(json!([device(), bad])))
        .mount(&server)
        .await;

    let mut cmd = isminet_cmd(home.path());
    against(&mut cmd, &server);
    cmd.args(["devices", "list"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(9));
    assert!(String::from_utf8_lossy(&output.stderr).contains("data[1].mac"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_writes_response_files() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/self/sites"))
        .respond_with(ok(json!([{"_id": "1", "name": "default", "desc": "Default"}])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/s/default/stat/device"))
        .respond_with(ok(json!([device()])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/s/default/stat/sta"))
        .respond_with(ok(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/s/default/self"))
        .respond_with(ok(json!([{"version": "8.0.26"}])))
        .mount(&server)
        .await;

    let out = home.path().join("responses");
    let mut cmd = isminet_cmd(home.path());
    against(&mut cmd, &server);
    cmd.arg("fetch").arg("--out").arg(&out);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    for name in ["sites.json", "devices.json", "clients.json", "version.json"] {
        let text = std::fs::read_to_string(out.join(name)).unwrap();
        let body: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(body["meta"]["rc"], "ok", "{name}");
    }
    let devices: Value =
        serde_json::from_str(&std::fs::read_to_string(out.join("devices.json")).unwrap()).unwrap();
    // Raw bodies keep the controller's spelling.
    assert_eq!(devices["data"][0]["mac"], "AA:BB:CC:DD:EE:01");
}
