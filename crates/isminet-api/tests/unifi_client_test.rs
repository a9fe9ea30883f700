#![allow(clippy::unwrap_used)]
// Integration tests for `UnifiClient` and `ApiClient` using wiremock.

use std::net::TcpListener;
use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use isminet_api::models::{DeviceType, NetworkPurpose};
use isminet_api::{
    ApiClient, AuthHeader, ClientConfig, Error, Platform, RetryPolicy, Scheme, TlsMode,
    UnifiClient,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn config_for(port: u16) -> ClientConfig {
    let mut config = ClientConfig::new("127.0.0.1", SecretString::from("test-key".to_owned()));
    config.port = Some(port);
    config.scheme = Scheme::Http;
    config.platform = Platform::Classic;
    config.tls = TlsMode::System;
    config.timeout = Duration::from_secs(2);
    config.retry = RetryPolicy {
        max_retries: 2,
        base_delay: Duration::from_millis(10),
    };
    config
}

async fn setup() -> (MockServer, UnifiClient) {
    let server = MockServer::start().await;
    let client = UnifiClient::from_config(&config_for(server.address().port()), "default").unwrap();
    (server, client)
}

fn site_path(suffix: &str) -> String {
    format!("/api/s/default/{suffix}")
}

fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"meta": {"rc": "ok"}, "data": data}))
}

fn device() -> Value {
    json!({
        "_id": "abc123",
        "mac": "AA:BB:CC:DD:EE:FF",
        "type": "usw",
        "name": "Switch-24",
        "model": "US24",
        "version": "6.5.59",
        "adopted": true,
        "state": 1
    })
}

// ── Devices ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_devices() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(site_path("stat/device")))
        .and(header("x-api-key", "test-key"))
        .respond_with(ok(json!([device()])))
        .expect(1)
        .mount(&server)
        .await;

    let devices = client.list_devices().await.unwrap();

    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].mac, "aa:bb:cc:dd:ee:ff");
    assert_eq!(devices[0].device_type, DeviceType::Usw);
    assert_eq!(devices[0].display_name(), "Switch-24");
    assert_eq!(devices[0].system.state, Some(1));
}

#[tokio::test]
async fn test_get_device_normalizes_mac_argument() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(site_path("stat/device/aa:bb:cc:dd:ee:ff")))
        .respond_with(ok(json!([device()])))
        .mount(&server)
        .await;

    let device = client.get_device("AA:BB:CC:DD:EE:FF").await.unwrap();
    assert_eq!(device.model.as_deref(), Some("US24"));
}

#[tokio::test]
async fn test_get_device_empty_result_is_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(site_path("stat/device/aa:bb:cc:dd:ee:ff")))
        .respond_with(ok(json!([])))
        .mount(&server)
        .await;

    let result = client.get_device("aa:bb:cc:dd:ee:ff").await;
    assert!(
        matches!(&result, Err(e) if e.is_not_found()),
        "expected NotFound, got: {result:?}"
    );
}

#[tokio::test]
async fn test_invalid_mac_never_reaches_the_network() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ok(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let result = client.get_client("not-a-mac").await;
    assert!(matches!(result, Err(Error::InvalidRequest(_))));
}

#[tokio::test]
async fn test_restart_device_posts_devmgr_command() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(site_path("cmd/devmgr")))
        .and(body_json(json!({"cmd": "restart", "mac": "aa:bb:cc:dd:ee:ff"})))
        .respond_with(ok(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    client.restart_device("AA:BB:CC:DD:EE:FF").await.unwrap();
}

#[tokio::test]
async fn test_list_devices_reports_every_violation() {
    let (server, client) = setup().await;

    let mut broken = device();
    broken["mac"] = json!("zz");
    broken["version"] = json!("6.5");

    Mock::given(method("GET"))
        .and(path(site_path("stat/device")))
        .respond_with(ok(json!([device(), broken])))
        .mount(&server)
        .await;

    let err = client.list_devices().await.unwrap_err();
    let fields: Vec<&str> = err.violations().iter().map(|v| v.field.as_str()).collect();
    assert_eq!(fields, vec!["data[1].mac", "data[1].version"]);
    assert!(err.to_string().starts_with("Device failed validation"));
}

// ── Network configuration ───────────────────────────────────────────

#[tokio::test]
async fn test_vlan_port_conflict_names_the_port() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(site_path("rest/vlanconf/v10")))
        .respond_with(ok(json!({
            "id": 10,
            "name": "iot",
            "enabled": true,
            "subnet": "192.168.10.0/24",
            "tagged_ports": [1, 2],
            "untagged_ports": [2, 3]
        })))
        .mount(&server)
        .await;

    let err = client.get_vlan_config("v10").await.unwrap_err();
    let violation = &err.violations()[0];
    assert_eq!(violation.field, "data");
    assert!(violation.message.contains("[2]"), "{violation}");
}

#[tokio::test]
async fn test_dhcp_server_without_range_fails_validation() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(site_path("rest/dhcpconf/d1")))
        .respond_with(ok(json!([{"mode": "server", "enabled": true, "start": "10.0.0.10"}])))
        .mount(&server)
        .await;

    let err = client.get_dhcp_config("d1").await.unwrap_err();
    assert!(matches!(err, Error::ResponseValidation { model: "DhcpConfiguration", .. }));
    assert_eq!(err.violations()[0].code, "dhcp_range");
}

#[tokio::test]
async fn test_update_network_config_round_trips() {
    let (server, client) = setup().await;

    let network = json!({
        "_id": "n1",
        "name": "LAN",
        "purpose": "corporate",
        "enabled": true,
        "subnet": "192.168.1.0/24",
        "vlan_enabled": false
    });

    Mock::given(method("PUT"))
        .and(path(site_path("rest/networkconf/n1")))
        .and(body_json(&network))
        .respond_with(ok(json!([network])))
        .expect(1)
        .mount(&server)
        .await;

    let config = serde_json::from_value(network.clone()).unwrap();
    let updated = client.update_network_config("n1", &config).await.unwrap();
    assert_eq!(updated.purpose, NetworkPurpose::Corporate);
}

// ── Sites and raw access ────────────────────────────────────────────

#[tokio::test]
async fn test_list_sites_is_controller_level() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/self/sites"))
        .respond_with(ok(json!([
            {"_id": "s1", "name": "default", "desc": "Default", "device_count": 4}
        ])))
        .mount(&server)
        .await;

    let sites = client.list_sites().await.unwrap();
    assert_eq!(sites[0].device_count, 4);
}

#[tokio::test]
async fn test_raw_get_returns_body_untouched() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(site_path("stat/event")))
        .respond_with(ok(json!([{"key": "EVT_X"}])))
        .mount(&server)
        .await;

    let body = client.raw_get("stat/event").await.unwrap();
    assert_eq!(body["data"][0]["key"], "EVT_X");
}

// ── Error mapping ───────────────────────────────────────────────────

#[tokio::test]
async fn test_status_codes_map_to_error_kinds() {
    let cases: [(u16, fn(&Error) -> bool); 6] = [
        (401, |e| matches!(e, Error::Authentication { .. })),
        (403, |e| matches!(e, Error::Permission { .. })),
        (404, |e| matches!(e, Error::NotFound { .. })),
        (429, |e| matches!(e, Error::RateLimited { retry_after_secs: Some(7), .. })),
        (400, |e| matches!(e, Error::InvalidRequestBody { status: 400, .. })),
        (500, |e| matches!(e, Error::Server { status: 500, .. })),
    ];

    for (status, check) in cases {
        let (server, client) = setup().await;
        Mock::given(method("GET"))
            .and(path(site_path("stat/health")))
            .respond_with(
                ResponseTemplate::new(status)
                    .insert_header("Retry-After", "7")
                    .set_body_json(json!({"meta": {"rc": "error", "msg": "api.err.Boom"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let err = client.get_system_health().await.unwrap_err();
        assert!(check(&err), "HTTP {status} mapped to {err:?}");
        assert!(err.to_string().contains("api.err.Boom"), "{err}");
        assert_eq!(err.status(), Some(status));
    }
}

#[tokio::test]
async fn test_non_ok_rc_is_a_controller_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(site_path("stat/sta")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": {"rc": "error", "msg": "api.err.NoSiteContext"},
            "data": []
        })))
        .mount(&server)
        .await;

    let result = client.list_clients().await;
    match result {
        Err(Error::Controller { rc, message }) => {
            assert_eq!(rc, "error");
            assert_eq!(message, "api.err.NoSiteContext");
        }
        other => panic!("expected Controller error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_bearer_auth_header() {
    let server = MockServer::start().await;
    let mut config = config_for(server.address().port());
    config.auth_header = AuthHeader::Bearer;
    let client = UnifiClient::from_config(&config, "default").unwrap();

    Mock::given(method("GET"))
        .and(path(site_path("stat/process")))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ok(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client.list_processes().await.unwrap().is_empty());
}

// ── Lifecycle and retry ─────────────────────────────────────────────

#[tokio::test]
async fn test_closed_client_fails_fast() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ok(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    client.close();
    client.close();

    let result = client.list_devices().await;
    assert!(matches!(result, Err(Error::ClientClosed)), "{result:?}");
    assert!(client.api().is_closed());
}

#[tokio::test]
async fn test_scoped_client_is_closed_afterwards() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/self/sites"))
        .respond_with(ok(json!([])))
        .mount(&server)
        .await;

    let config = config_for(server.address().port());
    let mut kept = None;
    let body = ApiClient::scoped(&config, |api| {
        kept = Some(std::sync::Arc::clone(&api));
        async move { api.get("api/self/sites").await }
    })
    .await
    .unwrap();

    assert_eq!(body["data"], json!([]));
    assert!(kept.unwrap().is_closed());
}

#[tokio::test]
async fn test_timeout_is_retried_then_succeeds() {
    let server = MockServer::start().await;
    let mut config = config_for(server.address().port());
    config.timeout = Duration::from_millis(200);
    let client = UnifiClient::from_config(&config, "default").unwrap();

    Mock::given(method("GET"))
        .and(path(site_path("stat/service")))
        .respond_with(ok(json!([])).set_delay(Duration::from_secs(2)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(site_path("stat/service")))
        .respond_with(ok(json!([{"name": "unifi", "status": "running", "enabled": true}])))
        .mount(&server)
        .await;

    let services = client.list_services().await.unwrap();
    assert_eq!(services.len(), 1);
}

#[tokio::test]
async fn test_prebuilt_client_reports_its_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/self"))
        .respond_with(ok(json!([])).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(1))
        .build()
        .unwrap();
    let base = url::Url::parse(&format!("{}/", server.uri())).unwrap();
    let api = ApiClient::with_client(http, base, RetryPolicy::none(), Duration::from_secs(1));

    let err = api.get("api/self").await.unwrap_err();
    let timeout = match err {
        Error::RetriesExhausted { source, .. } => *source,
        other => other,
    };
    assert!(matches!(timeout, Error::Timeout { timeout_secs: 1 }), "{timeout:?}");
    assert_eq!(timeout.to_string(), "Request timed out after 1s");
}

#[tokio::test]
async fn test_connection_refused_exhausts_retries() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = UnifiClient::from_config(&config_for(port), "default").unwrap();

    let result = client.list_devices().await;
    match result {
        Err(Error::RetriesExhausted { attempts, source }) => {
            assert_eq!(attempts, 3);
            assert!(source.is_transient(), "{source:?}");
        }
        other => panic!("expected RetriesExhausted, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_server_errors_are_not_retried() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(site_path("stat/sysinfo")))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.get_system_status().await.unwrap_err();
    assert!(matches!(err, Error::Server { status: 503, ref message } if message == "maintenance"));
}
