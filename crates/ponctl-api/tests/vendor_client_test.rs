#![allow(clippy::unwrap_used)]
// Integration tests for `VendorClient` using wiremock.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ponctl_api::http::Method;
use ponctl_api::{BasicAuth, Error, Oid, VendorClient};

// ── Helpers ─────────────────────────────────────────────────────────

const TIMEOUT: Duration = Duration::from_secs(2);

async fn setup() -> (MockServer, VendorClient) {
    let server = MockServer::start().await;
    let client =
        VendorClient::with_client(reqwest::Client::new(), &server.uri(), "/restconf/v1", None)
            .unwrap();
    (server, client)
}

fn rx_power_oid() -> Oid {
    "1.3.6.1.4.1.2011.6.128.1.1.2.51.1.4.4194312192.3".parse().unwrap()
}

// ── Reads ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_read_object() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("/restconf/v1/mib/{}", rx_power_oid())))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": { "rc": "ok" },
            "data": [{ "oid": rx_power_oid().to_string(), "value": -1850, "type": "integer" }]
        })))
        .mount(&server)
        .await;

    let obj = client.read_object(&rx_power_oid(), TIMEOUT).await.unwrap();
    assert_eq!(obj.value, json!(-1850));
    assert_eq!(obj.kind.as_deref(), Some("integer"));
}

#[tokio::test]
async fn test_read_object_empty_data_is_no_such_object() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": { "rc": "ok" },
            "data": []
        })))
        .mount(&server)
        .await;

    let result = client.read_object(&rx_power_oid(), TIMEOUT).await;
    assert!(matches!(result, Err(Error::NoSuchObject { .. })), "got: {result:?}");
}

#[tokio::test]
async fn test_unauthorized_maps_to_authentication() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.read_object(&rx_power_oid(), TIMEOUT).await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_gateway_error_body_with_200() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": { "code": 403, "message": "user lacks olt-admin role" }
        })))
        .mount(&server)
        .await;

    let result = client.read_object(&rx_power_oid(), TIMEOUT).await;
    assert!(matches!(result, Err(Error::Authentication { .. })), "got: {result:?}");
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let result = client.read_object(&rx_power_oid(), TIMEOUT).await;
    assert!(matches!(result, Err(Error::Deserialization { .. })), "got: {result:?}");
}

#[tokio::test]
async fn test_slow_gateway_times_out() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let result = client
        .read_object(&rx_power_oid(), Duration::from_millis(50))
        .await;
    match result {
        Err(Error::Transport(e)) => assert!(e.is_timeout()),
        other => panic!("expected transport timeout, got: {other:?}"),
    }
}

// ── Walks ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_walk_partial_result_keeps_items() {
    let (server, client) = setup().await;
    let root: Oid = "1.3.6.1.4.1.2011.6.128.1.1.2.51.1.4".parse().unwrap();

    Mock::given(method("GET"))
        .and(path(format!("/restconf/v1/mib/{root}")))
        .and(query_param("walk", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": { "rc": "error", "msg": "slot 2 not responding" },
            "data": [
                { "oid": format!("{root}.4194312192.1"), "value": -1720 },
                { "oid": format!("{root}.4194312192.2"), "value": -2101 }
            ]
        })))
        .mount(&server)
        .await;

    let walk = client.walk_objects(&root, TIMEOUT).await;
    assert_eq!(walk.items.len(), 2);
    assert!(matches!(walk.error, Some(Error::Rejected { .. })));
}

// ── Writes & endpoints ──────────────────────────────────────────────

#[tokio::test]
async fn test_write_object_sends_value_with_basic_auth() {
    let server = MockServer::start().await;
    let client = VendorClient::with_client(
        reqwest::Client::new(),
        &server.uri(),
        "api",
        Some(BasicAuth {
            username: "noc".into(),
            password: "hunter2".to_string().into(),
        }),
    )
    .unwrap();
    let oid: Oid = "1.3.6.1.4.1.2011.6.128.1.1.2.46.1.1.4194312192.3".parse().unwrap();

    Mock::given(method("PUT"))
        .and(path(format!("/api/mib/{oid}")))
        .and(header_exists("authorization"))
        .and(body_json(json!({ "value": 2 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": { "rc": "ok" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    client.write_object(&oid, &json!(2), TIMEOUT).await.unwrap();
}

#[tokio::test]
async fn test_invoke_returns_raw_json() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/restconf/v1/ont/reboot"))
        .and(body_json(json!({ "frame": 0, "slot": 1, "port": 0, "ont": 3 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accepted": true })))
        .mount(&server)
        .await;

    let body = client
        .invoke(
            Method::POST,
            "/ont/reboot",
            Some(&json!({ "frame": 0, "slot": 1, "port": 0, "ont": 3 })),
            TIMEOUT,
        )
        .await
        .unwrap();
    assert_eq!(body["accepted"], true);
}

#[tokio::test]
async fn test_invoke_not_found_is_http_404() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no route"))
        .mount(&server)
        .await;

    let result = client.invoke(Method::GET, "/nope", None, TIMEOUT).await;
    assert!(
        matches!(result, Err(Error::Http { status: 404, .. })),
        "expected 404, got: {result:?}"
    );
}
