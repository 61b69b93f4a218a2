#![allow(clippy::unwrap_used)]
// Integration tests for `HttpClient` and the resource clients using wiremock.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use pretty_assertions::assert_eq;
use reqwest::header::{HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use wiremock::matchers::{
    body_json, header, method, path, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ipam_api::{
    Anonymous, ApiRequest, AssignIpAddress, AuthClient, Error, HttpClient, IpAddressClient,
    IpStatus, ReportClient, ReservationClient, ReservationListParams, StaticToken, SubnetClient,
    SubnetListParams, TokenSource, TransportConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn http(server: &MockServer, tokens: Arc<dyn TokenSource>) -> HttpClient {
    http_with_timeout(server, tokens, Duration::from_secs(5))
}

fn http_with_timeout(
    server: &MockServer,
    tokens: Arc<dyn TokenSource>,
    timeout: Duration,
) -> HttpClient {
    let transport = TransportConfig::default().with_timeout(timeout);
    HttpClient::new(&format!("{}/api", server.uri()), &transport, tokens).unwrap()
}

fn subnet_json(id: &str, cidr: &str) -> serde_json::Value {
    let (network, mask) = cidr.split_once('/').unwrap();
    json!({
        "id": id,
        "networkAddress": network,
        "subnetMask": mask.parse::<u8>().unwrap(),
        "cidr": cidr,
    })
}

/// Token source that counts how often the server rejected it.
#[derive(Default)]
struct CountingToken {
    rejected: AtomicUsize,
    last_rejected: std::sync::Mutex<Option<String>>,
}

impl TokenSource for CountingToken {
    fn bearer_token(&self) -> Option<SecretString> {
        Some(SecretString::from("expired-token"))
    }

    fn reject(&self, token: &SecretString) {
        self.rejected.fetch_add(1, Ordering::SeqCst);
        *self.last_rejected.lock().unwrap() = Some(token.expose_secret().to_owned());
    }
}

// ── Headers ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_bearer_header_sent_when_token_present() {
    let server = MockServer::start().await;
    let client = SubnetClient::new(http(&server, Arc::new(StaticToken::new("tok-123"))));

    Mock::given(method("GET"))
        .and(path("/api/subnets/sn-1"))
        .and(header("authorization", "Bearer tok-123"))
        .and(header("content-type", "application/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "data": subnet_json("sn-1", "10.0.0.0/24") })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let subnet = client.get("sn-1").await.unwrap().into_data().unwrap();
    assert_eq!(subnet.cidr, "10.0.0.0/24");
}

#[tokio::test]
async fn test_no_authorization_header_without_token() {
    let server = MockServer::start().await;
    let client = ReportClient::new(http(&server, Arc::new(Anonymous)));

    Mock::given(method("GET"))
        .and(path("/api/reports/status"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "data": { "ASSIGNED": 12, "AVAILABLE": 240 } })),
        )
        .mount(&server)
        .await;

    let report = client.status().await.unwrap().into_data().unwrap();
    assert_eq!(report.get("ASSIGNED"), Some(&12));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_extra_headers_are_forwarded() {
    let server = MockServer::start().await;
    let client = http(&server, Arc::new(Anonymous));

    Mock::given(method("GET"))
        .and(path("/api/reports/utilization"))
        .and(header("x-request-id", "abc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let request = ApiRequest::get("/reports/utilization").header(
        HeaderName::from_static("x-request-id"),
        HeaderValue::from_static("abc-1"),
    );
    let resp = client.execute::<serde_json::Value>(request).await.unwrap();
    assert!(resp.is_empty());
}

// ── Query strings ───────────────────────────────────────────────────

#[tokio::test]
async fn test_absent_filters_are_omitted_from_query() {
    let server = MockServer::start().await;
    let client = SubnetClient::new(http(&server, Arc::new(Anonymous)));

    Mock::given(method("GET"))
        .and(path("/api/subnets"))
        .and(query_param("search", "core"))
        .and(query_param_is_missing("page"))
        .and(query_param_is_missing("limit"))
        .and(query_param_is_missing("location"))
        .and(query_param_is_missing("vlanId"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": { "data": [] } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let params = SubnetListParams {
        search: Some("core".into()),
        ..SubnetListParams::default()
    };
    client.list(&params).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("search=core"));
}

#[tokio::test]
async fn test_no_filters_means_no_query_string() {
    let server = MockServer::start().await;
    let client = ReservationClient::new(http(&server, Arc::new(Anonymous)));

    Mock::given(method("GET"))
        .and(path("/api/reservations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": [] })))
        .mount(&server)
        .await;

    let list = client
        .list(&ReservationListParams::default())
        .await
        .unwrap()
        .into_data()
        .unwrap();
    assert!(list.is_empty());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), None);
}

// ── Envelope decoding ───────────────────────────────────────────────

#[tokio::test]
async fn test_paginated_list_keeps_server_order() {
    let server = MockServer::start().await;
    let client = SubnetClient::new(http(&server, Arc::new(Anonymous)));

    Mock::given(method("GET"))
        .and(path("/api/subnets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "data": [
                    subnet_json("b", "10.1.0.0/16"),
                    subnet_json("a", "10.0.0.0/16"),
                    subnet_json("c", "192.168.0.0/24"),
                ],
                "page": 2,
                "limit": 3,
                "total": 9,
                "totalPages": 3
            }
        })))
        .mount(&server)
        .await;

    let page = client
        .list(&SubnetListParams::default())
        .await
        .unwrap()
        .into_data()
        .unwrap();
    let ids: Vec<_> = page.data.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a", "c"]);
    assert_eq!(page.total, Some(9));
    assert_eq!(page.total_pages, Some(3));
}

#[tokio::test]
async fn test_empty_success_body_yields_no_data() {
    let server = MockServer::start().await;
    let client = SubnetClient::new(http(&server, Arc::new(Anonymous)));

    Mock::given(method("DELETE"))
        .and(path("/api/subnets/sn-9"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let resp = client.delete("sn-9").await.unwrap();
    assert!(resp.data.is_none());
}

#[tokio::test]
async fn test_success_false_on_ok_status_is_an_error() {
    let server = MockServer::start().await;
    let client = SubnetClient::new(http(&server, Arc::new(Anonymous)));

    Mock::given(method("POST"))
        .and(path("/api/subnets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "Subnet overlaps with 10.0.0.0/16"
        })))
        .mount(&server)
        .await;

    let result = client
        .create(&ipam_api::CreateSubnet::new("10.0.1.0", 24))
        .await;
    match result {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 200);
            assert_eq!(message, "Subnet overlaps with 10.0.0.0/16");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_json_error_body_message_is_used() {
    let server = MockServer::start().await;
    let client = SubnetClient::new(http(&server, Arc::new(Anonymous)));

    Mock::given(method("GET"))
        .and(path("/api/subnets/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({ "success": false, "error": "Subnet not found" })),
        )
        .mount(&server)
        .await;

    let err = client.get("missing").await.unwrap_err();
    assert!(err.is_not_found(), "got: {err:?}");
    assert_eq!(err.to_string(), "API error (HTTP 404): Subnet not found");
}

#[tokio::test]
async fn test_non_json_error_body_uses_reason_phrase() {
    let server = MockServer::start().await;
    let client = SubnetClient::new(http(&server, Arc::new(Anonymous)));

    Mock::given(method("GET"))
        .and(path("/api/subnets"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad gateway</html>"))
        .mount(&server)
        .await;

    let err = client.list(&SubnetListParams::default()).await.unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 502);
            assert_eq!(message, "Bad Gateway");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_mismatched_payload_is_deserialization_error() {
    let server = MockServer::start().await;
    let client = SubnetClient::new(http(&server, Arc::new(Anonymous)));

    Mock::given(method("GET"))
        .and(path("/api/subnets/sn-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": [1, 2, 3] })),
        )
        .mount(&server)
        .await;

    let err = client.get("sn-1").await.unwrap_err();
    assert!(matches!(err, Error::Deserialization { .. }), "got: {err:?}");
}

// ── Authorization rejection ─────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized_fires_reject_hook() {
    let server = MockServer::start().await;
    let tokens = Arc::new(CountingToken::default());
    let client = AuthClient::new(http(&server, tokens.clone()));

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid token" })))
        .mount(&server)
        .await;

    let err = client.me().await.unwrap_err();
    assert!(err.is_auth_rejected());
    assert_eq!(err.to_string(), "Authorization rejected: Invalid token");
    assert_eq!(tokens.rejected.load(Ordering::SeqCst), 1);
    assert_eq!(
        tokens.last_rejected.lock().unwrap().as_deref(),
        Some("expired-token")
    );
}

// ── Transport failures ──────────────────────────────────────────────

#[tokio::test]
async fn test_slow_server_times_out_once() {
    let server = MockServer::start().await;
    let client = SubnetClient::new(http_with_timeout(
        &server,
        Arc::new(Anonymous),
        Duration::from_millis(100),
    ));

    Mock::given(method("GET"))
        .and(path("/api/subnets"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "data": { "data": [] } }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let err = client.list(&SubnetListParams::default()).await.unwrap_err();
    assert!(err.is_transient());
    match err {
        Error::Timeout { timeout } => assert_eq!(timeout, Duration::from_millis(100)),
        other => panic!("expected Timeout, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused_is_unreachable() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = HttpClient::new(
        &format!("http://127.0.0.1:{port}/api"),
        &TransportConfig::default(),
        Arc::new(Anonymous),
    )
    .unwrap();
    let reports = ReportClient::new(client);

    let err = reports.utilization().await.unwrap_err();
    assert!(matches!(err, Error::Unreachable { .. }), "got: {err:?}");
    assert!(err.is_transient());
}

// ── Request bodies ──────────────────────────────────────────────────

#[tokio::test]
async fn test_assign_without_address_omits_key() {
    let server = MockServer::start().await;
    let client = IpAddressClient::new(http(&server, Arc::new(Anonymous)));

    Mock::given(method("POST"))
        .and(path("/api/ip-addresses/assign"))
        .and(body_json(json!({ "subnetId": "sn-1", "hostname": "web-01" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "data": {
                "id": "ip-1",
                "ipAddress": "10.0.0.2",
                "subnetId": "sn-1",
                "status": "ASSIGNED",
                "hostname": "web-01"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut body = AssignIpAddress::new("sn-1");
    body.hostname = Some("web-01".into());
    let ip = client.assign(&body).await.unwrap().into_data().unwrap();
    assert_eq!(ip.ip_address, "10.0.0.2");
    assert_eq!(ip.status, IpStatus::Assigned);
}

#[tokio::test]
async fn test_release_posts_without_body() {
    let server = MockServer::start().await;
    let client = IpAddressClient::new(http(&server, Arc::new(Anonymous)));

    Mock::given(method("POST"))
        .and(path("/api/ip-addresses/ip-1/release"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "id": "ip-1", "ipAddress": "10.0.0.2", "subnetId": "sn-1", "status": "AVAILABLE" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ip = client.release("ip-1").await.unwrap().into_data().unwrap();
    assert_eq!(ip.status, IpStatus::Available);

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn test_login_sends_credentials() {
    let server = MockServer::start().await;
    let client = AuthClient::new(http(&server, Arc::new(Anonymous)));

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "ada@example.net", "password": "hunter2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "user": { "id": "u-1", "username": "ada", "email": "ada@example.net", "role": "user" },
                "token": "jwt-token"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let secret = SecretString::from("hunter2");
    let login = client
        .login("ada@example.net", &secret)
        .await
        .unwrap()
        .into_data()
        .unwrap();
    assert_eq!(login.user.username, "ada");
}
