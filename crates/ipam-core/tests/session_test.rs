#![allow(clippy::unwrap_used)]
// Session lifecycle and facade tests against a wiremock server.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tokio_stream::StreamExt;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ipam_core::api::{SubnetListParams, TokenSource, UpdateProfile};
use ipam_core::{ClientConfig, CoreError, Ipam, MemoryTokenStore, SessionState, TokenStore};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup(store: Arc<MemoryTokenStore>) -> (MockServer, Ipam) {
    setup_with_timeout(store, Duration::from_secs(5)).await
}

async fn setup_with_timeout(store: Arc<MemoryTokenStore>, timeout: Duration) -> (MockServer, Ipam) {
    let server = MockServer::start().await;
    let config = ClientConfig::new(format!("{}/api", server.uri())).with_timeout(timeout);
    let ipam = Ipam::new(config, store).unwrap();
    (server, ipam)
}

fn user_json() -> Value {
    json!({ "id": "u-1", "username": "ada", "email": "a@b.com", "role": "admin" })
}

fn subnet_json(id: &str, cidr: &str) -> Value {
    let (network, mask) = cidr.split_once('/').unwrap();
    json!({
        "id": id,
        "networkAddress": network,
        "subnetMask": mask.parse::<u8>().unwrap(),
        "cidr": cidr,
    })
}

fn utilization_json(used: u64) -> Value {
    json!({
        "totalIPs": 254,
        "usedIPs": used,
        "reservedIPs": 0,
        "availableIPs": 254 - used,
        "utilizationPercentage": "10.00"
    })
}

async fn mount_login_for(server: &MockServer, password: &str, token: &str) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "a@b.com", "password": password })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "user": user_json(), "token": token }
        })))
        .mount(server)
        .await;
}

/// Wait until the server has seen a request to `route`.
async fn wait_for_request(server: &MockServer, route: &str) {
    for _ in 0..200 {
        let seen = server.received_requests().await.unwrap_or_default();
        if seen.iter().any(|r| r.url.path() == route) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("no request to {route}");
}

async fn mount_login(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "user": user_json(), "token": token }
        })))
        .mount(server)
        .await;
}

// ── Login / logout ──────────────────────────────────────────────────

#[tokio::test]
async fn test_login_round_trip_attaches_token() {
    let store = Arc::new(MemoryTokenStore::new());
    let (server, ipam) = setup(store.clone()).await;
    mount_login(&server, "T").await;

    Mock::given(method("GET"))
        .and(path("/api/subnets"))
        .and(header("authorization", "Bearer T"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": { "data": [] } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let user = ipam
        .login("a@b.com", &SecretString::from("pw"))
        .await
        .unwrap();
    assert_eq!(user.username, "ada");
    assert!(ipam.is_authenticated());
    assert_eq!(ipam.session_state(), SessionState::Authenticated);
    assert_eq!(store.load().unwrap().unwrap().expose_secret(), "T");

    ipam.get_subnets(&SubnetListParams::default()).await.unwrap();
}

#[tokio::test]
async fn test_login_rejected_is_invalid_credentials() {
    let store = Arc::new(MemoryTokenStore::new());
    let (server, ipam) = setup(store.clone()).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "success": false, "error": "Invalid email or password" })),
        )
        .mount(&server)
        .await;

    let err = ipam
        .login("a@b.com", &SecretString::from("wrong"))
        .await
        .unwrap_err();
    match err {
        CoreError::InvalidCredentials { message } => {
            assert_eq!(message, "Invalid email or password");
        }
        other => panic!("expected InvalidCredentials, got: {other:?}"),
    }
    assert!(!ipam.is_authenticated());
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_login_without_payload_fails() {
    let (server, ipam) = setup(Arc::new(MemoryTokenStore::new())).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    let err = ipam
        .login("a@b.com", &SecretString::from("pw"))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::LoginFailed { .. }), "got: {err:?}");
    assert_eq!(ipam.session_state(), SessionState::Unauthenticated);
}

#[tokio::test]
async fn test_double_logout_is_a_no_op() {
    let store = Arc::new(MemoryTokenStore::new());
    let (server, ipam) = setup(store.clone()).await;
    mount_login(&server, "T").await;

    ipam.login("a@b.com", &SecretString::from("pw"))
        .await
        .unwrap();

    ipam.logout();
    assert!(!ipam.is_authenticated());
    assert!(ipam.current_user().is_none());
    assert!(store.is_empty());

    ipam.logout();
    assert!(!ipam.is_authenticated());
    assert_eq!(ipam.session_state(), SessionState::Unauthenticated);
    assert!(ipam.session().bearer_token().is_none());
}

#[tokio::test]
async fn test_state_changes_stream_follows_login_and_logout() {
    let (server, ipam) = setup(Arc::new(MemoryTokenStore::new())).await;
    mount_login(&server, "T").await;

    let mut changes = ipam.session().changes();
    assert_eq!(changes.next().await, Some(SessionState::Unauthenticated));

    ipam.login("a@b.com", &SecretString::from("pw"))
        .await
        .unwrap();
    assert_eq!(changes.next().await, Some(SessionState::Authenticated));

    ipam.logout();
    assert_eq!(changes.next().await, Some(SessionState::Unauthenticated));
}

#[tokio::test]
async fn test_unauthorized_response_tears_down_session() {
    let store = Arc::new(MemoryTokenStore::new());
    let (server, ipam) = setup(store.clone()).await;
    mount_login(&server, "T").await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "Token expired" })))
        .mount(&server)
        .await;

    ipam.login("a@b.com", &SecretString::from("pw"))
        .await
        .unwrap();
    let err = ipam.get_users().await.unwrap_err();

    assert!(err.is_auth_rejected());
    assert!(!ipam.is_authenticated());
    assert_eq!(ipam.session_state(), SessionState::Unauthenticated);
    assert!(store.is_empty());
}

// ── Restore ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_restore_with_valid_token() {
    let store = Arc::new(MemoryTokenStore::with_token("persisted"));
    let (server, ipam) = setup(store.clone()).await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer persisted"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": user_json() })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let user = ipam.restore_session().await.unwrap().unwrap();
    assert_eq!(user.email, "a@b.com");
    assert!(ipam.is_authenticated());
    assert_eq!(ipam.session_state(), SessionState::Authenticated);
}

#[tokio::test]
async fn test_restore_without_token_stays_unauthenticated() {
    let (server, ipam) = setup(Arc::new(MemoryTokenStore::new())).await;

    assert!(ipam.restore_session().await.unwrap().is_none());
    assert_eq!(ipam.session_state(), SessionState::Unauthenticated);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_restore_rejected_discards_persisted_token() {
    let store = Arc::new(MemoryTokenStore::with_token("stale"));
    let (server, ipam) = setup(store.clone()).await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid token" })))
        .mount(&server)
        .await;

    let restored = ipam.restore_session().await.unwrap();
    assert!(restored.is_none());
    assert_eq!(ipam.session_state(), SessionState::Unauthenticated);
    assert!(!ipam.is_authenticated());
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_login_during_restore_survives_failed_revalidation() {
    let store = Arc::new(MemoryTokenStore::with_token("stale"));
    let (server, ipam) = setup(store.clone()).await;
    mount_login(&server, "FRESH").await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({ "error": "db down" }))
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&server)
        .await;

    let restoring = {
        let ipam = ipam.clone();
        tokio::spawn(async move { ipam.restore_session().await })
    };
    wait_for_request(&server, "/api/auth/me").await;

    ipam.login("a@b.com", &SecretString::from("pw"))
        .await
        .unwrap();

    let restored = restoring.await.unwrap().unwrap();
    assert!(restored.is_none());
    assert!(ipam.is_authenticated());
    assert_eq!(ipam.session_state(), SessionState::Authenticated);
    assert_eq!(store.load().unwrap().unwrap().expose_secret(), "FRESH");
}

#[tokio::test]
async fn test_stale_unauthorized_keeps_newer_session() {
    let store = Arc::new(MemoryTokenStore::new());
    let (server, ipam) = setup(store.clone()).await;
    mount_login_for(&server, "old-pw", "OLD").await;
    mount_login_for(&server, "new-pw", "NEW").await;

    Mock::given(method("GET"))
        .and(path("/api/subnets"))
        .and(header("authorization", "Bearer OLD"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "error": "Token expired" }))
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&server)
        .await;

    ipam.login("a@b.com", &SecretString::from("old-pw"))
        .await
        .unwrap();
    let slow = {
        let ipam = ipam.clone();
        tokio::spawn(async move { ipam.get_subnets(&SubnetListParams::default()).await })
    };
    wait_for_request(&server, "/api/subnets").await;

    ipam.login("a@b.com", &SecretString::from("new-pw"))
        .await
        .unwrap();

    let err = slow.await.unwrap().unwrap_err();
    assert!(err.is_auth_rejected());
    assert!(ipam.is_authenticated());
    assert_eq!(ipam.session_state(), SessionState::Authenticated);
    assert_eq!(store.load().unwrap().unwrap().expose_secret(), "NEW");
}

#[tokio::test]
async fn test_restore_timeout_keeps_persisted_token() {
    let store = Arc::new(MemoryTokenStore::with_token("persisted"));
    let (server, ipam) = setup_with_timeout(store.clone(), Duration::from_millis(100)).await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "data": user_json() }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let err = ipam.restore_session().await.unwrap_err();
    assert!(err.is_transient(), "got: {err:?}");
    assert_eq!(ipam.session_state(), SessionState::Unauthenticated);
    assert!(!store.is_empty());
}

#[tokio::test]
async fn test_restoring_state_is_observable() {
    let store = Arc::new(MemoryTokenStore::with_token("persisted"));
    let (server, ipam) = setup(store).await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "data": user_json() }))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let mut states = ipam.session().subscribe();
    let restoring = {
        let ipam = ipam.clone();
        tokio::spawn(async move { ipam.restore_session().await })
    };

    states
        .wait_for(|s| *s == SessionState::Restoring)
        .await
        .unwrap();
    assert!(ipam.session().is_loading());
    assert!(!ipam.is_authenticated());

    restoring.await.unwrap().unwrap();
    assert_eq!(*states.borrow_and_update(), SessionState::Authenticated);
    assert!(!ipam.session().is_loading());
}

// ── Facade composites ───────────────────────────────────────────────

#[tokio::test]
async fn test_overview_joins_subnets_and_report() {
    let (server, ipam) = setup(Arc::new(MemoryTokenStore::new())).await;

    Mock::given(method("GET"))
        .and(path("/api/subnets"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "data": [subnet_json("sn-1", "10.0.0.0/24")], "page": 1, "total": 1 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/reports/utilization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "subnets": [], "totals": utilization_json(25) }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let overview = ipam.overview().await.unwrap();
    assert_eq!(overview.subnets.len(), 1);
    assert_eq!(overview.utilization.totals.used_ips, 25);
}

#[tokio::test]
async fn test_subnets_with_utilization_tolerates_failed_details() {
    let (server, ipam) = setup(Arc::new(MemoryTokenStore::new())).await;

    Mock::given(method("GET"))
        .and(path("/api/subnets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "data": [subnet_json("sn-1", "10.0.0.0/24"), subnet_json("sn-2", "10.0.1.0/24")] }
        })))
        .mount(&server)
        .await;

    let mut detail = subnet_json("sn-1", "10.0.0.0/24");
    detail["utilization"] = utilization_json(42);
    Mock::given(method("GET"))
        .and(path("/api/subnets/sn-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": detail })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/subnets/sn-2"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "boom" })))
        .mount(&server)
        .await;

    let page = ipam
        .subnets_with_utilization(&SubnetListParams::default())
        .await
        .unwrap();
    let ids: Vec<_> = page.data.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["sn-1", "sn-2"]);
    assert_eq!(page.data[0].utilization.as_ref().unwrap().used_ips, 42);
    assert!(page.data[1].utilization.is_none());
}

#[tokio::test]
async fn test_update_profile_refreshes_session_user() {
    let (server, ipam) = setup(Arc::new(MemoryTokenStore::new())).await;
    mount_login(&server, "T").await;

    let mut updated = user_json();
    updated["username"] = json!("ada.lovelace");
    Mock::given(method("PUT"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": updated })))
        .mount(&server)
        .await;

    ipam.login("a@b.com", &SecretString::from("pw"))
        .await
        .unwrap();
    let body = UpdateProfile {
        username: Some("ada.lovelace".into()),
        ..UpdateProfile::default()
    };
    ipam.update_profile(&body).await.unwrap();

    assert_eq!(ipam.current_user().unwrap().username, "ada.lovelace");
    assert!(ipam.is_authenticated());
}
