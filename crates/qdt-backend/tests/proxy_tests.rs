//! Integration tests for the orchestrator proxies against a mock backend.

use mockito::{Matcher, Mock, Server, ServerGuard};
use qdt_backend::{
    BackendClient, BackendConfig, ControlRoom, JobRequest, ProxyError, StateUpdate, TwinCreate,
    TwinId,
};
use reqwest::StatusCode;
use serde_json::{Value, json};

// ============================================================================
// Test helpers
// ============================================================================

const TOKEN: &str = "s3cret";

fn client_for(server: &ServerGuard) -> BackendClient {
    let config = BackendConfig::default()
        .with_base_url(server.url())
        .with_auth_token(TOKEN);
    BackendClient::new(config).expect("client")
}

fn unconfigured_client() -> BackendClient {
    BackendClient::new(BackendConfig::default().with_auth_token(TOKEN)).expect("client")
}

fn twin(id: &str) -> TwinId {
    TwinId::new(id).expect("twin id")
}

/// Mocks that fail the test if any request reaches the server.
async fn forbid_all(server: &mut ServerGuard) -> Vec<Mock> {
    let mut mocks = Vec::new();
    for method in ["GET", "POST"] {
        mocks.push(
            server
                .mock(method, Matcher::Any)
                .expect(0)
                .create_async()
                .await,
        );
    }
    mocks
}

async fn assert_all(mocks: &[Mock]) {
    for mock in mocks {
        mock.assert_async().await;
    }
}

const UPTOWN: &str =
    r#"{"twins":[{"id":"t1","name":"Uptown","kind":"district","metadata":{}}]}"#;

// ============================================================================
// Backend client contract
// ============================================================================

#[tokio::test]
async fn test_list_twins_passes_status_and_body_through() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/twins")
        .match_header("x-api-token", TOKEN)
        .match_header("cache-control", "no-store")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(UPTOWN)
        .expect(1)
        .create_async()
        .await;

    let response = client_for(&server).list_twins().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.body(), &serde_json::from_str::<Value>(UPTOWN).unwrap());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_raw_body_keeps_key_order_and_big_numbers() {
    let raw = r#"{"zeta":1,"alpha":2,"big":123456789012345678901234567890,"twins":[]}"#;
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/twins")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(raw)
        .create_async()
        .await;

    let response = client_for(&server).list_twins().await.unwrap();

    assert_eq!(response.raw().as_ref(), raw.as_bytes());
    let keys: Vec<&str> = response
        .body()
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, ["zeta", "alpha", "big", "twins"]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_error_status_is_relayed_not_raised() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/execute")
        .with_status(503)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail":"orchestrator unavailable"}"#)
        .create_async()
        .await;

    let response = client_for(&server)
        .execute_job(Some(&twin("t1")), JobRequest::default())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body(), &json!({"detail": "orchestrator unavailable"}));
    assert_eq!(response.detail().as_deref(), Some("orchestrator unavailable"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unusual_status_codes_survive() {
    let mut server = Server::new_async().await;
    for status in [201_usize, 401, 404, 418, 422] {
        let mock = server
            .mock("GET", format!("/api/state/s{status}").as_str())
            .with_status(status)
            .with_body(format!(r#"{{"status":{status}}}"#))
            .create_async()
            .await;

        let id = twin(&format!("s{status}"));
        let response = client_for(&server).get_state(&id).await.unwrap();
        assert_eq!(response.status().as_u16() as usize, status);
        assert_eq!(response.body()["status"], json!(status));

        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_missing_token_is_sent_empty() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/twins")
        .match_header("x-api-token", "")
        .with_status(401)
        .with_body(r#"{"detail":"Unauthorized"}"#)
        .create_async()
        .await;

    let client = BackendClient::new(BackendConfig::default().with_base_url(server.url())).unwrap();
    let response = client.list_twins().await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_trailing_slash_in_base_url() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/twins")
        .with_status(200)
        .with_body(r#"{"twins":[]}"#)
        .create_async()
        .await;

    let config = BackendConfig::default().with_base_url(format!("{}/", server.url()));
    let response = BackendClient::new(config).unwrap().list_twins().await.unwrap();

    assert_eq!(response.body(), &json!({"twins": []}));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_empty_body_relayed_as_null() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/state/t1")
        .with_status(204)
        .create_async()
        .await;

    let response = client_for(&server)
        .set_state(&twin("t1"), &StateUpdate::new(json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(response.body(), &Value::Null);
}

#[tokio::test]
async fn test_non_json_body_is_a_transport_level_failure() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/twins")
        .with_status(502)
        .with_header("content-type", "text/html")
        .with_body("<html>Bad Gateway</html>")
        .create_async()
        .await;

    let err = client_for(&server).list_twins().await.unwrap_err();
    assert!(matches!(err, ProxyError::InvalidBody { status: 502, .. }));
    assert!(!err.is_local());
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let config = BackendConfig::default().with_base_url("http://127.0.0.1:1");
    let err = BackendClient::new(config)
        .unwrap()
        .list_twins()
        .await
        .unwrap_err();
    assert!(matches!(err, ProxyError::Transport(_)));
    assert!(err.detail().starts_with("Backend request failed"));
}

// ============================================================================
// Configuration errors never reach the network
// ============================================================================

#[tokio::test]
async fn test_unconfigured_operations_make_no_calls() {
    let mut server = Server::new_async().await;
    let forbidden = forbid_all(&mut server).await;

    let client = unconfigured_client();
    let id = twin("t1");

    let results = vec![
        client.list_twins().await,
        client.create_twin(&TwinCreate::new("Uptown", "district")).await,
        client.get_twin(&id).await,
        client.get_state(&id).await,
        client
            .set_state(&id, &StateUpdate::new(json!({"load_mw": 1.0})))
            .await,
        client.execute_job(Some(&id), JobRequest::default()).await,
        client.preview_route(Some(&id), JobRequest::default()).await,
        client.health().await,
    ];

    for result in results {
        let err = result.unwrap_err();
        assert!(matches!(err, ProxyError::NotConfigured));
        assert_eq!(err.detail(), "BACKEND_BASE_URL not set");
    }
    assert_all(&forbidden).await;
}

// ============================================================================
// Twin registry
// ============================================================================

#[tokio::test]
async fn test_create_twin_sends_name_kind_metadata() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/twins")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "name": "Uptown District",
            "kind": "district",
            "metadata": {"owner": "PlanckTech", "label": "QDT"}
        })))
        .with_status(200)
        .with_body(r#"{"id":"twin_0badc0ffee00","name":"Uptown District","kind":"district","metadata":{"owner":"PlanckTech","label":"QDT"}}"#)
        .create_async()
        .await;

    let mut metadata = serde_json::Map::new();
    metadata.insert("owner".into(), json!("PlanckTech"));
    metadata.insert("label".into(), json!("QDT"));
    let request = TwinCreate::new("Uptown District", "district").with_metadata(metadata);

    let response = client_for(&server).create_twin(&request).await.unwrap();
    assert_eq!(
        qdt_backend::created_twin_id(response.body()),
        TwinId::new("twin_0badc0ffee00")
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_get_twin_escapes_identifier() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/twins/district%2F7")
        .with_status(404)
        .with_body(r#"{"detail":"Twin not found"}"#)
        .create_async()
        .await;

    let response = client_for(&server)
        .get_twin(&twin("district/7"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    mock.assert_async().await;
}

// ============================================================================
// State proxy
// ============================================================================

#[tokio::test]
async fn test_set_state_posts_payload_envelope() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/state/t1")
        .match_header("x-api-token", TOKEN)
        .match_body(Matcher::Json(json!({"payload": {"load_mw": 120.5, "pv_mw": 35.2}})))
        .with_status(200)
        .with_body(r#"{"id":"t1","ts":1717171717.0,"payload":{"load_mw":120.5,"pv_mw":35.2}}"#)
        .create_async()
        .await;

    let update = StateUpdate::parse_payload(r#"{"load_mw": 120.5, "pv_mw": 35.2}"#).unwrap();
    let response = client_for(&server)
        .set_state(&twin("t1"), &update)
        .await
        .unwrap();

    assert_eq!(response.body()["ts"], json!(1717171717.0));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_get_state_returns_snapshot_verbatim() {
    let snapshot = r#"{"id":"t1","ts":1.5,"payload":{"temp_c":12.4},"extra":[1,2,3]}"#;
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/state/t1")
        .with_status(200)
        .with_body(snapshot)
        .create_async()
        .await;

    let response = client_for(&server).get_state(&twin("t1")).await.unwrap();
    assert_eq!(response.body(), &serde_json::from_str::<Value>(snapshot).unwrap());
}

// ============================================================================
// Execution proxy
// ============================================================================

#[tokio::test]
async fn test_execute_without_twin_makes_no_call() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/execute")
        .expect(0)
        .create_async()
        .await;

    let job = JobRequest::parse(r#"{"problem_type": "dispatch", "twin_id": "t1"}"#).unwrap();
    let err = client_for(&server).execute_job(None, job).await.unwrap_err();

    assert!(matches!(err, ProxyError::NoTwinSelected));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_execute_injects_selected_twin() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/execute")
        .match_body(Matcher::Json(json!({
            "problem_type": "dispatch",
            "size": 400,
            "deadline_ms": 20000,
            "risk": "LOW",
            "payload": {"horizon_steps": 24, "assets": ["hp1", "tes1", "pv", "grid"]},
            "twin_id": "t1"
        })))
        .with_status(200)
        .with_body(r#"{"request_id":"req_5e5e5e5e5e5e","route":"QUANTUM","why":"combinatorial & time allows","fallback_used":false,"result":{"objective":0.51}}"#)
        .create_async()
        .await;

    let job = JobRequest::parse(
        r#"{
            "problem_type": "dispatch",
            "size": 400,
            "deadline_ms": 20000,
            "risk": "LOW",
            "payload": {"horizon_steps": 24, "assets": ["hp1", "tes1", "pv", "grid"]},
            "twin_id": "someone-else"
        }"#,
    )
    .unwrap();
    let response = client_for(&server)
        .execute_job(Some(&twin("t1")), job)
        .await
        .unwrap();

    let view = qdt_backend::JobResultView::new(response.body());
    assert_eq!(view.route(), Some(qdt_backend::Route::Quantum));
    assert_eq!(view.fallback_used(), Some(false));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_preview_route_posts_to_router() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/route")
        .match_body(Matcher::PartialJson(json!({"twin_id": "t1", "risk": "CRITICAL"})))
        .with_status(200)
        .with_body(r#"{"route":"CLASSICAL","why":"risk=CRITICAL blocks quantum"}"#)
        .create_async()
        .await;

    let job = JobRequest::new("restoration", 900, 60_000, "CRITICAL", json!({}));
    let response = client_for(&server)
        .preview_route(Some(&twin("t1")), job)
        .await
        .unwrap();

    assert_eq!(response.body()["route"], "CLASSICAL");
    mock.assert_async().await;
}

// ============================================================================
// Control room over a live client
// ============================================================================

#[tokio::test]
async fn test_control_room_session_scenario() {
    let mut server = Server::new_async().await;
    let list = server
        .mock("GET", "/api/twins")
        .with_status(200)
        .with_body(UPTOWN)
        .create_async()
        .await;
    let execute = server
        .mock("POST", "/api/execute")
        .match_body(Matcher::PartialJson(json!({"twin_id": "t1"})))
        .with_status(503)
        .with_body(r#"{"detail":"orchestrator unavailable"}"#)
        .create_async()
        .await;

    let mut room = ControlRoom::new(client_for(&server));
    room.refresh_twins().await;
    assert_eq!(room.selected().map(TwinId::as_str), Some("t1"));

    room.execute_job(r#"{"problem_type": "dispatch", "size": 400}"#)
        .await;
    assert_eq!(room.error(), Some("orchestrator unavailable"));
    assert_eq!(room.execution_output(), None);

    list.assert_async().await;
    execute.assert_async().await;
}

#[tokio::test]
async fn test_control_room_bad_telemetry_makes_no_call() {
    let mut server = Server::new_async().await;
    let forbidden = forbid_all(&mut server).await;

    let mut room = ControlRoom::new(client_for(&server));
    room.select("t1");
    room.push_state("{bad json").await;

    assert_eq!(room.error(), Some("Telemetry must be valid JSON"));
    assert_all(&forbidden).await;
}
