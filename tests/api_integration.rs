//! End-to-end API integration tests
//!
//! These tests drive the full HTTP router in-process:
//! - Agent state pushes and command delivery
//! - The echo endpoint
//! - Input rejection without mailbox mutation
//! - Inspection, administration and fallback routes

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use fleet_rendezvous::api::{self, AppState};
use fleet_rendezvous::config::Config;
use fleet_rendezvous::domain::repositories::MailboxStore;
use fleet_rendezvous::infrastructure::repositories::InMemoryMailboxStore;
use serde_json::{json, Value};
use tower::util::ServiceExt; // for oneshot

/// Setup test application over a fresh mailbox
fn setup_app_with(config: Config) -> (Router, Arc<dyn MailboxStore>) {
    let store: Arc<dyn MailboxStore> = Arc::new(InMemoryMailboxStore::new());
    let state = AppState::new(Arc::clone(&store), config.max_agents);
    (api::router(state, &config), store)
}

fn setup_app() -> (Router, Arc<dyn MailboxStore>) {
    setup_app_with(Config::default())
}

fn post_json(uri: &str, body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.into()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn agent(name: &str, x: f64, y: f64, psi: f64) -> Value {
    json!({
        "Name": name,
        "IP": "192.168.1.20",
        "Port": 6121,
        "X": x,
        "Y": y,
        "Psi": psi,
        "Stop_label": false,
        "Req_Resp": false,
        "V": 0.0,
        "W": 0.0,
        "Path_Param": []
    })
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = setup_app();

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn test_first_push_returns_synthesized_path() {
    let (app, store) = setup_app();

    let response = app
        .oneshot(post_json(
            "/demo/string",
            agent("clouder1", 0.5, 5.0, 0.0).to_string(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let path = json["Path_Param"].as_array().unwrap();
    assert_eq!(path.len(), 40);
    assert_eq!(path[0], 0.5);
    assert_eq!(path[1], 5.0);
    assert_eq!(path[2], 1.5);
    assert_eq!(path[3], 5.0);
    assert_eq!(json["Name"], "clouder1");
    assert_eq!(json["Req_Resp"], false);

    // Registry, raw push and bootstrapped slot all exist
    assert_eq!(store.get("agent_list").await.unwrap().unwrap(), r#"["clouder1"]"#);
    assert!(store.get("clouder1").await.unwrap().is_some());
    assert!(store.get("clouder1-c").await.unwrap().is_some());
}

#[tokio::test]
async fn test_first_push_with_ready_flag_is_not_a_delivery() {
    let (app, _) = setup_app();

    let mut payload = agent("clouder1", 0.5, 5.0, 0.0);
    payload["Req_Resp"] = json!(true);

    let response = app
        .clone()
        .oneshot(post_json("/demo/string", payload.to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["Req_Resp"], false);

    // Stored slot agrees with the response
    let response = app
        .oneshot(get("/agents/clouder1/command"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["Req_Resp"], false);
}

#[tokio::test]
async fn test_queued_command_delivered_once() {
    let (app, _) = setup_app();

    // Agent connects
    let response = app
        .clone()
        .oneshot(post_json("/demo/string", agent("clouder1", 0.5, 5.0, 0.0).to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Producer queues a command
    let mut command = agent("clouder1", 10.0, 20.0, 1.0);
    command["V"] = json!(2.5);
    command["Stop_label"] = json!(true);
    let response = app
        .clone()
        .oneshot(post_json("/demo/command", command.to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(body_json(response).await["Req_Resp"], true);

    // Next push collects it with the pre-flip flag
    let response = app
        .clone()
        .oneshot(post_json("/demo/string", agent("clouder1", 1.0, 2.0, 0.0).to_string()))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["Req_Resp"], true);
    assert_eq!(json["V"], 2.5);
    assert_eq!(json["Stop_label"], true);
    assert_eq!(json["Path_Param"][0], 1.0);
    assert_eq!(json["Path_Param"][1], 2.0);

    // Stored slot is consumed
    let response = app
        .clone()
        .oneshot(get("/agents/clouder1/command"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["Req_Resp"], false);

    // Later pushes see the same record without the flag
    let response = app
        .oneshot(post_json("/demo/string", agent("clouder1", 3.0, 2.0, 0.0).to_string()))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["Req_Resp"], false);
    assert_eq!(json["V"], 2.5);
}

#[tokio::test]
async fn test_malformed_json_rejected_without_mutation() {
    let (app, store) = setup_app();

    let response = app
        .oneshot(post_json("/demo/string", r#"{"Name": "clouder1", "X": "#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid JSON data");
    assert_eq!(store.key_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_wrong_field_type_rejected() {
    let (app, store) = setup_app();

    let response = app
        .oneshot(post_json("/demo/string", r#"{"Name": "clouder1", "Port": "x"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(store.key_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_reserved_agent_name_rejected() {
    let (app, store) = setup_app();

    let response = app
        .oneshot(post_json("/demo/string", agent("agent_list", 0.0, 0.0, 0.0).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(store.key_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_wrong_method_not_allowed() {
    let (app, _) = setup_app();

    let response = app.clone().oneshot(get("/demo/string")).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let response = app.oneshot(get("/demo/hash")).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let config = Config {
        max_payload_bytes: 64,
        ..Config::default()
    };
    let (app, store) = setup_app_with(config);

    let mut payload = agent("clouder1", 0.0, 0.0, 0.0);
    payload["Path_Param"] = json!(vec![0.0; 100]);

    let response = app
        .oneshot(post_json("/demo/string", payload.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(store.key_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_echo_overwrites_velocities_only() {
    let (app, store) = setup_app();

    let mut payload = agent("clouder1", 4.0, 3.0, 0.2);
    payload["V"] = json!(9.0);
    payload["W"] = json!(-9.0);
    payload["Path_Param"] = json!([1.0, 2.0]);

    let response = app
        .oneshot(post_json("/demo/hash", payload.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["V"], 1.0);
    assert_eq!(json["W"], 0.5);
    assert_eq!(json["X"], 4.0);
    assert_eq!(json["Psi"], 0.2);
    assert_eq!(json["Path_Param"], json!([1.0, 2.0]));
    assert_eq!(store.key_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_list_agents_and_last_push() {
    let (app, _) = setup_app();

    for name in ["rover-b", "rover-a"] {
        app.clone()
            .oneshot(post_json("/demo/string", agent(name, 1.0, 1.0, 0.0).to_string()))
            .await
            .unwrap();
    }

    let response = app.clone().oneshot(get("/agents")).await.unwrap();
    assert_eq!(body_json(response).await, json!(["rover-a", "rover-b"]));

    let response = app.clone().oneshot(get("/agents/rover-a/state")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["Name"], "rover-a");

    let response = app.oneshot(get("/agents/unknown/command")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_registry_limit_returns_service_unavailable() {
    let config = Config {
        max_agents: Some(1),
        ..Config::default()
    };
    let (app, store) = setup_app_with(config);

    let response = app
        .clone()
        .oneshot(post_json("/demo/string", agent("a", 0.0, 0.0, 0.0).to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post_json("/demo/string", agent("b", 0.0, 0.0, 0.0).to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(store.get("b").await.unwrap().is_none());

    // Known agents keep working
    let response = app
        .oneshot(post_json("/demo/string", agent("a", 0.0, 0.0, 0.0).to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_flush_mailbox() {
    let (app, store) = setup_app();

    app.clone()
        .oneshot(post_json("/demo/string", agent("a", 0.0, 0.0, 0.0).to_string()))
        .await
        .unwrap();
    assert_eq!(store.key_count().await.unwrap(), 3);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/admin/mailbox")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(store.key_count().await.unwrap(), 0);

    let response = app.oneshot(get("/agents")).await.unwrap();
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn test_raw_data_fallback() {
    let (app, _) = setup_app();

    let response = app.clone().oneshot(get("/1024")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(body.len(), 1024);

    let response = app.clone().oneshot(get("/0")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.oneshot(get("/not-a-number")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
