//! Valve API Tests
//!
//! Drives the full router against an in-memory database:
//! - create / list / delete / update status codes and bodies
//! - duplicate names are rejected on create and on rename
//! - deletes decode the name exactly once unless configured otherwise
//! - storage failures map to generic 400 / 500 / 503 responses
//! - explorer redirect, OpenAPI document, favicon, health, CORS

use std::path::PathBuf;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use valve_catalog::http_server::{HttpServer, HttpServerConfig, ValveState};
use valve_catalog::storage::ValveStore;

// =============================================================================
// Test Utilities
// =============================================================================

async fn build_app_with_store(decode_names_twice: bool) -> (Router, ValveStore) {
    let store = ValveStore::in_memory().await.unwrap();
    let state = ValveState::new(store.clone()).with_double_decoding(decode_names_twice);
    let config = HttpServerConfig {
        static_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static"),
        ..Default::default()
    };
    (HttpServer::new(config, state).router(), store)
}

async fn build_app(decode_names_twice: bool) -> Router {
    build_app_with_store(decode_names_twice).await.0
}

/// App whose database pool has already been shut down.
async fn app_with_closed_store() -> Router {
    let (app, store) = build_app_with_store(false).await;
    store.close().await;
    app
}

async fn app() -> Router {
    build_app(false).await
}

fn form_request(method: Method, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri("/valve")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

async fn create(app: &Router, body: &str) -> (StatusCode, Value) {
    send(app, form_request(Method::POST, body)).await
}

async fn update(app: &Router, body: &str) -> (StatusCode, Value) {
    send(app, form_request(Method::PUT, body)).await
}

async fn delete(app: &Router, encoded_name: &str) -> (StatusCode, Value) {
    send(
        app,
        empty_request(Method::DELETE, &format!("/valve?name={}", encoded_name)),
    )
    .await
}

async fn list(app: &Router) -> Vec<Value> {
    let (status, body) = send(app, empty_request(Method::GET, "/valves")).await;
    assert_eq!(status, StatusCode::OK);
    body["valves"].as_array().cloned().unwrap()
}

const V1: &str = "name=V1&description=d&type=Gate&flow_rate=10.0";

// =============================================================================
// Create
// =============================================================================

/// A unique name is stored and the id it gets stays the same on later reads.
#[tokio::test]
async fn test_create_returns_stored_valve() {
    let app = app().await;

    let (status, body) = create(&app, V1).await;
    assert_eq!(status, StatusCode::OK);
    let id = body["id"].as_i64().unwrap();
    assert_eq!(
        body,
        json!({"id": id, "name": "V1", "description": "d", "type": "Gate", "flow_rate": 10.0})
    );

    let valves = list(&app).await;
    assert_eq!(valves, vec![body]);
}

/// Second create with the same name is a conflict; the first stays intact.
#[tokio::test]
async fn test_duplicate_name_conflicts() {
    let app = app().await;

    let (_, first) = create(&app, V1).await;
    let (status, body) =
        create(&app, "name=V1&description=other&type=Ball&flow_rate=1").await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body,
        json!({"message": "A valve with the same name is already in the catalog"})
    );
    assert_eq!(list(&app).await, vec![first]);
}

#[tokio::test]
async fn test_create_missing_field_is_unprocessable() {
    let app = app().await;

    let (status, _) = create(&app, "name=V1&description=d&type=Gate").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn test_create_non_numeric_flow_rate_is_unprocessable() {
    let app = app().await;

    let (status, _) = create(&app, "name=V1&description=d&type=Gate&flow_rate=fast").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_create_blank_name_reports_field() {
    let app = app().await;

    let (status, body) = create(&app, "name=+&description=d&type=Gate&flow_rate=1").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "name");
}

#[tokio::test]
async fn test_create_overlong_description_reports_field() {
    let app = app().await;
    let body = format!(
        "name=V1&description={}&type=Gate&flow_rate=1",
        "d".repeat(201)
    );

    let (status, body) = create(&app, &body).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "description");
}

#[tokio::test]
async fn test_create_json_body_is_unsupported() {
    let app = app().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/valve")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"name":"V1"}"#))
        .unwrap();

    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

// =============================================================================
// List
// =============================================================================

#[tokio::test]
async fn test_empty_list_is_ok() {
    let app = app().await;

    let (status, body) = send(&app, empty_request(Method::GET, "/valves")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"valves": []}));
}

#[tokio::test]
async fn test_list_in_insertion_order() {
    let app = app().await;
    for name in ["B", "A", "C"] {
        let (status, _) = create(
            &app,
            &format!("name={}&description=d&type=Ball&flow_rate=2.5", name),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let names: Vec<Value> = list(&app).await.into_iter().map(|v| v["name"].clone()).collect();
    assert_eq!(names, vec![json!("B"), json!("A"), json!("C")]);
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_unknown_name_is_not_found() {
    let app = app().await;
    let (_, kept) = create(&app, V1).await;

    let (status, body) = delete(&app, "V2").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "Valve not found"}));
    assert_eq!(list(&app).await, vec![kept]);
}

#[tokio::test]
async fn test_delete_removes_exactly_one() {
    let app = app().await;
    create(&app, V1).await;
    let (_, other) = create(&app, "name=V2&description=d&type=Gate&flow_rate=3").await;

    let (status, body) = delete(&app, "V1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Valve removed", "name": "V1"}));
    assert_eq!(list(&app).await, vec![other]);
}

#[tokio::test]
async fn test_delete_without_name_is_rejected() {
    let app = app().await;

    let (status, _) = send(&app, empty_request(Method::DELETE, "/valve")).await;
    assert!(status.is_client_error());
    assert_ne!(status, StatusCode::NOT_FOUND);
}

/// Spaces and slashes survive a single round of percent-decoding.
#[tokio::test]
async fn test_delete_decodes_name_once() {
    let app = app().await;
    let (status, _) = create(
        &app,
        "name=Gate+7%2FA+100%25&description=d&type=Gate&flow_rate=1",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Double-encoded form is a different name when decoding once
    let (status, _) = delete(&app, "Gate%25207%252FA%2520100%2525").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = delete(&app, "Gate%207%2FA%20100%25").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Gate 7/A 100%");
}

#[tokio::test]
async fn test_delete_double_decoding_when_enabled() {
    let app = build_app(true).await;
    create(&app, "name=Gate+7%2FA&description=d&type=Gate&flow_rate=1").await;

    let (status, body) = delete(&app, "Gate%25207%252FA").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Gate 7/A");
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn test_update_unknown_id_is_not_found() {
    let app = app().await;

    let (status, body) =
        update(&app, "id=99&name=V1&description=d&type=Gate&flow_rate=1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "Valve not found"}));
    assert!(list(&app).await.is_empty());
}

/// Update replaces all four fields; a later read sees the new values.
#[tokio::test]
async fn test_update_overwrites_every_field() {
    let app = app().await;
    let (_, created) = create(&app, V1).await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = update(
        &app,
        &format!(
            "id={}&name=V1-renamed&description=ball+valve&type=Ball&flow_rate=42.5",
            id
        ),
    )
    .await;

    let expected = json!({
        "id": id,
        "name": "V1-renamed",
        "description": "ball valve",
        "type": "Ball",
        "flow_rate": 42.5
    });
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, expected);
    assert_eq!(list(&app).await, vec![expected]);
}

#[tokio::test]
async fn test_update_keeping_own_name_succeeds() {
    let app = app().await;
    let (_, created) = create(&app, V1).await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = update(
        &app,
        &format!("id={}&name=V1&description=d&type=Gate&flow_rate=11", id),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["flow_rate"], 11.0);
}

/// Renaming onto a taken name is a clean conflict and changes nothing.
#[tokio::test]
async fn test_update_rename_collision_conflicts() {
    let app = app().await;
    let (_, first) = create(&app, V1).await;
    let (_, second) = create(&app, "name=V2&description=d2&type=Ball&flow_rate=2").await;
    let second_id = second["id"].as_i64().unwrap();

    let (status, body) = update(
        &app,
        &format!("id={}&name=V1&description=x&type=x&flow_rate=0", second_id),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["message"],
        "A valve with the same name is already in the catalog"
    );
    assert_eq!(list(&app).await, vec![first, second]);
}

#[tokio::test]
async fn test_update_missing_id_is_unprocessable() {
    let app = app().await;

    let (status, _) = update(&app, "name=V1&description=d&type=Gate&flow_rate=1").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// =============================================================================
// End-to-end example
// =============================================================================

#[tokio::test]
async fn test_create_conflict_delete_sequence() {
    let app = app().await;

    let (status, body) = create(&app, V1).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["id"].as_i64().is_some());

    assert_eq!(create(&app, V1).await.0, StatusCode::CONFLICT);
    assert_eq!(delete(&app, "V1").await.0, StatusCode::OK);
    assert_eq!(delete(&app, "V1").await.0, StatusCode::NOT_FOUND);
}

// =============================================================================
// Storage failures
// =============================================================================

/// A create that fails for any reason other than a duplicate name is a 400
/// with a generic message.
#[tokio::test]
async fn test_create_on_unavailable_store_is_bad_request() {
    let app = app_with_closed_store().await;

    let (status, body) = create(&app, V1).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "Could not save the new valve" }));
}

/// Listing hides the storage cause behind a 500.
#[tokio::test]
async fn test_list_on_unavailable_store_is_internal_error() {
    let app = app_with_closed_store().await;

    let (status, body) = send(&app, empty_request(Method::GET, "/valves")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": "Internal storage error" }));
}

#[tokio::test]
async fn test_update_on_unavailable_store_is_internal_error() {
    let app = app_with_closed_store().await;

    let (status, body) = update(
        &app,
        "id=1&name=V1&description=Block+valve&type=Gate&flow_rate=15200",
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": "Internal storage error" }));
}

#[tokio::test]
async fn test_delete_on_unavailable_store_is_internal_error() {
    let app = app_with_closed_store().await;

    let (status, body) = delete(&app, "V1").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": "Internal storage error" }));
}

#[tokio::test]
async fn test_health_reports_unavailable_database() {
    let app = app_with_closed_store().await;

    let (status, body) = send(&app, empty_request(Method::GET, "/health")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "unavailable");
}

// =============================================================================
// Explorer, assets, health
// =============================================================================

#[tokio::test]
async fn test_root_redirects_to_explorer() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(empty_request(Method::GET, "/"))
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(
        response.headers()[header::LOCATION],
        "/openapi/swagger"
    );
}

#[tokio::test]
async fn test_explorer_and_document_served() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(empty_request(Method::GET, "/openapi/swagger"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, doc) = send(&app, empty_request(Method::GET, "/openapi/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(doc["openapi"], "3.0.3");
    assert!(doc["paths"]["/valves"]["get"].is_object());
}

#[tokio::test]
async fn test_favicon_served() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(empty_request(Method::GET, "/favicon.ico"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/x-icon");
}

#[tokio::test]
async fn test_health_reports_database() {
    let app = app().await;

    let (status, body) = send(&app, empty_request(Method::GET, "/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn test_cors_allows_any_origin_by_default() {
    let app = app().await;
    let request = Request::builder()
        .method(Method::GET)
        .uri("/valves")
        .header(header::ORIGIN, "http://explorer.example")
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}
