use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::admin_http::admin_router;
use configs::AppConfig;
use service::hooks::{HookError, MutationEvent, PostCommitHook};
use service::simulation::{RandomSource, SequenceRandom, ThreadRandom};
use service::{ConsoleService, ConsoleStore};

use server::AppState;

fn unseeded() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.console.seed_sample_data = false;
    cfg
}

async fn app_with(cfg: AppConfig, rng: Arc<dyn RandomSource>) -> Router {
    let state = server::build_state(&cfg, rng).await.expect("state");
    server::app(state)
}

async fn empty_app() -> Router {
    app_with(unseeded(), Arc::new(ThreadRandom)).await
}

async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<String>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(text) => {
            req = req.header(header::CONTENT_TYPE, "application/json");
            Body::from(text)
        }
        None => Body::empty(),
    };
    let res = app.clone().oneshot(req.body(body).expect("request")).await.expect("response");
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.expect("body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    send_raw(app, method, uri, body.map(|v| v.to_string())).await
}

async fn get(app: &Router, uri: &str) -> Value {
    let (status, body) = send(app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::OK, "GET {uri}: {body}");
    body
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

fn function(name: &str) -> Value {
    json!({
        "name": name,
        "runtime": "Node.js 18",
        "trigger": "HTTP",
        "code": "exports.handler = () => {}"
    })
}

fn len(v: &Value) -> usize {
    v.as_array().map(Vec::len).unwrap_or_default()
}

fn ts(v: &Value) -> DateTime<Utc> {
    v.as_str().expect("timestamp string").parse().expect("rfc3339")
}

#[tokio::test]
async fn function_ids_are_sequential_and_never_reused() {
    let app = empty_app().await;
    for i in 1..=3u64 {
        let (status, body) = post(&app, "/api/functions", function(&format!("fn-{i}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], json!(i));
        assert_eq!(body["status"], "Active");
        assert!(body["deployed"].is_string());
    }
    let (status, body) = send(&app, Method::DELETE, "/api/functions/2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));

    let (_, next) = post(&app, "/api/functions", function("fn-4")).await;
    assert_eq!(next["id"], json!(4));
    let ids: Vec<u64> = get(&app, "/api/functions")
        .await
        .as_array()
        .expect("array")
        .iter()
        .map(|f| f["id"].as_u64().expect("id"))
        .collect();
    assert_eq!(ids, vec![1, 3, 4]);
}

#[tokio::test]
async fn function_get_and_partial_update() {
    let app = empty_app().await;
    post(&app, "/api/functions", function("resize")).await;
    let (status, updated) = send(
        &app,
        Method::PUT,
        "/api/functions/1",
        Some(json!({"runtime": "Go 1.21"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["runtime"], "Go 1.21");
    assert_eq!(updated["name"], "resize");
    assert_eq!(get(&app, "/api/functions/1").await, updated);

    let (status, _) = send(&app, Method::PUT, "/api/functions/7", Some(json!({"code": "x"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_code_is_rejected_before_the_store() {
    let app = empty_app().await;
    let (status, body) = post(
        &app,
        "/api/functions",
        json!({"name": "a", "runtime": "r", "trigger": "HTTP"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation Error");
    assert!(body["detail"].is_string());

    let (status, _) = send_raw(
        &app,
        Method::POST,
        "/api/functions",
        Some("{not json".into()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(
        &app,
        "/api/functions",
        json!({"name": "a", "runtime": "r", "trigger": "HTTP", "code": 5}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(len(&get(&app, "/api/functions").await), 0);
    assert_eq!(len(&get(&app, "/api/logs").await), 0);
}

#[tokio::test]
async fn deleting_unknown_function_is_404_without_log() {
    let app = empty_app().await;
    let (status, body) = send(&app, Method::DELETE, "/api/functions/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
    let (status, _) = send(&app, Method::DELETE, "/api/functions/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(len(&get(&app, "/api/logs").await), 0);
}

#[tokio::test]
async fn document_count_follows_creates_and_deletes() {
    let app = empty_app().await;
    let (_, col) = post(&app, "/api/collections", json!({"name": "users"})).await;
    let col_id = col["id"].as_u64().expect("id");
    assert_eq!(col["documentCount"], 0);

    let mut doc_ids = Vec::new();
    for i in 0..3 {
        let (status, doc) = post(
            &app,
            &format!("/api/collections/{col_id}/documents"),
            json!({"data": {"n": i}}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(doc["collectionId"], json!(col_id));
        doc_ids.push(doc["id"].as_u64().expect("id"));
    }
    let count = |cols: Value| cols[0]["documentCount"].as_u64().expect("count");
    assert_eq!(count(get(&app, "/api/collections").await), 3);

    send(&app, Method::DELETE, &format!("/api/documents/{}", doc_ids[0]), None).await;
    assert_eq!(count(get(&app, "/api/collections").await), 2);

    for id in &doc_ids[1..] {
        send(&app, Method::DELETE, &format!("/api/documents/{id}"), None).await;
    }
    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/documents/{}", doc_ids[0]),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(count(get(&app, "/api/collections").await), 0);
}

#[tokio::test]
async fn document_in_unknown_collection_is_400() {
    let app = empty_app().await;
    let (status, body) = post(&app, "/api/collections/42/documents", json!({"data": {}})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation Error");
    assert_eq!(len(&get(&app, "/api/collections/42/documents").await), 0);
}

#[tokio::test]
async fn document_update_keeps_created_at() {
    let app = empty_app().await;
    post(&app, "/api/collections", json!({"name": "orders"})).await;
    let (_, doc) = post(
        &app,
        "/api/collections/1/documents",
        json!({"documentId": "o-1", "data": {"x": 0}}),
    )
    .await;
    let (status, updated) = send(
        &app,
        Method::PUT,
        "/api/documents/1",
        Some(json!({"data": {"x": 1}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"], json!({"x": 1}));
    assert_eq!(updated["documentId"], "o-1");
    assert_eq!(ts(&updated["createdAt"]), ts(&doc["createdAt"]));
    assert!(ts(&updated["updatedAt"]) > ts(&doc["updatedAt"]));
}

#[tokio::test]
async fn query_previews_three_documents_with_full_count() {
    let app = empty_app().await;
    post(&app, "/api/collections", json!({"name": "products"})).await;
    for i in 0..5 {
        post(&app, "/api/collections/1/documents", json!({"data": {"sku": i}})).await;
    }
    let (status, body) = post(
        &app,
        "/api/query",
        json!({"collectionId": 1, "field": "sku", "operator": ">", "value": 2}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(len(&body["results"]), 3);
    assert_eq!(body["count"], 5);
    let logs = get(&app, "/api/logs?limit=1").await;
    assert_eq!(logs[0]["message"], "Query executed: sku > 2");
}

#[tokio::test]
async fn query_accepts_string_collection_ids() {
    let app = empty_app().await;
    post(&app, "/api/collections", json!({"name": "products"})).await;
    post(&app, "/api/collections/1/documents", json!({"data": {"sku": 1}})).await;

    let (status, body) = post(&app, "/api/query", json!({"collectionId": "1"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);

    let (status, body) = post(&app, "/api/query", json!({"collectionId": "products"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"results": [], "count": 0}));
}

#[tokio::test]
async fn committed_mutations_show_up_on_admin_metrics() {
    let app = empty_app().await;
    let (status, _) = post(&app, "/api/functions", function("counted")).await;
    assert_eq!(status, StatusCode::OK);

    let admin = admin_router(service::metrics::encode_metrics);
    let req = Request::builder().uri("/metrics").body(Body::empty()).expect("request");
    let res = admin.oneshot(req).await.expect("response");
    assert_eq!(res.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.expect("body");
    let text = String::from_utf8(bytes.to_vec()).expect("utf8");
    assert!(
        text.contains(r#"cloud_console_mutations_total{collection="functions",op="create"}"#),
        "{text}"
    );
}

#[tokio::test]
async fn logs_filter_sort_and_limit() {
    let app = empty_app().await;
    post(&app, "/api/iam/users", json!({"email": "a@example.com", "role": "Viewer"})).await;
    post(&app, "/api/functions", function("noise")).await;
    post(&app, "/api/logs", json!({"service": "IAM", "level": "ERROR", "message": "denied"})).await;
    post(&app, "/api/iam/users", json!({"email": "b@example.com", "role": "Editor"})).await;

    let logs = get(&app, "/api/logs?service=IAM&level=INFO").await;
    let msgs: Vec<&str> = logs
        .as_array()
        .expect("array")
        .iter()
        .map(|e| e["message"].as_str().expect("msg"))
        .collect();
    assert_eq!(
        msgs,
        vec![
            "User 'b@example.com' added with role 'Editor'",
            "User 'a@example.com' added with role 'Viewer'"
        ]
    );
    assert!(logs
        .as_array()
        .expect("array")
        .iter()
        .all(|e| e["service"] == "IAM" && e["level"] == "INFO"));

    assert_eq!(len(&get(&app, "/api/logs?service=IAM&level=INFO&limit=1").await), 1);
    assert_eq!(len(&get(&app, "/api/logs?service=All%20Services&level=All%20Levels").await), 4);
    assert_eq!(len(&get(&app, "/api/logs?limit=0").await), 4);

    let (status, body) = send(&app, Method::GET, "/api/logs?limit=many", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation Error");
}

#[tokio::test]
async fn default_log_limit_applies_without_query_limit() {
    let mut cfg = unseeded();
    cfg.console.default_log_limit = Some(1);
    let app = app_with(cfg, Arc::new(ThreadRandom)).await;
    post(&app, "/api/functions", function("a")).await;
    post(&app, "/api/functions", function("b")).await;
    assert_eq!(len(&get(&app, "/api/logs").await), 1);
    assert_eq!(len(&get(&app, "/api/logs?limit=5").await), 2);
}

#[tokio::test]
async fn endpoint_test_response_time_stays_in_window() {
    let app = empty_app().await;
    for _ in 0..50 {
        let (status, body) = post(
            &app,
            "/api/endpoints/test",
            json!({"method": "GET", "url": "/api/users"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let rt = body["responseTime"].as_u64().expect("responseTime");
        assert!((100..600).contains(&rt), "{rt}");
        assert_eq!(body["status"], 200);
        assert_eq!(body["response"], json!({"success": true, "message": "API test successful"}));
    }
}

#[tokio::test]
async fn endpoint_test_is_reproducible_with_sequence_source() {
    let app = app_with(unseeded(), Arc::new(SequenceRandom::new(vec![150, 420]))).await;
    let mut seen = Vec::new();
    for _ in 0..3 {
        let (_, body) = post(&app, "/api/endpoints/test", json!({})).await;
        seen.push(body["responseTime"].as_u64().expect("responseTime"));
    }
    assert_eq!(seen, vec![150, 420, 150]);
    let logs = get(&app, "/api/logs?limit=1").await;
    assert_eq!(logs[0]["message"], "API request processed: GET /");

    let (status, _) = send_raw(&app, Method::POST, "/api/endpoints/test", Some("[".into())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn endpoint_crud_applies_defaults() {
    let app = empty_app().await;
    let (status, ep) = post(
        &app,
        "/api/endpoints",
        json!({"path": "/api/orders", "method": "GET"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ep["status"], "Healthy");
    assert_eq!(ep["requestsPerMin"], 0);
    assert_eq!(ep["avgResponseTime"], 0);

    let (_, updated) = send(
        &app,
        Method::PUT,
        "/api/endpoints/1",
        Some(json!({"requestsPerMin": 30})),
    )
    .await;
    assert_eq!(updated["requestsPerMin"], 30);
    assert_eq!(updated["path"], "/api/orders");

    let (status, _) = post(
        &app,
        "/api/endpoints",
        json!({"path": "orders", "method": "GET"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::DELETE, "/api/endpoints/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(len(&get(&app, "/api/endpoints").await), 0);
}

#[tokio::test]
async fn duplicates_are_rejected_and_not_stored() {
    let app = empty_app().await;
    post(&app, "/api/functions", function("dup")).await;
    assert_eq!(post(&app, "/api/functions", function("dup")).await.0, StatusCode::BAD_REQUEST);
    assert_eq!(len(&get(&app, "/api/functions").await), 1);

    post(&app, "/api/collections", json!({"name": "users"})).await;
    let (status, _) = post(&app, "/api/collections", json!({"name": "users"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    post(&app, "/api/iam/users", json!({"email": "x@example.com", "role": "Owner"})).await;
    assert_eq!(
        post(&app, "/api/iam/users", json!({"email": "x@example.com", "role": "Viewer"})).await.0,
        StatusCode::BAD_REQUEST
    );

    let sa = |name: &str, email: &str| json!({"name": name, "email": email, "roles": []});
    let accounts = "/api/iam/service-accounts";
    assert_eq!(post(&app, accounts, sa("runner", "runner@p.iam")).await.0, StatusCode::OK);
    assert_eq!(post(&app, accounts, sa("runner", "other@p.iam")).await.0, StatusCode::BAD_REQUEST);
    assert_eq!(post(&app, accounts, sa("other", "runner@p.iam")).await.0, StatusCode::BAD_REQUEST);
    assert_eq!(len(&get(&app, "/api/iam/service-accounts").await), 1);
}

#[tokio::test]
async fn iam_update_delete_and_security_policies() {
    let app = empty_app().await;
    let (_, user) = post(
        &app,
        "/api/iam/users",
        json!({"email": "dev@example.com", "role": "Editor"}),
    )
    .await;
    assert_eq!(user["status"], "Active");
    let (_, updated) = send(
        &app,
        Method::PUT,
        "/api/iam/users/1",
        Some(json!({"role": "Owner"})),
    )
    .await;
    assert_eq!(updated["role"], "Owner");
    assert_eq!(send(&app, Method::DELETE, "/api/iam/users/1", None).await.0, StatusCode::OK);
    assert_eq!(send(&app, Method::DELETE, "/api/iam/users/1", None).await.0, StatusCode::NOT_FOUND);

    let (_, sa) = post(
        &app,
        "/api/iam/service-accounts",
        json!({"name": "ci", "email": "ci@p.iam"}),
    )
    .await;
    assert_eq!(sa["roles"], json!([]));
    let (_, sa) = send(
        &app,
        Method::PUT,
        "/api/iam/service-accounts/1",
        Some(json!({"roles": ["Viewer"]})),
    )
    .await;
    assert_eq!(sa["roles"], json!(["Viewer"]));

    let (status, body) = post(&app, "/api/iam/security-policies", json!({"mfa": true})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));
    let logs = get(&app, "/api/logs?limit=1").await;
    assert_eq!(logs[0]["message"], "Security policies updated successfully");
}

struct Unavailable;

#[async_trait]
impl PostCommitHook for Unavailable {
    fn name(&self) -> &'static str { "unavailable" }
    async fn after_commit(&self, _event: &MutationEvent) -> Result<(), HookError> {
        Err(HookError::Failed { hook: "unavailable", reason: "sink down".into() })
    }
}

#[tokio::test]
async fn failing_hook_does_not_change_response() {
    let console = ConsoleService::new(Arc::new(ConsoleStore::new()), Arc::new(ThreadRandom))
        .with_hook(Arc::new(Unavailable));
    let app = server::app(AppState::new(console));
    let (status, body) = post(&app, "/api/collections", json!({"name": "events"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "events");
    assert_eq!(len(&get(&app, "/api/collections").await), 1);
}

#[tokio::test]
async fn seeded_console_serves_sample_data() {
    let app = app_with(AppConfig::default(), Arc::new(ThreadRandom)).await;
    assert_eq!(get(&app, "/health").await, json!({"status": "ok"}));
    assert_eq!(len(&get(&app, "/api/functions").await), 2);
    assert_eq!(len(&get(&app, "/api/endpoints").await), 2);
    assert_eq!(len(&get(&app, "/api/collections").await), 3);
    assert_eq!(len(&get(&app, "/api/iam/users").await), 2);
    assert_eq!(len(&get(&app, "/api/iam/service-accounts").await), 1);
    let warnings = get(&app, "/api/logs?level=WARNING").await;
    assert_eq!(warnings[0]["service"], "Cloud Endpoints");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = empty_app().await;
    let doc = get(&app, "/api-docs/openapi.json").await;
    assert!(doc["paths"]["/api/collections/{id}/documents"].is_object());
    assert!(doc["paths"]["/api/query"]["post"].is_object());
}
