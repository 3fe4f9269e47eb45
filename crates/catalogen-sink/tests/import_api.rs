//! Import API sink against a local stub of the auth and import services.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use catalogen_core::ProductDraft;
use catalogen_generate::RecordGenerator;
use catalogen_sink::{BatchSink, ImportApiConfig, ImportApiSink, SinkError};

const TOKEN: &str = "stub-token";
const REJECTING_CONTAINER: &str = "rejected";

#[derive(Default)]
struct ImportStub {
    token_requests: AtomicUsize,
    container_lookups: AtomicUsize,
    container_creates: AtomicUsize,
    draft_posts: AtomicUsize,
    container_exists: AtomicBool,
}

impl ImportStub {
    fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

type Shared = State<Arc<ImportStub>>;

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == format!("Bearer {TOKEN}"))
}

async fn issue_token(State(stub): Shared, headers: HeaderMap, body: String) -> Response {
    stub.token_requests.fetch_add(1, Ordering::SeqCst);
    let basic = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("Basic "));
    if !basic || !body.contains("grant_type=client_credentials") {
        return (StatusCode::UNAUTHORIZED, "bad client credentials").into_response();
    }
    Json(json!({
        "access_token": TOKEN,
        "token_type": "Bearer",
        "expires_in": 172800,
        "scope": "manage_project:demo"
    }))
    .into_response()
}

async fn get_container(
    State(stub): Shared,
    Path((_project, key)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    stub.container_lookups.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if stub.container_exists.load(Ordering::SeqCst) {
        Json(json!({"key": key, "resourceType": "product-draft", "version": 1})).into_response()
    } else {
        (StatusCode::NOT_FOUND, "container not found").into_response()
    }
}

async fn create_container(
    State(stub): Shared,
    Path(_project): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    stub.container_creates.fetch_add(1, Ordering::SeqCst);
    stub.container_exists.store(true, Ordering::SeqCst);
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn import_drafts(
    State(stub): Shared,
    Path((_project, key)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    stub.draft_posts.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if key == REJECTING_CONTAINER {
        return (
            StatusCode::BAD_REQUEST,
            r#"{"message":"Field 'sku' is invalid"}"#,
        )
            .into_response();
    }

    let resources = body["resources"].as_array().map_or(0, Vec::len);
    let statuses: Vec<Value> = (0..resources)
        .map(|index| json!({"operationId": format!("op-{index}"), "state": "processing"}))
        .collect();
    (StatusCode::CREATED, Json(json!({"operationStatus": statuses}))).into_response()
}

async fn start_stub(stub: Arc<ImportStub>) -> String {
    let app = Router::new()
        .route("/auth/oauth/token", post(issue_token))
        .route("/api/:project/import-containers", post(create_container))
        .route("/api/:project/import-containers/:key", get(get_container))
        .route(
            "/api/:project/product-drafts/import-containers/:key",
            post(import_drafts),
        )
        .with_state(stub);

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
    let addr = listener.local_addr().expect("stub address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve stub");
    });
    format!("http://{addr}")
}

fn sink_for(base_url: &str, container_key: &str) -> ImportApiSink {
    ImportApiSink::new(ImportApiConfig {
        auth_url: format!("{base_url}/auth"),
        api_url: format!("{base_url}/api"),
        project_key: "demo".to_string(),
        client_id: "client".to_string(),
        client_secret: "secret".to_string(),
        scopes: Vec::new(),
        container_key: container_key.to_string(),
    })
    .expect("import sink")
}

fn drafts(count: usize) -> Vec<ProductDraft> {
    RecordGenerator::new("default", "nl-BE")
        .expect("generator")
        .generate_batch(count)
        .expect("drafts")
}

#[tokio::test]
async fn creates_missing_container_once_and_reuses_token() {
    let stub = Arc::new(ImportStub::default());
    let base_url = start_stub(Arc::clone(&stub)).await;
    let mut sink = sink_for(&base_url, "products");

    for batch in 0..3 {
        let receipt = sink.send(batch, &drafts(5)).await.expect("send batch");
        assert_eq!(receipt.resources, 5);
        assert_eq!(receipt.operation_states.get("processing"), Some(&5));
    }
    let summary = sink.finish().await.expect("finish");

    assert_eq!(ImportStub::count(&stub.token_requests), 1);
    assert_eq!(ImportStub::count(&stub.container_lookups), 1);
    assert_eq!(ImportStub::count(&stub.container_creates), 1);
    assert_eq!(ImportStub::count(&stub.draft_posts), 3);
    assert_eq!(summary.batches, 3);
    assert_eq!(summary.resources, 15);
    assert_eq!(summary.operation_states.get("processing"), Some(&15));
    assert!(summary.destination.ends_with("/demo/product-drafts/import-containers/products"));
}

#[tokio::test]
async fn existing_container_is_not_recreated() {
    let stub = Arc::new(ImportStub::default());
    stub.container_exists.store(true, Ordering::SeqCst);
    let base_url = start_stub(Arc::clone(&stub)).await;
    let mut sink = sink_for(&base_url, "products");

    sink.send(0, &drafts(2)).await.expect("send batch");

    assert_eq!(ImportStub::count(&stub.container_lookups), 1);
    assert_eq!(ImportStub::count(&stub.container_creates), 0);
    assert_eq!(ImportStub::count(&stub.draft_posts), 1);
}

#[tokio::test]
async fn rejected_batch_reports_status_and_body() {
    let stub = Arc::new(ImportStub::default());
    let base_url = start_stub(Arc::clone(&stub)).await;
    let mut sink = sink_for(&base_url, REJECTING_CONTAINER);

    let err = sink.send(0, &drafts(3)).await.expect_err("import rejects batch");
    match err {
        SinkError::Status { url, status, body } => {
            assert_eq!(status, 400);
            assert!(url.ends_with("/product-drafts/import-containers/rejected"));
            assert!(body.contains("Field 'sku' is invalid"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(sink.finish().await.expect("finish").batches, 0);
}

#[tokio::test]
async fn oversized_batch_is_refused_before_any_request() {
    let stub = Arc::new(ImportStub::default());
    let base_url = start_stub(Arc::clone(&stub)).await;
    let mut sink = sink_for(&base_url, "products");

    let err = sink.send(0, &drafts(21)).await.expect_err("limit is 20");
    assert!(matches!(err, SinkError::Config(message) if message.contains("21 resources")));
    assert_eq!(ImportStub::count(&stub.token_requests), 0);
    assert_eq!(ImportStub::count(&stub.draft_posts), 0);
}
