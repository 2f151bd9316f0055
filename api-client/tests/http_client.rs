use api_client::{ApiConfig, ApiError, ContentApi, HttpContentApi, ListRequest, ParentRef, SearchRequest};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use entities::EntityType;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone, Default)]
struct Fixture {
    flaky_hits: Arc<AtomicUsize>,
    last_query: Arc<std::sync::Mutex<HashMap<String, String>>>,
}

fn node(id: &str, name: &str, name_en: &str) -> Value {
    json!({ "id": id, "name": name, "nameEn": name_en, "order": 1 })
}

async fn categories(
    State(fixture): State<Fixture>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    *fixture.last_query.lock().unwrap() = params;
    Json(json!({
        "data": [node("c1", "الحوكمة", "Governance")],
        "pagination": { "currentPage": 1, "pagesCount": 1, "itemsCount": 1, "pageSize": 10 }
    }))
}

async fn categories_by_parent(Path(parent): Path<String>) -> Json<Value> {
    Json(json!({
        "data": [node("s1", "كلمات المرور", "Passwords"), node("s2", "النسخ الاحتياطي", "Backups")],
        // backend sends an off-by-one page count
        "pagination": { "currentPage": 1, "pagesCount": 3, "itemsCount": 2, "pageSize": 10 },
        "parent": parent
    }))
}

async fn category(Path(id): Path<String>) -> impl IntoResponse {
    if id == "c1" {
        Json(node("c1", "الحوكمة", "Governance")).into_response()
    } else {
        (StatusCode::NOT_FOUND, Json(json!({ "title": "Not Found" }))).into_response()
    }
}

async fn search(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let query = params.get("query").cloned().unwrap_or_default();
    let hit = |id: &str, entity_type: &str| {
        json!({ "id": id, "entityType": entity_type, "title": "التصيد", "titleEn": "Phishing" })
    };
    Json(json!({
        "allResults": [hit("n1", "News"), hit("d1", "Definition"), hit("n2", "News")],
        "metadata": {
            "query": query,
            "totalResults": 3,
            "executionTimeMs": 4,
            "entityTypesWithResultsList": ["News", "Definition"]
        },
        "pagination": { "currentPage": 1, "pagesCount": 1, "itemsCount": 3, "pageSize": 10 }
    }))
}

async fn flaky(State(fixture): State<Fixture>) -> impl IntoResponse {
    if fixture.flaky_hits.fetch_add(1, Ordering::SeqCst) < 2 {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "message": "warming up" })),
        )
            .into_response();
    }
    Json(json!({
        "data": [],
        "pagination": { "currentPage": 1, "pagesCount": 0, "itemsCount": 0, "pageSize": 10 }
    }))
    .into_response()
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(2)).await;
    Json(json!({ "data": [], "pagination": {} }))
}

async fn broken() -> impl IntoResponse {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": "pageSize too large" })))
}

async fn spawn_backend() -> (String, Fixture) {
    let fixture = Fixture::default();
    let app = Router::new()
        .route("/api/health", get(|| async { "Healthy" }))
        .route("/api/categories", get(categories))
        .route("/api/categories/by-parent/:parent", get(categories_by_parent))
        .route("/api/categories/:id", get(category))
        .route("/api/search", get(search))
        .route("/api/flaky", get(flaky))
        .route("/api/slow", get(slow))
        .route("/api/broken", get(broken))
        .with_state(fixture.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/api", addr), fixture)
}

fn client(base_url: &str) -> HttpContentApi {
    HttpContentApi::new(
        ApiConfig::new()
            .with_base_url(base_url)
            .with_timeout(Duration::from_millis(500))
            .with_retries(2, Duration::from_millis(10)),
    )
    .unwrap()
}

#[tokio::test]
async fn test_list_root_sends_paging_and_query() {
    let (base, fixture) = spawn_backend().await;
    let api = client(&base);

    let page = api
        .list(
            &ListRequest::new("categories", ParentRef::Root)
                .page(1, 10)
                .query(Some("gov")),
        )
        .await
        .unwrap();

    assert_eq!(page.data[0].id, "c1");
    let sent = fixture.last_query.lock().unwrap().clone();
    assert_eq!(sent.get("page").map(String::as_str), Some("1"));
    assert_eq!(sent.get("pageSize").map(String::as_str), Some("10"));
    assert_eq!(sent.get("query").map(String::as_str), Some("gov"));
}

#[tokio::test]
async fn test_list_by_parent_normalizes_pagination() {
    let (base, _) = spawn_backend().await;
    let api = client(&base);

    let page = api
        .list(&ListRequest::new("categories", ParentRef::Id("c1".into())))
        .await
        .unwrap();

    assert_eq!(page.data.len(), 2);
    assert_eq!(page.pagination.pages_count, 1);
    assert_eq!(page.pagination.items_count, 2);
}

#[tokio::test]
async fn test_unresolved_parent_is_rejected_without_a_request() {
    let api = client("http://127.0.0.1:9/api");
    let result = api
        .list(&ListRequest::new("categories", ParentRef::Unresolved))
        .await;
    assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
}

#[tokio::test]
async fn test_get_by_id_maps_404_to_not_found() {
    let (base, _) = spawn_backend().await;
    let api = client(&base);

    let found = api.get_by_id("categories", "c1").await.unwrap();
    assert_eq!(found.name_en.as_deref(), Some("Governance"));

    let missing = api.get_by_id("categories", "c9").await;
    assert!(matches!(missing, Err(ApiError::NotFound(_))));
}

#[tokio::test]
async fn test_search_fills_in_results_by_type() {
    let (base, _) = spawn_backend().await;
    let api = client(&base);

    let response = api
        .search(&SearchRequest {
            query: "phishing".into(),
            page: 1,
            page_size: 10,
        })
        .await
        .unwrap();

    assert_eq!(response.metadata.query, "phishing");
    assert!(response.is_partitioned());
    assert_eq!(response.results_for(EntityType::News).len(), 2);
    assert_eq!(
        response.results_for(EntityType::News),
        response.filter_all(EntityType::News)
    );
}

#[tokio::test]
async fn test_transient_failures_are_retried() {
    let (base, fixture) = spawn_backend().await;
    let api = client(&base);

    let page = api
        .list(&ListRequest::new("flaky", ParentRef::Root))
        .await
        .unwrap();

    assert!(page.data.is_empty());
    assert_eq!(fixture.flaky_hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_retries_give_up_after_limit() {
    let (base, fixture) = spawn_backend().await;
    let api = HttpContentApi::new(
        ApiConfig::new()
            .with_base_url(base.as_str())
            .with_retries(1, Duration::from_millis(10)),
    )
    .unwrap();

    let result = api.list(&ListRequest::new("flaky", ParentRef::Root)).await;
    assert_eq!(
        result.unwrap_err(),
        ApiError::Http {
            status: 503,
            message: "warming up".into()
        }
    );
    assert_eq!(fixture.flaky_hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let (base, _) = spawn_backend().await;
    let api = client(&base);

    let result = api.list(&ListRequest::new("broken", ParentRef::Root)).await;
    assert_eq!(
        result.unwrap_err(),
        ApiError::Http {
            status: 400,
            message: "pageSize too large".into()
        }
    );
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let (base, _) = spawn_backend().await;
    let api = HttpContentApi::new(
        ApiConfig::new()
            .with_base_url(base.as_str())
            .with_timeout(Duration::from_millis(100))
            .with_retries(0, Duration::from_millis(10)),
    )
    .unwrap();

    let result = api.list(&ListRequest::new("slow", ParentRef::Root)).await;
    assert!(matches!(result, Err(ApiError::Timeout(_))));
}

#[tokio::test]
async fn test_health() {
    let (base, _) = spawn_backend().await;
    assert!(client(&base).health().await.is_ok());
    assert!(client("http://127.0.0.1:9/api").health().await.is_err());
}
