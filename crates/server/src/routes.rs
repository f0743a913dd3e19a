pub mod orders;
pub mod pets;

use axum::{routing::get, Json, Router};
use common::types::{Health, LIVENESS_MESSAGE};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use crate::openapi::ApiDoc;
use crate::state::AppState;

pub async fn root() -> &'static str {
    LIVENESS_MESSAGE
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse))
)]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: liveness, pet and order resources, API docs.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json));

    // "/pets/recent" 是静态段，优先于 "/pets/:id" 匹配
    let resources = Router::new()
        .route("/pets", get(pets::list).post(pets::create))
        .route("/pets/recent", get(pets::recent))
        .route("/pets/:id", get(pets::get).patch(pets::update).delete(pets::delete))
        .route("/orders", get(orders::list).post(orders::create))
        .route("/orders/:id", get(orders::get).patch(orders::update).delete(orders::delete));

    public
        .merge(resources)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // 响应返回时打点，包含状态码与耗时
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use service::storage::Storage;
    use tower::ServiceExt;

    fn app() -> Router {
        build_router(AppState::new(Storage::in_memory()), CorsLayer::very_permissive())
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let mut req = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                req = req.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let res = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    fn json_of(bytes: &[u8]) -> Value { serde_json::from_slice(bytes).unwrap() }

    #[tokio::test]
    async fn root_returns_liveness_text() {
        let (status, body) = call(&app(), Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, LIVENESS_MESSAGE.as_bytes());
    }

    #[tokio::test]
    async fn recent_is_not_captured_by_id_route() {
        let (status, body) = call(&app(), Method::GET, "/pets/recent", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_of(&body), json!([]));
    }

    #[tokio::test]
    async fn missing_pet_is_404_with_error_body() {
        let (status, body) = call(&app(), Method::GET, "/pets/unknown-id", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json_of(&body), json!({ "error": "Pet not found" }));
    }

    #[tokio::test]
    async fn create_pet_requires_name_and_category() {
        let (status, body) = call(&app(), Method::POST, "/pets", Some(json!({ "name": "Rex" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json_of(&body), json!({ "error": "Missing required fields: name, category" }));
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/orders")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let res = app().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = json_of(&to_bytes(res.into_body(), usize::MAX).await.unwrap());
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn order_with_unknown_product_is_400() {
        let app = app();
        let body = json!({ "productId": uuid::Uuid::new_v4().to_string(), "buyerName": "Ann" });
        let (status, resp) = call(&app, Method::POST, "/orders", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json_of(&resp), json!({ "error": "Invalid productId" }));

        let (status, resp) = call(&app, Method::GET, "/orders", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_of(&resp), json!([]));
    }

    #[tokio::test]
    async fn openapi_lists_resource_paths() {
        let (status, body) = call(&app(), Method::GET, "/api-docs/openapi.json", None).await;
        assert_eq!(status, StatusCode::OK);
        let doc = json_of(&body);
        assert!(doc["paths"]["/pets/recent"].is_object());
        assert!(doc["paths"]["/orders/{id}"].is_object());
    }
}
