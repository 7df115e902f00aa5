mod common;

use ai_model_service::ModelOutput;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use item_qa::ModelVariant;
use tower::util::ServiceExt; // for `oneshot`

use common::{StubModel, app, json_body};

fn get_health() -> Request<Body> {
    Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn health_reports_variant_and_backend() {
    let app = app(
        ModelVariant::Summarization,
        StubModel::replying(ModelOutput::text("x")),
    );

    let resp = app.oneshot(get_health()).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["variant"], "summarization");
    assert_eq!(body["ok"], true);
    assert_eq!(body["model"], "stub");
}

#[tokio::test]
async fn health_is_503_when_backend_is_down() {
    let app = app(ModelVariant::Extractive, StubModel::failing("down"));

    let resp = app.oneshot(get_health()).await.unwrap();

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = json_body(resp).await;
    assert_eq!(body["ok"], false);
    assert_eq!(body["message"], "backend down");
}

#[tokio::test]
async fn cors_preflight_allows_any_origin() {
    let app = app(
        ModelVariant::Extractive,
        StubModel::replying(ModelOutput::text("x")),
    );

    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/generate")
        .header(header::ORIGIN, "http://localhost:8080")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert!(resp.status().is_success());
    let h = resp.headers();
    assert_eq!(
        h.get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
    let methods = h
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    assert!(methods.contains("POST"));
    let headers = h
        .get(header::ACCESS_CONTROL_ALLOW_HEADERS)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    assert!(headers.to_ascii_lowercase().contains("content-type"));
}
