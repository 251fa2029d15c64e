//! # HTTP Tests
//!
//! Request/response round trips against the router, without binding a socket.

mod common;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use common::*;
use image::Rgba;
use placard::{
    Renderer,
    legacy::LegacyPolicy,
    render::RenderOptions,
    server::{AppState, ServerConfig, router},
};
use serde_json::{Value, json};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

fn app(renderer: Renderer, root: &Path) -> Router {
    let config = ServerConfig {
        listen_addr: "127.0.0.1:0".to_string(),
        render: RenderOptions {
            templates_dir: root.to_path_buf(),
            ..Default::default()
        },
    };
    router(Arc::new(AppState::with_renderer(config, renderer)))
}

fn generate(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

#[tokio::test]
async fn test_health() {
    let dir = template_dir();
    let app = app(renderer(dir.path(), Vec::new(), LegacyPolicy::default()), dir.path());

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_generate_png() {
    let dir = template_dir();
    let app = app(renderer(dir.path(), Vec::new(), LegacyPolicy::default()), dir.path());

    let response = app
        .oneshot(generate(json!({
            "template": "match.svg",
            "titulo": "FINAL",
            "logo1": data_uri(10, 10, BLUE),
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");

    let pixels = decode(&body_bytes(response).await);
    assert_eq!(pixels.dimensions(), (300, 200));
    assert_eq!(pixels.get_pixel(60, 60), &Rgba(BLUE));
}

#[tokio::test]
async fn test_generate_missing_template_is_404() {
    let dir = template_dir();
    let app = app(renderer(dir.path(), Vec::new(), LegacyPolicy::default()), dir.path());

    let response = app
        .oneshot(generate(json!({ "template": "nope.svg" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let message = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(message.to_lowercase().contains("template not found"));
}

#[tokio::test]
async fn test_generate_missing_config_is_404() {
    let dir = template_dir();
    let app = app(renderer(dir.path(), Vec::new(), LegacyPolicy::default()), dir.path());

    let response = app
        .oneshot(generate(json!({ "template": "legacy.svg" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let message = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(message.to_lowercase().contains("configuration not found"));
}

#[tokio::test]
async fn test_generate_unreachable_logo_is_500() {
    let dir = template_dir();
    let app = app(http_renderer(dir.path(), LegacyPolicy::default()), dir.path());

    let response = app
        .oneshot(generate(json!({
            "template": "match.svg",
            "logo1": "http://127.0.0.1:1/logo.png",
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_ne!(response.headers()[header::CONTENT_TYPE], "image/png");
    let message = String::from_utf8(body_bytes(response).await).unwrap();
    assert_eq!(message, "Failed to generate image.");
}

#[tokio::test]
async fn test_generate_traversal_is_400() {
    let dir = template_dir();
    let app = app(renderer(dir.path(), Vec::new(), LegacyPolicy::default()), dir.path());

    let response = app
        .oneshot(generate(json!({ "template": "../../etc/passwd" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_generate_without_template_field_is_400() {
    let dir = template_dir();
    let app = app(renderer(dir.path(), Vec::new(), LegacyPolicy::default()), dir.path());

    let response = app
        .oneshot(generate(json!({ "titulo": "FINAL" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_generate_ignores_malformed_text_variables() {
    let dir = template_dir();
    let app = app(renderer(dir.path(), Vec::new(), LegacyPolicy::default()), dir.path());

    let response = app
        .oneshot(generate(json!({
            "template": "match.svg",
            "titulo": { "nested": true },
            "cor": null,
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let pixels = decode(&body_bytes(response).await);
    assert_eq!(pixels.get_pixel(150, 100), &Rgba(RED));
}
