//! HTTP API tests
//!
//! Drives the router directly with `tower::ServiceExt::oneshot`, no
//! listening socket required.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use clap::Parser;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::io::Write;
use std::sync::Arc;
use titlecat_core::{Engine, Taxonomy};
use titlecat_server::api::{self, AppContext};
use titlecat_server::settings::Settings;
use tower::ServiceExt;

fn test_context() -> AppContext {
    let settings = Settings::parse_from(["titlecat-server"]);
    let engine = Engine::new(Taxonomy::default_mappings(), settings.engine_config()).unwrap();
    AppContext {
        engine,
        settings: Arc::new(settings),
    }
}

fn app() -> Router {
    api::router(test_context())
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn categorise_single_title() {
    let (status, body) = post_json(
        app(),
        "/v1/categorise",
        json!({"title": "Senior Growth Manager"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["count"], 1);
    let result = &body["results"][0];
    assert_eq!(result["function"], "Marketing");
    assert_eq!(result["sub_function"], "Growth");
    assert_eq!(result["matched"], true);
    assert_eq!(result["confidence"], 1.0);
}

#[tokio::test]
async fn categorise_batch_preserves_order() {
    let (status, body) = post_json(
        app(),
        "/v1/categorise",
        json!({"titles": ["Backend Dev", "zzz qqq xyz", "Head of Paid Media"]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results[0]["original_title"], "Backend Dev");
    assert_eq!(results[1]["original_title"], "zzz qqq xyz");
    assert_eq!(results[1]["matched"], false);
    assert_eq!(results[2]["original_title"], "Head of Paid Media");
    assert_eq!(results[2]["matched"], true);
}

#[tokio::test]
async fn missing_fields_are_rejected() {
    let (status, body) = post_json(app(), "/v1/categorise", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert!(body["solution"].is_string());
}

#[tokio::test]
async fn blank_titles_are_rejected() {
    let (status, _) = post_json(app(), "/v1/categorise", json!({"title": "   "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(app(), "/v1/categorise", json!({"titles": ["", "  "]})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_batches_are_rejected() {
    let titles: Vec<String> = (0..101).map(|i| format!("Title {}", i)).collect();
    let (status, body) = post_json(app(), "/v1/categorise", json!({ "titles": titles })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("max 100"));
}

#[tokio::test]
async fn non_json_body_is_rejected() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/categorise")
                .body(Body::from("not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_and_ready_probes() {
    let (status, body) = get_json(app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = get_json(app(), "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["config_loaded"], true);
    assert!(body["taxonomy_version"].is_string());
}

#[tokio::test]
async fn index_documents_the_service() {
    let (status, body) = get_json(app(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "Job Title Categorization API");
    assert_eq!(body["config"]["max_titles_per_request"], 100);
}

#[tokio::test]
async fn wrong_methods_get_json_405() {
    let (status, body) = get_json(app(), "/v1/categorise").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Method not allowed");

    let (status, body) = post_json(app(), "/health", json!({})).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn unknown_routes_get_json_404() {
    let (status, body) = get_json(app(), "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn reload_without_config_path_is_rejected() {
    let (status, body) = post_json(app(), "/reload-config", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn reload_swaps_taxonomy_version() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(
        br#"
[[functions]]
name = "Marketing"

[[functions.sub_functions]]
name = "Growth"
keywords = ["growth"]
"#,
    )
    .unwrap();

    let mut settings = Settings::parse_from(["titlecat-server"]);
    settings.config_path = Some(file.path().to_path_buf());
    let engine = Engine::new(Taxonomy::default_mappings(), settings.engine_config()).unwrap();
    let before = engine.taxonomy_version().to_string();
    let ctx = AppContext {
        engine: engine.clone(),
        settings: Arc::new(settings),
    };

    let (status, body) = post_json(api::router(ctx), "/reload-config", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_ne!(body["taxonomy_version"].as_str().unwrap(), before);
    assert_ne!(engine.taxonomy_version().to_string(), before);
}
