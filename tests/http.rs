use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use wine_quality_service::app::router;
use wine_quality_service::data::loader::load_file;
use wine_quality_service::render::MAX_FEATURES;
use wine_quality_service::state::AppState;

/// Ten rows of quality 5 and two of quality 6; nothing scores 9.
fn write_dataset(dir: &Path) -> PathBuf {
    let mut csv = String::from("fixed acidity,pH,alcohol,color,quality\n");
    for i in 0..10 {
        let i = i as f64;
        csv.push_str(&format!(
            "{},{},{},red,5\n",
            7.0 + i * 0.1,
            3.1 + i * 0.02,
            9.0 + i * 0.3
        ));
    }
    csv.push_str("8.1,3.4,11.2,white,6\n");
    csv.push_str("7.9,3.3,12.5,white,6\n");
    let path = dir.join("winequality.csv");
    std::fs::write(&path, csv).unwrap();
    path
}

fn app(dir: &Path) -> Router {
    let dataset = load_file(&write_dataset(dir)).unwrap();
    let out = dir.join("plots");
    std::fs::create_dir_all(&out).unwrap();
    router(AppState::new(dataset, out))
}

async fn post_json(app: &Router, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/filter-wine/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn root_says_hello() {
    let dir = tempfile::tempdir().unwrap();
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app(dir.path()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "message": "Hello, Docker" }));
}

#[tokio::test]
async fn matching_quality_returns_rows_and_two_panel_image() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let (status, body) =
        post_json(&app, r#"{"quality": 5, "features": ["alcohol", "pH"]}"#).await;

    assert_eq!(status, StatusCode::OK);
    let rows = body["filtered_data"].as_array().unwrap();
    assert_eq!(rows.len(), 10);
    assert!(rows.iter().all(|r| r["quality"] == json!(5)));
    assert_eq!(rows[0]["color"], json!("red"));
    assert_eq!(rows[0]["alcohol"], json!(9.0));

    let path = PathBuf::from(body["visualization"].as_str().unwrap());
    assert!(path.starts_with(dir.path().join("plots")));
    assert_eq!(image::image_dimensions(&path).unwrap(), (800, 1000));
}

#[tokio::test]
async fn rows_keep_dataset_column_order() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let request = Request::builder()
        .method("POST")
        .uri("/filter-wine/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"quality": 6, "features": ["alcohol"]}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();

    assert!(text.contains(
        r#"{"fixed acidity":8.1,"pH":3.4,"alcohol":11.2,"color":"white","quality":6}"#
    ));
}

#[tokio::test]
async fn absent_quality_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let (status, body) = post_json(&app, r#"{"quality": 9, "features": ["alcohol"]}"#).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "detail": "No data found for the given quality" }));
    assert_eq!(std::fs::read_dir(dir.path().join("plots")).unwrap().count(), 0);
}

#[tokio::test]
async fn malformed_bodies_are_validation_errors() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    for body in [
        r#"{"quality": "five", "features": ["alcohol"]}"#,
        r#"{"quality": 5}"#,
        r#"{"features": ["alcohol"]}"#,
        r#"{"quality": 5, "features": "alcohol"}"#,
        r#"{"quality": 5, "features": []}"#,
        "not json",
    ] {
        let (status, reply) = post_json(&app, body).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "body {body}");
        assert!(reply["detail"].is_string(), "body {body}");
    }
    assert_eq!(std::fs::read_dir(dir.path().join("plots")).unwrap().count(), 0);
}

#[tokio::test]
async fn oversized_feature_list_is_a_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let features = vec!["pH"; MAX_FEATURES + 1];
    let body = json!({ "quality": 5, "features": features }).to_string();
    let (status, reply) = post_json(&app, &body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(reply["detail"].as_str().unwrap().contains("at most"));
    assert_eq!(std::fs::read_dir(dir.path().join("plots")).unwrap().count(), 0);

    let features = vec!["pH"; MAX_FEATURES];
    let body = json!({ "quality": 5, "features": features }).to_string();
    let (status, _) = post_json(&app, &body).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn missing_content_type_is_a_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let request = Request::builder()
        .method("POST")
        .uri("/filter-wine/")
        .body(Body::from(r#"{"quality": 5, "features": ["alcohol"]}"#))
        .unwrap();
    let response = app(dir.path()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn unknown_feature_is_a_server_error_without_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let (status, body) =
        post_json(&app, r#"{"quality": 5, "features": ["alcohol", "tannin"]}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().contains("tannin"));
    assert_eq!(std::fs::read_dir(dir.path().join("plots")).unwrap().count(), 0);
}

#[tokio::test]
async fn non_numeric_feature_is_a_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let (status, body) = post_json(&app, r#"{"quality": 5, "features": ["color"]}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().contains("not numeric"));
}

#[tokio::test]
async fn repeated_request_is_stable() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());
    let request = r#"{"quality": 5, "features": ["alcohol", "pH"]}"#;

    let (first_status, first) = post_json(&app, request).await;
    let first_path = PathBuf::from(first["visualization"].as_str().unwrap());
    assert!(first_path.exists());

    let (second_status, second) = post_json(&app, request).await;
    let second_path = PathBuf::from(second["visualization"].as_str().unwrap());

    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first["filtered_data"], second["filtered_data"]);
    assert_eq!(first_path, second_path);
    assert!(second_path.exists());
}

#[tokio::test]
async fn different_features_get_different_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let (_, one) = post_json(&app, r#"{"quality": 5, "features": ["alcohol"]}"#).await;
    let (_, two) = post_json(&app, r#"{"quality": 5, "features": ["alcohol", "pH"]}"#).await;

    let one = PathBuf::from(one["visualization"].as_str().unwrap());
    let two = PathBuf::from(two["visualization"].as_str().unwrap());
    assert_ne!(one, two);
    assert_eq!(image::image_dimensions(&one).unwrap(), (800, 500));
    assert_eq!(image::image_dimensions(&two).unwrap(), (800, 1000));
}

#[tokio::test]
async fn concurrent_requests_all_succeed() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move {
                post_json(&app, r#"{"quality": 5, "features": ["alcohol", "pH"]}"#).await
            })
        })
        .collect();

    let mut paths = Vec::new();
    for handle in handles {
        let (status, body) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        paths.push(PathBuf::from(body["visualization"].as_str().unwrap()));
    }
    paths.dedup();
    assert_eq!(paths.len(), 1);
    assert_eq!(image::image_dimensions(&paths[0]).unwrap(), (800, 1000));
}
