//! Integration tests for the newsclass HTTP host
//!
//! Drives the router in-process with `tower::ServiceExt::oneshot`.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use newsclass_classifiers::{LoadedModel, ModelHolder, TextClassifier};
use newsclass_core::Result;
use newsclass_server::{create_router, AppState, ServerConfig};
use serde_json::{json, Value};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tower::ServiceExt;

const ARTIFACT_JSON: &str = r#"{
    "format_version": 1,
    "name": "newsgroups",
    "version": "test",
    "labels": ["sci.space", "rec.autos"],
    "classifier": {
        "type": "linear_bag_of_words",
        "vocabulary": {"orbit": 0, "shuttle": 1, "engine": 2, "sedan": 3},
        "coefficients": [[1.0, 1.0, -1.0, -1.0], [-1.0, -1.0, 1.0, 1.0]],
        "intercepts": [0.0, 0.0]
    }
}"#;

fn artifact_file() -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(ARTIFACT_JSON.as_bytes()).unwrap();
    file
}

fn router_for(holder: ModelHolder) -> Router {
    create_router(AppState::new(ServerConfig::default(), Arc::new(holder)))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn predict_request(text: &str) -> Request<Body> {
    Request::post("/prediction")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "text": text }).to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = router_for(ModelHolder::new("/nonexistent/model.json"));

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_prediction_with_loaded_artifact() {
    let file = artifact_file();
    let holder = ModelHolder::new(file.path());
    holder.load().unwrap();
    let app = router_for(holder);

    let (status, body) = send(app.clone(), predict_request("The shuttle reached orbit")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "category": "sci.space" }));

    let (status, body) = send(app, predict_request("sedan with a new engine")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "category": "rec.autos" }));
}

#[tokio::test]
async fn test_prediction_before_load_is_unavailable() {
    let holder = ModelHolder::new("/nonexistent/model.json");
    let _ = holder.load();
    let app = router_for(holder);

    let (status, body) = send(app, predict_request("anything")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["type"], "model_not_loaded");
}

#[tokio::test]
async fn test_out_of_range_index_is_server_error() {
    struct Five;

    impl TextClassifier for Five {
        fn classify(&self, _text: &str) -> Result<usize> {
            Ok(5)
        }
    }

    let holder = ModelHolder::with_loader("stub", |_: &Path| -> Result<LoadedModel> {
        let labels = ["sci.space", "rec.autos"].into_iter().collect();
        Ok(LoadedModel::new(Arc::new(Five), labels))
    });
    holder.load().unwrap();
    let app = router_for(holder);

    let (status, body) = send(app, predict_request("anything")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["type"], "prediction_error");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("class index 5 out of range for 2 labels"));
}

#[tokio::test]
async fn test_classifier_panic_is_internal_error() {
    struct Panicking;

    impl TextClassifier for Panicking {
        fn classify(&self, _text: &str) -> Result<usize> {
            panic!("classifier bug");
        }
    }

    let holder = ModelHolder::with_loader("stub", |_: &Path| -> Result<LoadedModel> {
        let labels = ["sci.space", "rec.autos"].into_iter().collect();
        Ok(LoadedModel::new(Arc::new(Panicking), labels))
    });
    holder.load().unwrap();
    let app = router_for(holder);

    let (status, body) = send(app.clone(), predict_request("anything")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["type"], "internal_error");

    // the process and the router survive the panic
    let (status, _) = send(app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_readiness_reflects_model_state() {
    let degraded = router_for(ModelHolder::new("/nonexistent/model.json"));
    let (status, body) = send(degraded, get("/ready")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["ready"], false);

    let file = artifact_file();
    let holder = ModelHolder::new(file.path());
    holder.load().unwrap();
    let (status, body) = send(router_for(holder), get("/ready")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], true);
    assert_eq!(body["model_name"], "newsgroups");
    assert_eq!(body["label_count"], 2);
}

#[tokio::test]
async fn test_labels_endpoint() {
    let file = artifact_file();
    let holder = ModelHolder::new(file.path());
    holder.load().unwrap();

    let (status, body) = send(router_for(holder), get("/labels")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "labels": ["sci.space", "rec.autos"] }));

    let (status, _) = send(router_for(ModelHolder::new("/nonexistent")), get("/labels")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_missing_text_is_rejected() {
    let file = artifact_file();
    let holder = ModelHolder::new(file.path());
    holder.load().unwrap();

    let request = Request::post("/prediction")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"body": "no text field"}"#))
        .unwrap();
    let (status, _) = send(router_for(holder), request).await;
    assert!(status.is_client_error(), "got {status}");
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let file = artifact_file();
    let holder = ModelHolder::new(file.path());
    holder.load().unwrap();
    let config = ServerConfig {
        max_body_bytes: 64,
        ..ServerConfig::default()
    };
    let app = create_router(AppState::new(config, Arc::new(holder)));

    let (status, _) = send(app.clone(), predict_request(&"orbit ".repeat(100))).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);

    let (status, body) = send(app, predict_request("orbit")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "category": "sci.space" }));
}

#[tokio::test]
async fn test_unknown_route() {
    let app = router_for(ModelHolder::new("/nonexistent"));

    let response = app.oneshot(get("/v1/unknown")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
