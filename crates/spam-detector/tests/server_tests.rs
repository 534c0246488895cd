//! End-to-end tests of the web form

mod common;

use std::io::Write;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use common::MockClassifier;
use spam_detector::{build_app, AppState, ArtifactCache, Label};
use tower::ServiceExt;

fn app_with(classifier: Arc<MockClassifier>) -> Router {
    build_app(AppState::new(Arc::new(ArtifactCache::preloaded(classifier))))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn submit(message: &str) -> Request<Body> {
    let body = format!("message={}", message.replace(' ', "+"));
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_index_shows_form() {
    let app = app_with(Arc::new(MockClassifier::new(Label::Ham, [0.9, 0.1])));
    let (status, body) = send(&app, get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("SMS Spam Detector"));
    assert!(body.contains("<textarea"));
    assert!(body.contains("Predict"));
}

#[tokio::test]
async fn test_spam_prediction_is_rendered() {
    let classifier = Arc::new(MockClassifier::new(Label::Spam, [0.02, 0.98]));
    let app = app_with(classifier.clone());
    let (status, body) = send(&app, submit("WIN A FREE PRIZE NOW")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("🚨 SPAM DETECTED!"));
    assert!(body.contains("Not Spam: 2.00%, Spam: 98.00%"));
    assert!(body.contains("Analyzed at "));
    assert!(body.contains("#ff4c4c"));
    assert!(body.contains("WIN A FREE PRIZE NOW"));
    assert_eq!(classifier.call_count(), 2);
}

#[tokio::test]
async fn test_ham_prediction_is_rendered() {
    let app = app_with(Arc::new(MockClassifier::new(Label::Ham, [0.875, 0.125])));
    let (_, body) = send(&app, submit("see you at lunch")).await;

    assert!(body.contains("✅ Not Spam"));
    assert!(!body.contains("SPAM DETECTED"));
    assert!(body.contains("Not Spam: 87.50%, Spam: 12.50%"));
    assert!(!body.contains("#ff4c4c"));
}

#[tokio::test]
async fn test_blank_message_warns_without_classifying() {
    let classifier = Arc::new(MockClassifier::new(Label::Spam, [0.02, 0.98]));
    let app = app_with(classifier.clone());

    for message in ["", "   ", "%0A%09+"] {
        let request = Request::builder()
            .method("POST")
            .uri("/predict")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!("message={message}")))
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Please enter a message."));
    }
    assert_eq!(classifier.call_count(), 0);
}

#[tokio::test]
async fn test_prediction_failure_is_generic_and_recoverable() {
    let classifier = Arc::new(MockClassifier::new(Label::Spam, [0.1, 0.9]));
    let app = app_with(classifier.clone());

    classifier.set_failing(true);
    let (status, body) = send(&app, submit("hello")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Prediction failed. Please try again."));
    assert!(!body.contains("model blew up"));
    assert!(!body.contains("Confidence Scores"));
    assert!(body.contains("<textarea"));

    classifier.set_failing(false);
    let (_, body) = send(&app, submit("hello again")).await;
    assert!(body.contains("🚨 SPAM DETECTED!"));
}

#[tokio::test]
async fn test_classifier_panic_is_a_recoverable_failure() {
    let classifier = Arc::new(MockClassifier::new(Label::Ham, [0.8, 0.2]));
    let app = app_with(classifier.clone());

    classifier.set_panicking(true);
    let (status, body) = send(&app, submit("hello")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Prediction failed. Please try again."));
    assert!(!body.contains("model panicked"));
    assert!(body.contains("<textarea"));

    classifier.set_panicking(false);
    let (_, body) = send(&app, submit("hello again")).await;
    assert!(body.contains("✅ Not Spam"));
}

#[tokio::test]
async fn test_missing_artifact_halts_the_form() {
    let dir = tempfile::tempdir().unwrap();
    let cache = ArtifactCache::new(dir.path().join("spam_detection_pipeline.json"));
    let app = build_app(AppState::new(Arc::new(cache)));

    let (status, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body.contains("Error loading pipeline:"));
    assert!(!body.contains("<textarea"));

    let (status, body) = send(&app, submit("hello")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body.contains("Error loading pipeline:"));
    assert!(!body.contains("Confidence Scores"));
}

#[tokio::test]
async fn test_corrupt_artifact_halts_the_form() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"not a model").unwrap();
    let app = build_app(AppState::new(Arc::new(ArtifactCache::new(file.path()))));

    let (status, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body.contains("Error loading pipeline: cannot deserialize"));
}

#[tokio::test]
async fn test_user_input_is_escaped() {
    let app = app_with(Arc::new(MockClassifier::new(Label::Ham, [0.9, 0.1])));
    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("message=%3Cscript%3Ealert(1)%3C%2Fscript%3E"))
        .unwrap();
    let (_, body) = send(&app, request).await;
    assert!(!body.contains("<script>alert(1)"));
    assert!(body.contains("&lt;script&gt;"));
}

#[tokio::test]
async fn test_health_reports_model_state() {
    let app = app_with(Arc::new(MockClassifier::new(Label::Ham, [0.9, 0.1])));
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["model_loaded"], true);
}
