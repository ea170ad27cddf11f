use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use quiz_chain_solver::api::{router, ApiState, ChainLauncher};
use quiz_chain_solver::models::Credentials;

#[derive(Default)]
struct RecordingLauncher {
    launched: Mutex<Vec<(Credentials, String)>>,
}

impl ChainLauncher for RecordingLauncher {
    fn launch(&self, credentials: Credentials, url: String) {
        self.launched.lock().unwrap().push((credentials, url));
    }
}

fn app(launcher: Arc<RecordingLauncher>) -> axum::Router {
    router(ApiState {
        email: "student@example.com".to_string(),
        secret: "s3cret".to_string(),
        launcher,
    })
}

fn post_solve(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/solve")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let response = app(Arc::default())
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "active");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_solve_accepts_and_launches_chain() {
    let launcher = Arc::new(RecordingLauncher::default());
    let request = json!({
        "email": "student@example.com",
        "secret": "s3cret",
        "url": "https://quiz.example/q1",
    });

    let response = app(launcher.clone())
        .oneshot(post_solve(&request.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"status": "processing"}));

    let launched = launcher.launched.lock().unwrap();
    assert_eq!(launched.len(), 1);
    assert_eq!(launched[0].0.email, "student@example.com");
    assert_eq!(launched[0].1, "https://quiz.example/q1");
}

#[tokio::test]
async fn test_solve_missing_fields_is_bad_request() {
    let launcher = Arc::new(RecordingLauncher::default());
    let request = json!({"email": "student@example.com", "secret": "s3cret"});

    let response = app(launcher.clone())
        .oneshot(post_solve(&request.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(launcher.launched.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_solve_invalid_json_is_bad_request() {
    let response = app(Arc::default())
        .oneshot(post_solve("{not json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_solve_wrong_secret_is_forbidden() {
    let launcher = Arc::new(RecordingLauncher::default());
    let request = json!({
        "email": "student@example.com",
        "secret": "guess",
        "url": "https://quiz.example/q1",
    });

    let response = app(launcher.clone())
        .oneshot(post_solve(&request.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(launcher.launched.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_solve_wrong_email_is_forbidden() {
    let request = json!({
        "email": "someone@else.com",
        "secret": "s3cret",
        "url": "https://quiz.example/q1",
    });

    let response = app(Arc::default())
        .oneshot(post_solve(&request.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
