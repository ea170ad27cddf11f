//! `/solve` 接口
//!
//! 校验请求后立即返回 `{status: "processing"}`，题目链在后台运行

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::models::Credentials;
use crate::orchestrator::Runtime;

const SERVICE_NAME: &str = "quiz-chain-solver";

/// 后台启动题目链
pub trait ChainLauncher: Send + Sync {
    fn launch(&self, credentials: Credentials, url: String);
}

impl ChainLauncher for Arc<Runtime> {
    fn launch(&self, credentials: Credentials, url: String) {
        let runtime = self.clone();
        tokio::spawn(async move {
            let report = runtime.run_chain(credentials, &url).await;
            info!(
                "题目链结束 [{}]: 答对 {}/{}",
                report.outcome, report.solved, report.attempts
            );
        });
    }
}

/// 接口共享状态
#[derive(Clone)]
pub struct ApiState {
    pub email: String,
    pub secret: String,
    pub launcher: Arc<dyn ChainLauncher>,
}

#[derive(Debug, Deserialize)]
struct SolveRequest {
    email: Option<String>,
    secret: Option<String>,
    url: Option<String>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/solve", post(solve))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "active",
        "service": SERVICE_NAME,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn solve(
    State(state): State<ApiState>,
    payload: Result<Json<SolveRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(request)) = payload else {
        warn!("⚠️ /solve 请求体不是合法 JSON");
        return error_response(StatusCode::BAD_REQUEST, "Invalid JSON body");
    };

    let (Some(email), Some(secret), Some(url)) = (
        non_empty(request.email),
        non_empty(request.secret),
        non_empty(request.url),
    ) else {
        warn!("⚠️ /solve 缺少必填字段");
        return error_response(
            StatusCode::BAD_REQUEST,
            "Missing required fields: email, secret, url",
        );
    };

    if secret != state.secret {
        warn!("⚠️ /solve 密钥不匹配: {}", email);
        return error_response(StatusCode::FORBIDDEN, "Invalid secret");
    }
    if !state.email.is_empty() && email != state.email {
        warn!("⚠️ /solve 邮箱不匹配: {}", email);
        return error_response(StatusCode::FORBIDDEN, "Invalid email");
    }

    info!("📥 收到题目链请求: {}", url);
    state.launcher.launch(Credentials { email, secret }, url);

    (StatusCode::OK, Json(json!({ "status": "processing" }))).into_response()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
