//! 答案提交客户端
//!
//! 评分服务器的错误响应同样是合法的提交结果（例如 `{correct:false, reason}`），
//! 因此不按状态码判断成败，只要响应体能解析就返回

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};
use crate::models::{AnswerValue, Credentials, SubmissionPayload, SubmissionResult};
use crate::services::traits::AnswerSubmitter;
use crate::utils::truncate_text;

/// 答案提交客户端
pub struct SubmitClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl SubmitClient {
    pub fn new(config: &Config) -> AppResult<Self> {
        Self::with_timeout(Duration::from_secs(config.submit_timeout_secs))
    }

    pub fn with_timeout(timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::api_request_failed("reqwest::Client", e))?;
        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl AnswerSubmitter for SubmitClient {
    async fn submit(
        &self,
        submit_url: &str,
        credentials: &Credentials,
        quiz_url: &str,
        answer: &AnswerValue,
    ) -> Result<SubmissionResult> {
        let payload = SubmissionPayload {
            email: &credentials.email,
            secret: &credentials.secret,
            url: quiz_url,
            answer,
        };
        debug!("提交 Payload 答案类型: {}", answer.kind());

        let response = self
            .client
            .post(submit_url)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(submit_url, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::api_request_failed(submit_url, e))?;

        match serde_json::from_str::<SubmissionResult>(&body) {
            Ok(result) => {
                if !status.is_success() {
                    warn!("提交返回 HTTP {}，按结构化结果处理", status.as_u16());
                }
                Ok(result)
            }
            Err(_) => Err(AppError::Api(ApiError::UnparseableBody {
                endpoint: submit_url.to_string(),
                status: status.as_u16(),
                body: truncate_text(&body, 200),
            })
            .into()),
        }
    }
}
