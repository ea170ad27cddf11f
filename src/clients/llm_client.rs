//! LLM 客户端
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Azure, Gemini, Doubao 等）
//!
//! 每次调用有独立超时，失败（含超时）时按指数退避重试，默认共尝试 3 次

use std::time::Duration;

use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImage,
        ChatCompletionRequestMessageContentPartText, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, ChatCompletionRequestUserMessageContent,
        ChatCompletionRequestUserMessageContentPart, CreateChatCompletionRequestArgs, ImageDetail,
        ImageUrl,
    },
    Client,
};
use async_trait::async_trait;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, LlmError};
use crate::services::traits::{Attachment, LanguageModel};

const SYSTEM_MESSAGE: &str = "You are a precise data analyst solving quiz questions. \
                              You always reply with the bare answer value and nothing else.";

/// LLM 客户端
pub struct LlmClient {
    client: Client<OpenAIConfig>,
    model_name: String,
    max_retries: u32,
    request_timeout: Duration,
    base_delay: Duration,
}

impl LlmClient {
    /// 创建新的 LLM 客户端
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
            max_retries: config.llm_max_retries.max(1),
            request_timeout: Duration::from_secs(config.llm_timeout_secs),
            base_delay: Duration::from_secs(1),
        }
    }

    /// 覆盖单次调用超时
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// 覆盖重试间隔的基数
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// 单次调用，不重试
    async fn send_once(&self, user_message: &str, attachment: Option<&Attachment>) -> Result<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.len());

        let system_msg = ChatCompletionRequestSystemMessageArgs::default()
            .content(SYSTEM_MESSAGE)
            .build()?;

        // 构建用户消息内容（支持附件）
        let user_msg = match attachment {
            Some(attachment) => {
                let content_parts = vec![
                    ChatCompletionRequestUserMessageContentPart::Text(
                        ChatCompletionRequestMessageContentPartText {
                            text: user_message.to_string(),
                        },
                    ),
                    ChatCompletionRequestUserMessageContentPart::ImageUrl(
                        ChatCompletionRequestMessageContentPartImage {
                            image_url: ImageUrl {
                                url: attachment.data_uri.clone(),
                                detail: Some(ImageDetail::Auto),
                            },
                        },
                    ),
                ];
                debug!("使用 Vision API，附件大小: {} 字符", attachment.data_uri.len());

                ChatCompletionRequestUserMessageArgs::default()
                    .content(ChatCompletionRequestUserMessageContent::Array(content_parts))
                    .build()?
            }
            None => ChatCompletionRequestUserMessageArgs::default()
                .content(user_message)
                .build()?,
        };

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![
                ChatCompletionRequestMessage::System(system_msg),
                ChatCompletionRequestMessage::User(user_msg),
            ])
            .temperature(0.1)
            .max_tokens(4096u32)
            .build()?;

        let response = self.client.chat().create(request).await?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| {
                AppError::Llm(LlmError::EmptyContent {
                    model: self.model_name.clone(),
                })
            })?;

        Ok(strip_code_fence(&content))
    }
}

#[async_trait]
impl LanguageModel for LlmClient {
    async fn complete(&self, prompt: &str, attachment: Option<&Attachment>) -> Result<String> {
        let mut last_error = None;
        for attempt in 1..=self.max_retries {
            let outcome = match timeout(self.request_timeout, self.send_once(prompt, attachment)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(anyhow::anyhow!(
                    "请求超时 ({} 秒)",
                    self.request_timeout.as_secs_f64()
                )),
            };
            match outcome {
                Ok(content) => {
                    debug!("LLM API 调用成功 (第 {} 次)", attempt);
                    return Ok(content);
                }
                Err(e) => {
                    warn!(
                        "LLM API 调用失败 (尝试 {}/{}): {:#}",
                        attempt, self.max_retries, e
                    );
                    last_error = Some(e);
                    if attempt < self.max_retries {
                        sleep(self.base_delay * 2u32.pow(attempt - 1)).await;
                    }
                }
            }
        }

        let source = last_error.unwrap_or_else(|| anyhow::anyhow!("没有进行任何调用"));
        Err(AppError::Llm(LlmError::ApiCallFailed {
            model: self.model_name.clone(),
            attempts: self.max_retries,
            source: source.into(),
        })
        .into())
    }
}

/// 去掉 LLM 输出外层的 markdown 代码块
pub fn strip_code_fence(text: &str) -> String {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed.to_string();
    };
    // 第一行是语言标记（可能为空）
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("42"), "42");
        assert_eq!(strip_code_fence("  hello \n"), "hello");
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```\n[1,2]\n```\n"), "[1,2]");
        assert_eq!(strip_code_fence("```42```"), "42");
    }

    /// 需要真实的 LLM 服务
    ///
    /// 运行方式：
    /// ```bash
    /// LLM_API_KEY=... cargo test test_complete_live -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_complete_live() {
        let _ = tracing_subscriber::fmt::try_init();

        let client = LlmClient::new(&Config::from_env());
        let response = client
            .complete("What is 2+2? Respond with only the number.", None)
            .await
            .unwrap();
        println!("LLM 响应: {}", response);
        assert_eq!(crate::services::answer_normalizer::normalize(&response).as_f64(), Some(4.0));
    }
}
