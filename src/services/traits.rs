//! 外部协作方的抽象
//!
//! 流程层只依赖这些 trait，浏览器、LLM、下载与提交都可以在测试中替换为桩实现

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{AnswerValue, Credentials, FileKind, QuizPage, SubmissionResult};

/// 题目页面渲染
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// 渲染页面并提取题目、正文、文件链接和提交地址
    async fn render(&self, url: &str) -> Result<QuizPage>;
}

/// 文件下载
#[async_trait]
pub trait FileFetcher: Send + Sync {
    /// 下载原始字节，`kind` 决定超时
    async fn fetch(&self, url: &str, kind: FileKind) -> Result<Vec<u8>>;
}

/// LLM 附件（图片或文档，以 data URI 形式传递）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub data_uri: String,
}

/// LLM 对话补全
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// 发送 prompt，返回去除首尾空白后的文本
    async fn complete(&self, prompt: &str, attachment: Option<&Attachment>) -> Result<String>;
}

/// 答案提交
#[async_trait]
pub trait AnswerSubmitter: Send + Sync {
    async fn submit(
        &self,
        submit_url: &str,
        credentials: &Credentials,
        quiz_url: &str,
        answer: &AnswerValue,
    ) -> Result<SubmissionResult>;
}
