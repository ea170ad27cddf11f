//! 测试用的桩协作方
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;

use quiz_chain_solver::models::{
    AnswerValue, Credentials, FileKind, FileLink, ProcessedContent, QuizPage, SubmissionResult,
};
use quiz_chain_solver::services::extractors::Extractor;
use quiz_chain_solver::services::{
    AnswerSubmitter, Attachment, ContentDispatcher, FileFetcher, LanguageModel, PageRenderer,
    PromptComposer,
};
use quiz_chain_solver::QuizFlow;

/// 按地址返回固定页面，未登记的地址渲染失败
#[derive(Default)]
pub struct StubRenderer {
    pages: HashMap<String, QuizPage>,
    pub rendered: Mutex<Vec<String>>,
}

impl StubRenderer {
    pub fn with_page(mut self, url: &str, page: QuizPage) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }
}

#[async_trait]
impl PageRenderer for StubRenderer {
    async fn render(&self, url: &str) -> Result<QuizPage> {
        self.rendered.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("navigation failed: {}", url))
    }
}

/// 按地址返回固定字节，未登记的地址下载失败
#[derive(Default)]
pub struct StubFetcher {
    files: HashMap<String, Vec<u8>>,
    pub fetched: Mutex<Vec<(String, FileKind)>>,
}

impl StubFetcher {
    pub fn with_file(mut self, url: &str, bytes: &[u8]) -> Self {
        self.files.insert(url.to_string(), bytes.to_vec());
        self
    }
}

#[async_trait]
impl FileFetcher for StubFetcher {
    async fn fetch(&self, url: &str, kind: FileKind) -> Result<Vec<u8>> {
        self.fetched.lock().unwrap().push((url.to_string(), kind));
        self.files
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("HTTP 404: {}", url))
    }
}

/// 固定回答并记录收到的 prompt
pub struct ScriptedModel {
    answer: String,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, prompt: &str, _attachment: Option<&Attachment>) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.answer.clone())
    }
}

/// 记录提交内容并返回固定结果
pub struct RecordingSubmitter {
    result: Option<SubmissionResult>,
    pub submissions: Mutex<Vec<(String, String, AnswerValue)>>,
}

impl RecordingSubmitter {
    pub fn returning(result: SubmissionResult) -> Self {
        Self {
            result: Some(result),
            submissions: Mutex::new(Vec::new()),
        }
    }

    /// 模拟网络错误
    pub fn unreachable() -> Self {
        Self {
            result: None,
            submissions: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl AnswerSubmitter for RecordingSubmitter {
    async fn submit(
        &self,
        submit_url: &str,
        _credentials: &Credentials,
        quiz_url: &str,
        answer: &AnswerValue,
    ) -> Result<SubmissionResult> {
        self.submissions.lock().unwrap().push((
            submit_url.to_string(),
            quiz_url.to_string(),
            answer.clone(),
        ));
        self.result
            .clone()
            .ok_or_else(|| anyhow::anyhow!("connection refused"))
    }
}

/// 返回固定内容的提取器
pub struct FixedExtractor(pub ProcessedContent);

#[async_trait]
impl Extractor for FixedExtractor {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn extract(&self, _file: &FileLink, _bytes: &[u8]) -> Result<ProcessedContent> {
        Ok(self.0.clone())
    }
}

/// 总是失败的提取器
pub struct FailingExtractor;

#[async_trait]
impl Extractor for FailingExtractor {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn extract(&self, _file: &FileLink, _bytes: &[u8]) -> Result<ProcessedContent> {
        anyhow::bail!("malformed payload")
    }
}

pub fn credentials() -> Credentials {
    Credentials {
        email: "student@example.com".to_string(),
        secret: "s3cret".to_string(),
    }
}

pub fn quiz_page(question: &str, submit_url: Option<&str>, files: Vec<FileLink>) -> QuizPage {
    QuizPage {
        question: question.to_string(),
        content: format!("Quiz\n{}", question),
        submit_url: submit_url.map(str::to_string),
        files,
    }
}

pub fn flow(
    renderer: Arc<StubRenderer>,
    fetcher: Arc<StubFetcher>,
    dispatcher: ContentDispatcher,
    llm: Arc<ScriptedModel>,
    submitter: Arc<RecordingSubmitter>,
) -> QuizFlow {
    QuizFlow::new(
        renderer,
        fetcher,
        dispatcher,
        PromptComposer::default(),
        llm,
        submitter,
        credentials(),
    )
}
