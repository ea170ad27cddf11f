//! 单题处理流程 - 流程层
//!
//! 核心职责：定义"一道题"的完整处理流程
//!
//! 流程顺序：
//! 1. 渲染页面（失败则直接返回失败结果，不提交）
//! 2. 按页面顺序逐个下载并提取文件，第一个可用的文件即停止
//! 3. 有文件内容 → 带文件的 prompt；否则 → 只有页面上下文的 prompt
//! 4. LLM 作答 → 规范化 → 提交

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::models::{AnswerValue, AttemptResult, Credentials, FileLink, ProcessedContent, QuizPage};
use crate::services::classifier::classify;
use crate::services::{
    normalize, AnswerSubmitter, ContentDispatcher, Extraction, FileFetcher, LanguageModel,
    PageRenderer, PromptComposer,
};
use crate::utils::truncate_text;
use crate::workflow::quiz_ctx::QuizCtx;

/// 单题处理流程
///
/// - 只编排，不持有浏览器或 HTTP 资源
/// - 所有协作方都通过 trait 注入，可在测试中替换
#[derive(Clone)]
pub struct QuizFlow {
    renderer: Arc<dyn PageRenderer>,
    fetcher: Arc<dyn FileFetcher>,
    dispatcher: ContentDispatcher,
    composer: PromptComposer,
    llm: Arc<dyn LanguageModel>,
    submitter: Arc<dyn AnswerSubmitter>,
    credentials: Credentials,
}

impl QuizFlow {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        renderer: Arc<dyn PageRenderer>,
        fetcher: Arc<dyn FileFetcher>,
        dispatcher: ContentDispatcher,
        composer: PromptComposer,
        llm: Arc<dyn LanguageModel>,
        submitter: Arc<dyn AnswerSubmitter>,
        credentials: Credentials,
    ) -> Self {
        Self {
            renderer,
            fetcher,
            dispatcher,
            composer,
            llm,
            submitter,
            credentials,
        }
    }

    /// 处理一道题
    ///
    /// 渲染失败与缺少提交地址返回 `success: false`；
    /// LLM 彻底失败或提交网络错误向上传播，由题目链决定是否终止
    pub async fn run(&self, ctx: &QuizCtx) -> Result<AttemptResult> {
        info!("{} 🌐 正在渲染页面: {}", ctx, ctx.quiz_url);
        let page = match self.renderer.render(&ctx.quiz_url).await {
            Ok(page) => page,
            Err(e) => {
                warn!("{} ⚠️ 页面渲染失败: {:#}", ctx, e);
                return Ok(AttemptResult::failed(format!("{:#}", e)));
            }
        };
        info!("{} 📝 题目: {}", ctx, truncate_text(&page.question, 120));

        let prompt = match self.first_usable_file(ctx, &page.files).await {
            Some((file, content)) => {
                info!("{} 📎 使用文件内容作答: {}", ctx, file.url);
                self.composer
                    .file_grounded(&page.question, file, &content, &page.content)
            }
            None => {
                info!("{} 📄 没有可用文件，仅根据页面内容作答", ctx);
                self.composer.context_only(&page.question, &page.content)
            }
        };

        info!("{} 🤖 正在请求 LLM...", ctx);
        let raw = self
            .llm
            .complete(&prompt, None)
            .await
            .context("LLM 作答失败")?;
        let answer = normalize(&raw);
        info!(
            "{} ✓ 答案 [{}]: {}",
            ctx,
            answer.kind(),
            truncate_text(&answer.to_string(), 80)
        );

        self.submit(ctx, &page, &answer).await
    }

    /// 按页面顺序尝试文件，返回第一个提取成功的
    async fn first_usable_file<'a>(
        &self,
        ctx: &QuizCtx,
        files: &'a [FileLink],
    ) -> Option<(&'a FileLink, ProcessedContent)> {
        for (index, file) in files.iter().enumerate() {
            let kind = classify(&file.url, &file.label);
            info!(
                "{} ⬇️ 下载文件 {}/{} [{}]: {}",
                ctx,
                index + 1,
                files.len(),
                kind,
                file.url
            );

            let bytes = match self.fetcher.fetch(&file.url, kind).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!("{} ⚠️ 下载失败，尝试下一个文件: {:#}", ctx, e);
                    continue;
                }
            };

            match self.dispatcher.process_as(kind, file, &bytes).await {
                Extraction::Content(content) => return Some((file, content)),
                Extraction::Unusable { reason } => {
                    warn!("{} ⚠️ 文件不可用，尝试下一个文件: {}", ctx, reason);
                }
            }
        }
        None
    }

    async fn submit(
        &self,
        ctx: &QuizCtx,
        page: &QuizPage,
        answer: &AnswerValue,
    ) -> Result<AttemptResult> {
        let Some(submit_url) = page.submit_url.as_deref() else {
            warn!("{} ⚠️ 页面没有提交地址，无法提交", ctx);
            return Ok(AttemptResult::failed("页面没有提交地址"));
        };

        info!("{} 📤 正在提交答案到 {}", ctx, submit_url);
        let result = self
            .submitter
            .submit(submit_url, &self.credentials, &ctx.quiz_url, answer)
            .await
            .with_context(|| format!("提交答案失败: {}", submit_url))?;

        if result.correct {
            info!("{} ✅ 回答正确", ctx);
        } else {
            warn!(
                "{} ❌ 回答错误: {}",
                ctx,
                result.reason.as_deref().unwrap_or("未给出原因")
            );
        }
        Ok(result.into())
    }
}
