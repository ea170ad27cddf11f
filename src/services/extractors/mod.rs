//! 各格式的内容提取器
//!
//! 每种格式对应一组按顺序尝试的提取策略，第一个成功的策略给出结果，
//! 全部失败时返回带有每个策略失败原因的 [`ExtractError::Exhausted`]

pub mod html;
pub mod image;
pub mod json;
pub mod media;
pub mod pdf;
pub mod tabular;
pub mod text;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use crate::error::ExtractError;
use crate::models::{FileLink, ProcessedContent};

pub use html::HtmlTextExtractor;
pub use image::{ImageInfoExtractor, VisionExtractor};
pub use json::JsonExtractor;
pub use media::{sniff_format, MediaInfoExtractor};
pub use pdf::PdfExtractor;
pub use tabular::{summarize_columns, CsvExtractor, ExcelExtractor};
pub use text::Utf8TextExtractor;

/// 单个提取策略
#[async_trait]
pub trait Extractor: Send + Sync {
    /// 策略名称（用于日志和失败原因）
    fn name(&self) -> &'static str;

    async fn extract(&self, file: &FileLink, bytes: &[u8]) -> Result<ProcessedContent>;
}

/// 按顺序尝试的策略列表
#[derive(Clone, Default)]
pub struct StrategyChain {
    strategies: Vec<Arc<dyn Extractor>>,
}

impl StrategyChain {
    pub fn new(strategies: Vec<Arc<dyn Extractor>>) -> Self {
        Self { strategies }
    }

    pub fn single(strategy: impl Extractor + 'static) -> Self {
        Self::new(vec![Arc::new(strategy)])
    }

    /// 追加一个兜底策略
    pub fn then(mut self, strategy: impl Extractor + 'static) -> Self {
        self.strategies.push(Arc::new(strategy));
        self
    }

    /// 依次执行策略，第一个成功即返回
    pub async fn run(&self, file: &FileLink, bytes: &[u8]) -> Result<ProcessedContent, ExtractError> {
        let mut failures = Vec::with_capacity(self.strategies.len());
        for strategy in &self.strategies {
            match strategy.extract(file, bytes).await {
                Ok(content) => {
                    debug!("提取策略 {} 成功: {}", strategy.name(), file.url);
                    return Ok(content);
                }
                Err(e) => {
                    debug!("提取策略 {} 失败: {:#}", strategy.name(), e);
                    failures.push(format!("{}: {:#}", strategy.name(), e));
                }
            }
        }
        Err(ExtractError::Exhausted(failures))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fails(&'static str);

    #[async_trait]
    impl Extractor for Fails {
        fn name(&self) -> &'static str {
            self.0
        }

        async fn extract(&self, _file: &FileLink, _bytes: &[u8]) -> Result<ProcessedContent> {
            anyhow::bail!("boom")
        }
    }

    #[tokio::test]
    async fn test_first_success_wins() {
        let chain = StrategyChain::single(Fails("first"))
            .then(Utf8TextExtractor)
            .then(Fails("never-reached"));
        let file = FileLink::new("https://x/a.pdf", "");

        let content = chain.run(&file, b"plain text").await.unwrap();
        assert_eq!(
            content,
            ProcessedContent::Text {
                text: "plain text".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_exhausted_collects_reasons_in_order() {
        let chain = StrategyChain::single(Fails("a")).then(Fails("b"));
        let file = FileLink::new("https://x/a.pdf", "");

        match chain.run(&file, b"").await {
            Err(ExtractError::Exhausted(reasons)) => {
                assert_eq!(reasons, vec!["a: boom".to_string(), "b: boom".to_string()]);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
