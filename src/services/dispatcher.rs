//! 内容提取分发
//!
//! 根据分类结果把已下载的字节交给对应格式的提取策略链。
//! 提取失败不会向上传播，只返回 [`Extraction::Unusable`]，由调用方继续尝试下一个文件

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::models::{FileKind, FileLink, ProcessedContent};
use crate::services::classifier::classify;
use crate::services::extractors::{
    text::decode_text, CsvExtractor, ExcelExtractor, HtmlTextExtractor, ImageInfoExtractor,
    JsonExtractor, MediaInfoExtractor, PdfExtractor, StrategyChain, Utf8TextExtractor, VisionExtractor,
};
use crate::services::prompt::PromptComposer;
use crate::services::traits::LanguageModel;

/// 单个文件的提取结果
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// 可用于构建 prompt 的内容
    Content(ProcessedContent),
    /// 该文件没有可用内容（失败原因已记录）
    Unusable { reason: String },
}

impl Extraction {
    pub fn content(self) -> Option<ProcessedContent> {
        match self {
            Extraction::Content(content) => Some(content),
            Extraction::Unusable { .. } => None,
        }
    }
}

/// 内容提取分发器
#[derive(Clone)]
pub struct ContentDispatcher {
    chains: HashMap<FileKind, StrategyChain>,
}

impl ContentDispatcher {
    /// 没有任何提取策略的分发器（只处理纯文本）
    pub fn empty() -> Self {
        Self {
            chains: HashMap::new(),
        }
    }

    /// 生产环境的提取策略
    pub fn new(llm: Arc<dyn LanguageModel>, composer: PromptComposer) -> Self {
        Self::empty()
            .with_chain(FileKind::Csv, StrategyChain::single(CsvExtractor))
            .with_chain(
                FileKind::Excel,
                StrategyChain::single(ExcelExtractor)
                    .then(CsvExtractor)
                    .then(Utf8TextExtractor),
            )
            .with_chain(
                FileKind::Pdf,
                StrategyChain::single(PdfExtractor).then(Utf8TextExtractor),
            )
            .with_chain(
                FileKind::Json,
                StrategyChain::single(JsonExtractor).then(Utf8TextExtractor),
            )
            .with_chain(
                FileKind::Image,
                StrategyChain::single(VisionExtractor::new(llm, composer)).then(ImageInfoExtractor),
            )
            .with_chain(FileKind::Audio, StrategyChain::single(MediaInfoExtractor))
            .with_chain(FileKind::Video, StrategyChain::single(MediaInfoExtractor))
            .with_chain(FileKind::Text, StrategyChain::single(HtmlTextExtractor))
    }

    /// 替换某一类文件的策略链
    pub fn with_chain(mut self, kind: FileKind, chain: StrategyChain) -> Self {
        self.chains.insert(kind, chain);
        self
    }

    /// 分类后提取
    pub async fn process(&self, file: &FileLink, bytes: &[u8]) -> Extraction {
        self.process_as(classify(&file.url, &file.label), file, bytes).await
    }

    /// 按已知类别提取
    ///
    /// 文本类先尝试其策略链（例如网页去标签），失败时原样解码，永远可用
    pub async fn process_as(&self, kind: FileKind, file: &FileLink, bytes: &[u8]) -> Extraction {
        if kind == FileKind::Text {
            let content = match self.chains.get(&kind) {
                Some(chain) => chain.run(file, bytes).await.unwrap_or_else(|e| {
                    debug!("文本策略未命中，按原文处理: {}", e);
                    decode_text(bytes)
                }),
                None => decode_text(bytes),
            };
            return Extraction::Content(content);
        }

        let Some(chain) = self.chains.get(&kind) else {
            let reason = format!("没有 {} 类型的提取器", kind);
            warn!("⚠️ {}: {}", reason, file.url);
            return Extraction::Unusable { reason };
        };

        match chain.run(file, bytes).await {
            Ok(content) => {
                info!(
                    "✓ 文件提取成功 [{} → {}]: {}",
                    kind,
                    content.kind(),
                    file.url
                );
                Extraction::Content(content)
            }
            Err(e) => {
                warn!("⚠️ 文件提取失败 [{}]: {} ({})", kind, file.url, e);
                Extraction::Unusable {
                    reason: e.to_string(),
                }
            }
        }
    }
}
