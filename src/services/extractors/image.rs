use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use base64::Engine;

use crate::models::{FileLink, ProcessedContent};
use crate::services::prompt::PromptComposer;
use crate::services::traits::{Attachment, LanguageModel};

use super::media::{sniff_format, MIME_TYPES};
use super::Extractor;

/// 把图片字节编码成 data URI
pub fn to_data_uri(bytes: &[u8]) -> String {
    let mime = sniff_format(bytes)
        .and_then(|format| MIME_TYPES.get(format).copied())
        .unwrap_or("image/png");
    format!(
        "data:{};base64,{}",
        mime,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// 视觉模型描述图片
pub struct VisionExtractor {
    llm: Arc<dyn LanguageModel>,
    composer: PromptComposer,
}

impl VisionExtractor {
    pub fn new(llm: Arc<dyn LanguageModel>, composer: PromptComposer) -> Self {
        Self { llm, composer }
    }
}

#[async_trait]
impl Extractor for VisionExtractor {
    fn name(&self) -> &'static str {
        "vision"
    }

    async fn extract(&self, file: &FileLink, bytes: &[u8]) -> Result<ProcessedContent> {
        if bytes.is_empty() {
            anyhow::bail!("图片为空: {}", file.url);
        }
        let attachment = Attachment {
            data_uri: to_data_uri(bytes),
        };
        let prompt = self.composer.image_description(file);
        let description = self.llm.complete(&prompt, Some(&attachment)).await?;
        if description.trim().is_empty() {
            anyhow::bail!("视觉模型没有返回描述");
        }
        Ok(ProcessedContent::ImageAnalysis { description })
    }
}

/// 视觉模型不可用时只给出图片元信息
pub struct ImageInfoExtractor;

#[async_trait]
impl Extractor for ImageInfoExtractor {
    fn name(&self) -> &'static str {
        "image-info"
    }

    async fn extract(&self, file: &FileLink, bytes: &[u8]) -> Result<ProcessedContent> {
        let format = sniff_format(bytes)
            .filter(|f| MIME_TYPES.get(*f).is_some_and(|m| m.starts_with("image/")))
            .ok_or_else(|| anyhow::anyhow!("无法识别的图片格式: {}", file.url))?;
        Ok(ProcessedContent::MediaInfo {
            format: format.to_string(),
            size_bytes: bytes.len(),
            guidance: Some(format!(
                "Image ({}, {} bytes) could not be analysed. Answer from the page context.",
                format,
                bytes.len()
            )),
        })
    }
}
