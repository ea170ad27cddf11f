use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::error::{AppError, ExtractError};
use crate::models::{FileLink, ProcessedContent};

use super::Extractor;

/// PDF 文本提取（纯 Rust 的 `pdf-extract`）
///
/// 解析在阻塞线程池中执行，解析器 panic 时按失败处理
pub struct PdfExtractor;

#[async_trait]
impl Extractor for PdfExtractor {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    async fn extract(&self, _file: &FileLink, bytes: &[u8]) -> Result<ProcessedContent> {
        if !bytes.starts_with(b"%PDF") {
            return Err(AppError::malformed("pdf", "缺少 %PDF 文件头").into());
        }

        let owned = bytes.to_vec();
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&owned))
            .await
            .context("PDF 解析线程异常退出")?
            .map_err(|e| AppError::malformed("pdf", e))?;

        if text.trim().is_empty() {
            return Err(AppError::Extract(ExtractError::Empty {
                format: "pdf".to_string(),
            })
            .into());
        }

        Ok(ProcessedContent::Text { text })
    }
}
