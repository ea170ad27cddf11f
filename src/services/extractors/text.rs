use anyhow::Result;
use async_trait::async_trait;

use crate::error::{AppError, ExtractError};
use crate::models::{FileLink, ProcessedContent};

use super::Extractor;

/// 严格 UTF-8 文本兜底
///
/// 扩展名不可信时（例如把 CSV 命名成 .xlsx）使用，非 UTF-8 内容视为失败
pub struct Utf8TextExtractor;

#[async_trait]
impl Extractor for Utf8TextExtractor {
    fn name(&self) -> &'static str {
        "utf8-text"
    }

    async fn extract(&self, _file: &FileLink, bytes: &[u8]) -> Result<ProcessedContent> {
        let text = std::str::from_utf8(bytes).map_err(|e| AppError::malformed("utf-8", e))?;
        if text.trim().is_empty() {
            return Err(AppError::Extract(ExtractError::Empty {
                format: "text".to_string(),
            })
            .into());
        }
        Ok(ProcessedContent::Text {
            text: text.to_string(),
        })
    }
}

/// 未识别类型的文件：按文本解码，不做任何修改
pub fn decode_text(bytes: &[u8]) -> ProcessedContent {
    ProcessedContent::Text {
        text: String::from_utf8_lossy(bytes).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rejects_binary() {
        let file = FileLink::new("https://x/a.xlsx", "");
        let err = Utf8TextExtractor
            .extract(&file, &[0x50, 0x4b, 0x03, 0x04, 0xff, 0xfe])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("utf-8"));
    }

    #[tokio::test]
    async fn test_rejects_blank() {
        let file = FileLink::new("https://x/a.txt", "");
        assert!(Utf8TextExtractor.extract(&file, b"  \n").await.is_err());
    }

    #[test]
    fn test_decode_text_keeps_content_unmodified() {
        assert_eq!(
            decode_text(b"  secret code: 42  \n"),
            ProcessedContent::Text {
                text: "  secret code: 42  \n".to_string()
            }
        );
    }
}
