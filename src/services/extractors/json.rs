use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::error::AppError;
use crate::models::{FileLink, ProcessedContent};

use super::Extractor;

/// JSON 文件 → 结构化数据
pub struct JsonExtractor;

#[async_trait]
impl Extractor for JsonExtractor {
    fn name(&self) -> &'static str {
        "json"
    }

    async fn extract(&self, _file: &FileLink, bytes: &[u8]) -> Result<ProcessedContent> {
        // 去掉 BOM
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        let data: JsonValue = serde_json::from_slice(bytes).map_err(|e| AppError::malformed("json", e))?;
        Ok(ProcessedContent::Structured { data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_parses_json_with_bom() {
        let file = FileLink::new("https://x/data.json", "");
        let content = JsonExtractor
            .extract(&file, b"\xEF\xBB\xBF{\"items\":[1,2]}")
            .await
            .unwrap();
        assert_eq!(
            content,
            ProcessedContent::Structured {
                data: json!({"items": [1, 2]})
            }
        );
    }

    #[tokio::test]
    async fn test_invalid_json_is_error() {
        let file = FileLink::new("https://x/data.json", "");
        assert!(JsonExtractor.extract(&file, b"{oops").await.is_err());
    }
}
