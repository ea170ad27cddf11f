use anyhow::Result;
use async_trait::async_trait;
use scraper::Html;

use crate::error::{AppError, ExtractError};
use crate::models::{FileLink, ProcessedContent};

use super::Extractor;

/// 不参与正文的元素
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// 网页正文提取
///
/// 抓取到的数据页通常是 HTML，去掉脚本和样式后只保留可见文本
pub struct HtmlTextExtractor;

#[async_trait]
impl Extractor for HtmlTextExtractor {
    fn name(&self) -> &'static str {
        "html-text"
    }

    async fn extract(&self, _file: &FileLink, bytes: &[u8]) -> Result<ProcessedContent> {
        let raw = String::from_utf8_lossy(bytes);
        if !looks_like_html(&raw) {
            return Err(AppError::malformed("html", "内容不是 HTML 文档").into());
        }

        let text = visible_text(&raw);
        if text.is_empty() {
            return Err(AppError::Extract(ExtractError::Empty {
                format: "html".to_string(),
            })
            .into());
        }
        Ok(ProcessedContent::Text { text })
    }
}

fn looks_like_html(raw: &str) -> bool {
    let head: String = raw.trim_start().chars().take(512).collect::<String>().to_lowercase();
    head.starts_with("<!doctype html") || head.starts_with("<html") || head.contains("<body")
}

/// 按文档顺序收集文本节点，每段一行
fn visible_text(raw: &str) -> String {
    let document = Html::parse_document(raw);
    document
        .root_element()
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|e| SKIPPED_ELEMENTS.contains(&e.name()))
            });
            if hidden {
                return None;
            }
            let text = text.trim();
            (!text.is_empty()).then_some(text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
