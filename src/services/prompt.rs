//! Prompt 构建
//!
//! 两种形态：带文件内容的 prompt 与只有页面上下文的 prompt。
//! 两者都以同一段输出规则结尾，答案规范化依赖这段规则

use crate::models::{FileLink, ProcessedContent};
use crate::utils::truncate_text;

/// 输出规则，与 `answer_normalizer` 的判断顺序配套
pub const OUTPUT_RULES: &str = "\
IMPORTANT - respond with ONLY the answer value. Follow these rules exactly:
1. Respond with ONLY the answer value, with no explanation, no working and no markdown.
2. If the answer is a number, respond with just the bare number (for example 42 or 3.14).
3. If the answer is a boolean, respond with just true or false.
4. If the answer is JSON, respond with valid JSON only.
5. If the answer is a chart or image, respond with a base64 data URI (data:image/png;base64,...).";

/// Prompt 构建器
#[derive(Debug, Clone)]
pub struct PromptComposer {
    max_content_chars: usize,
}

impl PromptComposer {
    /// `max_content_chars` 限制文件内容和页面正文各自写入的字符数
    pub fn new(max_content_chars: usize) -> Self {
        Self { max_content_chars }
    }

    /// 带文件内容的 prompt
    pub fn file_grounded(
        &self,
        question: &str,
        file: &FileLink,
        content: &ProcessedContent,
        page_content: &str,
    ) -> String {
        format!(
            "You are solving a data analysis quiz.\n\n\
             QUESTION:\n{question}\n\n\
             DATA FILE: {label} ({url})\n\
             FILE CONTENT ({kind}):\n{content}\n\n\
             PAGE CONTEXT:\n{page}\n\n\
             {rules}",
            question = question,
            label = display_label(file),
            url = file.url,
            kind = content.kind(),
            content = self.clip(&content.render()),
            page = self.clip(page_content),
            rules = OUTPUT_RULES,
        )
    }

    /// 只有页面上下文的 prompt
    pub fn context_only(&self, question: &str, page_content: &str) -> String {
        format!(
            "You are solving a data analysis quiz.\n\n\
             QUESTION:\n{question}\n\n\
             FULL PAGE CONTENT:\n{page}\n\n\
             {rules}",
            question = question,
            page = self.clip(page_content),
            rules = OUTPUT_RULES,
        )
    }

    /// 图片提取器使用的视觉 prompt
    pub fn image_description(&self, file: &FileLink) -> String {
        format!(
            "Describe this image ({label}) in full detail. Transcribe every piece of visible \
             text, number, table cell, axis label and legend entry exactly as shown.",
            label = display_label(file),
        )
    }

    fn clip(&self, text: &str) -> String {
        truncate_text(text, self.max_content_chars)
    }
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self::new(100_000)
    }
}

fn display_label(file: &FileLink) -> &str {
    if file.label.trim().is_empty() {
        &file.url
    } else {
        file.label.trim()
    }
}
