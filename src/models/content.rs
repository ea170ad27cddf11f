//! 文件提取结果
//!
//! 只在一次提取调用内存在，不做持久化

use serde::Serialize;
use serde_json::Value as JsonValue;

/// 数值列的汇总统计
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// 统一的文件提取结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProcessedContent {
    /// 表格数据
    Tabular {
        columns: Vec<String>,
        rows: Vec<Vec<JsonValue>>,
        summary: Vec<ColumnSummary>,
    },
    /// 提取或转写出的文本
    Text { text: String },
    /// 任意结构化数据
    Structured { data: JsonValue },
    /// 视觉模型给出的图片描述
    ImageAnalysis { description: String },
    /// 音视频等只能给出元信息的文件
    MediaInfo {
        format: String,
        size_bytes: usize,
        guidance: Option<String>,
    },
}

impl ProcessedContent {
    /// 变体名称（用于日志）
    pub fn kind(&self) -> &'static str {
        match self {
            ProcessedContent::Tabular { .. } => "tabular",
            ProcessedContent::Text { .. } => "text",
            ProcessedContent::Structured { .. } => "structured",
            ProcessedContent::ImageAnalysis { .. } => "image_analysis",
            ProcessedContent::MediaInfo { .. } => "media_info",
        }
    }

    /// 渲染为写入 prompt 的文本
    ///
    /// 纯文本原样输出，其余变体输出格式化 JSON
    pub fn render(&self) -> String {
        match self {
            ProcessedContent::Text { text } => text.clone(),
            ProcessedContent::ImageAnalysis { description } => description.clone(),
            other => serde_json::to_string_pretty(other).unwrap_or_default(),
        }
    }
}
