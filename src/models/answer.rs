use serde::Serialize;
use serde_json::Value as JsonValue;

/// 提交给评分服务器的答案
///
/// 序列化时不带标签：数字、布尔、JSON 保持原类型，字符串和 data URI 为字符串
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Number(serde_json::Number),
    Boolean(bool),
    String(String),
    Json(JsonValue),
    DataUri(String),
}

impl AnswerValue {
    /// 变体名称（用于日志）
    pub fn kind(&self) -> &'static str {
        match self {
            AnswerValue::Number(_) => "number",
            AnswerValue::Boolean(_) => "boolean",
            AnswerValue::String(_) => "string",
            AnswerValue::Json(_) => "json",
            AnswerValue::DataUri(_) => "data-uri",
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AnswerValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }
}

impl std::fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnswerValue::Number(n) => write!(f, "{}", n),
            AnswerValue::Boolean(b) => write!(f, "{}", b),
            AnswerValue::String(s) | AnswerValue::DataUri(s) => f.write_str(s),
            AnswerValue::Json(v) => write!(f, "{}", v),
        }
    }
}
