//! 答案规范化
//!
//! 把 LLM 的自由文本转换成带类型的答案，按以下顺序判断，第一条命中即返回：
//!
//! 1. `{…}` 或 `[…]` 包裹且能解析为 JSON → [`AnswerValue::Json`]
//! 2. 忽略大小写等于 `true` / `false` → [`AnswerValue::Boolean`]
//! 3. 十进制数（可带符号、小数部分）且为有限值 → [`AnswerValue::Number`]
//! 4. 以 `data:` 开头 → [`AnswerValue::DataUri`]
//! 5. 其余 → [`AnswerValue::String`]
//!
//! 顺序与 prompt 中的输出规则配套，任何一步都不会失败

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value as JsonValue;

use crate::models::AnswerValue;

static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?$").expect("数字正则无效")
});

/// 规范化 LLM 输出
pub fn normalize(raw: &str) -> AnswerValue {
    let text = raw.trim();

    if let Some(json) = parse_bracketed_json(text) {
        return AnswerValue::Json(json);
    }

    if text.eq_ignore_ascii_case("true") {
        return AnswerValue::Boolean(true);
    }
    if text.eq_ignore_ascii_case("false") {
        return AnswerValue::Boolean(false);
    }

    if let Some(number) = parse_number(text) {
        return AnswerValue::Number(number);
    }

    if text.starts_with("data:") {
        return AnswerValue::DataUri(text.to_string());
    }

    AnswerValue::String(text.to_string())
}

fn parse_bracketed_json(text: &str) -> Option<JsonValue> {
    let bracketed = (text.starts_with('{') && text.ends_with('}'))
        || (text.starts_with('[') && text.ends_with(']'));
    if !bracketed {
        return None;
    }
    serde_json::from_str(text).ok()
}

/// 整数保持整数，其余按 f64 处理
fn parse_number(text: &str) -> Option<serde_json::Number> {
    if text.is_empty() || !NUMBER_RE.is_match(text) {
        return None;
    }
    if let Ok(int) = text.parse::<i64>() {
        return Some(serde_json::Number::from(int));
    }
    let float = text.parse::<f64>().ok()?;
    if !float.is_finite() {
        return None;
    }
    serde_json::Number::from_f64(float)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numbers() {
        assert_eq!(normalize("42"), AnswerValue::Number(42.into()));
        assert_eq!(normalize("-7"), AnswerValue::Number((-7).into()));
        assert_eq!(normalize("3.14").as_f64(), Some(3.14));
        assert_eq!(normalize("  17.5\n").as_f64(), Some(17.5));
        assert_eq!(normalize("+5"), AnswerValue::Number(5.into()));
    }

    #[test]
    fn test_integer_serializes_without_fraction() {
        let answer = normalize("4");
        assert_eq!(serde_json::to_string(&answer).unwrap(), "4");
    }

    #[test]
    fn test_booleans_ignore_case() {
        assert_eq!(normalize("true"), AnswerValue::Boolean(true));
        assert_eq!(normalize("FALSE"), AnswerValue::Boolean(false));
        assert_eq!(normalize("True"), AnswerValue::Boolean(true));
    }

    #[test]
    fn test_json_object_and_array() {
        assert_eq!(normalize("{\"a\":1}"), AnswerValue::Json(json!({"a": 1})));
        assert_eq!(normalize("[1, 2, 3]"), AnswerValue::Json(json!([1, 2, 3])));
    }

    #[test]
    fn test_bracketed_number_is_json_not_number() {
        assert_eq!(normalize("[5]"), AnswerValue::Json(json!([5])));
    }

    #[test]
    fn test_malformed_json_falls_through_to_string() {
        assert_eq!(normalize("{not json"), AnswerValue::String("{not json".to_string()));
        assert_eq!(normalize("{not: json}"), AnswerValue::String("{not: json}".to_string()));
    }

    #[test]
    fn test_data_uri_verbatim() {
        let uri = "data:image/png;base64,AAAA";
        assert_eq!(normalize(uri), AnswerValue::DataUri(uri.to_string()));
    }

    #[test]
    fn test_plain_string() {
        assert_eq!(
            normalize("hello world"),
            AnswerValue::String("hello world".to_string())
        );
    }

    #[test]
    fn test_non_finite_and_numeric_looking_strings() {
        assert_eq!(normalize("inf"), AnswerValue::String("inf".to_string()));
        assert_eq!(normalize("NaN"), AnswerValue::String("NaN".to_string()));
        assert_eq!(normalize("1,234"), AnswerValue::String("1,234".to_string()));
        assert_eq!(normalize("12 apples"), AnswerValue::String("12 apples".to_string()));
    }

    #[test]
    fn test_empty_input_is_empty_string() {
        assert_eq!(normalize("   "), AnswerValue::String(String::new()));
    }
}
