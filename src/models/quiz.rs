//! 题目页面与提交相关的数据结构

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::answer::AnswerValue;

/// 题目页面上的文件链接
///
/// `label` 只用于分类判断，下载永远使用 `url`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileLink {
    pub url: String,
    pub label: String,
}

impl FileLink {
    pub fn new(url: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            label: label.into(),
        }
    }
}

/// 一次渲染得到的题目页面
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizPage {
    /// 题目文本
    pub question: String,
    /// 页面全部可见文本
    pub content: String,
    /// 页面声明的提交地址
    pub submit_url: Option<String>,
    /// 候选文件（保持页面顺序）
    pub files: Vec<FileLink>,
}

/// 提交凭据（来自 /solve 请求）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub secret: String,
}

/// 提交到评分服务器的请求体
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionPayload<'a> {
    pub email: &'a str,
    pub secret: &'a str,
    pub url: &'a str,
    pub answer: &'a AnswerValue,
}

/// 评分服务器的响应
///
/// 无论 HTTP 状态码如何，响应体都按此结构解析
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionResult {
    /// 缺失或为 `null` 时视为答错
    #[serde(default, deserialize_with = "null_as_false")]
    pub correct: bool,
    /// 下一题地址，链条结束时为空
    #[serde(default, rename = "url")]
    pub next_url: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// 单题处理结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttemptResult {
    pub success: bool,
    pub next_url: Option<String>,
    pub error: Option<String>,
}

impl AttemptResult {
    /// 未进入提交阶段就失败
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            next_url: None,
            error: Some(error.into()),
        }
    }
}

impl From<SubmissionResult> for AttemptResult {
    fn from(result: SubmissionResult) -> Self {
        Self {
            success: result.correct,
            next_url: result.next_url.filter(|u| !u.trim().is_empty()),
            error: result.reason,
        }
    }
}
