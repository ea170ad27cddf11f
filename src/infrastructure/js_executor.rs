//! JS 执行器 - 基础设施层
//!
//! 持有一个已导航的 page，只暴露"执行 JS"的能力

use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::error::{AppError, AppResult, BrowserError};

/// JS 执行器
///
/// 职责：
/// - 持有 Page 资源
/// - 暴露 eval() 能力
/// - 不认识 QuizPage / FileLink
pub struct JsExecutor {
    page: Page,
}

impl JsExecutor {
    /// 创建新的 JS 执行器
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 获取 page 的引用（用于其他操作）
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 归还 page（用于关闭）
    pub fn into_page(self) -> Page {
        self.page
    }

    /// 执行 JS 表达式并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> AppResult<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await.map_err(script_failed)?;
        result.into_value::<JsonValue>().map_err(script_failed)
    }

    /// 执行 JS 表达式并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> AppResult<T> {
        let json_value = self.eval(js_code).await?;
        serde_json::from_value(json_value).map_err(|e| {
            AppError::Browser(BrowserError::ScriptExecutionFailed {
                source: Box::new(e),
            })
        })
    }

    /// 读取元素的 innerText，元素不存在时返回 None
    pub async fn inner_text(&self, selector: &str) -> AppResult<Option<String>> {
        let selector_json = serde_json::to_string(selector).map_err(|e| {
            AppError::Browser(BrowserError::ScriptExecutionFailed {
                source: Box::new(e),
            })
        })?;
        let script = format!(
            "(() => {{ const el = document.querySelector({}); return el ? el.innerText : null; }})()",
            selector_json
        );
        self.eval_as(script).await
    }
}

fn script_failed(err: impl std::error::Error + Send + Sync + 'static) -> AppError {
    AppError::Browser(BrowserError::ScriptExecutionFailed {
        source: Box::new(err),
    })
}
