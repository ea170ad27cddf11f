//! 浏览器渲染服务 - 业务能力层
//!
//! 只负责"把一个题目地址变成 QuizPage"，不关心答题流程

use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use tokio::time::{sleep, timeout};
use tracing::{debug, info};
use url::Url;

use crate::browser::BrowserSession;
use crate::config::Config;
use crate::error::{AppError, BrowserError};
use crate::infrastructure::JsExecutor;
use crate::models::{FileKind, FileLink, QuizPage};
use crate::services::classifier::classify;
use crate::services::traits::PageRenderer;

/// 页面快照脚本：正文、#result、链接与媒体元素
const SNAPSHOT_SCRIPT: &str = r#"
(() => {
    const clean = (s) => (s || '').trim();
    const links = Array.from(document.querySelectorAll('a[href]')).map((a) => ({
        href: a.getAttribute('href') || '',
        text: clean(a.innerText || a.textContent),
    }));
    const media = Array.from(
        document.querySelectorAll('img[src], audio[src], video[src], source[src], embed[src], iframe[src]')
    ).map((el) => ({
        href: el.getAttribute('src') || '',
        text: clean(el.getAttribute('alt') || el.getAttribute('title') || el.tagName.toLowerCase()),
    }));
    return {
        text: document.body ? document.body.innerText : '',
        links,
        media,
    };
})()
"#;

static ABSOLUTE_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s"'<>]+"#).expect("URL 正则无效"));
static RELATIVE_SUBMIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|[\s"'(])(/[^\s"'<>()]*submit[^\s"'<>()]*)"#).expect("提交路径正则无效")
});

/// 快照中的原始链接
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLink {
    pub href: String,
    pub text: String,
}

/// 页面快照
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageSnapshot {
    pub text: String,
    /// `#result` 元素的文本
    #[serde(default)]
    pub result_text: Option<String>,
    #[serde(default)]
    pub links: Vec<RawLink>,
    #[serde(default)]
    pub media: Vec<RawLink>,
}

/// 基于无头浏览器的页面渲染
pub struct BrowserRenderer {
    session: Arc<BrowserSession>,
    page_load_timeout: Duration,
    settle_delay: Duration,
}

impl BrowserRenderer {
    pub fn new(session: Arc<BrowserSession>, config: &Config) -> Self {
        Self {
            session,
            page_load_timeout: Duration::from_secs(config.page_load_timeout_secs),
            settle_delay: Duration::from_millis(config.page_settle_ms),
        }
    }

    async fn snapshot(&self, executor: &JsExecutor, url: &str) -> Result<PageSnapshot> {
        let page = executor.page();
        let navigation = async {
            page.goto(url).await?;
            page.wait_for_navigation().await?;
            Ok::<_, chromiumoxide::error::CdpError>(())
        };
        match timeout(self.page_load_timeout, navigation).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                return Err(AppError::Browser(BrowserError::NavigationFailed {
                    url: url.to_string(),
                    source: Box::new(e),
                })
                .into())
            }
            Err(_) => {
                return Err(AppError::Browser(BrowserError::NavigationTimeout {
                    url: url.to_string(),
                    timeout_secs: self.page_load_timeout.as_secs(),
                })
                .into())
            }
        }

        // 等待页面脚本渲染题目
        sleep(self.settle_delay).await;

        let capture = async {
            let mut snapshot: PageSnapshot = executor.eval_as(SNAPSHOT_SCRIPT).await?;
            snapshot.result_text = executor.inner_text("#result").await?;
            Ok::<_, anyhow::Error>(snapshot)
        };
        within(self.page_load_timeout, url, capture).await
    }
}

/// 给浏览器调用加上时间上限，超时视为导航超时
async fn within<T, F>(limit: Duration, url: &str, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(AppError::Browser(BrowserError::NavigationTimeout {
            url: url.to_string(),
            timeout_secs: limit.as_secs(),
        })
        .into()),
    }
}

#[async_trait]
impl PageRenderer for BrowserRenderer {
    async fn render(&self, url: &str) -> Result<QuizPage> {
        let open = async { Ok::<_, anyhow::Error>(self.session.new_page().await?) };
        let page = within(self.page_load_timeout, url, open).await?;
        let executor = JsExecutor::new(page);
        let snapshot = self.snapshot(&executor, url).await;

        if let Err(e) = executor.into_page().close().await {
            debug!("关闭页面失败: {}", e);
        }

        let quiz = build_quiz_page(url, snapshot?);
        info!(
            "✓ 页面渲染完成: 正文 {} 字符, {} 个文件, 提交地址 {:?}",
            quiz.content.chars().count(),
            quiz.files.len(),
            quiz.submit_url
        );
        Ok(quiz)
    }
}

/// 从快照构建 QuizPage
///
/// - 题目优先取 `#result`，否则取正文
/// - 相对地址按题目地址解析
/// - 提交地址取正文或链接中第一个包含 `submit` 的地址
/// - 文件候选保持页面顺序并去重，排除题目页与提交地址本身
/// - 同站的相对链接也作为候选（抓取网页或接口数据）
pub fn build_quiz_page(quiz_url: &str, snapshot: PageSnapshot) -> QuizPage {
    let base = Url::parse(quiz_url).ok();
    let question = snapshot
        .result_text
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| snapshot.text.trim())
        .to_string();

    let submit_url = find_submit_url(&question, &snapshot, base.as_ref());

    let mut seen: HashSet<String> = HashSet::new();
    seen.insert(strip_fragment(quiz_url));
    if let Some(submit) = &submit_url {
        seen.insert(strip_fragment(submit));
    }

    let mut files = Vec::new();
    let candidates = snapshot
        .links
        .iter()
        .map(|l| (l, false))
        .chain(snapshot.media.iter().map(|l| (l, true)));
    for (link, is_media) in candidates {
        let Some(url) = resolve(base.as_ref(), &link.href) else {
            continue;
        };
        if !seen.insert(strip_fragment(&url)) {
            continue;
        }
        if is_media
            || looks_like_file(&url, &link.text)
            || is_same_origin_page(&link.href, &url, base.as_ref())
        {
            files.push(FileLink::new(url, link.text.clone()));
        }
    }

    QuizPage {
        question,
        content: snapshot.text,
        submit_url,
        files,
    }
}

fn find_submit_url(question: &str, snapshot: &PageSnapshot, base: Option<&Url>) -> Option<String> {
    for text in [question, snapshot.text.as_str()] {
        let absolute = ABSOLUTE_URL_RE
            .find_iter(text)
            .map(|m| trim_url_punctuation(m.as_str()))
            .find(|u| u.to_lowercase().contains("submit"));
        if let Some(url) = absolute {
            return Some(url.to_string());
        }
    }

    let from_links = snapshot
        .links
        .iter()
        .filter_map(|l| resolve(base, &l.href))
        .find(|u| u.to_lowercase().contains("submit"));
    if from_links.is_some() {
        return from_links;
    }

    for text in [question, snapshot.text.as_str()] {
        if let Some(caps) = RELATIVE_SUBMIT_RE.captures(text) {
            if let Some(url) = resolve(base, trim_url_punctuation(&caps[1])) {
                return Some(url);
            }
        }
    }
    None
}

fn resolve(base: Option<&Url>, href: &str) -> Option<String> {
    let href = href.trim();
    let lower = href.to_lowercase();
    if href.is_empty()
        || href.starts_with('#')
        || lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
    {
        return None;
    }
    if lower.starts_with("data:") {
        return Some(href.to_string());
    }
    match base {
        Some(base) => base.join(href).ok().map(String::from),
        None => Url::parse(href).ok().map(String::from),
    }
}

fn strip_fragment(url: &str) -> String {
    url.split('#').next().unwrap_or(url).to_string()
}

fn trim_url_punctuation(url: &str) -> &str {
    url.trim_end_matches(['.', ',', ';', ':', ')', ']', '!', '?'])
}

/// 链接是否指向可下载的数据文件
fn looks_like_file(url: &str, label: &str) -> bool {
    if classify(url, label) != FileKind::Text {
        return true;
    }
    let url_lower = url.to_lowercase();
    let label_lower = label.to_lowercase();
    url_lower.starts_with("data:")
        || url_lower.ends_with(".txt")
        || label_lower.contains("download")
        || url_lower.contains("download")
}

/// 同站相对链接（站点首页除外）
fn is_same_origin_page(href: &str, url: &str, base: Option<&Url>) -> bool {
    let href = href.trim();
    if href.starts_with("//") || href.contains("://") || href.to_lowercase().starts_with("data:") {
        return false;
    }
    let (Some(base), Ok(target)) = (base, Url::parse(url)) else {
        return false;
    };
    target.origin() == base.origin() && (target.path() != "/" || target.query().is_some())
}
