//! 浏览器会话
//!
//! 进程内共享的浏览器句柄，显式创建、显式关闭。
//! 未调用 [`BrowserSession::close`] 就被丢弃时，`Drop` 仍会终止事件任务，
//! 自行启动的浏览器进程随 `Browser` 一起被回收

use chromiumoxide::{Browser, Page};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::browser::{connect_to_browser, launch_headless_browser};
use crate::config::Config;
use crate::error::{AppResult, BrowserError};

/// 浏览器会话
pub struct BrowserSession {
    browser: Option<Browser>,
    handler_task: JoinHandle<()>,
    /// 自行启动的浏览器在关闭时一起退出；连接的外部浏览器保持运行
    launched: bool,
}

impl BrowserSession {
    /// 根据配置连接或启动浏览器
    pub async fn open(config: &Config) -> AppResult<Self> {
        let (browser, handler_task, launched) = match config.browser_debug_port {
            Some(port) => {
                let (browser, task) = connect_to_browser(port).await?;
                (browser, task, false)
            }
            None => {
                let (browser, task) = launch_headless_browser(config.chrome_executable.as_deref()).await?;
                (browser, task, true)
            }
        };
        Ok(Self {
            browser: Some(browser),
            handler_task,
            launched,
        })
    }

    /// 打开新的空白页面
    pub async fn new_page(&self) -> AppResult<Page> {
        let browser = self
            .browser
            .as_ref()
            .ok_or_else(|| BrowserError::LaunchFailed("浏览器会话已关闭".to_string()))?;
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::PageCreationFailed { source: Box::new(e) })?;
        Ok(page)
    }

    /// 关闭会话
    pub async fn close(mut self) {
        if let Some(mut browser) = self.browser.take() {
            if self.launched {
                if let Err(e) = browser.close().await {
                    warn!("关闭浏览器失败: {}", e);
                }
                if let Err(e) = browser.wait().await {
                    warn!("等待浏览器进程退出失败: {}", e);
                }
                info!("✓ 浏览器已关闭");
            } else {
                debug!("断开外部浏览器连接");
            }
        }
        self.handler_task.abort();
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}
