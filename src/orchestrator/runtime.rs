//! 运行时服务句柄
//!
//! 进程内只创建一次：持有浏览器会话与各个客户端，
//! 为每条题目链构建 [`QuizFlow`]。显式创建、显式关闭

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use crate::browser::BrowserSession;
use crate::clients::{FileDownloader, LlmClient, SubmitClient};
use crate::config::Config;
use crate::models::Credentials;
use crate::orchestrator::chain_runner::{run_chain, ChainReport};
use crate::services::{
    AnswerSubmitter, BrowserRenderer, ContentDispatcher, FileFetcher, LanguageModel, PageRenderer,
    PromptComposer,
};
use crate::workflow::QuizFlow;

/// 运行时
pub struct Runtime {
    config: Config,
    session: Arc<BrowserSession>,
    renderer: Arc<dyn PageRenderer>,
    fetcher: Arc<dyn FileFetcher>,
    llm: Arc<dyn LanguageModel>,
    submitter: Arc<dyn AnswerSubmitter>,
    dispatcher: ContentDispatcher,
    composer: PromptComposer,
}

impl Runtime {
    /// 启动浏览器并创建客户端
    pub async fn start(config: Config) -> Result<Self> {
        let session = Arc::new(BrowserSession::open(&config).await?);
        info!("✓ 浏览器会话就绪");

        let composer = PromptComposer::new(config.max_prompt_chars);
        let client = LlmClient::new(&config);
        info!(
            "✓ LLM 客户端就绪: {} (单次超时 {} 秒)",
            client.model_name(),
            config.llm_timeout_secs
        );
        let llm: Arc<dyn LanguageModel> = Arc::new(client);
        let dispatcher = ContentDispatcher::new(llm.clone(), composer.clone());

        Ok(Self {
            renderer: Arc::new(BrowserRenderer::new(session.clone(), &config)),
            fetcher: Arc::new(FileDownloader::new(&config)?),
            submitter: Arc::new(SubmitClient::new(&config)?),
            llm,
            dispatcher,
            composer,
            session,
            config,
        })
    }

    /// 为一组凭据构建单题流程
    pub fn flow_for(&self, credentials: Credentials) -> QuizFlow {
        QuizFlow::new(
            self.renderer.clone(),
            self.fetcher.clone(),
            self.dispatcher.clone(),
            self.composer.clone(),
            self.llm.clone(),
            self.submitter.clone(),
            credentials,
        )
    }

    /// 运行一条完整的题目链
    pub async fn run_chain(&self, credentials: Credentials, url: &str) -> ChainReport {
        let flow = self.flow_for(credentials);
        run_chain(&flow, url, self.config.chain_limits()).await
    }

    /// 关闭运行时
    ///
    /// 仍有题目链持有会话时只记录警告，会话随最后一个引用释放
    pub async fn shutdown(self) {
        let Self {
            session, renderer, ..
        } = self;
        drop(renderer);
        match Arc::try_unwrap(session) {
            Ok(session) => session.close().await,
            Err(_) => warn!("⚠️ 浏览器会话仍在使用，等待其自行释放"),
        }
    }
}
