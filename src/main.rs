use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use quiz_chain_solver::api::{self, ApiState};
use quiz_chain_solver::utils::logging;
use quiz_chain_solver::{Config, Runtime};

const CONFIG_FILE: &str = "quiz_solver.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load(CONFIG_FILE)?;

    // 初始化日志
    logging::init(config.verbose_logging);
    config.validate()?;
    logging::log_startup(&config.listen_addr, &config.llm_model_name);

    // 启动浏览器与客户端
    let runtime = Arc::new(Runtime::start(config.clone()).await?);

    let app = api::router(ApiState {
        email: config.email.clone(),
        secret: config.secret.clone(),
        launcher: Arc::new(runtime.clone()),
    });

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("无法监听 {}", config.listen_addr))?;
    info!("✓ 服务已启动: http://{}", config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("收到退出信号，正在关闭...");
        })
        .await?;

    match Arc::try_unwrap(runtime) {
        Ok(runtime) => runtime.shutdown().await,
        Err(_) => info!("仍有题目链在运行，浏览器随进程退出"),
    }
    Ok(())
}
