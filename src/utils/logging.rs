/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use std::time::Duration;

use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 日志
///
/// 默认级别 `quiz_chain_solver=info`，可通过 `RUST_LOG` 覆盖
pub fn init(verbose: bool) {
    let default_directive = if verbose {
        "quiz_chain_solver=debug"
    } else {
        "quiz_chain_solver=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(false).try_init();
}

/// 记录服务启动信息
pub fn log_startup(listen_addr: &str, model_name: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 答题服务启动 - {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    info!("🌐 监听地址: {}", listen_addr);
    info!("🤖 LLM 模型: {}", model_name);
    info!("{}", "=".repeat(60));
}

/// 记录题目链开始
///
/// # 参数
/// - `url`: 第一题地址
/// - `budget`: 时间预算
/// - `max_attempts`: 最多处理的题目数
pub fn log_chain_start(url: &str, budget: Duration, max_attempts: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始处理题目链: {}", url);
    info!(
        "⏱️ 时间预算: {} 秒 | 最多 {} 题",
        budget.as_secs(),
        max_attempts
    );
    info!("{}", "=".repeat(60));
}

/// 记录题目链结束统计
pub fn log_chain_end(outcome: &str, attempts: usize, solved: usize, elapsed: Duration) {
    info!("\n{}", "=".repeat(60));
    info!("📊 题目链结束: {}", outcome);
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("✅ 答对: {}/{}", solved, attempts);
    info!("⏱️ 用时: {:.1} 秒", elapsed.as_secs_f64());
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
