//! 题目链处理器 - 编排层
//!
//! ## 职责
//!
//! 顺序调用单题流程，沿着每次提交返回的下一题地址推进，
//! 受全局时间预算和题目数上限约束。
//!
//! ## 终止条件
//!
//! - 没有下一题地址（链条完成，或答错且服务器不再给出后续）
//! - 已处理题数达到上限
//! - 剩余时间低于安全余量（不再开始新题，已开始的调用不会被打断）
//! - 单题流程返回错误（提交网络失败等），链条中止
//!
//! 本模块是错误传播的边界：调用方只拿到 [`ChainReport`]

use std::fmt::Display;
use std::time::{Duration, Instant};

use anyhow::Result;
use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::models::AttemptResult;
use crate::utils::logging;
use crate::workflow::{QuizCtx, QuizFlow};

/// 单题求解
#[async_trait]
pub trait QuizSolver: Send + Sync {
    async fn solve(&self, ctx: &QuizCtx) -> Result<AttemptResult>;
}

#[async_trait]
impl QuizSolver for QuizFlow {
    async fn solve(&self, ctx: &QuizCtx) -> Result<AttemptResult> {
        self.run(ctx).await
    }
}

/// 题目链限制
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainLimits {
    pub max_attempts: usize,
    pub budget: Duration,
    pub safety_margin: Duration,
}

impl Default for ChainLimits {
    fn default() -> Self {
        Self {
            max_attempts: 50,
            budget: Duration::from_secs(170),
            safety_margin: Duration::from_secs(10),
        }
    }
}

/// 题目链运行状态，每轮循环更新一次
#[derive(Debug, Clone)]
pub struct ChainState {
    pub current_url: Option<String>,
    pub attempt_count: usize,
    pub started_at: Instant,
    pub budget: Duration,
}

impl ChainState {
    pub fn new(initial_url: impl Into<String>, budget: Duration) -> Self {
        Self {
            current_url: Some(initial_url.into()),
            attempt_count: 0,
            started_at: Instant::now(),
            budget,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// 剩余时间，超出预算时为零
    pub fn remaining(&self) -> Duration {
        self.budget.saturating_sub(self.elapsed())
    }
}

/// 题目链结束原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainOutcome {
    /// 服务器不再给出下一题
    Completed,
    /// 达到题目数上限
    AttemptCapReached,
    /// 剩余时间不足
    DeadlineReached,
    /// 答题失败且没有下一题地址
    StoppedAfterFailure,
    /// 单题流程出错
    Aborted(String),
}

impl Display for ChainOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChainOutcome::Completed => f.write_str("链条完成"),
            ChainOutcome::AttemptCapReached => f.write_str("达到题目数上限"),
            ChainOutcome::DeadlineReached => f.write_str("时间预算耗尽"),
            ChainOutcome::StoppedAfterFailure => f.write_str("答题失败且无后续题目"),
            ChainOutcome::Aborted(reason) => write!(f, "异常中止: {}", reason),
        }
    }
}

/// 题目链统计
#[derive(Debug, Clone)]
pub struct ChainReport {
    pub outcome: ChainOutcome,
    /// 调用单题流程的次数
    pub attempts: usize,
    /// 答对的题数
    pub solved: usize,
    pub elapsed: Duration,
}

/// 运行一条题目链
pub async fn run_chain<S>(solver: &S, initial_url: &str, limits: ChainLimits) -> ChainReport
where
    S: QuizSolver + ?Sized,
{
    logging::log_chain_start(initial_url, limits.budget, limits.max_attempts);

    let mut state = ChainState::new(initial_url, limits.budget);
    let mut solved = 0;

    let outcome = loop {
        let Some(url) = state.current_url.take() else {
            break ChainOutcome::Completed;
        };
        if state.attempt_count >= limits.max_attempts {
            warn!("⚠️ 已处理 {} 题，达到上限", state.attempt_count);
            break ChainOutcome::AttemptCapReached;
        }
        if state.remaining() < limits.safety_margin {
            warn!(
                "⚠️ 剩余时间 {:.1} 秒，低于安全余量，不再开始新题",
                state.remaining().as_secs_f64()
            );
            break ChainOutcome::DeadlineReached;
        }

        state.attempt_count += 1;
        let ctx = QuizCtx::new(url, state.attempt_count);

        let result = match solver.solve(&ctx).await {
            Ok(result) => result,
            Err(e) => {
                error!("{} ❌ 处理失败，终止题目链: {:#}", ctx, e);
                break ChainOutcome::Aborted(format!("{:#}", e));
            }
        };

        if result.success {
            solved += 1;
        }

        match (result.success, result.next_url) {
            (_, Some(next)) => {
                if !result.success {
                    warn!("{} ⏭️ 回答未通过，继续下一题", ctx);
                }
                info!("{} ➡️ 下一题: {}", ctx, next);
                state.current_url = Some(next);
            }
            (true, None) => {
                info!("{} 🏁 没有下一题", ctx);
                break ChainOutcome::Completed;
            }
            (false, None) => {
                warn!(
                    "{} ⚠️ 回答失败且没有下一题: {}",
                    ctx,
                    result.error.as_deref().unwrap_or("未知原因")
                );
                break ChainOutcome::StoppedAfterFailure;
            }
        }
    };

    let report = ChainReport {
        outcome,
        attempts: state.attempt_count,
        solved,
        elapsed: state.elapsed(),
    };
    logging::log_chain_end(
        &report.outcome.to_string(),
        report.attempts,
        report.solved,
        report.elapsed,
    );
    report
}
