//! # Quiz Chain Solver
//!
//! 自动完成一条"题目链"：渲染题目页面，下载并提取附件，
//! 交给 LLM 作答，规范化答案后提交，再沿着服务器返回的地址进入下一题
//!
//! ## 架构设计
//!
//! 本系统采用严格的分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `browser/` - 浏览器会话（启动或连接），显式创建、显式关闭
//! - `infrastructure/` - `JsExecutor`，page 的唯一持有者，提供 eval() 能力
//! - `clients/` - LLM、文件下载、答案提交三个 HTTP 客户端
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个题目
//! - `classifier` / `dispatcher` / `extractors` - 文件分类与内容提取
//! - `prompt` / `answer_normalizer` - prompt 构建与答案规范化
//! - `renderer` - 把题目地址渲染成 `QuizPage`
//!
//! ### ③ 流程层（Workflow）
//! - `QuizCtx` - 上下文封装（题目地址 + 序号）
//! - `QuizFlow` - 单题流程（render → extract → LLM → normalize → submit）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/chain_runner` - 题目链处理器，管理时间预算与题目数上限
//! - `orchestrator/runtime` - 运行时服务句柄
//! - `api/` - `POST /solve` 入口
//!
//! ## 模块结构

pub mod api;
pub mod browser;
pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::JsExecutor;
pub use models::{AnswerValue, AttemptResult, Credentials, FileKind, FileLink, ProcessedContent, QuizPage};
pub use orchestrator::{run_chain, ChainLimits, ChainOutcome, ChainReport, QuizSolver, Runtime};
pub use workflow::{QuizCtx, QuizFlow};
