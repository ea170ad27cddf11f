//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `chain_runner` - 题目链处理器
//! - 沿着下一题地址顺序推进
//! - 检查时间预算与题目数上限
//! - 输出整条链的统计信息
//!
//! ### `runtime` - 运行时服务句柄
//! - 持有浏览器会话与各个客户端
//! - 为每条题目链构建 QuizFlow
//!
//! ## 层次关系
//!
//! ```text
//! api::solve (接收请求，后台启动)
//!     ↓
//! chain_runner (处理一条题目链)
//!     ↓
//! workflow::QuizFlow (处理单个题目)
//!     ↓
//! services (能力层：render / extract / prompt / normalize)
//!     ↓
//! clients + infrastructure (LLM / HTTP / JsExecutor)
//! ```

pub mod chain_runner;
pub mod runtime;

pub use chain_runner::{run_chain, ChainLimits, ChainOutcome, ChainReport, ChainState, QuizSolver};
pub use runtime::Runtime;
