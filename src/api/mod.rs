//! HTTP 接口
//!
//! 只负责接收请求与校验凭据，题目链交给编排层

pub mod solve;

pub use solve::{router, ApiState, ChainLauncher};
