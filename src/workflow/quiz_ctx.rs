//! 题目处理上下文
//!
//! 封装"我正在处理题目链的第几题"这一信息

use std::fmt::Display;

/// 题目处理上下文
#[derive(Debug, Clone)]
pub struct QuizCtx {
    /// 题目地址
    pub quiz_url: String,

    /// 题目在链中的序号（从1开始）
    pub attempt: usize,
}

impl QuizCtx {
    pub fn new(quiz_url: impl Into<String>, attempt: usize) -> Self {
        Self {
            quiz_url: quiz_url.into(),
            attempt,
        }
    }
}

impl Display for QuizCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[第 {} 题]", self.attempt)
    }
}
