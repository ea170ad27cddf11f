//! 业务能力层（Services）
//!
//! 每个模块只描述"我能做什么"，不关心题目链的推进顺序

pub mod answer_normalizer;
pub mod classifier;
pub mod dispatcher;
pub mod extractors;
pub mod prompt;
pub mod renderer;
pub mod traits;

pub use answer_normalizer::normalize;
pub use classifier::classify;
pub use dispatcher::{ContentDispatcher, Extraction};
pub use prompt::PromptComposer;
pub use renderer::BrowserRenderer;
pub use traits::{AnswerSubmitter, Attachment, FileFetcher, LanguageModel, PageRenderer};
