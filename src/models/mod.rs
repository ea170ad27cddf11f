pub mod answer;
pub mod content;
pub mod file_kind;
pub mod quiz;

pub use answer::AnswerValue;
pub use content::{ColumnSummary, ProcessedContent};
pub use file_kind::FileKind;
pub use quiz::{AttemptResult, Credentials, FileLink, QuizPage, SubmissionPayload, SubmissionResult};
