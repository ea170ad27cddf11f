pub mod downloader;
pub mod llm_client;
pub mod submit_client;

pub use downloader::FileDownloader;
pub use llm_client::LlmClient;
pub use submit_client::SubmitClient;
