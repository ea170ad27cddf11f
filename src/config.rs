use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{AppError, AppResult, ConfigError};
use crate::orchestrator::ChainLimits;

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 提交时使用的邮箱
    pub email: String,
    /// 共享密钥（/solve 校验与提交共用）
    pub secret: String,
    /// HTTP 监听地址
    pub listen_addr: String,
    // --- 浏览器配置 ---
    /// 已运行浏览器的调试端口，为空时启动无头浏览器
    pub browser_debug_port: Option<u16>,
    /// 浏览器可执行文件路径，为空时自动查找
    pub chrome_executable: Option<String>,
    /// 页面加载超时
    pub page_load_timeout_secs: u64,
    /// 页面加载后额外等待脚本执行的时间
    pub page_settle_ms: u64,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    /// LLM 调用最大尝试次数
    pub llm_max_retries: u32,
    /// 单次 LLM 调用的超时，超时计为一次失败尝试
    pub llm_timeout_secs: u64,
    // --- 题目链配置 ---
    /// 整条题目链的时间预算
    pub chain_budget_secs: u64,
    /// 剩余时间低于此值时不再开始新题
    pub safety_margin_secs: u64,
    /// 单条链最多处理的题目数
    pub max_attempts: usize,
    // --- 下载与提交 ---
    pub download_timeout_secs: u64,
    pub media_download_timeout_secs: u64,
    pub submit_timeout_secs: u64,
    pub max_file_size_bytes: usize,
    /// 写入 prompt 的文件内容最大字符数
    pub max_prompt_chars: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            email: String::new(),
            secret: String::new(),
            listen_addr: "0.0.0.0:8000".to_string(),
            browser_debug_port: None,
            chrome_executable: None,
            page_load_timeout_secs: 30,
            page_settle_ms: 2000,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
            llm_max_retries: 3,
            llm_timeout_secs: 30,
            chain_budget_secs: 170,
            safety_margin_secs: 10,
            max_attempts: 50,
            download_timeout_secs: 30,
            media_download_timeout_secs: 60,
            submit_timeout_secs: 30,
            max_file_size_bytes: 10 * 1024 * 1024,
            max_prompt_chars: 100_000,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 先读取 TOML 配置文件（可选），再用环境变量覆盖
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let base = if path.exists() {
            let content = std::fs::read_to_string(path)
                .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
            toml::from_str::<Config>(&content).map_err(|e| {
                AppError::Config(ConfigError::FileParseFailed {
                    path: path.display().to_string(),
                    source: Box::new(e),
                })
            })?
        } else {
            Self::default()
        };
        Ok(base.with_env_overrides())
    }

    fn with_env_overrides(self) -> Self {
        let default = self;
        Self {
            email: std::env::var("QUIZ_EMAIL").unwrap_or(default.email),
            secret: std::env::var("QUIZ_SECRET").unwrap_or(default.secret),
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or(default.listen_addr),
            browser_debug_port: std::env::var("BROWSER_DEBUG_PORT").ok().and_then(|v| v.parse().ok()).or(default.browser_debug_port),
            chrome_executable: std::env::var("CHROME_EXECUTABLE").ok().or(default.chrome_executable),
            page_load_timeout_secs: env_parse("PAGE_LOAD_TIMEOUT_SECS").unwrap_or(default.page_load_timeout_secs),
            page_settle_ms: env_parse("PAGE_SETTLE_MS").unwrap_or(default.page_settle_ms),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            llm_max_retries: env_parse("LLM_MAX_RETRIES").unwrap_or(default.llm_max_retries),
            llm_timeout_secs: env_parse("LLM_TIMEOUT_SECS").unwrap_or(default.llm_timeout_secs),
            chain_budget_secs: env_parse("CHAIN_BUDGET_SECS").unwrap_or(default.chain_budget_secs),
            safety_margin_secs: env_parse("SAFETY_MARGIN_SECS").unwrap_or(default.safety_margin_secs),
            max_attempts: env_parse("MAX_ATTEMPTS").unwrap_or(default.max_attempts),
            download_timeout_secs: env_parse("DOWNLOAD_TIMEOUT_SECS").unwrap_or(default.download_timeout_secs),
            media_download_timeout_secs: env_parse("MEDIA_DOWNLOAD_TIMEOUT_SECS").unwrap_or(default.media_download_timeout_secs),
            submit_timeout_secs: env_parse("SUBMIT_TIMEOUT_SECS").unwrap_or(default.submit_timeout_secs),
            max_file_size_bytes: env_parse("MAX_FILE_SIZE_BYTES").unwrap_or(default.max_file_size_bytes),
            max_prompt_chars: env_parse("MAX_PROMPT_CHARS").unwrap_or(default.max_prompt_chars),
            verbose_logging: env_parse("VERBOSE_LOGGING").unwrap_or(default.verbose_logging),
        }
    }

    /// 启动前检查必填项
    pub fn validate(&self) -> AppResult<()> {
        let required = [
            ("QUIZ_EMAIL", &self.email),
            ("QUIZ_SECRET", &self.secret),
            ("LLM_API_KEY", &self.llm_api_key),
        ];
        for (var_name, value) in required {
            if value.trim().is_empty() {
                return Err(AppError::Config(ConfigError::MissingValue {
                    var_name: var_name.to_string(),
                }));
            }
        }
        Ok(())
    }

    pub fn chain_limits(&self) -> ChainLimits {
        ChainLimits {
            max_attempts: self.max_attempts,
            budget: Duration::from_secs(self.chain_budget_secs),
            safety_margin: Duration::from_secs(self.safety_margin_secs),
        }
    }
}

fn env_parse<T: std::str::FromStr>(var_name: &str) -> Option<T> {
    std::env::var(var_name).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_chain_limits() {
        let limits = Config::default().chain_limits();
        assert_eq!(limits.max_attempts, 50);
        assert_eq!(limits.budget, Duration::from_secs(170));
        assert_eq!(limits.safety_margin, Duration::from_secs(10));
    }

    #[test]
    fn test_toml_partial_override_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            email = "student@example.com"
            max_attempts = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.email, "student@example.com");
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.submit_timeout_secs, 30);
        assert_eq!(config.llm_timeout_secs, 30);
    }

    #[test]
    fn test_validate_reports_missing_secret() {
        let config = Config {
            email: "student@example.com".to_string(),
            llm_api_key: "key".to_string(),
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("QUIZ_SECRET"));
    }
}
