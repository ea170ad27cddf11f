use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 浏览器相关错误
    #[error("浏览器错误: {0}")]
    Browser(#[from] BrowserError),
    /// HTTP 调用错误（下载、提交）
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// LLM 服务错误
    #[error("LLM错误: {0}")]
    Llm(#[from] LlmError),
    /// 文件内容提取错误
    #[error("提取错误: {0}")]
    Extract(#[from] ExtractError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件读写错误
    #[error("读取文件失败 ({path}): {source}")]
    FileRead { path: String, source: BoxError },
}

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 连接浏览器失败
    #[error("无法连接到浏览器 (端口: {port}): {source}")]
    ConnectionFailed { port: u16, source: BoxError },
    /// 启动浏览器失败
    #[error("启动无头浏览器失败: {0}")]
    LaunchFailed(String),
    /// 创建页面失败
    #[error("创建页面失败: {source}")]
    PageCreationFailed { source: BoxError },
    /// 导航失败
    #[error("导航到 {url} 失败: {source}")]
    NavigationFailed { url: String, source: BoxError },
    /// 页面加载超时
    #[error("页面加载超时 ({url}, {timeout_secs}秒)")]
    NavigationTimeout { url: String, timeout_secs: u64 },
    /// 执行脚本失败
    #[error("执行脚本失败: {source}")]
    ScriptExecutionFailed { source: BoxError },
}

/// HTTP 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed { endpoint: String, source: BoxError },
    /// 下载返回非成功状态码
    #[error("下载失败 ({url}): HTTP {status}")]
    BadStatus { url: String, status: u16 },
    /// 文件超过大小限制
    #[error("文件过大 ({url}): 超过 {limit} 字节")]
    TooLarge { url: String, limit: usize },
    /// 响应体无法解析为提交结果
    #[error("无法解析响应 ({endpoint}, HTTP {status}): {body}")]
    UnparseableBody {
        endpoint: String,
        status: u16,
        body: String,
    },
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// API 调用失败（已用完重试次数）
    #[error("LLM API调用失败 (模型: {model}, 已尝试 {attempts} 次): {source}")]
    ApiCallFailed {
        model: String,
        attempts: u32,
        source: BoxError,
    },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
}

/// 文件内容提取错误
#[derive(Debug, Error)]
pub enum ExtractError {
    /// 内容格式不正确
    #[error("{format} 内容无法解析: {reason}")]
    Malformed { format: String, reason: String },
    /// 内容为空
    #[error("{format} 内容为空")]
    Empty { format: String },
    /// 所有提取策略都失败
    #[error("所有提取策略均失败: {}", .0.join("; "))]
    Exhausted(Vec<String>),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 必填项缺失
    #[error("缺少必填配置 {var_name}")]
    MissingValue { var_name: String },
    /// 配置文件解析失败
    #[error("配置文件 {path} 解析失败: {source}")]
    FileParseFailed { path: String, source: BoxError },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建浏览器连接错误
    pub fn browser_connection_failed(port: u16, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::Browser(BrowserError::ConnectionFailed {
            port,
            source: Box::new(source),
        })
    }

    /// 创建API请求失败错误
    pub fn api_request_failed(endpoint: impl Into<String>, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::Api(ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::FileRead {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// 创建内容格式错误
    pub fn malformed(format: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        AppError::Extract(ExtractError::Malformed {
            format: format.into(),
            reason: reason.to_string(),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
