//! 文件下载客户端
//!
//! 按文件类别选择超时，并限制下载大小

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use base64::Engine;
use tracing::debug;

use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};
use crate::models::FileKind;
use crate::services::traits::FileFetcher;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// 文件下载客户端
pub struct FileDownloader {
    client: reqwest::Client,
    timeout: Duration,
    media_timeout: Duration,
    max_bytes: usize,
}

impl FileDownloader {
    pub fn new(config: &Config) -> AppResult<Self> {
        Self::with_limits(
            Duration::from_secs(config.download_timeout_secs),
            Duration::from_secs(config.media_download_timeout_secs),
            config.max_file_size_bytes,
        )
    }

    pub fn with_limits(timeout: Duration, media_timeout: Duration, max_bytes: usize) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::api_request_failed("reqwest::Client", e))?;
        Ok(Self {
            client,
            timeout,
            media_timeout,
            max_bytes,
        })
    }

    fn too_large(&self, url: &str) -> AppError {
        AppError::Api(ApiError::TooLarge {
            url: url.to_string(),
            limit: self.max_bytes,
        })
    }
}

#[async_trait]
impl FileFetcher for FileDownloader {
    async fn fetch(&self, url: &str, kind: FileKind) -> Result<Vec<u8>> {
        if url.starts_with("data:") {
            let bytes = decode_data_uri(url)?;
            if bytes.len() > self.max_bytes {
                return Err(self.too_large(url).into());
            }
            return Ok(bytes);
        }

        let timeout = if kind.is_media() {
            self.media_timeout
        } else {
            self.timeout
        };
        debug!("下载文件 [{}] {} (超时 {} 秒)", kind, url, timeout.as_secs());

        let mut response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Api(ApiError::BadStatus {
                url: url.to_string(),
                status: status.as_u16(),
            })
            .into());
        }

        if response.content_length().is_some_and(|len| len as usize > self.max_bytes) {
            return Err(self.too_large(url).into());
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| AppError::api_request_failed(url, e))?
        {
            if bytes.len() + chunk.len() > self.max_bytes {
                return Err(self.too_large(url).into());
            }
            bytes.extend_from_slice(&chunk);
        }

        debug!("下载完成: {} ({} 字节)", url, bytes.len());
        Ok(bytes)
    }
}

/// 解码页面内嵌的 data URI
fn decode_data_uri(uri: &str) -> AppResult<Vec<u8>> {
    let (meta, data) = uri
        .split_once(',')
        .ok_or_else(|| AppError::malformed("data-uri", "缺少逗号分隔"))?;
    if meta.ends_with(";base64") {
        base64::engine::general_purpose::STANDARD
            .decode(data.trim())
            .map_err(|e| AppError::malformed("data-uri", e))
    } else {
        Ok(data.as_bytes().to_vec())
    }
}
