//! 音视频元信息
//!
//! 无法在本地转写时，只给出格式、大小和提示文字，让 LLM 依靠页面上下文作答

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{FileKind, FileLink, ProcessedContent};
use crate::services::classifier::classify;

use super::Extractor;

/// 格式名 → MIME 类型
pub static MIME_TYPES: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "png" => "image/png",
    "jpeg" => "image/jpeg",
    "gif" => "image/gif",
    "bmp" => "image/bmp",
    "webp" => "image/webp",
    "mp3" => "audio/mpeg",
    "wav" => "audio/wav",
    "ogg" => "audio/ogg",
    "m4a" => "audio/mp4",
    "mp4" => "video/mp4",
    "mov" => "video/quicktime",
    "avi" => "video/x-msvideo",
    "mkv" => "video/x-matroska",
    "pdf" => "application/pdf",
};

/// 根据文件头识别格式
pub fn sniff_format(bytes: &[u8]) -> Option<&'static str> {
    let riff_kind = |tag: &[u8]| bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == tag;

    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("jpeg")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("gif")
    } else if bytes.starts_with(b"BM") && bytes.len() > 14 {
        Some("bmp")
    } else if riff_kind(b"WEBP") {
        Some("webp")
    } else if riff_kind(b"WAVE") {
        Some("wav")
    } else if riff_kind(b"AVI ") {
        Some("avi")
    } else if bytes.starts_with(b"ID3") || (bytes.len() > 1 && bytes[0] == 0xFF && bytes[1] & 0xE0 == 0xE0) {
        Some("mp3")
    } else if bytes.starts_with(b"OggS") {
        Some("ogg")
    } else if bytes.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
        Some("mkv")
    } else if bytes.len() >= 12 && &bytes[4..8] == b"ftyp" {
        match &bytes[8..12] {
            b"M4A " | b"M4B " => Some("m4a"),
            b"qt  " => Some("mov"),
            _ => Some("mp4"),
        }
    } else if bytes.starts_with(b"%PDF") {
        Some("pdf")
    } else {
        None
    }
}

/// 从 URL 中取扩展名作为格式（文件头无法识别时使用）
fn extension_of(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let name = path.rsplit('/').next()?;
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() || ext.len() > 5 {
        return None;
    }
    Some(ext.to_lowercase())
}

/// 音视频元信息提取
pub struct MediaInfoExtractor;

#[async_trait]
impl Extractor for MediaInfoExtractor {
    fn name(&self) -> &'static str {
        "media-info"
    }

    async fn extract(&self, file: &FileLink, bytes: &[u8]) -> Result<ProcessedContent> {
        if bytes.is_empty() {
            anyhow::bail!("文件为空: {}", file.url);
        }
        let format = sniff_format(bytes)
            .map(str::to_string)
            .or_else(|| extension_of(&file.url))
            .unwrap_or_else(|| "unknown".to_string());
        let noun = match classify(&file.url, &file.label) {
            FileKind::Video => "Video",
            FileKind::Audio => "Audio",
            _ => "Media",
        };
        let guidance = format!(
            "{} file ({}, {:.1} KB) could not be transcribed. Answer from the question text, \
             the page context and this file metadata.",
            noun,
            format,
            bytes.len() as f64 / 1024.0
        );
        Ok(ProcessedContent::MediaInfo {
            format,
            size_bytes: bytes.len(),
            guidance: Some(guidance),
        })
    }
}
