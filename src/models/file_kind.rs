/// 文件内容类别
///
/// 由文件分类器根据 URL 和链接文字给出，用于选择提取器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// CSV 表格
    Csv,
    /// Excel 工作簿
    Excel,
    /// PDF 文档
    Pdf,
    /// JSON 数据
    Json,
    /// 图片
    Image,
    /// 音频
    Audio,
    /// 视频
    Video,
    /// 纯文本（兜底）
    Text,
}

impl FileKind {
    /// 获取标签名称
    pub fn name(self) -> &'static str {
        match self {
            FileKind::Csv => "csv",
            FileKind::Excel => "excel",
            FileKind::Pdf => "pdf",
            FileKind::Json => "json",
            FileKind::Image => "image",
            FileKind::Audio => "audio",
            FileKind::Video => "video",
            FileKind::Text => "text",
        }
    }

    /// 是否为音视频类文件（下载时使用更长的超时）
    pub fn is_media(self) -> bool {
        matches!(self, FileKind::Audio | FileKind::Video)
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
