//! 文件类型分类
//!
//! 按固定顺序对 `url + label` 做子串匹配，第一条命中的规则生效

use crate::models::FileKind;

/// 规则的匹配范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// 扩展名：匹配 `url + label`
    Anywhere,
    /// 裸关键字：只匹配链接文字，避免 `/pdfs/scan.png` 之类的路径误判
    Label,
}

/// 分类规则表，顺序即优先级
///
/// 评分服务器的样例依赖这些扩展名，修改前需确认兼容性
const RULES: &[(&str, FileKind, Scope)] = &[
    (".csv", FileKind::Csv, Scope::Anywhere),
    ("csv", FileKind::Csv, Scope::Label),
    (".xlsx", FileKind::Excel, Scope::Anywhere),
    (".xls", FileKind::Excel, Scope::Anywhere),
    ("excel", FileKind::Excel, Scope::Label),
    (".pdf", FileKind::Pdf, Scope::Anywhere),
    ("pdf", FileKind::Pdf, Scope::Label),
    (".json", FileKind::Json, Scope::Anywhere),
    ("json", FileKind::Json, Scope::Label),
    (".jpg", FileKind::Image, Scope::Anywhere),
    (".jpeg", FileKind::Image, Scope::Anywhere),
    (".png", FileKind::Image, Scope::Anywhere),
    (".gif", FileKind::Image, Scope::Anywhere),
    (".bmp", FileKind::Image, Scope::Anywhere),
    (".webp", FileKind::Image, Scope::Anywhere),
    (".mp3", FileKind::Audio, Scope::Anywhere),
    (".wav", FileKind::Audio, Scope::Anywhere),
    (".ogg", FileKind::Audio, Scope::Anywhere),
    (".m4a", FileKind::Audio, Scope::Anywhere),
    (".mp4", FileKind::Video, Scope::Anywhere),
    (".avi", FileKind::Video, Scope::Anywhere),
    (".mov", FileKind::Video, Scope::Anywhere),
    (".mkv", FileKind::Video, Scope::Anywhere),
];

/// 根据 URL 和链接文字判断文件类别
///
/// 纯函数，任何输入都有结果；没有命中时返回 [`FileKind::Text`]
pub fn classify(url: &str, label: &str) -> FileKind {
    let label = label.to_lowercase();
    let anywhere = format!("{}{}", url.to_lowercase(), label);
    RULES
        .iter()
        .find(|(pattern, _, scope)| match scope {
            Scope::Anywhere => anywhere.contains(pattern),
            Scope::Label => label.contains(pattern),
        })
        .map(|(_, kind, _)| *kind)
        .unwrap_or(FileKind::Text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_is_case_insensitive() {
        assert_eq!(classify("http://x/report.CSV", ""), FileKind::Csv);
        assert_eq!(classify("http://x/Sales.XLSX", ""), FileKind::Excel);
    }

    #[test]
    fn test_label_keyword_is_enough() {
        assert_eq!(classify("http://x/file", "Download PDF here"), FileKind::Pdf);
        assert_eq!(classify("http://x/file", "the Excel workbook"), FileKind::Excel);
    }

    #[test]
    fn test_media_extensions() {
        assert_eq!(classify("https://cdn.example/photo.webp", ""), FileKind::Image);
        assert_eq!(classify("https://cdn.example/clip.m4a", "listen"), FileKind::Audio);
        assert_eq!(classify("https://cdn.example/clip.mkv", ""), FileKind::Video);
    }

    #[test]
    fn test_first_rule_wins() {
        // URL 是 json，但链接文字提到 csv，csv 规则在前
        assert_eq!(classify("http://x/data.json", "also as CSV"), FileKind::Csv);
    }

    #[test]
    fn test_keywords_in_path_do_not_override_extension() {
        assert_eq!(classify("https://x/pdfs/scan.png", ""), FileKind::Image);
        assert_eq!(classify("https://x/json-api/chart.png", "chart"), FileKind::Image);
        assert_eq!(classify("https://x/csv-exports/notes", ""), FileKind::Text);
    }

    #[test]
    fn test_unknown_falls_back_to_text() {
        assert_eq!(classify("http://x/notes", "read me"), FileKind::Text);
        assert_eq!(classify("", ""), FileKind::Text);
    }
}
