//! CSV / Excel 表格提取

use std::io::Cursor;

use anyhow::Result;
use async_trait::async_trait;
use calamine::{Data, Reader};
use serde_json::Value as JsonValue;

use crate::error::{AppError, ExtractError};
use crate::models::{ColumnSummary, FileLink, ProcessedContent};

use super::Extractor;

/// CSV 表格（第一行为表头）
pub struct CsvExtractor;

#[async_trait]
impl Extractor for CsvExtractor {
    fn name(&self) -> &'static str {
        "csv"
    }

    async fn extract(&self, _file: &FileLink, bytes: &[u8]) -> Result<ProcessedContent> {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(bytes);

        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| AppError::malformed("csv", e))?
            .iter()
            .map(str::to_string)
            .collect();
        if columns.iter().all(|c| c.is_empty()) {
            return Err(empty("csv"));
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| AppError::malformed("csv", e))?;
            rows.push(record.iter().map(text_cell).collect());
        }

        Ok(tabular(columns, rows))
    }
}

/// Excel 工作簿（取第一个工作表，第一行为表头）
pub struct ExcelExtractor;

#[async_trait]
impl Extractor for ExcelExtractor {
    fn name(&self) -> &'static str {
        "calamine"
    }

    async fn extract(&self, _file: &FileLink, bytes: &[u8]) -> Result<ProcessedContent> {
        let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
            .map_err(|e| AppError::malformed("excel", e))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| empty("excel"))?
            .map_err(|e| AppError::malformed("excel", e))?;

        let mut sheet_rows = range.rows();
        let columns: Vec<String> = match sheet_rows.next() {
            Some(header) => header.iter().map(|c| c.to_string()).collect(),
            None => return Err(empty("excel")),
        };
        let rows = sheet_rows
            .map(|row| row.iter().map(excel_cell).collect())
            .collect();

        Ok(tabular(columns, rows))
    }
}

fn tabular(columns: Vec<String>, rows: Vec<Vec<JsonValue>>) -> ProcessedContent {
    let summary = summarize_columns(&columns, &rows);
    ProcessedContent::Tabular {
        columns,
        rows,
        summary,
    }
}

fn empty(format: &str) -> anyhow::Error {
    AppError::Extract(ExtractError::Empty {
        format: format.to_string(),
    })
    .into()
}

/// CSV 单元格：能解析成数字的转成数字，空串为 null
fn text_cell(raw: &str) -> JsonValue {
    if raw.is_empty() {
        return JsonValue::Null;
    }
    if let Ok(int) = raw.parse::<i64>() {
        return JsonValue::from(int);
    }
    match raw.parse::<f64>() {
        Ok(float) if float.is_finite() => JsonValue::from(float),
        _ => JsonValue::String(raw.to_string()),
    }
}

fn excel_cell(cell: &Data) -> JsonValue {
    match cell {
        Data::Empty => JsonValue::Null,
        Data::Int(i) => JsonValue::from(*i),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => JsonValue::from(*f as i64),
        Data::Float(f) => JsonValue::from(*f),
        Data::Bool(b) => JsonValue::Bool(*b),
        Data::String(s) => text_cell(s.trim()),
        other => JsonValue::String(other.to_string()),
    }
}

/// 数值列汇总
///
/// 只统计非空值全部为数字的列
pub fn summarize_columns(columns: &[String], rows: &[Vec<JsonValue>]) -> Vec<ColumnSummary> {
    let mut summaries = Vec::new();
    for (index, column) in columns.iter().enumerate() {
        let mut values = Vec::new();
        let mut numeric = true;
        for row in rows {
            match row.get(index) {
                None | Some(JsonValue::Null) => {}
                Some(JsonValue::Number(n)) => values.extend(n.as_f64()),
                Some(_) => {
                    numeric = false;
                    break;
                }
            }
        }
        if !numeric || values.is_empty() {
            continue;
        }

        let sum: f64 = values.iter().sum();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        summaries.push(ColumnSummary {
            column: column.clone(),
            count: values.len(),
            sum,
            mean: sum / values.len() as f64,
            min,
            max,
        });
    }
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_csv_rows_and_summary() {
        let file = FileLink::new("https://x/sales.csv", "");
        let csv = b"region,amount,note\nnorth,10,a\nsouth,25.5,\neast,4.5,b\n";

        let content = CsvExtractor.extract(&file, csv).await.unwrap();
        let ProcessedContent::Tabular {
            columns,
            rows,
            summary,
        } = content
        else {
            panic!("expected tabular content");
        };

        assert_eq!(columns, vec!["region", "amount", "note"]);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec![json!("north"), json!(10), json!("a")]);
        assert_eq!(rows[1][2], JsonValue::Null);

        assert_eq!(summary.len(), 1);
        let amount = &summary[0];
        assert_eq!(amount.column, "amount");
        assert_eq!(amount.count, 3);
        assert_eq!(amount.sum, 40.0);
        assert_eq!(amount.min, 4.5);
        assert_eq!(amount.max, 25.5);
    }

    #[tokio::test]
    async fn test_csv_ragged_rows_are_kept() {
        let file = FileLink::new("https://x/a.csv", "");
        let content = CsvExtractor
            .extract(&file, b"a,b\n1\n2,3,4\n")
            .await
            .unwrap();
        let ProcessedContent::Tabular { rows, summary, .. } = content else {
            panic!("expected tabular content");
        };
        assert_eq!(rows[0], vec![json!(1)]);
        assert_eq!(rows[1], vec![json!(2), json!(3), json!(4)]);
        assert_eq!(summary[0].sum, 3.0);
        assert_eq!(summary[1].count, 1);
    }

    #[tokio::test]
    async fn test_csv_empty_is_error() {
        let file = FileLink::new("https://x/a.csv", "");
        assert!(CsvExtractor.extract(&file, b"").await.is_err());
    }

    #[tokio::test]
    async fn test_excel_rejects_non_workbook() {
        let file = FileLink::new("https://x/a.xlsx", "");
        assert!(ExcelExtractor.extract(&file, b"a,b\n1,2\n").await.is_err());
    }

    #[test]
    fn test_summary_skips_mixed_columns() {
        let columns = vec!["mixed".to_string()];
        let rows = vec![vec![json!(1)], vec![json!("two")]];
        assert!(summarize_columns(&columns, &rows).is_empty());
    }
}
