//! JSON file reader for bulk import.

use crate::domain::error::StockdeskError;
use crate::domain::import::ImportRow;
use std::fs;
use std::path::Path;

pub fn read_import_file(path: &Path) -> Result<Vec<ImportRow>, StockdeskError> {
    let content = fs::read_to_string(path)?;
    parse_import_rows(&content)
}

pub fn parse_import_rows(content: &str) -> Result<Vec<ImportRow>, StockdeskError> {
    let values: Vec<serde_json::Value> =
        serde_json::from_str(content).map_err(|e| StockdeskError::Import {
            row: 0,
            reason: format!("expected a JSON array of objects: {e}"),
        })?;
    values
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            serde_json::from_value(value).map_err(|e| StockdeskError::Import {
                row,
                reason: e.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"[
  {"date": "2020-08-10", "trade_code": "1JANATAMF", "high": "4.3", "low": "4.1",
   "open": "4.1", "close": "4.2", "volume": "2,285,416"},
  {"date": "2020-08-10", "trade_code": "1STPRIMFMF", "high": "12.1", "low": "11.5",
   "open": "11.9", "close": "11.9", "volume": "40,253"}
]"#;

    #[test]
    fn reads_rows_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", SAMPLE).unwrap();
        let rows = read_import_file(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].trade_code, "1STPRIMFMF");
        assert_eq!(rows[0].volume, "2,285,416");
    }

    #[test]
    fn missing_field_reports_row() {
        let content = r#"[{"date": "2020-08-10", "trade_code": "A", "high": "1", "low": "1",
            "open": "1", "close": "1", "volume": "1"}, {"date": "2020-08-11"}]"#;
        let err = parse_import_rows(content).unwrap_err();
        assert!(matches!(err, StockdeskError::Import { row: 1, .. }));
    }

    #[test]
    fn non_array_rejected() {
        assert!(parse_import_rows(r#"{"date": "2020-08-10"}"#).is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_import_file(Path::new("/nonexistent/stocks.json")).unwrap_err();
        assert!(matches!(err, StockdeskError::Io(_)));
    }
}
