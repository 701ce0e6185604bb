//! Bulk import of raw stock rows.
//!
//! Raw rows come from market data dumps where numbers may carry thousands
//! separators ("1,234.50"). Every row is normalised and checked before the
//! first create call, so a bad file never half-loads.

use crate::domain::error::StockdeskError;
use crate::domain::record::{scalar_string, Record, RecordPayload};
use crate::ports::stock_store_port::StockStorePort;
use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImportRow {
    #[serde(deserialize_with = "scalar_string")]
    pub date: String,
    #[serde(deserialize_with = "scalar_string")]
    pub trade_code: String,
    #[serde(deserialize_with = "scalar_string")]
    pub high: String,
    #[serde(deserialize_with = "scalar_string")]
    pub low: String,
    #[serde(deserialize_with = "scalar_string")]
    pub open: String,
    #[serde(deserialize_with = "scalar_string")]
    pub close: String,
    #[serde(deserialize_with = "scalar_string")]
    pub volume: String,
}

fn strip_separators(raw: &str) -> String {
    raw.trim().replace(',', "")
}

fn decimal(row: usize, name: &str, raw: &str) -> Result<String, StockdeskError> {
    let cleaned = strip_separators(raw);
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(cleaned),
        _ => Err(StockdeskError::Import {
            row,
            reason: format!("{name} '{raw}' is not a decimal"),
        }),
    }
}

/// Normalise row `index` (0-based) into a create payload.
pub fn normalize_row(index: usize, row: &ImportRow) -> Result<RecordPayload, StockdeskError> {
    let date = NaiveDate::parse_from_str(row.date.trim(), "%Y-%m-%d").map_err(|_| {
        StockdeskError::Import {
            row: index,
            reason: format!("date '{}' is not YYYY-MM-DD", row.date),
        }
    })?;

    let trade_code = row.trade_code.trim();
    if trade_code.is_empty() {
        return Err(StockdeskError::Import {
            row: index,
            reason: "trade_code is empty".into(),
        });
    }

    let volume = strip_separators(&row.volume);
    volume.parse::<i64>().map_err(|_| StockdeskError::Import {
        row: index,
        reason: format!("volume '{}' is not an integer", row.volume),
    })?;

    Ok(RecordPayload {
        date: date.format("%Y-%m-%d").to_string(),
        trade_code: trade_code.to_string(),
        high: decimal(index, "high", &row.high)?,
        low: decimal(index, "low", &row.low)?,
        open: decimal(index, "open", &row.open)?,
        close: decimal(index, "close", &row.close)?,
        volume,
    })
}

pub fn normalize_rows(rows: &[ImportRow]) -> Result<Vec<RecordPayload>, StockdeskError> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| normalize_row(i, row))
        .collect()
}

/// Create every row through `store`, in order. Stops at the first failed create.
pub fn import_rows(
    store: &dyn StockStorePort,
    rows: &[ImportRow],
) -> Result<Vec<Record>, StockdeskError> {
    let payloads = normalize_rows(rows)?;
    let mut created = Vec::with_capacity(payloads.len());
    for (i, payload) in payloads.iter().enumerate() {
        match store.create(payload) {
            Ok(record) => created.push(record),
            Err(e) => {
                log::error!("import stopped after {} of {} rows", created.len(), payloads.len());
                return Err(StockdeskError::Import {
                    row: i,
                    reason: e.to_string(),
                });
            }
        }
    }
    log::info!("imported {} rows", created.len());
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str, volume: &str, close: &str) -> ImportRow {
        ImportRow {
            date: date.into(),
            trade_code: "1JANATAMF".into(),
            high: "4.3".into(),
            low: "4.1".into(),
            open: "4.1".into(),
            close: close.into(),
            volume: volume.into(),
        }
    }

    #[test]
    fn strips_thousands_separators() {
        let payload = normalize_row(0, &row("2020-08-10", "2,285,416", "1,004.20")).unwrap();
        assert_eq!(payload.volume, "2285416");
        assert_eq!(payload.close, "1004.20");
    }

    #[test]
    fn rejects_bad_date() {
        let err = normalize_row(3, &row("10/08/2020", "1", "1")).unwrap_err();
        assert!(matches!(err, StockdeskError::Import { row: 3, .. }));
    }

    #[test]
    fn rejects_fractional_volume() {
        let err = normalize_row(0, &row("2020-08-10", "12.5", "1")).unwrap_err();
        assert!(err.to_string().contains("volume"));
    }

    #[test]
    fn rejects_non_numeric_price() {
        let err = normalize_row(1, &row("2020-08-10", "1", "n/a")).unwrap_err();
        assert!(err.to_string().contains("close"));
    }

    #[test]
    fn rows_accept_numeric_json() {
        let json = r#"[{"date": "2020-08-10", "trade_code": "ABC", "high": 4.3,
            "low": 4.1, "open": 4.1, "close": 4.2, "volume": 1000}]"#;
        let rows: Vec<ImportRow> = serde_json::from_str(json).unwrap();
        let payloads = normalize_rows(&rows).unwrap();
        assert_eq!(payloads[0].volume, "1000");
        assert_eq!(payloads[0].high, "4.3");
    }

    #[test]
    fn first_bad_row_reported() {
        let rows = vec![
            row("2020-08-10", "1", "1"),
            row("2020-08-11", "x", "1"),
            row("bad", "1", "1"),
        ];
        let err = normalize_rows(&rows).unwrap_err();
        assert!(matches!(err, StockdeskError::Import { row: 1, .. }));
    }
}
