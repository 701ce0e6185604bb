//! Stock record representation and edit drafts.

use crate::domain::error::StockdeskError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Server-assigned record identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(RecordId)
    }
}

/// One stock row as held by the collection.
///
/// Every value column is kept as text. The server sends decimals as strings
/// and volume as an integer; both are accepted and normalised to strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
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

impl Record {
    pub fn field(&self, field: StockField) -> &str {
        match field {
            StockField::Date => &self.date,
            StockField::TradeCode => &self.trade_code,
            StockField::High => &self.high,
            StockField::Low => &self.low,
            StockField::Open => &self.open,
            StockField::Close => &self.close,
            StockField::Volume => &self.volume,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
}

pub(crate) fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Text(s) => s,
        Scalar::Int(i) => i.to_string(),
        Scalar::Float(f) => f.to_string(),
    })
}

/// The seven user-editable columns, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StockField {
    Date,
    TradeCode,
    High,
    Low,
    Open,
    Close,
    Volume,
}

impl StockField {
    pub const ALL: [StockField; 7] = [
        StockField::Date,
        StockField::TradeCode,
        StockField::High,
        StockField::Low,
        StockField::Open,
        StockField::Close,
        StockField::Volume,
    ];

    /// Wire name of the field.
    pub fn name(self) -> &'static str {
        match self {
            StockField::Date => "date",
            StockField::TradeCode => "trade_code",
            StockField::High => "high",
            StockField::Low => "low",
            StockField::Open => "open",
            StockField::Close => "close",
            StockField::Volume => "volume",
        }
    }

    /// Column heading used by the table view.
    pub fn label(self) -> &'static str {
        match self {
            StockField::Date => "Date",
            StockField::TradeCode => "Trade Code",
            StockField::High => "High",
            StockField::Low => "Low",
            StockField::Open => "Open",
            StockField::Close => "Close",
            StockField::Volume => "Volume",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for StockField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StockField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        StockField::ALL
            .into_iter()
            .find(|f| f.name() == normalized)
            .ok_or_else(|| format!("unknown field '{}'", s.trim()))
    }
}

/// Uncommitted field values for the row being inserted or edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordDraft {
    values: [String; 7],
}

impl RecordDraft {
    /// A draft with all seven fields empty.
    pub fn blank() -> Self {
        Self::default()
    }

    /// A draft seeded from the current values of `record`.
    pub fn from_record(record: &Record) -> Self {
        let mut draft = Self::blank();
        for field in StockField::ALL {
            draft.set(field, record.field(field));
        }
        draft
    }

    pub fn get(&self, field: StockField) -> &str {
        &self.values[field.index()]
    }

    pub fn set(&mut self, field: StockField, value: impl Into<String>) {
        self.values[field.index()] = value.into();
    }

    pub fn with(mut self, field: StockField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Fields whose value is the empty string, in table order.
    pub fn missing_fields(&self) -> Vec<StockField> {
        StockField::ALL
            .into_iter()
            .filter(|f| self.get(*f).is_empty())
            .collect()
    }

    /// Check the save contract: all seven fields must be non-empty.
    pub fn validate(&self) -> Result<RecordPayload, StockdeskError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(StockdeskError::Validation { missing });
        }
        Ok(RecordPayload {
            date: self.get(StockField::Date).to_string(),
            trade_code: self.get(StockField::TradeCode).to_string(),
            high: self.get(StockField::High).to_string(),
            low: self.get(StockField::Low).to_string(),
            open: self.get(StockField::Open).to_string(),
            close: self.get(StockField::Close).to_string(),
            volume: self.get(StockField::Volume).to_string(),
        })
    }
}

/// A validated create/update body. Always carries all seven fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPayload {
    pub date: String,
    pub trade_code: String,
    pub high: String,
    pub low: String,
    pub open: String,
    pub close: String,
    pub volume: String,
}

impl RecordPayload {
    pub fn into_record(self, id: RecordId) -> Record {
        Record {
            id,
            date: self.date,
            trade_code: self.trade_code,
            high: self.high,
            low: self.low,
            open: self.open,
            close: self.close,
            volume: self.volume,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> Record {
        Record {
            id: RecordId(1),
            date: "2020-01-01".into(),
            trade_code: "ABC".into(),
            high: "11".into(),
            low: "9".into(),
            open: "10".into(),
            close: "10".into(),
            volume: "100".into(),
        }
    }

    #[test]
    fn decodes_server_representation() {
        let json = r#"{"id": 42, "date": "2020-01-01", "trade_code": "ABC",
            "high": "11.50", "low": "9.25", "open": "10.00", "close": "10.75",
            "volume": 1200}"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, RecordId(42));
        assert_eq!(record.high, "11.50");
        assert_eq!(record.volume, "1200");
    }

    #[test]
    fn decodes_numeric_prices() {
        let json = r#"{"id": 1, "date": "2020-01-01", "trade_code": "ABC",
            "high": 11.5, "low": 9, "open": 10, "close": 10.25, "volume": "7"}"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.high, "11.5");
        assert_eq!(record.low, "9");
        assert_eq!(record.volume, "7");
    }

    #[test]
    fn record_without_id_is_rejected() {
        let json = r#"{"date": "2020-01-01", "trade_code": "ABC", "high": "1",
            "low": "1", "open": "1", "close": "1", "volume": "1"}"#;
        assert!(serde_json::from_str::<Record>(json).is_err());
    }

    #[test]
    fn field_names_parse_both_spellings() {
        assert_eq!("trade_code".parse::<StockField>(), Ok(StockField::TradeCode));
        assert_eq!("Trade-Code".parse::<StockField>(), Ok(StockField::TradeCode));
        assert_eq!(" close ".parse::<StockField>(), Ok(StockField::Close));
        assert!("price".parse::<StockField>().is_err());
    }

    #[test]
    fn blank_draft_is_missing_everything() {
        assert_eq!(RecordDraft::blank().missing_fields(), StockField::ALL.to_vec());
    }

    #[test]
    fn draft_from_record_copies_all_fields() {
        let record = sample_record();
        let draft = RecordDraft::from_record(&record);
        for field in StockField::ALL {
            assert_eq!(draft.get(field), record.field(field));
        }
        assert!(draft.missing_fields().is_empty());
    }

    #[test]
    fn validate_rejects_any_empty_field() {
        for field in StockField::ALL {
            let draft = RecordDraft::from_record(&sample_record()).with(field, "");
            match draft.validate() {
                Err(StockdeskError::Validation { missing }) => assert_eq!(missing, vec![field]),
                other => panic!("expected validation error, got {other:?}"),
            }
        }
    }

    #[test]
    fn whitespace_counts_as_a_value() {
        let draft = RecordDraft::from_record(&sample_record()).with(StockField::Volume, " ");
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn payload_serializes_seven_fields() {
        let payload = RecordDraft::from_record(&sample_record()).validate().unwrap();
        let value = serde_json::to_value(&payload).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 7);
        assert!(!obj.contains_key("id"));
        assert_eq!(obj["trade_code"], "ABC");
    }

    #[test]
    fn payload_into_record_attaches_id() {
        let payload = RecordDraft::from_record(&sample_record()).validate().unwrap();
        let record = payload.into_record(RecordId(9));
        assert_eq!(record.id, RecordId(9));
        assert_eq!(record.close, "10");
    }
}
