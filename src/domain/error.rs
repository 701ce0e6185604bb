//! Domain error types.

use crate::domain::record::{RecordId, StockField};

/// Top-level error type for stockdesk.
#[derive(Debug, thiserror::Error)]
pub enum StockdeskError {
    #[error("request to {url} failed: {reason}")]
    Http { url: String, reason: String },

    #[error("{method} {url} returned {status}: {body}")]
    Status {
        method: String,
        url: String,
        status: u16,
        body: String,
    },

    #[error("could not decode response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("All fields are required (empty: {})", join_fields(.missing))]
    Validation { missing: Vec<StockField> },

    #[error("draft was not saved: {0}")]
    NotSaved(String),

    #[error("no record with id {0}")]
    UnknownRecord(RecordId),

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("import row {row}: {reason}")]
    Import { row: usize, reason: String },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn join_fields(fields: &[StockField]) -> String {
    fields
        .iter()
        .map(|f| f.name())
        .collect::<Vec<_>>()
        .join(", ")
}

impl StockdeskError {
    /// Process exit status for this error class.
    pub fn exit_status(&self) -> u8 {
        match self {
            StockdeskError::Io(_) | StockdeskError::Csv(_) => 1,
            StockdeskError::ConfigParse { .. }
            | StockdeskError::ConfigInvalid { .. } => 2,
            StockdeskError::Http { .. }
            | StockdeskError::Status { .. }
            | StockdeskError::Decode { .. } => 3,
            StockdeskError::Validation { .. }
            | StockdeskError::NotSaved(_)
            | StockdeskError::UnknownRecord(_) => 4,
            StockdeskError::Import { .. } => 5,
        }
    }
}

impl From<&StockdeskError> for std::process::ExitCode {
    fn from(err: &StockdeskError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
