// File: crates/vizbind-core/src/error.rs
// Summary: Error taxonomy for loading, scaling, reconciling and resolving chart data.

use thiserror::Error;

/// Every error is terminal for the current load/update cycle; the chart keeps its
/// last valid state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error("failed to fetch '{resource}': {message}")]
    Fetch { resource: String, message: String },

    #[error("parse error at row {row}, field '{field}': {message}")]
    Parse {
        row: usize,
        field: String,
        message: String,
    },

    #[error("empty domain for '{field}': dataset has no usable records")]
    EmptyDomain { field: String },

    #[error("dataset is not sorted ascending by '{field}' (index {index})")]
    UnsortedDataset { field: String, index: usize },

    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("duplicate element key '{0}'")]
    DuplicateKey(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ChartError>;

impl ChartError {
    pub fn parse(row: usize, field: impl Into<String>, message: impl Into<String>) -> Self {
        ChartError::Parse {
            row,
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn empty_domain(field: impl Into<String>) -> Self {
        ChartError::EmptyDomain { field: field.into() }
    }
}

impl From<std::io::Error> for ChartError {
    fn from(err: std::io::Error) -> Self {
        ChartError::Fetch {
            resource: String::from("<io>"),
            message: err.to_string(),
        }
    }
}

impl From<csv::Error> for ChartError {
    fn from(err: csv::Error) -> Self {
        let row = err.position().map(|p| p.record() as usize).unwrap_or(0);
        ChartError::Parse {
            row,
            field: String::new(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ChartError {
    fn from(err: serde_json::Error) -> Self {
        ChartError::Parse {
            row: err.line(),
            field: String::new(),
            message: err.to_string(),
        }
    }
}
