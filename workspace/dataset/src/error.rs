use thiserror::Error;

/// Error types for the dataset module
#[derive(Error, Debug)]
pub enum DatasetError {
    /// A load-bearing invariant of the embedded tables does not hold.
    /// Construction of the dataset is aborted when this happens.
    #[error("Data integrity error in table '{table}': {reason}")]
    DataIntegrity { table: String, reason: String },

    /// The requested table is not one of the known tables
    #[error("Table not found: {0}")]
    NotFound(String),

    /// A column label could not be interpreted as a period
    #[error("Invalid period label: '{0}'")]
    InvalidPeriod(String),

    /// The static dataset file could not be read
    #[error("Failed to read dataset file: {0}")]
    Io(#[from] std::io::Error),

    /// The static dataset file is not valid JSON for the expected shape
    #[error("Malformed dataset file: {0}")]
    Json(#[from] serde_json::Error),
}

impl DatasetError {
    pub(crate) fn integrity(table: impl Into<String>, reason: impl Into<String>) -> Self {
        DatasetError::DataIntegrity {
            table: table.into(),
            reason: reason.into(),
        }
    }
}

/// Type alias for Result with DatasetError
pub type Result<T> = std::result::Result<T, DatasetError>;
