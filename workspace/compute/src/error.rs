use dataset::DatasetError;
use thiserror::Error;
use tracing::error;

/// Error types for the compute module
#[derive(Error, Debug)]
pub enum ComputeError {
    /// Error from the dataset (unknown table, integrity failure)
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// The requested column (year or measure) is not part of the table
    #[error("Column '{column}' not found in table '{table}'")]
    ColumnNotFound { table: String, column: String },

    /// The category column passed for reshaping is not the table's row dimension
    #[error("Table '{table}' has no category column '{column}'")]
    UnknownCategoryColumn { table: String, column: String },

    /// A year range outside the domain or with start after end
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// Unknown chart slot identifier
    #[error("Unknown chart: {0}")]
    UnknownChart(String),

    /// A derived figure cannot be computed from the loaded data
    #[error("Calculation error: {0}")]
    Calculation(String),

    /// Error from Polars DataFrame operations
    #[error("DataFrame error: {0}")]
    DataFrame(String),
}

impl ComputeError {
    pub fn column_not_found(table: impl Into<String>, column: impl Into<String>) -> Self {
        ComputeError::ColumnNotFound {
            table: table.into(),
            column: column.into(),
        }
    }
}

// Implement From<polars::error::PolarsError> for ComputeError
impl From<polars::error::PolarsError> for ComputeError {
    fn from(error: polars::error::PolarsError) -> Self {
        let compute_error = match error {
            polars::error::PolarsError::ColumnNotFound(_) => {
                let err = ComputeError::DataFrame(format!("Column not found: {}", error));
                error!(?err, "DataFrame error: Column not found");
                err
            }
            polars::error::PolarsError::ShapeMismatch(_) => {
                let err = ComputeError::DataFrame(format!("Shape mismatch: {}", error));
                error!(?err, "DataFrame error: Shape mismatch");
                err
            }
            polars::error::PolarsError::SchemaMismatch(_) => {
                let err = ComputeError::DataFrame(format!("Schema mismatch: {}", error));
                error!(?err, "DataFrame error: Schema mismatch");
                err
            }
            _ => {
                let err = ComputeError::DataFrame(format!("Polars error: {}", error));
                error!(?err, "DataFrame error");
                err
            }
        };
        compute_error
    }
}

/// Type alias for Result with ComputeError
pub type Result<T> = std::result::Result<T, ComputeError>;
