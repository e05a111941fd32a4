/// Error types for loading the CO2 dataset
use thiserror::Error;

/// Everything that can stop the dataset from loading.
///
/// All variants are fatal for a render pass: without a cleaned table no
/// chart can be drawn.
#[derive(Error, Debug)]
pub enum DataError {
    /// Input file missing or unreadable
    #[error("Failed to read dataset {path}: {source}")]
    DataAccess {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse CSV data
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Failed to decompress gzip input
    #[error("Failed to decompress dataset: {0}")]
    Decompress(String),

    /// A required column is absent from the header row
    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),

    /// The year field of a row is not an integer
    #[error("Invalid year {value:?} on line {line}")]
    InvalidYear { line: u64, value: String },

    /// No bytes or no header row at all
    #[error("Dataset is empty")]
    Empty,
}

/// Type alias for Results using DataError
pub type Result<T> = std::result::Result<T, DataError>;
