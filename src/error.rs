use thiserror::Error;

// ---------------------------------------------------------------------------
// BinningError – every failure the engine can report
// ---------------------------------------------------------------------------

/// Errors raised by the binning engine, its configuration and persistence.
#[derive(Debug, Error)]
pub enum BinningError {
    /// The scanned column held no usable (non-missing, non-NaN) value.
    #[error("no usable values to compute a range from")]
    EmptyRange,

    #[error("invalid number of bins: {0} (must be between 1 and 2147483647)")]
    InvalidBinCount(i64),

    /// Bounds that are not finite or where `min > max`.
    #[error("invalid value range [{min}, {max}]")]
    InvalidRange { min: f64, max: f64 },

    #[error("bin index {index} out of range (have {count} bins)")]
    IndexOutOfRange { index: usize, count: usize },

    /// Persisted membership or settings could not be interpreted.
    #[error("corrupt settings: {0}")]
    SettingsCorrupt(String),

    #[error("input table does not contain the numeric column '{0}'; please (re-)configure")]
    ColumnNotFound(String),

    #[error("input table must contain at least one numeric column")]
    NoNumericColumn,

    #[error("execution cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BinningError>;
