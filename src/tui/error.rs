use thiserror::Error;

/// TUI-specific errors
#[derive(Error, Debug)]
pub enum TuiError {
    #[error("Terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("No report under the cursor")]
    NoSelection,

    #[error("Row '{0}' has not been saved yet")]
    UnsavedRow(String),
}

/// Result type for TUI operations
pub type TuiResult<T> = Result<T, TuiError>;
