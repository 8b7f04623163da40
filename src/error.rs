use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("MALFORMED_REPORT: {0}")]
    MalformedReport(String),

    #[error("MISSING_LINE_NUMBER: Failure message has no 'file:line' header: {message:?}")]
    MissingLineNumber { message: String },

    #[error("VALIDATION_ERROR: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
