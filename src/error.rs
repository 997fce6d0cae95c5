//! Error types for SiloScope.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("Unsupported file format: .{0}")]
    UnsupportedFormat(String),

    #[error("Malformed data: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, Error>;
