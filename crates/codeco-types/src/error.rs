//! Error types for the CODECO gate codec

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),
}

/// Codec errors raised while reading wire content
#[derive(Debug, Error)]
pub enum CodecError {
    /// Wire content was empty or held no parseable segment
    #[error("No valid EDIFACT segments found in EDI content")]
    NoSegments,
}

/// Transmission errors
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Delivery of {file_name} failed after {attempts} attempt(s): {last_error}")]
    Exhausted {
        file_name: String,
        attempts: u32,
        last_error: String,
    },

    #[error("Message already transmitted as {0}")]
    Duplicate(String),

    #[error("Invalid remote target: {0}")]
    InvalidTarget(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Transfer error: {0}")]
    Transfer(#[from] TransferError),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("XML export error: {0}")]
    Xml(String),

    #[error("Excel export error: {0}")]
    Excel(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid gate event: {0}")]
    InvalidRecord(String),

    #[error("Generated message failed validation: {0}")]
    InvalidMessage(String),
}

pub type Result<T> = std::result::Result<T, Error>;
