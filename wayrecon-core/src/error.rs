use std::string::FromUtf8Error;
use thiserror::Error;
use wayrecon_scanner::ScanError;

#[derive(Error, Debug)]
pub enum ReconError {
    #[error("Invalid domain: {0}")]
    InvalidDomain(String),

    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Encoding error: {0}")]
    Encoding(#[from] FromUtf8Error),

    #[error("Failed to write report: {0}")]
    Persist(#[from] tempfile::PersistError),
}

pub type Result<T> = std::result::Result<T, ReconError>;
