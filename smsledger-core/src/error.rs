//! Error types for smsledger

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The message source could not supply messages (permission denied, missing export, ...).
    #[error("Message retrieval failed: {0}")]
    Retrieval(String),

    #[error("Malformed message list: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid template pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
