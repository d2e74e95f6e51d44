// Error taxonomy for submissions, imports and the record stores

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Field-level rule failed; nothing was persisted
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    #[error("invalid source URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Upstream fetch failed (transport, timeout or non-2xx status)
    #[error("could not fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("record serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl DirectoryError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        DirectoryError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DirectoryError>;
