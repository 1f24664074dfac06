//! Error types for the locolo binary

use locolo_tui::MessageId;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the locolo Error
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Terminal or filesystem I/O
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to read {path:?}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Invalid transcript {path:?}: {source}")]
    Transcript {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Message ids are render keys and must be unique
    #[error("Duplicate message id in transcript: {0}")]
    DuplicateMessageId(MessageId),

    #[error("Assistant error: {0}")]
    Assistant(String),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}
