use thiserror::Error;

use pretriaje_core::error::InteractionError;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object not found: {key}")]
    NotFound { key: String },

    #[error("invalid object key: {key}")]
    InvalidKey { key: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("read error for {key}: {message}")]
    GetObject { key: String, message: String },

    #[error("write error for {key}: {message}")]
    PutObject { key: String, message: String },

    #[error("delete error for {key}: {message}")]
    DeleteObject { key: String, message: String },

    #[error("list error under {prefix}: {message}")]
    ListObjects { prefix: String, message: String },

    #[error(transparent)]
    Interactions(#[from] InteractionError),

    #[error("store lock poisoned")]
    LockPoisoned,
}
