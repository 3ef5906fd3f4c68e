use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid questionnaire: {0}")]
    InvalidQuestionnaire(String),
}

/// Rejections when a worker tries to open a session from a QR code.
///
/// Messages are shown to the worker as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QrError {
    #[error("El código QR ha expirado. Solicita uno nuevo.")]
    Expired,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Campaña no encontrada / Token inválido")]
    CampaignNotFound,
}

/// Rejections when a session's interaction list is replaced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InteractionError {
    #[error("interactions can only be added once the session is submitted")]
    NotSubmitted,

    #[error("interactions cannot be removed (stored {stored}, received {received})")]
    Removed { stored: usize, received: usize },

    #[error("interaction {index} changed its question or creation time")]
    Rewritten { index: usize },
}
