use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("no interaction at index {index} (session has {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("question is blank")]
    BlankQuestion,

    #[error("question already answered: {0}")]
    AlreadyAnswered(String),

    #[error("failed to persist interactions: {0}")]
    Persist(#[source] Box<dyn std::error::Error + Send + Sync>),
}
