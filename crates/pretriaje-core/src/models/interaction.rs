use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::InteractionError;

/// A follow-up question the reviewer asked and the worker's answer to it.
///
/// `question` and `added_at` never change after creation; only `answer` may be
/// edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AiInteraction {
    pub question: String,
    pub answer: String,
    pub added_at: jiff::Timestamp,
}

/// Check that `incoming` only extends `stored`.
///
/// Every stored interaction must still be present at the same position with
/// the same `question` and `added_at`. New entries may follow.
pub fn check_extends(
    stored: &[AiInteraction],
    incoming: &[AiInteraction],
) -> Result<(), InteractionError> {
    if incoming.len() < stored.len() {
        return Err(InteractionError::Removed {
            stored: stored.len(),
            received: incoming.len(),
        });
    }
    match stored
        .iter()
        .zip(incoming)
        .position(|(old, new)| old.question != new.question || old.added_at != new.added_at)
    {
        Some(index) => Err(InteractionError::Rewritten { index }),
        None => Ok(()),
    }
}
