//! Repository interfaces. Handlers receive these as trait objects, so the
//! backing store is chosen once at startup.

use jiff::Timestamp;
use uuid::Uuid;

use pretriaje_core::models::campaign::Campaign;
use pretriaje_core::error::InteractionError;
use pretriaje_core::models::interaction::{self, AiInteraction};
use pretriaje_core::models::report::Report;
use pretriaje_core::models::session::{Session, SessionStatus};

use crate::error::StorageError;

pub trait SessionRepository: Send + Sync {
    fn get_session(&self, id: Uuid) -> Result<Option<Session>, StorageError>;

    /// Insert or overwrite a session.
    fn save_session(&self, session: &Session) -> Result<(), StorageError>;

    /// Apply `apply` to the stored session under the store's write lock and
    /// stamp `last_activity_at`. Returns the session as stored afterwards, or
    /// `None` when it does not exist.
    ///
    /// When `apply` returns `false` nothing is written and the stored session
    /// is returned unchanged.
    fn update_session(
        &self,
        id: Uuid,
        now: Timestamp,
        apply: &mut dyn FnMut(&mut Session) -> bool,
    ) -> Result<Option<Session>, StorageError>;

    /// Returns `false` when there was nothing to delete.
    fn delete_session(&self, id: Uuid) -> Result<bool, StorageError>;

    /// Sessions of one campaign, in no particular order.
    fn list_sessions(&self, campaign_id: &str) -> Result<Vec<Session>, StorageError>;

    /// Replace the session's interaction list with one that extends it.
    ///
    /// Only submitted sessions take interactions. Stored entries may have
    /// their answer edited but are never dropped or reordered.
    fn save_interactions(
        &self,
        id: Uuid,
        now: Timestamp,
        interactions: &[AiInteraction],
    ) -> Result<Option<Session>, StorageError> {
        let mut rejected = None;
        let session = self.update_session(id, now, &mut |s: &mut Session| {
            let checked = if s.status == SessionStatus::Submitted {
                interaction::check_extends(&s.ai_interactions, interactions)
            } else {
                Err(InteractionError::NotSubmitted)
            };
            match checked {
                Ok(()) => {
                    s.ai_interactions = interactions.to_vec();
                    true
                }
                Err(e) => {
                    rejected = Some(e);
                    false
                }
            }
        })?;
        match rejected {
            Some(e) => Err(e.into()),
            None => Ok(session),
        }
    }
}

pub trait CampaignRepository: Send + Sync {
    fn get_campaign(&self, id: &str) -> Result<Option<Campaign>, StorageError>;

    fn save_campaign(&self, campaign: &Campaign) -> Result<(), StorageError>;
}

pub trait ReportRepository: Send + Sync {
    fn save_report(&self, report: &Report) -> Result<(), StorageError>;

    /// Latest report created for a session.
    fn report_for_session(&self, session_id: Uuid) -> Result<Option<Report>, StorageError>;
}

/// Most recent of several reports for the same session.
pub(crate) fn latest(reports: impl Iterator<Item = Report>) -> Option<Report> {
    reports.max_by_key(|r| r.created_at)
}
