use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use jiff::{SignedDuration, Timestamp};
use tokio::sync::Mutex;
use uuid::Uuid;

use pretriaje_core::models::questionnaire::Questionnaire;
use pretriaje_storage::{CampaignRepository, ReportRepository, SessionRepository};
use pretriaje_triage::review::ReviewSession;

/// Open review pools unused for this long are dropped.
pub const REVIEW_IDLE_TTL: SignedDuration = SignedDuration::from_hours(2);

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<dyn SessionRepository>,
    pub campaigns: Arc<dyn CampaignRepository>,
    pub reports: Arc<dyn ReportRepository>,
    pub questionnaire: Arc<Questionnaire>,
    /// Open review pools by session id. Never persisted.
    pub reviews: Arc<Mutex<OpenReviews>>,
    /// Serializes submissions so each session gets exactly one report.
    pub submissions: Arc<std::sync::Mutex<()>>,
}

impl AppState {
    /// State backed by one store that serves all three repositories.
    pub fn new<S>(store: Arc<S>, questionnaire: Questionnaire) -> Self
    where
        S: SessionRepository + CampaignRepository + ReportRepository + 'static,
    {
        Self {
            sessions: store.clone(),
            campaigns: store.clone(),
            reports: store,
            questionnaire: Arc::new(questionnaire),
            reviews: Arc::new(Mutex::new(OpenReviews::default())),
            submissions: Arc::new(std::sync::Mutex::new(())),
        }
    }

    /// Drop the open review pool of a session, if any.
    pub async fn close_review(&self, session_id: Uuid) {
        self.reviews.lock().await.remove(session_id);
    }
}

#[derive(Debug)]
struct OpenReview {
    review: ReviewSession,
    last_used: Timestamp,
}

/// Review pools currently held in memory, keyed by session id.
#[derive(Debug, Default)]
pub struct OpenReviews {
    open: HashMap<Uuid, OpenReview>,
}

impl OpenReviews {
    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    pub fn contains(&self, session_id: Uuid) -> bool {
        self.open.contains_key(&session_id)
    }

    pub fn remove(&mut self, session_id: Uuid) -> bool {
        self.open.remove(&session_id).is_some()
    }

    /// Drop every pool last used more than [`REVIEW_IDLE_TTL`] before `now`.
    /// Returns how many were dropped.
    pub fn prune_idle(&mut self, now: Timestamp) -> usize {
        let before = self.open.len();
        self.open
            .retain(|_, open| now.duration_since(open.last_used) <= REVIEW_IDLE_TTL);
        before - self.open.len()
    }

    /// The pool for `session_id`, built with `open` when none is held.
    /// Marks the pool as used at `now`.
    pub fn get_or_open<E>(
        &mut self,
        session_id: Uuid,
        now: Timestamp,
        open: impl FnOnce() -> Result<ReviewSession, E>,
    ) -> Result<&mut ReviewSession, E> {
        let entry = match self.open.entry(session_id) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(OpenReview {
                review: open()?,
                last_used: now,
            }),
        };
        entry.last_used = now;
        Ok(&mut entry.review)
    }
}
