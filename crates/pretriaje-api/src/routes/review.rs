//! Follow-up questions during review.
//!
//! The open pool for each session lives in [`AppState::reviews`]. It is
//! created from the stored session on first use and written back only
//! through the session's interaction list. Pools idle for longer than
//! [`REVIEW_IDLE_TTL`](crate::state::REVIEW_IDLE_TTL) are dropped.

use axum::Json;
use axum::extract::{Path, State};
use jiff::Timestamp;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pretriaje_core::models::interaction::AiInteraction;
use pretriaje_storage::SessionRepository;
use pretriaje_storage::error::StorageError;
use pretriaje_triage::review::{InteractionSink, ReviewSession};

use crate::audit::{Actor, AuditEvent};
use crate::error::ApiError;
use crate::routes::reports::submitted_session;
use crate::state::AppState;

/// Writes a review's interaction list to the session repository.
pub struct SessionSink<'a> {
    sessions: &'a dyn SessionRepository,
    now: Timestamp,
}

impl InteractionSink for SessionSink<'_> {
    type Error = StorageError;

    fn save_interactions(
        &self,
        session_id: Uuid,
        interactions: &[AiInteraction],
    ) -> Result<(), StorageError> {
        self.sessions
            .save_interactions(session_id, self.now, interactions)?
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound {
                key: session_id.to_string(),
            })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
    pub session_id: Uuid,
    pub offered: Vec<String>,
    pub interactions: Vec<AiInteraction>,
    /// Question added to the offer by the last answer, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
}

impl ReviewView {
    fn of(review: &ReviewSession) -> Self {
        Self {
            session_id: review.session_id(),
            offered: review.offered().to_vec(),
            interactions: review.interactions().to_vec(),
            replacement: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AnswerBody {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub struct EditBody {
    pub answer: String,
}

/// Run `f` against the session's open review, opening it first if needed.
///
/// When `f` fails the pool is dropped, so the next call rebuilds it from what
/// was actually stored.
async fn with_review<T>(
    state: &AppState,
    id: Uuid,
    f: impl FnOnce(&mut ReviewSession, &SessionSink<'_>) -> Result<T, ApiError>,
) -> Result<T, ApiError> {
    let now = Timestamp::now();
    let mut reviews = state.reviews.lock().await;
    let pruned = reviews.prune_idle(now);
    if pruned > 0 {
        tracing::debug!(pruned, open = reviews.len(), "idle reviews dropped");
    }
    let review = reviews.get_or_open(id, now, || {
        let session = submitted_session(state, id)?;
        tracing::debug!(
            session_id = %id,
            answered = session.ai_interactions.len(),
            "review opened"
        );
        Ok::<_, ApiError>(ReviewSession::open(&session))
    })?;
    let sink = SessionSink {
        sessions: state.sessions.as_ref(),
        now,
    };
    let result = f(review, &sink);
    if result.is_err() {
        reviews.remove(id);
    }
    result
}

pub async fn get_questions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReviewView>, ApiError> {
    let view = with_review(&state, id, |review, _| Ok(ReviewView::of(review))).await?;
    Ok(Json(view))
}

pub async fn regenerate_questions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReviewView>, ApiError> {
    let view = with_review(&state, id, |review, _| {
        review.regenerate(&mut StdRng::from_entropy());
        Ok(ReviewView::of(review))
    })
    .await?;
    Ok(Json(view))
}

pub async fn answer_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<AnswerBody>,
) -> Result<Json<ReviewView>, ApiError> {
    let view = with_review(&state, id, |review, sink| {
        let replacement = review.answer(
            &body.question,
            &body.answer,
            sink.now,
            &mut StdRng::from_entropy(),
            sink,
        )?;
        Ok(ReviewView {
            replacement,
            ..ReviewView::of(review)
        })
    })
    .await?;

    AuditEvent::new("answer_question", "session", id, Actor::Clinician)
        .with_details(serde_json::json!({ "count": view.interactions.len() }))
        .emit();
    Ok(Json(view))
}

pub async fn edit_interaction(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
    Json(body): Json<EditBody>,
) -> Result<Json<ReviewView>, ApiError> {
    let view = with_review(&state, id, |review, sink| {
        review.edit(index, &body.answer, sink)?;
        Ok(ReviewView::of(review))
    })
    .await?;

    AuditEvent::new("edit_interaction", "session", id, Actor::Clinician)
        .with_details(serde_json::json!({ "index": index }))
        .emit();
    Ok(Json(view))
}
