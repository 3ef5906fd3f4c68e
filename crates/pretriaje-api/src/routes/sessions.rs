use axum::Json;
use axum::extract::{Path, State};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pretriaje_core::keys;
use pretriaje_core::models::answer::AnswerMap;
use pretriaje_core::models::interaction::AiInteraction;
use pretriaje_core::models::session::{Session, SessionStatus};
use pretriaje_core::models::triage::TriageAnalysis;
use pretriaje_core::qr;

use crate::audit::{Actor, AuditEvent};
use crate::error::ApiError;
use crate::state::AppState;
use crate::submission::submit_session;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSession {
    pub campaign_id: String,
    pub token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStarted {
    pub session_id: Uuid,
}

/// Partial update sent by the wizard. Absent fields are left untouched;
/// `answers` replaces the whole answer map.
#[derive(Debug, Default, Deserialize)]
pub struct SessionPatch {
    pub answers: Option<AnswerMap>,
    pub status: Option<SessionStatus>,
    pub worker_id: Option<String>,
    pub worker_firstname: Option<String>,
    pub worker_lastname: Option<String>,
    pub worker_id_last4: Option<String>,
    pub dob: Option<String>,
    pub worker_email: Option<String>,
}

impl SessionPatch {
    fn apply(&self, session: &mut Session) {
        if let Some(answers) = &self.answers {
            session.answers = answers.clone();
        }
        if let Some(status) = self.status {
            session.status = status;
        }
        let fields = [
            (&self.worker_id, &mut session.worker_id),
            (&self.worker_firstname, &mut session.worker_firstname),
            (&self.worker_lastname, &mut session.worker_lastname),
            (&self.worker_id_last4, &mut session.worker_id_last4),
            (&self.dob, &mut session.dob),
            (&self.worker_email, &mut session.worker_email),
        ];
        for (patch, field) in fields {
            if let Some(value) = patch {
                *field = Some(value.clone());
            }
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub success: bool,
    pub report_id: Uuid,
    pub triage: Option<TriageAnalysis>,
}

#[derive(Debug, Serialize)]
pub struct Success {
    pub success: bool,
}

fn not_found() -> ApiError {
    ApiError::NotFound("Session not found".to_string())
}

pub async fn start_session(
    State(state): State<AppState>,
    Json(body): Json<StartSession>,
) -> Result<Json<SessionStarted>, ApiError> {
    if !keys::is_valid_campaign_id(&body.campaign_id) {
        return Err(ApiError::BadRequest("invalid campaign id".to_string()));
    }
    let now = Timestamp::now();
    let campaign = state.campaigns.get_campaign(&body.campaign_id)?;
    qr::validate_entry(campaign.as_ref(), &body.campaign_id, &body.token, now)?;

    let session = Session::new(body.campaign_id, now);
    state.sessions.save_session(&session)?;
    tracing::info!(session_id = %session.id, campaign_id = %session.campaign_id, "session started");

    Ok(Json(SessionStarted {
        session_id: session.id,
    }))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Session>, ApiError> {
    let session = state.sessions.get_session(id)?.ok_or_else(not_found)?;
    Ok(Json(session))
}

pub async fn update_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<SessionPatch>,
) -> Result<Json<Session>, ApiError> {
    if patch.status == Some(SessionStatus::Submitted) {
        return Err(ApiError::BadRequest(
            "use the submit endpoint to submit a session".to_string(),
        ));
    }
    let mut closed = false;
    let session = state
        .sessions
        .update_session(id, Timestamp::now(), &mut |s: &mut Session| {
            if s.status != SessionStatus::InProgress {
                closed = true;
                return false;
            }
            patch.apply(s);
            true
        })?
        .ok_or_else(not_found)?;
    if closed {
        return Err(ApiError::Forbidden(
            "La sesión ya no admite cambios.".to_string(),
        ));
    }
    Ok(Json(session))
}

/// Idempotent: deleting a missing session still succeeds.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Success>, ApiError> {
    let deleted = state.sessions.delete_session(id)?;
    state.close_review(id).await;
    AuditEvent::new("delete", "session", id, Actor::Clinician)
        .with_details(serde_json::json!({ "existed": deleted }))
        .emit();
    Ok(Json(Success { success: true }))
}

pub async fn submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let submitted = submit_session(&state, id, Timestamp::now(), Actor::Worker)?;
    Ok(Json(SubmitResponse {
        success: true,
        report_id: submitted.report.id,
        triage: submitted.session.triage,
    }))
}

/// Replace the interaction list of a submitted session with one that extends
/// it. Stored entries keep their question and time; only answers may change.
/// Any open review pool for the session is dropped, since its answered set
/// may now be stale.
pub async fn put_interactions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(interactions): Json<Vec<AiInteraction>>,
) -> Result<Json<Session>, ApiError> {
    let session = state
        .sessions
        .save_interactions(id, Timestamp::now(), &interactions)?
        .ok_or_else(not_found)?;
    state.close_review(id).await;
    AuditEvent::new("save_interactions", "session", id, Actor::Clinician)
        .with_details(serde_json::json!({ "count": interactions.len() }))
        .emit();
    Ok(Json(session))
}
