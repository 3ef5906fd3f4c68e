//! Clinician read side. Report routes are keyed by session id.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::Html;
use jiff::Timestamp;
use uuid::Uuid;

use pretriaje_core::models::session::{Session, SessionStatus};
use pretriaje_export::render_report_html;

use crate::audit::{Actor, AuditEvent};
use crate::error::ApiError;
use crate::routes::sessions::Success;
use crate::state::AppState;

/// Load a session that has been submitted. Anything else is not yet a
/// report.
pub(crate) fn submitted_session(state: &AppState, id: Uuid) -> Result<Session, ApiError> {
    let session = state
        .sessions
        .get_session(id)?
        .ok_or_else(|| ApiError::NotFound("Not found".to_string()))?;
    if session.status != SessionStatus::Submitted {
        return Err(ApiError::Forbidden(
            "El reporte aún no está disponible.".to_string(),
        ));
    }
    Ok(session)
}

pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Session>, ApiError> {
    Ok(Json(submitted_session(&state, id)?))
}

/// Render the report from the current session, so answers given during
/// review are included.
pub async fn get_report_html(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, ApiError> {
    let session = submitted_session(&state, id)?;
    let snapshot = state.reports.report_for_session(id)?;
    let html = render_report_html(&session, &state.questionnaire, snapshot.as_ref())?;
    Ok(Html(html))
}

/// Mark the session reviewed and release its open review pool. Asking
/// further questions afterwards reopens the pool from storage.
pub async fn mark_reviewed(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Success>, ApiError> {
    let now = Timestamp::now();
    state
        .sessions
        .update_session(id, now, &mut |s: &mut Session| {
            s.reviewed = true;
            s.reviewed_at = Some(now);
            true
        })?
        .ok_or_else(|| ApiError::NotFound("Session not found".to_string()))?;
    state.close_review(id).await;

    AuditEvent::new("review", "session", id, Actor::Clinician).emit();
    Ok(Json(Success { success: true }))
}
