//! Turning an in-progress session into a submitted one.

use jiff::Timestamp;
use uuid::Uuid;

use pretriaje_core::models::report::{Report, ReportSummary};
use pretriaje_core::models::session::{Session, SessionStatus};
use pretriaje_export::render_report_html;
use pretriaje_triage::compute_triage;
use pretriaje_triage::schema::score_red_flags;

use crate::audit::{Actor, AuditEvent};
use crate::error::ApiError;
use crate::state::AppState;

/// Result of a submission.
#[derive(Debug, Clone)]
pub struct Submitted {
    pub session: Session,
    pub report: Report,
    /// `false` when the session had already been submitted and the existing
    /// report was returned.
    pub created: bool,
}

/// Score the session's answers once, mark it submitted and store a report
/// snapshot.
///
/// Submitting twice returns the first report unchanged, so the triage
/// result a clinician saw never moves under them. The status check and the
/// scoring run inside the store's update, and submissions are serialized, so
/// concurrent calls for one session still produce a single report.
pub fn submit_session(
    state: &AppState,
    session_id: Uuid,
    now: Timestamp,
    actor: Actor,
) -> Result<Submitted, ApiError> {
    let _serial = state
        .submissions
        .lock()
        .map_err(|_| ApiError::Internal("submission lock poisoned".to_string()))?;

    let mut previous = None;
    let session = state
        .sessions
        .update_session(session_id, now, &mut |s: &mut Session| {
            if s.status != SessionStatus::InProgress {
                previous = Some(s.status);
                return false;
            }
            s.apply_triage(compute_triage(&s.answers));
            s.status = SessionStatus::Submitted;
            s.submitted_at = Some(now);
            true
        })?
        .ok_or_else(|| ApiError::NotFound("Session not found".to_string()))?;

    match previous {
        Some(SessionStatus::Submitted) => {
            if let Some(report) = state.reports.report_for_session(session_id)? {
                return Ok(Submitted {
                    session,
                    report,
                    created: false,
                });
            }
            tracing::warn!(%session_id, "submitted session had no report, creating one");
        }
        Some(_) => {
            return Err(ApiError::Forbidden(
                "La sesión ya no admite envíos.".to_string(),
            ));
        }
        None => {}
    }

    let flags = score_red_flags(&state.questionnaire, &session.answers);
    let mut report = Report {
        id: Uuid::new_v4(),
        session_id,
        campaign_id: session.campaign_id.clone(),
        created_at: now,
        summary: ReportSummary {
            score: flags.score,
            red_flags: flags.red_flags,
            answers: session.answers.clone(),
        },
        html: None,
    };
    report.html = Some(render_report_html(&session, &state.questionnaire, Some(&report))?);
    state.reports.save_report(&report)?;

    let (level, score) = session
        .triage
        .as_ref()
        .map_or((session.priority(), session.red_flag_score), |t| (t.level, t.score));
    AuditEvent::new("submit", "session", session_id, actor)
        .with_details(serde_json::json!({
            "report_id": report.id,
            "level": level,
            "score": score,
            "questionnaire_score": report.summary.score,
        }))
        .emit();

    Ok(Submitted {
        session,
        report,
        created: true,
    })
}
