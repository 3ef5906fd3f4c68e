use std::cmp::Reverse;

use axum::Json;
use axum::extract::{Path, Query, State};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pretriaje_core::models::session::{Session, SessionStatus};
use pretriaje_core::models::triage::TriageLevel;
use pretriaje_core::qr::{self, StatelessToken};

use crate::audit::{Actor, AuditEvent};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SessionFilter {
    pub status: Option<SessionStatus>,
}

/// Optional narrowing of the review queue. `search` matches the worker's
/// name or id, ignoring case.
#[derive(Debug, Default, Deserialize)]
pub struct QueueFilter {
    pub level: Option<TriageLevel>,
    pub search: Option<String>,
}

impl QueueFilter {
    fn matches(&self, session: &Session) -> bool {
        if self.level.is_some_and(|level| session.priority() != level) {
            return false;
        }
        let needle = match self.search.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_lowercase(),
            _ => return true,
        };
        session.display_name().to_lowercase().contains(&needle)
            || session
                .worker_id
                .as_deref()
                .is_some_and(|id| id.to_lowercase().contains(&needle))
    }
}

/// One row of the clinician's review queue.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    pub session_id: Uuid,
    pub name: String,
    pub worker_id: Option<String>,
    pub level: TriageLevel,
    pub badge: &'static str,
    pub score: u32,
    pub reasons: Vec<String>,
    pub reviewed: bool,
    pub submitted_at: Option<Timestamp>,
}

impl From<&Session> for QueueItem {
    fn from(s: &Session) -> Self {
        let level = s.priority();
        Self {
            session_id: s.id,
            name: s.display_name(),
            worker_id: s.worker_id.clone(),
            level,
            badge: level.badge(),
            score: s.triage.as_ref().map_or(s.red_flag_score, |t| t.score),
            reasons: s.triage.as_ref().map(|t| t.reasons.clone()).unwrap_or_default(),
            reviewed: s.reviewed,
            submitted_at: s.submitted_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrInfo {
    pub token: String,
    pub expires_at: Option<Timestamp>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RotatedQr {
    pub token: String,
    pub expires_at: Option<Timestamp>,
    pub url_params: String,
    /// Self-describing token with the same lifetime, accepted without a
    /// campaign lookup.
    pub stateless_token: String,
}

/// Sessions of a campaign, newest first.
pub async fn list_sessions(
    State(state): State<AppState>,
    Path(campaign_id): Path<String>,
    Query(filter): Query<SessionFilter>,
) -> Result<Json<Vec<Session>>, ApiError> {
    let mut sessions = state.sessions.list_sessions(&campaign_id)?;
    if let Some(status) = filter.status {
        sessions.retain(|s| s.status == status);
    }
    sessions.sort_by_key(|s| Reverse(s.sort_time()));
    Ok(Json(sessions))
}

/// Submitted sessions, most urgent level first, then newest first.
pub async fn review_queue(
    State(state): State<AppState>,
    Path(campaign_id): Path<String>,
    Query(filter): Query<QueueFilter>,
) -> Result<Json<Vec<QueueItem>>, ApiError> {
    let mut sessions = state.sessions.list_sessions(&campaign_id)?;
    sessions.retain(|s| s.status == SessionStatus::Submitted && filter.matches(s));
    sessions.sort_by_key(|s| (Reverse(s.priority()), Reverse(s.sort_time())));
    Ok(Json(sessions.iter().map(QueueItem::from).collect()))
}

pub async fn get_qr(
    State(state): State<AppState>,
    Path(campaign_id): Path<String>,
) -> Result<Json<QrInfo>, ApiError> {
    let campaign = state
        .campaigns
        .get_campaign(&campaign_id)?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))?;
    Ok(Json(QrInfo {
        token: campaign.qr_token_current,
        expires_at: campaign.qr_token_expires_at,
    }))
}

pub async fn rotate_qr(
    State(state): State<AppState>,
    Path(campaign_id): Path<String>,
) -> Result<Json<RotatedQr>, ApiError> {
    let mut campaign = state
        .campaigns
        .get_campaign(&campaign_id)?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))?;

    let now = Timestamp::now();
    let token = qr::rotate(&mut campaign, now);
    state.campaigns.save_campaign(&campaign)?;

    AuditEvent::new("rotate_qr", "campaign", &campaign.id, Actor::Admin).emit();

    let stateless = StatelessToken::new(campaign.id.clone(), now + qr::ROTATED_TOKEN_TTL);
    Ok(Json(RotatedQr {
        url_params: format!("?campaign_id={}&token={token}", campaign.id),
        token,
        expires_at: campaign.qr_token_expires_at,
        stateless_token: stateless.encode(),
    }))
}
