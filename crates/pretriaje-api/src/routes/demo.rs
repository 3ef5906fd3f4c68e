use axum::Json;
use axum::extract::State;
use jiff::Timestamp;
use serde::Serialize;

use crate::audit::{Actor, AuditEvent};
use crate::demo;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Seeded {
    pub success: bool,
    pub count: usize,
}

pub async fn seed(State(state): State<AppState>) -> Result<Json<Seeded>, ApiError> {
    let count = demo::seed_sessions(&state, Timestamp::now())?.len();
    AuditEvent::new("seed", "campaign", demo::DEMO_CAMPAIGN_ID, Actor::Admin)
        .with_details(serde_json::json!({ "count": count }))
        .emit();
    Ok(Json(Seeded {
        success: true,
        count,
    }))
}
