use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::answer::AnswerMap;
use super::session::RedFlag;

/// Snapshot taken when a session is submitted.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Report {
    pub id: Uuid,
    pub session_id: Uuid,
    pub campaign_id: String,
    pub created_at: jiff::Timestamp,
    pub summary: ReportSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

/// Questionnaire-driven red-flag scoring at submission time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReportSummary {
    pub score: u32,
    pub red_flags: Vec<RedFlag>,
    pub answers: AnswerMap,
}
