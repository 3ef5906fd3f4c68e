use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::answer::AnswerMap;
use super::interaction::AiInteraction;
use super::triage::{TriageAnalysis, TriageLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum SessionStatus {
    InProgress,
    Submitted,
    Cancelled,
    Expired,
}

/// Legacy flat red-flag record. Older sessions only carry these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RedFlag {
    pub title: String,
    pub detail: String,
}

/// One worker's pass through the questionnaire.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Session {
    pub id: Uuid,
    pub campaign_id: String,
    pub status: SessionStatus,
    pub started_at: jiff::Timestamp,
    pub last_activity_at: jiff::Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<jiff::Timestamp>,
    #[serde(default)]
    pub reviewed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<jiff::Timestamp>,

    // Worker identity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_firstname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_lastname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_id_last4: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_email: Option<String>,

    // Legacy risk fields, mirrored from `triage` on submit
    #[serde(default)]
    pub red_flag_score: u32,
    #[serde(default)]
    pub red_flags: Vec<RedFlag>,

    #[serde(default)]
    pub answers: AnswerMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triage: Option<TriageAnalysis>,
    #[serde(default)]
    pub ai_interactions: Vec<AiInteraction>,
}

impl Session {
    pub fn new(campaign_id: impl Into<String>, now: jiff::Timestamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            campaign_id: campaign_id.into(),
            status: SessionStatus::InProgress,
            started_at: now,
            last_activity_at: now,
            submitted_at: None,
            reviewed: false,
            reviewed_at: None,
            worker_id: None,
            worker_firstname: None,
            worker_lastname: None,
            worker_id_last4: None,
            dob: None,
            worker_email: None,
            red_flag_score: 0,
            red_flags: Vec::new(),
            answers: AnswerMap::new(),
            triage: None,
            ai_interactions: Vec::new(),
        }
    }

    /// Store a triage result and mirror it onto the legacy flat fields.
    pub fn apply_triage(&mut self, triage: TriageAnalysis) {
        self.red_flag_score = triage.score;
        self.red_flags = triage
            .reasons
            .iter()
            .map(|r| RedFlag {
                title: r.clone(),
                detail: r.clone(),
            })
            .collect();
        self.triage = Some(triage);
    }

    /// Priority used for queue ordering.
    ///
    /// Records submitted before structured triage existed only carry the
    /// questionnaire red-flag score, which used a much smaller scale.
    pub fn priority(&self) -> TriageLevel {
        match &self.triage {
            Some(t) => t.level,
            None if self.red_flag_score >= 5 => TriageLevel::Rojo,
            None if self.red_flag_score >= 3 => TriageLevel::Ambar,
            None => TriageLevel::Verde,
        }
    }

    /// Timestamp used for "newest first" ordering.
    pub fn sort_time(&self) -> jiff::Timestamp {
        self.submitted_at.unwrap_or(self.last_activity_at)
    }

    /// Name shown in the queue, falling back to the raw answers.
    pub fn display_name(&self) -> String {
        if let Some(first) = &self.worker_firstname {
            return match &self.worker_lastname {
                Some(last) => format!("{first} {last}"),
                None => first.clone(),
            };
        }
        ["firstname", "name"]
            .iter()
            .find_map(|key| self.answers.get(*key).map(|v| v.display()))
            .unwrap_or_else(|| "Paciente Sin Nombre".to_string())
    }
}
