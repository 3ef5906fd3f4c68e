use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A screening campaign run at one company site.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Campaign {
    pub id: String,
    pub company_name: String,
    pub unit_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub doctor_emails: Vec<String>,
    pub qr_token_current: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_token_expires_at: Option<jiff::Timestamp>,
    pub settings: CampaignSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CampaignSettings {
    pub allow_worker_copy: bool,
    pub worker_copy_mode: WorkerCopyMode,
    pub session_timeout_minutes: u32,
}

/// How a worker may receive a copy of their own answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum WorkerCopyMode {
    Email,
    Download,
    Both,
}

impl Default for CampaignSettings {
    fn default() -> Self {
        Self {
            allow_worker_copy: true,
            worker_copy_mode: WorkerCopyMode::Download,
            session_timeout_minutes: 15,
        }
    }
}
