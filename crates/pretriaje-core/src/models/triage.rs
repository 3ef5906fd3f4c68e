use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Priority classification, ordered `Verde < Ambar < Rojo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum TriageLevel {
    /// Normal priority.
    Verde,
    /// Moderate priority.
    Ambar,
    /// High priority, review first.
    Rojo,
}

impl TriageLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            TriageLevel::Verde => "verde",
            TriageLevel::Ambar => "ambar",
            TriageLevel::Rojo => "rojo",
        }
    }

    /// Badge text shown in the review queue.
    pub fn badge(self) -> &'static str {
        match self {
            TriageLevel::Verde => "NORMAL",
            TriageLevel::Ambar => "MEDIA",
            TriageLevel::Rojo => "ALTA",
        }
    }
}

impl fmt::Display for TriageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of the triage engine. Stored verbatim on the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TriageAnalysis {
    pub score: u32,
    pub level: TriageLevel,
    pub reasons: Vec<String>,
    pub ai_summary: String,
    pub ai_questions: Vec<String>,
}
