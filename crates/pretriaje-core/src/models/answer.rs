use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Answers collected by the wizard, keyed by question id.
///
/// Only questions relevant to the worker's exposure profile are present.
/// A missing key means the question was never answered.
pub type AnswerMap = BTreeMap<String, AnswerValue>;

/// A single answer value.
///
/// Serialized untagged so stored sessions keep the plain JSON shape the
/// wizard sends (`"Sí"`, `["Varices", "Otros"]`, `7`, `true`). Any other JSON
/// shape fails to deserialize and is rejected before it reaches scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum AnswerValue {
    /// Free text or a single choice.
    Text(String),
    /// Multi-select.
    Multi(Vec<String>),
    Number(f64),
    Flag(bool),
}

impl AnswerValue {
    /// The selected options, treating a single choice as a one-element set.
    /// Numbers and flags select nothing.
    pub fn selections(&self) -> Vec<&str> {
        match self {
            AnswerValue::Text(s) => {
                let s = s.trim();
                if s.is_empty() { Vec::new() } else { vec![s] }
            }
            AnswerValue::Multi(items) => items
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect(),
            AnswerValue::Number(_) | AnswerValue::Flag(_) => Vec::new(),
        }
    }

    /// Whether `value` is one of the selected options.
    pub fn contains(&self, value: &str) -> bool {
        self.selections().iter().any(|s| *s == value)
    }

    /// Read the answer as a 0–10 scale value. Text is parsed; out-of-range
    /// values are clamped and fractions rounded.
    pub fn as_scale(&self) -> Option<u8> {
        let raw = match self {
            AnswerValue::Text(s) => s.trim().parse::<f64>().ok()?,
            AnswerValue::Number(n) => *n,
            AnswerValue::Multi(_) | AnswerValue::Flag(_) => return None,
        };
        if !raw.is_finite() {
            return None;
        }
        Some(raw.round().clamp(0.0, 10.0) as u8)
    }

    /// Human-readable rendering used in reports and red-flag details.
    pub fn display(&self) -> String {
        match self {
            AnswerValue::Text(s) => s.clone(),
            AnswerValue::Multi(items) => items.join(", "),
            AnswerValue::Number(n) => n.to_string(),
            AnswerValue::Flag(true) => "Sí".to_string(),
            AnswerValue::Flag(false) => "No".to_string(),
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Text(value.to_string())
    }
}

impl From<Vec<&str>> for AnswerValue {
    fn from(values: Vec<&str>) -> Self {
        AnswerValue::Multi(values.into_iter().map(str::to_string).collect())
    }
}
