use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Declarative questionnaire definition, loaded from JSON.
///
/// Field names follow the wizard's JSON file, which mixes snake_case (UI
/// settings) and camelCase (question attributes).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Questionnaire {
    pub version: String,
    pub ui: UiSettings,
    pub start_ack: StartAck,
    pub core: Vec<Question>,
    #[serde(default)]
    pub modules: Vec<Module>,
    #[serde(default)]
    pub closing: Vec<Question>,
    pub scoring: Scoring,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UiSettings {
    pub max_options: u32,
    pub other_char_limit: u32,
    pub show_progress: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StartAck {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consent_checkbox: Option<ConsentCheckbox>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ConsentCheckbox {
    pub label: String,
    pub required: bool,
    pub version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum QuestionType {
    Single,
    Multi,
    Text,
    Number,
    /// Display-only, never answered.
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Question {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default)]
    pub other: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_chars: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_if: Option<ShowIf>,
    /// Options that mark the answer as a red flag.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub red_flag_if: Vec<String>,
}

/// Show the question only when another answer equals a value.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShowIf {
    pub question: String,
    pub equals: String,
}

/// A block of questions asked only for certain job exposures.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Module {
    pub id: String,
    pub trigger: ModuleTrigger,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ModuleTrigger {
    #[serde(default)]
    pub exposures_includes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Scoring {
    /// Weight per `"questionId:Option"` pair.
    #[serde(default)]
    pub red_flag_score_map: BTreeMap<String, u32>,
    #[serde(default)]
    pub priority_levels: Vec<PriorityLevel>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PriorityLevel {
    pub min_score: u32,
    pub label: String,
}

impl Questionnaire {
    /// Parse and sanity-check a questionnaire definition.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let questionnaire: Questionnaire = serde_json::from_str(json)?;
        questionnaire.check()?;
        Ok(questionnaire)
    }

    /// Every question in definition order: core, modules, closing.
    pub fn all_questions(&self) -> impl Iterator<Item = &Question> {
        self.core
            .iter()
            .chain(self.modules.iter().flat_map(|m| m.questions.iter()))
            .chain(self.closing.iter())
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.all_questions().find(|q| q.id == id)
    }

    /// Scoring key used by `redFlagScoreMap`.
    pub fn score_key(question_id: &str, option: &str) -> String {
        format!("{question_id}:{option}")
    }

    /// Label of the highest priority level whose minimum `score` reaches.
    pub fn priority_label(&self, score: u32) -> Option<&str> {
        self.scoring
            .priority_levels
            .iter()
            .filter(|l| score >= l.min_score)
            .max_by_key(|l| l.min_score)
            .map(|l| l.label.as_str())
    }

    fn check(&self) -> Result<(), CoreError> {
        let mut seen = std::collections::HashSet::new();
        for q in self.all_questions() {
            if !seen.insert(q.id.as_str()) {
                return Err(CoreError::InvalidQuestionnaire(format!(
                    "duplicate question id: {}",
                    q.id
                )));
            }
        }
        for q in self.all_questions() {
            if let Some(cond) = &q.show_if
                && !seen.contains(cond.question.as_str())
            {
                return Err(CoreError::InvalidQuestionnaire(format!(
                    "question {} depends on unknown question {}",
                    q.id, cond.question
                )));
            }
        }
        Ok(())
    }
}
