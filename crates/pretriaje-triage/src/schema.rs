//! Questionnaire-driven helpers: which questions the wizard shows, and the
//! per-option red-flag weights some questionnaire versions carry.

use pretriaje_core::error::CoreError;
use pretriaje_core::models::answer::AnswerMap;
use pretriaje_core::models::questionnaire::{Question, Questionnaire};
use pretriaje_core::models::session::RedFlag;

use crate::rules::field;

/// The questionnaire shipped with the service.
pub const DEFAULT_QUESTIONNAIRE_JSON: &str = include_str!("../data/questionnaire.json");

pub fn default_questionnaire() -> Result<Questionnaire, CoreError> {
    Questionnaire::from_json(DEFAULT_QUESTIONNAIRE_JSON)
}

/// Questions the wizard walks for these answers: core, then every module
/// triggered by the reported exposure, then closing. A `showIf` question is
/// kept only while its referenced answer equals the expected value.
pub fn visible_questions<'a>(
    questionnaire: &'a Questionnaire,
    answers: &AnswerMap,
) -> Vec<&'a Question> {
    let exposures = answers
        .get(field::EXPOSURE)
        .map(|v| v.selections())
        .unwrap_or_default();

    let modules = questionnaire.modules.iter().filter(|m| {
        m.trigger
            .exposures_includes
            .iter()
            .any(|e| exposures.contains(&e.as_str()))
    });

    questionnaire
        .core
        .iter()
        .chain(modules.flat_map(|m| m.questions.iter()))
        .chain(questionnaire.closing.iter())
        .filter(|q| match &q.show_if {
            Some(cond) => answers
                .get(&cond.question)
                .is_some_and(|v| v.contains(&cond.equals)),
            None => true,
        })
        .collect()
}

/// Result of scoring answers against the questionnaire's `redFlagIf` lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedFlagScore {
    pub score: u32,
    pub red_flags: Vec<RedFlag>,
}

/// Flag every visible question whose answer hits its `redFlagIf` list.
///
/// Each selected option of a flagged question adds its weight from
/// `redFlagScoreMap`; options without a weight add nothing.
pub fn score_red_flags(questionnaire: &Questionnaire, answers: &AnswerMap) -> RedFlagScore {
    let weights = &questionnaire.scoring.red_flag_score_map;
    let mut result = RedFlagScore::default();

    for question in visible_questions(questionnaire, answers) {
        if question.red_flag_if.is_empty() {
            continue;
        }
        let Some(answer) = answers.get(&question.id) else {
            continue;
        };
        let selected = answer.selections();
        if !selected
            .iter()
            .any(|s| question.red_flag_if.iter().any(|r| r == s))
        {
            continue;
        }

        result.red_flags.push(RedFlag {
            title: question.text.clone(),
            detail: answer.display(),
        });
        result.score += selected
            .iter()
            .filter_map(|s| weights.get(&Questionnaire::score_key(&question.id, s)))
            .sum::<u32>();
    }
    result
}
