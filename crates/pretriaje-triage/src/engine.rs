use pretriaje_core::models::answer::{AnswerMap, AnswerValue};
use pretriaje_core::models::triage::{TriageAnalysis, TriageLevel};

use crate::content::{self, FILLER_QUESTIONS};
use crate::rules::{
    self, AI_QUESTION_COUNT, AMBER_THRESHOLD, MAX_REASONS, RED_FLAG_PRESENT, RED_THRESHOLD,
    RuleOutcome, SCORE_MAX, SCORE_MIN,
};

/// Score an answer map.
///
/// Deterministic and infallible: missing or unreadable answers contribute
/// nothing, and the same answers always produce the same analysis.
pub fn compute_triage(answers: &AnswerMap) -> TriageAnalysis {
    let outcomes = rules::evaluate_rules(answers);

    let raw: i32 = outcomes.iter().map(|o| o.delta).sum();
    let score = raw.clamp(SCORE_MIN, SCORE_MAX) as u32;
    let level = classify(score, rules::red_flag_now(answers));

    let reasons = outcomes
        .iter()
        .filter_map(|o| o.reason.clone())
        .take(MAX_REASONS)
        .collect();

    let pain = answers
        .get(rules::field::PAIN_LEVEL)
        .and_then(AnswerValue::as_scale);
    let ai_summary = content::summary(level, pain, RED_FLAG_PRESENT.holds(answers));

    TriageAnalysis {
        score,
        level,
        reasons,
        ai_summary,
        ai_questions: follow_up_questions(&outcomes),
    }
}

/// Map a clamped score to a level. An acute symptom happening now is `Rojo`
/// whatever the score.
pub fn classify(score: u32, red_flag_now: bool) -> TriageLevel {
    if red_flag_now || score >= RED_THRESHOLD {
        TriageLevel::Rojo
    } else if score >= AMBER_THRESHOLD {
        TriageLevel::Ambar
    } else {
        TriageLevel::Verde
    }
}

/// Follow-ups in rule order, without repeats, padded with fillers to exactly
/// [`AI_QUESTION_COUNT`].
fn follow_up_questions(outcomes: &[RuleOutcome]) -> Vec<String> {
    let mut questions: Vec<String> = Vec::with_capacity(AI_QUESTION_COUNT);
    let triggered = outcomes.iter().flat_map(|o| o.follow_ups.iter().copied());
    for question in triggered.chain(FILLER_QUESTIONS) {
        if questions.len() == AI_QUESTION_COUNT {
            break;
        }
        if !questions.iter().any(|q| q == question) {
            questions.push(question.to_string());
        }
    }
    questions
}
