//! The printable clinician report for one submitted session.

use jiff::Timestamp;
use serde::Serialize;

use pretriaje_core::models::answer::AnswerMap;
use pretriaje_core::models::questionnaire::{Question, Questionnaire};
use pretriaje_core::models::report::Report;
use pretriaje_core::models::session::Session;

use crate::error::ExportError;
use crate::render::render_template;

const REPORT_TEMPLATE_NAME: &str = "report.html";
const REPORT_TEMPLATE: &str = include_str!("../templates/report.html.tera");

/// Suffix of the free-text answer attached to an "Otro" option.
const OTHER_SUFFIX: &str = "_other";

#[derive(Debug, Serialize)]
struct ReportView {
    worker_name: String,
    worker_id: Option<String>,
    submitted_at: Option<String>,
    reviewed: bool,
    reviewed_at: Option<String>,
    level: &'static str,
    badge: &'static str,
    score: u32,
    ai_summary: Option<String>,
    reasons: Vec<String>,
    questionnaire_score: u32,
    questionnaire_priority: Option<String>,
    alerts: Vec<String>,
    interactions: Vec<InteractionRow>,
    sections: Vec<Section>,
}

#[derive(Debug, Serialize)]
struct InteractionRow {
    question: String,
    answer: String,
}

#[derive(Debug, Serialize)]
struct Section {
    title: &'static str,
    rows: Vec<AnswerRow>,
}

#[derive(Debug, Serialize)]
struct AnswerRow {
    label: String,
    value: String,
}

fn format_time(ts: Timestamp) -> String {
    ts.strftime("%Y-%m-%d %H:%M UTC").to_string()
}

fn answer_rows<'a>(
    questions: impl Iterator<Item = &'a Question>,
    answers: &AnswerMap,
) -> Vec<AnswerRow> {
    questions
        .filter_map(|q| {
            let answer = answers.get(&q.id)?;
            let mut value = answer.display();
            if value.trim().is_empty() {
                return None;
            }
            if let Some(other) = answers.get(&format!("{}{OTHER_SUFFIX}", q.id))
                && !other.display().trim().is_empty()
            {
                value.push_str(&format!(" (Otro: {})", other.display()));
            }
            Some(AnswerRow {
                label: q.text.clone(),
                value,
            })
        })
        .collect()
}

impl ReportView {
    fn build(session: &Session, questionnaire: &Questionnaire, report: Option<&Report>) -> Self {
        let triage = session.triage.as_ref();
        let answers = &session.answers;

        let mut sections = vec![Section {
            title: "Datos Generales",
            rows: answer_rows(questionnaire.core.iter(), answers),
        }];
        let module_rows = answer_rows(
            questionnaire.modules.iter().flat_map(|m| m.questions.iter()),
            answers,
        );
        if !module_rows.is_empty() {
            sections.push(Section {
                title: "Módulos Específicos",
                rows: module_rows,
            });
        }
        let closing_rows = answer_rows(questionnaire.closing.iter(), answers);
        if !closing_rows.is_empty() {
            sections.push(Section {
                title: "Cierre",
                rows: closing_rows,
            });
        }

        let alerts = match report {
            Some(r) => r.summary.red_flags.iter().map(|f| f.title.clone()).collect(),
            None => session.red_flags.iter().map(|f| f.title.clone()).collect(),
        };

        Self {
            worker_name: session.display_name(),
            worker_id: session.worker_id.clone(),
            submitted_at: session.submitted_at.map(format_time),
            reviewed: session.reviewed,
            reviewed_at: session.reviewed_at.map(format_time),
            level: session.priority().as_str(),
            badge: session.priority().badge(),
            score: triage.map_or(session.red_flag_score, |t| t.score),
            ai_summary: triage.map(|t| t.ai_summary.clone()),
            reasons: triage.map(|t| t.reasons.clone()).unwrap_or_default(),
            questionnaire_score: report.map_or(0, |r| r.summary.score),
            questionnaire_priority: report
                .and_then(|r| questionnaire.priority_label(r.summary.score))
                .map(str::to_string),
            alerts,
            interactions: session
                .ai_interactions
                .iter()
                .map(|i| InteractionRow {
                    question: i.question.clone(),
                    answer: i.answer.clone(),
                })
                .collect(),
            sections,
        }
    }
}

/// Render the clinician report for a submitted session.
///
/// `report` is the snapshot taken at submission; when absent, alerts fall
/// back to the session's legacy red flags.
pub fn render_report_html(
    session: &Session,
    questionnaire: &Questionnaire,
    report: Option<&Report>,
) -> Result<String, ExportError> {
    let view = ReportView::build(session, questionnaire, report);
    let html = render_template(REPORT_TEMPLATE_NAME, REPORT_TEMPLATE, &view)?;
    tracing::debug!(session_id = %session.id, bytes = html.len(), "report rendered");
    Ok(html)
}
