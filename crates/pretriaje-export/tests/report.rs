use jiff::Timestamp;
use uuid::Uuid;

use pretriaje_core::models::answer::{AnswerMap, AnswerValue};
use pretriaje_core::models::interaction::AiInteraction;
use pretriaje_core::models::report::{Report, ReportSummary};
use pretriaje_core::models::session::{RedFlag, Session, SessionStatus};
use pretriaje_export::render::render_template;
use pretriaje_export::render_report_html;
use pretriaje_triage::compute_triage;
use pretriaje_triage::schema::default_questionnaire;

fn submitted(answers: AnswerMap) -> Session {
    let now = Timestamp::from_second(1_700_000_000).unwrap();
    let mut session = Session::new("demo-campaign", now);
    session.apply_triage(compute_triage(&answers));
    session.answers = answers;
    session.status = SessionStatus::Submitted;
    session.submitted_at = Some(now);
    session.worker_firstname = Some("Carlos".to_string());
    session.worker_lastname = Some("Sanchez".to_string());
    session.worker_id = Some("ID-1000".to_string());
    session
}

fn chest_pain() -> AnswerMap {
    AnswerMap::from([
        ("q_pain_level".to_string(), AnswerValue::from("9")),
        ("q_red_flags".to_string(), AnswerValue::from(vec!["Dolor en el pecho"])),
        ("q_red_flags_now".to_string(), AnswerValue::from("Sí")),
        ("q_role".to_string(), AnswerValue::from("Otro puesto de trabajo")),
        ("q_role_other".to_string(), AnswerValue::from("Vigilante")),
    ])
}

#[test]
fn report_shows_triage_and_answers() {
    let session = submitted(chest_pain());
    let q = default_questionnaire().unwrap();
    let html = render_report_html(&session, &q, None).unwrap();

    assert!(html.contains("Carlos Sanchez"));
    assert!(html.contains("ID-1000"));
    assert!(html.contains("badge rojo"));
    assert!(html.contains("ALTA"));
    assert!(html.contains("97/100"));
    assert!(html.contains("Síntoma de alarma activo ahora: Dolor en el pecho"));
    assert!(html.contains("Datos Generales"));
    assert!(html.contains("Otro puesto de trabajo (Otro: Vigilante)"));
    assert!(html.contains("Alertas Clínicas Detectadas"));
    assert!(!html.contains("Informe Revisado"));
}

#[test]
fn report_uses_snapshot_alerts_when_available() {
    let session = submitted(chest_pain());
    let q = default_questionnaire().unwrap();
    let report = Report {
        id: Uuid::new_v4(),
        session_id: session.id,
        campaign_id: session.campaign_id.clone(),
        created_at: session.started_at,
        summary: ReportSummary {
            score: 7,
            red_flags: vec![RedFlag {
                title: "¿Tienes ahora o has tenido hoy alguno de estos síntomas?".to_string(),
                detail: "Dolor en el pecho".to_string(),
            }],
            answers: session.answers.clone(),
        },
        html: None,
    };
    let html = render_report_html(&session, &q, Some(&report)).unwrap();
    assert!(html.contains("Puntuación del cuestionario: 7 (ALTA PRIORIDAD)"));
    assert!(html.contains("¿Tienes ahora o has tenido hoy alguno de estos síntomas?"));
}

#[test]
fn clean_session_has_no_alerts() {
    let mut session = submitted(AnswerMap::from([(
        "q_red_flags".to_string(),
        AnswerValue::from(vec!["Ninguna"]),
    )]));
    session.reviewed = true;
    session.reviewed_at = Some(Timestamp::from_second(1_700_003_600).unwrap());
    let q = default_questionnaire().unwrap();
    let html = render_report_html(&session, &q, None).unwrap();

    assert!(html.contains("badge verde"));
    assert!(html.contains("Sin alertas clínicas detectadas"));
    assert!(html.contains("Validado por equipo médico el 2023-11-14 23:13 UTC"));
}

#[test]
fn interactions_are_listed_and_escaped() {
    let mut session = submitted(chest_pain());
    session.ai_interactions.push(AiInteraction {
        question: "¿Desde cuándo?".to_string(),
        answer: "<script>alert(1)</script>".to_string(),
        added_at: session.started_at,
    });
    let q = default_questionnaire().unwrap();
    let html = render_report_html(&session, &q, None).unwrap();

    assert!(html.contains("Entrevista Clínica Asistida por IA"));
    assert!(html.contains("¿Desde cuándo?"));
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;"));
}

#[test]
fn template_errors_are_reported() {
    let err = render_template("bad.html", "{% if %}", &serde_json::json!({})).unwrap_err();
    assert!(err.to_string().contains("template parse error"));
}
