use pretriaje_core::error::CoreError;
use pretriaje_core::models::answer::{AnswerMap, AnswerValue};
use pretriaje_core::models::questionnaire::Questionnaire;
use pretriaje_triage::schema::{default_questionnaire, score_red_flags, visible_questions};

fn answers(pairs: &[(&str, AnswerValue)]) -> AnswerMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn visible_ids(questionnaire: &Questionnaire, answers: &AnswerMap) -> Vec<String> {
    visible_questions(questionnaire, answers)
        .into_iter()
        .map(|q| q.id.clone())
        .collect()
}

#[test]
fn bundled_questionnaire_parses() {
    let q = default_questionnaire().unwrap();
    assert!(q.question("q_red_flags").is_some());
    assert!(q.question("q_drive_sleepiness").is_some());
    assert_eq!(q.modules.len(), 3);
    assert!(!q.scoring.red_flag_score_map.is_empty());
}

#[test]
fn modules_follow_the_reported_exposure() {
    let q = default_questionnaire().unwrap();

    let none = visible_ids(&q, &AnswerMap::new());
    assert!(!none.iter().any(|id| id.starts_with("q_drive") || id.starts_with("q_machine")));

    let driving = visible_ids(&q, &answers(&[("q_exposure", "Conducción".into())]));
    assert!(driving.contains(&"q_drive_sleepiness".to_string()));
    assert!(!driving.contains(&"q_machine_dizziness".to_string()));

    let height = visible_ids(&q, &answers(&[("q_exposure", "Altura".into())]));
    assert!(height.contains(&"q_machine_dizziness".to_string()));
}

#[test]
fn walk_order_is_core_then_modules_then_closing() {
    let q = default_questionnaire().unwrap();
    let ids = visible_ids(&q, &answers(&[("q_exposure", "Químicos".into())]));
    let pos = |id: &str| ids.iter().position(|x| x == id).unwrap();
    assert!(pos("q_mental_health") < pos("q_chem_skin"));
    assert!(pos("q_chem_skin") < pos("q_fit_now"));
    assert_eq!(ids.first().map(String::as_str), Some("q_age"));
}

#[test]
fn show_if_hides_until_the_gate_matches() {
    let q = default_questionnaire().unwrap();

    let hidden = visible_ids(&q, &answers(&[("q_additional_info", "No".into())]));
    assert!(!hidden.contains(&"q_additional_text".to_string()));

    let shown = visible_ids(&q, &answers(&[("q_additional_info", "Sí".into())]));
    assert!(shown.contains(&"q_additional_text".to_string()));
}

#[test]
fn red_flag_options_add_their_weights() {
    let q = default_questionnaire().unwrap();
    let result = score_red_flags(
        &q,
        &answers(&[
            ("q_red_flags", vec!["Dolor en el pecho", "Mareo intenso"].into()),
            ("q_red_flags_now", "Sí".into()),
        ]),
    );
    assert_eq!(result.score, 10);
    assert_eq!(result.red_flags.len(), 2);
    assert_eq!(result.red_flags[0].detail, "Dolor en el pecho, Mareo intenso");
    assert_eq!(q.priority_label(result.score), Some("ALTA PRIORIDAD"));
}

#[test]
fn hidden_module_answers_are_not_flagged() {
    let q = default_questionnaire().unwrap();
    let stray = answers(&[("q_drive_sleepiness", "Sí".into())]);
    assert_eq!(score_red_flags(&q, &stray).score, 0);

    let mut driving = stray.clone();
    driving.insert("q_exposure".into(), "Conducción".into());
    let result = score_red_flags(&q, &driving);
    assert_eq!(result.score, 3);
    assert_eq!(q.priority_label(result.score), Some("MEDIA PRIORIDAD"));
}

#[test]
fn clean_answers_are_normal_priority() {
    let q = default_questionnaire().unwrap();
    let result = score_red_flags(
        &q,
        &answers(&[
            ("q_red_flags", vec!["Ninguna"].into()),
            ("q_fit_now", "Sí".into()),
        ]),
    );
    assert_eq!(result.score, 0);
    assert!(result.red_flags.is_empty());
    assert_eq!(q.priority_label(0), Some("NORMAL"));
}

#[test]
fn duplicate_question_ids_are_rejected() {
    let json = r#"{
        "version": "t",
        "ui": { "max_options": 8, "other_char_limit": 120, "show_progress": true },
        "start_ack": { "text": "Hola" },
        "scoring": {},
        "core": [
            { "id": "q_a", "type": "single", "text": "A", "options": ["Sí", "No"] },
            { "id": "q_a", "type": "single", "text": "B", "options": ["Sí", "No"] }
        ]
    }"#;
    assert!(matches!(
        Questionnaire::from_json(json),
        Err(CoreError::InvalidQuestionnaire(_))
    ));
}

#[test]
fn show_if_must_reference_a_known_question() {
    let json = r#"{
        "version": "t",
        "ui": { "max_options": 8, "other_char_limit": 120, "show_progress": true },
        "start_ack": { "text": "Hola" },
        "scoring": {},
        "core": [
            {
                "id": "q_a",
                "type": "text",
                "text": "A",
                "showIf": { "question": "q_missing", "equals": "Sí" }
            }
        ]
    }"#;
    assert!(matches!(
        Questionnaire::from_json(json),
        Err(CoreError::InvalidQuestionnaire(_))
    ));
}
