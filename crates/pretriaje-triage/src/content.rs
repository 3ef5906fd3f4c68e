//! Fixed text the engine and review protocol draw from.
//!
//! Changing these is a content edit; scoring does not depend on the wording.

use pretriaje_core::models::triage::TriageLevel;

/// Padding for `aiQuestions`, used in this order.
pub const FILLER_QUESTIONS: [&str; 3] = [
    "¿Hay algún otro síntoma reciente que te preocupe?",
    "¿Tienes alguna alergia no diagnosticada?",
    "¿Realizas actividad física regularmente?",
];

/// Candidates for regenerating and replenishing follow-up questions.
pub const EXTRA_QUESTIONS_POOL: [&str; 9] = [
    "¿Has notado si el dolor aumenta con el reposo o con el movimiento?",
    "¿Hay alguna postura antálgica que te alivie el síntoma?",
    "¿Has tenido fiebre o escalofríos en las últimas horas?",
    "¿Sientes hormigueo o pérdida de fuerza en alguna extremidad?",
    "¿El síntoma se irradia hacia alguna otra zona del cuerpo?",
    "¿Has comido algo fuera de lo habitual hoy?",
    "¿Has estado en contacto con productos químicos recientemente?",
    "¿Cómo calificarías tu nivel de estrés hoy del 0 al 10?",
    "¿Has dormido bien la noche anterior (más de 6 horas)?",
];

fn summary_template(level: TriageLevel) -> &'static str {
    match level {
        TriageLevel::Verde => {
            "Resumen IA: Perfil de riesgo bajo. Sin antecedentes críticos inmediatos. Apto para revisión estándar."
        }
        TriageLevel::Ambar => {
            "Resumen IA: Perfil de riesgo moderado. Antecedentes médicos o medicación crónica que requieren supervisión."
        }
        TriageLevel::Rojo => {
            "ALERTA IA: Perfil de riesgo elevado. Múltiples factores de salud detectados. Se recomienda revisión médica exhaustiva."
        }
    }
}

/// Summary for `level`, with a pain note when pain was reported and a note
/// when an acute symptom is present.
pub fn summary(level: TriageLevel, pain: Option<u8>, red_flag_present: bool) -> String {
    let mut text = summary_template(level).to_string();
    if let Some(pain) = pain.filter(|p| *p > 0) {
        text.push_str(&format!(" Dolor referido: {pain}/10."));
    }
    if red_flag_present {
        text.push_str(" Síntoma de alarma presente.");
    }
    text
}
