//! The triage policy table.
//!
//! Scoring is an ordered list of [`RiskRule`] records. Rule order fixes the
//! order of reasons and follow-up questions, so new rules go where their
//! urgency belongs, not at the end by default.

use pretriaje_core::models::answer::{AnswerMap, AnswerValue};

pub const AMBER_THRESHOLD: u32 = 30;
pub const RED_THRESHOLD: u32 = 60;
pub const SCORE_MIN: i32 = 0;
pub const SCORE_MAX: i32 = 100;
pub const MAX_REASONS: usize = 4;
pub const AI_QUESTION_COUNT: usize = 3;
/// Pain at or above this level is reported as intense.
pub const PAIN_NOTABLE: u8 = 5;

pub mod field {
    pub const RED_FLAGS: &str = "q_red_flags";
    pub const RED_FLAGS_NOW: &str = "q_red_flags_now";
    pub const PAIN_LEVEL: &str = "q_pain_level";
    pub const MEDICATION_TODAY: &str = "q_medication_today";
    pub const EXPOSURE: &str = "q_exposure";
    pub const PERSONAL_HISTORY: &str = "q_personal_history";
    pub const FAMILY_HISTORY: &str = "q_family_history";
    pub const VASCULAR: &str = "q_vascular";
    pub const CHRONIC_MEDICATION: &str = "q_medication_habitual";
    pub const HABITS: &str = "q_habits";
    pub const MENTAL_HEALTH: &str = "q_mental_health";
}

/// A predicate over one answer field. Missing or unreadable answers never
/// satisfy a condition.
#[derive(Debug, Clone, Copy)]
pub enum Condition {
    /// At least one selected option other than the `negatives` sentinels.
    AnyExcept {
        field: &'static str,
        negatives: &'static [&'static str],
    },
    /// At least one of `options` is selected.
    AnyOf {
        field: &'static str,
        options: &'static [&'static str],
    },
    /// Scale answer (0–10) at or above `min`.
    ScaleAtLeast { field: &'static str, min: u8 },
}

impl Condition {
    pub fn field(&self) -> &'static str {
        match *self {
            Condition::AnyExcept { field, .. }
            | Condition::AnyOf { field, .. }
            | Condition::ScaleAtLeast { field, .. } => field,
        }
    }

    pub fn holds(&self, answers: &AnswerMap) -> bool {
        let Some(value) = answers.get(self.field()) else {
            return false;
        };
        match self {
            Condition::AnyExcept { negatives, .. } => {
                value.selections().iter().any(|s| !negatives.contains(s))
            }
            Condition::AnyOf { options, .. } => {
                value.selections().iter().any(|s| options.contains(s))
            }
            Condition::ScaleAtLeast { min, .. } => value.as_scale().is_some_and(|v| v >= *min),
        }
    }
}

/// How much a triggered rule adds to the score.
#[derive(Debug, Clone, Copy)]
pub enum Weight {
    Flat(i32),
    /// `points × scale value` of the trigger field.
    PerPoint(i32),
}

/// Bonus for the most severe sub-case of a risk dimension.
#[derive(Debug, Clone, Copy)]
pub struct Escalation {
    pub condition: Condition,
    pub bonus: i32,
}

/// Which reason string, if any, a triggered rule contributes.
///
/// `{value}` in a template is replaced with the trigger field's answer.
#[derive(Debug, Clone, Copy)]
pub enum Reason {
    Silent,
    Always(&'static str),
    OnEscalation(&'static str),
    Tiered {
        base: &'static str,
        escalated: &'static str,
    },
    /// Wording depends on the scale value of the trigger field.
    Graded {
        threshold: u8,
        below: &'static str,
        at_or_above: &'static str,
    },
}

#[derive(Debug, Clone, Copy)]
pub enum FollowUpWhen {
    Triggered,
    Escalated,
    /// The trigger field has one of these options selected.
    Selected(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub struct FollowUp {
    pub when: FollowUpWhen,
    pub question: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct RiskRule {
    pub id: &'static str,
    pub trigger: Condition,
    pub weight: Weight,
    pub escalation: Option<Escalation>,
    pub reason: Reason,
    pub follow_ups: &'static [FollowUp],
}

/// What one triggered rule contributed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    pub rule_id: &'static str,
    pub delta: i32,
    pub escalated: bool,
    pub reason: Option<String>,
    pub follow_ups: Vec<&'static str>,
}

impl RiskRule {
    /// Evaluate the rule. `None` when the trigger does not hold.
    pub fn evaluate(&self, answers: &AnswerMap) -> Option<RuleOutcome> {
        if !self.trigger.holds(answers) {
            return None;
        }
        let value = answers.get(self.trigger.field());
        let scale = value.and_then(AnswerValue::as_scale).unwrap_or(0);

        let base = match self.weight {
            Weight::Flat(delta) => delta,
            Weight::PerPoint(points) => points * i32::from(scale),
        };
        let escalation = self
            .escalation
            .filter(|e| e.condition.holds(answers));
        let escalated = escalation.is_some();
        let delta = base + escalation.map_or(0, |e| e.bonus);

        let template = match self.reason {
            Reason::Silent => None,
            Reason::Always(t) => Some(t),
            Reason::OnEscalation(t) => escalated.then_some(t),
            Reason::Tiered {
                base: plain,
                escalated: severe,
            } => Some(if escalated { severe } else { plain }),
            Reason::Graded {
                threshold,
                below,
                at_or_above,
            } => Some(if scale >= threshold { at_or_above } else { below }),
        };
        let reason = template.map(|t| t.replace("{value}", &self.value_text(value)));

        let follow_ups = self
            .follow_ups
            .iter()
            .filter(|f| match f.when {
                FollowUpWhen::Triggered => true,
                FollowUpWhen::Escalated => escalated,
                FollowUpWhen::Selected(options) => {
                    value.is_some_and(|v| options.iter().any(|o| v.contains(o)))
                }
            })
            .map(|f| f.question)
            .collect();

        Some(RuleOutcome {
            rule_id: self.id,
            delta,
            escalated,
            reason,
            follow_ups,
        })
    }

    fn value_text(&self, value: Option<&AnswerValue>) -> String {
        let Some(value) = value else {
            return String::new();
        };
        match self.trigger {
            Condition::ScaleAtLeast { .. } => {
                value.as_scale().map(|v| v.to_string()).unwrap_or_default()
            }
            Condition::AnyExcept { negatives, .. } => value
                .selections()
                .into_iter()
                .filter(|s| !negatives.contains(s))
                .collect::<Vec<_>>()
                .join(", "),
            Condition::AnyOf { .. } => value.selections().join(", "),
        }
    }
}

// ── Shared conditions ───────────────────────────────────────

pub const RED_FLAG_PRESENT: Condition = Condition::AnyExcept {
    field: field::RED_FLAGS,
    negatives: &["Ninguna", "No"],
};

pub const RED_FLAG_HAPPENING_NOW: Condition = Condition::AnyOf {
    field: field::RED_FLAGS_NOW,
    options: &["Sí", "Si"],
};

/// An acute symptom is present and happening right now. Forces `rojo`.
pub fn red_flag_now(answers: &AnswerMap) -> bool {
    RED_FLAG_PRESENT.holds(answers) && RED_FLAG_HAPPENING_NOW.holds(answers)
}

const CARDIAC_REVIEW: &str = "¿Cuándo fue tu última revisión cardiológica completa?";

// ── Rule registry ───────────────────────────────────────────

pub static RISK_RULES: &[RiskRule] = &[
    RiskRule {
        id: "red_flags",
        trigger: RED_FLAG_PRESENT,
        weight: Weight::Flat(50),
        escalation: Some(Escalation {
            condition: RED_FLAG_HAPPENING_NOW,
            bonus: 20,
        }),
        reason: Reason::Tiered {
            base: "Síntoma de alarma referido: {value}",
            escalated: "Síntoma de alarma activo ahora: {value}",
        },
        follow_ups: &[
            FollowUp {
                when: FollowUpWhen::Triggered,
                question: "¿Cuándo comenzó el síntoma y cómo ha evolucionado desde entonces?",
            },
            FollowUp {
                when: FollowUpWhen::Escalated,
                question: "¿El síntoma ha empeorado en los últimos minutos o se acompaña de sudoración o náuseas?",
            },
        ],
    },
    RiskRule {
        id: "pain",
        trigger: Condition::ScaleAtLeast {
            field: field::PAIN_LEVEL,
            min: 1,
        },
        weight: Weight::PerPoint(3),
        escalation: None,
        reason: Reason::Graded {
            threshold: PAIN_NOTABLE,
            below: "Dolor moderado referido ({value}/10)",
            at_or_above: "Dolor intenso referido ({value}/10)",
        },
        follow_ups: &[],
    },
    RiskRule {
        id: "medication_today",
        trigger: Condition::AnyExcept {
            field: field::MEDICATION_TODAY,
            negatives: &["No"],
        },
        weight: Weight::Flat(10),
        escalation: Some(Escalation {
            condition: Condition::AnyOf {
                field: field::MEDICATION_TODAY,
                options: &["Anticoagulantes", "Ansiolíticos / sedantes", "Insulina"],
            },
            bonus: 10,
        }),
        reason: Reason::Always("Medicación tomada hoy: {value}"),
        follow_ups: &[
            FollowUp {
                when: FollowUpWhen::Triggered,
                question: "¿Qué medicación has tomado hoy y a qué hora?",
            },
            FollowUp {
                when: FollowUpWhen::Selected(&["Ansiolíticos / sedantes"]),
                question: "¿Notas somnolencia o menor capacidad de concentración tras la toma?",
            },
        ],
    },
    RiskRule {
        id: "exposure",
        trigger: Condition::AnyExcept {
            field: field::EXPOSURE,
            negatives: &["Ninguna"],
        },
        weight: Weight::Flat(10),
        escalation: Some(Escalation {
            condition: Condition::AnyOf {
                field: field::EXPOSURE,
                options: &["Conducción", "Maquinaria", "Altura"],
            },
            bonus: 10,
        }),
        reason: Reason::Always("Exposición laboral de riesgo: {value}"),
        follow_ups: &[
            FollowUp {
                when: FollowUpWhen::Triggered,
                question: "¿Cuántas horas seguidas dedicas a esta tarea en una jornada habitual?",
            },
            FollowUp {
                when: FollowUpWhen::Escalated,
                question: "¿Has tenido algún episodio de somnolencia o mareo durante tu tarea en los últimos días?",
            },
            FollowUp {
                when: FollowUpWhen::Selected(&["Químicos"]),
                question: "¿Utilizas siempre los equipos de protección frente a productos químicos?",
            },
        ],
    },
    RiskRule {
        id: "personal_history",
        trigger: Condition::AnyExcept {
            field: field::PERSONAL_HISTORY,
            negatives: &["No"],
        },
        weight: Weight::Flat(20),
        escalation: Some(Escalation {
            condition: Condition::AnyOf {
                field: field::PERSONAL_HISTORY,
                options: &["Enfermedad cardiaca", "Enfermedad respiratoria"],
            },
            bonus: 20,
        }),
        reason: Reason::OnEscalation("Antecedentes personales de riesgo"),
        follow_ups: &[FollowUp {
            when: FollowUpWhen::Selected(&["Enfermedad cardiaca"]),
            question: CARDIAC_REVIEW,
        }],
    },
    RiskRule {
        id: "family_history",
        trigger: Condition::AnyExcept {
            field: field::FAMILY_HISTORY,
            negatives: &["Ninguno conocido", "No lo sabe"],
        },
        weight: Weight::Flat(10),
        escalation: Some(Escalation {
            condition: Condition::AnyOf {
                field: field::FAMILY_HISTORY,
                options: &["Muerte súbita (<50 años)"],
            },
            bonus: 20,
        }),
        reason: Reason::OnEscalation("Antecedentes familiares de riesgo"),
        follow_ups: &[FollowUp {
            when: FollowUpWhen::Selected(&["Cardiopatías / Infarto / Ictus"]),
            question: CARDIAC_REVIEW,
        }],
    },
    RiskRule {
        id: "vascular",
        trigger: Condition::AnyExcept {
            field: field::VASCULAR,
            negatives: &["No"],
        },
        weight: Weight::Flat(15),
        escalation: Some(Escalation {
            condition: Condition::AnyOf {
                field: field::VASCULAR,
                options: &["Trombosis", "Insuficiencia venosa"],
            },
            bonus: 10,
        }),
        reason: Reason::Always("Problemas vasculares"),
        follow_ups: &[],
    },
    RiskRule {
        id: "chronic_medication",
        trigger: Condition::AnyExcept {
            field: field::CHRONIC_MEDICATION,
            negatives: &["No"],
        },
        weight: Weight::Flat(10),
        escalation: Some(Escalation {
            condition: Condition::AnyOf {
                field: field::CHRONIC_MEDICATION,
                options: &["Anticoagulantes", "Antihipertensivos"],
            },
            bonus: 10,
        }),
        reason: Reason::OnEscalation("Medicación crónica relevante"),
        follow_ups: &[FollowUp {
            when: FollowUpWhen::Selected(&["Anticoagulantes"]),
            question: "¿Llevas un control regular del INR o coagulación?",
        }],
    },
    RiskRule {
        id: "habits",
        trigger: Condition::AnyExcept {
            field: field::HABITS,
            negatives: &["No"],
        },
        weight: Weight::Flat(5),
        escalation: Some(Escalation {
            condition: Condition::AnyOf {
                field: field::HABITS,
                options: &["Fumador/a", "Consumo habitual de alcohol"],
            },
            bonus: 5,
        }),
        reason: Reason::Silent,
        follow_ups: &[FollowUp {
            when: FollowUpWhen::Selected(&["Fumador/a"]),
            question: "¿Cuántos cigarrillos consumes al día y desde hace cuánto?",
        }],
    },
    RiskRule {
        id: "mental_health",
        trigger: Condition::AnyExcept {
            field: field::MENTAL_HEALTH,
            negatives: &["No", "Prefiere no responder"],
        },
        weight: Weight::Flat(5),
        escalation: None,
        reason: Reason::Silent,
        follow_ups: &[FollowUp {
            when: FollowUpWhen::Triggered,
            question: "¿Te encuentras en tratamiento activo actualmente?",
        }],
    },
];

/// Evaluate every rule in table order, keeping the ones that fired.
pub fn evaluate_rules(answers: &AnswerMap) -> Vec<RuleOutcome> {
    RISK_RULES
        .iter()
        .filter_map(|rule| rule.evaluate(answers))
        .collect()
}

pub fn rule(id: &str) -> Option<&'static RiskRule> {
    RISK_RULES.iter().find(|r| r.id == id)
}
