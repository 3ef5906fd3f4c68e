//! Demo campaign and worker profiles.
//!
//! Profiles go through the real submit path, so their triage is whatever the
//! current rules produce. Ids are fixed, and seeding skips profiles whose
//! session already exists, so reviewed demo sessions keep their interactions.

use jiff::{SignedDuration, Timestamp};
use uuid::Uuid;

use pretriaje_core::models::answer::{AnswerMap, AnswerValue};
use pretriaje_core::models::campaign::{Campaign, CampaignSettings};
use pretriaje_core::models::session::Session;

use crate::audit::Actor;
use crate::error::ApiError;
use crate::state::AppState;
use crate::submission::submit_session;

pub const DEMO_CAMPAIGN_ID: &str = "demo-campaign";
pub const DEMO_TOKEN: &str = "token123";

const DEMO_TOKEN_TTL: SignedDuration = SignedDuration::from_hours(24);
/// Gap between consecutive demo submissions.
const SUBMISSION_SPACING: SignedDuration = SignedDuration::from_mins(5);
const DEMO_ID_BASE: u128 = 0x0000_d3e0_0000_4000_8000_0000_0000_0000;

struct Profile {
    name: &'static str,
    age: &'static str,
    role: &'static str,
    pain: &'static str,
    red_flag: &'static str,
    red_flag_now: &'static str,
    family: &'static [&'static str],
    personal: &'static [&'static str],
    medication: &'static [&'static str],
    habits: &'static [&'static str],
    exposure: &'static str,
}

const PROFILES: &[Profile] = &[
    Profile {
        name: "Carlos Sanchez",
        age: "56",
        role: "Conducción",
        pain: "8",
        red_flag: "Dolor en el pecho",
        red_flag_now: "Sí",
        family: &["Cardiopatías / Infarto / Ictus"],
        personal: &["Hipertensión", "Enfermedad cardiaca"],
        medication: &["Anticoagulantes", "Antihipertensivos"],
        habits: &["Fumador/a"],
        exposure: "Conducción",
    },
    Profile {
        name: "Maria Garcia",
        age: "62",
        role: "Limpieza / mantenimiento",
        pain: "9",
        red_flag: "Dificultad respiratoria",
        red_flag_now: "Sí",
        family: &["Cáncer"],
        personal: &["Enfermedad respiratoria"],
        medication: &["Otros"],
        habits: &["No"],
        exposure: "Químicos",
    },
    Profile {
        name: "Luis Lopez",
        age: "45",
        role: "Trabajo con maquinaria / industria",
        pain: "7",
        red_flag: "Mareo intenso",
        red_flag_now: "Sí",
        family: &["Muerte súbita (<50 años)"],
        personal: &["No"],
        medication: &["No"],
        habits: &["Consumo habitual de alcohol"],
        exposure: "Maquinaria",
    },
    Profile {
        name: "Ana Martinez",
        age: "50",
        role: "Administración",
        pain: "5",
        red_flag: "Ninguna",
        red_flag_now: "No",
        family: &["Diabetes"],
        personal: &["Diabetes", "Hipertensión"],
        medication: &["Antihipertensivos"],
        habits: &["Exfumador/a"],
        exposure: "Pantallas",
    },
    Profile {
        name: "Jose Gonzalez",
        age: "38",
        role: "Trabajo físico / esfuerzo manual",
        pain: "6",
        red_flag: "Ninguna",
        red_flag_now: "No",
        family: &["No lo sabe"],
        personal: &["No"],
        medication: &["Antidepresivos / Ansiolíticos"],
        habits: &["Fumador/a"],
        exposure: "Esfuerzo Físico",
    },
    Profile {
        name: "Elena Fernandez",
        age: "41",
        role: "Sanidad / cuidados",
        pain: "4",
        red_flag: "Ninguna",
        red_flag_now: "No",
        family: &["Enfermedad neurológica"],
        personal: &["Trastorno psicológico"],
        medication: &["Suplementos"],
        habits: &["No"],
        exposure: "Esfuerzo Físico",
    },
    Profile {
        name: "Laura Rodriguez",
        age: "24",
        role: "Atención al público",
        pain: "2",
        red_flag: "Ninguna",
        red_flag_now: "No",
        family: &["Ninguno conocido"],
        personal: &["No"],
        medication: &["Anticonceptivos hormonales"],
        habits: &["No"],
        exposure: "Pantallas",
    },
    Profile {
        name: "Miguel Gomez",
        age: "29",
        role: "Educación",
        pain: "0",
        red_flag: "Ninguna",
        red_flag_now: "No",
        family: &["Ninguno conocido"],
        personal: &["No"],
        medication: &["No"],
        habits: &["No"],
        exposure: "Pantallas",
    },
    Profile {
        name: "Lucia Diaz",
        age: "33",
        role: "Trabajo de oficina / pantallas",
        pain: "1",
        red_flag: "Ninguna",
        red_flag_now: "No",
        family: &["Ninguno conocido"],
        personal: &["No"],
        medication: &["No"],
        habits: &["No"],
        exposure: "Pantallas",
    },
    Profile {
        name: "Juan Perez",
        age: "27",
        role: "Otro puesto de trabajo",
        pain: "0",
        red_flag: "Ninguna",
        red_flag_now: "No",
        family: &["Ninguno conocido"],
        personal: &["No"],
        medication: &["No"],
        habits: &["No"],
        exposure: "Ninguna",
    },
];

pub fn profile_count() -> usize {
    PROFILES.len()
}

/// Fixed id of the `index`-th demo session.
pub fn demo_session_id(index: usize) -> Uuid {
    Uuid::from_u128(DEMO_ID_BASE + index as u128)
}

impl Profile {
    fn split_name(&self) -> (&'static str, Option<&'static str>) {
        match self.name.split_once(' ') {
            Some((first, last)) => (first, Some(last)),
            None => (self.name, None),
        }
    }

    fn answers(&self) -> AnswerMap {
        let (first, last) = self.split_name();
        let mut answers = AnswerMap::from([
            ("name".to_string(), AnswerValue::from(self.name)),
            ("firstname".to_string(), AnswerValue::from(first)),
            ("q_age".to_string(), AnswerValue::from(self.age)),
            ("q_role".to_string(), AnswerValue::from(self.role)),
            ("q_fit_now".to_string(), AnswerValue::from("Sí")),
            ("q_pain_level".to_string(), AnswerValue::from(self.pain)),
            ("q_red_flags".to_string(), AnswerValue::from(vec![self.red_flag])),
            ("q_red_flags_now".to_string(), AnswerValue::from(self.red_flag_now)),
            ("q_family_history".to_string(), AnswerValue::from(self.family.to_vec())),
            ("q_personal_history".to_string(), AnswerValue::from(self.personal.to_vec())),
            ("q_medication_habitual".to_string(), AnswerValue::from(self.medication.to_vec())),
            ("q_habits".to_string(), AnswerValue::from(self.habits.to_vec())),
            ("q_exposure".to_string(), AnswerValue::from(self.exposure)),
        ]);
        if let Some(last) = last {
            answers.insert("lastname".to_string(), AnswerValue::from(last));
        }
        answers
    }

    fn session(&self, index: usize, started_at: Timestamp) -> Session {
        let (first, last) = self.split_name();
        let mut session = Session::new(DEMO_CAMPAIGN_ID, started_at);
        session.id = demo_session_id(index);
        session.answers = self.answers();
        session.worker_id = Some(format!("ID-{}", 1000 + index));
        session.worker_firstname = Some(first.to_string());
        session.worker_lastname = last.map(str::to_string);
        session
    }
}

pub fn demo_campaign(now: Timestamp) -> Campaign {
    Campaign {
        id: DEMO_CAMPAIGN_ID.to_string(),
        company_name: "TechSolutions S.L.".to_string(),
        unit_name: "Unidad Móvil MAD-01".to_string(),
        location: Some("Polígono Alcobendas".to_string()),
        doctor_emails: vec!["medico@prevencion.com".to_string()],
        qr_token_current: DEMO_TOKEN.to_string(),
        qr_token_expires_at: Some(now + DEMO_TOKEN_TTL),
        settings: CampaignSettings::default(),
    }
}

/// Create the demo campaign unless it already exists. Returns whether it was
/// created.
pub fn ensure_demo_campaign(state: &AppState, now: Timestamp) -> Result<bool, ApiError> {
    if state.campaigns.get_campaign(DEMO_CAMPAIGN_ID)?.is_some() {
        return Ok(false);
    }
    state.campaigns.save_campaign(&demo_campaign(now))?;
    tracing::info!(campaign_id = DEMO_CAMPAIGN_ID, "demo campaign created");
    Ok(true)
}

/// Insert every missing demo profile as a submitted session, newest first
/// at `now`. Returns the ids of the sessions created.
pub fn seed_sessions(state: &AppState, now: Timestamp) -> Result<Vec<Uuid>, ApiError> {
    ensure_demo_campaign(state, now)?;
    let mut created = Vec::new();
    for (index, profile) in PROFILES.iter().enumerate() {
        let id = demo_session_id(index);
        if state.sessions.get_session(id)?.is_some() {
            continue;
        }
        let submitted_at = now - SUBMISSION_SPACING * (index as i32);
        state.sessions.save_session(&profile.session(index, submitted_at))?;
        submit_session(state, id, submitted_at, Actor::System)?;
        created.push(id);
    }
    tracing::info!(created = created.len(), total = PROFILES.len(), "demo sessions seeded");
    Ok(created)
}
