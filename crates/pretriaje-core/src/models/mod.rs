pub mod answer;
pub mod campaign;
pub mod interaction;
pub mod questionnaire;
pub mod report;
pub mod session;
pub mod triage;
