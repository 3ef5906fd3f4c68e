//! pretriaje-core
//!
//! Shared vocabulary of the pre-triage system: answers, questionnaire schema,
//! sessions, campaigns, reports and triage results. No I/O lives here.

pub mod error;
pub mod keys;
pub mod models;
pub mod qr;
