//! pretriaje-triage
//!
//! Triage scoring and follow-up question logic. Pure functions and in-memory
//! state only; persistence is reached through [`review::InteractionSink`].

pub mod content;
pub mod engine;
pub mod error;
pub mod review;
pub mod rules;
pub mod schema;

pub use engine::compute_triage;
