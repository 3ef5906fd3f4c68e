pub mod campaigns;
pub mod demo;
pub mod health;
pub mod questionnaire;
pub mod reports;
pub mod review;
pub mod sessions;
