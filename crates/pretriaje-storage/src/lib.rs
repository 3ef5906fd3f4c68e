//! pretriaje-storage
//!
//! Repository interfaces for sessions, campaigns and reports, with an
//! in-memory adapter and a directory-of-JSON-objects adapter.

pub mod error;
pub mod file;
pub mod memory;
pub mod objects;
pub mod repo;
pub mod state;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use repo::{CampaignRepository, ReportRepository, SessionRepository};
