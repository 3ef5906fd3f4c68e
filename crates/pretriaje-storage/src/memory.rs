use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use jiff::Timestamp;
use uuid::Uuid;

use pretriaje_core::models::campaign::Campaign;
use pretriaje_core::models::report::Report;
use pretriaje_core::models::session::Session;

use crate::error::StorageError;
use crate::repo::{self, CampaignRepository, ReportRepository, SessionRepository};

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
    campaigns: RwLock<HashMap<String, Campaign>>,
    reports: RwLock<HashMap<Uuid, Report>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, StorageError> {
    lock.read().map_err(|_| StorageError::LockPoisoned)
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, StorageError> {
    lock.write().map_err(|_| StorageError::LockPoisoned)
}

impl SessionRepository for MemoryStore {
    fn get_session(&self, id: Uuid) -> Result<Option<Session>, StorageError> {
        Ok(read(&self.sessions)?.get(&id).cloned())
    }

    fn save_session(&self, session: &Session) -> Result<(), StorageError> {
        write(&self.sessions)?.insert(session.id, session.clone());
        Ok(())
    }

    fn update_session(
        &self,
        id: Uuid,
        now: Timestamp,
        apply: &mut dyn FnMut(&mut Session) -> bool,
    ) -> Result<Option<Session>, StorageError> {
        let mut sessions = write(&self.sessions)?;
        let Some(session) = sessions.get_mut(&id) else {
            return Ok(None);
        };
        if !apply(session) {
            return Ok(Some(session.clone()));
        }
        session.id = id;
        session.last_activity_at = now;
        Ok(Some(session.clone()))
    }

    fn delete_session(&self, id: Uuid) -> Result<bool, StorageError> {
        Ok(write(&self.sessions)?.remove(&id).is_some())
    }

    fn list_sessions(&self, campaign_id: &str) -> Result<Vec<Session>, StorageError> {
        Ok(read(&self.sessions)?
            .values()
            .filter(|s| s.campaign_id == campaign_id)
            .cloned()
            .collect())
    }
}

impl CampaignRepository for MemoryStore {
    fn get_campaign(&self, id: &str) -> Result<Option<Campaign>, StorageError> {
        Ok(read(&self.campaigns)?.get(id).cloned())
    }

    fn save_campaign(&self, campaign: &Campaign) -> Result<(), StorageError> {
        write(&self.campaigns)?.insert(campaign.id.clone(), campaign.clone());
        Ok(())
    }
}

impl ReportRepository for MemoryStore {
    fn save_report(&self, report: &Report) -> Result<(), StorageError> {
        write(&self.reports)?.insert(report.id, report.clone());
        Ok(())
    }

    fn report_for_session(&self, session_id: Uuid) -> Result<Option<Report>, StorageError> {
        let reports = read(&self.reports)?;
        Ok(repo::latest(
            reports
                .values()
                .filter(|r| r.session_id == session_id)
                .cloned(),
        ))
    }
}
