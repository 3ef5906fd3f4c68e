//! Durable store: one pretty-printed JSON object per record under a data
//! directory, laid out by [`pretriaje_core::keys`].
//!
//! Read-modify-write cycles are serialized by a process-wide mutex. Running
//! two processes against the same directory is not supported.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use jiff::Timestamp;
use uuid::Uuid;

use pretriaje_core::keys;
use pretriaje_core::models::campaign::Campaign;
use pretriaje_core::models::report::Report;
use pretriaje_core::models::session::Session;

use crate::error::StorageError;
use crate::objects::ObjectStore;
use crate::repo::{self, CampaignRepository, ReportRepository, SessionRepository};
use crate::state::{load_all, load_state_opt, save_state};

#[derive(Debug)]
pub struct FileStore {
    objects: ObjectStore,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let objects = ObjectStore::open(root)?;
        tracing::info!(root = %objects.root().display(), "file store opened");
        Ok(Self {
            objects,
            write_lock: Mutex::new(()),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, StorageError> {
        self.write_lock.lock().map_err(|_| StorageError::LockPoisoned)
    }

    fn campaign_key(id: &str) -> Result<String, StorageError> {
        if keys::is_valid_campaign_id(id) {
            Ok(keys::campaign(id))
        } else {
            Err(StorageError::InvalidKey {
                key: id.to_string(),
            })
        }
    }
}

impl SessionRepository for FileStore {
    fn get_session(&self, id: Uuid) -> Result<Option<Session>, StorageError> {
        load_state_opt(&self.objects, &keys::session(id))
    }

    fn save_session(&self, session: &Session) -> Result<(), StorageError> {
        let _guard = self.lock()?;
        save_state(&self.objects, &keys::session(session.id), session)?;
        tracing::info!(session_id = %session.id, status = ?session.status, "session saved");
        Ok(())
    }

    fn update_session(
        &self,
        id: Uuid,
        now: Timestamp,
        apply: &mut dyn FnMut(&mut Session) -> bool,
    ) -> Result<Option<Session>, StorageError> {
        let _guard = self.lock()?;
        let key = keys::session(id);
        let Some(mut session) = load_state_opt::<Session>(&self.objects, &key)? else {
            return Ok(None);
        };
        if !apply(&mut session) {
            return Ok(Some(session));
        }
        session.id = id;
        session.last_activity_at = now;
        save_state(&self.objects, &key, &session)?;
        Ok(Some(session))
    }

    fn delete_session(&self, id: Uuid) -> Result<bool, StorageError> {
        let _guard = self.lock()?;
        let deleted = self.objects.delete_object(&keys::session(id))?;
        if deleted {
            tracing::info!(session_id = %id, "session deleted");
        }
        Ok(deleted)
    }

    fn list_sessions(&self, campaign_id: &str) -> Result<Vec<Session>, StorageError> {
        let sessions: Vec<Session> = load_all(&self.objects, keys::SESSIONS_PREFIX)?;
        Ok(sessions
            .into_iter()
            .filter(|s| s.campaign_id == campaign_id)
            .collect())
    }
}

impl CampaignRepository for FileStore {
    fn get_campaign(&self, id: &str) -> Result<Option<Campaign>, StorageError> {
        if !keys::is_valid_campaign_id(id) {
            return Ok(None);
        }
        load_state_opt(&self.objects, &keys::campaign(id))
    }

    fn save_campaign(&self, campaign: &Campaign) -> Result<(), StorageError> {
        let key = Self::campaign_key(&campaign.id)?;
        let _guard = self.lock()?;
        save_state(&self.objects, &key, campaign)?;
        tracing::info!(campaign_id = %campaign.id, "campaign saved");
        Ok(())
    }
}

impl ReportRepository for FileStore {
    fn save_report(&self, report: &Report) -> Result<(), StorageError> {
        let _guard = self.lock()?;
        save_state(&self.objects, &keys::report(report.id), report)?;
        tracing::info!(report_id = %report.id, session_id = %report.session_id, "report saved");
        Ok(())
    }

    fn report_for_session(&self, session_id: Uuid) -> Result<Option<Report>, StorageError> {
        let reports: Vec<Report> = load_all(&self.objects, keys::REPORTS_PREFIX)?;
        Ok(repo::latest(
            reports.into_iter().filter(|r| r.session_id == session_id),
        ))
    }
}
