//! # Drawing sessions
//!
//! Server-held editing state for handwritten notes.
//!
//! ## Ordering
//!
//! - Every mutation of a session locks its [`Draft`], so page switches and saves
//!   run strictly between whole strokes
//! - Strokes only arrive complete (pointer released), never point by point
//! - A save while another save of the same session is in flight is dropped, not queued
//!
//! ## Lifecycle
//!
//! Opening a session loads the note into a [`Notebook`]. Nothing is written back
//! until an explicit save; closing the session throws the draft away, and so
//! does leaving it untouched for longer than the idle timeout.
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use ink::{Notebook, Sketch};
use moka::{notification::RemovalCause, sync::Cache};
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;

pub struct Draft {
    pub notebook: Notebook<Sketch>,
    pub note_id: Option<Uuid>,
    pub title: String,
    pub folder: Option<String>,
    pub tags: Vec<String>,
}

pub struct CanvasSession {
    pub id: Uuid,
    pub user: String,
    pub draft: Mutex<Draft>,
    saving: AtomicBool,
}

/// Clears the in-flight flag when the save finishes, successfully or not.
pub struct SaveGuard<'a>(&'a AtomicBool);

impl Drop for SaveGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl CanvasSession {
    pub fn new(user: String, draft: Draft) -> Self {
        Self {
            id: Uuid::new_v4(),
            user,
            draft: Mutex::new(draft),
            saving: AtomicBool::new(false),
        }
    }

    /// `None` when a save is already running.
    pub fn try_begin_save(&self) -> Option<SaveGuard<'_>> {
        self.saving
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SaveGuard(&self.saving))
    }

    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::Acquire)
    }
}

pub struct Sessions {
    sessions: Cache<Uuid, Arc<CanvasSession>>,
}

impl Sessions {
    pub fn new(capacity: u64, idle: Duration) -> Self {
        let sessions = Cache::builder()
            .max_capacity(capacity)
            .time_to_idle(idle)
            .eviction_listener(|id: Arc<Uuid>, _, cause: RemovalCause| {
                if cause.was_evicted() {
                    info!("Dropped drawing session {id} ({cause:?})");
                }
            })
            .build();

        Self { sessions }
    }

    pub fn open(&self, user: String, draft: Draft) -> Arc<CanvasSession> {
        let session = Arc::new(CanvasSession::new(user, draft));
        info!("Opened drawing session {} for {}", session.id, session.user);

        self.sessions.insert(session.id, session.clone());

        session
    }

    /// Sessions of other users look exactly like missing ones.
    pub fn get(&self, user: &str, id: Uuid) -> Result<Arc<CanvasSession>, AppError> {
        self.sessions
            .get(&id)
            .filter(|session| session.user == user)
            .ok_or(AppError::SessionNotFound)
    }

    pub fn close(&self, user: &str, id: Uuid) -> Result<(), AppError> {
        self.get(user, id)?;
        self.sessions.invalidate(&id);
        info!("Discarded drawing session {id}");

        Ok(())
    }

    pub fn count(&self) -> u64 {
        self.sessions.run_pending_tasks();
        self.sessions.entry_count()
    }
}
