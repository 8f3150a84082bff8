//! In-memory store for wizard and confirmation sessions.
//!
//! Sessions are keyed by the UUID embedded in component custom ids.
//! Expired and finished sessions are swept on every access; nothing is
//! persisted across restarts.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{PendingConfirmation, SelectionWizard};

/// A live interaction session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    /// Selection wizard in progress.
    Wizard(SelectionWizard),
    /// Destructive action awaiting an answer.
    Confirmation(PendingConfirmation),
}

impl Session {
    fn is_stale(&self, now: DateTime<Utc>) -> bool {
        match self {
            Self::Wizard(wizard) => wizard.is_expired(now) || wizard.step().is_terminal(),
            Self::Confirmation(pending) => pending.is_expired(now),
        }
    }
}

/// Session map shared by all workers.
#[derive(Debug, Default)]
pub struct SessionStore {
    entries: Mutex<HashMap<Uuid, Session>>,
}

impl SessionStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, Session>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn sweep(entries: &mut HashMap<Uuid, Session>, now: DateTime<Utc>) {
        entries.retain(|_, session| !session.is_stale(now));
    }

    /// Store `session` under a fresh identifier.
    pub fn open(&self, session: Session, now: DateTime<Utc>) -> Uuid {
        let id = Uuid::new_v4();
        let mut entries = self.lock();
        Self::sweep(&mut entries, now);
        entries.insert(id, session);
        id
    }

    /// Copy of the live session `id`, or `None` when unknown or stale.
    pub fn get(&self, id: Uuid, now: DateTime<Utc>) -> Option<Session> {
        let mut entries = self.lock();
        Self::sweep(&mut entries, now);
        entries.get(&id).cloned()
    }

    /// Store the advanced state of session `id`.
    ///
    /// Finished sessions are dropped instead of stored.
    pub fn save(&self, id: Uuid, session: Session, now: DateTime<Utc>) {
        let mut entries = self.lock();
        if session.is_stale(now) {
            entries.remove(&id);
        } else {
            entries.insert(id, session);
        }
    }

    /// Forget session `id`.
    pub fn close(&self, id: Uuid) {
        self.lock().remove(&id);
    }

    /// Number of live sessions at `now`.
    pub fn live_count(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.lock();
        Self::sweep(&mut entries, now);
        entries.len()
    }
}
