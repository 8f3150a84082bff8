//! Test doubles shared by unit tests (in `src/`) and integration tests
//! (in `tests/`).
//!
//! Compiled for `cfg(test)` and behind the `test-support` feature.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;
use serde_json::Value;
use tokio::sync::Notify;

use crate::domain::ports::{
    ChatRestError, InteractionFollowup, RowPosition, RowStoreError, Worksheet,
};
use crate::domain::{SELECTION_HEADERS, SUMMARY_HEADERS};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Clock that tests move forward explicitly.
#[derive(Debug)]
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Start the clock at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Move the clock forward by `seconds`.
    pub fn advance_seconds(&self, seconds: i64) {
        *lock(&self.0) += TimeDelta::seconds(seconds);
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *lock(&self.0)
    }
}

fn header(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|cell| (*cell).to_owned()).collect()
}

/// Worksheet held in memory, with an optional injected failure.
///
/// A yielding worksheet hands control back to the executor after every read
/// and clear, the points where a remote call would suspend, so requests
/// joined on one task interleave there.
#[derive(Debug, Default)]
pub struct InMemoryWorksheet {
    rows: Mutex<Vec<Vec<String>>>,
    failure: Mutex<Option<RowStoreError>>,
    yielding: AtomicBool,
}

impl InMemoryWorksheet {
    /// Worksheet seeded with `rows`, header included.
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self {
            rows: Mutex::new(rows),
            failure: Mutex::new(None),
            yielding: AtomicBool::new(false),
        }
    }

    /// Yield to the executor after each read and clear.
    #[must_use]
    pub fn yielding(self) -> Self {
        self.yielding.store(true, Ordering::Relaxed);
        self
    }

    async fn suspend(&self) {
        if self.yielding.load(Ordering::Relaxed) {
            tokio::task::yield_now().await;
        }
    }

    /// Empty selection worksheet carrying only its header.
    pub fn selections() -> Self {
        Self::new(vec![header(&SELECTION_HEADERS)])
    }

    /// Empty summary worksheet carrying only its header.
    pub fn summary() -> Self {
        Self::new(vec![header(&SUMMARY_HEADERS)])
    }

    /// Current contents.
    pub fn rows(&self) -> Vec<Vec<String>> {
        lock(&self.rows).clone()
    }

    /// Make every subsequent call fail with `error`, or succeed again with
    /// `None`.
    pub fn fail_with(&self, error: Option<RowStoreError>) {
        *lock(&self.failure) = error;
    }

    fn check(&self) -> Result<(), RowStoreError> {
        lock(&self.failure).clone().map_or(Ok(()), Err)
    }

    fn index(position: RowPosition) -> usize {
        usize::try_from(position.get().saturating_sub(1)).unwrap_or(usize::MAX)
    }
}

#[async_trait]
impl Worksheet for InMemoryWorksheet {
    async fn read_values(&self) -> Result<Vec<Vec<String>>, RowStoreError> {
        self.check()?;
        let rows = self.rows();
        self.suspend().await;
        Ok(rows)
    }

    async fn write_row(
        &self,
        position: RowPosition,
        cells: Vec<String>,
    ) -> Result<(), RowStoreError> {
        self.check()?;
        let index = Self::index(position);
        let mut rows = lock(&self.rows);
        if rows.len() <= index {
            rows.resize_with(index + 1, Vec::new);
        }
        rows[index] = cells;
        Ok(())
    }

    async fn append_rows(&self, rows: Vec<Vec<String>>) -> Result<(), RowStoreError> {
        self.check()?;
        lock(&self.rows).extend(rows);
        Ok(())
    }

    async fn delete_row(&self, position: RowPosition) -> Result<(), RowStoreError> {
        self.check()?;
        let index = Self::index(position);
        let mut rows = lock(&self.rows);
        if index >= rows.len() {
            return Err(RowStoreError::invalid_request(format!(
                "row {position} is out of range"
            )));
        }
        rows.remove(index);
        Ok(())
    }

    async fn clear(&self) -> Result<(), RowStoreError> {
        self.check()?;
        lock(&self.rows).clear();
        self.suspend().await;
        Ok(())
    }
}

/// Follow-up double recording every edited message.
#[derive(Debug, Default)]
pub struct RecordingFollowup {
    edits: Mutex<Vec<(String, Value)>>,
    notify: Notify,
}

impl RecordingFollowup {
    /// Edits recorded so far as `(token, message)` pairs.
    pub fn edits(&self) -> Vec<(String, Value)> {
        lock(&self.edits).clone()
    }

    /// Wait until at least `count` edits arrived or `limit` elapsed, then
    /// return what was recorded.
    pub async fn wait_for(&self, count: usize, limit: Duration) -> Vec<(String, Value)> {
        let deadline = tokio::time::Instant::now() + limit;
        loop {
            let notified = self.notify.notified();
            let edits = self.edits();
            if edits.len() >= count {
                return edits;
            }
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return self.edits();
            }
        }
    }
}

#[async_trait]
impl InteractionFollowup for RecordingFollowup {
    async fn edit_original(&self, token: &str, message: Value) -> Result<(), ChatRestError> {
        lock(&self.edits).push((token.to_owned(), message));
        self.notify.notify_waiters();
        Ok(())
    }
}
