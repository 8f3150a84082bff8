//! Selection registry over the member selection worksheet.
//!
//! The registry keeps at most one row per member under normal operation.
//! Rows are located by scanning every column for the member identifier, so
//! column drift in the spreadsheet does not hide existing selections. When
//! the in-place write fails the submission is appended instead, which may
//! leave a stale duplicate behind; `find` always returns the first match.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::domain::audit;
use crate::domain::ports::{
    DeleteOutcome, MemberSelections, RowPosition, RowStoreError, SaveOutcome, Worksheet,
};
use crate::domain::records::{SheetRecord, format_store_timestamp, records_from_values};
use crate::domain::selection::{
    SelectionNote, SelectionSubmission, StoredSelection, next_update_count,
};
use crate::domain::MemberId;

/// Registry service implementing [`MemberSelections`].
///
/// Mutations hold a process-wide write lock from the read that locates a
/// row until the write that uses its position, so concurrent requests for
/// different members never act on stale positions.
#[derive(Clone)]
pub struct SelectionRegistry<W> {
    sheet: Arc<W>,
    clock: Arc<dyn Clock>,
    writes: Arc<Mutex<()>>,
}

struct Located {
    index: usize,
    record: SheetRecord,
}

impl Located {
    fn position(&self) -> RowPosition {
        RowPosition::from_data_index(self.index)
    }
}

impl<W> SelectionRegistry<W> {
    /// Create a registry over the selection worksheet.
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use mockable::DefaultClock;
    /// # use roster::domain::SelectionRegistry;
    /// # use roster::test_support::InMemoryWorksheet;
    /// let registry = SelectionRegistry::new(
    ///     Arc::new(InMemoryWorksheet::selections()),
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = registry;
    /// ```
    pub fn new(sheet: Arc<W>, clock: Arc<dyn Clock>) -> Self {
        Self {
            sheet,
            clock,
            writes: Arc::new(Mutex::new(())),
        }
    }
}

impl<W> SelectionRegistry<W>
where
    W: Worksheet,
{
    async fn locate(&self, member: &MemberId) -> Result<Option<Located>, RowStoreError> {
        let values = self.sheet.read_values().await?;
        Ok(records_from_values(&values)
            .into_iter()
            .enumerate()
            .find(|(_, record)| record.contains_value(member.as_ref()))
            .map(|(index, record)| Located { index, record }))
    }

    async fn write_in_place(
        &self,
        submission: &SelectionSubmission,
        timestamp: &str,
    ) -> Result<SaveOutcome, RowStoreError> {
        let located = self.locate(&submission.member.id).await?;
        match located {
            Some(found) => {
                let update_count = next_update_count(found.record.get("Update Count"));
                let cells = submission.to_cells(timestamp, update_count, SelectionNote::Updated);
                self.sheet.write_row(found.position(), cells).await?;
                info!(
                    member_id = %submission.member.id,
                    position = %found.position(),
                    update_count,
                    "selection updated"
                );
                audit::user_action(
                    &submission.member,
                    "SELECTION_UPDATED",
                    &format!(
                        "Character: {}, Class: {}, Update #{update_count}",
                        submission.character, submission.pick
                    ),
                );
                Ok(SaveOutcome::Updated { update_count })
            }
            None => {
                let cells = submission.to_cells(timestamp, 1, SelectionNote::Initial);
                self.sheet.append_rows(vec![cells]).await?;
                info!(member_id = %submission.member.id, "selection created");
                audit::user_action(
                    &submission.member,
                    "SELECTION_CREATED",
                    &format!(
                        "Character: {}, Class: {}",
                        submission.character, submission.pick
                    ),
                );
                Ok(SaveOutcome::Created)
            }
        }
    }

    async fn append_fallback(
        &self,
        submission: &SelectionSubmission,
        timestamp: &str,
    ) -> Result<(), RowStoreError> {
        let cells = submission.to_cells(timestamp, 1, SelectionNote::Fallback);
        self.sheet.append_rows(vec![cells]).await
    }
}

#[async_trait]
impl<W> MemberSelections for SelectionRegistry<W>
where
    W: Worksheet,
{
    async fn find(&self, member: &MemberId) -> Result<Option<StoredSelection>, RowStoreError> {
        let located = self.locate(member).await?;
        Ok(located.map(|found| StoredSelection::from_record(found.position(), &found.record)))
    }

    async fn upsert(&self, submission: &SelectionSubmission) -> SaveOutcome {
        let _writes = self.writes.lock().await;
        let timestamp = format_store_timestamp(self.clock.utc());
        let primary = match self.write_in_place(submission, &timestamp).await {
            Ok(outcome) => return outcome,
            Err(primary) => primary,
        };

        match self.append_fallback(submission, &timestamp).await {
            Ok(()) => {
                warn!(
                    member_id = %submission.member.id,
                    error = %primary,
                    "selection saved through fallback append"
                );
                audit::user_action(
                    &submission.member,
                    "SELECTION_SAVED_FALLBACK",
                    &format!(
                        "Character: {}, Class: {} - Fallback due to: {primary}",
                        submission.character, submission.pick
                    ),
                );
                SaveOutcome::Fallback
            }
            Err(fallback) => {
                error!(
                    member_id = %submission.member.id,
                    primary = %primary,
                    fallback = %fallback,
                    "selection could not be saved"
                );
                SaveOutcome::Failed
            }
        }
    }

    async fn delete(&self, member: &MemberId) -> DeleteOutcome {
        let _writes = self.writes.lock().await;
        let located = match self.locate(member).await {
            Ok(Some(found)) => found,
            Ok(None) => return DeleteOutcome::NotFound,
            Err(err) => {
                error!(member_id = %member, error = %err, "failed to locate selection for deletion");
                return DeleteOutcome::Failed;
            }
        };

        let position = located.position();
        if let Err(err) = self.sheet.delete_row(position).await {
            error!(member_id = %member, %position, error = %err, "failed to delete selection row");
            return DeleteOutcome::Failed;
        }
        info!(member_id = %member, %position, "selection deleted");
        DeleteOutcome::Deleted {
            position,
            selection: StoredSelection::from_record(position, &located.record),
        }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
