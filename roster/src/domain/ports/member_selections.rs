//! Driving port for reading and mutating one member's selection row.

use async_trait::async_trait;

use super::{RowPosition, RowStoreError};
use crate::domain::{MemberId, SelectionSubmission, StoredSelection};

/// Result of an upsert. Faults never escape; they are folded in here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A new row was written with an update count of one.
    Created,
    /// The existing row was overwritten in place.
    Updated {
        /// Counter value after the write.
        update_count: u32,
    },
    /// The in-place path failed and the row was appended blindly.
    Fallback,
    /// Both the in-place and fallback writes failed.
    Failed,
}

impl SaveOutcome {
    /// Whether the submission reached the row-store.
    pub fn is_saved(&self) -> bool {
        !matches!(self, Self::Failed)
    }
}

/// Result of removing a member's row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The first matching row was removed.
    Deleted {
        /// Position the row occupied before removal.
        position: RowPosition,
        /// Row contents before removal.
        selection: StoredSelection,
    },
    /// No row matched the identity; the store is unchanged.
    NotFound,
    /// The row-store failed while locating or removing the row.
    Failed,
}

/// Port exposing the selection registry operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MemberSelections: Send + Sync {
    /// Locate the first row mentioning `member` in any column.
    async fn find(&self, member: &MemberId) -> Result<Option<StoredSelection>, RowStoreError>;

    /// Create or overwrite the member's row.
    async fn upsert(&self, submission: &SelectionSubmission) -> SaveOutcome;

    /// Remove the member's first matching row.
    async fn delete(&self, member: &MemberId) -> DeleteOutcome;
}
