//! Driving port for the derived role summary.

use async_trait::async_trait;

use super::RowStoreError;
use crate::domain::{RoleSummarySnapshot, RoleSummaryTable};

/// Port exposing summary recomputation and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleStatistics: Send + Sync {
    /// Recompute the summary from every selection row and replace the
    /// stored summary with it.
    async fn refresh(&self) -> Result<RoleSummaryTable, RowStoreError>;

    /// Read the stored summary as last written.
    async fn snapshot(&self) -> Result<RoleSummarySnapshot, RowStoreError>;
}
