//! Driven port over one worksheet of the spreadsheet row-store.
//!
//! The store is 1-indexed with the header in row 1. Adapters move whole rows
//! of text cells; header-keyed records are derived in the domain.

use std::fmt;

use async_trait::async_trait;

use super::define_port_error;

/// 1-based row position inside a worksheet.
///
/// # Examples
/// ```
/// use roster::domain::ports::RowPosition;
///
/// assert_eq!(RowPosition::HEADER.get(), 1);
/// assert_eq!(RowPosition::from_data_index(0).get(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowPosition(u32);

impl RowPosition {
    /// Position of the header row.
    pub const HEADER: Self = Self(1);

    /// Position of the `index`-th data row (0-based), skipping the header.
    pub fn from_data_index(index: usize) -> Self {
        Self::after_rows(index.saturating_add(1))
    }

    /// Position immediately after `occupied` rows, header included.
    pub fn after_rows(occupied: usize) -> Self {
        let next = u32::try_from(occupied).unwrap_or(u32::MAX - 1);
        Self(next.saturating_add(1))
    }

    /// Raw 1-based value.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for RowPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

define_port_error! {
    /// Errors surfaced by row-store adapters.
    pub enum RowStoreError {
        /// Network transport failed before a response arrived.
        Transport { message: String } retryable =>
            "row-store transport failed: {message}",
        /// The call exceeded its deadline.
        Timeout { message: String } retryable =>
            "row-store timeout: {message}",
        /// The remote service throttled the request.
        RateLimited { message: String } retryable =>
            "row-store rate limited request: {message}",
        /// Credentials were missing, expired or rejected.
        Unauthorized { message: String } =>
            "row-store rejected credentials: {message}",
        /// The spreadsheet or worksheet does not exist.
        NotFound { message: String } =>
            "row-store target not found: {message}",
        /// The response body could not be decoded.
        Decode { message: String } =>
            "row-store response decode failed: {message}",
        /// The adapter or remote service rejected the request shape.
        InvalidRequest { message: String } =>
            "row-store request invalid: {message}",
    }
}

/// Row-level access to a single worksheet.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Worksheet: Send + Sync {
    /// Read every populated row, header included, as text cells.
    ///
    /// Trailing empty cells may be omitted by the adapter.
    async fn read_values(&self) -> Result<Vec<Vec<String>>, RowStoreError>;

    /// Overwrite the row at `position`, starting from the first column.
    async fn write_row(&self, position: RowPosition, cells: Vec<String>)
    -> Result<(), RowStoreError>;

    /// Append rows after the last populated row.
    async fn append_rows(&self, rows: Vec<Vec<String>>) -> Result<(), RowStoreError>;

    /// Remove the row at `position`, shifting later rows up.
    async fn delete_row(&self, position: RowPosition) -> Result<(), RowStoreError>;

    /// Remove every value, header included.
    async fn clear(&self) -> Result<(), RowStoreError>;
}
