//! [`Worksheet`] adapter over one worksheet of a Google spreadsheet.

use std::sync::Arc;

use async_trait::async_trait;

use super::client::{SheetsClient, quote_sheet_title};
use super::dto::delete_row_request;
use crate::domain::ports::{RowPosition, RowStoreError, Worksheet};

/// One worksheet addressed by spreadsheet id, title and numeric sheet id.
#[derive(Clone)]
pub struct SheetsWorksheet {
    client: Arc<SheetsClient>,
    spreadsheet_id: String,
    title: String,
    sheet_id: i64,
}

impl SheetsWorksheet {
    /// Address an existing worksheet.
    pub fn new(
        client: Arc<SheetsClient>,
        spreadsheet_id: impl Into<String>,
        title: impl Into<String>,
        sheet_id: i64,
    ) -> Self {
        Self {
            client,
            spreadsheet_id: spreadsheet_id.into(),
            title: title.into(),
            sheet_id,
        }
    }

    /// Spreadsheet identifier.
    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// Numeric worksheet identifier used by structural requests.
    pub fn sheet_id(&self) -> i64 {
        self.sheet_id
    }

    /// Worksheet title.
    pub fn title(&self) -> &str {
        &self.title
    }

    fn whole_sheet(&self) -> String {
        quote_sheet_title(&self.title)
    }

    fn row_range(&self, position: RowPosition) -> String {
        format!("{}!A{position}", quote_sheet_title(&self.title))
    }
}

#[async_trait]
impl Worksheet for SheetsWorksheet {
    async fn read_values(&self) -> Result<Vec<Vec<String>>, RowStoreError> {
        self.client
            .get_values(&self.spreadsheet_id, &self.whole_sheet())
            .await
    }

    async fn write_row(
        &self,
        position: RowPosition,
        cells: Vec<String>,
    ) -> Result<(), RowStoreError> {
        self.client
            .update_values(&self.spreadsheet_id, &self.row_range(position), &[cells])
            .await
    }

    async fn append_rows(&self, rows: Vec<Vec<String>>) -> Result<(), RowStoreError> {
        if rows.is_empty() {
            return Ok(());
        }
        self.client
            .append_values(&self.spreadsheet_id, &self.row_range(RowPosition::HEADER), &rows)
            .await
    }

    async fn delete_row(&self, position: RowPosition) -> Result<(), RowStoreError> {
        if position == RowPosition::HEADER {
            return Err(RowStoreError::invalid_request("the header row cannot be deleted"));
        }
        let request = delete_row_request(self.sheet_id, position.get() - 1);
        self.client
            .batch_update(&self.spreadsheet_id, vec![request])
            .await
            .map(drop)
    }

    async fn clear(&self) -> Result<(), RowStoreError> {
        self.client
            .clear_values(&self.spreadsheet_id, &self.whole_sheet())
            .await
    }
}
