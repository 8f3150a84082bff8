//! Open-or-create bootstrap for the roster spreadsheet.
//!
//! The spreadsheet is opened by id when one is configured, otherwise looked
//! up by title through Drive and created when absent. Missing worksheets
//! are added with their header row. Hiding columns in the selection
//! worksheet is best effort.

use std::sync::Arc;

use tracing::{info, warn};

use super::client::SheetsClient;
use super::dto::{SheetPropertiesDto, WorksheetLayout, add_sheet_request, hide_column_request};
use super::worksheet::SheetsWorksheet;
use crate::domain::ports::{RowPosition, RowStoreError, Worksheet};
use crate::domain::{SELECTION_HEADERS, SUMMARY_HEADERS};

/// Selection worksheet layout.
pub const SELECTION_LAYOUT: WorksheetLayout = WorksheetLayout {
    title: "Class Management",
    rows: 1000,
    columns: 10,
};

/// Role summary worksheet layout.
pub const SUMMARY_LAYOUT: WorksheetLayout = WorksheetLayout {
    title: "Role Summary",
    rows: 100,
    columns: 6,
};

/// How to find the spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadsheetLocator {
    /// Explicit spreadsheet id; skips the Drive lookup.
    pub spreadsheet_id: Option<String>,
    /// Title used for lookup and creation.
    pub spreadsheet_name: String,
    /// 1-based columns hidden in the selection worksheet.
    pub hidden_columns: Vec<u32>,
}

/// Worksheets backing the roster.
#[derive(Clone)]
pub struct RosterSheets {
    /// Member selection rows.
    pub selections: SheetsWorksheet,
    /// Role summary rows.
    pub summary: SheetsWorksheet,
}

/// Open or create the spreadsheet and both worksheets.
///
/// # Errors
///
/// Returns [`RowStoreError`] when the spreadsheet cannot be found, created
/// or inspected, or a missing worksheet cannot be added.
pub async fn open_roster_sheets(
    client: Arc<SheetsClient>,
    locator: &SpreadsheetLocator,
) -> Result<RosterSheets, RowStoreError> {
    let spreadsheet_id = resolve_spreadsheet(&client, locator).await?;
    let existing: Vec<SheetPropertiesDto> = client
        .spreadsheet(&spreadsheet_id)
        .await?
        .sheets
        .into_iter()
        .map(|sheet| sheet.properties)
        .collect();

    let selections = ensure_worksheet(
        &client,
        &spreadsheet_id,
        &existing,
        SELECTION_LAYOUT,
        &SELECTION_HEADERS,
    )
    .await?;
    hide_columns(&client, &selections, &locator.hidden_columns).await;

    let summary = ensure_worksheet(
        &client,
        &spreadsheet_id,
        &existing,
        SUMMARY_LAYOUT,
        &SUMMARY_HEADERS,
    )
    .await?;

    Ok(RosterSheets {
        selections,
        summary,
    })
}

async fn resolve_spreadsheet(
    client: &SheetsClient,
    locator: &SpreadsheetLocator,
) -> Result<String, RowStoreError> {
    if let Some(id) = &locator.spreadsheet_id {
        return Ok(id.clone());
    }
    if let Some(id) = client.find_spreadsheet(&locator.spreadsheet_name).await? {
        info!(spreadsheet = %locator.spreadsheet_name, "opened existing spreadsheet");
        return Ok(id);
    }

    let created = client
        .create_spreadsheet(&locator.spreadsheet_name, &[SELECTION_LAYOUT, SUMMARY_LAYOUT])
        .await?;
    info!(
        spreadsheet = %locator.spreadsheet_name,
        spreadsheet_id = %created.spreadsheet_id,
        "created new spreadsheet"
    );
    Ok(created.spreadsheet_id)
}

async fn ensure_worksheet(
    client: &Arc<SheetsClient>,
    spreadsheet_id: &str,
    existing: &[SheetPropertiesDto],
    layout: WorksheetLayout,
    headers: &[&str],
) -> Result<SheetsWorksheet, RowStoreError> {
    let found = existing
        .iter()
        .find(|properties| properties.title == layout.title)
        .map(|properties| properties.sheet_id);

    let sheet_id = match found {
        Some(sheet_id) => sheet_id,
        None => {
            let reply = client
                .batch_update(spreadsheet_id, vec![add_sheet_request(layout)])
                .await?;
            let added = reply.added_sheet().ok_or_else(|| {
                RowStoreError::decode(format!("addSheet reply for {} had no properties", layout.title))
            })?;
            info!(worksheet = layout.title, "created worksheet");
            added.sheet_id
        }
    };

    let worksheet = SheetsWorksheet::new(Arc::clone(client), spreadsheet_id, layout.title, sheet_id);
    if needs_header(&worksheet).await? {
        let header = headers.iter().map(|cell| (*cell).to_owned()).collect();
        worksheet.write_row(RowPosition::HEADER, header).await?;
        info!(worksheet = layout.title, "wrote worksheet header");
    }
    Ok(worksheet)
}

async fn needs_header(worksheet: &SheetsWorksheet) -> Result<bool, RowStoreError> {
    let values = worksheet.read_values().await?;
    Ok(values
        .first()
        .is_none_or(|row| row.iter().all(|cell| cell.trim().is_empty())))
}

async fn hide_columns(client: &SheetsClient, worksheet: &SheetsWorksheet, columns: &[u32]) {
    let requests: Vec<_> = columns
        .iter()
        .filter(|column| **column > 0)
        .map(|column| hide_column_request(worksheet.sheet_id(), *column))
        .collect();
    if requests.is_empty() {
        return;
    }
    match client.batch_update(worksheet.spreadsheet_id(), requests).await {
        Ok(_) => info!(?columns, "hid selection worksheet columns"),
        Err(error) => warn!(%error, "failed to hide selection worksheet columns"),
    }
}
