//! Google Sheets row-store adapters.
//!
//! This module provides the reqwest client for the Sheets v4 and Drive v3
//! APIs, the `Worksheet` port implementation, token sources and the
//! startup bootstrap that opens or creates the roster spreadsheet.

mod bootstrap;
mod client;
mod dto;
mod token;
mod worksheet;

pub use bootstrap::{
    RosterSheets, SELECTION_LAYOUT, SUMMARY_LAYOUT, SpreadsheetLocator, open_roster_sheets,
};
pub(crate) use client::body_preview;
pub use client::{DRIVE_FILES_URL, SHEETS_BASE_URL, SheetsClient, SheetsEndpoints};
pub use dto::WorksheetLayout;
pub use token::{METADATA_TOKEN_URL, MetadataTokenSource, StaticTokenFile, TokenSource};
pub use worksheet::SheetsWorksheet;
