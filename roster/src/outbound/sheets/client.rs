//! Reqwest-backed client for the Sheets v4 and Drive v3 REST APIs.
//!
//! This client owns transport details only: URL construction, bearer
//! authentication, HTTP error mapping and JSON decoding.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::dto::{
    BatchUpdateReplyDto, FileListDto, SpreadsheetDto, ValueRangeBody, ValueRangeDto,
    WorksheetLayout,
};
use super::token::TokenSource;
use crate::domain::ports::RowStoreError;

/// Default Sheets v4 base URL.
pub const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";
/// Default Drive v3 files URL.
pub const DRIVE_FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";

const SPREADSHEET_MIME_TYPE: &str = "application/vnd.google-apps.spreadsheet";
/// Query for `values:append`: raw cells written over empty rows.
const APPEND_QUERY: [(&str, &str); 2] = [
    ("valueInputOption", "RAW"),
    ("insertDataOption", "OVERWRITE"),
];

/// Endpoints used by [`SheetsClient`].
#[derive(Debug, Clone)]
pub struct SheetsEndpoints {
    /// Sheets v4 `spreadsheets` collection.
    pub sheets: Url,
    /// Drive v3 `files` collection.
    pub drive_files: Url,
}

impl SheetsEndpoints {
    /// Public Google endpoints.
    ///
    /// # Errors
    ///
    /// Returns an error if the built-in URLs fail to parse.
    pub fn google() -> Result<Self, url::ParseError> {
        Ok(Self {
            sheets: Url::parse(SHEETS_BASE_URL)?,
            drive_files: Url::parse(DRIVE_FILES_URL)?,
        })
    }
}

/// Authenticated spreadsheet API client.
pub struct SheetsClient {
    http: Client,
    endpoints: SheetsEndpoints,
    tokens: Arc<dyn TokenSource>,
}

impl SheetsClient {
    /// Build a client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoints: SheetsEndpoints,
        tokens: Arc<dyn TokenSource>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoints,
            tokens,
        })
    }

    fn url(base: &Url, segments: &[&str]) -> Result<Url, RowStoreError> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|()| RowStoreError::invalid_request(format!("{base} cannot be a base URL")))?
            .extend(segments);
        Ok(url)
    }

    fn values_url(&self, spreadsheet_id: &str, range: &str) -> Result<Url, RowStoreError> {
        Self::url(&self.endpoints.sheets, &[spreadsheet_id, "values", range])
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, RowStoreError> {
        let token = self.tokens.access_token().await?;
        let response = request
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        if body.is_empty() {
            return serde_json::from_value(Value::Object(serde_json::Map::new()))
                .map_err(|error| RowStoreError::decode(format!("empty response: {error}")));
        }
        serde_json::from_slice(body.as_ref())
            .map_err(|error| RowStoreError::decode(format!("invalid JSON payload: {error}")))
    }

    /// Read every populated cell of `range` as text.
    pub async fn get_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<Vec<Vec<String>>, RowStoreError> {
        let url = self.values_url(spreadsheet_id, range)?;
        let dto: ValueRangeDto = self
            .send(
                self.http
                    .get(url)
                    .query(&[("majorDimension", "ROWS")]),
            )
            .await?;
        Ok(dto.into_rows())
    }

    /// Overwrite `range` with `rows`, stored verbatim.
    pub async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: &[Vec<String>],
    ) -> Result<(), RowStoreError> {
        let url = self.values_url(spreadsheet_id, range)?;
        let body = ValueRangeBody {
            range,
            major_dimension: "ROWS",
            values: rows,
        };
        let _: Value = self
            .send(
                self.http
                    .put(url)
                    .query(&[("valueInputOption", "RAW")])
                    .json(&body),
            )
            .await?;
        Ok(())
    }

    /// Write `rows` below the table found in `range`.
    ///
    /// Rows land in existing empty cells instead of inserting new grid rows,
    /// so a cleared sheet that is rewritten repeatedly keeps its size.
    pub async fn append_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: &[Vec<String>],
    ) -> Result<(), RowStoreError> {
        let url = self.values_url(spreadsheet_id, &format!("{range}:append"))?;
        let body = ValueRangeBody {
            range,
            major_dimension: "ROWS",
            values: rows,
        };
        let _: Value = self
            .send(
                self.http
                    .post(url)
                    .query(&APPEND_QUERY)
                    .json(&body),
            )
            .await?;
        Ok(())
    }

    /// Clear every value in `range`, keeping formatting.
    pub async fn clear_values(&self, spreadsheet_id: &str, range: &str) -> Result<(), RowStoreError> {
        let url = self.values_url(spreadsheet_id, &format!("{range}:clear"))?;
        let _: Value = self.send(self.http.post(url).json(&json!({}))).await?;
        Ok(())
    }

    /// Apply structural `requests` in one batch.
    pub(super) async fn batch_update(
        &self,
        spreadsheet_id: &str,
        requests: Vec<Value>,
    ) -> Result<BatchUpdateReplyDto, RowStoreError> {
        let url = Self::url(
            &self.endpoints.sheets,
            &[&format!("{spreadsheet_id}:batchUpdate")],
        )?;
        self.send(
            self.http
                .request(Method::POST, url)
                .json(&json!({ "requests": requests })),
        )
        .await
    }

    /// Fetch spreadsheet metadata including worksheet properties.
    pub(super) async fn spreadsheet(
        &self,
        spreadsheet_id: &str,
    ) -> Result<SpreadsheetDto, RowStoreError> {
        let url = Self::url(&self.endpoints.sheets, &[spreadsheet_id])?;
        self.send(
            self.http
                .get(url)
                .query(&[("fields", "spreadsheetId,sheets.properties(sheetId,title)")]),
        )
        .await
    }

    /// Create a spreadsheet titled `title` with the given worksheets.
    pub(super) async fn create_spreadsheet(
        &self,
        title: &str,
        worksheets: &[WorksheetLayout],
    ) -> Result<SpreadsheetDto, RowStoreError> {
        let sheets: Vec<Value> = worksheets
            .iter()
            .map(|layout| json!({ "properties": layout.sheet_properties() }))
            .collect();
        let body = json!({
            "properties": { "title": title },
            "sheets": sheets,
        });
        self.send(self.http.post(self.endpoints.sheets.clone()).json(&body))
            .await
    }

    /// Identifier of the first non-trashed spreadsheet named `title`.
    pub(super) async fn find_spreadsheet(
        &self,
        title: &str,
    ) -> Result<Option<String>, RowStoreError> {
        let query = format!(
            "name = '{}' and mimeType = '{SPREADSHEET_MIME_TYPE}' and trashed = false",
            escape_query_literal(title)
        );
        let files: FileListDto = self
            .send(
                self.http
                    .get(self.endpoints.drive_files.clone())
                    .query(&[("q", query.as_str()), ("fields", "files(id)"), ("pageSize", "1")]),
            )
            .await?;
        Ok(files.files.into_iter().next().map(|file| file.id))
    }
}

/// Quote `title` as an A1 sheet reference.
pub(super) fn quote_sheet_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

fn escape_query_literal(raw: &str) -> String {
    raw.replace('\\', r"\\").replace('\'', r"\'")
}

pub(crate) fn map_transport_error(error: reqwest::Error) -> RowStoreError {
    if error.is_timeout() {
        RowStoreError::timeout(error.to_string())
    } else {
        RowStoreError::transport(error.to_string())
    }
}

pub(crate) fn map_status_error(status: StatusCode, body: &[u8]) -> RowStoreError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RowStoreError::unauthorized(message),
        StatusCode::NOT_FOUND => RowStoreError::not_found(message),
        StatusCode::TOO_MANY_REQUESTS => RowStoreError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            RowStoreError::timeout(message)
        }
        _ if status.is_client_error() => RowStoreError::invalid_request(message),
        _ => RowStoreError::transport(message),
    }
}

pub(crate) fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
