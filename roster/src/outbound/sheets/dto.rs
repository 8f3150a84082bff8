//! DTOs for the Sheets v4 and Drive v3 JSON payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, Deserialize)]
pub(super) struct ValueRangeDto {
    #[serde(default)]
    pub(super) values: Vec<Vec<Value>>,
}

impl ValueRangeDto {
    /// Flatten every cell to text; numbers and booleans keep their JSON form.
    pub(super) fn into_rows(self) -> Vec<Vec<String>> {
        self.values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect()
    }
}

fn cell_text(cell: Value) -> String {
    match cell {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ValueRangeBody<'a> {
    pub(super) range: &'a str,
    pub(super) major_dimension: &'static str,
    pub(super) values: &'a [Vec<String>],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SpreadsheetDto {
    pub(super) spreadsheet_id: String,
    #[serde(default)]
    pub(super) sheets: Vec<SheetDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SheetDto {
    pub(super) properties: SheetPropertiesDto,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SheetPropertiesDto {
    pub(super) sheet_id: i64,
    pub(super) title: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct BatchUpdateReplyDto {
    #[serde(default)]
    pub(super) replies: Vec<Value>,
}

impl BatchUpdateReplyDto {
    /// Properties of the first `addSheet` reply, if any.
    pub(super) fn added_sheet(self) -> Option<SheetPropertiesDto> {
        self.replies.into_iter().find_map(|reply| {
            reply
                .get("addSheet")
                .and_then(|added| added.get("properties"))
                .cloned()
                .and_then(|properties| serde_json::from_value(properties).ok())
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct FileListDto {
    #[serde(default)]
    pub(super) files: Vec<FileDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct FileDto {
    pub(super) id: String,
}

/// Layout of a worksheet created by the bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorksheetLayout {
    /// Worksheet title.
    pub title: &'static str,
    /// Initial grid rows.
    pub rows: u32,
    /// Initial grid columns.
    pub columns: u32,
}

impl WorksheetLayout {
    pub(super) fn sheet_properties(self) -> Value {
        json!({
            "title": self.title,
            "gridProperties": {
                "rowCount": self.rows,
                "columnCount": self.columns,
            },
        })
    }
}

pub(super) fn add_sheet_request(layout: WorksheetLayout) -> Value {
    json!({ "addSheet": { "properties": layout.sheet_properties() } })
}

pub(super) fn delete_row_request(sheet_id: i64, zero_based_row: u32) -> Value {
    json!({
        "deleteDimension": {
            "range": {
                "sheetId": sheet_id,
                "dimension": "ROWS",
                "startIndex": zero_based_row,
                "endIndex": zero_based_row + 1,
            }
        }
    })
}

pub(super) fn hide_column_request(sheet_id: i64, one_based_column: u32) -> Value {
    json!({
        "updateDimensionProperties": {
            "range": {
                "sheetId": sheet_id,
                "dimension": "COLUMNS",
                "startIndex": one_based_column.saturating_sub(1),
                "endIndex": one_based_column,
            },
            "properties": { "hiddenByUser": true },
            "fields": "hiddenByUser",
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_flatten_to_text() {
        let dto: ValueRangeDto = serde_json::from_value(json!({
            "range": "'Class Management'!A1:I2",
            "values": [["Discord ID", "Update Count"], ["123", 4]]
        }))
        .expect("value range decodes");

        assert_eq!(
            dto.into_rows(),
            vec![
                vec!["Discord ID".to_owned(), "Update Count".to_owned()],
                vec!["123".to_owned(), "4".to_owned()],
            ]
        );
    }

    #[test]
    fn empty_range_has_no_rows() {
        let dto: ValueRangeDto =
            serde_json::from_value(json!({ "range": "Sheet1!A1:Z1000" })).expect("decodes");

        assert!(dto.into_rows().is_empty());
    }

    #[test]
    fn hide_requests_are_zero_based_half_open() {
        let request = hide_column_request(7, 8);

        assert_eq!(
            request["updateDimensionProperties"]["range"],
            json!({ "sheetId": 7, "dimension": "COLUMNS", "startIndex": 7, "endIndex": 8 })
        );
    }

    #[test]
    fn added_sheet_is_read_from_replies() {
        let reply: BatchUpdateReplyDto = serde_json::from_value(json!({
            "replies": [{ "addSheet": { "properties": { "sheetId": 42, "title": "Role Summary" } } }]
        }))
        .expect("decodes");

        let added = reply.added_sheet().expect("sheet added");
        assert_eq!(added.sheet_id, 42);
        assert_eq!(added.title, "Role Summary");
    }
}
