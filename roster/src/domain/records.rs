//! Header-keyed records derived from raw worksheet values.

use chrono::{DateTime, Utc};

/// Header of the member selection worksheet.
pub const SELECTION_HEADERS: [&str; 9] = [
    "Discord ID",
    "Username",
    "Display Name",
    "In-Game Name",
    "Class",
    "Specialization",
    "Last Updated",
    "Update Count",
    "Notes",
];

/// Header of the role summary worksheet.
pub const SUMMARY_HEADERS: [&str; 6] = [
    "Role",
    "Count",
    "Percentage",
    "Most Popular Class",
    "Most Popular Spec",
    "Last Updated",
];

/// Render a timestamp the way every worksheet stores it.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use roster::domain::format_store_timestamp;
///
/// let at = Utc.with_ymd_and_hms(2024, 3, 9, 18, 4, 5).unwrap();
/// assert_eq!(format_store_timestamp(at), "2024-03-09 18:04:05 UTC");
/// ```
pub fn format_store_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// One data row keyed by the header of its worksheet.
///
/// Cells are kept in column order so value scans see them left to right.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SheetRecord {
    cells: Vec<(String, String)>,
}

impl SheetRecord {
    /// Zip a header with a row, padding short rows with empty cells.
    pub fn from_row(header: &[String], row: &[String]) -> Self {
        let cells = header
            .iter()
            .enumerate()
            .map(|(index, column)| {
                let value = row.get(index).cloned().unwrap_or_default();
                (column.clone(), value)
            })
            .collect();
        Self { cells }
    }

    /// Value stored under `column`, if the header has that column.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Value under `column`, or `fallback` when the column is absent.
    pub fn get_or<'a>(&'a self, column: &str, fallback: &'a str) -> &'a str {
        self.get(column).unwrap_or(fallback)
    }

    /// Every cell value in column order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(_, value)| value.as_str())
    }

    /// Whether any cell equals `needle` exactly after trimming.
    pub fn contains_value(&self, needle: &str) -> bool {
        self.values().any(|value| value.trim() == needle)
    }
}

/// Split raw worksheet values into header-keyed records.
///
/// The first row is the header. Record `k` corresponds to store row `k + 2`.
/// An empty worksheet yields no records.
pub fn records_from_values(values: &[Vec<String>]) -> Vec<SheetRecord> {
    let Some((header, rows)) = values.split_first() else {
        return Vec::new();
    };
    rows.iter()
        .map(|row| SheetRecord::from_row(header, row))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|cell| (*cell).to_owned()).collect()
    }

    #[test]
    fn header_only_sheet_has_no_records() {
        let values = vec![row(&SELECTION_HEADERS)];
        assert!(records_from_values(&values).is_empty());
        assert!(records_from_values(&[]).is_empty());
    }

    #[test]
    fn short_rows_are_padded() {
        let values = vec![row(&["A", "B", "C"]), row(&["1"])];
        let records = records_from_values(&values);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("A"), Some("1"));
        assert_eq!(records[0].get("C"), Some(""));
        assert_eq!(records[0].get("D"), None);
    }

    #[test]
    fn value_scan_ignores_surrounding_whitespace() {
        let values = vec![row(&["A", "B"]), row(&["x", " 42 "])];
        let record = &records_from_values(&values)[0];
        assert!(record.contains_value("42"));
        assert!(!record.contains_value("4"));
    }
}
