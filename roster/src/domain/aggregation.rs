//! Role distribution summary derived from the selection worksheet.
//!
//! The summary is rebuilt from scratch on every run: counts per role, the
//! share of all classified rows, and the most popular class and
//! class/specialisation label within each role. Class and specialisation
//! are found by value rather than by column so that drifted rows still
//! count.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tokio::sync::Mutex;
use tracing::info;

use crate::domain::ports::{RoleStatistics, RowStoreError, Worksheet};
use crate::domain::records::{
    SUMMARY_HEADERS, SheetRecord, format_store_timestamp, records_from_values,
};
use crate::domain::role::{Role, classify};
use crate::domain::vocabulary::{GameClass, Specialization};

/// Marker written in the role column of the closing total row.
pub const TOTAL_MARKER: &str = "TOTAL";

const NO_ENTRIES: &str = "None";

/// Insertion-ordered tally of labels.
///
/// Ties in [`PopularityCounter::most_popular`] go to the label counted
/// first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopularityCounter {
    entries: Vec<(String, u32)>,
}

impl PopularityCounter {
    /// Count one more occurrence of `label`.
    pub fn increment(&mut self, label: &str) {
        match self.entries.iter_mut().find(|(name, _)| name == label) {
            Some((_, count)) => *count = count.saturating_add(1),
            None => self.entries.push((label.to_owned(), 1)),
        }
    }

    /// Label with the highest count, earliest first on ties.
    ///
    /// # Examples
    /// ```
    /// use roster::domain::PopularityCounter;
    ///
    /// let mut counter = PopularityCounter::default();
    /// for label in ["Mage", "Priest", "Priest", "Mage"] {
    ///     counter.increment(label);
    /// }
    /// assert_eq!(counter.most_popular(), Some("Mage"));
    /// ```
    pub fn most_popular(&self) -> Option<&str> {
        let mut best: Option<&(String, u32)> = None;
        for entry in &self.entries {
            if best.is_none_or(|(_, top)| entry.1 > *top) {
                best = Some(entry);
            }
        }
        best.map(|(label, _)| label.as_str())
    }
}

/// One rendered role line of the summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSummaryRow {
    /// Named role.
    pub role: Role,
    /// Rows classified into the role.
    pub count: u32,
    /// Share of all rows, such as `33.3%`.
    pub percentage: String,
    /// Most popular class label, or `None`.
    pub most_popular_class: String,
    /// Most popular `Class Spec` label, or `None`.
    pub most_popular_spec: String,
}

/// A complete summary ready to replace the stored one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSummaryTable {
    /// One row per named role in presentation order.
    pub rows: Vec<RoleSummaryRow>,
    /// Number of classified rows, unknown role included.
    pub total: u32,
    /// Timestamp stamped on every row.
    pub generated_at: String,
}

impl RoleSummaryTable {
    /// Cells for the summary worksheet, header first and total last.
    pub fn to_cells(&self) -> Vec<Vec<String>> {
        let header = SUMMARY_HEADERS.iter().map(|cell| (*cell).to_owned()).collect();
        let roles = self.rows.iter().map(|row| {
            vec![
                row.role.label().to_owned(),
                row.count.to_string(),
                row.percentage.clone(),
                row.most_popular_class.clone(),
                row.most_popular_spec.clone(),
                self.generated_at.clone(),
            ]
        });
        let total = vec![
            TOTAL_MARKER.to_owned(),
            self.total.to_string(),
            if self.total > 0 { "100%" } else { "0%" }.to_owned(),
            String::new(),
            String::new(),
            self.generated_at.clone(),
        ];
        std::iter::once(header)
            .chain(roles)
            .chain(std::iter::once(total))
            .collect()
    }
}

fn percentage(count: u32, total: u32) -> String {
    if total == 0 {
        return "0%".to_owned();
    }
    format!("{:.1}%", f64::from(count) / f64::from(total) * 100.0)
}

fn scan_pick(record: &SheetRecord) -> Option<(GameClass, Specialization)> {
    let mut class: Option<GameClass> = None;
    let mut spec: Option<Specialization> = None;
    for value in record.values() {
        if let Ok(found) = value.parse::<GameClass>() {
            class = Some(found);
        } else if let Some(found) =
            class.and_then(|current| current.specialization_named(value).ok())
        {
            spec = Some(found);
        }
    }
    class.zip(spec)
}

#[derive(Default)]
struct RoleTally {
    count: u32,
    classes: PopularityCounter,
    specs: PopularityCounter,
}

/// Recompute the role summary from selection records.
///
/// Records without a recognisable class and specialisation are skipped.
/// Running twice over the same records yields identical rows apart from
/// `generated_at`.
pub fn recompute(records: &[SheetRecord], generated_at: &str) -> RoleSummaryTable {
    let mut tallies: Vec<(Role, RoleTally)> = Role::NAMED
        .into_iter()
        .chain([Role::Unknown])
        .map(|role| (role, RoleTally::default()))
        .collect();

    for (class, spec) in records.iter().filter_map(scan_pick) {
        let role = classify(class, spec);
        if let Some((_, tally)) = tallies.iter_mut().find(|(candidate, _)| *candidate == role) {
            tally.count = tally.count.saturating_add(1);
            tally.classes.increment(class.label());
            tally.specs.increment(&format!("{class} {spec}"));
        }
    }

    let total = tallies
        .iter()
        .fold(0_u32, |sum, (_, tally)| sum.saturating_add(tally.count));
    let rows = tallies
        .into_iter()
        .filter(|(role, _)| *role != Role::Unknown)
        .map(|(role, tally)| RoleSummaryRow {
            role,
            count: tally.count,
            percentage: percentage(tally.count, total),
            most_popular_class: tally.classes.most_popular().unwrap_or(NO_ENTRIES).to_owned(),
            most_popular_spec: tally.specs.most_popular().unwrap_or(NO_ENTRIES).to_owned(),
        })
        .collect();

    RoleSummaryTable {
        rows,
        total,
        generated_at: generated_at.to_owned(),
    }
}

/// One role line as read back from the summary worksheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryEntry {
    /// Named role.
    pub role: Role,
    /// Stored count text.
    pub count: String,
    /// Stored percentage text.
    pub percentage: String,
    /// Stored most popular class.
    pub popular_class: String,
    /// Stored most popular `Class Spec` label.
    pub popular_spec: String,
}

/// Summary worksheet contents as last written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleSummarySnapshot {
    /// Named role lines in stored order.
    pub entries: Vec<SummaryEntry>,
    /// Count from the total row, `0` when missing.
    pub total: String,
    /// Timestamp of the first stored row.
    pub last_updated: Option<String>,
}

impl RoleSummarySnapshot {
    /// Whether the summary worksheet holds no data rows.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.last_updated.is_none()
    }

    /// Interpret stored summary records.
    pub fn from_records(records: &[SheetRecord]) -> Self {
        let mut snapshot = Self {
            total: "0".to_owned(),
            last_updated: records
                .first()
                .map(|record| record.get_or("Last Updated", "Unknown").to_owned()),
            ..Self::default()
        };
        for record in records {
            let label = record.get_or("Role", "");
            if label == TOTAL_MARKER {
                snapshot.total = record.get_or("Count", "0").to_owned();
                continue;
            }
            let Ok(role) = label.parse::<Role>() else {
                continue;
            };
            if role == Role::Unknown {
                continue;
            }
            snapshot.entries.push(SummaryEntry {
                role,
                count: record.get_or("Count", "0").to_owned(),
                percentage: record.get_or("Percentage", "0%").to_owned(),
                popular_class: record.get_or("Most Popular Class", NO_ENTRIES).to_owned(),
                popular_spec: record.get_or("Most Popular Spec", NO_ENTRIES).to_owned(),
            });
        }
        snapshot
    }
}

/// Statistics service implementing [`RoleStatistics`].
///
/// Refreshes run one at a time so a clear never lands between another
/// refresh's clear and append.
#[derive(Clone)]
pub struct RoleStatisticsService<S, T> {
    selections: Arc<S>,
    summary: Arc<T>,
    clock: Arc<dyn Clock>,
    refreshing: Arc<Mutex<()>>,
}

impl<S, T> RoleStatisticsService<S, T> {
    /// Create a service reading `selections` and rewriting `summary`.
    pub fn new(selections: Arc<S>, summary: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            selections,
            summary,
            clock,
            refreshing: Arc::new(Mutex::new(())),
        }
    }
}

#[async_trait]
impl<S, T> RoleStatistics for RoleStatisticsService<S, T>
where
    S: Worksheet,
    T: Worksheet,
{
    async fn refresh(&self) -> Result<RoleSummaryTable, RowStoreError> {
        let _refreshing = self.refreshing.lock().await;
        let values = self.selections.read_values().await?;
        let records = records_from_values(&values);
        let table = recompute(&records, &format_store_timestamp(self.clock.utc()));

        self.summary.clear().await?;
        self.summary.append_rows(table.to_cells()).await?;
        info!(total = table.total, "role summary refreshed");
        Ok(table)
    }

    async fn snapshot(&self) -> Result<RoleSummarySnapshot, RowStoreError> {
        let values = self.summary.read_values().await?;
        Ok(RoleSummarySnapshot::from_records(&records_from_values(
            &values,
        )))
    }
}

#[cfg(test)]
#[path = "aggregation_tests.rs"]
mod tests;
