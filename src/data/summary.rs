//! Per-series bucketed summaries feeding the hover bar chart.

use chrono::{DateTime, Utc};

use crate::data::catalog::SeriesId;
use crate::data::table::Table;
use crate::data::time_format::short_label;
use crate::error::Result;

/// One time bucket of a single series.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryEntry {
    pub timestamp: DateTime<Utc>,
    pub label: String,
    pub value: f64,
}

/// Values of one series, one entry per table row, in time order.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketedSummary {
    pub series: SeriesId,
    pub entries: Vec<SummaryEntry>,
}

impl BucketedSummary {
    /// Largest value, or zero for an empty summary.
    pub fn max_value(&self) -> f64 {
        self.entries.iter().map(|e| e.value).fold(0.0, f64::max)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Extract the summary of `series` from `table`.
///
/// Computed fresh on every call; only the requested series is read.
pub fn summarize(table: &Table, series: &SeriesId) -> Result<BucketedSummary> {
    let values = table.column(series)?;
    let entries = table
        .timestamps()
        .zip(values)
        .map(|(timestamp, value)| SummaryEntry {
            timestamp,
            label: short_label(timestamp),
            value,
        })
        .collect();
    Ok(BucketedSummary {
        series: series.clone(),
        entries,
    })
}
