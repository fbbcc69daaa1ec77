//! Observations and the time-sorted table the pipeline consumes.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::data::catalog::{SeriesCatalog, SeriesId};
use crate::error::{Result, StreamgraphError};

/// Input record as supplied by the data-loading collaborator.
///
/// ```json
/// { "date": "2024-01-01", "GPT-4": 12.0, "Gemini": 4.5 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub date: String,
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

impl Row {
    pub fn new<I, S>(date: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            date: date.into(),
            values: values.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Parse an RFC 3339 instant or a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| ndt.and_utc())
        .ok_or_else(|| StreamgraphError::InvalidTimestamp(s.to_string()))
}

/// One immutable row: an instant plus one value per series.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    timestamp: DateTime<Utc>,
    values: BTreeMap<SeriesId, f64>,
}

impl Observation {
    pub fn new<I, S>(timestamp: DateTime<Utc>, values: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<SeriesId>,
    {
        Self {
            timestamp,
            values: values.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn value(&self, id: &SeriesId) -> Option<f64> {
        self.values.get(id).copied()
    }
}

/// Observations sorted ascending by timestamp.
///
/// Always a fresh copy: the caller's rows are never reordered. Every catalog
/// series is guaranteed to carry a finite, non-negative value in every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    rows: Vec<Observation>,
}

impl Table {
    /// Validate observations against `catalog` and return a sorted copy.
    pub fn new(observations: &[Observation], catalog: &SeriesCatalog) -> Result<Self> {
        for obs in observations {
            for id in catalog.ids() {
                let value = obs.value(id).ok_or_else(|| {
                    log::warn!("rejecting table: {} missing at {}", id, obs.timestamp);
                    StreamgraphError::MissingSeriesValue {
                        series: id.0.clone(),
                        timestamp: obs.timestamp,
                    }
                })?;
                if !value.is_finite() {
                    return Err(StreamgraphError::NonFiniteValue {
                        series: id.0.clone(),
                        timestamp: obs.timestamp,
                        value,
                    });
                }
                if value < 0.0 {
                    return Err(StreamgraphError::NegativeValue {
                        series: id.0.clone(),
                        timestamp: obs.timestamp,
                        value,
                    });
                }
            }
        }
        let mut rows = observations.to_vec();
        rows.sort_by_key(|o| o.timestamp);
        Ok(Self { rows })
    }

    /// Parse and validate raw input rows.
    pub fn from_rows(rows: &[Row], catalog: &SeriesCatalog) -> Result<Self> {
        let observations = rows
            .iter()
            .map(|r| {
                let ts = parse_timestamp(&r.date)?;
                Ok(Observation::new(
                    ts,
                    r.values.iter().map(|(k, v)| (SeriesId(k.clone()), *v)),
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(&observations, catalog)
    }

    pub fn rows(&self) -> &[Observation] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn timestamps(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.rows.iter().map(|o| o.timestamp)
    }

    /// First and last timestamp, or `None` for an empty table.
    pub fn time_extent(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((self.rows.first()?.timestamp, self.rows.last()?.timestamp))
    }

    /// All values of one series in time order.
    pub fn column(&self, id: &SeriesId) -> Result<Vec<f64>> {
        self.rows
            .iter()
            .map(|o| {
                o.value(id).ok_or_else(|| StreamgraphError::MissingSeriesValue {
                    series: id.0.clone(),
                    timestamp: o.timestamp,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dates_and_instants() {
        let d = parse_timestamp("2024-03-01").unwrap();
        assert_eq!(d.to_rfc3339(), "2024-03-01T00:00:00+00:00");
        let t = parse_timestamp("2024-03-01T12:30:00+02:00").unwrap();
        assert_eq!(t.to_rfc3339(), "2024-03-01T10:30:00+00:00");
        assert!(parse_timestamp("March").is_err());
    }

    #[test]
    fn row_deserializes_with_flattened_series() {
        let row: Row = serde_json::from_str(r#"{"date":"2024-01-01","GPT-4":3,"Gemini":1.5}"#).unwrap();
        assert_eq!(row.values["GPT-4"], 3.0);
        assert_eq!(row.values["Gemini"], 1.5);
    }
}
