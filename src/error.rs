//! Error type shared by the data pipeline, rendering and export.

use chrono::{DateTime, Utc};

/// Everything that can go wrong while ingesting rows, building a catalog or exporting.
///
/// Missing or empty input is deliberately absent: it clears the chart instead.
#[derive(Debug, thiserror::Error)]
pub enum StreamgraphError {
    #[error("observation at {timestamp} has no value for series `{series}`")]
    MissingSeriesValue {
        series: String,
        timestamp: DateTime<Utc>,
    },
    #[error("series `{series}` has non-finite value {value} at {timestamp}")]
    NonFiniteValue {
        series: String,
        timestamp: DateTime<Utc>,
        value: f64,
    },
    #[error("series `{series}` has negative value {value} at {timestamp}")]
    NegativeValue {
        series: String,
        timestamp: DateTime<Utc>,
        value: f64,
    },
    #[error("stacked bounds of series `{series}` overflow at {timestamp}")]
    StackOverflow {
        series: String,
        timestamp: DateTime<Utc>,
    },
    #[error("series `{0}` appears more than once in the catalog")]
    DuplicateSeries(String),
    #[error("series catalog is empty")]
    EmptyCatalog,
    #[error("cannot parse timestamp `{0}` (expected RFC 3339 or YYYY-MM-DD)")]
    InvalidTimestamp(String),
    #[error("failed to parse SVG: {0}")]
    Svg(#[from] usvg::Error),
    #[error("cannot allocate a {width}x{height} pixmap")]
    Raster { width: u32, height: u32 },
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StreamgraphError>;
