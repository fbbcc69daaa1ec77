//! Streamgraph crate root: re-exports and module wiring.
//!
//! Renders time-indexed, multi-series usage data as a streamgraph: stacked,
//! smoothed layers around a wiggle-minimizing baseline, with a hover overlay
//! showing a bar chart of the hovered series.
//!
//! | Module | Responsibility |
//! | ------ | -------------- |
//! | [`data`] | catalog, table validation, stacking, curves, scales, summaries |
//! | [`surface`] | retained element tree built by a full render |
//! | [`overlay`] | the single hover overlay and its mini bar chart |
//! | [`interaction`] | hover state machine driven by pointer events |
//! | [`chart`] | [`Streamgraph`] component tying the above together |
//! | [`export`] | SVG/PNG output |
//! | [`app`] | eframe window |
//!
//! The core runs headless:
//!
//! ```
//! use streamgraph::{ChartConfig, Row, Streamgraph};
//!
//! let mut chart = Streamgraph::new(ChartConfig::default());
//! chart
//!     .set_rows(Some(&[
//!         Row::new("2024-01-01", [("GPT-4", 10.0), ("Gemini", 5.0), ("PaLM-2", 2.0), ("Claude", 7.0), ("LLaMA-3.1", 1.0)]),
//!         Row::new("2024-02-01", [("GPT-4", 12.0), ("Gemini", 6.0), ("PaLM-2", 1.0), ("Claude", 9.0), ("LLaMA-3.1", 3.0)]),
//!     ]))
//!     .unwrap();
//! assert_eq!(chart.surface().layers().count(), 5);
//! ```

pub mod app;
pub mod chart;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod export;
pub mod interaction;
pub mod logging;
pub mod overlay;
pub mod surface;

pub use app::{StreamgraphApp, run_streamgraph};
pub use chart::Streamgraph;
pub use config::{ChartConfig, StreamgraphConfig};
pub use data::catalog::{SeriesCatalog, SeriesId};
pub use data::stack::{StackOffset, StackOrder};
pub use data::table::{Observation, Row, Table};
pub use error::{Result, StreamgraphError};
pub use events::{ChartEvent, EventController, EventFilter, EventKind};
pub use interaction::{HoverState, PointerEvent, Transition};
