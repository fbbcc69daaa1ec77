//! Entry point for running the streamgraph as a native window.

use eframe::egui;

use crate::config::StreamgraphConfig;
use crate::data::table::Row;

use super::StreamgraphApp;

const WINDOW_PADDING: f32 = 40.0;

/// Open a native window showing `rows` and block until it is closed.
///
/// Rows that fail validation are logged and the window opens empty.
pub fn run_streamgraph(rows: Vec<Row>, mut cfg: StreamgraphConfig) -> eframe::Result<()> {
    let mut app = StreamgraphApp::new(cfg.chart.clone(), cfg.events.take());
    app.set_rows(rows);

    let title = cfg.title.clone();
    let mut opts = cfg
        .native_options
        .take()
        .unwrap_or_else(eframe::NativeOptions::default);

    // Fit the chart plus menu bar if no size is configured.
    if opts.viewport.inner_size.is_none() {
        opts.viewport = opts.viewport.clone().with_inner_size(egui::vec2(
            cfg.chart.width + WINDOW_PADDING,
            cfg.chart.height + 2.0 * WINDOW_PADDING,
        ));
    }

    eframe::run_native(&title, opts, Box::new(|_cc| Ok(Box::new(app))))
}
