//! Native window for the streamgraph.
//!
//! | Sub-module | Responsibility |
//! | ---------- | -------------- |
//! | [`paint`]  | Drawing surface elements and the overlay with egui |
//! | [`run`]    | [`run_streamgraph()`] entry point |
//!
//! [`StreamgraphApp`] owns a [`Streamgraph`] and translates egui pointer
//! input into [`PointerEvent`]s; everything else happens in the chart.

mod paint;
mod run;

pub use run::run_streamgraph;

use eframe::egui;
use egui::{Pos2, Sense, vec2};

use crate::chart::Streamgraph;
use crate::config::ChartConfig;
use crate::data::table::Row;
use crate::events::EventController;
use crate::export;
use crate::interaction::PointerEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExportFormat {
    Svg,
    Png,
}

/// eframe application hosting one chart.
pub struct StreamgraphApp {
    pub chart: Streamgraph,
    /// Last pointer position dispatched, in surface coordinates.
    last_pointer: Option<Pos2>,
    /// Short message shown in the status bar (last export or error).
    status: Option<String>,
}

impl StreamgraphApp {
    pub fn new(config: ChartConfig, events: Option<EventController>) -> Self {
        let mut chart = Streamgraph::new(config);
        if let Some(events) = events {
            chart = chart.with_events(events);
        }
        Self {
            chart,
            last_pointer: None,
            status: None,
        }
    }

    /// Replace the chart data; invalid rows are logged and leave the chart as it was.
    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.last_pointer = None;
        if let Err(e) = self.chart.set_rows(Some(&rows)) {
            log::error!("rejected data update: {e}");
            self.status = Some(format!("Invalid data: {e}"));
        }
    }

    fn dispatch(&mut self, event: PointerEvent) {
        if let Err(e) = self.chart.dispatch(event) {
            log::error!("hover update failed: {e}");
        }
    }

    /// Map the pointer position to surface coordinates and feed the hover machine.
    fn handle_pointer(&mut self, origin: Pos2, hover: Option<Pos2>) {
        match hover {
            Some(p) => {
                let local = (p - origin).to_pos2();
                if self.last_pointer != Some(local) {
                    self.last_pointer = Some(local);
                    self.dispatch(PointerEvent::Moved(local));
                }
            }
            None => {
                if self.last_pointer.take().is_some() {
                    self.dispatch(PointerEvent::Left);
                }
            }
        }
    }

    fn prompt_and_export(&mut self, format: ExportFormat) {
        let (name, ext, file) = match format {
            ExportFormat::Svg => ("SVG", "svg", "streamgraph.svg"),
            ExportFormat::Png => ("PNG", "png", "streamgraph.png"),
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter(name, &[ext])
            .set_file_name(file)
            .save_file()
        else {
            return;
        };
        let result = match format {
            ExportFormat::Svg => export::save_svg(&self.chart, &path),
            ExportFormat::Png => export::save_png(&self.chart, &path),
        };
        self.status = Some(match result {
            Ok(()) => format!("Saved {}", path.display()),
            Err(e) => {
                log::error!("export to {} failed: {e}", path.display());
                format!("Export failed: {e}")
            }
        });
    }
}

impl eframe::App for StreamgraphApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut export_request = None;
        egui::TopBottomPanel::top("streamgraph_menu").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("Export", |ui| {
                    if ui.button("SVG…").clicked() {
                        ui.close();
                        export_request = Some(ExportFormat::Svg);
                    }
                    if ui.button("PNG…").clicked() {
                        ui.close();
                        export_request = Some(ExportFormat::Png);
                    }
                });
            });
        });
        if let Some(status) = &self.status {
            egui::TopBottomPanel::bottom("streamgraph_status").show(ctx, |ui| {
                ui.label(status);
            });
        }

        let mut origin = Pos2::ZERO;
        egui::CentralPanel::default().show(ctx, |ui| {
            let size = self.chart.surface().size();
            let (rect, response) = ui.allocate_exact_size(vec2(size.x, size.y), Sense::hover());
            origin = rect.min;
            self.handle_pointer(origin, response.hover_pos());
            paint::paint_surface(&ui.painter_at(rect), origin, self.chart.surface());
        });

        if let Some(overlay) = self.chart.overlay().get() {
            paint::show_overlay(ctx, origin, overlay);
        }

        if let Some(format) = export_request {
            self.prompt_and_export(format);
        }
    }
}
