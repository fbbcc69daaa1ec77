//! Painting the retained surface and the hover overlay with egui.

use eframe::egui;
use egui::{Align2, Color32, FontId, Mesh, Painter, Pos2, Rect, Shape, Stroke, Vec2};
use egui_plot::{Bar, BarChart, Plot};

use crate::overlay::{MiniBarChart, Overlay};
use crate::surface::{AxisElement, AxisOrientation, Element, LayerElement, Surface};

const AXIS_STROKE: Stroke = Stroke {
    width: 1.0,
    color: Color32::from_gray(90),
};
const LABEL_FONT: f32 = 11.0;

/// Draw every surface element, offset so surface (0, 0) lands on `origin`.
pub(crate) fn paint_surface(painter: &Painter, origin: Pos2, surface: &Surface) {
    let offset = origin.to_vec2();
    let text_color = painter.ctx().style().visuals.text_color();
    for element in surface.elements() {
        match element {
            Element::Layer(layer) => paint_layer(painter, offset, layer),
            Element::Axis(axis) => paint_axis(painter, offset, axis, text_color),
            Element::Legend(legend) => {
                for e in &legend.entries {
                    painter.rect_filled(e.swatch.translate(offset), 2.0, e.color);
                    painter.text(
                        e.label_pos + offset,
                        Align2::LEFT_CENTER,
                        e.series.as_str(),
                        FontId::proportional(LABEL_FONT + 1.0),
                        text_color,
                    );
                }
            }
        }
    }
}

/// Fill a layer as a triangle strip between its flattened edges.
///
/// Layers are not convex, so `Shape::convex_polygon` would overfill them.
fn paint_layer(painter: &Painter, offset: Vec2, layer: &LayerElement) {
    let upper = &layer.shape.upper;
    let lower = &layer.shape.lower;
    if upper.len() < 2 || upper.len() != lower.len() {
        return;
    }
    let color = layer.color.gamma_multiply(layer.opacity);
    let mut mesh = Mesh::default();
    for (u, l) in upper.iter().zip(lower) {
        mesh.colored_vertex(*u + offset, color);
        mesh.colored_vertex(*l + offset, color);
    }
    for i in 0..upper.len() as u32 - 1 {
        let k = 2 * i;
        mesh.add_triangle(k, k + 1, k + 2);
        mesh.add_triangle(k + 1, k + 3, k + 2);
    }
    painter.add(Shape::mesh(mesh));
}

fn paint_axis(painter: &Painter, offset: Vec2, axis: &AxisElement, text_color: Color32) {
    painter.line_segment([axis.from + offset, axis.to + offset], AXIS_STROKE);
    for tick in &axis.ticks {
        let end = axis.tick_end(tick.anchor);
        painter.line_segment([tick.anchor + offset, end + offset], AXIS_STROKE);
        let (pos, align) = match axis.orientation {
            AxisOrientation::Bottom => (end + Vec2::new(0.0, 2.0), Align2::CENTER_TOP),
            AxisOrientation::Left => (end - Vec2::new(2.0, 0.0), Align2::RIGHT_CENTER),
        };
        painter.text(
            pos + offset,
            align,
            &tick.label,
            FontId::proportional(LABEL_FONT),
            text_color,
        );
    }
}

/// Show the overlay as a floating area above the chart, if visible.
pub(crate) fn show_overlay(ctx: &egui::Context, origin: Pos2, overlay: &Overlay) {
    if !overlay.is_visible() {
        return;
    }
    let Some(chart) = overlay.content() else {
        return;
    };
    let screen = Rect::from_min_size(origin + overlay.position().to_vec2(), overlay.size());
    egui::Area::new(egui::Id::new("streamgraph_overlay"))
        .order(egui::Order::Tooltip)
        .fixed_pos(screen.min)
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.set_width(screen.width());
                ui.label(egui::RichText::new(chart.series().as_str()).strong());
                mini_bar_plot(ui, chart, screen.height());
            });
        });
}

fn mini_bar_plot(ui: &mut egui::Ui, chart: &MiniBarChart, height: f32) {
    let labels: Vec<String> = chart.bars.iter().map(|b| b.label.clone()).collect();
    let bars: Vec<Bar> = chart
        .bars
        .iter()
        .enumerate()
        .map(|(i, b)| Bar::new(i as f64, b.value).fill(chart.color).name(&b.label))
        .collect();

    Plot::new("streamgraph_overlay_plot")
        .height(height)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .allow_double_click_reset(false)
        .show_x(false)
        .include_y(0.0)
        .x_axis_formatter(move |x, _range| {
            let i = x.value.round();
            if (x.value - i).abs() > 1e-6 || i < 0.0 {
                return String::new();
            }
            labels.get(i as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(chart.series().as_str(), bars)
                    .color(chart.color)
                    .width(0.8),
            );
        });
}
