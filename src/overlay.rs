//! Hover overlay: a floating container holding the per-series bar chart.
//!
//! The container is an explicitly owned resource. [`OverlaySlot::acquire`]
//! reuses the existing container (clearing it) or creates the first one, so
//! no matter how often the chart re-renders there is never more than one.

use egui::{Color32, Pos2, Rect, Vec2, pos2, vec2};

use crate::config::ChartConfig;
use crate::data::catalog::SeriesId;
use crate::data::scale::{BandScale, LinearScale};
use crate::data::summary::BucketedSummary;
use crate::data::time_format::format_value;

const VALUE_TICKS: usize = 4;

/// One bar of the mini chart, in overlay-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub rect: Rect,
    pub label: String,
    /// Top-center anchor of the label below the bar.
    pub label_pos: Pos2,
    pub value: f64,
}

/// Bar chart of one series' bucketed summary.
#[derive(Debug, Clone, PartialEq)]
pub struct MiniBarChart {
    pub summary: BucketedSummary,
    pub color: Color32,
    pub size: Vec2,
    pub bars: Vec<Bar>,
    /// `(y, label)` for value ticks along the left edge.
    pub value_ticks: Vec<(f32, String)>,
    /// Left end and right end of the zero line.
    pub baseline: [Pos2; 2],
}

impl MiniBarChart {
    /// Lay out one bar per bucket; heights are proportional to the values.
    pub fn build(summary: BucketedSummary, color: Color32, config: &ChartConfig) -> Self {
        let m = config.overlay_margins;
        let size = vec2(config.overlay_width, config.overlay_height);
        let inner_w = (size.x - m.horizontal()).max(0.0);
        let inner_h = (size.y - m.vertical()).max(0.0);
        let bottom = m.top + inner_h;

        let max = summary.max_value();
        let y = LinearScale::new((0.0, if max > 0.0 { max } else { 1.0 }), (bottom, m.top));
        let x = BandScale::new(summary.len(), (m.left, m.left + inner_w), config.bar_padding);

        let bars = summary
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| {
                let left = x.position(i);
                let rect = Rect::from_min_max(
                    pos2(left, y.map(e.value)),
                    pos2(left + x.bandwidth(), bottom),
                );
                Bar {
                    rect,
                    label: e.label.clone(),
                    label_pos: pos2(rect.center().x, bottom + 4.0),
                    value: e.value,
                }
            })
            .collect();

        let tick_values = y.ticks(VALUE_TICKS);
        let step = match tick_values.as_slice() {
            [a, b, ..] => b - a,
            _ => 0.0,
        };
        let value_ticks = tick_values
            .into_iter()
            .map(|v| (y.map(v), format_value(v, step)))
            .collect();

        Self {
            summary,
            color,
            size,
            bars,
            value_ticks,
            baseline: [pos2(m.left, bottom), pos2(m.left + inner_w, bottom)],
        }
    }

    pub fn series(&self) -> &SeriesId {
        &self.summary.series
    }
}

/// The floating container itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    visible: bool,
    position: Pos2,
    size: Vec2,
    content: Option<MiniBarChart>,
}

impl Overlay {
    fn new(size: Vec2) -> Self {
        Self {
            visible: false,
            position: Pos2::ZERO,
            size,
            content: None,
        }
    }

    /// Hide and drop any drawn content.
    fn reset(&mut self, size: Vec2) {
        self.visible = false;
        self.position = Pos2::ZERO;
        self.size = size;
        self.content = None;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Top-left corner in surface coordinates.
    pub fn position(&self) -> Pos2 {
        self.position
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.position, self.size)
    }

    pub fn content(&self) -> Option<&MiniBarChart> {
        self.content.as_ref()
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn move_to(&mut self, position: Pos2) {
        self.position = position;
    }

    /// Replace the drawn content.
    pub fn set_content(&mut self, chart: MiniBarChart) {
        self.size = chart.size;
        self.content = Some(chart);
    }
}

/// Owner of the single overlay container.
#[derive(Debug, Default)]
pub struct OverlaySlot {
    overlay: Option<Overlay>,
}

impl OverlaySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse the existing container after clearing it, or create one.
    pub fn acquire(&mut self, size: Vec2) -> &mut Overlay {
        if self.overlay.is_some() {
            log::trace!("overlay: reusing existing container");
        } else {
            log::trace!("overlay: creating container");
        }
        let overlay = self.get_or_acquire(size);
        overlay.reset(size);
        overlay
    }

    /// The existing container as-is, or a fresh one if none exists yet.
    pub fn get_or_acquire(&mut self, size: Vec2) -> &mut Overlay {
        self.overlay.get_or_insert_with(|| Overlay::new(size))
    }

    pub fn get(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut Overlay> {
        self.overlay.as_mut()
    }

    /// Number of live containers: 0 before the first render, 1 afterwards.
    pub fn count(&self) -> usize {
        usize::from(self.overlay.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_reuses_and_clears() {
        let mut slot = OverlaySlot::new();
        {
            let o = slot.acquire(vec2(10.0, 10.0));
            o.show();
            o.move_to(pos2(3.0, 4.0));
        }
        let o = slot.acquire(vec2(20.0, 10.0));
        assert!(!o.is_visible());
        assert_eq!(o.position(), Pos2::ZERO);
        assert_eq!(o.size(), vec2(20.0, 10.0));
        assert_eq!(slot.count(), 1);
    }
}
