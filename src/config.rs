//! Configuration: chart geometry constants and the top-level app config.

use egui::{Vec2, vec2};

use crate::data::catalog::SeriesCatalog;
use crate::data::stack::{StackOffset, StackOrder};
use crate::events::EventController;

// ─────────────────────────────────────────────────────────────────────────────
// Defaults
// ─────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_WIDTH: f32 = 960.0;
pub const DEFAULT_HEIGHT: f32 = 500.0;
pub const DEFAULT_OVERLAY_WIDTH: f32 = 320.0;
pub const DEFAULT_OVERLAY_HEIGHT: f32 = 180.0;
pub const DEFAULT_AXIS_TICKS: usize = 6;
pub const DEFAULT_LAYER_OPACITY: f32 = 0.75;
pub const EMPHASIS_OPACITY: f32 = 1.0;
/// Points sampled per spline segment when flattening layer edges.
pub const DEFAULT_CURVE_SAMPLES: usize = 12;

/// Space reserved around a plot area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ChartConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Everything the render pipeline needs besides the data itself.
///
/// | Field | Purpose |
/// |-------|---------|
/// | `width`, `height`, `margins` | outer drawable size and plot inset |
/// | `overlay_*` | hover overlay size, inset and offset from the pointer |
/// | `axis_ticks` | approximate tick count on both axes |
/// | `layer_opacity`, `emphasis_opacity` | idle vs hovered layer alpha |
/// | `curve_samples` | flattening resolution of layer edges |
/// | `stack_order`, `stack_offset` | stacking algorithm selection |
/// | `catalog` | series ids, legend order and colors |
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub width: f32,
    pub height: f32,
    pub margins: Margins,
    pub overlay_width: f32,
    pub overlay_height: f32,
    pub overlay_margins: Margins,
    pub overlay_offset: Vec2,
    pub bar_padding: f32,
    pub axis_ticks: usize,
    pub layer_opacity: f32,
    pub emphasis_opacity: f32,
    pub curve_samples: usize,
    pub stack_order: StackOrder,
    pub stack_offset: StackOffset,
    pub catalog: SeriesCatalog,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            margins: Margins::new(20.0, 160.0, 40.0, 60.0),
            overlay_width: DEFAULT_OVERLAY_WIDTH,
            overlay_height: DEFAULT_OVERLAY_HEIGHT,
            overlay_margins: Margins::new(16.0, 12.0, 28.0, 40.0),
            overlay_offset: vec2(14.0, 14.0),
            bar_padding: 0.1,
            axis_ticks: DEFAULT_AXIS_TICKS,
            layer_opacity: DEFAULT_LAYER_OPACITY,
            emphasis_opacity: EMPHASIS_OPACITY,
            curve_samples: DEFAULT_CURVE_SAMPLES,
            stack_order: StackOrder::InsideOut,
            stack_offset: StackOffset::Wiggle,
            catalog: SeriesCatalog::default(),
        }
    }
}

impl ChartConfig {
    /// Width of the plot area inside the margins (never negative).
    pub fn plot_width(&self) -> f32 {
        (self.width - self.margins.horizontal()).max(0.0)
    }

    /// Height of the plot area inside the margins (never negative).
    pub fn plot_height(&self) -> f32 {
        (self.height - self.margins.vertical()).max(0.0)
    }

    pub fn with_catalog(mut self, catalog: SeriesCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_stacking(mut self, order: StackOrder, offset: StackOffset) -> Self {
        self.stack_order = order;
        self.stack_offset = offset;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// StreamgraphConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level configuration for the native window.
#[derive(Clone)]
pub struct StreamgraphConfig {
    /// Native window title.
    pub title: String,
    /// Chart geometry, styling and catalog.
    pub chart: ChartConfig,
    /// Optional eframe native-window options.
    pub native_options: Option<eframe::NativeOptions>,
    /// Optional event subscription handle.
    pub events: Option<EventController>,
}

impl Default for StreamgraphConfig {
    fn default() -> Self {
        Self {
            title: "LLM usage streamgraph".to_string(),
            chart: ChartConfig::default(),
            native_options: None,
            events: None,
        }
    }
}
