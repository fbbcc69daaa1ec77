//! Render surface: the retained list of drawable elements for one chart.
//!
//! Every update clears the surface and rebuilds it from scratch. There is no
//! diffing; the data is small and a full rebuild keeps repeated renders of the
//! same table identical.

use egui::{Color32, Pos2, Rect, Vec2, pos2, vec2};

use crate::config::ChartConfig;
use crate::data::catalog::SeriesId;
use crate::data::curve::{AreaShape, area};
use crate::data::scale::{LinearScale, TimeScale};
use crate::data::stack::{Stack, stack};
use crate::data::table::Table;
use crate::data::time_format::{TimeLabelFormat, format_value};
use crate::error::Result;

const TICK_LENGTH: f32 = 6.0;
const LEGEND_GAP: f32 = 20.0;
const LEGEND_ROW: f32 = 20.0;
const LEGEND_SWATCH: f32 = 12.0;

/// One stacked series drawn as a filled area.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerElement {
    pub series: SeriesId,
    pub color: Color32,
    pub opacity: f32,
    /// Position in the stack, 0 = bottom.
    pub stack_index: usize,
    pub shape: AreaShape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrientation {
    Bottom,
    Left,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Where the tick meets the axis line.
    pub anchor: Pos2,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisElement {
    pub orientation: AxisOrientation,
    pub from: Pos2,
    pub to: Pos2,
    pub ticks: Vec<Tick>,
}

impl AxisElement {
    /// Far end of the tick mark starting at `anchor`.
    pub fn tick_end(&self, anchor: Pos2) -> Pos2 {
        match self.orientation {
            AxisOrientation::Bottom => anchor + vec2(0.0, TICK_LENGTH),
            AxisOrientation::Left => anchor - vec2(TICK_LENGTH, 0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub series: SeriesId,
    pub color: Color32,
    pub swatch: Rect,
    pub label_pos: Pos2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendElement {
    pub entries: Vec<LegendEntry>,
}

/// Anything drawn on the surface, in paint order.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Layer(LayerElement),
    Axis(AxisElement),
    Legend(LegendElement),
}

/// Scales of the last render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scales {
    pub x: TimeScale,
    pub y: LinearScale,
}

/// Owns the drawable elements of the chart.
#[derive(Debug, Clone)]
pub struct Surface {
    size: Vec2,
    elements: Vec<Element>,
    scales: Option<Scales>,
    stack: Option<Stack>,
}

impl Surface {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            elements: Vec::new(),
            scales: None,
            stack: None,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Remove every element and forget the previous layout.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.scales = None;
        self.stack = None;
    }

    /// Clear, then rebuild layers, axes and legend from `table`.
    ///
    /// An empty table leaves the surface empty. If `table` cannot be stacked
    /// the error is returned before anything is cleared.
    pub fn render(&mut self, table: &Table, config: &ChartConfig) -> Result<()> {
        let Some(time_extent) = table.time_extent() else {
            self.clear();
            self.size = vec2(config.width, config.height);
            log::debug!("render: no data, surface cleared");
            return Ok(());
        };

        let stacked = stack(table, &config.catalog, config.stack_order, config.stack_offset)?;
        self.clear();
        self.size = vec2(config.width, config.height);
        let value_extent = stacked.extent().unwrap_or((0.0, 0.0));
        let (plot_w, plot_h) = (config.plot_width(), config.plot_height());
        let scales = Scales {
            x: TimeScale::new(time_extent, (0.0, plot_w)),
            y: LinearScale::new(value_extent, (plot_h, 0.0)),
        };
        let origin = pos2(config.margins.left, config.margins.top);

        for (stack_index, layer) in stacked.layers.iter().enumerate() {
            let mut upper: Vec<Pos2> = layer
                .bands
                .iter()
                .map(|b| origin + vec2(scales.x.map(b.timestamp), scales.y.map(b.upper)))
                .collect();
            let mut lower: Vec<Pos2> = layer
                .bands
                .iter()
                .map(|b| origin + vec2(scales.x.map(b.timestamp), scales.y.map(b.lower)))
                .collect();
            if upper.len() == 1 {
                // a lone column would have no width; spread it over the plot
                (upper, lower) = spread_column(upper[0].y, lower[0].y, origin.x, plot_w);
            }
            self.elements.push(Element::Layer(LayerElement {
                series: layer.series.clone(),
                color: config.catalog.color_of(&layer.series).unwrap_or(Color32::GRAY),
                opacity: config.layer_opacity,
                stack_index,
                shape: area(&upper, &lower, config.curve_samples),
            }));
        }

        self.elements
            .push(Element::Axis(bottom_axis(&scales.x, origin, plot_h, config.axis_ticks)));
        self.elements
            .push(Element::Axis(left_axis(&scales.y, origin, config.axis_ticks)));
        self.elements.push(Element::Legend(legend(config, origin, plot_w)));

        log::debug!(
            "render: {} rows, {} layers, value domain {:?}",
            table.len(),
            stacked.layers.len(),
            value_extent
        );
        self.scales = Some(scales);
        self.stack = Some(stacked);
        Ok(())
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn scales(&self) -> Option<&Scales> {
        self.scales.as_ref()
    }

    pub fn stack(&self) -> Option<&Stack> {
        self.stack.as_ref()
    }

    pub fn layers(&self) -> impl Iterator<Item = &LayerElement> {
        self.elements.iter().filter_map(|e| match e {
            Element::Layer(l) => Some(l),
            _ => None,
        })
    }

    pub fn layer(&self, id: &SeriesId) -> Option<&LayerElement> {
        self.layers().find(|l| &l.series == id)
    }

    pub fn axes(&self) -> impl Iterator<Item = &AxisElement> {
        self.elements.iter().filter_map(|e| match e {
            Element::Axis(a) => Some(a),
            _ => None,
        })
    }

    pub fn legend(&self) -> Option<&LegendElement> {
        self.elements.iter().find_map(|e| match e {
            Element::Legend(l) => Some(l),
            _ => None,
        })
    }

    /// Series whose drawn region contains `p`, topmost layer first.
    pub fn hit_test(&self, p: Pos2) -> Option<&SeriesId> {
        self.elements.iter().rev().find_map(|e| match e {
            Element::Layer(l) if l.shape.contains(p) => Some(&l.series),
            _ => None,
        })
    }

    /// Give `emphasized` full opacity and every other layer the default.
    pub fn set_emphasis(&mut self, emphasized: Option<&SeriesId>, config: &ChartConfig) {
        for e in &mut self.elements {
            if let Element::Layer(l) = e {
                l.opacity = if Some(&l.series) == emphasized {
                    config.emphasis_opacity
                } else {
                    config.layer_opacity
                };
            }
        }
    }
}

/// Flat edges for a single timestamp, running the full plot width.
fn spread_column(upper_y: f32, lower_y: f32, left: f32, plot_w: f32) -> (Vec<Pos2>, Vec<Pos2>) {
    let (x0, x1) = (left, left + plot_w);
    (
        vec![pos2(x0, upper_y), pos2(x1, upper_y)],
        vec![pos2(x0, lower_y), pos2(x1, lower_y)],
    )
}

fn bottom_axis(x: &TimeScale, origin: Pos2, plot_h: f32, count: usize) -> AxisElement {
    let y = origin.y + plot_h;
    let (start, end) = x.domain();
    let fmt = TimeLabelFormat::for_span(end - start);
    let (r0, r1) = x.range();
    AxisElement {
        orientation: AxisOrientation::Bottom,
        from: pos2(origin.x + r0, y),
        to: pos2(origin.x + r1, y),
        ticks: x
            .ticks(count)
            .into_iter()
            .map(|t| Tick {
                anchor: pos2(origin.x + x.map(t), y),
                label: fmt.format(t),
            })
            .collect(),
    }
}

fn left_axis(y: &LinearScale, origin: Pos2, count: usize) -> AxisElement {
    let values = y.ticks(count);
    let step = match values.as_slice() {
        [a, b, ..] => b - a,
        _ => 0.0,
    };
    let (r0, r1) = y.range();
    AxisElement {
        orientation: AxisOrientation::Left,
        from: pos2(origin.x, origin.y + r0),
        to: pos2(origin.x, origin.y + r1),
        ticks: values
            .into_iter()
            .map(|v| Tick {
                anchor: pos2(origin.x, origin.y + y.map(v)),
                label: format_value(v, step),
            })
            .collect(),
    }
}

/// Legend in catalog order, to the right of the plot.
fn legend(config: &ChartConfig, origin: Pos2, plot_w: f32) -> LegendElement {
    let x = origin.x + plot_w + LEGEND_GAP;
    LegendElement {
        entries: config
            .catalog
            .entries()
            .iter()
            .enumerate()
            .map(|(i, e)| {
                let top = origin.y + i as f32 * LEGEND_ROW;
                let swatch = Rect::from_min_size(pos2(x, top), vec2(LEGEND_SWATCH, LEGEND_SWATCH));
                LegendEntry {
                    series: e.id.clone(),
                    color: e.color,
                    swatch,
                    label_pos: pos2(swatch.max.x + 6.0, swatch.center().y),
                }
            })
            .collect(),
    }
}
