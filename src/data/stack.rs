//! Stacking engine: turns a [`Table`] into one band sequence per series.
//!
//! Two independent choices drive the layout:
//! - [`StackOrder`] decides which series sits at the bottom of the stack,
//! - [`StackOffset`] decides where the bottom of the stack sits at each timestamp.
//!
//! The streamgraph uses `InsideOut` + `Wiggle`. Both are pure functions of the
//! table and catalog, so identical input yields bit-identical bands.

use chrono::{DateTime, Utc};

use crate::data::catalog::{SeriesCatalog, SeriesId};
use crate::data::table::Table;
use crate::error::{Result, StreamgraphError};

/// Stacked interval of one series at one timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub timestamp: DateTime<Utc>,
    pub lower: f64,
    pub upper: f64,
}

impl Band {
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// All bands of one series, in time order.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub series: SeriesId,
    pub bands: Vec<Band>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StackOrder {
    /// Largest total in the middle, the rest alternating outwards.
    #[default]
    InsideOut,
    /// Catalog order, first series at the bottom.
    Catalog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StackOffset {
    /// Baseline chosen per timestamp to minimize weighted slope change.
    #[default]
    Wiggle,
    /// Baseline fixed at zero (plain stacked area).
    Zero,
}

/// Result of a stacking pass.
///
/// `layers` follows stacking order (bottom first); use [`Stack::layer`] to
/// look a series up by id.
#[derive(Debug, Clone, PartialEq)]
pub struct Stack {
    pub layers: Vec<Layer>,
}

impl Stack {
    pub fn layer(&self, id: &SeriesId) -> Option<&Layer> {
        self.layers.iter().find(|l| &l.series == id)
    }

    /// Minimum lower bound and maximum upper bound across every band.
    ///
    /// Returns `None` when there are no bands at all.
    pub fn extent(&self) -> Option<(f64, f64)> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for band in self.layers.iter().flat_map(|l| l.bands.iter()) {
            lo = lo.min(band.lower);
            hi = hi.max(band.upper);
        }
        (lo <= hi).then_some((lo, hi))
    }
}

/// Stack every catalog series of `table`.
pub fn stack(
    table: &Table,
    catalog: &SeriesCatalog,
    order: StackOrder,
    offset: StackOffset,
) -> Result<Stack> {
    let columns: Vec<Vec<f64>> = catalog
        .ids()
        .map(|id| table.column(id))
        .collect::<Result<_>>()?;

    let ordering = match order {
        StackOrder::InsideOut => inside_out_order(&columns),
        StackOrder::Catalog => (0..columns.len()).collect(),
    };
    let baseline = match offset {
        StackOffset::Wiggle => wiggle_baseline(&columns, &ordering),
        StackOffset::Zero => vec![0.0; table.len()],
    };

    let timestamps: Vec<DateTime<Utc>> = table.timestamps().collect();
    let ids: Vec<&SeriesId> = catalog.ids().collect();
    let mut running = baseline;
    let mut layers = Vec::with_capacity(ordering.len());
    for &s in &ordering {
        let mut bands = Vec::with_capacity(timestamps.len());
        let column = timestamps.iter().zip(&columns[s]).zip(running.iter_mut());
        for ((&timestamp, &v), base) in column {
            let lower = *base;
            *base += v;
            if !lower.is_finite() || !base.is_finite() {
                log::warn!("stacking: {} overflows at {}", ids[s], timestamp);
                return Err(StreamgraphError::StackOverflow {
                    series: ids[s].0.clone(),
                    timestamp,
                });
            }
            bands.push(Band {
                timestamp,
                lower,
                upper: *base,
            });
        }
        layers.push(Layer {
            series: ids[s].clone(),
            bands,
        });
    }
    Ok(Stack { layers })
}

/// Order series so the heaviest sits in the middle of the stack.
///
/// Series are visited by descending total (ties keep catalog order) and each
/// goes to whichever side currently carries less, bottom side on a tie. The
/// bottom side is then reversed so the heaviest series end up adjacent in the
/// center. Returns column indices, bottom of the stack first.
///
/// ```
/// # use streamgraph::data::stack::inside_out_order;
/// let cols = vec![vec![5.0], vec![1.0], vec![3.0], vec![2.0]];
/// assert_eq!(inside_out_order(&cols), vec![1, 0, 2, 3]);
/// ```
pub fn inside_out_order(columns: &[Vec<f64>]) -> Vec<usize> {
    let sums: Vec<f64> = columns.iter().map(|c| c.iter().sum()).collect();
    let mut by_total: Vec<usize> = (0..columns.len()).collect();
    by_total.sort_by(|&a, &b| sums[b].total_cmp(&sums[a]));

    let (mut top, mut bottom) = (0.0, 0.0);
    let mut tops = Vec::new();
    let mut bottoms = Vec::new();
    for i in by_total {
        if top < bottom {
            top += sums[i];
            tops.push(i);
        } else {
            bottom += sums[i];
            bottoms.push(i);
        }
    }
    bottoms.reverse();
    bottoms.extend(tops);
    bottoms
}

/// Per-timestamp baseline minimizing the weighted wiggle of all layer edges.
///
/// Starting at zero, the baseline at `t_j` moves by
/// `-sum_i v_ij * (dv_ij / 2 + sum_{k<i} dv_kj) / sum_i v_ij`, where `i`
/// runs over `ordering` and `dv` is the change since `t_{j-1}`. A timestamp
/// whose total is zero leaves the baseline where it was.
pub fn wiggle_baseline(columns: &[Vec<f64>], ordering: &[usize]) -> Vec<f64> {
    let m = columns.first().map_or(0, |c| c.len());
    let mut baseline = Vec::with_capacity(m);
    if m == 0 {
        return baseline;
    }
    let mut y = 0.0;
    baseline.push(y);
    for j in 1..m {
        let mut total = 0.0;
        let mut weighted = 0.0;
        let mut below = 0.0;
        for &i in ordering {
            let v = columns[i][j];
            let dv = v - columns[i][j - 1];
            total += v;
            weighted += v * (dv / 2.0 + below);
            below += dv;
        }
        if total > 0.0 {
            y -= weighted / total;
        }
        baseline.push(y);
    }
    baseline
}
