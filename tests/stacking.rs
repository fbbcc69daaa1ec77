use chrono::{DateTime, TimeZone, Utc};
use streamgraph::data::stack::{StackOffset, StackOrder, inside_out_order, stack, wiggle_baseline};
use streamgraph::{Observation, SeriesCatalog, SeriesId, StreamgraphError, Table};

fn month(m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, m, 1, 0, 0, 0).unwrap()
}

fn llm_table() -> Table {
    let rows = [
        (1, [40.0, 14.5, 20.7, 10.4, 1.7]),
        (2, [41.2, 17.3, 18.9, 14.1, 6.3]),
        (3, [43.1, 19.0, 16.2, 17.6, 7.9]),
        (4, [45.0, 20.4, 14.8, 20.0, 10.2]),
        (5, [46.5, 0.0, 13.0, 22.9, 12.8]),
    ];
    let catalog = SeriesCatalog::default();
    let ids: Vec<SeriesId> = catalog.ids().cloned().collect();
    let obs: Vec<Observation> = rows
        .iter()
        .map(|(m, vals)| Observation::new(month(*m), ids.iter().cloned().zip(vals.iter().copied())))
        .collect();
    Table::new(&obs, &catalog).unwrap()
}

fn all_combinations() -> Vec<(StackOrder, StackOffset)> {
    vec![
        (StackOrder::InsideOut, StackOffset::Wiggle),
        (StackOrder::InsideOut, StackOffset::Zero),
        (StackOrder::Catalog, StackOffset::Wiggle),
        (StackOrder::Catalog, StackOffset::Zero),
    ]
}

#[test]
fn bands_never_invert() {
    let table = llm_table();
    let catalog = SeriesCatalog::default();
    for (order, offset) in all_combinations() {
        let s = stack(&table, &catalog, order, offset).unwrap();
        for layer in &s.layers {
            for band in &layer.bands {
                assert!(
                    band.upper >= band.lower,
                    "{} inverted at {}: {:?}",
                    layer.series,
                    band.timestamp,
                    band
                );
            }
        }
    }
}

#[test]
fn stacking_is_deterministic() {
    let table = llm_table();
    let catalog = SeriesCatalog::default();
    let a = stack(&table, &catalog, StackOrder::InsideOut, StackOffset::Wiggle).unwrap();
    let b = stack(&table, &catalog, StackOrder::InsideOut, StackOffset::Wiggle).unwrap();
    assert_eq!(a, b);
    for (la, lb) in a.layers.iter().zip(&b.layers) {
        for (x, y) in la.bands.iter().zip(&lb.bands) {
            assert_eq!(x.lower.to_bits(), y.lower.to_bits());
            assert_eq!(x.upper.to_bits(), y.upper.to_bits());
        }
    }
}

#[test]
fn stacking_preserves_total_magnitude() {
    let table = llm_table();
    let catalog = SeriesCatalog::default();
    let s = stack(&table, &catalog, StackOrder::InsideOut, StackOffset::Wiggle).unwrap();
    for (j, row) in table.rows().iter().enumerate() {
        let raw: f64 = catalog.ids().map(|id| row.value(id).unwrap()).sum();
        let stacked: f64 = s.layers.iter().map(|l| l.bands[j].width()).sum();
        assert!((raw - stacked).abs() < 1e-9, "row {j}: {raw} vs {stacked}");
    }
}

#[test]
fn layers_are_contiguous() {
    let table = llm_table();
    let catalog = SeriesCatalog::default();
    let s = stack(&table, &catalog, StackOrder::InsideOut, StackOffset::Wiggle).unwrap();
    for pair in s.layers.windows(2) {
        for (below, above) in pair[0].bands.iter().zip(&pair[1].bands) {
            assert_eq!(below.upper, above.lower);
        }
    }
}

#[test]
fn every_catalog_series_gets_one_layer() {
    let table = llm_table();
    let catalog = SeriesCatalog::default();
    let s = stack(&table, &catalog, StackOrder::InsideOut, StackOffset::Wiggle).unwrap();
    assert_eq!(s.layers.len(), catalog.len());
    for id in catalog.ids() {
        let layer = s.layer(id).expect("layer for every series");
        assert_eq!(layer.bands.len(), table.len());
    }
}

#[test]
fn extent_matches_stacked_bounds_not_raw_values() {
    let table = llm_table();
    let catalog = SeriesCatalog::default();
    let s = stack(&table, &catalog, StackOrder::InsideOut, StackOffset::Wiggle).unwrap();
    let (lo, hi) = s.extent().unwrap();

    let bands: Vec<_> = s.layers.iter().flat_map(|l| l.bands.iter()).collect();
    let true_lo = bands.iter().map(|b| b.lower).fold(f64::INFINITY, f64::min);
    let true_hi = bands.iter().map(|b| b.upper).fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(lo, true_lo);
    assert_eq!(hi, true_hi);
    // The domain spans at least the largest per-timestamp total (110.4),
    // far beyond the largest raw value (46.5).
    assert!(hi - lo >= 110.4 - 1e-9);
}

#[test]
fn zero_offset_starts_at_zero() {
    let table = llm_table();
    let catalog = SeriesCatalog::default();
    let s = stack(&table, &catalog, StackOrder::Catalog, StackOffset::Zero).unwrap();
    let bottom = &s.layers[0];
    assert_eq!(bottom.series.as_str(), "GPT-4");
    assert!(bottom.bands.iter().all(|b| b.lower == 0.0));
}

#[test]
fn inside_out_puts_heaviest_series_inside() {
    // totals: 10, 50, 30, 20, 40
    let columns = vec![vec![10.0], vec![50.0], vec![30.0], vec![20.0], vec![40.0]];
    let order = inside_out_order(&columns);
    // 1 -> bottom, 4 -> top, 2 -> top, 3 -> bottom, 0 -> bottom (70/70 tie)
    assert_eq!(order, vec![0, 3, 1, 4, 2]);
    let heaviest_pos = order.iter().position(|&i| i == 1).unwrap();
    assert!(heaviest_pos > 0 && heaviest_pos < order.len() - 1);
}

#[test]
fn inside_out_ties_keep_catalog_order() {
    let columns = vec![vec![1.0, 1.0], vec![1.0, 1.0], vec![1.0, 1.0], vec![1.0, 1.0]];
    let a = inside_out_order(&columns);
    let b = inside_out_order(&columns);
    assert_eq!(a, b);
    // 0 -> bottom, 1 -> top, 2 -> bottom, 3 -> top
    assert_eq!(a, vec![2, 0, 1, 3]);
}

#[test]
fn wiggle_ignores_zero_total_timestamps() {
    let columns = vec![vec![1.0, 0.0, 3.0], vec![2.0, 0.0, 1.0]];
    let baseline = wiggle_baseline(&columns, &[0, 1]);
    assert_eq!(baseline.len(), 3);
    assert_eq!(baseline[0], 0.0);
    assert_eq!(baseline[1], baseline[0]);
    assert!(baseline.iter().all(|b| b.is_finite()));
}

#[test]
fn single_timestamp_stacks_without_offset() {
    let catalog = SeriesCatalog::from_ids(["GPT-4", "Gemini"]).unwrap();
    let obs = [Observation::new(month(1), [("GPT-4", 10.0), ("Gemini", 5.0)])];
    let table = Table::new(&obs, &catalog).unwrap();
    let s = stack(&table, &catalog, StackOrder::InsideOut, StackOffset::Wiggle).unwrap();
    assert_eq!(s.extent(), Some((0.0, 15.0)));
}

/// Sum over layers and steps of `width * (change in layer midline)^2`.
fn weighted_wiggle(s: &streamgraph::data::stack::Stack) -> f64 {
    let mut sum = 0.0;
    for layer in &s.layers {
        for w in layer.bands.windows(2) {
            let mid0 = (w[0].lower + w[0].upper) / 2.0;
            let mid1 = (w[1].lower + w[1].upper) / 2.0;
            sum += w[1].width() * (mid1 - mid0).powi(2);
        }
    }
    sum
}

#[test]
fn wiggle_offset_beats_zero_offset() {
    let table = llm_table();
    let catalog = SeriesCatalog::default();
    for order in [StackOrder::InsideOut, StackOrder::Catalog] {
        let wiggle = weighted_wiggle(&stack(&table, &catalog, order, StackOffset::Wiggle).unwrap());
        let zero = weighted_wiggle(&stack(&table, &catalog, order, StackOffset::Zero).unwrap());
        assert!(wiggle <= zero + 1e-9, "{order:?}: wiggle {wiggle} > zero {zero}");
    }
}

#[test]
fn overflowing_totals_fail_to_stack() {
    let catalog = SeriesCatalog::from_ids(["a", "b"]).unwrap();
    let obs = [Observation::new(
        month(1),
        [(SeriesId::from("a"), 1.7e308), (SeriesId::from("b"), 1.7e308)],
    )];
    let table = Table::new(&obs, &catalog).unwrap();
    let err = stack(&table, &catalog, StackOrder::Catalog, StackOffset::Zero).unwrap_err();
    assert!(matches!(err, StreamgraphError::StackOverflow { .. }));
}
