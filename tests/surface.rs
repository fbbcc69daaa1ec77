use streamgraph::surface::{AxisOrientation, Element};
use streamgraph::{ChartConfig, Row, SeriesCatalog, Streamgraph, StreamgraphError, Table};

fn rows() -> Vec<Row> {
    vec![
        Row::new("2024-03-01", [("GPT-4", 43.1), ("Gemini", 19.0), ("PaLM-2", 16.2), ("Claude", 17.6), ("LLaMA-3.1", 7.9)]),
        Row::new("2024-01-01", [("GPT-4", 40.0), ("Gemini", 14.5), ("PaLM-2", 20.7), ("Claude", 10.4), ("LLaMA-3.1", 1.7)]),
        Row::new("2024-02-01", [("GPT-4", 41.2), ("Gemini", 17.3), ("PaLM-2", 18.9), ("Claude", 14.1), ("LLaMA-3.1", 6.3)]),
    ]
}

fn rendered() -> Streamgraph {
    let mut chart = Streamgraph::new(ChartConfig::default());
    chart.set_rows(Some(&rows())).unwrap();
    chart
}

#[test]
fn empty_input_leaves_no_elements() {
    let mut chart = Streamgraph::new(ChartConfig::default());
    chart.set_rows(None).unwrap();
    assert_eq!(chart.surface().len(), 0);
    chart.set_rows(Some(&[])).unwrap();
    assert_eq!(chart.surface().len(), 0);
}

#[test]
fn empty_input_clears_previous_render() {
    let mut chart = rendered();
    assert!(!chart.surface().is_empty());
    chart.set_rows(None).unwrap();
    assert!(chart.surface().is_empty());
    assert!(chart.stack().is_none());
    assert!(chart.overlay().get().map_or(true, |o| !o.is_visible()));
}

#[test]
fn render_builds_layers_axes_and_legend() {
    let chart = rendered();
    let surface = chart.surface();
    assert_eq!(surface.layers().count(), 5);
    let axes: Vec<_> = surface.axes().collect();
    assert_eq!(axes.len(), 2);
    assert!(axes.iter().any(|a| a.orientation == AxisOrientation::Bottom));
    assert!(axes.iter().any(|a| a.orientation == AxisOrientation::Left));
    let legend = surface.legend().unwrap();
    let names: Vec<&str> = legend.entries.iter().map(|e| e.series.as_str()).collect();
    assert_eq!(names, vec!["GPT-4", "Gemini", "PaLM-2", "Claude", "LLaMA-3.1"]);
}

#[test]
fn layers_are_painted_before_axes_and_legend() {
    let chart = rendered();
    let first_non_layer = chart
        .surface()
        .elements()
        .iter()
        .position(|e| !matches!(e, Element::Layer(_)))
        .unwrap();
    assert_eq!(first_non_layer, 5);
}

#[test]
fn repeated_render_does_not_accumulate() {
    let mut chart = rendered();
    let first_len = chart.surface().len();
    let first_layers = chart.surface().layers().count();
    let first: Vec<Element> = chart.surface().elements().to_vec();
    assert!(chart.overlay().count() <= 1);

    chart.set_rows(Some(&rows())).unwrap();
    assert_eq!(chart.surface().len(), first_len);
    assert_eq!(chart.surface().layers().count(), first_layers);
    assert!(chart.overlay().count() <= 1);
    assert_eq!(chart.surface().elements(), first.as_slice());
}

#[test]
fn input_order_does_not_matter() {
    let chart = rendered();
    let mut sorted = rows();
    sorted.sort_by(|a, b| a.date.cmp(&b.date));
    let mut other = Streamgraph::new(ChartConfig::default());
    other.set_rows(Some(&sorted)).unwrap();
    assert_eq!(chart.surface().elements(), other.surface().elements());
}

#[test]
fn caller_rows_are_not_reordered() {
    let input = rows();
    let mut chart = Streamgraph::new(ChartConfig::default());
    chart.set_rows(Some(&input)).unwrap();
    assert_eq!(input, rows());
    assert_eq!(input[0].date, "2024-03-01");
}

#[test]
fn layers_fit_inside_plot_area() {
    let chart = rendered();
    let cfg = chart.config();
    let top = cfg.margins.top - 0.5;
    let bottom = cfg.margins.top + cfg.plot_height() + 0.5;
    for layer in chart.surface().layers() {
        for p in layer.shape.outline() {
            assert!(p.y >= top && p.y <= bottom, "{} out of plot at {:?}", layer.series, p);
        }
    }
}

#[test]
fn y_domain_comes_from_stacked_bounds() {
    let chart = rendered();
    let scales = chart.surface().scales().unwrap();
    let extent = chart.stack().unwrap().extent().unwrap();
    assert_eq!(scales.y.domain(), extent);
    let (plot_h, _) = scales.y.range();
    assert_eq!(plot_h, chart.config().plot_height());
}

#[test]
fn single_timestamp_renders_without_panicking() {
    let catalog = SeriesCatalog::from_ids(["GPT-4", "Gemini"]).unwrap();
    let mut chart = Streamgraph::new(ChartConfig::default().with_catalog(catalog));
    chart
        .set_rows(Some(&[Row::new("2024-01-01", [("GPT-4", 10.0), ("Gemini", 5.0)])]))
        .unwrap();
    assert_eq!(chart.surface().layers().count(), 2);
    for layer in chart.surface().layers() {
        assert!(layer.shape.upper.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }
}

#[test]
fn all_zero_values_render_flat() {
    let catalog = SeriesCatalog::from_ids(["a", "b"]).unwrap();
    let mut chart = Streamgraph::new(ChartConfig::default().with_catalog(catalog));
    chart
        .set_rows(Some(&[
            Row::new("2024-01-01", [("a", 0.0), ("b", 0.0)]),
            Row::new("2024-02-01", [("a", 0.0), ("b", 0.0)]),
        ]))
        .unwrap();
    assert_eq!(chart.surface().layers().count(), 2);
    let y = chart.surface().scales().unwrap().y;
    assert_eq!(y.domain(), (0.0, 0.0));
}

#[test]
fn invalid_rows_keep_previous_chart() {
    let mut chart = rendered();
    let before: Vec<Element> = chart.surface().elements().to_vec();
    let bad = [Row::new("2024-01-01", [("GPT-4", 1.0)])];
    assert!(chart.set_rows(Some(&bad)).is_err());
    assert_eq!(chart.surface().elements(), before.as_slice());
}

#[test]
fn table_for_another_catalog_keeps_previous_chart() {
    let mut chart = rendered();
    let before: Vec<Element> = chart.surface().elements().to_vec();
    let before_rows = chart.table().len();

    let other = SeriesCatalog::from_ids(["a"]).unwrap();
    let table = Table::from_rows(&[Row::new("2024-01-01", [("a", 1.0)])], &other).unwrap();
    let err = chart.set_table(table).unwrap_err();
    assert!(matches!(err, StreamgraphError::MissingSeriesValue { .. }));
    assert_eq!(chart.surface().elements(), before.as_slice());
    assert_eq!(chart.table().len(), before_rows);
}

#[test]
fn overflowing_values_are_rejected() {
    let catalog = SeriesCatalog::from_ids(["a"]).unwrap();
    let mut chart = Streamgraph::new(ChartConfig::default().with_catalog(catalog));
    chart
        .set_rows(Some(&[Row::new("2024-01-01", [("a", 1.0)])]))
        .unwrap();
    let before: Vec<Element> = chart.surface().elements().to_vec();

    let huge = [
        Row::new("2024-01-01", [("a", 1e300)]),
        Row::new("2024-02-01", [("a", 1.7e308)]),
    ];
    let err = chart.set_rows(Some(&huge)).unwrap_err();
    assert!(matches!(err, StreamgraphError::StackOverflow { .. }));
    assert_eq!(chart.surface().elements(), before.as_slice());
    assert_eq!(chart.table().len(), 1);
}
