use streamgraph::data::summary::summarize;
use streamgraph::{ChartConfig, Row, SeriesCatalog, SeriesId, StreamgraphError, Table};

fn table() -> Table {
    let rows = [
        Row::new("2024-02-01", [("GPT-4", 12.0), ("Gemini", 6.0)]),
        Row::new("2024-01-01", [("GPT-4", 10.0), ("Gemini", 5.0)]),
    ];
    let catalog = SeriesCatalog::from_ids(["GPT-4", "Gemini"]).unwrap();
    Table::from_rows(&rows, &catalog).unwrap()
}

#[test]
fn summary_is_time_ordered() {
    let s = summarize(&table(), &SeriesId::from("Gemini")).unwrap();
    let got: Vec<(&str, f64)> = s.entries.iter().map(|e| (e.label.as_str(), e.value)).collect();
    assert_eq!(got, vec![("Jan", 5.0), ("Feb", 6.0)]);
    assert_eq!(s.max_value(), 6.0);
}

#[test]
fn summary_of_unknown_series_fails() {
    let err = summarize(&table(), &SeriesId::from("PaLM-2")).unwrap_err();
    assert!(matches!(err, StreamgraphError::MissingSeriesValue { .. }));
}

#[test]
fn summary_of_empty_table_is_empty() {
    let s = summarize(&Table::default(), &SeriesId::from("GPT-4")).unwrap();
    assert!(s.is_empty());
    assert_eq!(s.max_value(), 0.0);
}

#[test]
fn mini_bar_chart_scales_to_max() {
    use streamgraph::overlay::MiniBarChart;
    let cfg = ChartConfig::default();
    let s = summarize(&table(), &SeriesId::from("GPT-4")).unwrap();
    let chart = MiniBarChart::build(s, egui::Color32::RED, &cfg);
    assert_eq!(chart.bars.len(), 2);
    let tallest = chart.bars[1].rect.height();
    let shorter = chart.bars[0].rect.height();
    assert!((shorter / tallest - 10.0 / 12.0).abs() < 1e-4);
    // tallest bar reaches the top margin
    assert!((chart.bars[1].rect.min.y - cfg.overlay_margins.top).abs() < 1e-3);
    for bar in &chart.bars {
        assert!(bar.rect.max.x <= cfg.overlay_width - cfg.overlay_margins.right + 1e-3);
    }
}

#[test]
fn table_rejects_bad_values() {
    let catalog = SeriesCatalog::from_ids(["GPT-4"]).unwrap();
    let negative = [Row::new("2024-01-01", [("GPT-4", -1.0)])];
    assert!(matches!(
        Table::from_rows(&negative, &catalog),
        Err(StreamgraphError::NegativeValue { .. })
    ));
    let nan = [Row::new("2024-01-01", [("GPT-4", f64::NAN)])];
    assert!(matches!(
        Table::from_rows(&nan, &catalog),
        Err(StreamgraphError::NonFiniteValue { .. })
    ));
    let bad_date = [Row::new("January", [("GPT-4", 1.0)])];
    assert!(matches!(
        Table::from_rows(&bad_date, &catalog),
        Err(StreamgraphError::InvalidTimestamp(_))
    ));
}
