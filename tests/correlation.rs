use exploralytics::{ChartError, ChartFacade, ChartRequest, Colorscale, Dataset};

fn data() -> Dataset {
    Dataset::new()
        .with_numeric("a", &[1.0, 2.0, 3.0, 4.0])
        .unwrap()
        .with_numeric("b", &[2.0, 4.0, 6.0, 8.0])
        .unwrap()
        .with_numeric("c", &[4.0, 3.0, 2.0, 1.0])
        .unwrap()
        .with_text("tag", &["w", "x", "y", "z"])
        .unwrap()
}

#[test]
fn map_keeps_lower_triangle_only() {
    let viz = ChartFacade::default();
    let fig = viz
        .plot_correlation_map(&data(), &[], &ChartRequest::new())
        .unwrap();
    let heat = fig.heatmap().unwrap();

    assert_eq!(heat.x, vec!["a", "b", "c"]);
    assert_eq!(heat.z[0], vec![None, None, None]);
    assert_eq!(heat.z[1][0], Some(1.0));
    assert_eq!(heat.z[2][0], Some(-1.0));
    assert_eq!(heat.z[2][1], Some(-1.0));
    assert_eq!(heat.z[1][1], None);
    assert_eq!(heat.text[1][0], "b vs a<br>Correlation: 1.00");
    assert_eq!((heat.zmin, heat.zmax), (-1.0, 1.0));
    // one label per visible cell
    assert_eq!(fig.layout.annotations.len(), 3);
    assert!(fig.layout.axis('y', 0).unwrap().is_reversed());
}

#[test]
fn map_uses_requested_colorscale() {
    let viz = ChartFacade::default();
    let req = ChartRequest::new().colorscale(Colorscale::RdBu);
    let fig = viz.plot_correlation_map(&data(), &["a", "c"], &req).unwrap();
    let heat = fig.heatmap().unwrap();
    assert_eq!(heat.scale, Colorscale::RdBu);
    assert_eq!(heat.colorscale, Colorscale::RdBu.to_plotly());
    assert_eq!(heat.y, vec!["a", "c"]);
}

#[test]
fn map_needs_two_numeric_columns() {
    let viz = ChartFacade::default();
    let err = viz
        .plot_correlation_map(&data(), &["a", "tag"], &ChartRequest::new())
        .unwrap_err();
    assert!(matches!(err, ChartError::InsufficientData(_)));
}

#[test]
fn target_correlations_sorted_ascending_and_colored_by_sign() {
    let viz = ChartFacade::default();
    let fig = viz
        .plot_correlation_with_target(&data(), "a", &ChartRequest::new())
        .unwrap();
    let bar = fig.bar().unwrap();

    assert_eq!(bar.y, vec!["c", "b"]);
    assert!((bar.x[0] + 1.0).abs() < 1e-9);
    assert!((bar.x[1] - 1.0).abs() < 1e-9);
    assert_eq!(
        bar.text.as_deref(),
        Some(&["-1.00".to_string(), "1.00".to_string()][..])
    );
    let colors = bar.bar_colors();
    assert_eq!(colors[0].as_str(), "#FF9999");
    assert_eq!(colors[1].as_str(), "#2E75B6");
}

#[test]
fn constant_features_are_left_out() {
    let data = data()
        .with_numeric("flat", &[5.0, 5.0, 5.0, 5.0])
        .unwrap();
    let viz = ChartFacade::default();
    let fig = viz
        .plot_correlation_with_target(&data, "a", &ChartRequest::new())
        .unwrap();
    assert!(!fig.bar().unwrap().y.iter().any(|n| n == "flat"));
}
