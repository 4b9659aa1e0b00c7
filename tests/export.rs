use exploralytics::{ChartError, ChartFacade, ChartRequest, Dataset, Figure, viz};
use std::fs;
use tempfile::tempdir;

fn bar_figure() -> Figure {
    let data = Dataset::new()
        .with_text("region", &["north", "south", "east"])
        .unwrap()
        .with_numeric("sales", &[120.0, 80.0, 95.0])
        .unwrap();
    let req = ChartRequest::new()
        .title("Sales by region")
        .footer("Source: ledger")
        .width(640)
        .height(400)
        .add_hline_at("Target", 100.0)
        .highlight_top_n(1, "#006400")
        .unwrap();
    ChartFacade::default()
        .plot_hbar(&data, "region", Some("sales"), &req)
        .unwrap()
}

#[test]
fn json_is_plotly_shaped() {
    let fig = bar_figure();
    let v: serde_json::Value = serde_json::from_str(&fig.to_json().unwrap()).unwrap();
    assert_eq!(v["data"][0]["type"], "bar");
    assert_eq!(v["data"][0]["orientation"], "h");
    assert_eq!(v["data"][0]["y"][0], "north");
    assert_eq!(v["data"][0]["marker"]["color"][0], "#006400");
    assert_eq!(v["layout"]["yaxis"]["autorange"], "reversed");
    assert_eq!(v["layout"]["shapes"][0]["type"], "line");
    assert_eq!(v["layout"]["shapes"][0]["x0"], 100.0);
    assert_eq!(v["layout"]["title"]["x"], 0.5);
    assert_eq!(v["layout"]["width"], 640);
}

#[test]
fn histogram_json_uses_numbered_axes_and_grid() {
    let data = Dataset::new()
        .with_numeric("a", &[1.0, 2.0])
        .unwrap()
        .with_numeric("b", &[3.0, 4.0])
        .unwrap();
    let fig = ChartFacade::default()
        .plot_histograms(&data, &[], 2, &ChartRequest::new())
        .unwrap();
    let v: serde_json::Value = serde_json::from_str(&fig.to_json().unwrap()).unwrap();
    assert_eq!(v["layout"]["grid"]["rows"], 1);
    assert_eq!(v["layout"]["grid"]["columns"], 2);
    assert!(v["layout"]["xaxis2"].is_object());
    assert_eq!(v["data"][1]["xaxis"], "x2");
}

#[test]
fn writes_every_supported_format() {
    let fig = bar_figure();
    let dir = tempdir().unwrap();
    for name in ["chart.json", "chart.html", "chart.svg", "chart.png"] {
        let path = dir.path().join(name);
        fig.write(&path).unwrap();
        let meta = fs::metadata(&path).unwrap();
        assert!(meta.len() > 0, "{name} is empty");
    }

    let html = fs::read_to_string(dir.path().join("chart.html")).unwrap();
    assert!(html.contains("Plotly.newPlot"));
    assert!(html.contains("<title>Sales by region</title>"));

    let png = fs::read(dir.path().join("chart.png")).unwrap();
    assert_eq!(&png[..4], b"\x89PNG");
}

#[test]
fn unknown_extension_is_rejected() {
    let fig = bar_figure();
    let dir = tempdir().unwrap();
    let err = fig.write(dir.path().join("chart.pdf")).unwrap_err();
    assert!(matches!(err, ChartError::UnsupportedFormat(ext) if ext == "pdf"));
    assert!(!dir.path().join("chart.pdf").exists());
}

#[test]
fn svg_render_draws_heading_and_labels() {
    let svg = viz::render_svg_string(&bar_figure()).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Sales by region"));
    assert!(svg.contains("Source: ledger"));
    assert!(svg.contains("Target: 100"));
    assert!(svg.contains("north"));
}

#[test]
fn every_chart_kind_renders() {
    let data = Dataset::new()
        .with_text("k", &["p", "q", "r", "s"])
        .unwrap()
        .with_numeric("x", &[1.0, 2.0, 3.0, 5.0])
        .unwrap()
        .with_numeric("y", &[2.0, 1.0, 4.0, 3.0])
        .unwrap();
    let viz_facade = ChartFacade::default();
    let req = ChartRequest::new().show_mean(true).show_median(true);
    let figs = [
        viz_facade.plot_histograms(&data, &[], 2, &req).unwrap(),
        viz_facade.plot_dots(&data, "k", "x", &req).unwrap(),
        viz_facade
            .plot_correlation_map(&data, &[], &ChartRequest::new())
            .unwrap(),
        viz_facade
            .plot_correlation_with_target(&data, "x", &ChartRequest::new())
            .unwrap(),
    ];
    for fig in &figs {
        let svg = viz::render_svg_string(fig).unwrap();
        assert!(svg.contains("</svg>"));
    }
}
