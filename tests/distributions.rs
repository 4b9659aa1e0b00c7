use exploralytics::figure::Trace;
use exploralytics::{ChartError, ChartFacade, ChartRequest, Dataset};

fn measurements() -> Dataset {
    Dataset::new()
        .with_numeric("weight", &[1.0, 2.0, 3.0, 4.0, 5.0, 100.0])
        .unwrap()
        .with_numeric("height", &[10.0, 12.0, 11.0, 13.0, 12.0, 11.0])
        .unwrap()
        .with_numeric("age", &[30.0, 41.0, 25.0, 52.0, 38.0, 47.0])
        .unwrap()
        .with_text("city", &["a", "b", "c", "d", "e", "f"])
        .unwrap()
}

#[test]
fn each_panel_gets_a_histogram_and_a_box() {
    let viz = ChartFacade::default();
    let fig = viz
        .plot_distributions(&measurements(), &[], 2, &ChartRequest::new())
        .unwrap();

    assert_eq!(fig.data.len(), 6);
    assert!(matches!(&fig.data[0], Trace::Histogram(h) if h.name == "weight"));
    assert!(matches!(&fig.data[1], Trace::Box(b) if b.name == "weight"));
    assert_eq!(fig.grid_shape(), (2, 2));

    let boxes: Vec<_> = fig.boxes().collect();
    assert_eq!(boxes.len(), 3);
    for (hist, boxed) in fig.histograms().zip(&boxes) {
        assert_eq!(boxed.orientation, "h");
        assert_eq!(boxed.boxpoints, "outliers");
        assert_eq!((hist.row, hist.col), (boxed.row, boxed.col));
        assert_eq!(hist.xaxis, boxed.xaxis);
        assert!(!boxed.showlegend);
    }
}

#[test]
fn height_follows_grid_rows_unless_requested() {
    let viz = ChartFacade::default();
    let fig = viz
        .plot_distributions(&measurements(), &[], 1, &ChartRequest::new())
        .unwrap();
    assert_eq!(fig.layout.height, 900);

    let fig = viz
        .plot_distributions(&measurements(), &["age"], 1, &ChartRequest::new())
        .unwrap();
    assert_eq!(fig.layout.height, 300);

    let fig = viz
        .plot_distributions(&measurements(), &[], 1, &ChartRequest::new().height(500))
        .unwrap();
    assert_eq!(fig.layout.height, 500);
}

#[test]
fn default_titles_and_box_json() {
    let viz = ChartFacade::default();
    let fig = viz
        .plot_distributions(&measurements(), &["weight", "city"], 1, &ChartRequest::new())
        .unwrap();
    assert_eq!(fig.layout.title.heading.title, "How are the numerical values spread?");

    let v: serde_json::Value = serde_json::from_str(&fig.to_json().unwrap()).unwrap();
    assert_eq!(v["data"].as_array().unwrap().len(), 2);
    assert_eq!(v["data"][1]["type"], "box");
    assert_eq!(v["data"][1]["orientation"], "h");
    assert_eq!(v["data"][1]["boxpoints"], "outliers");
    assert_eq!(v["data"][1]["x"][5], 100.0);
}

#[test]
fn mean_lines_land_in_their_panel() {
    let viz = ChartFacade::default();
    let fig = viz
        .plot_distributions(
            &measurements(),
            &["height", "age"],
            2,
            &ChartRequest::new().show_mean(true),
        )
        .unwrap();
    let panels: Vec<usize> = fig.lines().iter().map(|s| s.panel).collect();
    assert_eq!(panels, vec![0, 1]);
    assert_eq!(fig.lines()[0].value(), 11.5);
}

#[test]
fn renders_to_svg() {
    let viz = ChartFacade::default();
    let fig = viz
        .plot_distributions(&measurements(), &[], 2, &ChartRequest::new())
        .unwrap();
    let svg = exploralytics::viz::render_svg_string(&fig).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("circle"));
}

#[test]
fn same_checks_as_histograms() {
    let viz = ChartFacade::default();
    let err = viz
        .plot_distributions(&measurements(), &[], 0, &ChartRequest::new())
        .unwrap_err();
    assert!(matches!(err, ChartError::InvalidConfig(_)));

    let err = viz
        .plot_distributions(&Dataset::new(), &[], 1, &ChartRequest::new())
        .unwrap_err();
    assert!(matches!(err, ChartError::EmptyDataset));

    let err = viz
        .plot_distributions(&measurements(), &["city"], 1, &ChartRequest::new())
        .unwrap_err();
    assert!(matches!(err, ChartError::InsufficientData(_)));
}
