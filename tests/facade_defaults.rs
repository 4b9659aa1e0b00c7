use exploralytics::{ChartFacade, ChartRequest, Dataset, StyleConfig, Template};

fn sales() -> Dataset {
    Dataset::new()
        .with_text("region", &["north", "south", "east", "west"])
        .unwrap()
        .with_numeric("sales", &[120.0, 80.0, 95.0, 60.0])
        .unwrap()
}

#[test]
fn global_style_applies_when_request_is_empty() {
    let style = StyleConfig::builder()
        .color("#2E75B6")
        .height(600)
        .width(900)
        .template(Template::PlotlyDark)
        .build()
        .unwrap();
    let viz = ChartFacade::new(style);
    let fig = viz
        .plot_hbar(&sales(), "region", Some("sales"), &ChartRequest::new())
        .unwrap();

    assert_eq!((fig.layout.width, fig.layout.height), (900, 600));
    assert_eq!(fig.layout.template(), Template::PlotlyDark);
    let colors = fig.bar().unwrap().bar_colors();
    assert!(colors.iter().all(|c| c.as_str() == "#2E75B6"));
}

#[test]
fn request_overrides_do_not_leak_into_later_calls() {
    let viz = ChartFacade::default();
    let before = viz.style().clone();

    let req = ChartRequest::new()
        .height(400)
        .width(500)
        .template(Template::Ggplot2)
        .title_bold(true)
        .color("red")
        .unwrap();
    let first = viz.plot_hbar(&sales(), "region", Some("sales"), &req).unwrap();
    assert_eq!((first.layout.width, first.layout.height), (500, 400));
    assert!(first.layout.title.text.starts_with("<b>"));

    let second = viz
        .plot_hbar(&sales(), "region", Some("sales"), &ChartRequest::new())
        .unwrap();
    assert_eq!((second.layout.width, second.layout.height), (1366, 768));
    assert_eq!(second.layout.template(), Template::SimpleWhite);
    assert!(!second.layout.title.text.starts_with("<b>"));
    assert_eq!(second.bar().unwrap().bar_colors()[0].as_str(), "#94C973");
    assert_eq!(viz.style(), &before);
}

#[test]
fn default_titles_per_chart_kind() {
    let viz = ChartFacade::default();
    let fig = viz
        .plot_histograms(&sales(), &[], 1, &ChartRequest::new())
        .unwrap();
    assert_eq!(
        fig.heading().title,
        "How distributed the numerical values are?"
    );
    assert_eq!(
        fig.heading().subtitle.as_deref(),
        Some("Histogram of each column with numerical data type")
    );

    let req = ChartRequest::new()
        .title("Sales")
        .subtitle("by region")
        .footer("Source: ledger");
    let fig = viz.plot_hbar(&sales(), "region", Some("sales"), &req).unwrap();
    assert_eq!(fig.layout.title.text, "Sales<br><sup>by region</sup>");
    assert!(
        fig.layout
            .annotations
            .iter()
            .any(|a| a.text == "Source: ledger" && a.yref == "paper")
    );
}

#[test]
fn style_loads_from_json_with_defaults_for_missing_fields() {
    let style = StyleConfig::from_json_str(r##"{"color": "#006400", "height": 500}"##).unwrap();
    assert_eq!(style.color.as_str(), "#006400");
    assert_eq!(style.height, 500);
    assert_eq!(style.width, 1366);
    assert_eq!(style.template, Template::SimpleWhite);

    assert!(StyleConfig::from_json_str(r#"{"height": 0}"#).is_err());
    assert!(StyleConfig::from_json_str(r#"{"color": "not-a-color"}"#).is_err());
}
