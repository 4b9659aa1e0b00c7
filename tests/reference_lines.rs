use exploralytics::{ChartError, ChartFacade, ChartRequest, Dataset, LineRole};

fn data() -> Dataset {
    Dataset::new()
        .with_text("team", &["x", "y", "z"])
        .unwrap()
        .with_numeric("points", &[4.0, 6.0, 8.0])
        .unwrap()
}

#[test]
fn hline_marks_the_mean_of_displayed_values() {
    let viz = ChartFacade::default();
    let req = ChartRequest::new().add_hline(true);
    let fig = viz.plot_hbar(&data(), "team", Some("points"), &req).unwrap();

    let lines: Vec<_> = fig.reference_lines().collect();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].value(), 6.0);
    assert_eq!(
        lines[0].role,
        LineRole::Reference {
            label: "Mean".into()
        }
    );
    // vertical for horizontal bars
    assert_eq!(lines[0].x0, lines[0].x1);
    assert_eq!(lines[0].label(), "Mean: 6");
    assert!(fig.layout.annotations.iter().any(|a| a.text == "Mean: 6"));
}

#[test]
fn explicit_value_wins_over_mean() {
    let viz = ChartFacade::default();
    let req = ChartRequest::new()
        .add_hline(true)
        .add_hline_at("Target", 7.5);
    let fig = viz.plot_dots(&data(), "team", "points", &req).unwrap();

    let lines: Vec<_> = fig.reference_lines().collect();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].value(), 7.5);
    assert_eq!(lines[0].label(), "Target: 7.5");
}

#[test]
fn mean_line_follows_top_n_cut() {
    let viz = ChartFacade::default();
    let req = ChartRequest::new().top_n(2).add_hline(true);
    let fig = viz.plot_hbar(&data(), "team", Some("points"), &req).unwrap();
    let line = fig.reference_lines().next().unwrap();
    assert_eq!(line.value(), 7.0);
}

#[test]
fn stat_lines_on_value_charts() {
    let viz = ChartFacade::default();
    let req = ChartRequest::new().show_mean(true).show_median(true);
    let fig = viz.plot_hbar(&data(), "team", Some("points"), &req).unwrap();
    let roles: Vec<_> = fig.lines().iter().map(|s| s.role.clone()).collect();
    assert_eq!(roles, vec![LineRole::Mean, LineRole::Median]);
    assert_eq!(fig.lines()[1].line.dash, "dot");
    assert_eq!(fig.reference_lines().count(), 0);
}

#[test]
fn non_finite_reference_value_is_rejected() {
    let viz = ChartFacade::default();
    let req = ChartRequest::new().add_hline_at("Broken", f64::NAN);
    let err = viz
        .plot_hbar(&data(), "team", Some("points"), &req)
        .unwrap_err();
    assert!(matches!(err, ChartError::InvalidConfig(_)));
}
