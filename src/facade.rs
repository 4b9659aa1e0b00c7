//! The chart façade: global style defaults + per-call requests in, [`Figure`]s out.
//!
//! Every operation follows the same path:
//! 1. reject an empty dataset,
//! 2. merge the [`ChartRequest`] over the facade's [`StyleConfig`] ([`Resolved`]),
//! 3. look up the requested columns,
//! 4. build traces, then apply the shared highlight, reference-line and
//!    statistic-line rules.
//!
//! Nothing is cached between calls and the style is never written to.

use log::{debug, warn};
use std::collections::BTreeMap;

use crate::error::{ChartError, Result};
use crate::figure::{
    Annotation, Axis, BarTrace, BoxTrace, Coord, Figure, Font, Grid, Heading, HeatmapTrace,
    HistogramTrace, Layout, LayoutMeta, LineRole, LineStyle, Marker, MarkerColor, ScatterTrace,
    Shape, Title, Trace, axis_id, axis_layout_key,
};
use crate::models::Dataset;
use crate::request::{ChartRequest, Highlight};
use crate::stats;
use crate::style::{
    Color, Colorscale, FONT_SIZE, HLINE_COLOR, LINE_COLOR, MARGINS, NEGATIVE_CORR_COLOR,
    POSITIVE_CORR_COLOR, StyleConfig, TITLE_SIZE, TITLE_X, Template, TemplateTheme,
    validate_font, validate_size,
};

const HIST_TITLE: &str = "How distributed the numerical values are?";
const HIST_SUBTITLE: &str = "Histogram of each column with numerical data type";
const HBAR_TITLE: &str = "How distributed are the categories?";
const HBAR_SUBTITLE: &str = "Horizontal bar plot of categories";
const DIST_TITLE: &str = "How are the numerical values spread?";
const DIST_SUBTITLE: &str = "Histogram and box plot of each column with numerical data type";
const DOTS_TITLE: &str = "How do the categories compare?";
const DOTS_SUBTITLE: &str = "Dot plot of values per category";
const CORR_MAP_TITLE: &str = "How correlated the numerical values are?";
const CORR_MAP_SUBTITLE: &str = "Correlation matrix of columns with numerical data type";
const CORR_TARGET_TITLE: &str = "How correlated the features are with the target?";
const CORR_TARGET_SUBTITLE: &str = "Correlation coefficient of each feature";

const DOT_SIZE: u32 = 12;
const DIST_ROW_HEIGHT: u32 = 300;

/// Number of grid rows needed for `panels` panels at `per_row` panels per row.
pub fn grid_rows(panels: usize, per_row: usize) -> usize {
    if per_row == 0 {
        return 0;
    }
    panels.div_ceil(per_row)
}

/// Zero-based `(row, column)` of panel `index` in a row-major grid.
pub fn panel_position(index: usize, per_row: usize) -> (usize, usize) {
    (index / per_row, index % per_row)
}

/// Colors for `n` rows already sorted descending: the first `top.count` rows get
/// the top color, the last `low.count` rows the low color, the rest `base`.
pub fn highlight_colors(
    n: usize,
    base: &Color,
    top: Option<&Highlight>,
    low: Option<&Highlight>,
) -> Result<Vec<Color>> {
    let k = top.map_or(0, |h| h.count);
    let m = low.map_or(0, |h| h.count);
    if k.checked_add(m).is_none_or(|total| total > n) {
        return Err(ChartError::InvalidHighlight {
            top: k,
            low: m,
            rows: n,
        });
    }
    let mut colors = vec![base.clone(); n];
    if let Some(h) = top {
        for c in colors.iter_mut().take(h.count) {
            *c = h.color.clone();
        }
    }
    if let Some(h) = low {
        for c in colors.iter_mut().skip(n - h.count) {
            *c = h.color.clone();
        }
    }
    Ok(colors)
}

/// Request merged over the global style for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub color: Color,
    pub height: u32,
    pub width: u32,
    pub template: Template,
    pub font: String,
    pub colorscale: Colorscale,
    pub heading: Heading,
}

/// Categories with their values, sorted descending.
struct Ranked {
    labels: Vec<String>,
    values: Vec<f64>,
}

/// Applies one [`StyleConfig`] to every chart it builds.
///
/// # Example
///
/// ```rust
/// use exploralytics::{ChartFacade, ChartRequest, Dataset};
///
/// let data = Dataset::new()
///     .with_text("region", &["north", "south", "east"])?
///     .with_numeric("sales", &[120.0, 80.0, 95.0])?;
/// let viz = ChartFacade::default();
/// let req = ChartRequest::new()
///     .title("Sales by region")
///     .highlight_top_n(1, "#006400")?;
/// let fig = viz.plot_hbar(&data, "region", Some("sales"), &req)?;
/// assert_eq!(fig.bar().unwrap().y, vec!["north", "east", "south"]);
/// # Ok::<(), exploralytics::ChartError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartFacade {
    style: StyleConfig,
}

impl ChartFacade {
    /// Wrap an already validated style.
    pub fn new(style: StyleConfig) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Merge `req` over the global style. Set request fields win; unset fields fall back.
    pub fn resolve(
        &self,
        req: &ChartRequest,
        default_title: &str,
        default_subtitle: &str,
    ) -> Result<Resolved> {
        let s = &self.style;
        let height = req.height.unwrap_or(s.height);
        let width = req.width.unwrap_or(s.width);
        validate_size(height, width)?;
        let font = req.font.clone().unwrap_or_else(|| s.font.clone());
        validate_font(&font)?;

        let subtitle = req
            .subtitle
            .clone()
            .unwrap_or_else(|| default_subtitle.to_string());
        Ok(Resolved {
            color: req.color.clone().unwrap_or_else(|| s.color.clone()),
            height,
            width,
            template: req.template.unwrap_or(s.template),
            font,
            colorscale: req.colorscale.unwrap_or(s.colorscale),
            heading: Heading {
                title: req
                    .title
                    .clone()
                    .unwrap_or_else(|| default_title.to_string()),
                subtitle: Some(subtitle).filter(|t| !t.is_empty()),
                footer: req.footer.clone().filter(|t| !t.is_empty()),
                bold: req.title_bold.unwrap_or(s.title_bold),
            },
        })
    }

    /// Grid of histograms, one panel per numeric column.
    ///
    /// An empty `specific_cols` selects every numeric column. Named text columns
    /// are skipped. Panels fill `num_cols` columns row by row.
    pub fn plot_histograms(
        &self,
        data: &Dataset,
        specific_cols: &[&str],
        num_cols: usize,
        req: &ChartRequest,
    ) -> Result<Figure> {
        ensure_rows(data)?;
        let r = self.resolve(req, HIST_TITLE, HIST_SUBTITLE)?;
        let columns = panel_columns(data, specific_cols, num_cols)?;
        debug!(
            "histograms: {} panels, {} per row",
            columns.len(),
            num_cols
        );
        let mut layout = panel_layout(&r, columns.len(), num_cols);

        let mut traces = Vec::with_capacity(columns.len());
        for (idx, name) in columns.iter().enumerate() {
            let values = data.numeric(name)?;
            traces.push(Trace::Histogram(histogram_trace(&r, name, values, idx, num_cols)));
            push_panel(&mut layout, &r, name, idx);
            push_stat_lines(&mut layout, values, req, idx)?;
        }

        Ok(Figure {
            data: traces,
            layout,
        })
    }

    /// Histogram plus a horizontal outlier box plot per numeric column.
    ///
    /// Column selection and grid follow [`plot_histograms`](Self::plot_histograms).
    /// Without an explicit request height the figure gets 300 px per grid row.
    pub fn plot_distributions(
        &self,
        data: &Dataset,
        columns: &[&str],
        num_cols: usize,
        req: &ChartRequest,
    ) -> Result<Figure> {
        ensure_rows(data)?;
        let mut r = self.resolve(req, DIST_TITLE, DIST_SUBTITLE)?;
        let columns = panel_columns(data, columns, num_cols)?;
        let rows = grid_rows(columns.len(), num_cols);
        if req.height.is_none() {
            r.height = DIST_ROW_HEIGHT * rows as u32;
        }
        debug!(
            "distributions: {} panels in {} rows, height {}",
            columns.len(),
            rows,
            r.height
        );
        let mut layout = panel_layout(&r, columns.len(), num_cols);

        let mut traces = Vec::with_capacity(columns.len() * 2);
        for (idx, name) in columns.iter().enumerate() {
            let values = data.numeric(name)?;
            let hist = histogram_trace(&r, name, values, idx, num_cols);
            let outliers = BoxTrace {
                name: name.to_string(),
                x: values.to_vec(),
                orientation: "h",
                boxpoints: "outliers",
                marker: hist.marker.clone(),
                xaxis: hist.xaxis.clone(),
                yaxis: hist.yaxis.clone(),
                showlegend: false,
                row: hist.row,
                col: hist.col,
            };
            traces.push(Trace::Histogram(hist));
            traces.push(Trace::Box(outliers));
            push_panel(&mut layout, &r, name, idx);
            push_stat_lines(&mut layout, values, req, idx)?;
        }

        Ok(Figure {
            data: traces,
            layout,
        })
    }

    /// Horizontal bars of `y_col` per `x_col` category, or of `x_col` value counts
    /// when `y_col` is `None`. Bars run from the largest value at the top down.
    pub fn plot_hbar(
        &self,
        data: &Dataset,
        x_col: &str,
        y_col: Option<&str>,
        req: &ChartRequest,
    ) -> Result<Figure> {
        ensure_rows(data)?;
        let r = self.resolve(req, HBAR_TITLE, HBAR_SUBTITLE)?;
        let ranked = rank_rows(data, x_col, y_col, req.top_n)?;
        let colors = bar_colors(&r, &ranked, req)?;

        let value_label = y_col.unwrap_or("Count");
        let value_fmt = if y_col.is_some() { ",.2f" } else { ",.0f" };
        let hovertemplate = format!(
            "<b>{x_col}</b>: %{{y}}<br>{value_label}: %{{x:{value_fmt}}}<br><extra></extra>"
        );

        let theme = r.template.theme();
        let mut layout = base_layout(&r);
        layout
            .axes
            .insert("xaxis".into(), gridded_axis(&theme, Some(value_label)));
        let mut yaxis = Axis::titled(x_col);
        yaxis.autorange = Some("reversed");
        layout.axes.insert("yaxis".into(), yaxis);

        push_value_lines(&mut layout, &ranked.values, req)?;
        debug!("hbar: {} bars of {}", ranked.values.len(), value_label);

        Ok(Figure {
            data: vec![Trace::Bar(BarTrace {
                y: ranked.labels,
                x: ranked.values,
                orientation: "h",
                marker: Marker { color: colors, size: None },
                text: None,
                textposition: None,
                hovertemplate: Some(hovertemplate),
            })],
            layout,
        })
    }

    /// One dot per `label_col` category at its `value_col` value, largest first.
    ///
    /// Shares ordering, `top_n`, highlighting and reference lines with [`plot_hbar`](Self::plot_hbar).
    pub fn plot_dots(
        &self,
        data: &Dataset,
        label_col: &str,
        value_col: &str,
        req: &ChartRequest,
    ) -> Result<Figure> {
        ensure_rows(data)?;
        let r = self.resolve(req, DOTS_TITLE, DOTS_SUBTITLE)?;
        let ranked = rank_rows(data, label_col, Some(value_col), req.top_n)?;
        let colors = bar_colors(&r, &ranked, req)?;

        let theme = r.template.theme();
        let mut layout = base_layout(&r);
        layout
            .axes
            .insert("xaxis".into(), gridded_axis(&theme, Some(value_col)));
        let mut yaxis = gridded_axis(&theme, Some(label_col));
        yaxis.autorange = Some("reversed");
        layout.axes.insert("yaxis".into(), yaxis);

        push_value_lines(&mut layout, &ranked.values, req)?;

        Ok(Figure {
            data: vec![Trace::Scatter(ScatterTrace {
                y: ranked.labels,
                x: ranked.values,
                mode: "markers",
                marker: Marker {
                    color: colors,
                    size: Some(DOT_SIZE),
                },
                hovertemplate: Some(format!(
                    "<b>{label_col}</b>: %{{y}}<br>{value_col}: %{{x:,.2f}}<br><extra></extra>"
                )),
            })],
            layout,
        })
    }

    /// Lower-triangle heatmap of pairwise Pearson correlations.
    ///
    /// An empty `columns` uses every numeric column; at least two are needed.
    pub fn plot_correlation_map(
        &self,
        data: &Dataset,
        columns: &[&str],
        req: &ChartRequest,
    ) -> Result<Figure> {
        ensure_rows(data)?;
        let r = self.resolve(req, CORR_MAP_TITLE, CORR_MAP_SUBTITLE)?;
        let names = select_numeric(data, columns)?;
        if names.len() < 2 {
            return Err(ChartError::InsufficientData(format!(
                "correlation needs at least two numeric columns, got {}",
                names.len()
            )));
        }
        let cols = names
            .iter()
            .map(|n| data.numeric(n))
            .collect::<Result<Vec<_>>>()?;
        let full = stats::correlation_matrix(&cols);

        let labels: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        let mut layout = base_layout(&r);
        let mut z = Vec::with_capacity(labels.len());
        let mut text = Vec::with_capacity(labels.len());
        for (i, row) in full.iter().enumerate() {
            let mut z_row = Vec::with_capacity(row.len());
            let mut t_row = Vec::with_capacity(row.len());
            for (j, v) in row.iter().enumerate() {
                // upper triangle and diagonal stay blank
                let cell = if j < i { v.map(stats::round2) } else { None };
                match cell {
                    Some(v) => {
                        t_row.push(format!(
                            "{} vs {}<br>Correlation: {v:.2}",
                            labels[i], labels[j]
                        ));
                        layout.annotations.push(Annotation {
                            text: format!("{v:.2}"),
                            xref: "x".into(),
                            yref: "y".into(),
                            x: Coord::Category(labels[j].clone()),
                            y: Coord::Category(labels[i].clone()),
                            showarrow: false,
                            xanchor: "center",
                            yanchor: "middle",
                            font: None,
                        });
                    }
                    None => t_row.push(String::new()),
                }
                z_row.push(cell);
            }
            z.push(z_row);
            text.push(t_row);
        }

        layout.axes.insert(
            "xaxis".into(),
            Axis {
                showgrid: Some(false),
                zeroline: Some(false),
                tickangle: Some(90),
                side: Some("bottom"),
                ..Axis::default()
            },
        );
        layout.axes.insert(
            "yaxis".into(),
            Axis {
                showgrid: Some(false),
                zeroline: Some(false),
                autorange: Some("reversed"),
                ..Axis::default()
            },
        );

        Ok(Figure {
            data: vec![Trace::Heatmap(HeatmapTrace {
                scale: r.colorscale,
                z,
                x: labels.clone(),
                y: labels,
                text,
                colorscale: r.colorscale.to_plotly(),
                zmin: -1.0,
                zmax: 1.0,
                showscale: true,
                xgap: 1,
                ygap: 1,
                hoverongaps: false,
                hoverinfo: "text",
            })],
            layout,
        })
    }

    /// Horizontal bars of each numeric feature's correlation with `target`,
    /// most negative first. Features with an undefined coefficient are left out.
    pub fn plot_correlation_with_target(
        &self,
        data: &Dataset,
        target: &str,
        req: &ChartRequest,
    ) -> Result<Figure> {
        ensure_rows(data)?;
        let r = self.resolve(req, CORR_TARGET_TITLE, CORR_TARGET_SUBTITLE)?;
        let target_values = data.numeric(target)?;

        let mut corrs: Vec<(String, f64)> = Vec::new();
        for name in data.numeric_column_names() {
            if name == target {
                continue;
            }
            match stats::pearson(target_values, data.numeric(name)?) {
                Some(c) => corrs.push((name.to_string(), c)),
                None => warn!("correlation of `{name}` with `{target}` is undefined, skipping"),
            }
        }
        if corrs.is_empty() {
            return Err(ChartError::InsufficientData(format!(
                "no feature has a defined correlation with `{target}`"
            )));
        }
        corrs.sort_by(|a, b| a.1.total_cmp(&b.1));

        let negative = Color::parse(NEGATIVE_CORR_COLOR)?;
        let positive = Color::parse(POSITIVE_CORR_COLOR)?;
        let colors = corrs
            .iter()
            .map(|(_, c)| if *c < 0.0 { negative.clone() } else { positive.clone() })
            .collect();

        let theme = r.template.theme();
        let mut layout = base_layout(&r);
        let mut xaxis = gridded_axis(&theme, Some("Correlation Coefficient"));
        xaxis.zeroline = Some(true);
        xaxis.tickformat = Some(".2f");
        layout.axes.insert("xaxis".into(), xaxis);
        let mut yaxis = Axis::titled("Features");
        yaxis.autorange = Some("reversed");
        layout.axes.insert("yaxis".into(), yaxis);

        Ok(Figure {
            data: vec![Trace::Bar(BarTrace {
                text: Some(corrs.iter().map(|(_, c)| format!("{c:.2}")).collect()),
                y: corrs.iter().map(|(n, _)| n.clone()).collect(),
                x: corrs.iter().map(|(_, c)| *c).collect(),
                orientation: "h",
                marker: Marker {
                    color: MarkerColor::PerPoint(colors),
                    size: None,
                },
                textposition: Some("outside"),
                hovertemplate: None,
            })],
            layout,
        })
    }
}

/// Numeric columns for a panel grid of `num_cols` panels per row.
fn panel_columns<'a>(
    data: &'a Dataset,
    requested: &[&str],
    num_cols: usize,
) -> Result<Vec<&'a str>> {
    if num_cols == 0 {
        return Err(ChartError::InvalidConfig(
            "num_cols must be at least 1".into(),
        ));
    }
    let columns = select_numeric(data, requested)?;
    if columns.is_empty() {
        return Err(ChartError::InsufficientData(
            "no numeric columns to plot".into(),
        ));
    }
    Ok(columns)
}

fn panel_layout(r: &Resolved, panels: usize, num_cols: usize) -> Layout {
    let mut layout = base_layout(r);
    layout.grid = Some(Grid {
        rows: grid_rows(panels, num_cols),
        columns: num_cols,
        pattern: "independent",
    });
    layout
}

fn histogram_trace(
    r: &Resolved,
    name: &str,
    values: &[Option<f64>],
    idx: usize,
    num_cols: usize,
) -> HistogramTrace {
    let (row, col) = panel_position(idx, num_cols);
    let present = values.iter().flatten().filter(|v| !v.is_nan()).count();
    HistogramTrace {
        name: name.to_string(),
        x: values.to_vec(),
        nbinsx: stats::suggest_bin_count(present),
        marker: Marker {
            color: MarkerColor::Single(r.color.clone()),
            size: None,
        },
        xaxis: axis_id('x', idx),
        yaxis: axis_id('y', idx),
        showlegend: false,
        row,
        col,
    }
}

/// Axes and the column-name title of panel `idx`.
fn push_panel(layout: &mut Layout, r: &Resolved, name: &str, idx: usize) {
    let theme = r.template.theme();
    layout
        .axes
        .insert(axis_layout_key('x', idx), gridded_axis(&theme, None));
    layout
        .axes
        .insert(axis_layout_key('y', idx), gridded_axis(&theme, None));
    layout.annotations.push(Annotation {
        text: name.to_string(),
        xref: format!("{} domain", axis_id('x', idx)),
        yref: format!("{} domain", axis_id('y', idx)),
        x: Coord::Value(0.5),
        y: Coord::Value(1.0),
        showarrow: false,
        xanchor: "center",
        yanchor: "bottom",
        font: Some(Font {
            family: r.font.clone(),
            size: FONT_SIZE,
            color: None,
        }),
    });
}

fn ensure_rows(data: &Dataset) -> Result<()> {
    if data.is_empty() {
        return Err(ChartError::EmptyDataset);
    }
    Ok(())
}

/// Requested numeric columns, or all of them for an empty request.
fn select_numeric<'a>(data: &'a Dataset, requested: &[&str]) -> Result<Vec<&'a str>> {
    if requested.is_empty() {
        return Ok(data.numeric_column_names());
    }
    let mut out = Vec::with_capacity(requested.len());
    for name in requested {
        let column = data.column(name)?;
        if column.is_numeric() {
            out.push(column.name.as_str());
        } else {
            warn!("column `{name}` is not numeric, skipping");
        }
    }
    Ok(out)
}

/// Categories of `label_col` with their `value_col` values (or counts), sorted
/// descending and cut to `top_n`. Equal values keep row order. Rows missing
/// either the label or the value are dropped.
fn rank_rows(
    data: &Dataset,
    label_col: &str,
    value_col: Option<&str>,
    top_n: Option<usize>,
) -> Result<Ranked> {
    let labels = data.column(label_col)?;
    let mut rows: Vec<(String, f64)> = match value_col {
        None => stats::value_counts(labels)
            .into_iter()
            .map(|(label, n)| (label, n as f64))
            .collect(),
        Some(v) => {
            let values = data.numeric(v)?;
            values
                .iter()
                .enumerate()
                .filter_map(|(row, v)| match v {
                    Some(v) if !v.is_nan() => labels.label_at(row).map(|label| (label, *v)),
                    _ => None,
                })
                .collect()
        }
    };
    rows.sort_by(|a, b| b.1.total_cmp(&a.1));
    if let Some(n) = top_n {
        rows.truncate(n);
    }
    if rows.is_empty() {
        return Err(ChartError::InsufficientData(format!(
            "no values to display for `{label_col}`"
        )));
    }
    let (labels, values) = rows.into_iter().unzip();
    Ok(Ranked { labels, values })
}

fn bar_colors(r: &Resolved, ranked: &Ranked, req: &ChartRequest) -> Result<MarkerColor> {
    if req.highlight_top_n.is_none() && req.highlight_low_n.is_none() {
        return Ok(MarkerColor::Single(r.color.clone()));
    }
    highlight_colors(
        ranked.values.len(),
        &r.color,
        req.highlight_top_n.as_ref(),
        req.highlight_low_n.as_ref(),
    )
    .map(MarkerColor::PerPoint)
}

fn hex((r, g, b): (u8, u8, u8)) -> String {
    Color::from_rgb(r, g, b).to_string()
}

fn base_layout(r: &Resolved) -> Layout {
    let theme = r.template.theme();
    let mut annotations = Vec::new();
    if let Some(footer) = &r.heading.footer {
        annotations.push(Annotation {
            text: footer.clone(),
            xref: "paper".into(),
            yref: "paper".into(),
            x: Coord::Value(0.5),
            y: Coord::Value(-0.12),
            showarrow: false,
            xanchor: "center",
            yanchor: "top",
            font: Some(Font {
                family: r.font.clone(),
                size: FONT_SIZE - 1,
                color: None,
            }),
        });
    }
    Layout {
        title: Title {
            heading: r.heading.clone(),
            text: r.heading.markup(),
            x: TITLE_X,
            xanchor: "center",
            font: Font {
                family: r.font.clone(),
                size: TITLE_SIZE,
                color: None,
            },
        },
        width: r.width,
        height: r.height,
        font: Font {
            family: r.font.clone(),
            size: FONT_SIZE,
            color: Some(hex(theme.text)),
        },
        meta: LayoutMeta {
            template: r.template,
        },
        paper_bgcolor: hex(theme.paper_bg),
        plot_bgcolor: hex(theme.plot_bg),
        showlegend: false,
        margin: MARGINS,
        grid: None,
        axes: BTreeMap::new(),
        shapes: Vec::new(),
        annotations,
    }
}

fn gridded_axis(theme: &TemplateTheme, title: Option<&str>) -> Axis {
    Axis {
        title: title.map(|t| crate::figure::AxisTitle { text: t.to_string() }),
        showgrid: Some(theme.grid.is_some()),
        gridcolor: theme.grid.map(hex),
        ..Axis::default()
    }
}

/// Add a vertical line at `value` in `panel` with its label above the plot area.
fn push_line(layout: &mut Layout, role: LineRole, value: f64, panel: usize) {
    let (color, dash) = match &role {
        LineRole::Mean => (LINE_COLOR, "solid"),
        LineRole::Median => (LINE_COLOR, "dot"),
        LineRole::Reference { .. } => (HLINE_COLOR, "dash"),
    };
    let x = axis_id('x', panel);
    let y_domain = format!("{} domain", axis_id('y', panel));
    let shape = Shape {
        role,
        panel,
        kind: "line",
        xref: x.clone(),
        yref: y_domain.clone(),
        x0: value,
        x1: value,
        y0: 0.0,
        y1: 1.0,
        line: LineStyle {
            color: color.to_string(),
            width: 2,
            dash,
        },
    };
    layout.annotations.push(Annotation {
        text: shape.label(),
        xref: x,
        yref: y_domain,
        x: Coord::Value(value),
        y: Coord::Value(1.0),
        showarrow: false,
        xanchor: "left",
        yanchor: "bottom",
        font: None,
    });
    layout.shapes.push(shape);
}

/// `show_mean` / `show_median` lines over the non-missing `values`.
fn push_stat_lines(
    layout: &mut Layout,
    values: &[Option<f64>],
    req: &ChartRequest,
    panel: usize,
) -> Result<()> {
    if req.show_mean {
        push_line(layout, LineRole::Mean, stats::mean(values)?, panel);
    }
    if req.show_median {
        push_line(layout, LineRole::Median, stats::median(values)?, panel);
    }
    Ok(())
}

/// Statistic lines plus the reference line for single-panel value charts.
fn push_value_lines(layout: &mut Layout, values: &[f64], req: &ChartRequest) -> Result<()> {
    let values: Vec<Option<f64>> = values.iter().copied().map(Some).collect();
    push_stat_lines(layout, &values, req, 0)?;
    if let Some(at) = &req.add_hline_at {
        if !at.value.is_finite() {
            return Err(ChartError::InvalidConfig(format!(
                "reference line `{}` needs a finite value",
                at.label
            )));
        }
        push_line(
            layout,
            LineRole::Reference {
                label: at.label.clone(),
            },
            at.value,
            0,
        );
    } else if req.add_hline {
        push_line(
            layout,
            LineRole::Reference {
                label: "Mean".into(),
            },
            stats::mean(&values)?,
            0,
        );
    }
    Ok(())
}
