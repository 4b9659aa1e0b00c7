//! The chart description returned by every facade call.
//!
//! A [`Figure`] is a plain value: traces plus layout, serialized in the JSON shape
//! plotly.js understands. Display and export are passthrough capabilities:
//!
//! - [`Figure::to_json`] / [`Figure::write_json`]: the description itself
//! - [`Figure::write_html`]: a standalone page that draws it with plotly.js
//! - [`Figure::write_image`]: SVG or PNG rendered locally (see [`crate::viz`])

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{ChartError, Result};
use crate::style::{Color, Colorscale, Margins, Template};
use crate::viz::util::format_number;

const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Histogram(HistogramTrace),
    Box(BoxTrace),
    Bar(BarTrace),
    Scatter(ScatterTrace),
    Heatmap(HeatmapTrace),
}

/// One color for every point, or one per point.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MarkerColor {
    Single(Color),
    PerPoint(Vec<Color>),
}

impl MarkerColor {
    /// Per-point colors for `n` points.
    pub fn expand(&self, n: usize) -> Vec<Color> {
        match self {
            MarkerColor::Single(c) => vec![c.clone(); n],
            MarkerColor::PerPoint(v) => v.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub color: MarkerColor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramTrace {
    pub name: String,
    pub x: Vec<Option<f64>>,
    pub nbinsx: usize,
    pub marker: Marker,
    pub xaxis: String,
    pub yaxis: String,
    pub showlegend: bool,
    /// Zero-based grid position.
    #[serde(skip)]
    pub row: usize,
    #[serde(skip)]
    pub col: usize,
}

/// Horizontal box plot sharing a histogram's panel; only outliers drawn as points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxTrace {
    pub name: String,
    pub x: Vec<Option<f64>>,
    pub orientation: &'static str,
    pub boxpoints: &'static str,
    pub marker: Marker,
    pub xaxis: String,
    pub yaxis: String,
    pub showlegend: bool,
    #[serde(skip)]
    pub row: usize,
    #[serde(skip)]
    pub col: usize,
}

/// Horizontal bars: categories on `y`, lengths on `x`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarTrace {
    pub y: Vec<String>,
    pub x: Vec<f64>,
    pub orientation: &'static str,
    pub marker: Marker,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub textposition: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertemplate: Option<String>,
}

impl BarTrace {
    pub fn bar_colors(&self) -> Vec<Color> {
        self.marker.color.expand(self.x.len())
    }
}

/// Dot plot markers: categories on `y`, values on `x`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterTrace {
    pub y: Vec<String>,
    pub x: Vec<f64>,
    pub mode: &'static str,
    pub marker: Marker,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertemplate: Option<String>,
}

impl ScatterTrace {
    pub fn dot_colors(&self) -> Vec<Color> {
        self.marker.color.expand(self.x.len())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapTrace {
    #[serde(skip)]
    pub scale: Colorscale,
    pub z: Vec<Vec<Option<f64>>>,
    pub x: Vec<String>,
    pub y: Vec<String>,
    pub text: Vec<Vec<String>>,
    pub colorscale: Vec<(f64, String)>,
    pub zmin: f64,
    pub zmax: f64,
    pub showscale: bool,
    pub xgap: u32,
    pub ygap: u32,
    pub hoverongaps: bool,
    pub hoverinfo: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub family: String,
    pub size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Title parts as requested, before markup.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Heading {
    pub title: String,
    pub subtitle: Option<String>,
    pub footer: Option<String>,
    pub bold: bool,
}

impl Heading {
    /// `title<br><sup>subtitle</sup>`, with `<b>` around the title when bold.
    pub fn markup(&self) -> String {
        let title = if self.bold {
            format!("<b>{}</b>", self.title)
        } else {
            self.title.clone()
        };
        match self.subtitle.as_deref() {
            Some(sub) if !sub.is_empty() => format!("{title}<br><sup>{sub}</sup>"),
            _ => title,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    #[serde(skip)]
    pub heading: Heading,
    pub text: String,
    pub x: f64,
    pub xanchor: &'static str,
    pub font: Font,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTitle {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<AxisTitle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autorange: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showgrid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gridcolor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zeroline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickangle: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickformat: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<&'static str>,
}

impl Axis {
    pub fn titled<S: Into<String>>(text: S) -> Self {
        Self {
            title: Some(AxisTitle { text: text.into() }),
            ..Self::default()
        }
    }

    pub fn title_text(&self) -> Option<&str> {
        self.title.as_ref().map(|t| t.text.as_str())
    }

    pub fn is_reversed(&self) -> bool {
        self.autorange == Some("reversed")
    }
}

/// Subplot grid; panels fill it row by row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Grid {
    pub rows: usize,
    pub columns: usize,
    pub pattern: &'static str,
}

/// What a drawn line marks.
#[derive(Debug, Clone, PartialEq)]
pub enum LineRole {
    Mean,
    Median,
    Reference { label: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub color: String,
    pub width: u32,
    pub dash: &'static str,
}

/// A vertical line at `x0 == x1` spanning its panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shape {
    #[serde(skip)]
    pub role: LineRole,
    /// Zero-based panel index.
    #[serde(skip)]
    pub panel: usize,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub xref: String,
    pub yref: String,
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
    pub line: LineStyle,
}

impl Shape {
    pub fn value(&self) -> f64 {
        self.x0
    }

    /// `Mean: 6`, `Median: 2.5`, `Target: 7.5`.
    pub fn label(&self) -> String {
        let name = match &self.role {
            LineRole::Mean => "Mean",
            LineRole::Median => "Median",
            LineRole::Reference { label } => label.as_str(),
        };
        format!("{name}: {}", format_number(self.x0))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Coord {
    Value(f64),
    Category(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub text: String,
    pub xref: String,
    pub yref: String,
    pub x: Coord,
    pub y: Coord,
    pub showarrow: bool,
    pub xanchor: &'static str,
    pub yanchor: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutMeta {
    pub template: Template,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: Title,
    pub width: u32,
    pub height: u32,
    pub font: Font,
    pub meta: LayoutMeta,
    pub paper_bgcolor: String,
    pub plot_bgcolor: String,
    pub showlegend: bool,
    pub margin: Margins,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<Grid>,
    /// `xaxis`, `yaxis`, `xaxis2`, ... keyed as plotly names them.
    #[serde(flatten)]
    pub axes: BTreeMap<String, Axis>,
    pub shapes: Vec<Shape>,
    pub annotations: Vec<Annotation>,
}

impl Layout {
    pub fn template(&self) -> Template {
        self.meta.template
    }

    /// Axis of panel `panel` (zero-based), `'x'` or `'y'`.
    pub fn axis(&self, letter: char, panel: usize) -> Option<&Axis> {
        self.axes.get(&axis_layout_key(letter, panel))
    }
}

/// `x`, `x2`, `x3`, ... as traces refer to axes.
pub fn axis_id(letter: char, panel: usize) -> String {
    if panel == 0 {
        letter.to_string()
    } else {
        format!("{letter}{}", panel + 1)
    }
}

/// `xaxis`, `xaxis2`, ... as the layout keys axes.
pub fn axis_layout_key(letter: char, panel: usize) -> String {
    if panel == 0 {
        format!("{letter}axis")
    } else {
        format!("{letter}axis{}", panel + 1)
    }
}

impl Figure {
    pub fn heading(&self) -> &Heading {
        &self.layout.title.heading
    }

    /// Mean, median and explicit reference lines, in drawing order.
    pub fn lines(&self) -> &[Shape] {
        &self.layout.shapes
    }

    pub fn reference_lines(&self) -> impl Iterator<Item = &Shape> {
        self.layout
            .shapes
            .iter()
            .filter(|s| matches!(s.role, LineRole::Reference { .. }))
    }

    /// The bar trace, for single-trace bar charts.
    pub fn bar(&self) -> Option<&BarTrace> {
        self.data.iter().find_map(|t| match t {
            Trace::Bar(b) => Some(b),
            _ => None,
        })
    }

    pub fn dots(&self) -> Option<&ScatterTrace> {
        self.data.iter().find_map(|t| match t {
            Trace::Scatter(s) => Some(s),
            _ => None,
        })
    }

    pub fn heatmap(&self) -> Option<&HeatmapTrace> {
        self.data.iter().find_map(|t| match t {
            Trace::Heatmap(h) => Some(h),
            _ => None,
        })
    }

    pub fn histograms(&self) -> impl Iterator<Item = &HistogramTrace> {
        self.data.iter().filter_map(|t| match t {
            Trace::Histogram(h) => Some(h),
            _ => None,
        })
    }

    pub fn boxes(&self) -> impl Iterator<Item = &BoxTrace> {
        self.data.iter().filter_map(|t| match t {
            Trace::Box(b) => Some(b),
            _ => None,
        })
    }

    /// Histogram panels per grid row, top to bottom.
    pub fn panels_per_row(&self) -> Vec<usize> {
        let (rows, _) = self.grid_shape();
        let mut counts = vec![0; rows];
        for h in self.histograms() {
            if let Some(c) = counts.get_mut(h.row) {
                *c += 1;
            }
        }
        counts
    }

    /// Panel grid as `(rows, columns)`; single-panel charts report `(1, 1)`.
    pub fn grid_shape(&self) -> (usize, usize) {
        self.layout
            .grid
            .map(|g| (g.rows, g.columns))
            .unwrap_or((1, 1))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// A standalone HTML page that draws the figure with plotly.js from its CDN.
    pub fn to_html(&self) -> Result<String> {
        let json = serde_json::to_string(self)?.replace("</", "<\\/");
        let title = html_escape(&self.layout.title.heading.title);
        Ok(format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{PLOTLY_JS}"></script>
</head>
<body>
<div id="chart"></div>
<script>
const fig = {json};
Plotly.newPlot("chart", fig.data, fig.layout);
</script>
</body>
</html>
"#
        ))
    }

    pub fn write_html<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_html()?)?;
        Ok(())
    }

    /// Render to SVG or PNG, chosen by the path extension.
    pub fn write_image<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        crate::viz::render_to_file(self, path.as_ref())
    }

    /// Write in whichever format the extension names: json, html, svg or png.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "json" => self.write_json(path),
            "html" | "htm" => self.write_html(path),
            "svg" | "png" => self.write_image(path),
            other => Err(ChartError::UnsupportedFormat(other.to_string())),
        }
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
