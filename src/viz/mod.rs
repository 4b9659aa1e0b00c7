//! Local rendering of a [`Figure`] to **SVG** or **PNG** with plotters.
//!
//! The interactive page from [`Figure::write_html`] is the full-fidelity view;
//! this renderer draws the same traces for offline use:
//!
//! - histogram grids with per-panel mean/median lines, optionally with a box plot band
//! - horizontal bars and dot plots with highlight colors and reference lines
//! - correlation heatmaps with value labels in each cell
//! - title, subtitle and footer from the figure heading

pub mod text;
pub mod types;
pub mod util;

pub use types::ImageFormat;

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::path::Path;
use std::sync::Once;

use crate::error::Result;
use crate::figure::{BarTrace, BoxTrace, Figure, HeatmapTrace, HistogramTrace, ScatterTrace, Shape, Trace};
use crate::stats;
use crate::style::TemplateTheme;

use types::{LABEL_FONT_PX, MARGIN_PX, PANEL_TITLE_FONT_PX, SUBTITLE_FONT_PX, TITLE_FONT_PX};
use util::{render_err, rgb, rgb_str, rgb_tuple};

type Chart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// One-time registration of the bundled "sans-serif" faces for the `ab_glyph` text path,
/// which does not discover OS fonts.
static INIT_FONTS: Once = Once::new();

fn ensure_fonts_registered() {
    INIT_FONTS.call_once(|| {
        let _ = plotters::style::register_font(
            "sans-serif",
            FontStyle::Normal,
            include_bytes!("../../assets/DejaVuSans.ttf"),
        );
        let _ = plotters::style::register_font(
            "sans-serif",
            FontStyle::Bold,
            include_bytes!("../../assets/DejaVuSans-Bold.ttf"),
        );
    });
}

/// Render `fig` to `path`; the extension picks SVG or PNG.
pub fn render_to_file(fig: &Figure, path: &Path) -> Result<()> {
    let format = ImageFormat::from_path(path)?;
    ensure_fonts_registered();
    let size = (fig.layout.width, fig.layout.height);
    log::debug!("rendering {:?} {}x{} to {}", format, size.0, size.1, path.display());
    match format {
        ImageFormat::Svg => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            draw_figure(&root, fig)?;
            root.present().map_err(render_err)?;
        }
        ImageFormat::Png => {
            let root = BitMapBackend::new(path, size).into_drawing_area();
            draw_figure(&root, fig)?;
            root.present().map_err(render_err)?;
        }
    }
    Ok(())
}

/// Render `fig` to an SVG document in memory.
pub fn render_svg_string(fig: &Figure) -> Result<String> {
    ensure_fonts_registered();
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, (fig.layout.width, fig.layout.height))
            .into_drawing_area();
        draw_figure(&root, fig)?;
        root.present().map_err(render_err)?;
    }
    Ok(buf)
}

fn draw_figure<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, fig: &Figure) -> Result<()> {
    let theme = fig.layout.template().theme();
    root.fill(&rgb_tuple(theme.paper_bg)).map_err(render_err)?;
    let body = draw_heading(root, fig, &theme)?;

    let x_desc = fig.layout.axis('x', 0).and_then(|a| a.title_text());
    let y_desc = fig.layout.axis('y', 0).and_then(|a| a.title_text());
    let lines: Vec<&Shape> = fig.lines().iter().filter(|s| s.panel == 0).collect();
    let frame = Frame {
        theme: &theme,
        x_desc,
        y_desc,
    };

    match fig.data.first() {
        Some(Trace::Histogram(_) | Trace::Box(_)) => draw_histogram_grid(&body, fig, &theme),
        Some(Trace::Bar(bar)) => draw_hbar(&body, bar, &lines, &frame),
        Some(Trace::Scatter(dots)) => draw_dots(&body, dots, &lines, &frame),
        Some(Trace::Heatmap(heat)) => draw_heatmap(&body, heat, &frame),
        None => Ok(()),
    }
}

/// Theme and axis titles shared by the single-panel charts.
struct Frame<'a> {
    theme: &'a TemplateTheme,
    x_desc: Option<&'a str>,
    y_desc: Option<&'a str>,
}

fn font(px: u32, bold: bool) -> FontDesc<'static> {
    let style = if bold {
        FontStyle::Bold
    } else {
        FontStyle::Normal
    };
    FontDesc::new(FontFamily::SansSerif, px as f64, style)
}

/// Draw title, subtitle and footer; returns the area left for the plot.
fn draw_heading<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    fig: &Figure,
    theme: &TemplateTheme,
) -> Result<DrawingArea<DB, Shift>> {
    let heading = fig.heading();
    let (w, h) = root.dim_in_pixel();
    let max_text_px = w.saturating_sub(4 * MARGIN_PX).max(80);
    let ink = rgb_tuple(theme.text);
    let center_x = (w / 2) as i32;

    let mut y = MARGIN_PX as i32;
    let title_style = font(TITLE_FONT_PX, heading.bold)
        .color(&ink)
        .pos(Pos::new(HPos::Center, VPos::Top));
    let title = text::strip_markup(&heading.title);
    for line in text::wrap_text_to_width(&title, TITLE_FONT_PX, max_text_px) {
        root.draw_text(&line, &title_style, (center_x, y))
            .map_err(render_err)?;
        y += TITLE_FONT_PX as i32 + 6;
    }
    if let Some(sub) = heading.subtitle.as_deref() {
        let sub_style = font(SUBTITLE_FONT_PX, false)
            .color(&ink.mix(0.7))
            .pos(Pos::new(HPos::Center, VPos::Top));
        let sub = text::truncate_to_width(&text::strip_markup(sub), SUBTITLE_FONT_PX, max_text_px);
        root.draw_text(&sub, &sub_style, (center_x, y))
            .map_err(render_err)?;
        y += SUBTITLE_FONT_PX as i32 + 6;
    }

    let header_h = (y + 4).min(h as i32 / 3);
    let (_, rest) = root.split_vertically(header_h);
    let Some(footer) = heading.footer.as_deref() else {
        return Ok(rest);
    };

    let footer_h = (SUBTITLE_FONT_PX + MARGIN_PX) as i32;
    let rest_h = rest.dim_in_pixel().1 as i32;
    let (body, foot) = rest.split_vertically((rest_h - footer_h).max(40));
    let foot_style = font(LABEL_FONT_PX, false)
        .color(&ink.mix(0.7))
        .pos(Pos::new(HPos::Left, VPos::Top));
    let footer = text::truncate_to_width(&text::strip_markup(footer), LABEL_FONT_PX, max_text_px);
    foot.draw_text(&footer, &foot_style, (MARGIN_PX as i32, 2))
        .map_err(render_err)?;
    Ok(body)
}

struct MeshSpec<'a> {
    x_desc: Option<&'a str>,
    y_desc: Option<&'a str>,
    x_fmt: &'a dyn Fn(&f64) -> String,
    y_fmt: &'a dyn Fn(&f64) -> String,
    x_labels: Option<usize>,
    y_labels: Option<usize>,
    grid: bool,
}

fn draw_mesh<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    theme: &TemplateTheme,
    spec: MeshSpec<'_>,
) -> Result<()> {
    let ink = rgb_tuple(theme.text);
    let mut mesh = chart.configure_mesh();
    mesh.x_label_formatter(spec.x_fmt)
        .y_label_formatter(spec.y_fmt)
        .label_style(font(LABEL_FONT_PX, false).color(&ink))
        .axis_desc_style(font(LABEL_FONT_PX + 2, false).color(&ink))
        .axis_style(ink.mix(0.6));
    if let Some(d) = spec.x_desc {
        mesh.x_desc(d);
    }
    if let Some(d) = spec.y_desc {
        mesh.y_desc(d);
    }
    if let Some(n) = spec.x_labels {
        mesh.x_labels(n);
    }
    if let Some(n) = spec.y_labels {
        mesh.y_labels(n);
    }
    match theme.grid {
        Some(g) if spec.grid => {
            mesh.bold_line_style(rgb_tuple(g)).light_line_style(TRANSPARENT);
        }
        _ => {
            mesh.disable_mesh();
        }
    }
    mesh.draw().map_err(render_err)
}

/// Dash pattern as on/off fractions of the line length.
fn dash_pattern(dash: &str) -> Option<(f64, f64)> {
    match dash {
        "dash" => Some((0.05, 0.03)),
        "dot" => Some((0.01, 0.02)),
        _ => None,
    }
}

/// Segments of a vertical line at `x` from `y0` to `y1` in the given dash style.
fn dash_segments(x: f64, y0: f64, y1: f64, dash: &str) -> Vec<[(f64, f64); 2]> {
    let span = y1 - y0;
    let Some((on, off)) = dash_pattern(dash).filter(|_| span > 0.0) else {
        return vec![[(x, y0), (x, y1)]];
    };
    let mut out = Vec::new();
    let mut y = y0;
    while y < y1 {
        let end = (y + on * span).min(y1);
        out.push([(x, y), (x, end)]);
        y = end + off * span;
    }
    out
}

/// Draw mean, median and reference lines across `y0..y1`, each labelled at the top.
fn draw_value_lines<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    lines: &[&Shape],
    (y0, y1): (f64, f64),
    theme: &TemplateTheme,
) -> Result<()> {
    let ink = rgb_tuple(theme.text);
    for shape in lines {
        let color = rgb_str(&shape.line.color, RGBColor(128, 128, 128));
        let style = color.stroke_width(shape.line.width);
        let x = shape.value();
        chart
            .draw_series(
                dash_segments(x, y0, y1, shape.line.dash)
                    .into_iter()
                    .map(|seg| PathElement::new(seg.to_vec(), style)),
            )
            .map_err(render_err)?;
        let label_style = font(LABEL_FONT_PX, false)
            .color(&ink)
            .pos(Pos::new(HPos::Left, VPos::Top));
        chart
            .draw_series(std::iter::once(Text::new(
                format!(" {}", shape.label()),
                (x, y1),
                label_style,
            )))
            .map_err(render_err)?;
    }
    Ok(())
}

/// Extend `range` so every line is inside it.
fn widen_for_lines((lo, hi): (f64, f64), lines: &[&Shape]) -> (f64, f64) {
    lines.iter().fold((lo, hi), |(lo, hi), s| {
        let v = s.value();
        let pad = (hi - lo).abs() * 0.05;
        (
            if v <= lo { v - pad } else { lo },
            if v >= hi { v + pad } else { hi },
        )
    })
}

/// Label of the category drawn at axis position `v`, or empty between categories.
/// `reversed` puts the first label at the top.
fn category_at(labels: &[String], v: f64, reversed: bool) -> String {
    let pos = v.round();
    if (v - pos).abs() > 1e-6 || pos < 0.0 || pos >= labels.len() as f64 {
        return String::new();
    }
    let idx = pos as usize;
    let idx = if reversed { labels.len() - 1 - idx } else { idx };
    labels[idx].clone()
}

fn draw_histogram_grid<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    fig: &Figure,
    theme: &TemplateTheme,
) -> Result<()> {
    let (rows, cols) = fig.grid_shape();
    let cols = cols.max(1);
    let panels = area.split_evenly((rows.max(1), cols));
    for (idx, hist) in fig.histograms().enumerate() {
        let Some(panel) = panels.get(hist.row * cols + hist.col) else {
            continue;
        };
        let lines: Vec<&Shape> = fig.lines().iter().filter(|s| s.panel == idx).collect();
        let boxed = fig
            .boxes()
            .find(|b| b.row == hist.row && b.col == hist.col);
        draw_histogram(panel, hist, boxed, &lines, theme)?;
    }
    Ok(())
}

fn draw_histogram<DB: DrawingBackend>(
    panel: &DrawingArea<DB, Shift>,
    hist: &HistogramTrace,
    boxed: Option<&BoxTrace>,
    lines: &[&Shape],
    theme: &TemplateTheme,
) -> Result<()> {
    let bins = stats::histogram(&hist.x, hist.nbinsx);
    let fill = hist
        .marker
        .color
        .expand(1)
        .first()
        .map(rgb)
        .unwrap_or(BLACK);
    let span = match (bins.first(), bins.last()) {
        (Some(first), Some(last)) => (first.start, last.end),
        _ => (0.0, 1.0),
    };
    let (x0, x1) = widen_for_lines(span, lines);
    let peak = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1) as f64;
    let summary = boxed.and_then(|b| stats::box_stats(&b.x));
    // the box band sits above the tallest bar
    let top = if summary.is_some() {
        peak * BOX_BAND_TOP
    } else {
        peak * 1.15
    };
    let ink = rgb_tuple(theme.text);

    let mut chart = ChartBuilder::on(panel)
        .margin(8)
        .caption(&hist.name, font(PANEL_TITLE_FONT_PX, false).color(&ink))
        .x_label_area_size(28)
        .y_label_area_size(44)
        .build_cartesian_2d(x0..x1, 0f64..top)
        .map_err(render_err)?;
    chart
        .plotting_area()
        .fill(&rgb_tuple(theme.plot_bg))
        .map_err(render_err)?;

    let x_fmt = |v: &f64| util::tick_label(*v);
    let y_fmt = |v: &f64| format!("{v:.0}");
    draw_mesh(
        &mut chart,
        theme,
        MeshSpec {
            x_desc: None,
            y_desc: None,
            x_fmt: &x_fmt,
            y_fmt: &y_fmt,
            x_labels: Some(6),
            y_labels: Some(5),
            grid: true,
        },
    )?;

    chart
        .draw_series(bins.iter().map(|b| {
            Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], fill.filled())
        }))
        .map_err(render_err)?;
    chart
        .draw_series(bins.iter().map(|b| {
            Rectangle::new(
                [(b.start, 0.0), (b.end, b.count as f64)],
                rgb_tuple(theme.paper_bg).stroke_width(1),
            )
        }))
        .map_err(render_err)?;
    if let Some(summary) = &summary {
        let center = peak * (1.0 + BOX_BAND_TOP) / 2.0;
        let half = peak * (BOX_BAND_TOP - 1.0) / 5.0;
        draw_box(&mut chart, summary, (center, half), fill, theme)?;
    }
    draw_value_lines(&mut chart, lines, (0.0, top), theme)
}

/// Upper bound of a histogram panel that carries a box band, relative to the tallest bar.
const BOX_BAND_TOP: f64 = 1.6;

/// Horizontal box at height `center`: quartile box, median, whiskers and outlier points.
fn draw_box<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    summary: &stats::BoxStats,
    (center, half): (f64, f64),
    fill: RGBColor,
    theme: &TemplateTheme,
) -> Result<()> {
    let edge = rgb_tuple(theme.text).stroke_width(1);
    chart
        .draw_series([
            Rectangle::new(
                [(summary.q1, center - half), (summary.q3, center + half)],
                fill.mix(0.5).filled(),
            ),
            Rectangle::new(
                [(summary.q1, center - half), (summary.q3, center + half)],
                edge,
            ),
        ])
        .map_err(render_err)?;
    let strokes = [
        vec![(summary.median, center - half), (summary.median, center + half)],
        vec![(summary.lower_whisker, center), (summary.q1, center)],
        vec![(summary.q3, center), (summary.upper_whisker, center)],
        vec![
            (summary.lower_whisker, center - half / 2.0),
            (summary.lower_whisker, center + half / 2.0),
        ],
        vec![
            (summary.upper_whisker, center - half / 2.0),
            (summary.upper_whisker, center + half / 2.0),
        ],
    ];
    chart
        .draw_series(strokes.into_iter().map(|pts| PathElement::new(pts, edge)))
        .map_err(render_err)?;
    chart
        .draw_series(
            summary
                .outliers
                .iter()
                .map(|&v| Circle::new((v, center), 3, fill.stroke_width(1))),
        )
        .map_err(render_err)?;
    Ok(())
}

/// Category frame for bars and dots: values on x, categories top to bottom on y.
fn build_category_chart<'a, DB: DrawingBackend>(
    area: &'a DrawingArea<DB, Shift>,
    labels: &[String],
    (x0, x1): (f64, f64),
    theme: &TemplateTheme,
) -> Result<Chart<'a, DB>> {
    let n = labels.len().max(1) as f64;
    let mut chart = ChartBuilder::on(area)
        .margin(MARGIN_PX)
        .x_label_area_size(48)
        .y_label_area_size(util::category_label_area_px(labels, LABEL_FONT_PX))
        .build_cartesian_2d(x0..x1, -0.5..(n - 0.5))
        .map_err(render_err)?;
    chart
        .plotting_area()
        .fill(&rgb_tuple(theme.plot_bg))
        .map_err(render_err)?;
    Ok(chart)
}

fn draw_category_mesh<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    labels: &[String],
    frame: &Frame<'_>,
) -> Result<()> {
    let shown: Vec<String> = labels
        .iter()
        .map(|l| text::truncate_to_width(l, LABEL_FONT_PX, 200))
        .collect();
    let x_fmt = |v: &f64| util::tick_label(*v);
    let y_fmt = |v: &f64| category_at(&shown, *v, true);
    draw_mesh(
        chart,
        frame.theme,
        MeshSpec {
            x_desc: frame.x_desc,
            y_desc: frame.y_desc,
            x_fmt: &x_fmt,
            y_fmt: &y_fmt,
            x_labels: Some(8),
            y_labels: Some(labels.len().max(1)),
            grid: true,
        },
    )
}

fn draw_hbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    bar: &BarTrace,
    lines: &[&Shape],
    frame: &Frame<'_>,
) -> Result<()> {
    let n = bar.x.len();
    let range = widen_for_lines(util::value_range(&bar.x, true), lines);
    let mut chart = build_category_chart(area, &bar.y, range, frame.theme)?;
    draw_category_mesh(&mut chart, &bar.y, frame)?;

    let colors = bar.bar_colors();
    chart
        .draw_series(bar.x.iter().enumerate().map(|(i, &v)| {
            let yc = (n - 1 - i) as f64;
            let color = colors.get(i).map(rgb).unwrap_or(BLACK);
            Rectangle::new([(0.0, yc - 0.4), (v, yc + 0.4)], color.filled())
        }))
        .map_err(render_err)?;

    if let Some(texts) = &bar.text {
        let ink = rgb_tuple(frame.theme.text);
        chart
            .draw_series(bar.x.iter().zip(texts).enumerate().map(|(i, (&v, t))| {
                let yc = (n - 1 - i) as f64;
                let anchor = if v < 0.0 { HPos::Right } else { HPos::Left };
                let style = font(LABEL_FONT_PX, false)
                    .color(&ink)
                    .pos(Pos::new(anchor, VPos::Center));
                Text::new(format!(" {t} "), (v, yc), style)
            }))
            .map_err(render_err)?;
    }
    draw_value_lines(&mut chart, lines, (-0.5, n as f64 - 0.5), frame.theme)
}

fn draw_dots<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    dots: &ScatterTrace,
    lines: &[&Shape],
    frame: &Frame<'_>,
) -> Result<()> {
    let n = dots.x.len();
    let range = widen_for_lines(util::value_range(&dots.x, false), lines);
    let mut chart = build_category_chart(area, &dots.y, range, frame.theme)?;
    draw_category_mesh(&mut chart, &dots.y, frame)?;

    let radius = dots.marker.size.unwrap_or(12) as i32 / 2;
    let colors = dots.dot_colors();
    chart
        .draw_series(dots.x.iter().enumerate().map(|(i, &v)| {
            let color = colors.get(i).map(rgb).unwrap_or(BLACK);
            Circle::new((v, (n - 1 - i) as f64), radius, color.filled())
        }))
        .map_err(render_err)?;
    draw_value_lines(&mut chart, lines, (-0.5, n as f64 - 0.5), frame.theme)
}

fn draw_heatmap<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    heat: &HeatmapTrace,
    frame: &Frame<'_>,
) -> Result<()> {
    let cols = heat.x.len().max(1);
    let rows = heat.y.len().max(1);
    let label_px = util::category_label_area_px(&heat.y, LABEL_FONT_PX);
    let mut chart = ChartBuilder::on(area)
        .margin(MARGIN_PX)
        .x_label_area_size(40)
        .y_label_area_size(label_px)
        .build_cartesian_2d(-0.5..(cols as f64 - 0.5), -0.5..(rows as f64 - 0.5))
        .map_err(render_err)?;
    chart
        .plotting_area()
        .fill(&rgb_tuple(frame.theme.plot_bg))
        .map_err(render_err)?;

    let x_fmt = |v: &f64| category_at(&heat.x, *v, false);
    let y_fmt = |v: &f64| category_at(&heat.y, *v, true);
    draw_mesh(
        &mut chart,
        frame.theme,
        MeshSpec {
            x_desc: frame.x_desc,
            y_desc: frame.y_desc,
            x_fmt: &x_fmt,
            y_fmt: &y_fmt,
            x_labels: Some(cols),
            y_labels: Some(rows),
            grid: false,
        },
    )?;

    let span = (heat.zmax - heat.zmin).max(f64::EPSILON);
    let mut cells = Vec::new();
    for (i, row) in heat.z.iter().enumerate() {
        let yc = (rows - 1 - i) as f64;
        for (j, cell) in row.iter().enumerate() {
            if let Some(v) = cell {
                cells.push((j as f64, yc, *v));
            }
        }
    }
    chart
        .draw_series(cells.iter().map(|&(xc, yc, v)| {
            let color = rgb_tuple(heat.scale.sample((v - heat.zmin) / span));
            Rectangle::new(
                [(xc - 0.49, yc - 0.49), (xc + 0.49, yc + 0.49)],
                color.filled(),
            )
        }))
        .map_err(render_err)?;
    let ink = rgb_tuple(frame.theme.text);
    chart
        .draw_series(cells.iter().map(|&(xc, yc, v)| {
            let style = font(LABEL_FONT_PX, false)
                .color(&ink)
                .pos(Pos::new(HPos::Center, VPos::Center));
            Text::new(format!("{v:.2}"), (xc, yc), style)
        }))
        .map_err(render_err)?;
    Ok(())
}
