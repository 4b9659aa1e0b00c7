//! Global style defaults shared by every chart a [`ChartFacade`](crate::ChartFacade) builds.
//!
//! A [`StyleConfig`] is created once and never mutated by chart calls. Per-call
//! changes go through [`ChartRequest`](crate::ChartRequest) overrides instead.
//!
//! # Example
//!
//! ```rust
//! use exploralytics::style::{StyleConfig, Template};
//!
//! let style = StyleConfig::builder()
//!     .color("#006400")
//!     .width(1200)
//!     .template(Template::PlotlyWhite)
//!     .title_bold(true)
//!     .build()?;
//! assert_eq!(style.width, 1200);
//! # Ok::<(), exploralytics::ChartError>(())
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::{ChartError, Result};

pub const DEFAULT_COLOR: &str = "#94C973";
pub const DEFAULT_HEIGHT: u32 = 768;
pub const DEFAULT_WIDTH: u32 = 1366;
pub const DEFAULT_FONT: &str = "Arial, sans-serif";

/// Base font size for tick labels and annotations.
pub const FONT_SIZE: u32 = 12;
/// Title font size.
pub const TITLE_SIZE: u32 = 16;
/// Centered title.
pub const TITLE_X: f64 = 0.5;
/// Reference and statistic lines.
pub const LINE_COLOR: &str = "#D3D3D3";
pub const HLINE_COLOR: &str = "grey";
pub const NEGATIVE_CORR_COLOR: &str = "#FF9999";
pub const POSITIVE_CORR_COLOR: &str = "#2E75B6";

/// Plot margins in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margins {
    #[serde(rename = "l")]
    pub left: u32,
    #[serde(rename = "r")]
    pub right: u32,
    #[serde(rename = "t")]
    pub top: u32,
    #[serde(rename = "b")]
    pub bottom: u32,
}

pub const MARGINS: Margins = Margins {
    left: 50,
    right: 50,
    top: 80,
    bottom: 50,
};

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}){1,2}$").expect("valid regex"));

/// CSS basic color keywords accepted in place of hex codes.
const NAMED_COLORS: [(&str, (u8, u8, u8)); 18] = [
    ("black", (0, 0, 0)),
    ("white", (255, 255, 255)),
    ("red", (255, 0, 0)),
    ("green", (0, 128, 0)),
    ("blue", (0, 0, 255)),
    ("yellow", (255, 255, 0)),
    ("orange", (255, 165, 0)),
    ("purple", (128, 0, 128)),
    ("grey", (128, 128, 128)),
    ("gray", (128, 128, 128)),
    ("lightgrey", (211, 211, 211)),
    ("lightgray", (211, 211, 211)),
    ("navy", (0, 0, 128)),
    ("teal", (0, 128, 128)),
    ("maroon", (128, 0, 0)),
    ("olive", (128, 128, 0)),
    ("silver", (192, 192, 192)),
    ("lime", (0, 255, 0)),
];

/// A chart color: `#RGB`, `#RRGGBB` or a CSS basic color name.
///
/// The spelling as given is kept for serialization; [`Color::rgb`] gives the
/// decoded channels for raster output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    raw: String,
    rgb: (u8, u8, u8),
}

impl Color {
    pub fn parse(s: &str) -> Result<Self> {
        let t = s.trim();
        if HEX_COLOR.is_match(t) {
            let hex = &t[1..];
            let expand = |c: &str| u8::from_str_radix(&c.repeat(2), 16);
            let rgb = if hex.len() == 3 {
                (
                    expand(&hex[0..1]),
                    expand(&hex[1..2]),
                    expand(&hex[2..3]),
                )
            } else {
                (
                    u8::from_str_radix(&hex[0..2], 16),
                    u8::from_str_radix(&hex[2..4], 16),
                    u8::from_str_radix(&hex[4..6], 16),
                )
            };
            return match rgb {
                (Ok(r), Ok(g), Ok(b)) => Ok(Self {
                    raw: t.to_string(),
                    rgb: (r, g, b),
                }),
                _ => Err(invalid_color(s)),
            };
        }
        let lower = t.to_ascii_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, rgb)| Self {
                raw: lower.clone(),
                rgb: *rgb,
            })
            .ok_or_else(|| invalid_color(s))
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        self.rgb
    }

    /// Build from channels; spelled as `#RRGGBB`.
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            raw: format!("#{r:02X}{g:02X}{b:02X}"),
            rgb: (r, g, b),
        }
    }
}

fn invalid_color(s: &str) -> ChartError {
    ChartError::InvalidConfig(format!(
        "color `{s}` must be a hex code (e.g. '#94C973') or a basic color name"
    ))
}

impl FromStr for Color {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self> {
        Color::parse(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ChartError;

    fn try_from(s: String) -> Result<Self> {
        Color::parse(&s)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.raw
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Known layout presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Template {
    #[default]
    SimpleWhite,
    PlotlyWhite,
    Plotly,
    PlotlyDark,
    Ggplot2,
    Seaborn,
    Presentation,
    None,
}

/// Background and grid colors a template implies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateTheme {
    pub paper_bg: (u8, u8, u8),
    pub plot_bg: (u8, u8, u8),
    /// `None` hides grid lines.
    pub grid: Option<(u8, u8, u8)>,
    pub text: (u8, u8, u8),
}

impl Template {
    pub const ALL: [Template; 8] = [
        Template::SimpleWhite,
        Template::PlotlyWhite,
        Template::Plotly,
        Template::PlotlyDark,
        Template::Ggplot2,
        Template::Seaborn,
        Template::Presentation,
        Template::None,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Template::SimpleWhite => "simple_white",
            Template::PlotlyWhite => "plotly_white",
            Template::Plotly => "plotly",
            Template::PlotlyDark => "plotly_dark",
            Template::Ggplot2 => "ggplot2",
            Template::Seaborn => "seaborn",
            Template::Presentation => "presentation",
            Template::None => "none",
        }
    }

    pub fn theme(self) -> TemplateTheme {
        const WHITE: (u8, u8, u8) = (255, 255, 255);
        const INK: (u8, u8, u8) = (42, 63, 95);
        match self {
            Template::SimpleWhite | Template::None => TemplateTheme {
                paper_bg: WHITE,
                plot_bg: WHITE,
                grid: None,
                text: (0, 0, 0),
            },
            Template::PlotlyWhite | Template::Presentation => TemplateTheme {
                paper_bg: WHITE,
                plot_bg: WHITE,
                grid: Some((235, 240, 248)),
                text: INK,
            },
            Template::Plotly => TemplateTheme {
                paper_bg: WHITE,
                plot_bg: (229, 236, 246),
                grid: Some(WHITE),
                text: INK,
            },
            Template::PlotlyDark => TemplateTheme {
                paper_bg: (17, 17, 17),
                plot_bg: (17, 17, 17),
                grid: Some((40, 52, 66)),
                text: (242, 245, 250),
            },
            Template::Ggplot2 => TemplateTheme {
                paper_bg: WHITE,
                plot_bg: (235, 235, 235),
                grid: Some(WHITE),
                text: (51, 51, 51),
            },
            Template::Seaborn => TemplateTheme {
                paper_bg: WHITE,
                plot_bg: (234, 234, 242),
                grid: Some(WHITE),
                text: (36, 36, 36),
            },
        }
    }
}

impl FromStr for Template {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Template::ALL
            .into_iter()
            .find(|t| t.name() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = Template::ALL.iter().map(|t| t.name()).collect();
                ChartError::InvalidConfig(format!(
                    "unknown template `{s}`, expected one of: {}",
                    known.join(", ")
                ))
            })
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Heatmap color scales, low to high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Colorscale {
    #[default]
    Earth,
    RdBu,
}

impl Colorscale {
    pub fn stops(self) -> &'static [(u8, u8, u8)] {
        match self {
            Colorscale::Earth => &[
                (161, 105, 40),
                (189, 146, 90),
                (214, 189, 141),
                (237, 234, 194),
                (181, 200, 184),
                (121, 167, 172),
                (40, 135, 161),
            ],
            Colorscale::RdBu => &[
                (103, 0, 31),
                (178, 24, 43),
                (214, 96, 77),
                (244, 165, 130),
                (253, 219, 199),
                (247, 247, 247),
                (209, 229, 240),
                (146, 197, 222),
                (67, 147, 195),
                (33, 102, 172),
                (5, 48, 97),
            ],
        }
    }

    /// `[[position, "rgb(r, g, b)"], ...]` pairs as plotly expects them.
    pub fn to_plotly(self) -> Vec<(f64, String)> {
        let stops = self.stops();
        let last = (stops.len() - 1) as f64;
        stops
            .iter()
            .enumerate()
            .map(|(i, (r, g, b))| (i as f64 / last, format!("rgb({r}, {g}, {b})")))
            .collect()
    }

    /// Linear interpolation at `t` in `[0, 1]`.
    pub fn sample(self, t: f64) -> (u8, u8, u8) {
        let stops = self.stops();
        let t = if t.is_nan() { 0.5 } else { t.clamp(0.0, 1.0) };
        let pos = t * (stops.len() - 1) as f64;
        let i = (pos.floor() as usize).min(stops.len() - 2);
        let f = pos - i as f64;
        let (a, b) = (stops[i], stops[i + 1]);
        let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * f).round() as u8;
        (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
    }
}

/// Discrete color palettes for coloring several series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    #[default]
    Categorical,
    Sequential,
    Diverging,
}

impl Palette {
    pub const ALL: [Palette; 3] = [Palette::Categorical, Palette::Sequential, Palette::Diverging];

    pub fn name(self) -> &'static str {
        match self {
            Palette::Categorical => "categorical",
            Palette::Sequential => "sequential",
            Palette::Diverging => "diverging",
        }
    }

    fn table(self) -> &'static [(u8, u8, u8)] {
        match self {
            Palette::Categorical => &[
                (0x63, 0x6E, 0xFA),
                (0xEF, 0x55, 0x3B),
                (0x00, 0xCC, 0x96),
                (0xAB, 0x63, 0xFA),
                (0xFF, 0xA1, 0x5A),
                (0x19, 0xD3, 0xF3),
                (0xFF, 0x66, 0x92),
                (0xB6, 0xE8, 0x80),
            ],
            Palette::Sequential => &[
                (0xF0, 0xF9, 0x21),
                (0xFA, 0xBA, 0x39),
                (0xF4, 0x88, 0x49),
                (0xDE, 0x5F, 0x65),
                (0xBC, 0x3F, 0x86),
                (0x8C, 0x29, 0x81),
                (0x4F, 0x12, 0x7B),
                (0x00, 0x00, 0x04),
            ],
            Palette::Diverging => &[
                (0x2A, 0x78, 0x8E),
                (0x7A, 0xD4, 0xE6),
                (0xB6, 0xEE, 0xF4),
                (0xFF, 0xFF, 0xFF),
                (0xF8, 0xB7, 0xA1),
                (0xE4, 0x56, 0x41),
                (0xB4, 0x04, 0x26),
            ],
        }
    }

    /// The palette's own colors, in order.
    pub fn colors(self) -> Vec<Color> {
        self.table()
            .iter()
            .map(|&(r, g, b)| Color::from_rgb(r, g, b))
            .collect()
    }
}

impl FromStr for Palette {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Palette::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| {
                ChartError::InvalidConfig(format!(
                    "unknown palette `{s}`, expected categorical, sequential or diverging"
                ))
            })
    }
}

/// `num_colors` colors of `palette`, repeating it as needed; the whole palette for `None`.
pub fn color_palette(palette: Palette, num_colors: Option<usize>) -> Vec<Color> {
    let colors = palette.colors();
    match num_colors {
        None => colors,
        Some(n) => colors.into_iter().cycle().take(n).collect(),
    }
}

/// Global visual defaults of one facade instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub color: Color,
    pub height: u32,
    pub width: u32,
    pub template: Template,
    pub font: String,
    pub title_bold: bool,
    pub colorscale: Colorscale,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            color: Color::from_rgb(0x94, 0xC9, 0x73),
            height: DEFAULT_HEIGHT,
            width: DEFAULT_WIDTH,
            template: Template::default(),
            font: DEFAULT_FONT.to_string(),
            title_bold: false,
            colorscale: Colorscale::default(),
        }
    }
}

impl StyleConfig {
    pub fn builder() -> StyleConfigBuilder {
        StyleConfigBuilder::default()
    }

    /// Check value ranges; deserialized configs go through this too.
    pub fn validate(&self) -> Result<()> {
        validate_size(self.height, self.width)?;
        validate_font(&self.font)
    }

    /// Read a JSON style file; unspecified fields take their defaults.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: StyleConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }
}

pub(crate) fn validate_size(height: u32, width: u32) -> Result<()> {
    if height == 0 || width == 0 {
        return Err(ChartError::InvalidConfig(format!(
            "height and width must be positive, got {width}x{height}"
        )));
    }
    Ok(())
}

pub(crate) fn validate_font(font: &str) -> Result<()> {
    if font.trim().is_empty() {
        return Err(ChartError::InvalidConfig("font family must not be empty".into()));
    }
    Ok(())
}

/// Builder collecting raw option values; all validation happens in [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct StyleConfigBuilder {
    color: Option<String>,
    height: Option<u32>,
    width: Option<u32>,
    template: Option<Template>,
    font: Option<String>,
    title_bold: Option<bool>,
    colorscale: Option<Colorscale>,
}

impl StyleConfigBuilder {
    pub fn color<S: Into<String>>(mut self, color: S) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn template(mut self, template: Template) -> Self {
        self.template = Some(template);
        self
    }

    pub fn font<S: Into<String>>(mut self, font: S) -> Self {
        self.font = Some(font.into());
        self
    }

    pub fn title_bold(mut self, bold: bool) -> Self {
        self.title_bold = Some(bold);
        self
    }

    pub fn colorscale(mut self, colorscale: Colorscale) -> Self {
        self.colorscale = Some(colorscale);
        self
    }

    pub fn build(self) -> Result<StyleConfig> {
        let d = StyleConfig::default();
        let cfg = StyleConfig {
            color: match self.color {
                Some(c) => Color::parse(&c)?,
                None => d.color,
            },
            height: self.height.unwrap_or(d.height),
            width: self.width.unwrap_or(d.width),
            template: self.template.unwrap_or(d.template),
            font: self.font.unwrap_or(d.font),
            title_bold: self.title_bold.unwrap_or(d.title_bold),
            colorscale: self.colorscale.unwrap_or(d.colorscale),
        };
        cfg.validate()?;
        Ok(cfg)
    }
}
