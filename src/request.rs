//! Per-call chart parameters.
//!
//! Every field is optional. Unset fields fall back to the facade's
//! [`StyleConfig`](crate::style::StyleConfig) or to the chart kind's defaults,
//! and nothing set here outlives the call it is passed to.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::style::{Color, Colorscale, Template};

/// Color the first (or last) `count` rows of the descending order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub count: usize,
    pub color: Color,
}

impl Highlight {
    pub fn new(count: usize, color: &str) -> Result<Self> {
        Ok(Self {
            count,
            color: Color::parse(color)?,
        })
    }
}

/// An explicit reference line with its label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLine {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartRequest {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub footer: Option<String>,

    pub show_mean: bool,
    pub show_median: bool,

    /// Keep only the first `n` categories of the descending order.
    pub top_n: Option<usize>,
    pub highlight_top_n: Option<Highlight>,
    pub highlight_low_n: Option<Highlight>,

    /// Draw a line at the mean of the displayed values.
    pub add_hline: bool,
    /// Draw a labelled line at an explicit value; wins over `add_hline`.
    pub add_hline_at: Option<ReferenceLine>,

    pub color: Option<Color>,
    pub height: Option<u32>,
    pub width: Option<u32>,
    pub template: Option<Template>,
    pub font: Option<String>,
    pub title_bold: Option<bool>,
    pub colorscale: Option<Colorscale>,
}

impl ChartRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn subtitle<S: Into<String>>(mut self, subtitle: S) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn footer<S: Into<String>>(mut self, footer: S) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn show_mean(mut self, on: bool) -> Self {
        self.show_mean = on;
        self
    }

    pub fn show_median(mut self, on: bool) -> Self {
        self.show_median = on;
        self
    }

    pub fn top_n(mut self, n: usize) -> Self {
        self.top_n = Some(n);
        self
    }

    pub fn highlight_top_n(mut self, count: usize, color: &str) -> Result<Self> {
        self.highlight_top_n = Some(Highlight::new(count, color)?);
        Ok(self)
    }

    pub fn highlight_low_n(mut self, count: usize, color: &str) -> Result<Self> {
        self.highlight_low_n = Some(Highlight::new(count, color)?);
        Ok(self)
    }

    pub fn add_hline(mut self, on: bool) -> Self {
        self.add_hline = on;
        self
    }

    pub fn add_hline_at<S: Into<String>>(mut self, label: S, value: f64) -> Self {
        self.add_hline_at = Some(ReferenceLine {
            label: label.into(),
            value,
        });
        self
    }

    pub fn color(mut self, color: &str) -> Result<Self> {
        self.color = Some(Color::parse(color)?);
        Ok(self)
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
}
