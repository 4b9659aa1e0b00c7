//! Small helpers shared by the renderer and the facade: colors, number labels, ranges.

use num_format::{Locale, ToFormattedString};
use plotters::prelude::RGBColor;

use crate::error::ChartError;
use crate::style::Color;

use super::text::estimate_text_width_px;

#[inline]
pub fn rgb(color: &Color) -> RGBColor {
    let (r, g, b) = color.rgb();
    RGBColor(r, g, b)
}

#[inline]
pub fn rgb_tuple((r, g, b): (u8, u8, u8)) -> RGBColor {
    RGBColor(r, g, b)
}

/// Parse a layout color string (`#RRGGBB` or a basic name), falling back to `fallback`.
pub fn rgb_str(s: &str, fallback: RGBColor) -> RGBColor {
    Color::parse(s).map(|c| rgb(&c)).unwrap_or(fallback)
}

/// Label for a statistic or reference value: thousands separators, two decimals,
/// trailing zeros trimmed (`1,234.5`, `6`, `-0.25`).
pub fn format_number(v: f64) -> String {
    if !v.is_finite() {
        return "NA".to_string();
    }
    let rounded = (v * 100.0).round() / 100.0;
    let int_part = rounded.trunc() as i64;
    let frac = format!("{:.2}", rounded.abs().fract());
    let frac = frac.trim_start_matches('0').trim_end_matches('0');
    let sign = if rounded < 0.0 && int_part == 0 { "-" } else { "" };
    let int_str = int_part.to_formatted_string(&Locale::en);
    if frac == "." {
        format!("{sign}{int_str}")
    } else {
        format!("{sign}{int_str}{frac}")
    }
}

/// Axis tick label: fewer decimals as magnitude grows.
pub fn tick_label(v: f64) -> String {
    let a = v.abs();
    let prec = if a >= 100.0 {
        0
    } else if a >= 10.0 {
        1
    } else {
        2
    };
    format!("{:.*}", prec, v)
}

/// Value-axis range covering `values` and zero, padded by 10% on the open sides.
pub fn value_range(values: &[f64], include_zero: bool) -> (f64, f64) {
    let mut lo = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if include_zero {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }
    if (hi - lo).abs() < f64::EPSILON {
        lo -= 1.0;
        hi += 1.0;
    }
    let pad = (hi - lo) * 0.1;
    let lo = if include_zero && lo == 0.0 { 0.0 } else { lo - pad };
    let hi = if include_zero && hi == 0.0 { 0.0 } else { hi + pad };
    (lo, hi)
}

/// Left label area wide enough for the longest category label, clamped.
pub fn category_label_area_px(labels: &[String], font_px: u32) -> u32 {
    let widest = labels
        .iter()
        .map(|l| estimate_text_width_px(l, font_px))
        .max()
        .unwrap_or(0);
    widest.saturating_add(18).clamp(48, 220)
}

pub fn render_err<E: std::fmt::Debug>(e: E) -> ChartError {
    ChartError::Render(format!("{e:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_labels() {
        assert_eq!(format_number(6.0), "6");
        assert_eq!(format_number(7.5), "7.5");
        assert_eq!(format_number(1234.567), "1,234.57");
        assert_eq!(format_number(-0.25), "-0.25");
        assert_eq!(format_number(f64::NAN), "NA");
    }

    #[test]
    fn ranges_include_zero_for_bars() {
        let (lo, hi) = value_range(&[3.0, 10.0], true);
        assert_eq!(lo, 0.0);
        assert!(hi > 10.0);
        let (lo, hi) = value_range(&[-0.5, 0.8], true);
        assert!(lo < -0.5 && hi > 0.8);
    }
}
