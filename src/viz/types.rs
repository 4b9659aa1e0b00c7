//! Public types and constants for image export.

use std::path::Path;

use crate::error::ChartError;

/// Image formats the local renderer writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Svg,
    Png,
}

impl ImageFormat {
    /// Pick the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, ChartError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "svg" => Ok(ImageFormat::Svg),
            "png" => Ok(ImageFormat::Png),
            other => Err(ChartError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Title font size in rendered images.
pub const TITLE_FONT_PX: u32 = 22;
pub const SUBTITLE_FONT_PX: u32 = 14;
/// Tick labels and annotations.
pub const LABEL_FONT_PX: u32 = 12;
pub const PANEL_TITLE_FONT_PX: u32 = 14;
/// Outer margin around the plot area.
pub const MARGIN_PX: u32 = 16;
