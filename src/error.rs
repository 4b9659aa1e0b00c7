//! Error kinds raised by chart construction and export.

use thiserror::Error;

/// Everything that can go wrong while building or exporting a chart.
///
/// Chart construction is all-or-nothing: an error means no figure was produced.
#[derive(Debug, Error)]
pub enum ChartError {
    /// A column named by the caller does not exist in the dataset.
    #[error("column `{column}` not found in dataset")]
    MissingColumn { column: String },

    /// The dataset has zero rows.
    #[error("dataset has no rows")]
    EmptyDataset,

    /// Highlight counts do not fit the rows that are displayed.
    #[error("cannot highlight {top} top and {low} bottom rows out of {rows}")]
    InvalidHighlight { top: usize, low: usize, rows: usize },

    /// A statistic or chart needs values that are not there.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// A style or request option is out of range or unknown.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unsupported export format `{0}` (expected json, html, svg or png)")]
    UnsupportedFormat(String),

    #[error("render failed: {0}")]
    Render(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T, E = ChartError> = std::result::Result<T, E>;
