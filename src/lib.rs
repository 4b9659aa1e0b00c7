//! exploralytics
//!
//! A small charting library for exploratory data analysis. One [`ChartFacade`]
//! holds a global [`StyleConfig`]; each call takes a [`Dataset`] plus a
//! per-call [`ChartRequest`] and returns a [`Figure`]. Pairs with the
//! `exploralytics` CLI.
//!
//! ### Features
//! - Histogram grids over numeric columns, with mean/median lines
//! - Distribution panels pairing each histogram with an outlier box plot
//! - Horizontal bar and dot plots with top/bottom highlighting and reference lines
//! - Correlation heatmaps and correlation-with-target bars
//! - Categorical, sequential and diverging palettes via [`color_palette`]
//! - Figures serialize to plotly JSON, export to standalone HTML, or render to SVG/PNG
//! - CSV loading into a [`Dataset`] (see [`storage`])
//!
//! ### Example
//! ```no_run
//! use exploralytics::{ChartFacade, ChartRequest, StyleConfig, storage};
//!
//! let style = StyleConfig::builder().color("#2E75B6").height(600).build()?;
//! let viz = ChartFacade::new(style);
//! let data = storage::load_csv("sales.csv")?;
//!
//! let req = ChartRequest::new()
//!     .title("Sales by region")
//!     .highlight_top_n(2, "#006400")?
//!     .add_hline(true);
//! let fig = viz.plot_hbar(&data, "region", Some("sales"), &req)?;
//! fig.write("sales.svg")?;
//!
//! let hist = viz.plot_histograms(&data, &[], 3, &ChartRequest::new().show_mean(true))?;
//! hist.write("distributions.html")?;
//! println!("{:#?}", exploralytics::stats::summarize(data.numeric("sales")?));
//! # Ok::<(), exploralytics::ChartError>(())
//! ```

pub mod error;
pub mod facade;
pub mod figure;
pub mod models;
pub mod request;
pub mod stats;
pub mod storage;
pub mod style;
pub mod viz;

pub use error::{ChartError, Result};
pub use facade::ChartFacade;
pub use figure::{Figure, LineRole, Trace};
pub use models::{Column, ColumnData, Dataset};
pub use request::{ChartRequest, Highlight, ReferenceLine};
pub use style::{Color, Colorscale, Palette, StyleConfig, Template, color_palette};
