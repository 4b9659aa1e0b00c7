use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};

use exploralytics::{
    ChartFacade, ChartRequest, Color, Colorscale, Dataset, Highlight, ReferenceLine, StyleConfig,
    Template,
};
use exploralytics::{stats, storage};

#[derive(Parser, Debug)]
#[command(
    name = "exploralytics",
    version,
    about = "Exploratory charts from CSV data: histograms, bars, dots & correlations"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Grid of histograms, one panel per numeric column.
    Hist(HistArgs),
    /// Histogram and outlier box plot per numeric column.
    Dist(HistArgs),
    /// Horizontal bars per category: counts, or the values of --value.
    Bar(BarArgs),
    /// Dot plot of one value per category.
    Dots(DotsArgs),
    /// Correlation heatmap of numeric columns.
    Corr(CorrArgs),
    /// Correlation of every numeric column with a target column.
    CorrTarget(CorrTargetArgs),
    /// Print summary statistics of numeric columns.
    Stats(StatsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ScaleArg {
    Earth,
    Rdbu,
}

impl From<ScaleArg> for Colorscale {
    fn from(s: ScaleArg) -> Self {
        match s {
            ScaleArg::Earth => Colorscale::Earth,
            ScaleArg::Rdbu => Colorscale::RdBu,
        }
    }
}

/// Input, output and per-chart style flags shared by every chart command.
#[derive(Args, Debug)]
struct ChartArgs {
    /// CSV file with a header row.
    #[arg(short, long)]
    input: PathBuf,
    /// Output path; the extension selects json, html, svg or png.
    #[arg(short, long)]
    out: PathBuf,
    /// JSON file with global style defaults (color, height, width, template, font, ...).
    #[arg(long)]
    style: Option<PathBuf>,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    subtitle: Option<String>,
    /// Note shown below the plot.
    #[arg(long)]
    footer: Option<String>,
    /// Base color: #RGB, #RRGGBB or a basic color name.
    #[arg(long)]
    color: Option<Color>,
    #[arg(long)]
    width: Option<u32>,
    #[arg(long)]
    height: Option<u32>,
    /// simple_white, plotly_white, plotly, plotly_dark, ggplot2, seaborn, presentation or none.
    #[arg(long)]
    template: Option<Template>,
    #[arg(long)]
    font: Option<String>,
    /// Bold chart title; `--bold=false` overrides a bold style file.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    bold: Option<bool>,
}

/// Ordering, highlighting and reference-line flags for bars and dots.
#[derive(Args, Debug)]
struct RankArgs {
    /// Keep only the N largest categories.
    #[arg(long)]
    top_n: Option<usize>,
    /// Color the N largest rows, as N:COLOR (e.g. 2:#006400).
    #[arg(long, value_parser = parse_highlight)]
    highlight_top: Option<Highlight>,
    /// Color the N smallest rows, as N:COLOR.
    #[arg(long, value_parser = parse_highlight)]
    highlight_low: Option<Highlight>,
    /// Line at the mean of the displayed values.
    #[arg(long, default_value_t = false)]
    hline: bool,
    /// Labelled line at a fixed value, as LABEL=VALUE; wins over --hline.
    #[arg(long, value_parser = parse_reference)]
    hline_at: Option<ReferenceLine>,
}

#[derive(Args, Debug)]
struct HistArgs {
    #[command(flatten)]
    chart: ChartArgs,
    /// Columns to plot, comma separated (default: every numeric column).
    #[arg(long, value_delimiter = ',')]
    columns: Vec<String>,
    /// Panels per grid row.
    #[arg(long, default_value_t = 1)]
    num_cols: usize,
    #[arg(long, default_value_t = false)]
    show_mean: bool,
    #[arg(long, default_value_t = false)]
    show_median: bool,
}

#[derive(Args, Debug)]
struct BarArgs {
    #[command(flatten)]
    chart: ChartArgs,
    #[command(flatten)]
    rank: RankArgs,
    /// Category column.
    #[arg(long)]
    category: String,
    /// Value column; without it, categories are counted.
    #[arg(long)]
    value: Option<String>,
}

#[derive(Args, Debug)]
struct DotsArgs {
    #[command(flatten)]
    chart: ChartArgs,
    #[command(flatten)]
    rank: RankArgs,
    /// Label column.
    #[arg(long)]
    label: String,
    /// Value column.
    #[arg(long)]
    value: String,
}

#[derive(Args, Debug)]
struct CorrArgs {
    #[command(flatten)]
    chart: ChartArgs,
    /// Columns to correlate, comma separated (default: every numeric column).
    #[arg(long, value_delimiter = ',')]
    columns: Vec<String>,
    #[arg(long, value_enum)]
    colorscale: Option<ScaleArg>,
}

#[derive(Args, Debug)]
struct CorrTargetArgs {
    #[command(flatten)]
    chart: ChartArgs,
    /// Target column the features are correlated with.
    #[arg(long)]
    target: String,
}

#[derive(Args, Debug)]
struct StatsArgs {
    /// CSV file with a header row.
    #[arg(short, long)]
    input: PathBuf,
    /// Columns to summarize, comma separated (default: every numeric column).
    #[arg(long, value_delimiter = ',')]
    columns: Vec<String>,
}

fn parse_highlight(s: &str) -> std::result::Result<Highlight, String> {
    let (n, color) = s
        .split_once(':')
        .ok_or_else(|| format!("expected N:COLOR, got `{s}`"))?;
    let n = n
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("invalid count `{n}`: {e}"))?;
    Highlight::new(n, color.trim()).map_err(|e| e.to_string())
}

fn parse_reference(s: &str) -> std::result::Result<ReferenceLine, String> {
    let (label, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected LABEL=VALUE, got `{s}`"))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid value `{value}`: {e}"))?;
    Ok(ReferenceLine {
        label: label.trim().to_string(),
        value,
    })
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            let s = format!("{:.4}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

impl ChartArgs {
    fn facade(&self) -> Result<ChartFacade> {
        let style = match &self.style {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("reading style file {}", path.display()))?;
                StyleConfig::from_json_str(&raw)
                    .with_context(|| format!("invalid style file {}", path.display()))?
            }
            None => StyleConfig::default(),
        };
        Ok(ChartFacade::new(style))
    }

    fn dataset(&self) -> Result<Dataset> {
        load(&self.input)
    }

    fn request(&self) -> ChartRequest {
        ChartRequest {
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            footer: self.footer.clone(),
            color: self.color.clone(),
            width: self.width,
            height: self.height,
            template: self.template,
            font: self.font.clone(),
            title_bold: self.bold,
            ..ChartRequest::default()
        }
    }
}

impl RankArgs {
    fn apply(&self, mut req: ChartRequest) -> ChartRequest {
        req.top_n = self.top_n;
        req.highlight_top_n = self.highlight_top.clone();
        req.highlight_low_n = self.highlight_low.clone();
        req.add_hline = self.hline;
        req.add_hline_at = self.hline_at.clone();
        req
    }
}

fn load(path: &Path) -> Result<Dataset> {
    storage::load_csv(path).with_context(|| format!("loading {}", path.display()))
}

fn write(fig: &exploralytics::Figure, out: &Path) -> Result<()> {
    fig.write(out)
        .with_context(|| format!("writing {}", out.display()))?;
    eprintln!("Wrote chart to {}", out.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Hist(args) => cmd_hist(args),
        Command::Dist(args) => cmd_dist(args),
        Command::Bar(args) => cmd_bar(args),
        Command::Dots(args) => cmd_dots(args),
        Command::Corr(args) => cmd_corr(args),
        Command::CorrTarget(args) => cmd_corr_target(args),
        Command::Stats(args) => cmd_stats(args),
    }
}

fn cmd_hist(args: HistArgs) -> Result<()> {
    let viz = args.chart.facade()?;
    let data = args.chart.dataset()?;
    let req = args
        .chart
        .request()
        .show_mean(args.show_mean)
        .show_median(args.show_median);
    let columns: Vec<&str> = args.columns.iter().map(String::as_str).collect();
    let fig = viz.plot_histograms(&data, &columns, args.num_cols, &req)?;
    write(&fig, &args.chart.out)
}

fn cmd_dist(args: HistArgs) -> Result<()> {
    let viz = args.chart.facade()?;
    let data = args.chart.dataset()?;
    let req = args
        .chart
        .request()
        .show_mean(args.show_mean)
        .show_median(args.show_median);
    let columns: Vec<&str> = args.columns.iter().map(String::as_str).collect();
    let fig = viz.plot_distributions(&data, &columns, args.num_cols, &req)?;
    write(&fig, &args.chart.out)
}

fn cmd_bar(args: BarArgs) -> Result<()> {
    let viz = args.chart.facade()?;
    let data = args.chart.dataset()?;
    let req = args.rank.apply(args.chart.request());
    let fig = viz.plot_hbar(&data, &args.category, args.value.as_deref(), &req)?;
    write(&fig, &args.chart.out)
}

fn cmd_dots(args: DotsArgs) -> Result<()> {
    let viz = args.chart.facade()?;
    let data = args.chart.dataset()?;
    let req = args.rank.apply(args.chart.request());
    let fig = viz.plot_dots(&data, &args.label, &args.value, &req)?;
    write(&fig, &args.chart.out)
}

fn cmd_corr(args: CorrArgs) -> Result<()> {
    let viz = args.chart.facade()?;
    let data = args.chart.dataset()?;
    let mut req = args.chart.request();
    req.colorscale = args.colorscale.map(Colorscale::from);
    let columns: Vec<&str> = args.columns.iter().map(String::as_str).collect();
    let fig = viz.plot_correlation_map(&data, &columns, &req)?;
    write(&fig, &args.chart.out)
}

fn cmd_corr_target(args: CorrTargetArgs) -> Result<()> {
    let viz = args.chart.facade()?;
    let data = args.chart.dataset()?;
    let fig = viz.plot_correlation_with_target(&data, &args.target, &args.chart.request())?;
    write(&fig, &args.chart.out)
}

fn cmd_stats(args: StatsArgs) -> Result<()> {
    let data = load(&args.input)?;
    let names: Vec<String> = if args.columns.is_empty() {
        data.numeric_column_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    } else {
        args.columns.clone()
    };
    for name in &names {
        let s = stats::summarize(data.numeric(name)?);
        println!(
            "{}  count={} missing={}  min={} max={} mean={} median={}",
            name,
            s.count,
            s.missing,
            fmt_opt(s.min),
            fmt_opt(s.max),
            fmt_opt(s.mean),
            fmt_opt(s.median)
        );
    }
    Ok(())
}
