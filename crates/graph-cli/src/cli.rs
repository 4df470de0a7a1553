// File: crates/graph-cli/src/cli.rs
// Summary: Command line definition (clap derive) and conversion into core build jobs.

use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};
use rrdgraph_core::{validate_source_path, GraphJob, Mode, RangeRequest, TrendSpec, Window};

#[derive(Parser, Debug)]
#[command(author, version, about = "Mains frequency charts rendered with rrdtool", long_about = None)]
pub struct Cli {
    /// rrdtool executable
    #[arg(long, global = true, env = "RRDTOOL", default_value = rrdgraph_core::types::RRDTOOL, value_hint = ValueHint::ExecutablePath)]
    pub rrdtool: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Mains frequency over a floating time window
    Normal(FloatingArgs),
    /// Rate of frequency change over a floating time window
    Diff(FloatingArgs),
    /// Spread between max and min frequency over a floating time window
    Spread(FloatingArgs),
    /// Mains frequency, consecutive periods overlaid
    Overlap(OverlayArgs),
    /// Rate of frequency change, consecutive periods overlaid
    OverlapDiff(OverlayArgs),
    /// Blank blacklisted rows of an `rrdtool dump` XML file
    FilterXml(FilterArgs),
}

impl Command {
    /// Chart preset id for the chart subcommands.
    pub fn chart_id(&self) -> Option<&'static str> {
        match self {
            Command::Normal(_) => Some("normal"),
            Command::Diff(_) => Some("diff"),
            Command::Spread(_) => Some("spread"),
            Command::Overlap(_) => Some("overlap"),
            Command::OverlapDiff(_) => Some("overlap-diff"),
            Command::FilterXml(_) => None,
        }
    }
}

#[derive(Args, Debug)]
pub struct ChartArgs {
    /// RRD file holding the measurements
    #[arg(value_parser = parse_rrd, value_hint = ValueHint::FilePath)]
    pub rrd: PathBuf,

    /// Output image path
    #[arg(value_hint = ValueHint::FilePath)]
    pub image: PathBuf,

    /// Trend window: `auto`, seconds, or percent of the period (`5%`)
    #[arg(long, default_value = "auto")]
    pub trend: TrendSpec,

    /// Percent of lowest and highest samples dropped as noise
    #[arg(long, default_value_t = 0.5, value_parser = parse_error_percent)]
    pub error: f64,

    /// Print the rrdtool command instead of running it
    #[arg(long, action = ArgAction::SetTrue)]
    pub cmd: bool,

    /// Skip the value-range probe
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_detect: bool,

    /// Fixed lower axis limit
    #[arg(long, allow_negative_numbers = true)]
    pub lower_limit: Option<f64>,

    /// Fixed upper axis limit
    #[arg(long, allow_negative_numbers = true)]
    pub upper_limit: Option<f64>,
}

#[derive(Args, Debug)]
pub struct FloatingArgs {
    #[command(flatten)]
    pub chart: ChartArgs,

    /// Window start, rrdtool time spec
    #[arg(long, default_value = "end-24h")]
    pub start: String,

    /// Window end, rrdtool time spec
    #[arg(long, default_value = "now")]
    pub end: String,
}

#[derive(Args, Debug)]
pub struct OverlayArgs {
    #[command(flatten)]
    pub chart: ChartArgs,

    /// Length of one overlaid period, seconds
    #[arg(long, default_value_t = 86400, value_parser = clap::value_parser!(u64).range(60..))]
    pub width: u64,

    /// Number of overlaid periods
    #[arg(long, default_value_t = 7, value_parser = clap::value_parser!(u32).range(1..))]
    pub depth: u32,

    /// End of the most recent period, rrdtool time spec
    #[arg(long, default_value = "now")]
    pub end: String,
}

#[derive(Args, Debug)]
pub struct FilterArgs {
    /// `rrdtool dump` output
    #[arg(value_hint = ValueHint::FilePath)]
    pub input: PathBuf,

    /// Lines of `<begin>:<end>` epoch ranges, `#` comments allowed
    #[arg(value_hint = ValueHint::FilePath)]
    pub blacklist: PathBuf,

    /// Filtered XML destination
    #[arg(value_hint = ValueHint::FilePath)]
    pub output: PathBuf,
}

fn parse_rrd(s: &str) -> Result<PathBuf, String> {
    validate_source_path(Path::new(s)).map_err(|e| e.to_string())
}

fn parse_error_percent(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    if (0.0..50.0).contains(&v) {
        Ok(v)
    } else {
        Err(format!("must be at least 0 and below 50, got {v}"))
    }
}

impl ChartArgs {
    pub fn mode(&self) -> Mode {
        if self.cmd { Mode::Print } else { Mode::Execute }
    }

    fn job(&self, window: Window) -> GraphJob {
        GraphJob {
            rrd: self.rrd.clone(),
            image: self.image.clone(),
            window,
            trend: self.trend,
            error_percent: self.error,
            range: RangeRequest { detect: !self.no_detect, lower: self.lower_limit, upper: self.upper_limit },
        }
    }
}

impl FloatingArgs {
    pub fn job(&self) -> GraphJob {
        self.chart.job(Window::Floating { start: self.start.clone(), end: self.end.clone() })
    }
}

impl OverlayArgs {
    pub fn job(&self) -> GraphJob {
        self.chart.job(Window::Overlay { end: self.end.clone(), width: self.width, depth: self.depth })
    }
}
