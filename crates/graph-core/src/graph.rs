// File: crates/graph-core/src/graph.rs
// Summary: Build pipeline: resolve period and trend once, declare, probe value bounds,
//          fold axis limits and emit the final rrdtool command.
// Notes:
// - Detected values live only for the duration of one `build_command` call.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::axis::{fmt_limit, AxisPlan};
use crate::charts::{ChartContext, ChartDef};
use crate::command::{Command, RenderOptions};
use crate::detect::{detect_period, probe_value_bounds, ValueBounds};
use crate::error::{GraphError, Result};
use crate::palette::Palette;
use crate::renderer::Renderer;
use crate::units::TrendSpec;

/// Time window of a chart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Window {
    /// Renderer time specs, e.g. `end-24h` .. `now`.
    Floating { start: String, end: String },
    /// `depth` slices of `width` seconds each, ending at `end`.
    Overlay { end: String, width: u64, depth: u32 },
}

impl Window {
    pub fn is_overlay(&self) -> bool {
        matches!(self, Window::Overlay { .. })
    }

    /// `--start`/`--end` flags; an overlay shows only its most recent slice.
    pub fn time_flags(&self) -> Vec<String> {
        let (start, end) = match self {
            Window::Floating { start, end } => (start.clone(), end.clone()),
            Window::Overlay { end, width, .. } => (format!("{end}-{width}"), end.clone()),
        };
        vec!["--start".to_string(), start, "--end".to_string(), end]
    }
}

/// Axis range handling requested by the caller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangeRequest {
    /// Run the value probe when the chart has targets.
    pub detect: bool,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl Default for RangeRequest {
    fn default() -> Self {
        Self { detect: true, lower: None, upper: None }
    }
}

impl RangeRequest {
    fn fully_explicit(&self) -> bool {
        self.lower.is_some() && self.upper.is_some()
    }
}

/// One chart to build.
#[derive(Clone, Debug)]
pub struct GraphJob {
    pub rrd: PathBuf,
    pub image: PathBuf,
    pub window: Window,
    pub trend: TrendSpec,
    /// Percentage of samples at each end treated as noise, `0 <= e < 50`.
    pub error_percent: f64,
    pub range: RangeRequest,
}

/// Absolute path of an existing regular file.
pub fn validate_source_path(path: &Path) -> Result<PathBuf> {
    let abs = std::fs::canonicalize(path)
        .map_err(|e| GraphError::validation(format!("{}: {e}", path.display())))?;
    if !abs.is_file() {
        return Err(GraphError::validation(format!("{} is not a regular file", path.display())));
    }
    Ok(abs)
}

/// Seconds covered by `depth` slices of `width`; both positive, the total must fit a signed time offset.
pub fn overlay_span(width: u64, depth: u32) -> Result<i64> {
    if width == 0 || depth == 0 {
        return Err(GraphError::validation("overlay width and depth must be positive"));
    }
    width
        .checked_mul(u64::from(depth))
        .and_then(|span| i64::try_from(span).ok())
        .ok_or_else(|| GraphError::validation(format!("overlay of {depth} x {width} s is out of range")))
}

/// Reject a declaration list that defines the same series twice.
pub fn check_unique_names(declarations: &[String]) -> Result<()> {
    let mut seen = HashSet::new();
    for decl in declarations {
        let Some(rest) = ["DEF:", "CDEF:", "VDEF:"].iter().find_map(|p| decl.strip_prefix(p)) else {
            continue;
        };
        let Some((name, _)) = rest.split_once('=') else { continue };
        if !seen.insert(name) {
            return Err(GraphError::validation(format!("series `{name}` is declared more than once")));
        }
    }
    Ok(())
}

pub fn build_command(
    def: &ChartDef,
    job: &GraphJob,
    renderer: &dyn Renderer,
    opts: &RenderOptions,
) -> Result<Command> {
    if !(0.0..50.0).contains(&job.error_percent) {
        return Err(GraphError::validation(format!(
            "error percentage must be in [0, 50), got {}",
            job.error_percent
        )));
    }
    if let (Some(lower), Some(upper)) = (job.range.lower, job.range.upper) {
        if lower >= upper {
            return Err(GraphError::validation(format!(
                "lower limit {lower} must be below upper limit {upper}"
            )));
        }
    }
    if def.caps.overlay != job.window.is_overlay() {
        let wanted = if def.caps.overlay { "an overlay" } else { "a floating" };
        return Err(GraphError::validation(format!("chart `{}` needs {wanted} window", def.id)));
    }

    let period = match &job.window {
        Window::Floating { start, end } => detect_period(renderer, &job.rrd, def.source, start, end)?.length(),
        Window::Overlay { width, depth, .. } => {
            overlay_span(*width, *depth)?;
            *width
        }
    };
    let trend_window = job.trend.resolve(period);
    if trend_window == 0 {
        return Err(GraphError::validation(format!(
            "trend window resolves to 0 seconds for a {period} s period"
        )));
    }
    let palette = Palette::classic();
    info!(chart = def.id, palette = palette.name, period, trend_window, "{}", def.about);

    let ctx = ChartContext {
        rrd: &job.rrd,
        period,
        trend_window,
        error_percent: job.error_percent,
        window: &job.window,
        palette: &palette,
    };
    let declarations = (def.declare)(&ctx)?;
    check_unique_names(&declarations)?;

    let time_flags = job.window.time_flags();
    let bounds = match def.caps.probe {
        Some(targets) if job.range.detect && !job.range.fully_explicit() => {
            let bounds = probe_value_bounds(renderer, &time_flags, &declarations, &targets)?;
            if bounds.is_empty() {
                warn!("no data to detect the value range of `{}`; using auto-scale", def.id);
            } else {
                info!(min = ?bounds.min, max = ?bounds.max, "detected value range");
            }
            bounds
        }
        _ => ValueBounds::default(),
    };
    let plan = AxisPlan::from_bounds(bounds, def.caps.force_floor).with_explicit(job.range.lower, job.range.upper);
    debug!(?plan, "axis");
    if let AxisPlan::Rigid { lower, upper } = plan {
        if lower >= upper {
            return Err(GraphError::validation(format!(
                "axis limits {} .. {} leave no range to draw",
                fmt_limit(lower),
                fmt_limit(upper)
            )));
        }
    }

    let mut args = opts.base_args(&job.image);
    args.extend(time_flags);
    args.extend(plan.to_args());
    args.extend(declarations);
    Ok(Command::new(renderer.program(), args))
}
