// File: crates/graph-core/src/detect.rs
// Summary: Probe passes that run the renderer silently and parse its textual report
//          to discover the resolved time window and the value range of the plotted data.

use std::fmt;
use std::io::BufRead;
use std::path::Path;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::{debug, info};

use crate::error::{GraphError, Result};
use crate::expr::{def, Cf};
use crate::legend;
use crate::renderer::Renderer;
use crate::types::{NULL_DEVICE, PROBE_HEIGHT, PROBE_WIDTH};

static GRAPH_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^graph_start = ([0-9]+)").expect("valid regex"));
static GRAPH_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^graph_end = ([0-9]+)").expect("valid regex"));
static BOUND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(MIN|MAX):\s*([-+]?(?:[0-9]+(?:[.,][0-9]*)?|[.,][0-9]+)(?:[eE][-+]?[0-9]+)?)\s*$")
        .expect("valid regex")
});

/// Time window `[start, end)` the renderer resolved, in epoch seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Period {
    pub start: i64,
    pub end: i64,
}

impl Period {
    pub fn length(&self) -> u64 {
        (self.end - self.start).max(0) as u64
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ts = |t: i64| {
            DateTime::<Utc>::from_timestamp(t, 0)
                .map(|d| d.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                .unwrap_or_else(|| t.to_string())
        };
        write!(f, "{} .. {}", ts(self.start), ts(self.end))
    }
}

/// Value range the plotted data occupies; either side may be unknown.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ValueBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ValueBounds {
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Scalar reductions whose values the probe pass reports as `MIN:` and `MAX:`.
/// They should be taken over series that are already clipped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProbeTargets {
    pub min: Option<&'static str>,
    pub max: Option<&'static str>,
}

impl ProbeTargets {
    pub const fn both(min: &'static str, max: &'static str) -> Self {
        Self { min: Some(min), max: Some(max) }
    }

    pub const fn max_only(max: &'static str) -> Self {
        Self { min: None, max: Some(max) }
    }

    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// PRINT elements appended to the probe command.
    pub fn print_elements(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(2);
        if let Some(v) = self.min {
            out.push(legend::print(v, "MIN"));
        }
        if let Some(v) = self.max {
            out.push(legend::print(v, "MAX"));
        }
        out
    }
}

/// Report lines up to EOF or the first blank line, trimmed.
fn report_lines<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut out = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        out.push(line.to_string());
    }
    Ok(out)
}

/// Extract `graph_start`/`graph_end` from a `graphv` report.
pub fn parse_period_report<R: BufRead>(reader: R) -> Result<Period> {
    let mut start = None;
    let mut end = None;
    for line in report_lines(reader)? {
        if let Some(v) = GRAPH_START.captures(&line).and_then(|c| c[1].parse::<i64>().ok()) {
            start = Some(v);
        }
        if let Some(v) = GRAPH_END.captures(&line).and_then(|c| c[1].parse::<i64>().ok()) {
            end = Some(v);
        }
    }
    let start = start.ok_or_else(|| GraphError::detection("`graph_start` missing from renderer report"))?;
    let end = end.ok_or_else(|| GraphError::detection("`graph_end` missing from renderer report"))?;
    if end < start {
        return Err(GraphError::detection(format!("`graph_end` ({end}) < `graph_start` ({start})")));
    }
    Ok(Period { start, end })
}

/// Extract `MIN:`/`MAX:` values from a probe report. Decimal commas are accepted;
/// unknown values (`nan`) leave that side empty.
pub fn parse_bounds_report<R: BufRead>(reader: R) -> Result<ValueBounds> {
    let mut bounds = ValueBounds::default();
    for line in report_lines(reader)? {
        let Some(caps) = BOUND.captures(&line) else { continue };
        let Ok(value) = caps[2].replace(',', ".").parse::<f64>() else { continue };
        if !value.is_finite() {
            continue;
        }
        match &caps[1] {
            "MIN" => bounds.min = Some(value),
            _ => bounds.max = Some(value),
        }
    }
    if let (Some(min), Some(max)) = (bounds.min, bounds.max) {
        if max <= min {
            return Err(GraphError::detection(format!(
                "probe reported MAX ({max}) not above MIN ({min})"
            )));
        }
    }
    Ok(bounds)
}

/// Ask the renderer which window `start`/`end` resolve to for this RRD.
pub fn detect_period(renderer: &dyn Renderer, rrd: &Path, ds: &str, start: &str, end: &str) -> Result<Period> {
    let args = vec![
        "graphv".to_string(),
        NULL_DEVICE.to_string(),
        "--start".to_string(),
        start.to_string(),
        "--end".to_string(),
        end.to_string(),
        "--width".to_string(),
        PROBE_WIDTH.to_string(),
        "--height".to_string(),
        PROBE_HEIGHT.to_string(),
        "--full-size-mode".to_string(),
        def("dummy", rrd, ds, Cf::Average),
        "VDEF:global_dummy=dummy,AVERAGE".to_string(),
        legend::gprint("global_dummy", "%3.4lf"),
    ];
    let report = renderer.probe(&args)?;
    let period = parse_period_report(report.as_bytes())?;
    info!("detected period {} ({} s)", period, period.length());
    Ok(period)
}

/// Run the full declaration list against a discarded image and report the
/// values of `targets`.
pub fn probe_value_bounds(
    renderer: &dyn Renderer,
    time_flags: &[String],
    declarations: &[String],
    targets: &ProbeTargets,
) -> Result<ValueBounds> {
    if targets.is_empty() {
        return Ok(ValueBounds::default());
    }
    let mut args = vec!["graph".to_string(), NULL_DEVICE.to_string()];
    args.extend_from_slice(time_flags);
    args.extend_from_slice(declarations);
    args.extend(targets.print_elements());

    let report = renderer.probe(&args)?;
    let bounds = parse_bounds_report(report.as_bytes())?;
    debug!(?bounds, "value probe");
    Ok(bounds)
}
