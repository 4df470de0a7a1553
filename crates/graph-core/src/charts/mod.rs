// File: crates/graph-core/src/charts/mod.rs
// Summary: Chart definitions as data: capability flags plus a pure declaration builder.

use std::path::Path;

use crate::detect::ProbeTargets;
use crate::error::{GraphError, Result};
use crate::graph::Window;
use crate::legend::{comment, comment_header, hrule};
use crate::palette::Palette;
use crate::units::humanize;

pub mod diff;
pub mod normal;
pub mod overlap;
pub mod spread;

/// What the assembler should do around a chart's declarations.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Capabilities {
    /// Repeated time-shifted windows instead of one floating window.
    pub overlay: bool,
    /// Scalars to probe for axis bounds; `None` disables detection.
    pub probe: Option<ProbeTargets>,
    /// Lower axis limit that always applies.
    pub force_floor: Option<f64>,
}

/// Everything a declaration builder may depend on, resolved before it runs.
pub struct ChartContext<'a> {
    pub rrd: &'a Path,
    /// Seconds covered by one chart period (whole window, or one overlay slice).
    pub period: u64,
    pub trend_window: u64,
    /// Percentage of lowest and highest samples treated as noise.
    pub error_percent: f64,
    pub window: &'a Window,
    pub palette: &'a Palette,
}

impl ChartContext<'_> {
    pub fn lower_percentile(&self) -> f64 { self.error_percent }

    pub fn upper_percentile(&self) -> f64 { 100.0 - self.error_percent }

    /// `(end, width, depth)` of an overlay window.
    pub fn overlay(&self) -> Result<(&str, u64, u32)> {
        match self.window {
            Window::Overlay { end, width, depth } => Ok((end.as_str(), *width, *depth)),
            Window::Floating { .. } => Err(GraphError::validation("overlay chart needs --width/--depth window")),
        }
    }
}

pub type DeclareFn = fn(&ChartContext<'_>) -> Result<Vec<String>>;

#[derive(Clone, Copy)]
pub struct ChartDef {
    pub id: &'static str,
    pub about: &'static str,
    /// Data source name inside the RRD.
    pub source: &'static str,
    pub caps: Capabilities,
    pub declare: DeclareFn,
}

impl std::fmt::Debug for ChartDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartDef")
            .field("id", &self.id)
            .field("source", &self.source)
            .field("caps", &self.caps)
            .finish()
    }
}

/// All built-in chart definitions.
pub fn presets() -> Vec<ChartDef> {
    vec![
        normal::chart(),
        diff::chart(),
        spread::chart(),
        overlap::chart(),
        overlap::diff_chart(),
    ]
}

pub fn find(id: &str) -> Option<ChartDef> {
    presets().into_iter().find(|c| c.id.eq_ignore_ascii_case(id))
}

// ---- shared legend sections ---------------------------------------------------

pub(crate) fn title(ctx: &ChartContext<'_>, what: &str, unit: &str) -> [String; 2] {
    ["--title".to_string(), format!("{what}, <b>{}</b>, {unit}", humanize(ctx.period))]
}

pub(crate) fn measurements_header(heading: &str, trend_window: u64) -> String {
    comment_header(
        heading,
        Some(&format!(
            "(Бледные - исходные данные, Яркие - тренд за {}, пунктир - за весь период)",
            humanize(trend_window)
        )),
    )
}

/// Nominal and permitted mains frequency per GOST 32144-2013 4.2.1.
pub(crate) fn frequency_limits(p: &Palette) -> Vec<String> {
    vec![
        comment_header("Пределы:", Some("(ГОСТ 32144-2013 4.2.1)")),
        hrule(50.0, p.nominal, Some("Номинальное (50 Hz);"), &["dashes"]),
        comment("Допуст. 100% времени (±0.4 Hz) и 95% времени (±0.2 Hz):"),
        hrule(49.6, p.low, Some("Наим."), &["dashes"]),
        hrule(49.8, p.low, None, &["dashes"]),
        hrule(50.2, p.high, Some("Наиб."), &["dashes"]),
        hrule(50.4, p.high, None, &["dashes"]),
        comment("(Могут скрыться)\\n"),
    ]
}
