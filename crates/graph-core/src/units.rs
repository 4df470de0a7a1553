// File: crates/graph-core/src/units.rs
// Summary: Duration constants, humanized durations, trend window arguments and tick granularity.

use std::str::FromStr;

use crate::error::{GraphError, Result};
use crate::expr::{Expr, Op};

pub const LENGTH_MINUTE: u64 = 60;
pub const LENGTH_HOUR: u64 = LENGTH_MINUTE * 60;
pub const LENGTH_DAY: u64 = LENGTH_HOUR * 24;
pub const LENGTH_WEEK: u64 = LENGTH_DAY * 7;
pub const LENGTH_MONTH: u64 = LENGTH_DAY * 31;
pub const LENGTH_YEAR: u64 = LENGTH_DAY * 365;

/// Render `seconds` as a compact duration, largest unit first, e.g. `1д. 1ч. 1м. 1с.`.
/// Zero renders as an empty string.
pub fn humanize(seconds: u64) -> String {
    const UNITS: [(u64, &str); 4] = [
        (LENGTH_YEAR, "г."),
        (LENGTH_DAY, "д."),
        (LENGTH_HOUR, "ч."),
        (LENGTH_MINUTE, "м."),
    ];
    let mut rest = seconds;
    let mut parts = Vec::new();
    for (len, suffix) in UNITS {
        if rest >= len {
            parts.push(format!("{}{}", rest / len, suffix));
            rest %= len;
        }
    }
    if rest > 0 {
        parts.push(format!("{rest}с."));
    }
    parts.join(" ")
}

/// How the smoothing window for trend lines is chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum TrendSpec {
    /// One sixtieth of the period.
    #[default]
    Auto,
    /// Percentage of the period.
    Percent(f64),
    /// Absolute window in seconds.
    Seconds(u64),
}

pub fn parse_trend_argument(text: &str) -> Result<TrendSpec> {
    let t = text.trim();
    if t.eq_ignore_ascii_case("auto") {
        return Ok(TrendSpec::Auto);
    }
    if let Some(pct) = t.strip_suffix('%') {
        return match pct.trim().parse::<f64>() {
            Ok(p) if p.is_finite() && p >= 0.0 => Ok(TrendSpec::Percent(p)),
            _ => Err(GraphError::validation(format!(
                "trend percentage must be a non-negative number, got {text:?}"
            ))),
        };
    }
    t.parse::<u64>().map(TrendSpec::Seconds).map_err(|_| {
        GraphError::validation(format!(
            "trend must be `auto`, `<seconds>` or `<percent>%`, got {text:?}"
        ))
    })
}

impl FromStr for TrendSpec {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self> {
        parse_trend_argument(s)
    }
}

/// Window in seconds for a period of `period_length` seconds.
/// `Auto` is at least 1 only for periods of a minute or more.
pub fn resolve_trend_window(period_length: u64, spec: TrendSpec) -> u64 {
    match spec {
        TrendSpec::Auto => period_length / 60,
        TrendSpec::Percent(p) => (period_length as f64 * p / 100.0).floor() as u64,
        TrendSpec::Seconds(s) => s,
    }
}

impl TrendSpec {
    pub fn resolve(self, period_length: u64) -> u64 {
        resolve_trend_window(period_length, self)
    }
}

/// Cadence of period-boundary markers on the time axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Granularity {
    Year,
    Month,
    Week,
    Day,
    Hour,
}

/// Coarsest boundary whose length does not exceed `duration`; below an hour, hourly.
pub fn granularity_boundary_function(duration: u64) -> Granularity {
    if duration >= LENGTH_YEAR {
        Granularity::Year
    } else if duration >= LENGTH_MONTH {
        Granularity::Month
    } else if duration >= LENGTH_WEEK {
        Granularity::Week
    } else if duration >= LENGTH_DAY {
        Granularity::Day
    } else {
        Granularity::Hour
    }
}

impl Granularity {
    /// Renderer expression that is 1 on the first sample of each new period.
    pub fn boundary(self) -> Expr {
        match self {
            Granularity::Year => Op::NewYear.into(),
            Granularity::Month => Op::NewMonth.into(),
            Granularity::Week => Op::NewWeek.into(),
            Granularity::Day => Op::NewDay.into(),
            // no NEWHOUR token: time modulo hour falls inside the first step
            Granularity::Hour => Expr::seq([
                Op::Time.into(),
                Expr::from(LENGTH_HOUR),
                Op::Mod.into(),
                Op::StepWidth.into(),
                Op::Lt.into(),
            ]),
        }
    }
}

impl From<u64> for Granularity {
    fn from(duration: u64) -> Self {
        granularity_boundary_function(duration)
    }
}
