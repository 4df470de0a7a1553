// File: crates/graph-core/src/axis.rs
// Summary: Y-axis plan folded from detected/explicit bounds, emitted as rrdtool limit flags.

use crate::detect::ValueBounds;

/// Safety margin added outside detected extremes so lines are not clipped at the edge.
pub fn spread(min: f64, max: f64) -> f64 {
    (max - min) / 100.0
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AxisPlan {
    /// Both limits fixed.
    Rigid { lower: f64, upper: f64 },
    /// Known sides fixed, the others auto-scaled independently.
    Partial { lower: Option<f64>, upper: Option<f64> },
    /// Nothing known; leave the axis to the renderer.
    Auto,
}

impl AxisPlan {
    /// Fold detected bounds. A `floor` replaces the lower side and is never widened.
    pub fn from_bounds(bounds: ValueBounds, floor: Option<f64>) -> Self {
        let lower = floor.or(bounds.min);
        match (lower, bounds.max) {
            (Some(lo), Some(hi)) if hi > lo => {
                let m = spread(lo, hi);
                let lower = if floor.is_some() { lo } else { lo - m };
                AxisPlan::Rigid { lower, upper: hi + m }
            }
            (None, None) => AxisPlan::Auto,
            // max at or below the floor: pin the floor only
            (Some(lo), Some(_)) => AxisPlan::Partial { lower: Some(lo), upper: None },
            (lower, upper) => AxisPlan::Partial { lower, upper },
        }
    }

    /// Replace sides with explicit caller limits; two explicit sides make the plan rigid.
    pub fn with_explicit(self, lower: Option<f64>, upper: Option<f64>) -> Self {
        if lower.is_none() && upper.is_none() {
            return self;
        }
        let (cur_lo, cur_hi) = match self {
            AxisPlan::Rigid { lower, upper } => (Some(lower), Some(upper)),
            AxisPlan::Partial { lower, upper } => (lower, upper),
            AxisPlan::Auto => (None, None),
        };
        match (lower.or(cur_lo), upper.or(cur_hi)) {
            (Some(lower), Some(upper)) => AxisPlan::Rigid { lower, upper },
            (lower, upper) => AxisPlan::Partial { lower, upper },
        }
    }

    pub fn to_args(&self) -> Vec<String> {
        let mut out = Vec::new();
        match *self {
            AxisPlan::Rigid { lower, upper } => {
                out.extend(["--lower-limit".to_string(), fmt_limit(lower)]);
                out.extend(["--upper-limit".to_string(), fmt_limit(upper)]);
                out.push("--rigid".to_string());
            }
            AxisPlan::Partial { lower, upper } => {
                if let Some(lo) = lower {
                    out.extend(["--lower-limit".to_string(), fmt_limit(lo)]);
                }
                if let Some(hi) = upper {
                    out.extend(["--upper-limit".to_string(), fmt_limit(hi)]);
                }
                if lower.is_some() || upper.is_some() {
                    out.push("--rigid".to_string());
                }
                if lower.is_none() {
                    out.push("--alt-autoscale-min".to_string());
                }
                if upper.is_none() {
                    out.push("--alt-autoscale-max".to_string());
                }
            }
            AxisPlan::Auto => {}
        }
        out
    }
}

/// Up to 10 decimals, trailing zeros dropped: `49.49`, `0`, `-1.5`.
pub fn fmt_limit(v: f64) -> String {
    let s = format!("{v:.10}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "-0" | "" => "0".to_string(),
        _ => s.to_string(),
    }
}
