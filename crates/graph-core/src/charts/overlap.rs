// File: crates/graph-core/src/charts/overlap.rs
// Summary: Period-over-period overlays: `depth` consecutive windows of `width` seconds
//          shifted onto the most recent one, colored from oldest (cool) to newest (warm).

use super::{frequency_limits, measurements_header, Capabilities, ChartContext, ChartDef};
use crate::color::gradient;
use crate::detect::ProbeTargets;
use crate::error::Result;
use crate::graph::overlay_span;
use crate::expr::{
    average, chain, declare_derived as cdef, declare_scalar as vdef, def_window, drop, shift, trend, zero_tick, Cf,
    Expr, Op,
};
use crate::legend::{comment, gprint, line, notice_errors, text_align_left, tick};
use crate::units::humanize;

struct Variant {
    source: &'static str,
    what: &'static str,
    unit: &'static str,
    /// Clip from below at the lower percentile; otherwise at zero.
    lower_percentile: bool,
}

const FREQUENCY: Variant = Variant {
    source: "freq",
    what: "Совмещенная частота в сети",
    unit: "Hz",
    lower_percentile: true,
};

const RATE: Variant = Variant {
    source: "freq_var",
    what: "Совмещенная интенсивность изменения частоты в сети",
    unit: "Hz/sec",
    lower_percentile: false,
};

pub fn chart() -> ChartDef {
    ChartDef {
        id: "overlap",
        about: "Mains frequency, consecutive periods overlaid",
        source: FREQUENCY.source,
        caps: Capabilities {
            overlay: true,
            probe: Some(ProbeTargets::both("g_min", "g_max")),
            force_floor: None,
        },
        declare: |ctx| declare(ctx, &FREQUENCY),
    }
}

pub fn diff_chart() -> ChartDef {
    ChartDef {
        id: "overlap-diff",
        about: "Rate of frequency change, consecutive periods overlaid",
        source: RATE.source,
        caps: Capabilities {
            overlay: true,
            probe: Some(ProbeTargets::max_only("g_max")),
            force_floor: Some(0.0),
        },
        declare: |ctx| declare(ctx, &RATE),
    }
}

fn each(depth: u32, pattern: impl Fn(u32) -> String) -> Vec<Expr> {
    (0..depth).map(|i| Expr::var(pattern(i))).collect()
}

fn declare(ctx: &ChartContext<'_>, v: &Variant) -> Result<Vec<String>> {
    let (end, width, depth) = ctx.overlay()?;
    let p = ctx.palette;
    let w = ctx.trend_window;
    let unit = v.unit;

    let mut out = vec![
        "--title".to_string(),
        format!("{}, <b>{}</b> периодов по <b>{}</b>, {}", v.what, depth, humanize(width), unit),
    ];

    let slice = overlay_span(width, depth)? / i64::from(depth);
    for i in 0..depth {
        let offset = i64::from(i) * slice;
        let start = format!("{end}-{}", offset + slice);
        let stop = format!("{end}-{offset}");
        for (suffix, cf) in [("min", Cf::Min), ("max", Cf::Max), ("avg", Cf::Average)] {
            out.push(def_window(&format!("r_i{i}_{suffix}"), ctx.rrd, v.source, cf, &start, &stop));
        }
        for suffix in ["min", "max", "avg"] {
            out.push(shift(&format!("r_i{i}_{suffix}"), offset));
        }
    }

    out.push(cdef("r_min", chain(Op::MinNan, each(depth, |i| format!("r_i{i}_min")))?));
    out.push(cdef("r_max", chain(Op::MaxNan, each(depth, |i| format!("r_i{i}_max")))?));
    let lower: Expr = if v.lower_percentile {
        out.push(vdef("g_min", Expr::binary(Op::PercentNan, "r_min", ctx.lower_percentile())));
        Expr::var("g_min")
    } else {
        Expr::Num(0.0)
    };
    out.push(vdef("g_max", Expr::binary(Op::PercentNan, "r_max", ctx.upper_percentile())));

    for i in 0..depth {
        let f = format!("f_i{i}_avg");
        out.push(cdef(&f, drop(format!("r_i{i}_avg"), lower.clone(), "g_max")));
        out.extend(trend(&format!("t_i{i}_avg"), &f, w));
    }
    out.push(cdef("r_avg", average(each(depth, |i| format!("r_i{i}_avg")))?));
    out.push(cdef("f_avg", average(each(depth, |i| format!("f_i{i}_avg")))?));
    out.push(cdef("t_avg", average(each(depth, |i| format!("t_i{i}_avg")))?));
    out.push(vdef("g_avg", Expr::unary(Op::Average, "f_avg")));

    if v.lower_percentile {
        out.push(cdef("e_min", Expr::binary(Op::Lt, "r_min", "g_min")));
    }
    let missing_some = (0..depth).map(|i| Expr::unary(Op::Un, format!("r_i{i}_avg"))).collect();
    out.extend([
        cdef("e_max", Expr::binary(Op::Gt, "r_max", "g_max")),
        cdef("e_miss_all", Expr::unary(Op::Un, "r_avg")),
        cdef("e_miss_some", chain(Op::Add, missing_some)?),
        cdef("ztick", zero_tick(width, "r_i0_avg")),
        text_align_left(),
        comment("Маркеры:"),
        tick("e_miss_all", p.missing_all, Some(1.0), Some("  Нет данных вообще")),
        tick("ztick", p.boundary, Some(1.0), None),
        tick("e_miss_some", p.missing, Some(-0.02), None),
        tick("e_miss_some", p.missing, Some(0.02), Some("  Нет части данных")),
    ]);
    if v.lower_percentile {
        out.push(tick("e_min", p.low, Some(0.02), Some("  Возм. ошибки вниз")));
        out.push(tick("e_max", p.high, Some(-0.02), Some("  Возм. ошибки вверх\\n")));
        out.extend(frequency_limits(p));
    } else {
        out.push(tick("e_max", p.high, Some(-0.02), Some("  Возм. ошибки\\n")));
    }

    out.push(measurements_header("Измерения:", w));
    let raw_colors = gradient(p.depth_oldest, p.depth_recent, depth as usize);
    for i in (0..depth).rev() {
        out.push(line(1, &format!("r_i{i}_avg"), raw_colors[i as usize], None, &["skipscale"]));
    }

    if v.lower_percentile {
        out.push(line(1, "g_min", p.global_min, Some("↓Общ. наим.\\t"), &["dashes"]));
    }
    out.extend([
        line(1, "g_max", p.global_max, Some("↓Общ. наиб.\\t"), &["dashes"]),
        line(1, "g_avg", p.overall, None, &["dashes", "dash-offset=5"]),
        line(2, "t_avg", p.overall, Some("↓Общ. сред.\\n"), &[]),
    ]);
    if v.lower_percentile {
        out.push(gprint("g_min", &format!("%2.4lf %s{unit}\\t")));
    }
    out.extend([
        gprint("g_max", &format!("%2.4lf %s{unit}\\t")),
        gprint("g_avg", &format!("%2.4lf %s{unit}\\n")),
        comment(&format!("Глубина ({depth}):")),
    ]);

    let trend_colors = gradient(p.depth_trend_oldest, p.depth_trend_recent, depth as usize);
    for i in (0..depth).rev() {
        let legend = format!("-{i},");
        out.push(line(1, &format!("t_i{i}_avg"), trend_colors[i as usize], Some(&legend), &[]));
    }
    out.extend([
        comment("\\n"),
        // trend of the average drawn again on top of the depth lines
        line(2, "t_avg", p.overall.with_alpha(0x7F), None, &[]),
        notice_errors(ctx.error_percent),
    ]);
    Ok(out)
}
