// File: crates/graph-core/src/charts/normal.rs
// Summary: Mains frequency over a floating window: raw min/max/avg, trends, clipping markers, GOST limits.

use super::{frequency_limits, measurements_header, title, Capabilities, ChartContext, ChartDef};
use crate::detect::ProbeTargets;
use crate::error::Result;
use crate::expr::{declare_derived as cdef, declare_scalar as vdef, def, drop, trend, zero_tick, Cf, Expr, Op};
use crate::legend::{comment, gprint, line, notice_errors, text_align_left, tick};

pub const SOURCE: &str = "freq";

pub fn chart() -> ChartDef {
    ChartDef {
        id: "normal",
        about: "Mains frequency over a floating time window",
        source: SOURCE,
        caps: Capabilities {
            overlay: false,
            probe: Some(ProbeTargets::both("g_min", "g_max")),
            force_floor: None,
        },
        declare,
    }
}

fn declare(ctx: &ChartContext<'_>) -> Result<Vec<String>> {
    let p = ctx.palette;
    let w = ctx.trend_window;
    let mut out = Vec::new();
    out.extend(title(ctx, "Частота в сети", "Hz"));
    out.extend([
        def("r_min", ctx.rrd, SOURCE, Cf::Min),
        def("r_max", ctx.rrd, SOURCE, Cf::Max),
        def("r_avg", ctx.rrd, SOURCE, Cf::Average),
        vdef("g_min", Expr::binary(Op::PercentNan, "r_min", ctx.lower_percentile())),
        vdef("g_max", Expr::binary(Op::PercentNan, "r_max", ctx.upper_percentile())),
        cdef("f_min", drop("r_min", "g_min", "g_max")),
        cdef("f_max", drop("r_max", "g_min", "g_max")),
        cdef("f_avg", drop("r_avg", "g_min", "g_max")),
    ]);
    out.extend(trend("t_min", "f_min", w));
    out.extend(trend("t_max", "f_max", w));
    out.extend(trend("t_avg", "f_avg", w));
    out.extend([
        vdef("g_avg", Expr::unary(Op::Average, "f_avg")),
        vdef("g_last", Expr::unary(Op::Last, "f_avg")),
        vdef("g_stdev", Expr::unary(Op::Stdev, "f_avg")),
        cdef("e_min", Expr::binary(Op::Lt, "r_min", "g_min")),
        cdef("e_max", Expr::binary(Op::Gt, "r_max", "g_max")),
        cdef("e_miss", Expr::unary(Op::Un, "r_avg")),
        cdef("ztick", zero_tick(ctx.period, "r_avg")),
        text_align_left(),
        comment("Маркеры:"),
        tick("e_miss", p.missing, Some(1.0), Some("  Нет данных")),
        tick("ztick", p.boundary, Some(1.0), None),
        tick("e_min", p.low, Some(0.02), Some("  Возм. ошибки вниз")),
        tick("e_max", p.high, Some(-0.02), Some("  Возм. ошибки вверх\\n")),
    ]);
    out.extend(frequency_limits(p));
    out.extend([
        measurements_header("Измерения:", w),
        line(1, "r_min", p.raw_min.with_alpha(0x3F), None, &["skipscale"]),
        line(1, "r_max", p.raw_max.with_alpha(0x3F), None, &["skipscale"]),
        line(1, "r_avg", p.raw_avg.with_alpha(0x3F), None, &["skipscale"]),
        line(1, "t_min", p.trend_min, None, &[]),
        line(1, "t_max", p.trend_max, None, &[]),
        line(1, "t_avg", p.trend_avg, None, &[]),
        line(1, "g_min", p.global_min, Some("↓Наим.\\t"), &["dashes"]),
        line(1, "g_max", p.global_max, Some("↓Наиб.\\t"), &["dashes"]),
        line(1, "g_avg", p.global_avg, Some("↓Сред.\\t"), &["dashes", "dash-offset=5"]),
        comment("↓Последний\\t"),
        comment("↓Станд. откл.\\n"),
        gprint("g_min", "%2.4lf %sHz\\t"),
        gprint("g_max", "%2.4lf %sHz\\t"),
        gprint("g_avg", "%2.4lf %sHz\\t"),
        gprint("g_last", "%2.4lf %sHz\\t"),
        gprint("g_stdev", "%2.4lf %sHz\\n"),
        notice_errors(ctx.error_percent),
    ]);
    Ok(out)
}
