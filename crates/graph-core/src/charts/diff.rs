// File: crates/graph-core/src/charts/diff.rs
// Summary: Rate of frequency change (Hz/sec) over a floating window, floored at zero.

use super::{measurements_header, title, Capabilities, ChartContext, ChartDef};
use crate::detect::ProbeTargets;
use crate::error::Result;
use crate::expr::{declare_derived as cdef, declare_scalar as vdef, def, drop, trend, zero_tick, Cf, Expr, Op};
use crate::legend::{comment, gprint, hrule, line, notice_errors, text_align_left, tick};

pub const SOURCE: &str = "freq_var";

pub fn chart() -> ChartDef {
    ChartDef {
        id: "diff",
        about: "Rate of frequency change over a floating time window",
        source: SOURCE,
        caps: Capabilities {
            overlay: false,
            probe: Some(ProbeTargets::max_only("g_max")),
            force_floor: Some(0.0),
        },
        declare,
    }
}

fn declare(ctx: &ChartContext<'_>) -> Result<Vec<String>> {
    let p = ctx.palette;
    let w = ctx.trend_window;
    let mut out = Vec::new();
    out.extend(title(ctx, "Интенсивность изменения частоты в сети", "Hz/sec"));
    // only MAX is archived meaningfully for the rate, so min reads MAX as well
    out.extend([
        def("r_min", ctx.rrd, SOURCE, Cf::Max),
        def("r_max", ctx.rrd, SOURCE, Cf::Max),
        def("r_avg", ctx.rrd, SOURCE, Cf::Average),
        vdef("g_max", Expr::binary(Op::PercentNan, "r_max", ctx.upper_percentile())),
        cdef("f_min", drop("r_min", 0.0, "g_max")),
        cdef("f_max", drop("r_max", 0.0, "g_max")),
        cdef("f_avg", drop("r_avg", 0.0, "g_max")),
        vdef("g_avg", Expr::unary(Op::Average, "f_avg")),
    ]);
    out.extend(trend("t_min", "f_min", w));
    out.extend(trend("t_max", "f_max", w));
    out.extend(trend("t_avg", "f_avg", w));
    out.extend([
        vdef("g_last_min", Expr::unary(Op::Last, "f_min")),
        vdef("g_last_max", Expr::unary(Op::Last, "f_max")),
        vdef("g_last_avg", Expr::unary(Op::Last, "f_avg")),
        cdef("e_max", Expr::binary(Op::Gt, "r_max", "g_max")),
        cdef("e_miss", Expr::unary(Op::Un, "r_avg")),
        cdef("ztick", zero_tick(ctx.period, "r_avg")),
        text_align_left(),
        comment("Маркеры:"),
        tick("e_miss", p.missing, Some(1.0), Some("  Нет данных")),
        tick("ztick", p.boundary, Some(1.0), None),
        tick("e_max", p.high, Some(-0.02), Some("  Возм. ошибки\\n")),
        hrule(0.0, p.nominal, None, &["dashes"]),
        measurements_header("Измерения:", w),
        line(1, "r_min", p.raw_min.with_alpha(0x1F), None, &["skipscale"]),
        line(1, "r_max", p.raw_max.with_alpha(0x1F), None, &["skipscale"]),
        line(1, "r_avg", p.raw_avg.with_alpha(0x1F), None, &["skipscale"]),
        line(1, "t_min", p.trend_min, None, &[]),
        line(1, "t_max", p.trend_max, None, &[]),
        line(1, "t_avg", p.trend_avg, None, &[]),
        line(1, "g_max", p.global_max, Some("↓Общий наиб.\\t"), &["dashes"]),
        line(1, "g_avg", p.global_avg, Some("↓Общий сред.\\t"), &["dashes"]),
        comment("↓Послед. наим.\\t"),
        comment("↓Послед. наиб.\\t"),
        comment("↓Послед. сред.\\n"),
        gprint("g_max", "%2.4lf %sHz/sec\\t"),
        gprint("g_avg", "%2.4lf %sHz/sec\\t"),
        gprint("g_last_min", "%2.4lf %sHz/sec\\t"),
        gprint("g_last_max", "%2.4lf %sHz/sec\\t"),
        gprint("g_last_avg", "%2.4lf %sHz/sec\\n"),
        notice_errors(ctx.error_percent),
    ]);
    Ok(out)
}
