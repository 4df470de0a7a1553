// File: crates/graph-core/src/charts/spread.rs
// Summary: Spread between clipped max and min frequency per sample, floored at zero.

use super::{measurements_header, title, Capabilities, ChartContext, ChartDef};
use crate::detect::ProbeTargets;
use crate::error::Result;
use crate::expr::{declare_derived as cdef, declare_scalar as vdef, def, drop, trend, zero_tick, Cf, Expr, Op};
use crate::legend::{comment, gprint, line, notice_errors, text_align_left, tick};

pub const SOURCE: &str = "freq";

pub fn chart() -> ChartDef {
    ChartDef {
        id: "spread",
        about: "Spread between max and min frequency over a floating time window",
        source: SOURCE,
        caps: Capabilities {
            overlay: false,
            probe: Some(ProbeTargets::max_only("g_diff_max")),
            force_floor: Some(0.0),
        },
        declare,
    }
}

fn declare(ctx: &ChartContext<'_>) -> Result<Vec<String>> {
    let p = ctx.palette;
    let w = ctx.trend_window;
    let mut out = Vec::new();
    out.extend(title(ctx, "Разброс частоты в сети", "Hz"));
    out.extend([
        def("r_min", ctx.rrd, SOURCE, Cf::Min),
        def("r_max", ctx.rrd, SOURCE, Cf::Max),
        vdef("g_min", Expr::binary(Op::PercentNan, "r_min", ctx.lower_percentile())),
        vdef("g_max", Expr::binary(Op::PercentNan, "r_max", ctx.upper_percentile())),
        cdef("f_min", drop("r_min", "g_min", "g_max")),
        cdef("f_max", drop("r_max", "g_min", "g_max")),
        cdef("r_diff", Expr::binary(Op::Sub, "f_max", "f_min")),
        vdef("g_diff_min", Expr::unary(Op::Minimum, "r_diff")),
        vdef("g_diff_max", Expr::unary(Op::Maximum, "r_diff")),
    ]);
    out.extend(trend("t_diff", "r_diff", w));
    out.extend([
        vdef("g_last", Expr::unary(Op::Last, "r_diff")),
        cdef("e_avg_min", Expr::binary(Op::Lt, "r_min", "g_min")),
        cdef("e_avg_max", Expr::binary(Op::Gt, "r_max", "g_max")),
        cdef("e_miss", Expr::unary(Op::Un, "r_min")),
        cdef("ztick", zero_tick(ctx.period, "r_min")),
        text_align_left(),
        comment("Маркеры:"),
        tick("e_miss", p.missing, Some(1.0), Some("  Нет данных")),
        tick("ztick", p.boundary, Some(1.0), None),
        tick("e_avg_min", p.low, Some(0.02), Some("  Возм. ошибки вниз")),
        tick("e_avg_max", p.high, Some(-0.02), Some("  Возм. ошибки вверх\\n")),
        measurements_header("Разброс измерений:", w),
        line(1, "r_diff", p.raw_avg.with_alpha(0x7F), None, &["skipscale"]),
        line(1, "t_diff", p.trend_avg, None, &[]),
        line(1, "g_diff_min", p.global_min, Some("↓Наим.\\t"), &["dashes"]),
        line(1, "g_diff_max", p.global_max, Some("↓Наиб.\\t"), &["dashes"]),
        comment("↓Последний\\n"),
        gprint("g_diff_min", "%3.4lf %sHz\\t"),
        gprint("g_diff_max", "%3.4lf %sHz\\t"),
        gprint("g_last", "%2.4lf %sHz\\n"),
        notice_errors(ctx.error_percent),
    ]);
    Ok(out)
}
