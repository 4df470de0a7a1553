// File: crates/graph-core/src/legend.rs
// Summary: Graph elements (LINE, TICK, HRULE, COMMENT, GPRINT, PRINT) rendered as rrdtool arguments.
// Notes:
// - Text fields are colon-escaped; `\n` and `\t` are left to the caller as the
//   two-character rrdtool markers (`"\\n"` in Rust source).

use crate::color::Rgba;

pub fn esc_colon(text: &str) -> String {
    text.replace(':', "\\:")
}

pub fn comment(text: &str) -> String {
    format!("COMMENT:{}", esc_colon(text))
}

/// Bold `# text` heading with optional plain trailer, ending the legend line.
pub fn comment_header(text: &str, extra: Option<&str>) -> String {
    let mut s = format!("<b># {text}</b>");
    if let Some(extra) = extra {
        s.push(' ');
        s.push_str(extra);
    }
    s.push_str("\\n");
    comment(&s)
}

/// Footnote explaining the percentile clipping applied to the data.
pub fn notice_errors(error_percent: f64) -> String {
    comment(&format!(
        "{error_percent}% наименьших и наибольших значений считаются ошибками и шумом, \
         они отбрасываются и не учитываются.\\n"
    ))
}

pub fn text_align_left() -> String {
    "TEXTALIGN:left".to_string()
}

/// `TICK:vname#color[:fraction[:legend]]`
pub fn tick(vname: &str, color: Rgba, fraction: Option<f64>, legend: Option<&str>) -> String {
    let mut s = format!("TICK:{vname}{color}");
    if fraction.is_some() || legend.is_some() {
        s.push(':');
        if let Some(fr) = fraction {
            s.push_str(&fr.to_string());
        }
        if let Some(legend) = legend {
            s.push(':');
            s.push_str(&esc_colon(legend));
        }
    }
    s
}

fn with_legend_and_flags(mut s: String, legend: Option<&str>, flags: &[&str]) -> String {
    if legend.is_some() || !flags.is_empty() {
        s.push(':');
        if let Some(legend) = legend {
            s.push_str(&esc_colon(legend));
        }
        for flag in flags {
            s.push(':');
            s.push_str(flag);
        }
    }
    s
}

/// `LINEw:vname#color[:legend[:flag...]]`
pub fn line(width: u8, vname: &str, color: Rgba, legend: Option<&str>, flags: &[&str]) -> String {
    with_legend_and_flags(format!("LINE{width}:{vname}{color}"), legend, flags)
}

/// Horizontal rule at a fixed value.
pub fn hrule(value: f64, color: Rgba, legend: Option<&str>, flags: &[&str]) -> String {
    with_legend_and_flags(format!("HRULE:{value}{color}"), legend, flags)
}

/// `format` is passed through verbatim (printf-style, may carry `\t`/`\n` markers).
pub fn gprint(vname: &str, format: &str) -> String {
    format!("GPRINT:{vname}:{format}")
}

/// Report line on stdout of the form `<label>:<value>`.
pub fn print(vname: &str, label: &str) -> String {
    format!("PRINT:{vname}:{}\\:%lf", esc_colon(label))
}
