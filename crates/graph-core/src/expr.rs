// File: crates/graph-core/src/expr.rs
// Summary: Postfix (RPN) expression tree for rrdtool CDEF/VDEF declarations and its builders.
// Notes:
// - Expressions are never evaluated here. They are flattened once, at emission
//   time, into the comma-separated token stream rrdtool parses left to right.

use std::fmt;
use std::path::Path;

use crate::error::{GraphError, Result};
use crate::legend::esc_colon;

/// Operator tokens of the renderer's RPN language that this crate emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    Un,
    If,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Min,
    Max,
    MinNan,
    MaxNan,
    Limit,
    Avg,
    Pop,
    Trend,
    TrendNan,
    Percent,
    PercentNan,
    Average,
    Minimum,
    Maximum,
    Stdev,
    Last,
    NewDay,
    NewWeek,
    NewMonth,
    NewYear,
    Time,
    StepWidth,
    Unkn,
}

impl Op {
    pub fn token(self) -> &'static str {
        match self {
            Op::Lt => "LT",
            Op::Gt => "GT",
            Op::Le => "LE",
            Op::Ge => "GE",
            Op::Eq => "EQ",
            Op::Ne => "NE",
            Op::Un => "UN",
            Op::If => "IF",
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Div => "/",
            Op::Mod => "%",
            Op::Min => "MIN",
            Op::Max => "MAX",
            Op::MinNan => "MINNAN",
            Op::MaxNan => "MAXNAN",
            Op::Limit => "LIMIT",
            Op::Avg => "AVG",
            Op::Pop => "POP",
            Op::Trend => "TREND",
            Op::TrendNan => "TRENDNAN",
            Op::Percent => "PERCENT",
            Op::PercentNan => "PERCENTNAN",
            Op::Average => "AVERAGE",
            Op::Minimum => "MINIMUM",
            Op::Maximum => "MAXIMUM",
            Op::Stdev => "STDEV",
            Op::Last => "LAST",
            Op::NewDay => "NEWDAY",
            Op::NewWeek => "NEWWEEK",
            Op::NewMonth => "NEWMONTH",
            Op::NewYear => "NEWYEAR",
            Op::Time => "TIME",
            Op::StepWidth => "STEPWIDTH",
            Op::Unkn => "UNKN",
        }
    }

    /// Binary operators for which a left fold over N operands is order-independent in grouping.
    pub fn is_associative(self) -> bool {
        matches!(self, Op::Add | Op::Mul | Op::Min | Op::Max | Op::MinNan | Op::MaxNan)
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A possibly nested sequence of RPN operands and operators.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Series or scalar reference.
    Var(String),
    Num(f64),
    Int(i64),
    Op(Op),
    Seq(Vec<Expr>),
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Self { Expr::Var(name.into()) }

    pub fn seq<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Expr>,
    {
        Expr::Seq(items.into_iter().map(Into::into).collect())
    }

    /// `a,b,op`
    pub fn binary(op: Op, a: impl Into<Expr>, b: impl Into<Expr>) -> Self {
        Expr::Seq(vec![a.into(), b.into(), Expr::Op(op)])
    }

    /// `a,op`
    pub fn unary(op: Op, a: impl Into<Expr>) -> Self {
        Expr::Seq(vec![a.into(), Expr::Op(op)])
    }

    /// Flat token list, depth-first and left to right.
    pub fn tokens(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(&self, out: &mut Vec<String>) {
        match self {
            Expr::Var(v) => out.push(v.clone()),
            Expr::Num(n) => out.push(fmt_num(*n)),
            Expr::Int(i) => out.push(i.to_string()),
            Expr::Op(op) => out.push(op.token().to_string()),
            Expr::Seq(items) => {
                for item in items {
                    item.flatten_into(out);
                }
            }
        }
    }
}

fn fmt_num(n: f64) -> String {
    if n.is_nan() {
        "UNKN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "INF".to_string() } else { "NEGINF".to_string() }
    } else {
        n.to_string()
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join(std::slice::from_ref(self)))
    }
}

impl From<&str> for Expr {
    fn from(v: &str) -> Self { Expr::Var(v.to_string()) }
}

impl From<String> for Expr {
    fn from(v: String) -> Self { Expr::Var(v) }
}

impl From<&String> for Expr {
    fn from(v: &String) -> Self { Expr::Var(v.clone()) }
}

impl From<f64> for Expr {
    fn from(v: f64) -> Self { Expr::Num(v) }
}

impl From<i64> for Expr {
    fn from(v: i64) -> Self { Expr::Int(v) }
}

impl From<u64> for Expr {
    fn from(v: u64) -> Self { Expr::Int(v as i64) }
}

impl From<usize> for Expr {
    fn from(v: usize) -> Self { Expr::Int(v as i64) }
}

impl From<Op> for Expr {
    fn from(op: Op) -> Self { Expr::Op(op) }
}

impl From<Vec<Expr>> for Expr {
    fn from(items: Vec<Expr>) -> Self { Expr::Seq(items) }
}

/// Serialize nested operands into one comma-joined token stream.
/// Every rendered expression, `Display` included, goes through here.
pub fn join(operands: &[Expr]) -> String {
    operands
        .iter()
        .flat_map(Expr::tokens)
        .collect::<Vec<_>>()
        .join(",")
}

/// Left fold of an associative binary `op`: `e0,e1,op,e2,op,...`.
/// A single operand is returned unchanged.
pub fn chain(op: Op, operands: Vec<Expr>) -> Result<Expr> {
    if !op.is_associative() {
        return Err(GraphError::validation(format!("`{op}` is not associative and cannot be chained")));
    }
    let mut it = operands.into_iter();
    let first = it
        .next()
        .ok_or_else(|| GraphError::validation(format!("`{op}` chain needs at least one operand")))?;
    let rest: Vec<Expr> = it.collect();
    if rest.is_empty() {
        return Ok(first);
    }
    let mut out = Vec::with_capacity(1 + rest.len() * 2);
    out.push(first);
    for e in rest {
        out.push(e);
        out.push(Expr::Op(op));
    }
    Ok(Expr::Seq(out))
}

/// Arithmetic mean of the operands: `e0,...,eN-1,N,AVG`.
pub fn average(operands: Vec<Expr>) -> Result<Expr> {
    if operands.is_empty() {
        return Err(GraphError::validation("average needs at least one operand"));
    }
    let n = operands.len();
    let mut out = operands;
    out.push(Expr::from(n));
    out.push(Expr::Op(Op::Avg));
    Ok(Expr::Seq(out))
}

/// Clamp `value` into `[lower, upper]`. With `allow_undefined`, the NaN-tolerant
/// MIN/MAX variants are used so an unknown bound does not swallow the sample.
pub fn fit(value: impl Into<Expr>, lower: impl Into<Expr>, upper: impl Into<Expr>, allow_undefined: bool) -> Expr {
    let (min, max) = if allow_undefined { (Op::MinNan, Op::MaxNan) } else { (Op::Min, Op::Max) };
    Expr::Seq(vec![value.into(), upper.into(), Expr::Op(min), lower.into(), Expr::Op(max)])
}

/// `value` if it lies within `[lower, upper]`, unknown otherwise.
pub fn drop(value: impl Into<Expr>, lower: impl Into<Expr>, upper: impl Into<Expr>) -> Expr {
    Expr::Seq(vec![value.into(), lower.into(), upper.into(), Expr::Op(Op::Limit)])
}

/// 1 on period-boundary samples; `dummy` only ties the CDEF to a series and is popped.
pub fn zero_tick(boundary: impl Into<crate::units::Granularity>, dummy: impl Into<Expr>) -> Expr {
    Expr::Seq(vec![boundary.into().boundary(), dummy.into(), Expr::Op(Op::Pop)])
}

pub fn declare_derived(name: &str, expr: impl Into<Expr>) -> String {
    format!("CDEF:{}={}", name, expr.into())
}

pub fn declare_scalar(name: &str, expr: impl Into<Expr>) -> String {
    format!("VDEF:{}={}", name, expr.into())
}

/// Consolidation function of a stored series.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cf {
    Average,
    Min,
    Max,
    Last,
}

impl Cf {
    pub fn token(self) -> &'static str {
        match self {
            Cf::Average => "AVERAGE",
            Cf::Min => "MIN",
            Cf::Max => "MAX",
            Cf::Last => "LAST",
        }
    }
}

pub fn def(name: &str, rrd: &Path, ds: &str, cf: Cf) -> String {
    format!("DEF:{}={}:{}:{}", name, esc_colon(&rrd.display().to_string()), ds, cf.token())
}

/// DEF with its own fetch window, e.g. `start=now-172800:end=now-86400`.
pub fn def_window(name: &str, rrd: &Path, ds: &str, cf: Cf, start: &str, end: &str) -> String {
    format!("{}:start={}:end={}", def(name, rrd, ds, cf), start, end)
}

pub fn shift(name: &str, seconds: i64) -> String {
    format!("SHIFT:{name}:{seconds}")
}

/// Moving-window smoothing of `from` over `window` seconds, shifted back by half
/// the window so the trend is centered on the samples it averages.
pub fn trend(name: &str, from: &str, window: u64) -> [String; 2] {
    let half = (-(window as i64)).div_euclid(2);
    [
        declare_derived(name, Expr::binary(Op::TrendNan, from, window)),
        shift(name, half),
    ]
}
