// File: crates/graph-core/src/blacklist.rs
// Summary: Time-range blacklist and the `rrdtool dump` XML filter that blanks blacklisted rows.

use std::io::{BufRead, Write};
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::error::Result;

static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#.*").expect("valid regex"));
static RANGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([0-9]+):([0-9]+)").expect("valid regex"));
static ROW_TIME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" / ([0-9]+) -->").expect("valid regex"));
static VALUE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<v>[^<>]+</v>").expect("valid regex"));

/// Inclusive `[begin, end]` epoch ranges whose samples are discarded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Blacklist {
    ranges: Vec<(u64, u64)>,
}

impl Blacklist {
    pub fn new(ranges: Vec<(u64, u64)>) -> Self {
        Self { ranges }
    }

    /// One `<begin>:<end>` per line; `#` starts a comment.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut ranges = Vec::new();
        for (n, line) in reader.lines().enumerate() {
            let line = line?;
            let text = COMMENT.replace(&line, "");
            if text.trim().is_empty() {
                continue;
            }
            let parsed = RANGE
                .captures(&text)
                .and_then(|c| Some((c[1].parse::<u64>().ok()?, c[2].parse::<u64>().ok()?)));
            match parsed {
                Some(range) => ranges.push(range),
                None => warn!("blacklist line {}: expected `<begin>:<end>`, got {:?}", n + 1, line),
            }
        }
        Ok(Self { ranges })
    }

    pub fn ranges(&self) -> &[(u64, u64)] {
        &self.ranges
    }

    pub fn contains(&self, t: u64) -> bool {
        self.ranges.iter().any(|&(begin, end)| begin <= t && t <= end)
    }
}

/// Copy a dump line by line, replacing every value of blacklisted rows with `NaN`.
/// Returns the number of rows rewritten.
pub fn filter_dump<R: BufRead, W: Write>(mut input: R, mut output: W, blacklist: &Blacklist) -> Result<usize> {
    let mut rewritten = 0;
    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let hit = ROW_TIME
            .captures(&line)
            .and_then(|c| c[1].parse::<u64>().ok())
            .is_some_and(|t| blacklist.contains(t));
        if hit {
            rewritten += 1;
            output.write_all(VALUE.replace_all(&line, "<v> NaN </v>").as_bytes())?;
        } else {
            output.write_all(line.as_bytes())?;
        }
    }
    output.flush()?;
    Ok(rewritten)
}
