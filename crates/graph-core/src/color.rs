// File: crates/graph-core/src/color.rs
// Summary: RGBA hex colors as rrdtool expects them and linear gradients between two colors.

use std::fmt;
use std::str::FromStr;

use crate::error::GraphError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

impl FromStr for Rgba {
    type Err = GraphError;

    /// Accepts `#RRGGBB` or `#RRGGBBAA`; a missing alpha means opaque.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || GraphError::validation(format!("expected #RRGGBB or #RRGGBBAA color, got {s:?}"));
        let hex = s.strip_prefix('#').ok_or_else(bad)?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.bytes().all(|c| c.is_ascii_hexdigit()) {
            return Err(bad());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| bad());
        let a = if hex.len() == 8 { channel(6)? } else { 0xFF };
        Ok(Self { r: channel(0)?, g: channel(2)?, b: channel(4)?, a })
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)?;
        if self.a != 0xFF {
            write!(f, "{:02X}", self.a)?;
        }
        Ok(())
    }
}

/// Per-channel blend `a*t + b*(1-t)`: `t = 1` gives `a`, `t = 0` gives `b`.
/// Channels are rounded to the nearest integer.
pub fn interpolate(a: Rgba, b: Rgba, t: f64) -> Rgba {
    let mix = |x: u8, y: u8| -> u8 {
        let v = x as f64 * t + y as f64 * (1.0 - t);
        v.round().clamp(0.0, 255.0) as u8
    };
    Rgba {
        r: mix(a.r, b.r),
        g: mix(a.g, b.g),
        b: mix(a.b, b.b),
        a: mix(a.a, b.a),
    }
}

/// `n` colors where position `i` sits at `t = i / (n - 1)`; index 0 is `b`, the last is `a`.
/// A single position gets `b`.
pub fn gradient(a: Rgba, b: Rgba, n: usize) -> Vec<Rgba> {
    match n {
        0 => Vec::new(),
        1 => vec![b],
        _ => (0..n)
            .map(|i| interpolate(a, b, i as f64 / (n - 1) as f64))
            .collect(),
    }
}
