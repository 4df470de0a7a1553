// File: crates/graph-core/src/palette.rs
// Summary: Fixed drawing colors shared by the frequency chart definitions.

use crate::color::Rgba;

#[derive(Clone, Copy, Debug)]
pub struct Palette {
    pub name: &'static str,
    /// Tick for samples with no data.
    pub missing: Rgba,
    /// Tick for samples where every overlaid period is missing.
    pub missing_all: Rgba,
    /// Period boundary marker.
    pub boundary: Rgba,
    pub low: Rgba,
    pub high: Rgba,
    pub nominal: Rgba,
    pub raw_min: Rgba,
    pub raw_max: Rgba,
    pub raw_avg: Rgba,
    pub trend_min: Rgba,
    pub trend_max: Rgba,
    pub trend_avg: Rgba,
    pub global_min: Rgba,
    pub global_max: Rgba,
    pub global_avg: Rgba,
    /// Overall average across overlaid periods.
    pub overall: Rgba,
    /// Raw overlay lines, oldest and most recent period.
    pub depth_oldest: Rgba,
    pub depth_recent: Rgba,
    /// Trend overlay lines, oldest and most recent period.
    pub depth_trend_oldest: Rgba,
    pub depth_trend_recent: Rgba,
}

impl Palette {
    pub const fn classic() -> Self {
        Self {
            name: "classic",
            missing: Rgba::rgb(0xBF, 0xBF, 0xBF),
            missing_all: Rgba::rgb(0x7F, 0x7F, 0x7F),
            boundary: Rgba::rgb(0xFF, 0xFF, 0x00),
            low: Rgba::rgb(0x00, 0x00, 0xFF),
            high: Rgba::rgb(0xFF, 0x00, 0x00),
            nominal: Rgba::rgb(0x7F, 0x00, 0x7F),
            raw_min: Rgba::rgb(0x00, 0x00, 0xFF),
            raw_max: Rgba::rgb(0xFF, 0x00, 0x00),
            raw_avg: Rgba::rgb(0x00, 0xFF, 0x00),
            trend_min: Rgba::rgb(0x3F, 0x3F, 0xFF),
            trend_max: Rgba::rgb(0xFF, 0x3F, 0x3F),
            trend_avg: Rgba::rgb(0x3F, 0x7F, 0x3F),
            global_min: Rgba::rgb(0x00, 0x00, 0x7F),
            global_max: Rgba::rgb(0x7F, 0x00, 0x00),
            global_avg: Rgba::rgb(0x00, 0x7F, 0x00),
            overall: Rgba::rgb(0x00, 0x00, 0x00),
            depth_oldest: Rgba::new(0x00, 0xFF, 0xFF, 0x7F),
            depth_recent: Rgba::new(0xFF, 0xFF, 0x00, 0x7F),
            depth_trend_oldest: Rgba::rgb(0x00, 0x7F, 0x7F),
            depth_trend_recent: Rgba::rgb(0x7F, 0x7F, 0x00),
        }
    }
}

impl Default for Palette {
    fn default() -> Self { Self::classic() }
}
