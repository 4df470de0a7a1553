// File: crates/graph-core/src/types.rs
// Summary: Shared constants (canvas size, probe sizes, output sink).

/// Default canvas width in pixels.
pub const WIDTH: u32 = 960;
/// Default canvas height in pixels.
pub const HEIGHT: u32 = 384;
/// Legend tab stop in pixels.
pub const TAB_WIDTH: u32 = 100;

/// Canvas used by the period probe; small because the image is thrown away.
pub const PROBE_WIDTH: u32 = 256;
pub const PROBE_HEIGHT: u32 = 128;

/// Output target for probe passes.
#[cfg(windows)]
pub const NULL_DEVICE: &str = "NUL";
#[cfg(not(windows))]
pub const NULL_DEVICE: &str = "/dev/null";

/// Default renderer executable.
pub const RRDTOOL: &str = "rrdtool";
