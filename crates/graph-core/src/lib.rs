// File: crates/graph-core/src/lib.rs
// Summary: Core library entry point; exports the expression compiler, range detection and
//          command assembly used to drive rrdtool.

pub mod axis;
pub mod blacklist;
pub mod charts;
pub mod color;
pub mod command;
pub mod detect;
pub mod error;
pub mod expr;
pub mod graph;
pub mod legend;
pub mod palette;
pub mod renderer;
pub mod types;
pub mod units;

pub use axis::AxisPlan;
pub use blacklist::{filter_dump, Blacklist};
pub use charts::{ChartContext, ChartDef};
pub use color::{gradient, interpolate, Rgba};
pub use command::{Command, Mode, RenderOptions};
pub use detect::{Period, ProbeTargets, ValueBounds};
pub use error::{GraphError, Result};
pub use expr::{Cf, Expr, Op};
pub use graph::{build_command, validate_source_path, GraphJob, RangeRequest, Window};
pub use palette::Palette;
pub use renderer::{Renderer, RrdTool};
pub use units::{humanize, TrendSpec};
