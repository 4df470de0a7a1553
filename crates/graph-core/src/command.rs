// File: crates/graph-core/src/command.rs
// Summary: Render options, the assembled rrdtool command and its print/execute modes.

use std::fmt;
use std::path::Path;

use tracing::info;

use crate::color::Rgba;
use crate::error::Result;
use crate::renderer::Renderer;
use crate::types::{HEIGHT, TAB_WIDTH, WIDTH};

/// Fixed flags every production chart starts with.
#[derive(Clone, Debug)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub tab_width: u32,
    pub pango_markup: bool,
    pub alt_autoscale: bool,
    pub alt_y_grid: bool,
    /// Canvas background; `None` keeps the renderer default.
    pub background: Option<Rgba>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            tab_width: TAB_WIDTH,
            pango_markup: true,
            alt_autoscale: true,
            alt_y_grid: true,
            background: Some(Rgba::new(0xFF, 0xFF, 0xFF, 0x00)), // transparent
        }
    }
}

impl RenderOptions {
    /// `graph <image>` followed by canvas and markup flags.
    pub fn base_args(&self, image: &Path) -> Vec<String> {
        let mut out = vec![
            "graph".to_string(),
            image.display().to_string(),
            "--width".to_string(),
            self.width.to_string(),
            "--height".to_string(),
            self.height.to_string(),
        ];
        if self.pango_markup {
            out.push("--pango-markup".to_string());
        }
        out.extend(["--tabwidth".to_string(), self.tab_width.to_string()]);
        if self.alt_autoscale {
            out.push("--alt-autoscale".to_string());
        }
        if self.alt_y_grid {
            out.push("--alt-y-grid".to_string());
        }
        if let Some(bg) = self.background {
            out.extend(["--color".to_string(), format!("BACK{bg}")]);
        }
        out
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Print the shell-quoted command instead of running it.
    Print,
    #[default]
    Execute,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    pub program: String,
    pub args: Vec<String>,
}

impl Command {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self { program: program.into(), args }
    }

    pub fn shell_quoted(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(shell_quote)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Print or execute. A failed execution is returned with the renderer's status.
    pub fn run(&self, mode: Mode, renderer: &dyn Renderer) -> Result<()> {
        match mode {
            Mode::Print => {
                println!("{}", self.shell_quoted());
                Ok(())
            }
            Mode::Execute => {
                info!("rendering with {} ({} arguments)", self.program, self.args.len());
                renderer.execute(&self.args)
            }
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.shell_quoted())
    }
}

/// POSIX single-quote `s`; embedded quotes become `'\''`.
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}
