// File: crates/graph-core/src/renderer.rs
// Summary: Renderer trait (subprocess seam) and the rrdtool-backed implementation.

use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::error::{GraphError, Result};

/// External rendering engine. `args` never include the program name.
pub trait Renderer {
    fn program(&self) -> &str;

    /// Run a throwaway invocation and return its captured standard output.
    fn probe(&self, args: &[String]) -> Result<String>;

    /// Run the production invocation with inherited stdio.
    fn execute(&self, args: &[String]) -> Result<()>;
}

#[derive(Clone, Debug)]
pub struct RrdTool {
    program: String,
}

impl RrdTool {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }

    fn spawn_error(&self, source: std::io::Error) -> GraphError {
        GraphError::Spawn { program: self.program.clone(), source }
    }
}

impl Default for RrdTool {
    fn default() -> Self { Self::new(crate::types::RRDTOOL) }
}

impl Renderer for RrdTool {
    fn program(&self) -> &str { &self.program }

    fn probe(&self, args: &[String]) -> Result<String> {
        debug!(program = %self.program, ?args, "probe");
        // fixed numeric locale so printed values are parseable
        let output = Command::new(&self.program)
            .args(args)
            .env("LC_ALL", "C")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            return Err(GraphError::Subprocess {
                program: self.program.clone(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn execute(&self, args: &[String]) -> Result<()> {
        debug!(program = %self.program, ?args, "execute");
        let status = Command::new(&self.program)
            .args(args)
            .status()
            .map_err(|e| self.spawn_error(e))?;
        info!(%status, "{} finished", self.program);
        if status.success() {
            Ok(())
        } else {
            Err(GraphError::Subprocess { program: self.program.clone(), code: status.code(), stderr: String::new() })
        }
    }
}
