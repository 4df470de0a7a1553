// File: crates/graph-core/src/error.rs
// Summary: Error kinds surfaced while building and running rrdtool commands.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Debug, Error)]
pub enum GraphError {
    /// Bad argument or input path; nothing was run.
    #[error("invalid argument: {0}")]
    Validation(String),

    /// A probe report lacked a required field or broke an invariant.
    #[error("detection failed: {0}")]
    Detection(String),

    /// The renderer ran and exited unsuccessfully.
    #[error("`{program}` exited with {}{}", fmt_code(.code), fmt_stderr(.stderr))]
    Subprocess {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("failed to launch `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl GraphError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn detection(msg: impl Into<String>) -> Self {
        Self::Detection(msg.into())
    }

    /// Exit code to hand back to the shell, if the renderer produced one.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Subprocess { code, .. } => *code,
            _ => None,
        }
    }
}

fn fmt_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {c}"),
        None => "no status (terminated by signal)".to_string(),
    }
}

fn fmt_stderr(stderr: &str) -> String {
    if stderr.is_empty() { String::new() } else { format!(": {stderr}") }
}
