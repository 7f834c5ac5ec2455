//! Error types for protopack-core.
//!
//! Every variant is fatal to the build. The variants exist so callers can
//! pick the exit status and print the diagnostic the user expects:
//! - Missing compiler (exit code 255)
//! - Missing schema file, compiler failure, I/O and other tool errors (exit code 1)

use camino::Utf8PathBuf;
use thiserror::Error;

/// The top-level error type for protopack builds.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Neither the override variable nor the search path yielded an executable.
    #[error(
        "{name} not found. Is protobuf-compiler installed? \
         Please visit https://developers.google.com/protocol-buffers/ for instructions."
    )]
    CompilerNotFound { name: String },

    /// A schema file handed to regeneration does not exist.
    #[error("Cannot find required file: {path}")]
    MissingSchema { path: Utf8PathBuf },

    /// The compiler ran but did not exit successfully.
    #[error(
        "Error encountered while compiling proto file: {schema} ({})",
        exit_label(.code)
    )]
    CompilerFailed {
        schema: Utf8PathBuf,
        /// `None` when the process was terminated by a signal.
        code: Option<i32>,
    },

    /// A runtime/tool error occurred (I/O, discovery, serialization).
    #[error("{0:#}")]
    Runtime(#[from] anyhow::Error),
}

impl BuildError {
    /// Returns the recommended process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            BuildError::CompilerNotFound { .. } => 255,
            BuildError::MissingSchema { .. }
            | BuildError::CompilerFailed { .. }
            | BuildError::Runtime(_) => 1,
        }
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("exit status {c}"),
        None => "terminated by signal".to_string(),
    }
}

/// Result type alias using BuildError.
pub type BuildResult<T> = Result<T, BuildError>;
