//! Port traits abstracting all side effects away from the pipeline.

use camino::{Utf8Path, Utf8PathBuf};
use protopack_types::manifest::PackageManifest;

/// Read access to the process environment.
pub trait EnvPort {
    fn var(&self, key: &str) -> Option<String>;
}

/// A fully-formed external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: Utf8PathBuf,
    pub args: Vec<String>,
}

impl Invocation {
    /// Space-joined rendering used in log lines.
    pub fn command_line(&self) -> String {
        let mut parts = vec![self.program.to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Runs an external command to completion.
pub trait ProcessPort {
    /// Returns the exit code, or `None` if the process was killed by a signal.
    fn run(&self, invocation: &Invocation) -> anyhow::Result<Option<i32>>;
}

/// The packaging step that the build hook delegates to.
pub trait Packager {
    fn build(&self, manifest: &PackageManifest) -> anyhow::Result<()>;
}

/// File-system write operations.
pub trait WritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()>;
    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()>;
}
