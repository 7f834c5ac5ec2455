use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// Where a compiler path was resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSource {
    /// The explicit override environment variable (e.g. `PROTOC`).
    EnvOverride,
    /// A directory listed in `PATH`.
    SearchPath,
}

/// A resolved, existing, executable compiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerLocation {
    pub path: Utf8PathBuf,
    pub source: LocationSource,
}

impl CompilerLocation {
    pub fn new(path: impl Into<Utf8PathBuf>, source: LocationSource) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}
