use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// Extension of compiler input files.
pub const SCHEMA_EXTENSION: &str = "proto";

/// A schema definition file and the path of the source derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSource {
    pub source: Utf8PathBuf,
    pub output: Utf8PathBuf,
}

impl SchemaSource {
    /// Derive the output path by swapping the `.proto` extension for `output_suffix`.
    ///
    /// The output is written next to the source: `proto/a.proto` with suffix
    /// `_pb2.py` becomes `proto/a_pb2.py`.
    pub fn new(source: impl Into<Utf8PathBuf>, output_suffix: &str) -> Self {
        let source = source.into();
        let stem = match source.extension() {
            Some(SCHEMA_EXTENSION) => source.file_stem().unwrap_or_default(),
            _ => source.file_name().unwrap_or_default(),
        };
        let file_name = format!("{stem}{output_suffix}");
        let output = match source.parent() {
            Some(parent) => parent.join(file_name),
            None => Utf8PathBuf::from(file_name),
        };
        Self { source, output }
    }

    /// Directory used as both include root and output root for the compiler.
    pub fn schema_dir(&self) -> &Utf8Path {
        match self.source.parent() {
            Some(p) if !p.as_str().is_empty() => p,
            _ => Utf8Path::new("."),
        }
    }
}

/// Staleness of a derived output relative to its schema source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    /// No derived output exists yet.
    Missing,
    /// The source was modified at or after the output.
    Stale,
    /// The output is strictly newer than the source.
    Current,
}

impl Freshness {
    pub fn needs_regeneration(self) -> bool {
        !matches!(self, Freshness::Current)
    }
}

/// What happened to a single schema source during a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerateOutcome {
    Generated,
    Skipped,
}
