use crate::compiler::CompilerLocation;
use crate::manifest::PackageManifest;
use crate::schema_source::{GenerateOutcome, SchemaSource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

/// Outcome of one schema source in a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaReport {
    #[serde(flatten)]
    pub source: SchemaSource,
    pub outcome: GenerateOutcome,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateSummary {
    pub generated: u64,
    pub skipped: u64,
}

/// Record of a completed build, written next to the manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildReport {
    pub schema: String,
    pub tool: ToolInfo,

    #[serde(default)]
    pub run: RunInfo,

    /// Absent when every derived source was already current.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiler: Option<CompilerLocation>,

    #[serde(default)]
    pub schemas: Vec<SchemaReport>,

    #[serde(default)]
    pub summary: GenerateSummary,

    pub manifest: PackageManifest,
}

impl BuildReport {
    pub fn new(tool: ToolInfo, manifest: PackageManifest) -> Self {
        Self {
            schema: crate::schema::PROTOPACK_REPORT_V1.to_string(),
            tool,
            run: RunInfo::default(),
            compiler: None,
            schemas: Vec::new(),
            summary: GenerateSummary::default(),
            manifest,
        }
    }

    /// Append a schema outcome and keep the summary in step.
    pub fn record(&mut self, source: SchemaSource, outcome: GenerateOutcome) {
        match outcome {
            GenerateOutcome::Generated => self.summary.generated += 1,
            GenerateOutcome::Skipped => self.summary.skipped += 1,
        }
        self.schemas.push(SchemaReport { source, outcome });
    }
}
