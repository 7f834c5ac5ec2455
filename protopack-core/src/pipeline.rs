//! Manifest assembly and the build hook.
//!
//! These entry points are I/O-agnostic where it matters: the environment,
//! the compiler process and the packaging step all go through port traits.

use crate::error::BuildResult;
use crate::generate::Regenerator;
use crate::ports::{EnvPort, Packager, ProcessPort, WritePort};
use crate::settings::BuildSettings;
use anyhow::Context;
use camino::Utf8Path;
use chrono::Utc;
use protopack_discover::{
    DataFileQuery, PackageQuery, find_data_files, find_namespaced_packages, find_schema_sources,
};
use protopack_types::compiler::CompilerLocation;
use protopack_types::manifest::PackageManifest;
use protopack_types::report::{BuildReport, SchemaReport, ToolInfo};
use tracing::info;

/// Discover packages and data files and assemble the manifest.
pub fn build_manifest(settings: &BuildSettings) -> anyhow::Result<PackageManifest> {
    let mut manifest = PackageManifest::new(settings.distribution.clone());

    manifest.packages = find_namespaced_packages(&PackageQuery {
        root: settings.source_root(),
        namespace: settings.namespace.clone(),
        marker: settings.package_marker.clone(),
    })
    .context("discover packages")?;

    manifest
        .package_dir
        .insert(settings.namespace.clone(), settings.source_root.clone());

    manifest.data_files = find_data_files(&DataFileQuery {
        project_root: settings.project_root.clone(),
        schema_dir: settings.data.schema_dir.clone(),
        extension: settings.data.extension.clone(),
        namespace: settings.namespace.clone(),
    })
    .context("discover data files")?;

    Ok(manifest)
}

/// Outcome of `run_generate`.
#[derive(Debug, Clone, Default)]
pub struct GenerateOutcomes {
    /// Set only if some source needed the compiler.
    pub compiler: Option<CompilerLocation>,
    pub schemas: Vec<SchemaReport>,
}

/// Regenerate every schema source in the proto directory, in path order.
///
/// Stops at the first failure.
pub fn run_generate(
    settings: &BuildSettings,
    env: &dyn EnvPort,
    process: &dyn ProcessPort,
) -> BuildResult<GenerateOutcomes> {
    let sources = find_schema_sources(&settings.proto_dir(), &settings.codegen.output_suffix)
        .context("discover schema sources")?;

    let mut regen = Regenerator::new(env, process, &settings.codegen);
    let mut schemas = Vec::with_capacity(sources.len());
    for source in sources {
        info!("Generating proto: {}", source.source);
        let outcome = regen.regenerate(&source)?;
        schemas.push(SchemaReport { source, outcome });
    }

    Ok(GenerateOutcomes {
        compiler: regen.into_compiler(),
        schemas,
    })
}

/// The build hook: regenerate derived sources, then delegate to `packager`.
///
/// The manifest is assembled first; nothing reaches the packager if any
/// regeneration fails.
pub fn run_build(
    settings: &BuildSettings,
    env: &dyn EnvPort,
    process: &dyn ProcessPort,
    packager: &dyn Packager,
    tool: ToolInfo,
) -> BuildResult<BuildReport> {
    let started_at = Utc::now();
    info!("Base dir: {}", settings.project_root);

    let manifest = build_manifest(settings)?;
    let generated = run_generate(settings, env, process)?;

    packager.build(&manifest).context("packaging step")?;

    let mut report = BuildReport::new(tool, manifest);
    report.run.started_at = Some(started_at);
    report.compiler = generated.compiler;
    for s in generated.schemas {
        report.record(s.source, s.outcome);
    }
    report.run.ended_at = Some(Utc::now());
    Ok(report)
}

/// Write the report (and its markdown renderings) next to the manifest.
pub fn write_build_artifacts(
    report: &BuildReport,
    out_dir: &Utf8Path,
    writer: &dyn WritePort,
) -> anyhow::Result<()> {
    writer.create_dir_all(out_dir)?;

    let report_json = serde_json::to_string_pretty(report).context("serialize report")?;
    writer.write_file(&out_dir.join("report.json"), report_json.as_bytes())?;

    #[cfg(feature = "reporting")]
    {
        let manifest_md = protopack_render::render_manifest_md(&report.manifest);
        writer.write_file(&out_dir.join("manifest.md"), manifest_md.as_bytes())?;

        let report_md = protopack_render::render_report_md(report);
        writer.write_file(&out_dir.join("report.md"), report_md.as_bytes())?;
    }

    Ok(())
}
