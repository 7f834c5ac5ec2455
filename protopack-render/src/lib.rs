//! Rendering helpers (markdown, plain text) for human-readable artifacts.

use protopack_types::compiler::LocationSource;
use protopack_types::manifest::PackageManifest;
use protopack_types::report::BuildReport;
use protopack_types::schema_source::GenerateOutcome;

pub fn render_manifest_md(manifest: &PackageManifest) -> String {
    let d = &manifest.distribution;
    let mut out = String::new();
    out.push_str(&format!("# {} {}\n\n", d.name, d.version));
    out.push_str(&format!("{}\n\n", d.description));
    out.push_str(&format!("- License: {}\n", d.license));
    out.push_str(&format!("- URL: {}\n", d.url));
    out.push_str(&format!("- Packages: {}\n", manifest.packages.len()));
    out.push_str(&format!("- Data files: {}\n\n", manifest.data_file_count()));

    out.push_str("## Packages\n\n");
    for p in &manifest.packages {
        match manifest.package_dir.get(p) {
            Some(dir) => out.push_str(&format!("- `{}` (from `{}`)\n", p, dir)),
            None => out.push_str(&format!("- `{}`\n", p)),
        }
    }
    out.push('\n');

    out.push_str("## Data files\n\n");
    if manifest.data_files.is_empty() {
        out.push_str("_No data files._\n");
        return out;
    }
    for (target, files) in &manifest.data_files {
        out.push_str(&format!("### `{}`\n\n", target));
        for f in files {
            out.push_str(&format!("- `{}`\n", f));
        }
        out.push('\n');
    }
    out
}

pub fn render_report_md(report: &BuildReport) -> String {
    let mut out = String::new();
    out.push_str("# protopack build\n\n");
    match &report.compiler {
        Some(c) => out.push_str(&format!(
            "- Compiler: `{}` ({})\n",
            c.path,
            source_label(c.source)
        )),
        None => out.push_str("- Compiler: not needed\n"),
    }
    out.push_str(&format!(
        "- Generated: {}\n- Skipped: {}\n\n",
        report.summary.generated, report.summary.skipped
    ));

    out.push_str("## Schemas\n\n");
    if report.schemas.is_empty() {
        out.push_str("_No schema sources._\n\n");
    } else {
        for s in &report.schemas {
            out.push_str(&format!(
                "- `{}` → `{}`: {}\n",
                s.source.source,
                s.source.output,
                outcome_label(s.outcome)
            ));
        }
        out.push('\n');
    }

    // Nest the manifest one heading level below the report title.
    for line in render_manifest_md(&report.manifest).lines() {
        if line.starts_with('#') {
            out.push('#');
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Plain listing for terminals, one item per line.
pub fn render_manifest_text(manifest: &PackageManifest) -> String {
    let d = &manifest.distribution;
    let mut out = String::new();
    out.push_str(&format!("{} {} ({})\n", d.name, d.version, d.license));
    out.push_str("packages:\n");
    for p in &manifest.packages {
        out.push_str(&format!("  {}\n", p));
    }
    out.push_str("package_dir:\n");
    for (name, dir) in &manifest.package_dir {
        out.push_str(&format!("  {} = {}\n", name, dir));
    }
    out.push_str("data_files:\n");
    for (target, files) in &manifest.data_files {
        out.push_str(&format!("  {}:\n", target));
        for f in files {
            out.push_str(&format!("    {}\n", f));
        }
    }
    out
}

fn source_label(s: LocationSource) -> &'static str {
    match s {
        LocationSource::EnvOverride => "env override",
        LocationSource::SearchPath => "PATH",
    }
}

fn outcome_label(o: GenerateOutcome) -> &'static str {
    match o {
        GenerateOutcome::Generated => "generated",
        GenerateOutcome::Skipped => "up to date",
    }
}
