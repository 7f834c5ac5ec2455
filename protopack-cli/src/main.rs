use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use protopack_cli::config::{self, CliOverrides, ConfigMerger};
use protopack_core::BuildError;
use protopack_core::adapters::{FsWritePort, StagingPackager, SystemEnv, SystemProcess};
use protopack_core::compiler::locate_compiler;
use protopack_core::pipeline::{build_manifest, run_build, run_generate, write_build_artifacts};
use protopack_core::settings::BuildSettings;
use protopack_render::render_manifest_text;
use protopack_types::report::ToolInfo;
use protopack_types::schema_source::GenerateOutcome;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "protopack",
    version,
    about = "Regenerates protobuf-derived sources and stages a package manifest."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Regenerate stale sources, then stage packages and write the manifest.
    Build(BuildArgs),
    /// Regenerate stale sources only.
    Generate(ProjectArgs),
    /// Print the path of the schema compiler that would be used.
    LocateCompiler(ProjectArgs),
    /// Print the package manifest without building.
    Manifest(ManifestArgs),
}

#[derive(Debug, Args)]
struct ProjectArgs {
    /// Project root (default: current directory).
    #[arg(long, default_value = ".")]
    project_root: Utf8PathBuf,

    /// Directory holding .proto files (default: <project_root>/proto).
    #[arg(long)]
    proto_dir: Option<Utf8PathBuf>,

    /// Directory walked for data files (default: <project_root>/schemas).
    #[arg(long)]
    schema_dir: Option<Utf8PathBuf>,
}

#[derive(Debug, Args)]
struct BuildArgs {
    #[command(flatten)]
    project: ProjectArgs,

    /// Output directory for staged packages and artifacts (default: <project_root>/build).
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,
}

#[derive(Debug, Args)]
struct ManifestArgs {
    #[command(flatten)]
    project: ProjectArgs,

    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("error: {e:#}");
        let code = e
            .downcast_ref::<BuildError>()
            .map(BuildError::exit_code)
            .unwrap_or(1);
        return ExitCode::from(code);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Build(args) => cmd_build(args),
        Command::Generate(args) => cmd_generate(args),
        Command::LocateCompiler(args) => cmd_locate_compiler(args),
        Command::Manifest(args) => cmd_manifest(args),
    }
}

fn load_settings(
    project: &ProjectArgs,
    out_dir: Option<Utf8PathBuf>,
) -> anyhow::Result<BuildSettings> {
    let file_config =
        config::load_or_default(&project.project_root).context("load protopack.toml config")?;
    let overrides = CliOverrides {
        proto_dir: project.proto_dir.clone(),
        schema_dir: project.schema_dir.clone(),
        out_dir,
    };
    let settings = ConfigMerger::new(file_config).merge_args(project.project_root.clone(), &overrides);
    debug!("merged settings: {:?}", settings);
    Ok(settings)
}

fn cmd_build(args: BuildArgs) -> anyhow::Result<()> {
    let settings = load_settings(&args.project, args.out_dir)?;
    let out_dir = settings.out_dir();
    let packager = StagingPackager::new(settings.project_root.clone(), out_dir.clone());

    let report = run_build(&settings, &SystemEnv, &SystemProcess, &packager, tool_info())?;
    write_build_artifacts(&report, &out_dir, &FsWritePort).context("write build artifacts")?;

    println!(
        "built {} {}: {} packages, {} data files, {} generated, {} up to date",
        report.manifest.distribution.name,
        report.manifest.distribution.version,
        report.manifest.packages.len(),
        report.manifest.data_file_count(),
        report.summary.generated,
        report.summary.skipped,
    );
    info!("wrote build artifacts to {}", out_dir);
    Ok(())
}

fn cmd_generate(args: ProjectArgs) -> anyhow::Result<()> {
    let settings = load_settings(&args, None)?;
    let outcomes = run_generate(&settings, &SystemEnv, &SystemProcess)?;

    for s in &outcomes.schemas {
        let label = match s.outcome {
            GenerateOutcome::Generated => "generated",
            GenerateOutcome::Skipped => "up to date",
        };
        println!("{}: {}", s.source.output, label);
    }
    Ok(())
}

fn cmd_locate_compiler(args: ProjectArgs) -> anyhow::Result<()> {
    let settings = load_settings(&args, None)?;
    let located = locate_compiler(
        &SystemEnv,
        &settings.codegen.compiler_name,
        &settings.codegen.compiler_env,
    )?;
    println!("{}", located.path);
    Ok(())
}

fn cmd_manifest(args: ManifestArgs) -> anyhow::Result<()> {
    let settings = load_settings(&args.project, None)?;
    let manifest = build_manifest(&settings)?;

    match args.format {
        OutputFormat::Text => print!("{}", render_manifest_text(&manifest)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&manifest)?),
    }
    Ok(())
}

fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "protopack".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    }
}
