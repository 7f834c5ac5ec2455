//! Configuration file loading for protopack.
//!
//! Discovers and loads `protopack.toml` from the project root.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use protopack_core::settings::{BuildSettings, CodegenSettings, DataSettings};
use protopack_types::manifest::DistributionInfo;
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "protopack.toml";

/// Top-level configuration from protopack.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProtopackConfig {
    /// Distribution metadata and package discovery.
    pub package: PackageConfig,

    /// Schema compilation.
    pub codegen: CodegenConfig,

    /// Auxiliary data files.
    pub data: DataConfig,

    /// Output locations.
    pub build: BuildConfig,
}

/// Package section of the config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    pub name: String,
    pub version: String,
    pub license: String,
    pub description: String,
    pub url: String,
    pub author_email: String,

    /// Prefix for every discovered package.
    pub namespace: String,

    /// Root of the package tree, relative to the project root.
    pub source_root: Utf8PathBuf,

    /// File marking a directory as a package.
    pub marker: String,
}

impl Default for PackageConfig {
    fn default() -> Self {
        let dist = DistributionInfo::default();
        let settings = BuildSettings::default();
        Self {
            name: dist.name,
            version: dist.version,
            license: dist.license,
            description: dist.description,
            url: dist.url,
            author_email: dist.author_email,
            namespace: settings.namespace,
            source_root: settings.source_root,
            marker: settings.package_marker,
        }
    }
}

/// Codegen section of the config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CodegenConfig {
    pub proto_dir: Utf8PathBuf,

    /// Compiler executable name searched for in PATH.
    pub compiler: String,

    /// Environment variable that may name the compiler explicitly.
    pub compiler_env: String,

    pub language: String,
    pub output_suffix: String,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        let c = CodegenSettings::default();
        Self {
            proto_dir: c.proto_dir,
            compiler: c.compiler_name,
            compiler_env: c.compiler_env,
            language: c.language,
            output_suffix: c.output_suffix,
        }
    }
}

/// Data section of the config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub schema_dir: Utf8PathBuf,

    /// Tracked extension, without the leading dot.
    pub extension: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        let d = DataSettings::default();
        Self {
            schema_dir: d.schema_dir,
            extension: d.extension,
        }
    }
}

/// Build section of the config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub out_dir: Utf8PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            out_dir: BuildSettings::default().out_dir,
        }
    }
}

/// Discover the protopack.toml config file.
///
/// Searches for `protopack.toml` in the project root directory.
/// Returns `None` if no config file is found.
pub fn discover_config(project_root: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = project_root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a protopack.toml config file.
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<ProtopackConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<ProtopackConfig> {
    let config: ProtopackConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from project root, or return default if not found.
pub fn load_or_default(project_root: &Utf8Path) -> anyhow::Result<ProtopackConfig> {
    match discover_config(project_root) {
        Some(path) => load_config(&path),
        None => Ok(ProtopackConfig::default()),
    }
}

/// Path overrides accepted on the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub proto_dir: Option<Utf8PathBuf>,
    pub schema_dir: Option<Utf8PathBuf>,
    pub out_dir: Option<Utf8PathBuf>,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: ProtopackConfig,
}

impl ConfigMerger {
    /// Create a new merger from a loaded config.
    pub fn new(config: ProtopackConfig) -> Self {
        Self { config }
    }

    /// Produce core build settings; set CLI overrides replace config values.
    pub fn merge_args(self, project_root: Utf8PathBuf, cli: &CliOverrides) -> BuildSettings {
        let ProtopackConfig {
            package,
            codegen,
            data,
            build,
        } = self.config;

        BuildSettings {
            project_root,
            out_dir: cli.out_dir.clone().unwrap_or(build.out_dir),
            distribution: DistributionInfo {
                name: package.name,
                version: package.version,
                license: package.license,
                description: package.description,
                url: package.url,
                author_email: package.author_email,
            },
            namespace: package.namespace,
            source_root: package.source_root,
            package_marker: package.marker,
            codegen: CodegenSettings {
                proto_dir: cli.proto_dir.clone().unwrap_or(codegen.proto_dir),
                compiler_name: codegen.compiler,
                compiler_env: codegen.compiler_env,
                language: codegen.language,
                output_suffix: codegen.output_suffix,
            },
            data: DataSettings {
                schema_dir: cli.schema_dir.clone().unwrap_or(data.schema_dir),
                extension: data.extension.trim_start_matches('.').to_string(),
            },
        }
    }
}
