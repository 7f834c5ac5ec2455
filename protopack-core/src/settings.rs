//! Clap-free settings for the generate and build pipelines.

use camino::{Utf8Path, Utf8PathBuf};
use protopack_types::manifest::DistributionInfo;

/// How schema sources are found and compiled.
#[derive(Debug, Clone)]
pub struct CodegenSettings {
    /// Directory holding `.proto` files (non-recursive).
    pub proto_dir: Utf8PathBuf,
    /// Executable name searched for in `PATH`.
    pub compiler_name: String,
    /// Environment variable holding an explicit compiler path.
    pub compiler_env: String,
    /// Generator language; the output flag is `--<language>_out`.
    pub language: String,
    /// Appended to a schema's stem to name its derived output.
    pub output_suffix: String,
}

impl Default for CodegenSettings {
    fn default() -> Self {
        Self {
            proto_dir: Utf8PathBuf::from("proto"),
            compiler_name: "protoc".to_string(),
            compiler_env: "PROTOC".to_string(),
            language: "python".to_string(),
            output_suffix: "_pb2.py".to_string(),
        }
    }
}

/// Which auxiliary files ship with the distribution.
#[derive(Debug, Clone)]
pub struct DataSettings {
    pub schema_dir: Utf8PathBuf,
    /// Tracked extension without the leading dot.
    pub extension: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            schema_dir: Utf8PathBuf::from("schemas"),
            extension: "xsd".to_string(),
        }
    }
}

/// Settings for a full build.
#[derive(Debug, Clone)]
pub struct BuildSettings {
    pub project_root: Utf8PathBuf,
    pub out_dir: Utf8PathBuf,

    // Distribution
    pub distribution: DistributionInfo,
    pub namespace: String,
    /// Root of the package tree; becomes the namespace's `package_dir` entry.
    pub source_root: Utf8PathBuf,
    pub package_marker: String,

    pub codegen: CodegenSettings,
    pub data: DataSettings,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            project_root: Utf8PathBuf::from("."),
            out_dir: Utf8PathBuf::from("build"),
            distribution: DistributionInfo::default(),
            namespace: "dsrf".to_string(),
            source_root: Utf8PathBuf::from("."),
            package_marker: "__init__.py".to_string(),
            codegen: CodegenSettings::default(),
            data: DataSettings::default(),
        }
    }
}

impl BuildSettings {
    /// Interpret `path` relative to the project root unless it is absolute.
    pub fn resolve(&self, path: &Utf8Path) -> Utf8PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }

    pub fn proto_dir(&self) -> Utf8PathBuf {
        self.resolve(&self.codegen.proto_dir)
    }

    pub fn source_root(&self) -> Utf8PathBuf {
        self.resolve(&self.source_root)
    }

    pub fn out_dir(&self) -> Utf8PathBuf {
        self.resolve(&self.out_dir)
    }
}
