//! Default port implementations.

use crate::ports::{EnvPort, Invocation, Packager, ProcessPort, WritePort};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use protopack_types::manifest::PackageManifest;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::process::Command;
use tracing::debug;

/// Reads the real process environment.
#[derive(Debug, Clone, Default)]
pub struct SystemEnv;

impl EnvPort for SystemEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Fixed environment for embedding and testing.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: BTreeMap<String, String>,
}

impl MapEnv {
    pub fn new<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvPort for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Spawns the command and blocks until it exits. Output is inherited.
#[derive(Debug, Clone, Default)]
pub struct SystemProcess;

impl ProcessPort for SystemProcess {
    fn run(&self, invocation: &Invocation) -> anyhow::Result<Option<i32>> {
        let status = Command::new(invocation.program.as_std_path())
            .args(&invocation.args)
            .status()
            .with_context(|| format!("spawn {}", invocation.program))?;
        Ok(status.code())
    }
}

/// Records invocations instead of spawning them.
///
/// Every call returns `exit_code`; `None` simulates a signal.
#[derive(Debug, Default)]
pub struct RecordingProcess {
    exit_code: Option<i32>,
    calls: RefCell<Vec<Invocation>>,
}

impl RecordingProcess {
    pub fn succeeding() -> Self {
        Self::with_exit_code(Some(0))
    }

    pub fn with_exit_code(exit_code: Option<i32>) -> Self {
        Self {
            exit_code,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }
}

impl ProcessPort for RecordingProcess {
    fn run(&self, invocation: &Invocation) -> anyhow::Result<Option<i32>> {
        self.calls.borrow_mut().push(invocation.clone());
        Ok(self.exit_code)
    }
}

/// Filesystem write operations.
#[derive(Debug, Clone, Default)]
pub struct FsWritePort;

impl WritePort for FsWritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create parent dir for {}", path))?;
        }
        fs::write(path, contents).with_context(|| format!("write {}", path))
    }

    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()> {
        fs::create_dir_all(path).with_context(|| format!("create_dir_all {}", path))
    }
}

/// Stages package modules into `<out_dir>/lib`, data files into
/// `<out_dir>/<install target>`, and writes `manifest.json`.
///
/// Relative `package_dir` entries are resolved against `project_root`.
#[derive(Debug, Clone)]
pub struct StagingPackager {
    pub project_root: Utf8PathBuf,
    pub out_dir: Utf8PathBuf,
    /// Extension of module files copied per package, without the dot.
    pub module_extension: String,
}

impl StagingPackager {
    pub fn new(project_root: Utf8PathBuf, out_dir: Utf8PathBuf) -> Self {
        Self {
            project_root,
            out_dir,
            module_extension: "py".to_string(),
        }
    }

    fn stage_package(&self, manifest: &PackageManifest, package: &str) -> anyhow::Result<usize> {
        let Some(src) = manifest.package_source_dir(package) else {
            anyhow::bail!("no package_dir entry covers package {}", package);
        };
        let src = if src.is_absolute() {
            src
        } else {
            self.project_root.join(src)
        };
        let dest = self.out_dir.join("lib").join(package.replace('.', "/"));
        let writer = FsWritePort;
        writer.create_dir_all(&dest)?;

        let mut copied = 0;
        for entry in fs::read_dir(&src).with_context(|| format!("read package dir {}", src))? {
            let entry = entry.with_context(|| format!("read entry in {}", src))?;
            let path = Utf8PathBuf::from_path_buf(entry.path())
                .map_err(|p| anyhow::anyhow!("path is not valid UTF-8: {}", p.display()))?;
            if !path.is_file() || path.extension() != Some(self.module_extension.as_str()) {
                continue;
            }
            let Some(name) = path.file_name() else {
                continue;
            };
            let contents = fs::read(&path)?;
            writer.write_file(&dest.join(name), &contents)?;
            copied += 1;
        }
        debug!(package, src = %src, dest = %dest, copied, "staged package");
        Ok(copied)
    }

    /// Copy every data file into `<out_dir>/<install target>/<file name>`.
    fn stage_data_files(&self, manifest: &PackageManifest) -> anyhow::Result<usize> {
        let writer = FsWritePort;
        let mut copied = 0;
        for (target, files) in &manifest.data_files {
            let dest = self.out_dir.join(target);
            for file in files {
                let Some(name) = file.file_name() else {
                    anyhow::bail!("data file {} has no file name", file);
                };
                let src = if file.is_absolute() {
                    file.clone()
                } else {
                    self.project_root.join(file)
                };
                let contents =
                    fs::read(&src).with_context(|| format!("read data file {}", src))?;
                writer.write_file(&dest.join(name), &contents)?;
                copied += 1;
            }
        }
        debug!(copied, "staged data files");
        Ok(copied)
    }
}

impl Packager for StagingPackager {
    fn build(&self, manifest: &PackageManifest) -> anyhow::Result<()> {
        for package in &manifest.packages {
            self.stage_package(manifest, package)?;
        }
        self.stage_data_files(manifest)?;
        let json = serde_json::to_string_pretty(manifest).context("serialize manifest")?;
        FsWritePort.write_file(&self.out_dir.join("manifest.json"), json.as_bytes())
    }
}

/// In-memory packager for embedding and testing; keeps every manifest it receives.
#[derive(Debug, Default)]
pub struct RecordingPackager {
    received: RefCell<Vec<PackageManifest>>,
}

impl RecordingPackager {
    pub fn received(&self) -> Vec<PackageManifest> {
        self.received.borrow().clone()
    }
}

impl Packager for RecordingPackager {
    fn build(&self, manifest: &PackageManifest) -> anyhow::Result<()> {
        self.received.borrow_mut().push(manifest.clone());
        Ok(())
    }
}
