use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Distribution metadata carried alongside the package lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionInfo {
    pub name: String,
    pub version: String,
    pub license: String,
    pub description: String,
    pub url: String,

    #[serde(default)]
    pub author_email: String,
}

impl Default for DistributionInfo {
    fn default() -> Self {
        Self {
            name: "dsrf".to_string(),
            version: "1.1.0d".to_string(),
            license: "Apache 2.0".to_string(),
            description: "DSRF Parsing Library".to_string(),
            url: "https://github.com/ddexnet".to_string(),
            author_email: String::new(),
        }
    }
}

/// Install-target directory → auxiliary files it should carry.
pub type DataFiles = BTreeMap<Utf8PathBuf, Vec<Utf8PathBuf>>;

/// Everything handed to the packaging step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageManifest {
    pub schema: String,
    pub distribution: DistributionInfo,

    /// Importable package identifiers; the namespace root comes first.
    #[serde(default)]
    pub packages: Vec<String>,

    /// Package name → directory its sources live in.
    #[serde(default)]
    pub package_dir: BTreeMap<String, Utf8PathBuf>,

    #[serde(default)]
    pub data_files: DataFiles,
}

impl PackageManifest {
    pub fn new(distribution: DistributionInfo) -> Self {
        Self {
            schema: crate::schema::PROTOPACK_MANIFEST_V1.to_string(),
            distribution,
            packages: Vec::new(),
            package_dir: BTreeMap::new(),
            data_files: BTreeMap::new(),
        }
    }

    /// Total number of data files across all install targets.
    pub fn data_file_count(&self) -> usize {
        self.data_files.values().map(Vec::len).sum()
    }

    /// Resolve the source directory of a dotted package name.
    ///
    /// Walks up the dotted name until a `package_dir` entry matches, then
    /// appends the remaining components as directories.
    pub fn package_source_dir(&self, package: &str) -> Option<Utf8PathBuf> {
        let parts: Vec<&str> = package.split('.').collect();
        for split in (1..=parts.len()).rev() {
            let prefix = parts[..split].join(".");
            if let Some(base) = self.package_dir.get(&prefix) {
                let mut dir = base.clone();
                for part in &parts[split..] {
                    dir.push(part);
                }
                return Some(dir);
            }
        }
        None
    }
}
