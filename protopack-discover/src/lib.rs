//! Source-tree discovery for protopack builds.
//!
//! Everything here is read-only and deterministic: results are sorted so
//! that two runs over the same tree produce identical manifests.

mod data_files;
mod packages;
mod schemas;

pub use data_files::{DataFileQuery, find_data_files};
pub use packages::{PackageQuery, find_namespaced_packages, find_packages};
pub use schemas::find_schema_sources;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscoverError {
    #[error("path is not valid UTF-8: {path}")]
    NonUtf8Path { path: String },

    #[error("walk {root}: {message}")]
    Walk { root: Utf8PathBuf, message: String },
}

pub(crate) fn utf8(path: &std::path::Path) -> Result<&Utf8Path, DiscoverError> {
    Utf8Path::from_path(path).ok_or_else(|| DiscoverError::NonUtf8Path {
        path: path.display().to_string(),
    })
}
