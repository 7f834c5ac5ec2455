use crate::DiscoverError;
use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Parameters for namespaced package discovery.
#[derive(Debug, Clone)]
pub struct PackageQuery {
    /// Directory whose subdirectories are package candidates.
    pub root: Utf8PathBuf,
    /// Fixed prefix applied to every discovered package; also listed itself.
    pub namespace: String,
    /// File whose presence marks a directory as a package.
    pub marker: String,
}

/// Find importable packages below `root`, as dotted names relative to it.
///
/// A directory is a package when it holds `marker` and its name has no
/// `.` in it. Directories that are not packages are not descended into,
/// so a marker file below a plain directory does not make a package.
/// The root itself is never reported.
pub fn find_packages(root: &Utf8Path, marker: &str) -> anyhow::Result<Vec<String>> {
    let mut out = Vec::new();
    if !root.is_dir() {
        debug!(root = %root, "package root missing; no packages");
        return Ok(out);
    }

    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            let name_ok = e
                .file_name()
                .to_str()
                .map(|name| !name.contains('.'))
                .unwrap_or(false);
            name_ok && e.file_type().is_dir() && e.path().join(marker).is_file()
        });

    for entry in walker {
        let entry = entry.map_err(|e| DiscoverError::Walk {
            root: root.to_path_buf(),
            message: e.to_string(),
        })?;
        let path = crate::utf8(entry.path())?;
        let rel = path.strip_prefix(root).unwrap_or(path);
        let dotted = rel
            .components()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(".");
        debug!(package = %dotted, "found package");
        out.push(dotted);
    }

    out.sort();
    Ok(out)
}

/// Package list for a manifest: the namespace first, then every
/// discovered package prefixed with `<namespace>.`.
pub fn find_namespaced_packages(query: &PackageQuery) -> anyhow::Result<Vec<String>> {
    let mut packages = vec![query.namespace.clone()];
    for package in find_packages(&query.root, &query.marker)? {
        packages.push(format!("{}.{}", query.namespace, package));
    }
    Ok(packages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fs_err as fs;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const MARKER: &str = "__init__.py";

    fn root(temp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8")
    }

    fn make_package(root: &Utf8Path, rel: &str) {
        let dir = root.join(rel);
        fs::create_dir_all(&dir).expect("mkdir");
        fs::write(dir.join(MARKER), "").expect("write marker");
    }

    #[test]
    fn finds_packages_at_depth_zero_and_one() {
        let temp = TempDir::new().expect("temp dir");
        let root = root(&temp);
        make_package(&root, "proto");
        make_package(&root, "tools");
        make_package(&root, "tools/validators");

        let found = find_packages(&root, MARKER).expect("find");
        assert_eq!(found, vec!["proto", "tools", "tools.validators"]);
    }

    #[test]
    fn does_not_descend_into_plain_directories() {
        let temp = TempDir::new().expect("temp dir");
        let root = root(&temp);
        fs::create_dir_all(root.join("docs")).expect("mkdir");
        make_package(&root, "docs/hidden");

        let found = find_packages(&root, MARKER).expect("find");
        assert!(found.is_empty());
    }

    #[test]
    fn skips_dotted_directory_names() {
        let temp = TempDir::new().expect("temp dir");
        let root = root(&temp);
        make_package(&root, "build.lib");
        make_package(&root, "ok");

        let found = find_packages(&root, MARKER).expect("find");
        assert_eq!(found, vec!["ok"]);
    }

    #[test]
    fn marker_must_be_a_file() {
        let temp = TempDir::new().expect("temp dir");
        let root = root(&temp);
        fs::create_dir_all(root.join("weird").join(MARKER)).expect("mkdir");

        let found = find_packages(&root, MARKER).expect("find");
        assert!(found.is_empty());
    }

    #[test]
    fn namespace_comes_first_and_prefixes_all() {
        let temp = TempDir::new().expect("temp dir");
        let root = root(&temp);
        make_package(&root, "tools");
        make_package(&root, "tools/validators");

        let query = PackageQuery {
            root,
            namespace: "dsrf".to_string(),
            marker: MARKER.to_string(),
        };
        let found = find_namespaced_packages(&query).expect("find");
        assert_eq!(found, vec!["dsrf", "dsrf.tools", "dsrf.tools.validators"]);
    }

    #[test]
    fn missing_root_yields_only_namespace() {
        let temp = TempDir::new().expect("temp dir");
        let query = PackageQuery {
            root: root(&temp).join("absent"),
            namespace: "dsrf".to_string(),
            marker: MARKER.to_string(),
        };
        assert_eq!(find_namespaced_packages(&query).expect("find"), vec!["dsrf"]);
    }
}
