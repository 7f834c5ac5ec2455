use crate::DiscoverError;
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use protopack_types::manifest::DataFiles;
use tracing::debug;
use walkdir::WalkDir;

/// Parameters for auxiliary data-file discovery.
#[derive(Debug, Clone)]
pub struct DataFileQuery {
    /// Base that discovered paths are reported relative to.
    pub project_root: Utf8PathBuf,
    /// Directory to walk; relative paths are taken from `project_root`.
    pub schema_dir: Utf8PathBuf,
    /// Tracked extension without the leading dot (e.g. `xsd`).
    pub extension: String,
    /// Install targets are `<namespace>/<schema dir>/<sub dir>`.
    pub namespace: String,
}

/// Walk the schema directory and group tracked files by install target.
///
/// File entries are relative to the project root when the schema directory
/// lives under it, absolute otherwise. A missing schema directory yields an
/// empty mapping. Files that do not carry the tracked extension are never
/// inspected further, whatever their names look like.
pub fn find_data_files(query: &DataFileQuery) -> anyhow::Result<DataFiles> {
    let mut out = DataFiles::new();
    let walk_root = query.project_root.join(&query.schema_dir);
    if !walk_root.is_dir() {
        debug!(dir = %walk_root, "schema directory missing; no data files");
        return Ok(out);
    }

    let base = install_base(query);
    let suffix = format!(".{}", query.extension);
    for entry in WalkDir::new(&walk_root).follow_links(true) {
        let entry = entry.map_err(|e| DiscoverError::Walk {
            root: walk_root.clone(),
            message: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if !entry
            .file_name()
            .as_encoded_bytes()
            .ends_with(suffix.as_bytes())
        {
            continue;
        }
        let path = crate::utf8(entry.path())?;

        let mut target = base.clone();
        if let Some(dir) = relative_to(path, &walk_root).parent() {
            push_normal(&mut target, dir);
        }
        let rel = relative_to(path, &query.project_root);
        debug!(file = %rel, target = %target, "found data file");
        out.entry(target).or_default().push(rel);
    }

    for files in out.values_mut() {
        files.sort();
    }
    Ok(out)
}

/// `<namespace>/<schema dir>`, where a schema dir outside the project root
/// contributes only its final component.
fn install_base(query: &DataFileQuery) -> Utf8PathBuf {
    let mut base = Utf8PathBuf::from(&query.namespace);
    let schema_dir = &query.schema_dir;
    if schema_dir.is_relative() {
        push_normal(&mut base, schema_dir);
    } else if let Ok(inside) = schema_dir.strip_prefix(&query.project_root) {
        push_normal(&mut base, inside);
    } else if let Some(name) = schema_dir.file_name() {
        base.push(name);
    }
    base
}

fn push_normal(base: &mut Utf8PathBuf, rel: &Utf8Path) {
    for component in rel.components() {
        if let Utf8Component::Normal(part) = component {
            base.push(part);
        }
    }
}

fn relative_to(path: &Utf8Path, base: &Utf8Path) -> Utf8PathBuf {
    path.strip_prefix(base)
        .map(Utf8Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fs_err as fs;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn query(temp: &TempDir) -> DataFileQuery {
        DataFileQuery {
            project_root: Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8"),
            schema_dir: Utf8PathBuf::from("schemas"),
            extension: "xsd".to_string(),
            namespace: "dsrf".to_string(),
        }
    }

    fn touch(root: &Utf8Path, rel: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("mkdir");
        }
        fs::write(path, "<xs:schema/>").expect("write");
    }

    #[test]
    fn groups_by_install_target() {
        let temp = TempDir::new().expect("temp dir");
        let q = query(&temp);
        touch(&q.project_root, "schemas/b.xsd");
        touch(&q.project_root, "schemas/a.xsd");
        touch(&q.project_root, "schemas/v1/c.xsd");
        touch(&q.project_root, "schemas/v1/notes.txt");

        let found = find_data_files(&q).expect("find");
        let mut expected = DataFiles::new();
        expected.insert(
            Utf8PathBuf::from("dsrf/schemas"),
            vec![
                Utf8PathBuf::from("schemas/a.xsd"),
                Utf8PathBuf::from("schemas/b.xsd"),
            ],
        );
        expected.insert(
            Utf8PathBuf::from("dsrf/schemas/v1"),
            vec![Utf8PathBuf::from("schemas/v1/c.xsd")],
        );
        assert_eq!(found, expected);
    }

    #[test]
    fn returns_exactly_one_entry_per_tracked_file() {
        let temp = TempDir::new().expect("temp dir");
        let q = query(&temp);
        for i in 0..7 {
            touch(&q.project_root, &format!("schemas/s{}/f{}.xsd", i % 3, i));
        }
        touch(&q.project_root, "schemas/ignored.xsd.bak");

        let found = find_data_files(&q).expect("find");
        let total: usize = found.values().map(Vec::len).sum();
        assert_eq!(total, 7);
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn missing_schema_dir_is_empty() {
        let temp = TempDir::new().expect("temp dir");
        let found = find_data_files(&query(&temp)).expect("find");
        assert!(found.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn skips_non_utf8_names_that_are_not_tracked() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp = TempDir::new().expect("temp dir");
        let q = query(&temp);
        touch(&q.project_root, "schemas/v1/a.xsd");
        touch(&q.project_root, "schemas/v1/b.xsd");
        let odd = q
            .project_root
            .as_std_path()
            .join("schemas")
            .join(OsStr::from_bytes(b"notes-\xff.txt"));
        std::fs::write(odd, "notes").expect("write");

        let found = find_data_files(&q).expect("find");
        assert_eq!(found.values().map(Vec::len).sum::<usize>(), 2);
        assert_eq!(
            found.keys().collect::<Vec<_>>(),
            vec![&Utf8PathBuf::from("dsrf/schemas/v1")]
        );
    }

    #[test]
    fn absolute_schema_dir_outside_root_keeps_namespace() {
        let project = TempDir::new().expect("temp dir");
        let elsewhere = TempDir::new().expect("temp dir");
        let outside = Utf8PathBuf::from_path_buf(elsewhere.path().join("xsd")).expect("utf8");
        touch(&outside, "v1/c.xsd");

        let q = DataFileQuery {
            schema_dir: outside.clone(),
            ..query(&project)
        };
        let found = find_data_files(&q).expect("find");

        let mut expected = DataFiles::new();
        expected.insert(
            Utf8PathBuf::from("dsrf/xsd/v1"),
            vec![outside.join("v1/c.xsd")],
        );
        assert_eq!(found, expected);
    }

    #[test]
    fn absolute_schema_dir_inside_root_matches_relative() {
        let temp = TempDir::new().expect("temp dir");
        let q = query(&temp);
        touch(&q.project_root, "schemas/v1/c.xsd");

        let absolute = DataFileQuery {
            schema_dir: q.project_root.join("schemas"),
            ..q.clone()
        };
        assert_eq!(
            find_data_files(&absolute).expect("find"),
            find_data_files(&q).expect("find")
        );
    }
}
