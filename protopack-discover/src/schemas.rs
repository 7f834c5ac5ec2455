use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use glob::{Pattern, glob};
use protopack_types::schema_source::{SCHEMA_EXTENSION, SchemaSource};
use tracing::debug;

/// List the schema files directly inside `proto_dir` (non-recursive).
///
/// Each source is paired with its derived output via `output_suffix`.
/// The directory must exist.
pub fn find_schema_sources(
    proto_dir: &Utf8Path,
    output_suffix: &str,
) -> anyhow::Result<Vec<SchemaSource>> {
    if !proto_dir.is_dir() {
        anyhow::bail!("proto directory {} does not exist", proto_dir);
    }

    let pattern = format!(
        "{}/*.{}",
        Pattern::escape(proto_dir.as_str()),
        SCHEMA_EXTENSION
    );
    debug!(pattern = %pattern, "scanning for schema sources");

    let mut out: Vec<Utf8PathBuf> = Vec::new();
    for entry in glob(&pattern).with_context(|| format!("glob {}", pattern))? {
        let path = entry.map_err(|e| anyhow::anyhow!("glob error: {e}"))?;
        let path = crate::utf8(&path)?.to_path_buf();
        if !path.is_file() {
            debug!(path = %path, "skipping non-file schema match");
            continue;
        }
        out.push(path);
    }

    out.sort();
    Ok(out
        .into_iter()
        .map(|p| SchemaSource::new(p, output_suffix))
        .collect())
}
