//! Compiler discovery: explicit override first, then the search path.

use crate::error::{BuildError, BuildResult};
use crate::ports::EnvPort;
use camino::{Utf8Path, Utf8PathBuf};
use protopack_types::compiler::{CompilerLocation, LocationSource};
use tracing::{debug, warn};

/// Locate the compiler executable `name`.
///
/// If `override_var` is set and points at an existing executable file,
/// that exact path is returned. Otherwise each `PATH` directory is tried in
/// order. Fails with [`BuildError::CompilerNotFound`] if nothing matches.
pub fn locate_compiler(
    env: &dyn EnvPort,
    name: &str,
    override_var: &str,
) -> BuildResult<CompilerLocation> {
    if let Some(explicit) = env.var(override_var).filter(|v| !v.is_empty()) {
        let path = Utf8PathBuf::from(explicit);
        if is_executable(&path) {
            debug!(path = %path, var = override_var, "using compiler override");
            return Ok(CompilerLocation::new(path, LocationSource::EnvOverride));
        }
        warn!(
            path = %path,
            var = override_var,
            "compiler override is not an executable file; searching PATH"
        );
    }

    match search_path(env, name) {
        Some(path) => {
            debug!(path = %path, "found compiler on PATH");
            Ok(CompilerLocation::new(path, LocationSource::SearchPath))
        }
        None => Err(BuildError::CompilerNotFound {
            name: name.to_string(),
        }),
    }
}

fn search_path(env: &dyn EnvPort, name: &str) -> Option<Utf8PathBuf> {
    let paths = env.var("PATH")?;
    std::env::split_paths(&paths)
        .filter_map(|dir| Utf8PathBuf::from_path_buf(dir).ok())
        .filter(|dir| !dir.as_str().is_empty())
        .flat_map(|dir| candidate_names(name).map(move |n| dir.join(n)))
        .find(|candidate| is_executable(candidate))
}

#[cfg(windows)]
fn candidate_names(name: &str) -> impl Iterator<Item = String> {
    let mut names = vec![name.to_string()];
    if Utf8Path::new(name).extension().is_none() {
        names.push(format!("{name}.exe"));
    }
    names.into_iter()
}

#[cfg(not(windows))]
fn candidate_names(name: &str) -> impl Iterator<Item = String> {
    std::iter::once(name.to_string())
}

/// True if `path` is a regular file the current user could execute.
pub fn is_executable(path: &Utf8Path) -> bool {
    let Ok(meta) = std::fs::metadata(path) else {
        return false;
    };
    if !meta.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        meta.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}
