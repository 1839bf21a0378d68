//! Executable lookup on the host's search path
//!
//! Toolchain autodetection and package-manager discovery both reduce to
//! "first candidate name resolvable on `$PATH`", so that probe lives here.

use std::env;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Locate `name` on the process's `PATH`.
///
/// Returns the full path of the first matching executable, or `None` if no
/// directory on the search path contains one.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    let path_var = env::var_os("PATH")?;
    find_executable_in(env::split_paths(&path_var), name)
}

/// Locate `name` in an explicit list of directories.
///
/// Same resolution rules as [`find_executable`], with the search path
/// supplied by the caller.
pub fn find_executable_in<I>(dirs: I, name: &str) -> Option<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    for dir in dirs {
        let candidate = dir.join(name);
        if is_executable(&candidate) {
            trace!(name, path = %candidate.display(), "resolved executable");
            return Some(candidate);
        }
    }
    None
}

/// Return the first of `candidates` that resolves on the search path.
pub fn first_available<'a>(candidates: &'a [&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .copied()
        .find(|name| find_executable(name).is_some())
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
