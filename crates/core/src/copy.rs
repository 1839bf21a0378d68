//! Recursive filesystem copy backing the script's `copy()` helper

use crate::error::CoreError;
use crate::Result;
use std::fs;
use std::path::Path;
use tracing::info;
use walkdir::WalkDir;

/// Copy a file or directory tree to `dest`.
///
/// Files copy onto `dest`, or into it when `dest` is an existing
/// directory. Directories copy recursively; the destination gains the
/// source directory's base name (`copy("assets", "out")` produces
/// `out/assets/..`).
pub fn copy_path(src: &Path, dest: &Path) -> Result<()> {
    let meta = fs::metadata(src)
        .map_err(|_| CoreError::CopySourceMissing(src.to_string_lossy().into_owned()))?;

    if meta.is_dir() {
        copy_dir(src, dest)
    } else {
        copy_file(src, dest)
    }
}

fn copy_err(from: &Path, to: &Path, source: std::io::Error) -> CoreError {
    CoreError::Copy {
        from: from.to_string_lossy().into_owned(),
        to: to.to_string_lossy().into_owned(),
        source,
    }
}

fn copy_file(src: &Path, dest: &Path) -> Result<()> {
    let target = if dest.is_dir() {
        match src.file_name() {
            Some(name) => dest.join(name),
            None => dest.to_path_buf(),
        }
    } else {
        dest.to_path_buf()
    };

    fs::copy(src, &target).map_err(|e| copy_err(src, &target, e))?;
    info!("copied {} -> {}", src.display(), target.display());
    Ok(())
}

fn copy_dir(src: &Path, dest: &Path) -> Result<()> {
    let root = match src.file_name() {
        Some(name) => dest.join(name),
        None => dest.to_path_buf(),
    };

    for entry in WalkDir::new(src) {
        let entry = entry.map_err(|e| copy_err(src, &root, std::io::Error::other(e)))?;
        // Walkdir only yields paths under its root.
        let rel = match entry.path().strip_prefix(src) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        let target = root.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| copy_err(entry.path(), &target, e))?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| copy_err(entry.path(), &target, e))?;
        }
    }

    info!("copied {} -> {}", src.display(), root.display());
    Ok(())
}
