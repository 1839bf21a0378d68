//! Glob-based file and directory discovery
//!
//! Both engines share the same contract: every pattern contributes at
//! least one record. A pattern with zero filesystem matches yields a
//! single `found=false` placeholder parsed off the pattern string, so
//! scripts branch on found-state rather than array length. Matches of
//! the wrong kind (a directory where files were asked for, and vice
//! versa) are skipped with a warning. No cross-pattern dedup happens;
//! overlapping patterns produce duplicate records.

use crate::entity::{Dir, File};
use std::path::PathBuf;
use tracing::warn;

/// Resolve file patterns. Patterns are expected to be absolute already
/// (the caller joins relative ones against the script directory).
pub fn find_files(patterns: &[String]) -> Vec<File> {
    let mut result = Vec::new();
    for pattern in patterns {
        let matches = match expand(pattern) {
            Some(paths) => paths,
            None => continue,
        };

        if matches.is_empty() {
            let placeholder = File::missing(pattern);
            warn!("file '{}' not found", placeholder.name);
            result.push(placeholder);
            continue;
        }

        for path in matches {
            match path.metadata() {
                Err(_) => {
                    warn!("cannot stat file '{}'", path.display());
                    result.push(File::missing(&path.to_string_lossy()));
                }
                Ok(meta) if meta.is_dir() => {
                    warn!("'{}' matched a directory, skipping", path.display());
                }
                Ok(_) => result.push(File::resolved(&path)),
            }
        }
    }
    result
}

/// Resolve directory patterns.
///
/// The aggregate-empty case is the caller's concern: an empty return
/// across all patterns must fail the script evaluation, a stricter
/// policy than `find_files` has.
pub fn find_dirs(patterns: &[String]) -> Vec<Dir> {
    let mut result = Vec::new();
    for pattern in patterns {
        let matches = match expand(pattern) {
            Some(paths) => paths,
            None => continue,
        };

        if matches.is_empty() {
            let placeholder = Dir::missing(pattern);
            warn!("directory '{}' not found", placeholder.name);
            result.push(placeholder);
            continue;
        }

        for path in matches {
            match path.metadata() {
                Err(_) => {
                    warn!("cannot stat directory '{}'", path.display());
                    result.push(Dir::missing(&path.to_string_lossy()));
                }
                Ok(meta) if !meta.is_dir() => {
                    warn!("'{}' matched a file, skipping", path.display());
                }
                Ok(_) => result.push(Dir::resolved(&path)),
            }
        }
    }
    result
}

fn expand(pattern: &str) -> Option<Vec<PathBuf>> {
    let paths = match glob::glob(pattern) {
        Ok(paths) => paths,
        Err(e) => {
            warn!("invalid glob pattern '{}': {}", pattern, e);
            return None;
        }
    };

    let mut matches = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) => matches.push(path),
            Err(e) => warn!("skipping unreadable match for '{}': {}", pattern, e),
        }
    }
    Some(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn pattern(dir: &std::path::Path, tail: &str) -> String {
        format!("{}/{}", dir.display(), tail)
    }

    #[test]
    fn test_zero_match_yields_single_placeholder() {
        let temp = tempfile::tempdir().unwrap();
        let files = find_files(&[pattern(temp.path(), "*.c")]);

        assert_eq!(files.len(), 1);
        assert!(!files[0].found);
        assert_eq!(files[0].name, "*.c");
        assert_eq!(files[0].ext, "c");
    }

    #[test]
    fn test_files_are_resolved_and_directories_skipped() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("main.c"), "int main(){}").unwrap();
        fs::write(temp.path().join("util.c"), "").unwrap();
        fs::create_dir(temp.path().join("sub.c")).unwrap();

        let mut files = find_files(&[pattern(temp.path(), "*.c")]);
        files.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.found));
        assert_eq!(files[0].name, "main.c");
        assert_eq!(files[1].name, "util.c");
    }

    #[test]
    fn test_no_cross_pattern_dedup() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("main.c"), "").unwrap();

        let files = find_files(&[pattern(temp.path(), "*.c"), pattern(temp.path(), "main.*")]);
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_dirs_skip_files() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir(temp.path().join("include")).unwrap();
        fs::write(temp.path().join("include.txt"), "").unwrap();

        let dirs = find_dirs(&[pattern(temp.path(), "include*")]);
        assert_eq!(dirs.len(), 1);
        assert!(dirs[0].found);
        assert_eq!(dirs[0].name, "include");
    }

    #[test]
    fn test_dirs_zero_match_yields_placeholder() {
        let temp = tempfile::tempdir().unwrap();
        let dirs = find_dirs(&[pattern(temp.path(), "include")]);

        assert_eq!(dirs.len(), 1);
        assert!(!dirs[0].found);
        assert_eq!(dirs[0].name, "include");
    }

    #[test]
    fn test_invalid_pattern_contributes_nothing() {
        let files = find_files(&["/tmp/[".to_string()]);
        assert!(files.is_empty());
    }
}
