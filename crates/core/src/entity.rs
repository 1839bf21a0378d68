//! Entity model: the typed records a build script manipulates
//!
//! These are plain value types. Discovery creates them, the scripting
//! bridge reads/writes their scalar fields by name, and binding clones
//! them into a [`Project`]'s lists. A project exclusively owns its bound
//! entities; there are no back-references.

use serde::Serialize;
use std::path::Path;

/// A file resolved (or referenced but missing) by `glob_files`.
#[derive(Debug, Clone, Serialize)]
pub struct File {
    /// Base name including the extension, e.g. `main.c`
    pub name: String,
    /// Extension without the leading dot, e.g. `c`; empty when absent
    pub ext: String,
    /// Absolute path for found files; the original pattern otherwise
    pub path: String,
    pub found: bool,
}

impl File {
    /// Record for a pattern (or match) that resolved to a real file.
    pub fn resolved(path: &Path) -> Self {
        Self {
            name: base_name(path),
            ext: extension(path),
            path: path.to_string_lossy().into_owned(),
            found: true,
        }
    }

    /// Placeholder for a pattern with no matches. Name and extension are
    /// parsed off the pattern string so scripts can still branch on them.
    pub fn missing(pattern: &str) -> Self {
        let path = Path::new(pattern);
        Self {
            name: base_name(path),
            ext: extension(path),
            path: pattern.to_string(),
            found: false,
        }
    }
}

/// A directory resolved (or referenced but missing) by `glob_dirs`.
#[derive(Debug, Clone, Serialize)]
pub struct Dir {
    /// Base name of the directory
    pub name: String,
    pub path: String,
    pub found: bool,
}

impl Dir {
    pub fn resolved(path: &Path) -> Self {
        Self {
            name: base_name(path),
            path: path.to_string_lossy().into_owned(),
            found: true,
        }
    }

    pub fn missing(pattern: &str) -> Self {
        Self {
            name: base_name(Path::new(pattern)),
            path: pattern.to_string(),
            found: false,
        }
    }
}

/// A library resolved through pkg-config by `glob_packages`.
#[derive(Debug, Clone, Serialize)]
pub struct Package {
    pub name: String,
    /// Compiler include flags (`--cflags-only-I` output), trimmed
    pub cflags: String,
    /// Linker flags (`--libs` output), trimmed
    pub libs: String,
    pub found: bool,
}

impl Package {
    /// Record for a package that could not be resolved.
    pub fn missing(name: &str) -> Self {
        Self {
            name: name.to_string(),
            cflags: String::new(),
            libs: String::new(),
            found: false,
        }
    }
}

/// One build target's complete description.
///
/// Created by the script's `project()` call, mutated by binding and flag
/// calls, consumed by `build()`.
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub name: String,
    /// Target OS tag (`linux`, `darwin`, `windows`)
    pub os: String,
    /// Working directory of the invoking process
    pub cwd: String,
    /// Output location for the descriptor and compiled artifacts.
    /// Must exist on disk when the project is created.
    pub build_dir: String,
    /// Absolute path of the build script driving this project
    pub script_path: String,
    /// Directory containing the build script
    pub script_dir: String,
    /// Bound sources; only `found` entries, in bind order
    pub sources: Vec<File>,
    /// Bound header directories; only `found` entries, in bind order
    pub headers: Vec<Dir>,
    /// Bound packages; only `found` entries, in bind order
    pub libraries: Vec<Package>,
    pub compiler: String,
    pub assembler: String,
    pub cflags: Vec<String>,
    pub lflags: Vec<String>,
    pub asmflags: Vec<String>,
    pub linkerflags: Vec<String>,
    pub autoconfigure: bool,
}

impl Project {
    pub fn new(
        name: String,
        os: String,
        cwd: String,
        build_dir: String,
        script_path: String,
        script_dir: String,
    ) -> Self {
        Self {
            name,
            os,
            cwd,
            build_dir,
            script_path,
            script_dir,
            sources: Vec::new(),
            headers: Vec::new(),
            libraries: Vec::new(),
            compiler: String::new(),
            assembler: String::new(),
            cflags: Vec::new(),
            lflags: Vec::new(),
            asmflags: Vec::new(),
            linkerflags: Vec::new(),
            autoconfigure: true,
        }
    }

    /// Pretty-printed JSON view of the full project state, for `debug()`.
    pub fn dump(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("<unserializable: {e}>"))
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

fn extension(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_parses_pattern() {
        let file = File::missing("/proj/src/*.c");
        assert_eq!(file.name, "*.c");
        assert_eq!(file.ext, "c");
        assert_eq!(file.path, "/proj/src/*.c");
        assert!(!file.found);
    }

    #[test]
    fn test_resolved_file_splits_name_and_ext() {
        let file = File::resolved(Path::new("/proj/src/main.cpp"));
        assert_eq!(file.name, "main.cpp");
        assert_eq!(file.ext, "cpp");
        assert!(file.found);
    }

    #[test]
    fn test_file_without_extension() {
        let file = File::resolved(Path::new("/proj/Makefile"));
        assert_eq!(file.name, "Makefile");
        assert_eq!(file.ext, "");
    }

    #[test]
    fn test_project_defaults() {
        let project = Project::new(
            "demo".into(),
            "linux".into(),
            "/work".into(),
            "/work/build".into(),
            "/work/build.lua".into(),
            "/work".into(),
        );
        assert!(project.autoconfigure);
        assert!(project.sources.is_empty());
        assert!(project.compiler.is_empty());
    }

    #[test]
    fn test_dump_is_json() {
        let project = Project::new(
            "demo".into(),
            "linux".into(),
            "/work".into(),
            "/work/build".into(),
            "/work/build.lua".into(),
            "/work".into(),
        );
        let dump = project.dump();
        assert!(dump.contains("\"name\": \"demo\""));
        assert!(dump.contains("\"autoconfigure\": true"));
    }
}
