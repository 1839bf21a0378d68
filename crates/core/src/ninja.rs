//! Build-graph emitter
//!
//! Serializes a fully-populated [`Project`] into the ninja descriptor
//! consumed by the external build executor. Rendering is a pure function
//! of the project so the output is byte-stable: flag lists are emitted in
//! append order, object names derive only from source names, and no
//! collection is reordered.

use crate::entity::Project;
use crate::error::CoreError;
use crate::Result;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

/// Render the descriptor and write it to `<build-dir>/build.ninja`.
///
/// The file is written to a temporary sibling first and atomically
/// renamed into place, so a failed run never leaves a partial
/// descriptor behind. When the project targets windows, every path on
/// the project is rewritten into ninja-compatible form before
/// rendering; the write location is resolved beforehand.
pub fn write_descriptor(project: &mut Project) -> Result<PathBuf> {
    let out_dir = PathBuf::from(&project.build_dir);

    if project.os == "windows" {
        apply_os_compat(project);
    }

    let content = render(project);
    let ninja_path = out_dir.join("build.ninja");

    let descriptor_err = |source| CoreError::Descriptor {
        path: ninja_path.to_string_lossy().into_owned(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(&out_dir).map_err(descriptor_err)?;
    tmp.write_all(content.as_bytes()).map_err(descriptor_err)?;
    tmp.persist(&ninja_path).map_err(|e| descriptor_err(e.error))?;

    info!("wrote descriptor {}", ninja_path.display());
    Ok(ninja_path)
}

/// Render the full descriptor text for `project`.
///
/// Expects any target-OS path rewriting to have been applied already.
pub fn render(project: &Project) -> String {
    let mut out = String::new();

    out.push_str("# This file was generated by mortar. Do not edit.\n\n");

    out.push_str(&format!(
        "rule cc\n  command = {} $CFLAGS -c $in -o $out\n  description = CC $in\n\n",
        project.compiler
    ));
    out.push_str(&format!(
        "rule asm\n  command = {} $ASMFLAGS $in -o $out\n  description = ASM $in\n\n",
        project.assembler
    ));
    out.push_str(&format!(
        "rule link\n  command = {} $LINKFLAGS $in $LFLAGS -o $out\n  description = LINK $out\n\n",
        project.compiler
    ));

    // Compile flags: explicit + autoconfigure flags keep their append
    // order, then one -I per bound header, then package include flags.
    let mut cflags = project.cflags.clone();
    for header in &project.headers {
        cflags.push(format!("-I{}", header.path));
    }
    for pkg in &project.libraries {
        if !pkg.cflags.is_empty() {
            cflags.push(pkg.cflags.clone());
        }
    }

    // Link flags: explicit first, package link flags after.
    let mut lflags = project.lflags.clone();
    for pkg in &project.libraries {
        if !pkg.libs.is_empty() {
            lflags.push(pkg.libs.clone());
        }
    }

    let cflags = cflags.join(" ");
    let asmflags = project.asmflags.join(" ");

    let mut objects = Vec::new();
    for src in &project.sources {
        let stem = Path::new(&src.name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| src.name.clone());
        let obj = format!("{}/{}_{}.o", project.build_dir, stem, src.ext);

        match src.ext.as_str() {
            "c" | "cpp" | "cxx" | "cc" => {
                let dep = format!("{obj}.d");
                out.push_str(&format!(
                    "build {obj}: cc {}\n  CFLAGS = {cflags} -MMD -MF {dep}\n",
                    src.path
                ));
                out.push_str(&format!("  depfile = {dep}\n  deps = gcc\n"));
                objects.push(obj);
            }
            "asm" | "s" => {
                out.push_str(&format!(
                    "build {obj}: asm {}\n  ASMFLAGS = {asmflags}\n",
                    src.path
                ));
                objects.push(obj);
            }
            _ => {}
        }
    }

    out.push_str(&format!(
        "build {}/{}: link {}\n  LFLAGS = {}\n  LINKFLAGS = {}\n",
        project.build_dir,
        project.name,
        objects.join(" "),
        lflags.join(" "),
        project.linkerflags.join(" "),
    ));

    out
}

/// Rewrite every path the emitter touches into the descriptor syntax's
/// escaped form: backslashes become forward slashes and a drive-letter
/// prefix `X:` becomes `X$`.
fn apply_os_compat(project: &mut Project) {
    project.build_dir = path_compat(&project.build_dir);
    project.script_path = path_compat(&project.script_path);
    project.script_dir = path_compat(&project.script_dir);

    for src in &mut project.sources {
        src.path = path_compat(&src.path);
    }
    for header in &mut project.headers {
        header.path = path_compat(&header.path);
    }
    for pkg in &mut project.libraries {
        if !pkg.cflags.is_empty() {
            pkg.cflags = path_compat(&pkg.cflags);
        }
        if !pkg.libs.is_empty() {
            pkg.libs = path_compat(&pkg.libs);
        }
    }
}

fn path_compat(path: &str) -> String {
    let p = path.replace('\\', "/");
    let bytes = p.as_bytes();
    if bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'/' {
        format!("{}${}", &p[..1], &p[2..])
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Dir, File, Package};
    use std::fs;

    fn src(name: &str, ext: &str, path: &str) -> File {
        File {
            name: name.to_string(),
            ext: ext.to_string(),
            path: path.to_string(),
            found: true,
        }
    }

    fn demo_project() -> Project {
        let mut project = Project::new(
            "demo".into(),
            "linux".into(),
            "/work".into(),
            "/work/build".into(),
            "/work/build.lua".into(),
            "/work".into(),
        );
        project.compiler = "gcc".into();
        project.sources = vec![src("main.c", "c", "/work/main.c")];
        project
    }

    #[test]
    fn test_path_compat() {
        assert_eq!(path_compat(r"C:\dev\proj"), "C$/dev/proj");
        assert_eq!(path_compat(r"src\main.c"), "src/main.c");
        assert_eq!(path_compat("/usr/include"), "/usr/include");
        assert_eq!(path_compat("x:"), "x:");
    }

    #[test]
    fn test_render_single_c_source() {
        let mut project = demo_project();
        project.cflags = vec!["-Wall".into()];

        let expected = "\
# This file was generated by mortar. Do not edit.

rule cc
  command = gcc $CFLAGS -c $in -o $out
  description = CC $in

rule asm
  command =  $ASMFLAGS $in -o $out
  description = ASM $in

rule link
  command = gcc $LINKFLAGS $in $LFLAGS -o $out
  description = LINK $out

build /work/build/main_c.o: cc /work/main.c
  CFLAGS = -Wall -MMD -MF /work/build/main_c.o.d
  depfile = /work/build/main_c.o.d
  deps = gcc
build /work/build/demo: link /work/build/main_c.o
";
        let tail = "  LFLAGS = \n  LINKFLAGS = \n";
        assert_eq!(render(&project), format!("{expected}{tail}"));
    }

    #[test]
    fn test_object_names_never_collide_across_extensions() {
        let mut project = demo_project();
        project.sources = vec![
            src("a.c", "c", "/work/a.c"),
            src("a.cpp", "cpp", "/work/a.cpp"),
        ];

        let out = render(&project);
        assert!(out.contains("build /work/build/a_c.o: cc /work/a.c"));
        assert!(out.contains("build /work/build/a_cpp.o: cc /work/a.cpp"));
        assert!(out.contains("build /work/build/demo: link /work/build/a_c.o /work/build/a_cpp.o"));
    }

    #[test]
    fn test_flag_assembly_order() {
        let mut project = demo_project();
        project.cflags = vec!["-DUSER".into(), "-O3".into()];
        project.lflags = vec!["-L/opt/lib".into()];
        project.headers = vec![Dir {
            name: "include".into(),
            path: "/work/include".into(),
            found: true,
        }];
        project.libraries = vec![Package {
            name: "zlib".into(),
            cflags: "-I/usr/include/zlib".into(),
            libs: "-lz".into(),
            found: true,
        }];

        let out = render(&project);
        assert!(out.contains(
            "CFLAGS = -DUSER -O3 -I/work/include -I/usr/include/zlib -MMD -MF /work/build/main_c.o.d"
        ));
        assert!(out.contains("LFLAGS = -L/opt/lib -lz\n"));
    }

    #[test]
    fn test_assembly_sources_use_asm_rule() {
        let mut project = demo_project();
        project.assembler = "nasm".into();
        project.asmflags = vec!["-f".into(), "elf64".into()];
        project.sources.push(src("boot.asm", "asm", "/work/boot.asm"));

        let out = render(&project);
        assert!(out.contains("build /work/build/boot_asm.o: asm /work/boot.asm\n  ASMFLAGS = -f elf64\n"));
        assert!(out.contains("link /work/build/main_c.o /work/build/boot_asm.o"));
    }

    #[test]
    fn test_unrecognized_extensions_produce_no_edge() {
        let mut project = demo_project();
        project.sources.push(src("notes.txt", "txt", "/work/notes.txt"));

        let out = render(&project);
        assert!(!out.contains("notes"));
        assert!(out.contains("link /work/build/main_c.o\n"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let mut project = demo_project();
        project.cflags = vec!["-Wall".into(), "-Wextra".into()];
        project.sources.push(src("util.c", "c", "/work/util.c"));

        assert_eq!(render(&project), render(&project));
    }

    #[test]
    fn test_write_descriptor_creates_file() {
        let temp = tempfile::tempdir().unwrap();
        let mut project = demo_project();
        project.build_dir = temp.path().to_string_lossy().into_owned();

        let path = write_descriptor(&mut project).unwrap();
        assert_eq!(path, temp.path().join("build.ninja"));

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, render(&project));
    }

    #[test]
    fn test_write_descriptor_missing_dir_errors() {
        let mut project = demo_project();
        project.build_dir = "/nonexistent/build/dir".into();

        let err = write_descriptor(&mut project).unwrap_err();
        assert!(matches!(err, CoreError::Descriptor { .. }));
    }

    #[test]
    fn test_windows_projects_get_rewritten_paths() {
        let temp = tempfile::tempdir().unwrap();
        let mut project = demo_project();
        project.os = "windows".into();
        project.build_dir = temp.path().to_string_lossy().into_owned();
        project.sources = vec![src("main.c", "c", r"C:\src\main.c")];

        let path = write_descriptor(&mut project).unwrap();
        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("cc C$/src/main.c"));
        assert!(!content.contains('\\'));
    }
}
