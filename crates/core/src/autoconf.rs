//! Language and toolchain inference
//!
//! Runs right before graph emission for projects that keep the default
//! `autoconfigure = true`. Scans bound source extensions, picks a
//! compiler (and assembler if needed) from ordered candidate lists, and
//! appends default flags after whatever the script already accumulated.

use crate::entity::{File, Project};
use mortar_platform::first_available;
use tracing::{info, warn};

/// Inferred primary build language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    C,
    Cpp,
}

const C_COMPILERS: [&str; 3] = ["gcc", "clang", "cc"];
const CPP_COMPILERS: [&str; 3] = ["g++", "clang++", "c++"];
const ASSEMBLERS: [&str; 2] = ["nasm", "as"];

const C_FLAGS: [&str; 3] = ["-Wall", "-Wextra", "-O2"];
const CPP_FLAGS: [&str; 4] = ["-Wall", "-Wextra", "-O2", "-std=c++17"];
const ASM_FLAGS: [&str; 2] = ["-f", "elf64"];

/// Any assembly source disables position-independent executables.
const NO_PIE: &str = "-no-pie";

/// Scan source extensions for the primary language and the presence of
/// assembly.
///
/// Any C++-family extension (`cpp`, `cxx`, `cc`) forces C++ regardless
/// of scan order or how many `.c` files are present. Assembly (`asm`,
/// `s`) is tracked independently of the primary language.
pub fn detect_language(sources: &[File]) -> (Option<Lang>, bool) {
    let mut lang = None;
    let mut has_asm = false;
    for src in sources {
        match src.ext.as_str() {
            "cpp" | "cxx" | "cc" => lang = Some(Lang::Cpp),
            "c" => {
                if lang.is_none() {
                    lang = Some(Lang::C);
                }
            }
            "asm" | "s" => has_asm = true,
            _ => {}
        }
    }
    (lang, has_asm)
}

/// Fill in toolchain and default flags for `project`.
///
/// Default flags are appended to the existing lists, never prepended or
/// replaced, so anything the script set explicitly keeps its position
/// ahead of them. A missing toolchain is warned about and recorded as an
/// empty name; emission still proceeds.
pub fn autoconfigure(project: &mut Project) {
    let (lang, has_asm) = detect_language(&project.sources);

    if lang.is_none() && !has_asm {
        warn!(
            "no recognized source extensions in '{}', skipping autoconfigure",
            project.name
        );
        return;
    }

    if let Some(lang) = lang {
        project.compiler = select_tool(compiler_candidates(lang), "compiler");
        project.cflags.extend(default_flags(lang));
        info!(
            "autoconfigured '{}' as {:?} using '{}'",
            project.name, lang, project.compiler
        );
    }

    if has_asm {
        project.assembler = select_tool(&ASSEMBLERS, "assembler");
        project
            .asmflags
            .extend(ASM_FLAGS.iter().map(|f| f.to_string()));
        project.linkerflags.push(NO_PIE.to_string());
    }
}

const fn compiler_candidates(lang: Lang) -> &'static [&'static str] {
    match lang {
        Lang::C => &C_COMPILERS,
        Lang::Cpp => &CPP_COMPILERS,
    }
}

fn default_flags(lang: Lang) -> Vec<String> {
    let flags: &[&str] = match lang {
        Lang::C => &C_FLAGS,
        Lang::Cpp => &CPP_FLAGS,
    };
    flags.iter().map(|f| f.to_string()).collect()
}

fn select_tool(candidates: &[&str], role: &str) -> String {
    match first_available(candidates) {
        Some(tool) => tool.to_string(),
        None => {
            warn!("no {} found on the search path (tried {:?})", role, candidates);
            String::new()
        }
    }
}
