//! Implementation of the `mortar configure` command.
//!
//! Scaffolds the conventional project layout in the current directory: a
//! `build/` output directory and an empty `build.lua` descriptor script.

use anyhow::{bail, Context, Result};
use std::env;
use std::fs;

use crate::output::{print_info, print_success};

/// Execute the configure command.
///
/// Fails if a `build/` directory already exists; an existing `build.lua`
/// is left untouched so re-scaffolding never clobbers a script.
pub fn cmd_configure() -> Result<()> {
    let cwd = env::current_dir().context("Failed to determine current directory")?;

    let build_dir = cwd.join("build");
    if build_dir.exists() {
        bail!("build directory already exists at {}", build_dir.display());
    }
    fs::create_dir(&build_dir)
        .with_context(|| format!("Failed to create {}", build_dir.display()))?;

    let script = cwd.join("build.lua");
    if script.exists() {
        print_info(&format!("keeping existing {}", script.display()));
    } else {
        fs::write(&script, "").with_context(|| format!("Failed to create {}", script.display()))?;
    }

    print_success(&format!("project configured at {}", cwd.display()));
    print_info(&format!("edit {} and run: mortar build .", script.display()));

    Ok(())
}
