//! Implementation of the `mortar build` command.
//!
//! Resolves the descriptor script (a file, or a directory expected to
//! contain a file literally named `build.lua`), evaluates it, and
//! reports the outcome. The script itself drives discovery, binding and
//! descriptor emission through the mortar-lua API.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use mortar_core::InstallPolicy;
use mortar_lua::{EvalOptions, Runtime};

use crate::output::{print_success, print_warning};

// mlua errors are not Send + Sync, so evaluation errors are flattened
// to their message before entering anyhow.
fn map_eval_err<T>(result: mortar_lua::Result<T>) -> Result<T> {
    result.map_err(|e| anyhow::anyhow!("{e}"))
}

/// Execute the build command.
pub fn cmd_build(path: &Path, builddir: Option<PathBuf>, yes: bool) -> Result<()> {
    let meta = fs::metadata(path)
        .with_context(|| format!("path does not exist: {}", path.display()))?;

    let script = if meta.is_dir() {
        let script = path.join("build.lua");
        if !script.exists() {
            bail!("no build.lua found in directory: {}", path.display());
        }
        script
    } else {
        path.to_path_buf()
    };

    debug!("resolved descriptor script {}", script.display());

    let options = EvalOptions {
        build_dir: builddir,
        install: if yes {
            InstallPolicy::Always
        } else {
            InstallPolicy::Ask
        },
    };

    let runtime = map_eval_err(Runtime::new(&script, options))?;
    map_eval_err(runtime.run())?;

    let count = runtime.projects().len();
    if count == 0 {
        print_warning("script declared no projects");
    }
    print_success(&format!(
        "evaluated {} ({} project{})",
        script.display(),
        count,
        if count == 1 { "" } else { "s" }
    ));

    Ok(())
}
