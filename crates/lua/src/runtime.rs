//! One descriptor-script evaluation
//!
//! A [`Runtime`] owns the Lua state, the script's resolved location, and
//! the registry of projects created while the script runs. One runtime
//! evaluates one script, start to finish, on the calling thread.

use crate::error::{Error, Result};
use crate::globals::{self, ProjectRegistry, ScriptEnv};
use mlua::Lua;
use mortar_core::{InstallPolicy, Project};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::info;

/// Options threaded into an evaluation from the command line.
#[derive(Debug, Default)]
pub struct EvalOptions {
    /// Overrides whatever build directory the script would compute
    pub build_dir: Option<PathBuf>,
    /// Policy for package-manager install prompts
    pub install: InstallPolicy,
}

/// The Lua runtime for one build-script evaluation.
pub struct Runtime {
    lua: Lua,
    script_path: PathBuf,
    projects: ProjectRegistry,
}

impl Runtime {
    /// Create a runtime for the script at `script_path` with the API
    /// registered. The path must exist; relative paths resolve against
    /// the current working directory.
    pub fn new(script_path: &Path, options: EvalOptions) -> Result<Self> {
        if !script_path.exists() {
            return Err(Error::ScriptNotFound(
                script_path.display().to_string(),
            ));
        }

        let cwd = std::env::current_dir()?;
        let script_path = if script_path.is_absolute() {
            script_path.to_path_buf()
        } else {
            cwd.join(script_path)
        };
        let script_dir = script_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| cwd.clone());

        let lua = Lua::new();
        let projects: ProjectRegistry = Rc::new(RefCell::new(Vec::new()));
        let env = Rc::new(ScriptEnv {
            script_path: script_path.clone(),
            script_dir,
            cwd,
            build_dir_override: options.build_dir,
            install: options.install,
        });

        globals::register_info(&lua)?;
        globals::register_api(&lua, env, projects.clone())?;

        Ok(Self {
            lua,
            script_path,
            projects,
        })
    }

    /// Load and execute the script. Any script error aborts the
    /// evaluation and surfaces here.
    pub fn run(&self) -> Result<()> {
        info!("evaluating {}", self.script_path.display());
        let source = std::fs::read_to_string(&self.script_path)?;
        self.lua
            .load(&source)
            .set_name(self.script_path.to_string_lossy())
            .exec()?;
        Ok(())
    }

    /// Projects created so far, in creation order.
    pub fn projects(&self) -> Vec<Rc<RefCell<Project>>> {
        self.projects.borrow().clone()
    }
}
