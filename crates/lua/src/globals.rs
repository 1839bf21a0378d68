//! Script-facing API registration
//!
//! Every function the descriptor script can call is registered here as a
//! Lua global, created as a closure over the evaluation's [`ScriptEnv`]
//! and its shared project registry. The engine boundary stays message
//! passing: only entity handles and primitive values cross it.

use crate::bridge::{DirHandle, FileHandle, PackageHandle, ProjectHandle};
use mlua::{AnyUserData, Lua, Table, Value, Variadic};
use mortar_core::{InstallPolicy, Project, ENGINE_VERSION};
use mortar_platform::Os;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{info, warn};

/// Per-evaluation context shared by the API closures.
pub(crate) struct ScriptEnv {
    /// Absolute path of the descriptor script
    pub script_path: PathBuf,
    /// Directory the script lives in; relative patterns and paths
    /// resolve against it
    pub script_dir: PathBuf,
    /// Working directory of the invoking process
    pub cwd: PathBuf,
    /// `--builddir` override, if any
    pub build_dir_override: Option<PathBuf>,
    /// Policy for package-manager install prompts
    pub install: InstallPolicy,
}

/// Projects created during one evaluation, in creation order.
pub(crate) type ProjectRegistry = Rc<RefCell<Vec<Rc<RefCell<Project>>>>>;

/// Register the read-only `mortar` info table.
pub(crate) fn register_info(lua: &Lua) -> mlua::Result<()> {
    let os = Os::current();
    let mortar = lua.create_table()?;
    mortar.set("os", os.as_str())?;
    mortar.set("version", format!("{ENGINE_VERSION:.1}"))?;
    mortar.set("is_linux", os == Os::Linux)?;
    mortar.set("is_darwin", os == Os::Darwin)?;
    mortar.set("is_windows", os == Os::Windows)?;
    lua.globals().set("mortar", mortar)?;
    Ok(())
}

/// Register every script-facing function as a Lua global.
pub(crate) fn register_api(
    lua: &Lua,
    env: Rc<ScriptEnv>,
    projects: ProjectRegistry,
) -> mlua::Result<()> {
    let globals = lua.globals();

    // project(name[, builddir]) -> Project handle
    {
        let env = env.clone();
        let projects = projects.clone();
        let f = lua.create_function(move |_, (name, build_dir): (String, Option<String>)| {
            let mut dir = env.script_dir.join("build");
            if let Some(explicit) = &build_dir {
                dir = resolve(&env.script_dir, explicit);
            }
            if let Some(override_dir) = &env.build_dir_override {
                dir = resolve(&env.script_dir, &override_dir.to_string_lossy());
            }

            // Checked, never created: the build directory is the user's.
            let meta = fs::metadata(&dir).map_err(|e| {
                mlua::Error::runtime(format!(
                    "build directory '{}' does not exist or cannot be accessed: {}",
                    dir.display(),
                    e
                ))
            })?;
            if !meta.is_dir() {
                return Err(mlua::Error::runtime(format!(
                    "build path '{}' is not a directory",
                    dir.display()
                )));
            }

            let project = Project::new(
                name,
                Os::current().as_str().to_string(),
                lossy(&env.cwd),
                lossy(&dir),
                lossy(&env.script_path),
                lossy(&env.script_dir),
            );
            let handle = Rc::new(RefCell::new(project));
            projects.borrow_mut().push(handle.clone());
            Ok(ProjectHandle(handle))
        })?;
        globals.set("project", f)?;
    }

    // glob_files(...patterns) -> { name = File handle }
    {
        let env = env.clone();
        let f = lua.create_function(move |lua, patterns: Variadic<String>| {
            let resolved = resolve_patterns(&env.script_dir, &patterns);
            let files = mortar_core::find_files(&resolved);

            let table = lua.create_table()?;
            for file in files {
                let key = file.name.clone();
                table.raw_set(key, FileHandle::new(file))?;
            }
            Ok(table)
        })?;
        globals.set("glob_files", f)?;
    }

    // glob_dirs(...patterns) -> { name = Dir handle }
    //
    // Stricter than glob_files: an empty aggregate aborts the script,
    // since header/library directories are usually load-bearing.
    {
        let env = env.clone();
        let f = lua.create_function(move |lua, patterns: Variadic<String>| {
            let resolved = resolve_patterns(&env.script_dir, &patterns);
            let dirs = mortar_core::find_dirs(&resolved);
            if dirs.is_empty() {
                return Err(mlua::Error::runtime("no matching directories found"));
            }

            let table = lua.create_table()?;
            for dir in dirs {
                let key = dir.name.clone();
                table.raw_set(key, DirHandle::new(dir))?;
            }
            Ok(table)
        })?;
        globals.set("glob_dirs", f)?;
    }

    // glob_packages(...names) -> { name = Package handle }
    {
        let env = env.clone();
        let f = lua.create_function(move |lua, names: Variadic<String>| {
            let names: Vec<String> = names.into_iter().collect();
            let packages = mortar_core::find_packages(&names, env.install);

            let table = lua.create_table()?;
            for pkg in packages {
                let key = pkg.name.clone();
                table.raw_set(key, PackageHandle::new(pkg))?;
            }
            Ok(table)
        })?;
        globals.set("glob_packages", f)?;
    }

    // sources(project, ...collections)
    {
        let f = lua.create_function(move |_, (ud, collections): (AnyUserData, Variadic<Table>)| {
            let project = project_arg(&ud)?;
            let project_name = project.borrow().name.clone();
            for collection in collections {
                for item in handles_in::<FileHandle>(&collection)? {
                    let file = item.0.borrow();
                    if file.found {
                        info!("bound source '{}' to '{}'", file.name, project_name);
                        project.borrow_mut().sources.push(file.clone());
                    } else {
                        warn!("skipping unfound source '{}'", file.name);
                    }
                }
            }
            Ok(())
        })?;
        globals.set("sources", f)?;
    }

    // headers(project, ...collections)
    {
        let f = lua.create_function(move |_, (ud, collections): (AnyUserData, Variadic<Table>)| {
            let project = project_arg(&ud)?;
            let project_name = project.borrow().name.clone();
            for collection in collections {
                for item in handles_in::<DirHandle>(&collection)? {
                    let dir = item.0.borrow();
                    if dir.found {
                        info!("bound header dir '{}' to '{}'", dir.name, project_name);
                        project.borrow_mut().headers.push(dir.clone());
                    } else {
                        warn!("skipping unfound header dir '{}'", dir.name);
                    }
                }
            }
            Ok(())
        })?;
        globals.set("headers", f)?;
    }

    // packages(project, ...collections)
    {
        let f = lua.create_function(move |_, (ud, collections): (AnyUserData, Variadic<Table>)| {
            let project = project_arg(&ud)?;
            let project_name = project.borrow().name.clone();
            for collection in collections {
                for item in handles_in::<PackageHandle>(&collection)? {
                    let pkg = item.0.borrow();
                    if pkg.found {
                        info!("bound library '{}' to '{}'", pkg.name, project_name);
                        project.borrow_mut().libraries.push(pkg.clone());
                    } else {
                        warn!("skipping unresolved library '{}'", pkg.name);
                    }
                }
            }
            Ok(())
        })?;
        globals.set("packages", f)?;
    }

    // compiler(project, name) / assembler(project, name)
    {
        let f = lua.create_function(|_, (ud, name): (AnyUserData, String)| {
            if name.is_empty() {
                return Err(mlua::Error::runtime("compiler name must not be empty"));
            }
            project_arg(&ud)?.borrow_mut().compiler = name;
            Ok(())
        })?;
        globals.set("compiler", f)?;

        let f = lua.create_function(|_, (ud, name): (AnyUserData, String)| {
            if name.is_empty() {
                return Err(mlua::Error::runtime("assembler name must not be empty"));
            }
            project_arg(&ud)?.borrow_mut().assembler = name;
            Ok(())
        })?;
        globals.set("assembler", f)?;
    }

    // Flag appenders. Append-only: the emitter preserves this order.
    register_flag_fn(lua, "cflags", |p| &mut p.cflags)?;
    register_flag_fn(lua, "lflags", |p| &mut p.lflags)?;
    register_flag_fn(lua, "asmflags", |p| &mut p.asmflags)?;
    register_flag_fn(lua, "linkerflags", |p| &mut p.linkerflags)?;

    // autoconfigure(project, enabled)
    {
        let f = lua.create_function(|_, (ud, enabled): (AnyUserData, bool)| {
            project_arg(&ud)?.borrow_mut().autoconfigure = enabled;
            Ok(())
        })?;
        globals.set("autoconfigure", f)?;
    }

    // copy(...sources, dest)
    {
        let env = env.clone();
        let f = lua.create_function(move |_, args: Variadic<String>| {
            let Some((dest, srcs)) = args.split_last() else {
                return Err(mlua::Error::runtime(
                    "copy(sources.., dest) requires at least one source and a destination",
                ));
            };
            if srcs.is_empty() {
                return Err(mlua::Error::runtime(
                    "copy(sources.., dest) requires at least one source and a destination",
                ));
            }

            let dest = resolve(&env.script_dir, dest);
            for src in srcs {
                let src = resolve(&env.script_dir, src);
                mortar_core::copy_path(&src, &dest).map_err(mlua::Error::external)?;
            }
            Ok(())
        })?;
        globals.set("copy", f)?;
    }

    // build(project): autoconfigure, then emit the descriptor
    {
        let f = lua.create_function(|_, ud: AnyUserData| {
            let project = project_arg(&ud)?;
            let mut project = project.borrow_mut();
            info!("building '{}'", project.name);

            match fs::metadata(&project.build_dir) {
                Ok(meta) if meta.is_dir() => {}
                _ => {
                    warn!(
                        "build directory '{}' does not exist or is not a directory",
                        project.build_dir
                    );
                    return Ok(());
                }
            }

            if project.autoconfigure {
                mortar_core::autoconfigure(&mut project);
            }
            mortar_core::write_descriptor(&mut project).map_err(mlua::Error::external)?;
            info!("finished '{}'", project.name);
            Ok(())
        })?;
        globals.set("build", f)?;
    }

    // debug(project): dump state to the console
    {
        let f = lua.create_function(|_, ud: AnyUserData| {
            let project = project_arg(&ud)?;
            println!("{}", project.borrow().dump());
            Ok(())
        })?;
        globals.set("debug", f)?;
    }

    // version(required): guard against an older engine
    {
        let f = lua.create_function(|_, required: f64| {
            let scaled = required * 10.0;
            if (scaled - scaled.round()).abs() > 1e-6 {
                return Err(mlua::Error::runtime(format!(
                    "invalid version number {required} (at most one decimal place allowed)"
                )));
            }
            if required > ENGINE_VERSION {
                return Err(mlua::Error::runtime(format!(
                    "this build script requires mortar {required:.1} or newer, \
                     but this is mortar {ENGINE_VERSION:.1}"
                )));
            }
            Ok(())
        })?;
        globals.set("version", f)?;
    }

    Ok(())
}

fn register_flag_fn(
    lua: &Lua,
    name: &str,
    pick: fn(&mut Project) -> &mut Vec<String>,
) -> mlua::Result<()> {
    let f = lua.create_function(move |_, (ud, flags): (AnyUserData, Variadic<String>)| {
        let project = project_arg(&ud)?;
        pick(&mut project.borrow_mut()).extend(flags);
        Ok(())
    })?;
    lua.globals().set(name, f)
}

/// Extract the project behind the first argument of a binding call.
fn project_arg(ud: &AnyUserData) -> mlua::Result<Rc<RefCell<Project>>> {
    ud.borrow::<ProjectHandle>()
        .map(|handle| handle.0.clone())
        .map_err(|_| mlua::Error::runtime("expected a Project handle"))
}

/// Collect the handles of type `H` from a discovery-result table.
/// Other values are ignored, matching the keyed-collection contract.
fn handles_in<H: Clone + 'static>(collection: &Table) -> mlua::Result<Vec<H>> {
    let mut handles = Vec::new();
    for pair in collection.clone().pairs::<Value, Value>() {
        let (_, value) = pair?;
        if let Value::UserData(item) = value {
            if let Ok(handle) = item.borrow::<H>() {
                handles.push(H::clone(&handle));
            }
        }
    }
    Ok(handles)
}

fn resolve(base: &Path, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base.join(p)
    }
}

fn resolve_patterns(base: &Path, patterns: &[String]) -> Vec<String> {
    patterns
        .iter()
        .map(|p| lossy(&resolve(base, p)))
        .collect()
}

fn lossy(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
