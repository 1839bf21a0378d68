//! mortar-lua: the scripting surface of mortar
//!
//! This crate embeds the Lua runtime that evaluates a descriptor script
//! (`build.lua`) and provides:
//! - the scripting bridge: per-entity accessor tables behind
//!   `__index`/`__newindex` metamethods on host entity handles
//! - the script-facing API (`project`, `glob_files`, `sources`, `build`, ...)
//! - the `Runtime` that owns one evaluation, including its project registry

mod bridge;
mod error;
mod globals;
mod runtime;

pub use bridge::{DirHandle, FileHandle, PackageHandle, ProjectHandle};
pub use error::{Error, Result};
pub use runtime::{EvalOptions, Runtime};
