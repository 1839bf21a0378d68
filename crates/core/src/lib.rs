//! mortar-core: project-description engine for mortar
//!
//! This crate holds everything between the scripting surface and the
//! descriptor file on disk:
//! - the entity model (File, Dir, Package, Project)
//! - discovery engines (file/directory globbing, package resolution)
//! - autoconfigure (language and toolchain inference)
//! - the build-graph emitter (ninja descriptor rendering and atomic write)
//! - recursive filesystem copy for the script's `copy()` helper

mod autoconf;
mod copy;
mod discovery;
mod entity;
mod error;
mod ninja;
mod packages;

pub use autoconf::{autoconfigure, detect_language, Lang};
pub use copy::copy_path;
pub use discovery::{find_dirs, find_files};
pub use entity::{Dir, File, Package, Project};
pub use error::CoreError;
pub use ninja::{render, write_descriptor};
pub use packages::{find_packages, InstallPolicy};

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Engine version guarded by the script-facing `version()` call and
/// reported by `mortar version`. Carries exactly one decimal digit.
pub const ENGINE_VERSION: f64 = 1.1;
