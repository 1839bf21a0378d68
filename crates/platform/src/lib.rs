//! Platform detection and host-toolchain probing for mortar
//!
//! This crate provides the small platform surface the engine depends on:
//! - OS detection (the target OS tag stamped onto projects)
//! - executable lookup on the host's search path

mod exec;
mod platform;

pub use exec::{find_executable, find_executable_in, first_available};
pub use platform::Os;
