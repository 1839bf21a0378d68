//! Package resolution through pkg-config, with a system-package-manager
//! install fallback
//!
//! Resolution is never fatal: every failure path degrades to a
//! `found=false` record so the script can branch on it. The install
//! chain runs at most once per package: probe, confirm availability,
//! ask, install, then retry the existence query exactly once.

use crate::entity::Package;
use mortar_platform::find_executable;
use std::io::{self, IsTerminal, Write};
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::{error, info, warn};

/// How to answer the "install missing package?" question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstallPolicy {
    /// Prompt on stderr when running interactively; decline otherwise
    #[default]
    Ask,
    /// Install without asking (`--yes`)
    Always,
    /// Never install
    Never,
}

#[derive(Debug, Error)]
enum PackageError {
    #[error("no supported package manager found")]
    NoManager,

    #[error("package not found in {0} repositories")]
    NotInRepos(&'static str),

    #[error("installation declined")]
    Declined,

    #[error("installer exited with failure")]
    InstallFailed,

    #[error("installer could not be run: {0}")]
    InstallSpawn(io::Error),
}

/// Supported system package managers, in probe order.
#[derive(Debug, Clone, Copy)]
enum PackageManager {
    Apt,
    Pacman,
}

impl PackageManager {
    const CANDIDATES: [PackageManager; 2] = [PackageManager::Apt, PackageManager::Pacman];

    fn command(self) -> &'static str {
        match self {
            PackageManager::Apt => "apt",
            PackageManager::Pacman => "pacman",
        }
    }

    /// First manager whose command resolves on the search path.
    fn detect() -> Option<Self> {
        Self::CANDIDATES
            .into_iter()
            .find(|pm| find_executable(pm.command()).is_some())
    }

    /// Whether `name` exists in this manager's repositories.
    fn is_available(self, name: &str) -> bool {
        let mut cmd = match self {
            PackageManager::Apt => {
                let mut c = Command::new("apt");
                c.args(["show", name]);
                c
            }
            PackageManager::Pacman => {
                let mut c = Command::new("pacman");
                c.args(["-Ss", &format!("^{name}$")]);
                c
            }
        };
        cmd.stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Run the privileged installer with inherited stdio.
    fn install(self, name: &str) -> Result<(), PackageError> {
        let mut cmd = Command::new("sudo");
        match self {
            PackageManager::Apt => cmd.args(["apt", "install", "-y", name]),
            PackageManager::Pacman => cmd.args(["pacman", "-S", "--noconfirm", name]),
        };
        let status = cmd.status().map_err(PackageError::InstallSpawn)?;
        if status.success() {
            Ok(())
        } else {
            Err(PackageError::InstallFailed)
        }
    }
}

/// Resolve each named package, trying an interactive install for the
/// missing ones according to `policy`.
pub fn find_packages(names: &[String], policy: InstallPolicy) -> Vec<Package> {
    names
        .iter()
        .map(|name| resolve_package(name, policy))
        .collect()
}

fn resolve_package(name: &str, policy: InstallPolicy) -> Package {
    if !pkg_config_exists(name) {
        warn!("package '{}' not found", name);
        if let Err(e) = try_install(name, policy) {
            error!("failed to install package '{}': {}", name, e);
            return Package::missing(name);
        }
        // Single retry after a successful install.
        if !pkg_config_exists(name) {
            error!("package '{}' still not found after installation", name);
            return Package::missing(name);
        }
        info!("package '{}' installed", name);
    }

    Package {
        name: name.to_string(),
        cflags: pkg_config_query(name, "--cflags-only-I"),
        libs: pkg_config_query(name, "--libs"),
        found: true,
    }
}

fn try_install(name: &str, policy: InstallPolicy) -> Result<(), PackageError> {
    let manager = PackageManager::detect().ok_or(PackageError::NoManager)?;
    if !manager.is_available(name) {
        return Err(PackageError::NotInRepos(manager.command()));
    }
    if !confirm_install(name, manager.command(), policy) {
        return Err(PackageError::Declined);
    }
    manager.install(name)
}

/// Ask the user whether to install `name` with `manager`.
///
/// Prompts only when both stdin and stderr are terminals; otherwise the
/// answer is an automatic decline so sandboxed runs never block.
fn confirm_install(name: &str, manager: &str, policy: InstallPolicy) -> bool {
    match policy {
        InstallPolicy::Always => true,
        InstallPolicy::Never => false,
        InstallPolicy::Ask => {
            if !io::stdin().is_terminal() || !io::stderr().is_terminal() {
                warn!(
                    "package '{}' is missing and no terminal is attached; pass --yes to install",
                    name
                );
                return false;
            }

            let _ = write!(
                io::stderr(),
                "Package '{name}' is missing. Install it with {manager}? [y/N] "
            );
            let _ = io::stderr().flush();

            let mut input = String::new();
            if io::stdin().read_line(&mut input).is_err() {
                return false;
            }
            matches!(input.trim().to_ascii_lowercase().as_str(), "y" | "yes")
        }
    }
}

fn pkg_config_exists(name: &str) -> bool {
    Command::new("pkg-config")
        .args(["--exists", name])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Run a pkg-config query and return its trimmed stdout; empty on failure.
fn pkg_config_query(name: &str, flag: &str) -> String {
    Command::new("pkg-config")
        .args([flag, name])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .map(|out| String::from_utf8_lossy(&out.stdout).trim().to_string())
        .unwrap_or_default()
}
