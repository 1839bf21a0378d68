//! mortar: a scriptable build configurator for native projects
//!
//! Evaluates a `build.lua` descriptor script and emits a ninja build
//! graph for the external build executor. See `mortar build --help`.

mod cmd;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mortar")]
#[command(about = "Scriptable build configurator emitting ninja build graphs")]
struct Cli {
    /// Override the build directory computed by the script
    #[arg(long, global = true, value_name = "PATH")]
    builddir: Option<PathBuf>,

    /// Install missing packages without prompting
    #[arg(long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a build directory and an empty build.lua
    Configure,

    /// Evaluate a build script and emit its build graph
    Build {
        /// Path to build.lua, or a directory containing one
        path: PathBuf,
    },

    /// Print the engine version
    Version,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .without_time()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Configure => cmd::cmd_configure(),
        Commands::Build { path } => cmd::cmd_build(&path, cli.builddir, cli.yes),
        Commands::Version => {
            println!("{:.1}", mortar_core::ENGINE_VERSION);
            Ok(())
        }
    }
}
