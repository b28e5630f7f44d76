//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for mesh-barrier
#[derive(Parser, Debug)]
#[command(name = "mesh-barrier")]
#[command(author, version, about = "Controller/worker barrier over a full mesh of channels")]
#[command(long_about = r#"
Mesh Barrier runs one controller and W workers connected by a full mesh of
directed channels.

For each worker in turn, the controller sends a poll. The polled worker asks
every other worker for a confirmation and, once all of them have answered,
confirms to the controller. After every worker has been polled, the
controller tells all workers to stop.

Configuration files are loaded from (in priority order):
1. MESH_BARRIER_* environment variables
2. --config <path>     Explicit config file
3. ./barrier.toml      Project-level config
4. ~/.config/mesh-barrier/config.toml   Global config

Example:
  mesh-barrier
  mesh-barrier --workers 8 --timeout-ms 1000
  mesh-barrier -q --transcript run.jsonl
"#)]
pub struct Cli {
    /// Number of workers
    #[arg(short, long, value_name = "N")]
    pub workers: Option<usize>,

    /// How long a worker waits for any channel before giving up
    #[arg(short, long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Frames buffered per directed channel
    #[arg(long, value_name = "FRAMES")]
    pub capacity: Option<usize>,

    /// Write a JSONL event transcript to this path
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Print only poll results, failures and completion
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration sources and the effective configuration, then exit
    #[arg(long)]
    pub show_config: bool,
}
