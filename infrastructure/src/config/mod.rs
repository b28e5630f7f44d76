//! Configuration file loading for mesh-barrier
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `MESH_BARRIER_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./barrier.toml` or `./.barrier.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/mesh-barrier/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{FileBarrierConfig, FileConfig, FileLogConfig, FileOutputConfig};
pub use loader::{ConfigLoader, ENV_PREFIX};
