//! Barrier configuration from TOML (`[barrier]` section)
//!
//! ```toml
//! [barrier]
//! workers = 3
//! timeout_ms = 5000
//! channel_capacity = 16
//! ```

use barrier_application::BarrierParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw barrier configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBarrierConfig {
    /// Number of workers
    pub workers: usize,
    /// Worker wait timeout in milliseconds
    pub timeout_ms: u64,
    /// Frames buffered per directed channel
    pub channel_capacity: usize,
}

impl Default for FileBarrierConfig {
    fn default() -> Self {
        let params = BarrierParams::default();
        Self {
            workers: params.workers,
            timeout_ms: params.timeout.as_millis() as u64,
            channel_capacity: params.channel_capacity,
        }
    }
}

impl FileBarrierConfig {
    /// Convert to run parameters. Validation happens when the run starts.
    pub fn to_params(&self) -> BarrierParams {
        BarrierParams::default()
            .with_workers(self.workers)
            .with_timeout(Duration::from_millis(self.timeout_ms))
            .with_channel_capacity(self.channel_capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_params() {
        let config = FileBarrierConfig::default();
        assert_eq!(config.to_params(), BarrierParams::default());
        assert_eq!(config.timeout_ms, 5000);
    }

    #[test]
    fn test_partial_section() {
        let toml_str = r#"
[barrier]
workers = 7
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        let params = config.barrier.to_params();
        assert_eq!(params.workers, 7);
        assert_eq!(params.timeout, Duration::from_secs(5));
        assert_eq!(params.channel_capacity, 16);
    }
}
