//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every field has a default, so any subset of sections may be given.

mod barrier;
mod log;
mod output;

pub use barrier::FileBarrierConfig;
pub use log::FileLogConfig;
pub use output::FileOutputConfig;

use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Process group sizing and timeouts
    pub barrier: FileBarrierConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Diagnostic log settings
    pub log: FileLogConfig,
}

impl FileConfig {
    /// Render the effective configuration as TOML (for `--show-config`)
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[barrier]
workers = 5
timeout_ms = 250
channel_capacity = 2

[output]
color = false
transcript = "/tmp/barrier.jsonl"

[log]
file = "/tmp/barrier.log"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.barrier.workers, 5);
        assert_eq!(config.barrier.timeout_ms, 250);
        assert_eq!(config.barrier.channel_capacity, 2);
        assert!(!config.output.color);
        assert!(config.output.transcript.is_some());
        assert!(config.log.file.is_some());
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert_eq!(config.barrier.workers, 3);
        assert!(config.output.color);
        assert!(config.output.transcript.is_none());
        assert!(config.log.file.is_none());
    }

    #[test]
    fn test_show_config_round_trip() {
        let config = FileConfig::default();
        let rendered = config.to_toml_string().unwrap();
        assert!(rendered.contains("[barrier]"));
        let parsed: FileConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }
}
