//! Configuration file loading for rank-tracker
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `RANK_TRACKER_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./rank-tracker.toml` or `./.rank-tracker.toml`
//! 4. Global config: `$XDG_CONFIG_HOME/rank-tracker/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    DEFAULT_BASE_URL, FileConfig, FileExtractionConfig, FileGatewayConfig, FileMatchingConfig,
    FileOutputConfig, FileQueryConfig, FileSourcesConfig,
};
pub use loader::ConfigLoader;
