//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod extraction;
mod gateway;
mod matching;
mod output;
mod query;
mod sources;

pub use extraction::FileExtractionConfig;
pub use gateway::{DEFAULT_BASE_URL, FileGatewayConfig};
pub use matching::FileMatchingConfig;
pub use output::FileOutputConfig;
pub use query::FileQueryConfig;
pub use sources::FileSourcesConfig;

use serde::{Deserialize, Serialize};
use tracker_domain::ConfigIssue;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Source selection and model catalog
    pub sources: FileSourcesConfig,
    /// Fan-out parameters
    pub query: FileQueryConfig,
    /// DataForSEO connection settings
    pub gateway: FileGatewayConfig,
    /// Extraction policy overrides
    pub extraction: FileExtractionConfig,
    /// Entity matching settings
    pub matching: FileMatchingConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Every check mirrors a conversion the binary performs, so a value
    /// reported here is also the value that gets replaced by its default.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.sources.parse_enabled().1);
        issues.extend(self.sources.parse_catalog().1);
        issues.extend(self.sources.parse_default_models().1);
        issues.extend(self.query.to_execution_params().1);
        issues.extend(self.extraction.to_policy().1);
        issues.extend(self.matching.to_aggregator().1);

        issues
    }
}
