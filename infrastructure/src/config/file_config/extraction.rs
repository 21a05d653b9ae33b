//! Extraction policy overrides from TOML (`[extraction]` section)

use serde::{Deserialize, Serialize};
use tracker_domain::{ConfigIssue, ConfigIssueCode, ExtractionPolicy};

/// Raw extraction configuration; unset fields keep the built-in policy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExtractionConfig {
    pub reject_prefixes: Option<Vec<String>>,
    pub min_title_len: Option<usize>,
    pub max_title_len: Option<usize>,
}

impl FileExtractionConfig {
    pub fn to_policy(&self) -> (ExtractionPolicy, Vec<ConfigIssue>) {
        let mut policy = ExtractionPolicy::default();
        let mut issues = Vec::new();

        if let Some(prefixes) = &self.reject_prefixes {
            policy.reject_prefixes = prefixes
                .iter()
                .map(|p| p.trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect();
        }

        let min = self.min_title_len.unwrap_or(policy.min_title_len);
        let max = self.max_title_len.unwrap_or(policy.max_title_len);
        if min > max {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidRange {
                    field: "extraction.min_title_len".to_string(),
                },
                format!(
                    "extraction.min_title_len ({}) exceeds max_title_len ({}), using defaults",
                    min, max
                ),
            ));
        } else {
            policy.min_title_len = min;
            policy.max_title_len = max;
        }

        (policy, issues)
    }
}
