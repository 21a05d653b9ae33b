//! Query parameters from TOML (`[query]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracker_application::{ExecutionMode, ExecutionParams};
use tracker_domain::{ConfigIssue, ConfigIssueCode};

/// Raw query configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileQueryConfig {
    /// Ask sources to use live web search
    pub web_search: bool,
    /// Output token budget per query
    pub max_tokens: u32,
    /// Timeout for a single source call, in seconds
    pub timeout_seconds: u64,
    /// Query sources concurrently
    pub parallel: bool,
}

impl Default for FileQueryConfig {
    fn default() -> Self {
        let params = ExecutionParams::default();
        Self {
            web_search: params.web_search,
            max_tokens: params.max_tokens,
            timeout_seconds: params.timeout.as_secs(),
            parallel: params.mode == ExecutionMode::Parallel,
        }
    }
}

impl FileQueryConfig {
    /// Convert to execution parameters. Zero values fall back to the defaults.
    pub fn to_execution_params(&self) -> (ExecutionParams, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let mut params = ExecutionParams::default()
            .with_mode(ExecutionMode::from_parallel(self.parallel))
            .with_web_search(self.web_search);

        if self.max_tokens == 0 {
            issues.push(zero_issue("query.max_tokens", params.max_tokens as u64));
        } else {
            params = params.with_max_tokens(self.max_tokens);
        }

        if self.timeout_seconds == 0 {
            issues.push(zero_issue("query.timeout_seconds", params.timeout.as_secs()));
        } else {
            params = params.with_timeout(Duration::from_secs(self.timeout_seconds));
        }

        (params, issues)
    }
}

fn zero_issue(field: &str, fallback: u64) -> ConfigIssue {
    ConfigIssue::error(
        ConfigIssueCode::ZeroValue {
            field: field.to_string(),
        },
        format!("{} cannot be 0, using {}", field, fallback),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_execution_params() {
        let (params, issues) = FileQueryConfig::default().to_execution_params();
        assert!(issues.is_empty());
        assert_eq!(params, ExecutionParams::default());
    }

    #[test]
    fn test_overrides_apply() {
        let config = FileQueryConfig {
            web_search: false,
            max_tokens: 300,
            timeout_seconds: 30,
            parallel: false,
        };
        let (params, issues) = config.to_execution_params();
        assert!(issues.is_empty());
        assert_eq!(params.mode, ExecutionMode::Sequential);
        assert!(!params.web_search);
        assert_eq!(params.max_tokens, 300);
        assert_eq!(params.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_zero_values_reported() {
        let config = FileQueryConfig {
            max_tokens: 0,
            timeout_seconds: 0,
            ..Default::default()
        };
        let (params, issues) = config.to_execution_params();
        assert_eq!(issues.len(), 2);
        assert_eq!(params.max_tokens, 800);
        assert_eq!(params.timeout, Duration::from_secs(120));
        assert_eq!(issues[1].message, "query.timeout_seconds cannot be 0, using 120");
    }
}
