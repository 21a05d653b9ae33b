//! Execution parameters: fan-out control.
//!
//! [`ExecutionParams`] groups the parameters that control how the
//! [`RunRankingUseCase`](crate::use_cases::run_ranking::RunRankingUseCase)
//! dispatches queries. These are application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How sources are dispatched
///
/// Both modes produce identical results for identical gateway responses;
/// only latency differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// One task per requested source, all in flight at once
    #[default]
    Parallel,
    /// One source at a time, in request order
    Sequential,
}

impl ExecutionMode {
    pub fn from_parallel(parallel: bool) -> Self {
        if parallel {
            ExecutionMode::Parallel
        } else {
            ExecutionMode::Sequential
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ExecutionMode::Parallel => "parallel",
            ExecutionMode::Sequential => "sequential",
        }
    }
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fan-out control parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionParams {
    pub mode: ExecutionMode,
    /// Ask sources to use live web augmentation where supported
    pub web_search: bool,
    /// Output token budget per query
    pub max_tokens: u32,
    /// Upper bound on each gateway call
    pub timeout: Duration,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Parallel,
            web_search: true,
            max_tokens: 800,
            timeout: Duration::from_secs(120),
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_web_search(mut self, web_search: bool) -> Self {
        self.web_search = web_search;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
