//! Ranking query value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// A keyword every source is asked to rank (Value Object)
///
/// The same keyword is sent to each source so their answers can be compared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingQuery {
    keyword: String,
}

impl RankingQuery {
    /// Create a new query, rejecting blank keywords.
    pub fn new(keyword: impl Into<String>) -> Result<Self, DomainError> {
        let keyword = keyword.into();
        let trimmed = keyword.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidQuery(
                "keyword cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            keyword: trimmed.to_string(),
        })
    }

    /// Get the keyword
    pub fn keyword(&self) -> &str {
        &self.keyword
    }
}

impl std::fmt::Display for RankingQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.keyword)
    }
}

impl std::str::FromStr for RankingQuery {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
