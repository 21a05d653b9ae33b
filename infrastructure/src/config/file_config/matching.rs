//! Entity matching settings from TOML (`[matching]` section)

use serde::{Deserialize, Serialize};
use tracker_domain::{
    ConfigIssue, ConfigIssueCode, ConsensusAggregator, EntityNormalizer, MatchStrategy,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileMatchingConfig {
    /// Words stripped before comparing titles; unset keeps the built-in list
    pub stop_words: Option<Vec<String>>,
    /// "lexical" or "exact"
    pub strategy: String,
    /// Shared tokens needed for a lexical match
    pub min_shared_tokens: usize,
}

impl Default for FileMatchingConfig {
    fn default() -> Self {
        Self {
            stop_words: None,
            strategy: MatchStrategy::default().to_string(),
            min_shared_tokens: 2,
        }
    }
}

impl FileMatchingConfig {
    pub fn parse_strategy(&self) -> (MatchStrategy, Vec<ConfigIssue>) {
        match self.strategy.parse::<MatchStrategy>() {
            Ok(strategy) => (strategy, Vec::new()),
            Err(_) => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "matching.strategy".to_string(),
                        value: self.strategy.clone(),
                        valid_values: vec!["lexical".to_string(), "exact".to_string()],
                    },
                    format!(
                        "matching.strategy: unknown value '{}', falling back to 'lexical'",
                        self.strategy
                    ),
                );
                (MatchStrategy::default(), vec![issue])
            }
        }
    }

    pub fn normalizer(&self) -> EntityNormalizer {
        match &self.stop_words {
            Some(words) => EntityNormalizer::new(words.iter().map(String::as_str)),
            None => EntityNormalizer::default(),
        }
    }

    /// Build the aggregator configured by this section.
    pub fn to_aggregator(&self) -> (ConsensusAggregator, Vec<ConfigIssue>) {
        let (strategy, mut issues) = self.parse_strategy();

        let min_shared = if self.min_shared_tokens == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroValue {
                    field: "matching.min_shared_tokens".to_string(),
                },
                "matching.min_shared_tokens cannot be 0, using 1",
            ));
            1
        } else {
            self.min_shared_tokens
        };

        let matcher = strategy.build(self.normalizer(), min_shared);
        (ConsensusAggregator::new(matcher), issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_lexical() {
        let config = FileMatchingConfig::default();
        let (strategy, issues) = config.parse_strategy();
        assert_eq!(strategy, MatchStrategy::Lexical);
        assert!(issues.is_empty());

        let (aggregator, _) = config.to_aggregator();
        assert!(aggregator.matcher().matches("Fellow Atmos", "Fellow Atmos Vacuum Canister"));
    }

    #[test]
    fn test_exact_strategy_and_custom_stop_words() {
        let toml_str = r#"
[matching]
strategy = "Exact"
stop_words = ["kettle"]
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        let (aggregator, issues) = config.matching.to_aggregator();
        assert!(issues.is_empty());
        assert!(aggregator.matcher().matches("Stagg Kettle", "stagg"));
        assert!(!aggregator.matcher().matches("Stagg EKG Kettle", "Stagg"));
    }

    #[test]
    fn test_unknown_strategy_warns() {
        let config = FileMatchingConfig {
            strategy: "fuzzy".to_string(),
            ..Default::default()
        };
        let (strategy, issues) = config.parse_strategy();
        assert_eq!(strategy, MatchStrategy::Lexical);
        assert!(matches!(
            issues[0].code,
            ConfigIssueCode::InvalidEnumValue { .. }
        ));
    }
}
