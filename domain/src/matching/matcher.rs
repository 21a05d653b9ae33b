//! Same-entity decisions between titles from different sources.
//!
//! Matching is a heuristic. Titles sharing generic tokens can over-merge and
//! aliases with no token overlap will not merge at all, so the policy sits
//! behind the [`EntityMatcher`] trait and can be swapped per run.

use super::normalizer::EntityNormalizer;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Decides whether two titles name the same real-world entity.
///
/// Implementations must be deterministic and symmetric.
pub trait EntityMatcher: Send + Sync {
    fn matches(&self, a: &str, b: &str) -> bool;

    /// Normalizer used to build comparison keys
    fn normalizer(&self) -> &EntityNormalizer;
}

/// Default matcher: substring containment or enough shared tokens.
///
/// Both rules are evaluated on normalized forms. Two titles that normalize to
/// the empty string never match.
#[derive(Debug, Clone)]
pub struct LexicalMatcher {
    normalizer: EntityNormalizer,
    min_shared_tokens: usize,
}

impl LexicalMatcher {
    pub fn new(normalizer: EntityNormalizer) -> Self {
        Self {
            normalizer,
            min_shared_tokens: 2,
        }
    }

    pub fn with_min_shared_tokens(mut self, min_shared_tokens: usize) -> Self {
        self.min_shared_tokens = min_shared_tokens.max(1);
        self
    }

    /// Apply both rules to already-normalized keys.
    pub fn keys_match(&self, a: &str, b: &str) -> bool {
        if a.is_empty() || b.is_empty() {
            return false;
        }

        if a.contains(b) || b.contains(a) {
            return true;
        }

        let a_tokens: HashSet<&str> = a.split_whitespace().collect();
        let b_tokens: HashSet<&str> = b.split_whitespace().collect();
        a_tokens.intersection(&b_tokens).count() >= self.min_shared_tokens
    }
}

impl Default for LexicalMatcher {
    fn default() -> Self {
        Self::new(EntityNormalizer::default())
    }
}

impl EntityMatcher for LexicalMatcher {
    fn matches(&self, a: &str, b: &str) -> bool {
        self.keys_match(&self.normalizer.normalize(a), &self.normalizer.normalize(b))
    }

    fn normalizer(&self) -> &EntityNormalizer {
        &self.normalizer
    }
}

/// Stricter matcher: normalized keys must be identical.
#[derive(Debug, Clone, Default)]
pub struct NormalizedEqualityMatcher {
    normalizer: EntityNormalizer,
}

impl NormalizedEqualityMatcher {
    pub fn new(normalizer: EntityNormalizer) -> Self {
        Self { normalizer }
    }
}

impl EntityMatcher for NormalizedEqualityMatcher {
    fn matches(&self, a: &str, b: &str) -> bool {
        let a = self.normalizer.normalize(a);
        !a.is_empty() && a == self.normalizer.normalize(b)
    }

    fn normalizer(&self) -> &EntityNormalizer {
        &self.normalizer
    }
}

/// Which [`EntityMatcher`] a run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// [`LexicalMatcher`]
    #[default]
    Lexical,
    /// [`NormalizedEqualityMatcher`]
    Exact,
}

impl MatchStrategy {
    pub fn as_str(&self) -> &str {
        match self {
            MatchStrategy::Lexical => "lexical",
            MatchStrategy::Exact => "exact",
        }
    }

    /// Build the matcher for this strategy.
    pub fn build(
        &self,
        normalizer: EntityNormalizer,
        min_shared_tokens: usize,
    ) -> Box<dyn EntityMatcher> {
        match self {
            MatchStrategy::Lexical => Box::new(
                LexicalMatcher::new(normalizer).with_min_shared_tokens(min_shared_tokens),
            ),
            MatchStrategy::Exact => Box::new(NormalizedEqualityMatcher::new(normalizer)),
        }
    }
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MatchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lexical" => Ok(MatchStrategy::Lexical),
            "exact" => Ok(MatchStrategy::Exact),
            other => Err(format!("unknown match strategy '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAIRS: &[(&str, &str)] = &[
        ("Coffee Gator", "Coffee Gator Canister"),
        ("Airscape Coffee Canister", "Airscape"),
        ("Fellow Atmos Vacuum Canister", "Fellow Atmos"),
        ("OXO Good Grips POP", "OXO POP Container"),
        ("Planetary Design Airscape", "Airscape Kilo"),
        ("Coffee Canister", "Storage Jar"),
        ("Veken Coffee Canister", "Miir Coffee Canister"),
        ("", "Fellow Atmos"),
    ];

    #[test]
    fn test_substring_rule() {
        let m = LexicalMatcher::default();
        assert!(m.matches("Coffee Gator", "Coffee Gator Canister"));
        assert!(m.matches("Airscape Coffee Canister", "Airscape"));
        assert!(m.matches("Fellow Atmos", "Fellow Atmos Vacuum Canister"));
    }

    #[test]
    fn test_shared_tokens_rule() {
        let m = LexicalMatcher::default();
        assert!(m.matches("OXO Good Grips POP", "OXO POP Container"));
        assert!(!m.matches("Veken Coffee Canister", "Miir Coffee Canister"));
    }

    #[test]
    fn test_stop_word_only_titles_do_not_match() {
        let m = LexicalMatcher::default();
        assert!(!m.matches("Coffee Canister", "Storage Jar"));
        assert!(!m.matches("Coffee Canister", "Fellow Atmos"));
    }

    #[test]
    fn test_min_shared_tokens_configurable() {
        let m = LexicalMatcher::default().with_min_shared_tokens(3);
        assert!(!m.matches("OXO Good Grips POP", "OXO POP Container"));
        let m = LexicalMatcher::default().with_min_shared_tokens(1);
        assert!(m.matches("Planetary Design Airscape", "Airscape Kilo"));
    }

    #[test]
    fn test_lexical_is_symmetric() {
        let m = LexicalMatcher::default();
        for (a, b) in PAIRS {
            assert_eq!(m.matches(a, b), m.matches(b, a), "asymmetric for {a:?} / {b:?}");
        }
    }

    #[test]
    fn test_exact_matcher() {
        let m = NormalizedEqualityMatcher::default();
        assert!(m.matches("Coffee Gator", "Coffee Gator Canister"));
        assert!(!m.matches("Airscape Kilo", "Airscape"));
        assert!(!m.matches("Coffee Jar", "Storage Vault"));
        for (a, b) in PAIRS {
            assert_eq!(m.matches(a, b), m.matches(b, a));
        }
    }

    #[test]
    fn test_strategy_parse_and_build() {
        assert_eq!("Exact".parse::<MatchStrategy>(), Ok(MatchStrategy::Exact));
        assert!("fuzzy".parse::<MatchStrategy>().is_err());
        let matcher = MatchStrategy::Lexical.build(EntityNormalizer::default(), 2);
        assert!(matcher.matches("Coffee Gator", "Coffee Gator Canister"));
    }
}
