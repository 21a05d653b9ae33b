//! Comparison keys for entity titles

use serde::{Deserialize, Serialize};

/// Domain-generic nouns removed by [`EntityNormalizer::default`]
pub const DEFAULT_STOP_WORDS: &[&str] =
    &["coffee", "canister", "container", "jar", "vault", "storage"];

/// Maps an entity title to a canonical comparison key.
///
/// The key is lower-cased, has every occurrence of each stop word removed and
/// whitespace collapsed. Stop words are removed as substrings, so
/// `"jars"` loses its `"jar"` as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityNormalizer {
    stop_words: Vec<String>,
}

impl EntityNormalizer {
    pub fn new<I, S>(stop_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            stop_words: stop_words
                .into_iter()
                .map(|w| w.into().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    pub fn stop_words(&self) -> &[String] {
        &self.stop_words
    }

    pub fn normalize(&self, title: &str) -> String {
        let mut key = title.trim().to_lowercase();
        for word in &self.stop_words {
            key = key.replace(word.as_str(), "");
        }
        key.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

impl Default for EntityNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_STOP_WORDS.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_removes_stop_words() {
        let n = EntityNormalizer::default();
        assert_eq!(n.normalize("Fellow Atmos Vacuum Canister"), "fellow atmos vacuum");
        assert_eq!(n.normalize("  Coffee Gator  Container "), "gator");
        assert_eq!(n.normalize("Airscape Coffee Canister"), "airscape");
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let n = EntityNormalizer::default();
        let title = "OXO Good Grips POP Container";
        assert_eq!(n.normalize(title), n.normalize(title));
        assert_eq!(n.normalize(&n.normalize(title)), n.normalize(title));
    }

    #[test]
    fn test_substring_removal() {
        let n = EntityNormalizer::default();
        assert_eq!(n.normalize("Mason Jars"), "mason s");
    }

    #[test]
    fn test_custom_stop_words() {
        let n = EntityNormalizer::new(["Headphones", " ", "wireless"]);
        assert_eq!(n.stop_words(), &["headphones".to_string(), "wireless".to_string()]);
        assert_eq!(n.normalize("Sony Wireless Headphones WH-1000XM5"), "sony wh-1000xm5");
    }

    #[test]
    fn test_empty_stop_words_only_lowercases() {
        let n = EntityNormalizer::new(Vec::<String>::new());
        assert_eq!(n.normalize("  Coffee   Gator "), "coffee gator");
    }
}
