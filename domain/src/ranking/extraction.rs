//! Ranked list extraction from free-form response text.
//!
//! Sources are asked for a numbered `1. Name - URL` list, but answers rarely
//! follow the format exactly. Extraction runs in two passes:
//!
//! | Pass | Trigger | Recognizes |
//! |------|---------|------------|
//! | Strict | always | `<n>.` / `<n>)` numbered lines |
//! | Fallback | strict pass found fewer than `fallback_threshold` names | `**bold**` text on any line |
//!
//! Both passes share the same acceptance predicate
//! ([`ExtractionPolicy::accepts`]), and their output is always deduplicated and
//! renumbered `1..=K` by [`dedup_and_renumber`].
//!
//! Extraction never fails: text with no recognizable line yields an empty list.

use super::entity::RankedEntity;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::debug;

static NUMBERED_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)[.)]\s*(.+)").expect("numbered line pattern"));

static MARKDOWN_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]+)\]\((https?://[^\s)]+)\)").expect("markdown link pattern")
});

static EMPHASIS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*+").expect("emphasis pattern"));

static BRACKETS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\[\]]").expect("bracket pattern"));

static TRAILING_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)\s*-\s*(https?://\S+)$").expect("trailing url pattern")
});

static URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://\S+").expect("url pattern"));

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("bold pattern"));

/// Phrases that open a description or feature bullet rather than a name
pub const DEFAULT_REJECT_PREFIXES: &[&str] = &[
    "features",
    "includes",
    "made from",
    "equipped with",
    "available in",
    "comes with",
    "designed",
    "key features",
];

/// Tunable rules deciding which candidate titles count as entity names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionPolicy {
    /// Lower-case prefixes that mark a line as descriptive text
    pub reject_prefixes: Vec<String>,
    /// Minimum title length in characters (inclusive)
    pub min_title_len: usize,
    /// Maximum title length in characters (inclusive)
    pub max_title_len: usize,
    /// The fallback pass runs when the strict pass finds fewer names than this
    pub fallback_threshold: usize,
}

impl Default for ExtractionPolicy {
    fn default() -> Self {
        Self {
            reject_prefixes: DEFAULT_REJECT_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            min_title_len: 3,
            max_title_len: 100,
            fallback_threshold: 3,
        }
    }
}

impl ExtractionPolicy {
    /// Returns `true` if `title` looks like an entity name.
    pub fn accepts(&self, title: &str) -> bool {
        let title = title.trim();
        let len = title.chars().count();
        if title.is_empty() || len < self.min_title_len || len > self.max_title_len {
            return false;
        }

        let lower = title.to_lowercase();
        !self
            .reject_prefixes
            .iter()
            .any(|prefix| lower.starts_with(&prefix.to_lowercase()))
    }
}

/// Parses response text into a ranked entity list
#[derive(Debug, Clone, Default)]
pub struct TextRankingExtractor {
    policy: ExtractionPolicy,
}

impl TextRankingExtractor {
    pub fn new(policy: ExtractionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ExtractionPolicy {
        &self.policy
    }

    /// Extract a deduplicated list ranked `1..=K` from `text`.
    pub fn extract(&self, text: &str) -> Vec<RankedEntity> {
        let strict = self.strict_pass(text);

        let entities = if strict.len() < self.policy.fallback_threshold {
            let fallback = self.fallback_pass(text);
            debug!(
                strict = strict.len(),
                fallback = fallback.len(),
                "Strict extraction under threshold, ran fallback"
            );
            // A short but well-formed numbered list is kept unless the
            // fallback recovers strictly more names.
            if fallback.len() > strict.len() {
                fallback
            } else {
                strict
            }
        } else {
            strict
        };

        dedup_and_renumber(entities)
    }

    /// Numbered-list pass. Ranks are the numbers written in the text.
    fn strict_pass(&self, text: &str) -> Vec<RankedEntity> {
        let mut entities = Vec::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let Some(caps) = NUMBERED_LINE.captures(line) else {
                continue;
            };
            let rank = caps[1].parse().unwrap_or_default();
            let body = clean_markup(caps[2].trim());

            let (title, source_url) = split_title_and_url(&body);
            if !self.policy.accepts(&title) {
                continue;
            }

            let mut entity = RankedEntity::new(rank, title);
            if let Some(url) = source_url {
                entity = entity.with_source_url(url);
            }
            entities.push(entity);
        }

        entities
    }

    /// Bold-text pass, numbered by order of appearance.
    fn fallback_pass(&self, text: &str) -> Vec<RankedEntity> {
        let mut entities = Vec::new();

        for line in text.lines() {
            let line = line.trim();
            let Some(caps) = BOLD.captures(line) else {
                continue;
            };
            let title = caps[1].trim();
            if !self.policy.accepts(title) {
                continue;
            }

            let mut entity = RankedEntity::new(entities.len() + 1, title);
            if let Some(url) = URL.find(line) {
                entity = entity.with_source_url(url.as_str());
            }
            entities.push(entity);
        }

        entities
    }
}

/// Drop repeated titles (case-insensitive, trimmed; first occurrence wins)
/// and renumber the survivors `1..=K`.
pub fn dedup_and_renumber(entities: Vec<RankedEntity>) -> Vec<RankedEntity> {
    let mut seen = HashSet::new();
    entities
        .iter()
        .filter(|entity| seen.insert(entity.title().trim().to_lowercase()))
        .enumerate()
        .map(|(i, entity)| entity.with_rank(i + 1))
        .collect()
}

/// Rewrite markdown links as `text - url`, then drop emphasis and brackets.
fn clean_markup(body: &str) -> String {
    let body = MARKDOWN_LINK.replace_all(body, "$1 - $2");
    let body = EMPHASIS.replace_all(&body, "");
    let body = BRACKETS.replace_all(&body, "");
    body.trim().to_string()
}

/// Split `Title - https://...` into its parts; otherwise pull out any bare URL.
fn split_title_and_url(body: &str) -> (String, Option<String>) {
    if let Some(caps) = TRAILING_URL.captures(body) {
        return (caps[1].trim().to_string(), Some(caps[2].trim().to_string()));
    }

    if let Some(url) = URL.find(body) {
        let title = URL.replace_all(body, " ");
        let title = title.split_whitespace().collect::<Vec<_>>().join(" ");
        return (title, Some(url.as_str().to_string()));
    }

    (body.to_string(), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Vec<RankedEntity> {
        TextRankingExtractor::default().extract(text)
    }

    fn titles(entities: &[RankedEntity]) -> Vec<&str> {
        entities.iter().map(|e| e.title()).collect()
    }

    fn assert_dense(entities: &[RankedEntity]) {
        for (i, entity) in entities.iter().enumerate() {
            assert_eq!(entity.rank(), i + 1);
        }
    }

    #[test]
    fn test_strict_title_and_url() {
        let entities = extract(
            "1. Fellow Atmos Vacuum Canister - https://fellowproducts.com/atmos\n2. Coffee Gator Container",
        );
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].rank(), 1);
        assert_eq!(entities[0].title(), "Fellow Atmos Vacuum Canister");
        assert_eq!(
            entities[0].source_url(),
            Some("https://fellowproducts.com/atmos")
        );
        assert_eq!(entities[1].rank(), 2);
        assert_eq!(entities[1].title(), "Coffee Gator Container");
        assert_eq!(entities[1].source_url(), None);
    }

    #[test]
    fn test_description_line_rejected() {
        let entities = extract(
            "1. Fellow Atmos\n2. Key features include durability and style\n3. OXO POP\n4. Airscape",
        );
        assert_eq!(titles(&entities), vec!["Fellow Atmos", "OXO POP", "Airscape"]);
        assert_dense(&entities);
    }

    #[test]
    fn test_reject_prefixes_case_insensitive() {
        let policy = ExtractionPolicy::default();
        assert!(!policy.accepts("Made from stainless steel"));
        assert!(!policy.accepts("DESIGNED for freshness"));
        assert!(!policy.accepts("comes with a scoop"));
        assert!(policy.accepts("Airscape Kilo"));
    }

    #[test]
    fn test_title_length_bounds() {
        let policy = ExtractionPolicy::default();
        assert!(!policy.accepts(""));
        assert!(!policy.accepts("ab"));
        assert!(policy.accepts("abc"));
        assert!(policy.accepts(&"x".repeat(100)));
        assert!(!policy.accepts(&"x".repeat(101)));
    }

    #[test]
    fn test_parenthesis_numbering_and_markup() {
        let entities =
            extract("1) **Fellow Atmos**\n2) [OXO POP] Container\n3) *Airscape* Kilo");
        assert_eq!(
            titles(&entities),
            vec!["Fellow Atmos", "OXO POP Container", "Airscape Kilo"]
        );
    }

    #[test]
    fn test_markdown_link_becomes_url() {
        let entities = extract(
            "1. [Fellow Atmos](https://fellow.com/atmos)\n2. OXO POP\n3. Airscape",
        );
        assert_eq!(entities[0].title(), "Fellow Atmos");
        assert_eq!(entities[0].source_url(), Some("https://fellow.com/atmos"));
    }

    #[test]
    fn test_standalone_url_stripped_from_title() {
        let entities = extract(
            "1. Fellow Atmos https://fellow.com/atmos vacuum\n2. OXO POP\n3. Airscape",
        );
        assert_eq!(entities[0].title(), "Fellow Atmos vacuum");
        assert_eq!(entities[0].source_url(), Some("https://fellow.com/atmos"));
    }

    #[test]
    fn test_fallback_recovers_bold_titles() {
        let entities = extract("Here are picks:\n**Fellow Atmos**\n**Coffee Gator**\n**OXO POP**");
        assert_eq!(
            titles(&entities),
            vec!["Fellow Atmos", "Coffee Gator", "OXO POP"]
        );
        assert_dense(&entities);
    }

    #[test]
    fn test_fallback_picks_up_url_on_line() {
        let entities = extract(
            "Top picks:\n- **Fellow Atmos** see https://fellow.com\n- **Coffee Gator**\n- **OXO POP**",
        );
        assert_eq!(entities[0].source_url(), Some("https://fellow.com"));
        assert_eq!(entities[1].source_url(), None);
    }

    #[test]
    fn test_fallback_not_used_when_strict_is_enough() {
        let entities = extract("1. Fellow Atmos\n2. OXO POP\n3. Airscape\n**Bold Mention**");
        assert_eq!(titles(&entities), vec!["Fellow Atmos", "OXO POP", "Airscape"]);
    }

    #[test]
    fn test_duplicates_removed_and_renumbered() {
        let entities = extract("3. Fellow Atmos\n5. fellow atmos \n7. OXO POP\n9. Airscape");
        assert_eq!(titles(&entities), vec!["Fellow Atmos", "OXO POP", "Airscape"]);
        assert_dense(&entities);
    }

    #[test]
    fn test_no_matches_is_empty() {
        assert!(extract("").is_empty());
        assert!(extract("I cannot help with that request.").is_empty());
    }

    #[test]
    fn test_dedup_and_renumber_idempotent() {
        let once = extract("2. Fellow Atmos\n4. OXO POP\n4. OXO POP\n8. Airscape");
        let twice = dedup_and_renumber(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_custom_policy() {
        let policy = ExtractionPolicy {
            reject_prefixes: vec!["sponsored".to_string()],
            ..Default::default()
        };
        let extractor = TextRankingExtractor::new(policy);
        let entities = extractor.extract("1. Sponsored pick\n2. Features galore\n3. OXO POP");
        assert_eq!(titles(&entities), vec!["Features galore", "OXO POP"]);
    }
}
