//! Consensus value objects - the merged cross-source views.

use crate::core::source::SourceId;
use serde::{Deserialize, Serialize};

/// One rank a source assigned to an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankOccurrence {
    pub source: SourceId,
    pub rank: usize,
}

/// One entity merged across every source that reported it (or a match of it)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusRecord {
    /// First-seen title, original casing
    pub title: String,
    /// Lower-cased, trimmed first-seen title the table entry is keyed by
    pub key: String,
    /// Comparison key produced by the normalizer
    pub normalized_key: String,
    /// Ranks in fold order
    pub occurrences: Vec<RankOccurrence>,
    /// Mean of the individual ranks, rounded to two decimals
    pub average_rank: f64,
    /// Position at which the entity was first observed
    pub first_seen: usize,
}

impl ConsensusRecord {
    /// Individual ranks in fold order
    pub fn individual_ranks(&self) -> Vec<usize> {
        self.occurrences.iter().map(|o| o.rank).collect()
    }

    /// Distinct reporting sources in fold order
    pub fn sources(&self) -> Vec<SourceId> {
        let mut sources: Vec<SourceId> = Vec::new();
        for occurrence in &self.occurrences {
            if !sources.contains(&occurrence.source) {
                sources.push(occurrence.source.clone());
            }
        }
        sources
    }

    /// Number of ranks recorded
    pub fn appearances(&self) -> usize {
        self.occurrences.len()
    }
}

/// Entity reported by more than one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonItem {
    pub title: String,
    pub sources: Vec<SourceId>,
    pub count: usize,
    /// `count` divided by the number of sources in the run
    pub agreement_score: f64,
}

/// Entities only one source reported
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceUniqueItems {
    pub source: SourceId,
    pub titles: Vec<String>,
}

/// Per-source outcome line of a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSummary {
    pub source: SourceId,
    pub model: String,
    pub items_found: usize,
    pub cost: f64,
    pub web_search_used: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Everything the aggregator derives from one run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConsensusReport {
    /// One line per source, in fold order (failed sources included)
    pub summaries: Vec<SourceSummary>,
    /// Records sorted by ascending average rank, ties by first-seen order
    pub records: Vec<ConsensusRecord>,
    pub common_items: Vec<CommonItem>,
    pub unique_items: Vec<SourceUniqueItems>,
    /// Sum of costs over successful sources
    pub total_cost: f64,
}

impl ConsensusReport {
    /// Records in the order entities were first observed
    pub fn records_in_first_seen_order(&self) -> Vec<&ConsensusRecord> {
        let mut records: Vec<&ConsensusRecord> = self.records.iter().collect();
        records.sort_by_key(|r| r.first_seen);
        records
    }

    pub fn find(&self, title: &str) -> Option<&ConsensusRecord> {
        let key = title.trim().to_lowercase();
        self.records.iter().find(|r| r.key == key)
    }

    pub fn unique_for(&self, source: &SourceId) -> &[String] {
        self.unique_items
            .iter()
            .find(|u| &u.source == source)
            .map(|u| u.titles.as_slice())
            .unwrap_or(&[])
    }
}
