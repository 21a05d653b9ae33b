//! Cross-source consensus computation.
//!
//! Sources are folded one at a time in the order the caller supplies. Each
//! entity is compared against every table entry registered so far; the first
//! entry the matcher accepts absorbs the occurrence, otherwise the entity
//! opens a new entry keyed by its own lower-cased title. This is quadratic in
//! the number of distinct entities, which stays small (≤10 per source, a
//! handful of sources).

use super::record::{
    CommonItem, ConsensusRecord, ConsensusReport, RankOccurrence, SourceSummary, SourceUniqueItems,
};
use crate::matching::{EntityMatcher, LexicalMatcher};
use crate::ranking::SourceRankingResult;
use tracing::debug;

/// Merges per-source ranked lists into a [`ConsensusReport`]
pub struct ConsensusAggregator {
    matcher: Box<dyn EntityMatcher>,
}

impl ConsensusAggregator {
    pub fn new(matcher: Box<dyn EntityMatcher>) -> Self {
        Self { matcher }
    }

    pub fn matcher(&self) -> &dyn EntityMatcher {
        self.matcher.as_ref()
    }

    /// Aggregate `results` folded in slice order. Failed sources only show up
    /// in the summaries.
    pub fn aggregate(&self, results: &[SourceRankingResult]) -> ConsensusReport {
        let mut table: Vec<ConsensusRecord> = Vec::new();

        for result in results.iter().filter(|r| r.is_success()) {
            for entity in result.entities() {
                let key = entity.title().trim().to_lowercase();
                let occurrence = RankOccurrence {
                    source: result.source().clone(),
                    rank: entity.rank(),
                };

                match table
                    .iter_mut()
                    .find(|record| record.key == key || self.matcher.matches(&key, &record.key))
                {
                    Some(record) => {
                        debug!(title = entity.title(), merged_into = %record.title, "Matched entity");
                        record.occurrences.push(occurrence);
                    }
                    None => {
                        let first_seen = table.len();
                        table.push(ConsensusRecord {
                            title: entity.title().to_string(),
                            normalized_key: self.matcher.normalizer().normalize(&key),
                            key,
                            occurrences: vec![occurrence],
                            average_rank: 0.0,
                            first_seen,
                        });
                    }
                }
            }
        }

        for record in &mut table {
            record.average_rank = average(&record.individual_ranks());
        }

        let common_items = common_items(&table, results.len());
        let unique_items = unique_items(&table, results);

        // Stable sort keeps first-seen order among equal averages.
        table.sort_by(|a, b| a.average_rank.total_cmp(&b.average_rank));

        ConsensusReport {
            summaries: results.iter().map(summarize).collect(),
            records: table,
            common_items,
            unique_items,
            total_cost: results
                .iter()
                .filter(|r| r.is_success())
                .map(|r| r.response.usage.cost)
                .sum(),
        }
    }
}

impl Default for ConsensusAggregator {
    fn default() -> Self {
        Self::new(Box::new(LexicalMatcher::default()))
    }
}

/// Arithmetic mean rounded to two decimals.
fn average(ranks: &[usize]) -> f64 {
    if ranks.is_empty() {
        return 0.0;
    }
    let mean = ranks.iter().sum::<usize>() as f64 / ranks.len() as f64;
    (mean * 100.0).round() / 100.0
}

fn common_items(table: &[ConsensusRecord], total_sources: usize) -> Vec<CommonItem> {
    table
        .iter()
        .filter_map(|record| {
            let sources = record.sources();
            if sources.len() < 2 {
                return None;
            }
            let count = sources.len();
            Some(CommonItem {
                title: record.title.clone(),
                sources,
                count,
                agreement_score: count as f64 / total_sources.max(1) as f64,
            })
        })
        .collect()
}

fn unique_items(
    table: &[ConsensusRecord],
    results: &[SourceRankingResult],
) -> Vec<SourceUniqueItems> {
    let mut partitions: Vec<SourceUniqueItems> = Vec::new();

    for result in results.iter().filter(|r| r.is_success()) {
        let titles: Vec<String> = table
            .iter()
            .filter(|record| {
                let sources = record.sources();
                sources.len() == 1 && &sources[0] == result.source()
            })
            .map(|record| record.title.clone())
            .collect();

        let already_listed = partitions.iter().any(|p| &p.source == result.source());
        if !titles.is_empty() && !already_listed {
            partitions.push(SourceUniqueItems {
                source: result.source().clone(),
                titles,
            });
        }
    }

    partitions
}

fn summarize(result: &SourceRankingResult) -> SourceSummary {
    SourceSummary {
        source: result.source().clone(),
        model: result.response.model.clone(),
        items_found: result.entities().len(),
        cost: result.response.usage.cost,
        web_search_used: result.response.usage.web_search_used,
        error: result.error().map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::source::SourceId;
    use crate::matching::{EntityNormalizer, NormalizedEqualityMatcher};
    use crate::ranking::{RawSourceResponse, TextRankingExtractor, UsageMetadata};

    fn result(source: &str, text: &str, cost: f64) -> SourceRankingResult {
        let usage = UsageMetadata {
            cost,
            ..Default::default()
        };
        SourceRankingResult::from_response(
            RawSourceResponse::success(SourceId::from(source), "model", text, usage),
            &TextRankingExtractor::default(),
        )
    }

    fn failed(source: &str) -> SourceRankingResult {
        SourceRankingResult::failure(SourceId::from(source), "model", "HTTP 500")
    }

    fn two_sources() -> Vec<SourceRankingResult> {
        // Two-item lists are kept by the extractor (fallback finds nothing better).
        vec![
            result("a", "1. Airscape Coffee Canister\n2. Coffee Gator", 0.01),
            result("b", "1. Coffee Gator Canister\n2. Airscape", 0.02),
        ]
    }

    #[test]
    fn test_merges_lexical_matches() {
        let report = ConsensusAggregator::default().aggregate(&two_sources());
        assert_eq!(report.records.len(), 2);

        let gator = report.find("Coffee Gator").unwrap();
        assert_eq!(gator.individual_ranks(), vec![2, 1]);
        assert_eq!(gator.average_rank, 1.5);

        let airscape = report.find("Airscape Coffee Canister").unwrap();
        assert_eq!(airscape.individual_ranks(), vec![1, 2]);
        assert_eq!(airscape.average_rank, 1.5);
        assert_eq!(airscape.normalized_key, "airscape");

        assert_eq!(report.common_items.len(), 2);
        for item in &report.common_items {
            assert_eq!(item.count, 2);
            assert_eq!(item.sources, vec![SourceId::from("a"), SourceId::from("b")]);
            assert_eq!(item.agreement_score, 1.0);
        }
        assert!(report.unique_items.is_empty());
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let report = ConsensusAggregator::default().aggregate(&two_sources());
        let titles: Vec<&str> = report.records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Airscape Coffee Canister", "Coffee Gator"]);
    }

    #[test]
    fn test_sorted_by_average_rank() {
        let results = vec![
            result("a", "1. Fellow Atmos\n2. OXO POP\n3. Airscape Kilo", 0.0),
            result("b", "1. OXO POP\n2. Fellow Atmos\n3. Veken", 0.0),
            result("c", "1. OXO POP\n2. Miir\n3. Fellow Atmos", 0.0),
        ];
        let report = ConsensusAggregator::default().aggregate(&results);
        let titles: Vec<&str> = report.records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles[0], "OXO POP");
        assert_eq!(report.records[0].average_rank, 1.33);
        assert_eq!(titles[1], "Fellow Atmos");
        assert_eq!(report.records[1].average_rank, 2.0);

        let first_seen: Vec<&str> = report
            .records_in_first_seen_order()
            .iter()
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(
            first_seen,
            vec!["Fellow Atmos", "OXO POP", "Airscape Kilo", "Veken", "Miir"]
        );

        assert_eq!(report.unique_for(&SourceId::from("a")), &["Airscape Kilo".to_string()]);
        assert_eq!(report.unique_for(&SourceId::from("b")), &["Veken".to_string()]);
        assert_eq!(report.unique_for(&SourceId::from("c")), &["Miir".to_string()]);
    }

    #[test]
    fn test_failed_source_excluded() {
        let mut results = two_sources();
        let baseline = ConsensusAggregator::default().aggregate(&results);

        results.insert(1, failed("broken"));
        let report = ConsensusAggregator::default().aggregate(&results);

        assert_eq!(report.records, baseline.records);
        assert!(report.unique_for(&SourceId::from("broken")).is_empty());
        assert!(report
            .common_items
            .iter()
            .all(|c| !c.sources.contains(&SourceId::from("broken"))));
        assert_eq!(report.summaries.len(), 3);
        assert_eq!(report.summaries[1].error.as_deref(), Some("HTTP 500"));
        assert!((report.total_cost - 0.03).abs() < 1e-9);
    }

    #[test]
    fn test_empty_source_contributes_nothing() {
        let mut results = two_sources();
        let baseline = ConsensusAggregator::default().aggregate(&results);
        results.push(result("silent", "No list today.", 0.0));
        let report = ConsensusAggregator::default().aggregate(&results);
        assert_eq!(report.records, baseline.records);
        assert_eq!(report.summaries[2].items_found, 0);
    }

    #[test]
    fn test_pluggable_matcher() {
        let aggregator = ConsensusAggregator::new(Box::new(NormalizedEqualityMatcher::new(
            EntityNormalizer::default(),
        )));
        let report = aggregator.aggregate(&two_sources());
        // "airscape" == "airscape" and "gator" == "gator" under exact matching too.
        assert_eq!(report.records.len(), 2);

        let results = vec![
            result("a", "1. Fellow Atmos\n2. OXO POP", 0.0),
            result("b", "1. Fellow Atmos Vacuum\n2. OXO POP", 0.0),
        ];
        let report = aggregator.aggregate(&results);
        assert_eq!(report.records.len(), 3);
        let report = ConsensusAggregator::default().aggregate(&results);
        assert_eq!(report.records.len(), 2);
    }

    #[test]
    fn test_no_results() {
        let report = ConsensusAggregator::default().aggregate(&[]);
        assert_eq!(report, ConsensusReport::default());
    }
}
