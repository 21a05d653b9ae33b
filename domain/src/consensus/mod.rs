//! Cross-source consensus
//!
//! # Data flow
//!
//! ```text
//! SourceRankingResult (source A) ─┐
//! SourceRankingResult (source B) ─┼─▶ ConsensusAggregator ─▶ ConsensusReport
//! SourceRankingResult (source C) ─┘        │                   ├─ records (by average rank)
//!                                     EntityMatcher            ├─ common_items
//!                                                              ├─ unique_items
//!                                                              └─ summaries
//! ```

pub mod aggregator;
pub mod record;

pub use aggregator::ConsensusAggregator;
pub use record::{
    CommonItem, ConsensusRecord, ConsensusReport, RankOccurrence, SourceSummary, SourceUniqueItems,
};
