//! Domain layer for rank-tracker
//!
//! This crate contains the core ranking logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Extraction
//!
//! Each source answers the same "top 10" question in free-form text.
//! [`TextRankingExtractor`] recovers an ordered, deduplicated list of names.
//!
//! ## Matching
//!
//! Sources spell the same entity differently. [`EntityNormalizer`] builds
//! comparison keys and an [`EntityMatcher`] decides when two titles agree.
//!
//! ## Consensus
//!
//! [`ConsensusAggregator`] folds every source's list into per-entity records
//! with average ranks, plus common and per-source unique views.

pub mod config;
pub mod consensus;
pub mod core;
pub mod matching;
pub mod prompt;
pub mod ranking;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use consensus::{
    CommonItem, ConsensusAggregator, ConsensusRecord, ConsensusReport, RankOccurrence,
    SourceSummary, SourceUniqueItems,
};
pub use core::{error::DomainError, query::RankingQuery, source::SourceId};
pub use matching::{
    EntityMatcher, EntityNormalizer, LexicalMatcher, MatchStrategy, NormalizedEqualityMatcher,
};
pub use prompt::PromptTemplate;
pub use ranking::{
    ExtractionPolicy, RankedEntity, RawSourceResponse, SourceRankingResult, TextRankingExtractor,
    UsageMetadata, dedup_and_renumber,
};
