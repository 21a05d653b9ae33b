//! Per-source ranking data and text extraction.

pub mod entity;
pub mod extraction;

pub use entity::{RankedEntity, RawSourceResponse, SourceRankingResult, UsageMetadata};
pub use extraction::{
    DEFAULT_REJECT_PREFIXES, ExtractionPolicy, TextRankingExtractor, dedup_and_renumber,
};
