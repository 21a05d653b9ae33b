//! Ranking value objects - immutable per-source result types.
//!
//! - [`UsageMetadata`] - token and cost counters reported by a source
//! - [`RawSourceResponse`] - free-form answer (or failure) from one source
//! - [`RankedEntity`] - one named item recovered from a response
//! - [`SourceRankingResult`] - a source's response paired with its ranked list

use super::extraction::TextRankingExtractor;
use crate::core::source::SourceId;
use serde::{Deserialize, Serialize};

/// Usage counters attached to a source response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageMetadata {
    pub input_tokens: u64,
    pub output_tokens: u64,
    /// Monetary cost of the call as reported by the gateway
    pub cost: f64,
    /// Whether the source actually used live web augmentation
    pub web_search_used: bool,
}

/// Response text (or failure) from a single source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSourceResponse {
    /// The source that produced this response
    pub source: SourceId,
    /// Model that answered (empty if the call failed before a model was chosen)
    pub model: String,
    /// The free-form response body
    pub text: String,
    pub usage: UsageMetadata,
    /// Error message if the query failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RawSourceResponse {
    /// Creates a successful response.
    pub fn success(
        source: SourceId,
        model: impl Into<String>,
        text: impl Into<String>,
        usage: UsageMetadata,
    ) -> Self {
        Self {
            source,
            model: model.into(),
            text: text.into(),
            usage,
            error: None,
        }
    }

    /// Creates a failed response with empty text and zeroed counters.
    pub fn failure(source: SourceId, model: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            source,
            model: model.into(),
            text: String::new(),
            usage: UsageMetadata::default(),
            error: Some(error.into()),
        }
    }

    /// Returns `true` if the source answered.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// One item recovered from a response
///
/// Ranks are only meaningful after extraction has renumbered the list, at
/// which point they are dense and start at 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntity {
    rank: usize,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl RankedEntity {
    pub fn new(rank: usize, title: impl Into<String>) -> Self {
        Self {
            rank,
            title: title.into(),
            source_url: None,
            description: None,
        }
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns a copy of this entity carrying a different rank.
    pub fn with_rank(&self, rank: usize) -> Self {
        Self {
            rank,
            ..self.clone()
        }
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Ranked list produced for one source, with the response it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRankingResult {
    pub response: RawSourceResponse,
    entities: Vec<RankedEntity>,
}

impl SourceRankingResult {
    /// Runs extraction on a response. Failed responses carry no entities.
    pub fn from_response(response: RawSourceResponse, extractor: &TextRankingExtractor) -> Self {
        let entities = if response.is_success() {
            extractor.extract(&response.text)
        } else {
            Vec::new()
        };
        Self { response, entities }
    }

    /// Error-flagged result for a source that could not be queried.
    pub fn failure(source: SourceId, model: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            response: RawSourceResponse::failure(source, model, error),
            entities: Vec::new(),
        }
    }

    pub fn source(&self) -> &SourceId {
        &self.response.source
    }

    pub fn entities(&self) -> &[RankedEntity] {
        &self.entities
    }

    pub fn is_success(&self) -> bool {
        self.response.is_success()
    }

    pub fn error(&self) -> Option<&str> {
        self.response.error.as_deref()
    }
}
