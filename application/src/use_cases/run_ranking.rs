//! Run Ranking use case
//!
//! Fans one ranking query out to every requested source, isolates per-source
//! failures and extracts a ranked list from each answer.

use super::shared::{build_request, dedup_sources, log_response, query_source};
use crate::config::{ExecutionMode, ExecutionParams};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::run_logger::{NoRunLogger, RunEvent, RunLogger};
use crate::ports::source_gateway::SourceRegistry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use tracker_domain::{
    RankingQuery, RawSourceResponse, SourceId, SourceRankingResult, TextRankingExtractor,
};

/// Errors that can occur before any source is queried
#[derive(Error, Debug)]
pub enum RunRankingError {
    #[error("No sources requested")]
    NoSources,
}

/// Input for the RunRanking use case
#[derive(Debug, Clone)]
pub struct RunRankingInput {
    pub query: RankingQuery,
    /// Sources to query, in the order results should be reported
    pub sources: Vec<SourceId>,
    /// Per-source model overrides; sources without one use their default
    pub models: HashMap<SourceId, String>,
    pub params: ExecutionParams,
}

impl RunRankingInput {
    pub fn new(query: RankingQuery, sources: Vec<SourceId>) -> Self {
        Self {
            query,
            sources,
            models: HashMap::new(),
            params: ExecutionParams::default(),
        }
    }

    pub fn with_model(mut self, source: SourceId, model: impl Into<String>) -> Self {
        self.models.insert(source, model.into());
        self
    }

    pub fn with_params(mut self, params: ExecutionParams) -> Self {
        self.params = params;
        self
    }
}

/// Results of one fan-out, ordered as the sources were requested
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingRun {
    pub query: RankingQuery,
    pub started_at: DateTime<Utc>,
    pub mode: ExecutionMode,
    pub results: Vec<SourceRankingResult>,
}

impl RankingRun {
    pub fn get(&self, source: &SourceId) -> Option<&SourceRankingResult> {
        self.results.iter().find(|r| r.source() == source)
    }

    pub fn successful(&self) -> impl Iterator<Item = &SourceRankingResult> {
        self.results.iter().filter(|r| r.is_success())
    }

    pub fn total_cost(&self) -> f64 {
        self.successful().map(|r| r.response.usage.cost).sum()
    }
}

/// Use case for querying every source once
pub struct RunRankingUseCase {
    registry: Arc<SourceRegistry>,
    extractor: Arc<TextRankingExtractor>,
    logger: Arc<dyn RunLogger>,
}

impl RunRankingUseCase {
    pub fn new(registry: Arc<SourceRegistry>) -> Self {
        Self {
            registry,
            extractor: Arc::new(TextRankingExtractor::default()),
            logger: Arc::new(NoRunLogger),
        }
    }

    pub fn with_extractor(mut self, extractor: TextRankingExtractor) -> Self {
        self.extractor = Arc::new(extractor);
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn RunLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunRankingInput) -> Result<RankingRun, RunRankingError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunRankingInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<RankingRun, RunRankingError> {
        let sources = dedup_sources(&input.sources);
        if sources.is_empty() {
            return Err(RunRankingError::NoSources);
        }

        info!(
            "Querying {} sources for '{}' ({})",
            sources.len(),
            input.query,
            input.params.mode
        );
        let started_at = Utc::now();
        progress.on_fanout_start(sources.len());

        let responses = match input.params.mode {
            ExecutionMode::Parallel => self.query_parallel(&input, &sources, progress).await,
            ExecutionMode::Sequential => self.query_sequential(&input, &sources, progress).await,
        };

        progress.on_fanout_complete();

        let results: Vec<SourceRankingResult> = responses
            .into_iter()
            .map(|response| {
                log_response(self.logger.as_ref(), input.query.keyword(), &response);
                let result = SourceRankingResult::from_response(response, &self.extractor);
                debug!(
                    "Source {} yielded {} ranked items",
                    result.source(),
                    result.entities().len()
                );
                result
            })
            .collect();

        self.logger.log(RunEvent::new(
            "run_complete",
            serde_json::json!({
                "keyword": input.query.keyword(),
                "mode": input.params.mode.as_str(),
                "sources": results.len(),
                "failed": results.iter().filter(|r| !r.is_success()).count(),
            }),
        ));

        Ok(RankingRun {
            query: input.query,
            started_at,
            mode: input.params.mode,
            results,
        })
    }

    /// One task per source; results are slotted back into request order.
    async fn query_parallel(
        &self,
        input: &RunRankingInput,
        sources: &[SourceId],
        progress: &dyn ProgressNotifier,
    ) -> Vec<RawSourceResponse> {
        let mut join_set = JoinSet::new();

        for (index, source) in sources.iter().enumerate() {
            let model = input.models.get(source).cloned();
            progress.on_source_start(source, model.as_deref());

            let gateway = self.registry.get(source);
            let request = build_request(&input.query, model, &input.params);
            let source = source.clone();
            let timeout = input.params.timeout;

            join_set.spawn(async move {
                let response = query_source(gateway, source, request, timeout).await;
                (index, response)
            });
        }

        let mut slots: Vec<Option<RawSourceResponse>> = vec![None; sources.len()];

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, response)) => {
                    progress.on_source_complete(&response.source, response.is_success());
                    slots[index] = Some(response);
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                }
            }
        }

        slots
            .into_iter()
            .zip(sources)
            .map(|(slot, source)| {
                slot.unwrap_or_else(|| {
                    progress.on_source_complete(source, false);
                    RawSourceResponse::failure(
                        source.clone(),
                        input.models.get(source).cloned().unwrap_or_default(),
                        "query task aborted",
                    )
                })
            })
            .collect()
    }

    async fn query_sequential(
        &self,
        input: &RunRankingInput,
        sources: &[SourceId],
        progress: &dyn ProgressNotifier,
    ) -> Vec<RawSourceResponse> {
        let mut responses = Vec::with_capacity(sources.len());

        for source in sources {
            let model = input.models.get(source).cloned();
            progress.on_source_start(source, model.as_deref());

            let request = build_request(&input.query, model, &input.params);
            let response = query_source(
                self.registry.get(source),
                source.clone(),
                request,
                input.params.timeout,
            )
            .await;

            progress.on_source_complete(source, response.is_success());
            responses.push(response);
        }

        responses
    }
}
