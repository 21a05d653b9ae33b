//! Model Sweep use case
//!
//! Asks one question to every catalogued model of each source. Sources run
//! in parallel; the models of one source run one after another, which keeps
//! each source's provider from seeing a burst of concurrent requests.
//!
//! Each source's answers are then aggregated with every model standing in
//! for a "source", so common items carry `models_reporting / models_queried`
//! as their agreement score.

use super::shared::{build_request, dedup_sources, log_response, query_source};
use crate::config::ExecutionParams;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::run_logger::{NoRunLogger, RunLogger};
use crate::ports::source_gateway::SourceRegistry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{info, warn};
use tracker_domain::{
    ConsensusAggregator, ConsensusReport, RankingQuery, SourceId, SourceRankingResult,
    TextRankingExtractor,
};

#[derive(Error, Debug)]
pub enum ModelSweepError {
    #[error("No sources requested")]
    NoSources,
}

/// Input for the ModelSweep use case
#[derive(Debug, Clone)]
pub struct ModelSweepInput {
    pub query: RankingQuery,
    pub sources: Vec<SourceId>,
    /// Models to query per source; a source without entries is queried once
    /// with its default model
    pub catalog: HashMap<SourceId, Vec<String>>,
    pub params: ExecutionParams,
}

impl ModelSweepInput {
    pub fn new(query: RankingQuery, sources: Vec<SourceId>) -> Self {
        Self {
            query,
            sources,
            catalog: HashMap::new(),
            params: ExecutionParams::default(),
        }
    }

    pub fn with_models<I, S>(mut self, source: SourceId, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.catalog
            .insert(source, models.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_params(mut self, params: ExecutionParams) -> Self {
        self.params = params;
        self
    }
}

/// All models of one source and their consensus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSweep {
    pub source: SourceId,
    /// One result per model, in catalog order
    pub results: Vec<SourceRankingResult>,
    /// Consensus across this source's models; sources in it are model names
    pub report: ConsensusReport,
}

impl SourceSweep {
    pub fn successful_models(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSweepOutput {
    pub query: RankingQuery,
    pub sweeps: Vec<SourceSweep>,
}

impl ModelSweepOutput {
    pub fn total_cost(&self) -> f64 {
        self.sweeps.iter().map(|s| s.report.total_cost).sum()
    }
}

pub struct ModelSweepUseCase {
    registry: Arc<SourceRegistry>,
    extractor: Arc<TextRankingExtractor>,
    aggregator: ConsensusAggregator,
    logger: Arc<dyn RunLogger>,
}

impl ModelSweepUseCase {
    pub fn new(registry: Arc<SourceRegistry>, aggregator: ConsensusAggregator) -> Self {
        Self {
            registry,
            extractor: Arc::new(TextRankingExtractor::default()),
            aggregator,
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

    pub async fn execute(&self, input: ModelSweepInput) -> Result<ModelSweepOutput, ModelSweepError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    pub async fn execute_with_progress(
        &self,
        input: ModelSweepInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<ModelSweepOutput, ModelSweepError> {
        let sources = dedup_sources(&input.sources);
        if sources.is_empty() {
            return Err(ModelSweepError::NoSources);
        }

        progress.on_fanout_start(sources.len());
        let mut join_set = JoinSet::new();

        for (index, source) in sources.iter().enumerate() {
            let models: Vec<Option<String>> = match input.catalog.get(source) {
                Some(models) if !models.is_empty() => models.iter().cloned().map(Some).collect(),
                _ => vec![None],
            };
            info!("Sweeping {} models on {}", models.len(), source);
            progress.on_source_start(source, None);

            let gateway = self.registry.get(source);
            let source = source.clone();
            let query = input.query.clone();
            let params = input.params.clone();
            let extractor = Arc::clone(&self.extractor);
            let logger = Arc::clone(&self.logger);

            join_set.spawn(async move {
                let mut results = Vec::with_capacity(models.len());
                for model in models {
                    let request = build_request(&query, model, &params);
                    let response =
                        query_source(gateway.clone(), source.clone(), request, params.timeout)
                            .await;
                    log_response(logger.as_ref(), query.keyword(), &response);
                    results.push(SourceRankingResult::from_response(response, &extractor));
                }
                (index, results)
            });
        }

        let mut slots: Vec<Option<Vec<SourceRankingResult>>> = vec![None; sources.len()];

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, results)) => {
                    progress
                        .on_source_complete(&sources[index], results.iter().any(|r| r.is_success()));
                    slots[index] = Some(results);
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                }
            }
        }

        progress.on_fanout_complete();

        let sweeps = slots
            .into_iter()
            .zip(sources)
            .map(|(slot, source)| {
                let results = slot.unwrap_or_else(|| {
                    vec![SourceRankingResult::failure(
                        source.clone(),
                        "",
                        "query task aborted",
                    )]
                });
                let mut report = self.aggregator.aggregate(&by_model(&results));
                report
                    .common_items
                    .sort_by(|a, b| b.agreement_score.total_cmp(&a.agreement_score));
                SourceSweep {
                    source,
                    results,
                    report,
                }
            })
            .collect();

        Ok(ModelSweepOutput {
            query: input.query,
            sweeps,
        })
    }
}

/// Relabel each result with its model name so the aggregator keeps models apart.
fn by_model(results: &[SourceRankingResult]) -> Vec<SourceRankingResult> {
    results
        .iter()
        .map(|result| {
            let mut relabeled = result.clone();
            let label = if result.response.model.is_empty() {
                result.source().to_string()
            } else {
                result.response.model.clone()
            };
            relabeled.response.source = SourceId::Custom(label);
            relabeled
        })
        .collect()
}
