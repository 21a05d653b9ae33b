//! Compare Rankings use case
//!
//! Runs the fan-out and folds every source's list into a consensus report.

use super::run_ranking::{RankingRun, RunRankingError, RunRankingInput, RunRankingUseCase};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::run_logger::{RunEvent, RunLogger};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use tracker_domain::{ConsensusAggregator, ConsensusReport};

/// A finished run together with its cross-source comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonOutput {
    pub run: RankingRun,
    pub report: ConsensusReport,
}

pub struct CompareRankingsUseCase {
    runner: RunRankingUseCase,
    aggregator: ConsensusAggregator,
    logger: Option<Arc<dyn RunLogger>>,
}

impl CompareRankingsUseCase {
    pub fn new(runner: RunRankingUseCase, aggregator: ConsensusAggregator) -> Self {
        Self {
            runner,
            aggregator,
            logger: None,
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn RunLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub async fn execute(&self, input: RunRankingInput) -> Result<ComparisonOutput, RunRankingError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    pub async fn execute_with_progress(
        &self,
        input: RunRankingInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<ComparisonOutput, RunRankingError> {
        let run = self.runner.execute_with_progress(input, progress).await?;
        let report = self.aggregator.aggregate(&run.results);

        info!(
            "Compared {} sources: {} entities, {} common",
            run.results.len(),
            report.records.len(),
            report.common_items.len()
        );

        if let Some(logger) = &self.logger {
            logger.log(RunEvent::new(
                "comparison_complete",
                serde_json::json!({
                    "keyword": run.query.keyword(),
                    "entities": report.records.len(),
                    "common_items": report.common_items.len(),
                    "total_cost": report.total_cost,
                }),
            ));
        }

        Ok(ComparisonOutput { run, report })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExecutionParams;
    use crate::ports::source_gateway::{GatewayError, SourceRegistry};
    use crate::use_cases::shared::test_support::StubGateway;
    use std::sync::Mutex;
    use tracker_domain::{RankingQuery, SourceId};

    struct CapturingLogger(Mutex<Vec<&'static str>>);

    impl RunLogger for CapturingLogger {
        fn log(&self, event: RunEvent) {
            self.0.lock().unwrap().push(event.event_type);
        }
    }

    fn use_case() -> CompareRankingsUseCase {
        let registry = Arc::new(
            SourceRegistry::new()
                .with(Arc::new(StubGateway::new(
                    SourceId::ChatGpt,
                    "1. OXO POP Container\n2. Fellow Atmos Canister\n3. Airscape Canister",
                )))
                .with(Arc::new(StubGateway::new(
                    SourceId::Gemini,
                    "1. Fellow Atmos Canister\n2. OXO POP Container\n3. Coffee Gator",
                )))
                .with(Arc::new(
                    StubGateway::new(SourceId::Perplexity, "")
                        .failing(GatewayError::Api("DataForSEO API error: bad".to_string())),
                )),
        );
        CompareRankingsUseCase::new(
            RunRankingUseCase::new(registry),
            ConsensusAggregator::default(),
        )
    }

    fn input() -> RunRankingInput {
        RunRankingInput::new(
            RankingQuery::new("coffee canister").unwrap(),
            SourceId::default_sources(),
        )
        .with_params(ExecutionParams::default())
    }

    #[tokio::test]
    async fn test_comparison_merges_shared_entities() {
        let output = use_case().execute(input()).await.unwrap();

        let oxo = output.report.find("OXO POP Container").unwrap();
        assert_eq!(oxo.individual_ranks(), vec![1, 2]);
        assert_eq!(oxo.average_rank, 1.5);

        assert_eq!(output.report.common_items.len(), 2);
        assert_eq!(
            output.report.unique_for(&SourceId::Gemini),
            &["Coffee Gator".to_string()]
        );
        assert!(output.report.unique_for(&SourceId::Perplexity).is_empty());
    }

    #[tokio::test]
    async fn test_comparison_keeps_failed_source_summary() {
        let output = use_case().execute(input()).await.unwrap();

        let failed = output
            .report
            .summaries
            .iter()
            .find(|s| s.source == SourceId::Perplexity)
            .unwrap();
        assert_eq!(failed.error.as_deref(), Some("DataForSEO API error: bad"));
        assert_eq!(failed.items_found, 0);
        assert!((output.report.total_cost - 0.02).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_comparison_logs_completion() {
        let logger = Arc::new(CapturingLogger(Mutex::new(Vec::new())));
        let output = use_case()
            .with_logger(logger.clone())
            .execute(input())
            .await
            .unwrap();
        assert_eq!(output.run.results.len(), 3);
        assert_eq!(*logger.0.lock().unwrap(), vec!["comparison_complete"]);
    }
}
