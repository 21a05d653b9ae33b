//! Application layer for rank-tracker
//!
//! This crate contains use cases, port definitions, and execution parameters.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ExecutionMode, ExecutionParams};
pub use ports::{
    progress::{NoProgress, ProgressNotifier},
    run_logger::{NoRunLogger, RunEvent, RunLogger},
    source_gateway::{
        GatewayError, GatewayResponse, ModelInfo, SourceGateway, SourceQuery, SourceRegistry,
    },
};
pub use use_cases::compare_rankings::{CompareRankingsUseCase, ComparisonOutput};
pub use use_cases::list_models::{ListModelsUseCase, SourceModels};
pub use use_cases::model_sweep::{
    ModelSweepError, ModelSweepInput, ModelSweepOutput, ModelSweepUseCase, SourceSweep,
};
pub use use_cases::run_ranking::{RankingRun, RunRankingError, RunRankingInput, RunRankingUseCase};
