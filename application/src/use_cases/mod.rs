//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod compare_rankings;
pub mod list_models;
pub mod model_sweep;
pub mod run_ranking;
pub(crate) mod shared;
