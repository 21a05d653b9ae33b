//! Application-level configuration.
//!
//! - [`ExecutionParams`]: fan-out control (mode, web search, token budget, timeout)

pub mod execution_params;

pub use execution_params::{ExecutionMode, ExecutionParams};
