//! Presentation layer for rank-tracker
//!
//! This crate contains CLI definitions, console formatters,
//! CSV/JSON exporters, and progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use output::console::ConsoleFormatter;
pub use output::export::{
    ExportError, ExportRow, write_csv, write_json, write_sweep_csv, write_sweep_json,
};
pub use output::formatter::OutputFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
