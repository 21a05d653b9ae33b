//! Structured run history.
//!
//! Provides [`JsonlRunLogger`], an append-only JSONL writer implementing the
//! [`RunLogger`](tracker_application::RunLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlRunLogger;
