//! Progress notification port
//!
//! Defines the interface for reporting progress during a fan-out.

use tracker_domain::SourceId;

/// Callback for progress updates while sources are being queried
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bars, plain text, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called once before any source is queried
    fn on_fanout_start(&self, total_sources: usize);

    /// Called when a source's query is dispatched
    fn on_source_start(&self, _source: &SourceId, _model: Option<&str>) {}

    /// Called when a source has answered or failed
    fn on_source_complete(&self, source: &SourceId, success: bool);

    /// Called after every source has finished
    fn on_fanout_complete(&self);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_fanout_start(&self, _total_sources: usize) {}
    fn on_source_complete(&self, _source: &SourceId, _success: bool) {}
    fn on_fanout_complete(&self) {}
}
