//! Output formatter trait

use tracker_application::ComparisonOutput;

/// Trait for formatting comparison results
pub trait OutputFormatter {
    /// Per-source rankings followed by the comparison
    fn format(&self, output: &ComparisonOutput) -> String;

    /// Format as JSON
    fn format_json(&self, output: &ComparisonOutput) -> String;

    /// Comparison only (concise output)
    fn format_summary(&self, output: &ComparisonOutput) -> String;
}
