//! Console output formatter for ranking results

use crate::output::export::{ComparisonDocument, SweepDocument};
use crate::output::formatter::OutputFormatter;
use chrono::Utc;
use colored::Colorize;
use tracker_application::{ComparisonOutput, ModelSweepOutput, SourceModels};
use tracker_domain::{ConsensusReport, SourceId, SourceRankingResult};

const TOP_PER_SOURCE: usize = 5;
const TOP_AVERAGE: usize = 10;
const TOP_COMMON: usize = 5;
const TOP_SWEEP_CONSENSUS: usize = 3;

/// Formats ranking results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Per-source rankings followed by the comparison
    pub fn format(output: &ComparisonOutput) -> String {
        let mut out = String::new();

        out.push_str(&Self::header("AI Ranking Results"));
        out.push('\n');
        out.push_str(&Self::run_line(output));

        for result in &output.run.results {
            out.push_str(&Self::format_source(result));
        }

        out.push_str(&Self::format_report(&output.report));
        out.push_str(&Self::footer());
        out
    }

    /// Comparison only
    pub fn format_summary(output: &ComparisonOutput) -> String {
        let mut out = String::new();

        out.push_str(&Self::header("AI Ranking Comparison"));
        out.push('\n');
        out.push_str(&Self::run_line(output));

        out.push_str(&Self::section_header("Sources"));
        for summary in &output.report.summaries {
            match &summary.error {
                Some(error) => out.push_str(&format!(
                    "  {} {}: {}\n",
                    "x".red(),
                    summary.source.display_name(),
                    error
                )),
                None => out.push_str(&format!(
                    "  {} {}: {} items ({}, ${:.4})\n",
                    "v".green(),
                    summary.source.display_name(),
                    summary.items_found,
                    summary.model,
                    summary.cost
                )),
            }
        }

        out.push_str(&Self::format_report(&output.report));
        out.push_str(&Self::footer());
        out
    }

    /// Format as JSON
    pub fn format_json(output: &ComparisonOutput) -> String {
        serde_json::to_string_pretty(&ComparisonDocument::new(output))
            .unwrap_or_else(|_| "{}".to_string())
    }

    pub fn format_sweep_json(output: &ModelSweepOutput) -> String {
        serde_json::to_string_pretty(&SweepDocument::new(output, Utc::now()))
            .unwrap_or_else(|_| "{}".to_string())
    }

    /// Per-source model performance and top consensus items of a sweep
    pub fn format_sweep(output: &ModelSweepOutput) -> String {
        let mut out = String::new();

        out.push_str(&Self::header("Multi-Model Sweep"));
        out.push('\n');
        out.push_str(&format!(
            "{} {}\n",
            "Keyword:".cyan().bold(),
            output.query.keyword()
        ));

        let mut queries = 0;
        for sweep in &output.sweeps {
            queries += sweep.results.len();
            out.push_str(&Self::section_header(&format!(
                "{} Models",
                sweep.source.display_name().to_uppercase()
            )));

            for result in &sweep.results {
                let model = &result.response.model;
                match result.error() {
                    Some(error) => out.push_str(&format!(
                        "  {} {}: {}\n",
                        "x".red(),
                        model,
                        error.dimmed()
                    )),
                    None => out.push_str(&format!(
                        "  {} {}: {} items (${:.4})\n",
                        "v".green(),
                        model,
                        result.entities().len(),
                        result.response.usage.cost
                    )),
                }
            }

            out.push_str(&format!(
                "  Platform total: ${:.4} ({}/{} models)\n",
                sweep.report.total_cost,
                sweep.successful_models(),
                sweep.results.len()
            ));

            if !sweep.report.common_items.is_empty() {
                out.push_str(&format!("\n  {}\n", "Top consensus items:".bold()));
                for item in sweep.report.common_items.iter().take(TOP_SWEEP_CONSENSUS) {
                    out.push_str(&format!(
                        "    - {} ({} models agree)\n",
                        item.title, item.count
                    ));
                }
            }
        }

        out.push_str(&format!(
            "\n{} ${:.4}\n",
            "TOTAL COST:".yellow().bold(),
            output.total_cost()
        ));
        if queries > 0 {
            out.push_str(&format!(
                "Average cost per query: ${:.4}\n",
                output.total_cost() / queries as f64
            ));
        }
        out.push_str(&Self::footer());
        out
    }

    /// Model listing, one section per source
    pub fn format_models(listings: &[SourceModels]) -> String {
        let mut out = String::new();
        out.push_str(&Self::header("Available Models"));
        out.push('\n');

        for listing in listings {
            out.push_str(&Self::section_header(listing.source.display_name()));
            match &listing.models {
                Ok(models) if models.is_empty() => out.push_str("  (none)\n"),
                Ok(models) => {
                    for model in models {
                        let web = if model.web_search_supported {
                            " [web search]".dimmed().to_string()
                        } else {
                            String::new()
                        };
                        out.push_str(&format!("  - {}{}\n", model.name, web));
                    }
                }
                Err(error) => out.push_str(&format!("  {} {}\n", "x".red(), error)),
            }
        }
        out
    }

    fn run_line(output: &ComparisonOutput) -> String {
        format!(
            "{} {}\n{} {}\n",
            "Keyword:".cyan().bold(),
            output.run.query.keyword(),
            "Mode:".cyan().bold(),
            output.run.mode
        )
    }

    fn format_source(result: &SourceRankingResult) -> String {
        let response = &result.response;
        let mut out = Self::section_header(&result.source().display_name().to_uppercase());

        out.push_str(&format!("  Model: {}\n", response.model));
        out.push_str(&format!("  Cost: ${:.4}\n", response.usage.cost));
        out.push_str(&format!(
            "  Tokens: {} in / {} out\n",
            response.usage.input_tokens, response.usage.output_tokens
        ));
        out.push_str(&format!(
            "  Web Search: {}\n\n",
            if response.usage.web_search_used { "yes" } else { "no" }
        ));

        if let Some(error) = result.error() {
            out.push_str(&format!("  {} {}\n", "ERROR:".red().bold(), error));
            return out;
        }

        if result.entities().is_empty() {
            out.push_str(&format!("  {}\n", "No ranked items found".yellow()));
            return out;
        }

        out.push_str(&format!("  Top {} Rankings:\n", TOP_PER_SOURCE));
        for entity in result.entities().iter().take(TOP_PER_SOURCE) {
            out.push_str(&format!("    {}. {}\n", entity.rank(), entity.title()));
            if let Some(url) = entity.source_url() {
                out.push_str(&format!("       {}\n", url.dimmed()));
            }
        }
        out
    }

    fn format_report(report: &ConsensusReport) -> String {
        let mut out = Self::section_header("Comparison & Analysis");

        out.push_str(&format!("\n{}\n", "Average Rankings:".bold()));
        if report.records.is_empty() {
            out.push_str("  (no ranked items)\n");
        }
        for (i, record) in report.records.iter().take(TOP_AVERAGE).enumerate() {
            let sources = record.sources();
            out.push_str(&format!("  {}. {}\n", i + 1, record.title.bold()));
            out.push_str(&format!(
                "     Average Rank: {:.2} | Appears on: {} platform(s)\n",
                record.average_rank,
                sources.len()
            ));
            out.push_str(&format!(
                "     Individual ranks: {:?} ({})\n",
                record.individual_ranks(),
                Self::join_sources(&sources)
            ));
        }

        if !report.common_items.is_empty() {
            out.push_str(&format!("\n{}\n", "Common Items:".bold()));
            for item in report.common_items.iter().take(TOP_COMMON) {
                out.push_str(&format!(
                    "  - {} (found on: {})\n",
                    item.title,
                    Self::join_sources(&item.sources)
                ));
            }
        }

        let unique: Vec<_> = report
            .unique_items
            .iter()
            .filter(|u| !u.titles.is_empty())
            .collect();
        if !unique.is_empty() {
            out.push_str(&format!("\n{}\n", "Only On One Platform:".bold()));
            for items in unique {
                out.push_str(&format!(
                    "  {}: {}\n",
                    items.source.display_name(),
                    items.titles.join(", ")
                ));
            }
        }

        out.push_str(&format!(
            "\n{} ${:.4}\n",
            "Total cost:".yellow().bold(),
            report.total_cost
        ));
        out
    }

    fn join_sources(sources: &[SourceId]) -> String {
        sources
            .iter()
            .map(|s| s.display_name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!(
            "{}\n{:^60}\n{}",
            line.cyan(),
            title.to_uppercase().bold(),
            line.cyan()
        )
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, output: &ComparisonOutput) -> String {
        Self::format(output)
    }

    fn format_json(&self, output: &ComparisonOutput) -> String {
        Self::format_json(output)
    }

    fn format_summary(&self, output: &ComparisonOutput) -> String {
        Self::format_summary(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::export::tests::sample_output;
    use tracker_application::ModelInfo;

    fn plain<F: FnOnce() -> String>(render: F) -> String {
        colored::control::set_override(false);
        render()
    }

    #[test]
    fn test_full_output_lists_sources_and_comparison() {
        let output = sample_output();
        let text = plain(|| ConsoleFormatter::format(&output));

        assert!(text.contains("Keyword: coffee storage containers"));
        assert!(text.contains("CHATGPT"));
        assert!(text.contains("Model: gpt-4o-mini-2024-07-18"));
        assert!(text.contains("Cost: $0.0125"));
        assert!(text.contains("Tokens: 120 in / 340 out"));
        assert!(text.contains("1. OXO Good Grips POP Container"));
        assert!(text.contains("ERROR: Request timed out after 120s"));
        assert!(text.contains("Average Rank: 1.00 | Appears on: 1 platform(s)"));
        assert!(text.contains("Individual ranks: [1] (ChatGPT)"));
        assert!(text.contains("Total cost: $0.0125"));
    }

    #[test]
    fn test_summary_skips_per_source_rankings() {
        let output = sample_output();
        let text = plain(|| ConsoleFormatter::format_summary(&output));

        assert!(!text.contains("Tokens:"));
        assert!(text.contains("Gemini: Request timed out after 120s"));
        assert!(text.contains("Average Rankings:"));
    }

    #[test]
    fn test_json_output_parses() {
        let output = sample_output();
        let formatter: &dyn OutputFormatter = &ConsoleFormatter;
        let value: serde_json::Value =
            serde_json::from_str(&formatter.format_json(&output)).unwrap();
        assert_eq!(value["keyword"], "coffee storage containers");
        assert!(value["results"]["gemini"].is_object());
    }

    #[test]
    fn test_format_models() {
        let listings = vec![
            SourceModels {
                source: SourceId::Perplexity,
                models: Ok(vec![ModelInfo {
                    name: "sonar".to_string(),
                    web_search_supported: true,
                }]),
            },
            SourceModels {
                source: SourceId::Gemini,
                models: Err("Authentication failed".to_string()),
            },
        ];
        let text = plain(|| ConsoleFormatter::format_models(&listings));
        assert!(text.contains("- sonar [web search]"));
        assert!(text.contains("x Authentication failed"));
    }
}
