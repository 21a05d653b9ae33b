//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracker_domain::SourceId;

/// Output format for ranking results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Per-source rankings followed by the comparison
    Full,
    /// Only the comparison
    Summary,
    /// JSON output
    Json,
}

impl From<OutputFormat> for tracker_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => tracker_domain::OutputFormat::Full,
            OutputFormat::Summary => tracker_domain::OutputFormat::Summary,
            OutputFormat::Json => tracker_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for rank-tracker
#[derive(Parser, Debug)]
#[command(name = "rank-tracker")]
#[command(author, version, about = "Compare how AI assistants rank products for a keyword")]
#[command(long_about = r#"
rank-tracker asks several AI platforms (ChatGPT, Perplexity, Gemini) for the
top 10 of a keyword, extracts each ranked list and compares them: average
rank per product, products every platform agrees on, and platform-only picks.

Credentials are read from DATAFORSEO_LOGIN and DATAFORSEO_PASSWORD.

Configuration files are loaded from (in priority order):
1. RANK_TRACKER_* environment variables
2. --config <path>           Explicit config file
3. ./rank-tracker.toml       Project-level config
4. ~/.config/rank-tracker/config.toml   Global config

Example:
  rank-tracker -k "coffee storage containers"
  rank-tracker -k "coffee grinders" -p chatgpt perplexity --export-csv grinders.csv
  rank-tracker -k "espresso machines" --all-models -p gemini
"#)]
pub struct Cli {
    /// Keyword to rank (e.g. "coffee storage containers")
    #[arg(short, long, required_unless_present_any = ["list_models", "show_config"])]
    pub keyword: Option<String>,

    /// Platforms to query (default: sources.enabled from config)
    #[arg(short, long, num_args = 1.., value_name = "PLATFORM")]
    pub platforms: Vec<String>,

    /// ChatGPT model
    #[arg(long, value_name = "MODEL")]
    pub chatgpt_model: Option<String>,

    /// Perplexity model
    #[arg(long, value_name = "MODEL")]
    pub perplexity_model: Option<String>,

    /// Gemini model
    #[arg(long, value_name = "MODEL")]
    pub gemini_model: Option<String>,

    /// Query every catalogued model of each platform
    #[arg(long)]
    pub all_models: bool,

    /// Disable web search
    #[arg(long)]
    pub no_web_search: bool,

    /// Query platforms one after another
    #[arg(long)]
    pub sequential: bool,

    /// Export results to a CSV file
    #[arg(long, value_name = "FILE")]
    pub export_csv: Option<PathBuf>,

    /// Export results to a JSON file
    #[arg(long, value_name = "FILE")]
    pub export_json: Option<PathBuf>,

    /// Output format (default: output.format from config, else full)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// List available models for the selected platforms and exit
    #[arg(long)]
    pub list_models: bool,

    /// Append diagnostics to a log file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Append structured run events (JSONL) to a file
    #[arg(long, value_name = "PATH")]
    pub run_log: Option<PathBuf>,
}

impl Cli {
    /// Platforms given with `-p`, parsed; `None` when the flag was not used.
    pub fn requested_sources(&self) -> Option<Vec<SourceId>> {
        if self.platforms.is_empty() {
            return None;
        }
        Some(
            self.platforms
                .iter()
                .map(|p| SourceId::from(p.as_str()))
                .collect(),
        )
    }

    /// Per-platform model overrides from the `--<platform>-model` flags.
    pub fn model_overrides(&self) -> Vec<(SourceId, String)> {
        [
            (SourceId::ChatGpt, &self.chatgpt_model),
            (SourceId::Perplexity, &self.perplexity_model),
            (SourceId::Gemini, &self.gemini_model),
        ]
        .into_iter()
        .filter_map(|(source, model)| model.clone().map(|m| (source, m)))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_invocation() {
        let cli = Cli::parse_from([
            "rank-tracker",
            "-k",
            "coffee jar",
            "-p",
            "chatgpt",
            "Gemini",
            "--gemini-model",
            "gemini-2.5-pro",
            "--no-web-search",
            "--sequential",
            "-o",
            "summary",
            "-vv",
        ]);

        assert_eq!(cli.keyword.as_deref(), Some("coffee jar"));
        assert_eq!(
            cli.requested_sources(),
            Some(vec![SourceId::ChatGpt, SourceId::Gemini])
        );
        assert_eq!(
            cli.model_overrides(),
            vec![(SourceId::Gemini, "gemini-2.5-pro".to_string())]
        );
        assert!(cli.no_web_search);
        assert!(cli.sequential);
        assert_eq!(cli.output, Some(OutputFormat::Summary));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_keyword_required_unless_listing() {
        assert!(Cli::try_parse_from(["rank-tracker"]).is_err());

        let cli = Cli::try_parse_from(["rank-tracker", "--list-models"]).unwrap();
        assert!(cli.list_models);
        assert_eq!(cli.requested_sources(), None);
    }

    #[test]
    fn test_output_format_maps_to_domain() {
        let format: tracker_domain::OutputFormat = OutputFormat::Json.into();
        assert_eq!(format, tracker_domain::OutputFormat::Json);
    }
}
