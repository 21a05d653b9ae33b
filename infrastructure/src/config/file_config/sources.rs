//! Source selection from TOML (`[sources]` section)

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracker_domain::{ConfigIssue, ConfigIssueCode, SourceId};

/// Source selection and model catalog
///
/// # Example
///
/// ```toml
/// [sources]
/// enabled = ["chatgpt", "gemini"]
///
/// [sources.models]          # catalog used by --all-models
/// chatgpt = ["gpt-4o-mini-2024-07-18", "gpt-4o-2024-11-20"]
///
/// [sources.default_model]
/// gemini = "gemini-2.5-pro"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSourcesConfig {
    /// Sources queried when `-p` is not given
    pub enabled: Vec<String>,
    /// Models swept per source by `--all-models`
    pub models: BTreeMap<String, Vec<String>>,
    /// Model used per source when no CLI override is given
    pub default_model: BTreeMap<String, String>,
}

impl Default for FileSourcesConfig {
    fn default() -> Self {
        let catalog = [
            (
                "chatgpt",
                &[
                    "gpt-4o-mini-2024-07-18",
                    "gpt-4o-2024-11-20",
                    "gpt-4-turbo-2024-04-09",
                    "gpt-3.5-turbo-0125",
                ][..],
            ),
            (
                "perplexity",
                &["sonar", "sonar-pro", "sonar-reasoning", "sonar-reasoning-pro"][..],
            ),
            (
                "gemini",
                &[
                    "gemini-2.5-flash",
                    "gemini-2.5-pro",
                    "gemini-1.5-flash-001",
                    "gemini-1.5-pro-001",
                ][..],
            ),
        ];

        Self {
            enabled: SourceId::default_sources()
                .iter()
                .map(|s| s.to_string())
                .collect(),
            models: catalog
                .iter()
                .map(|(source, models)| {
                    (
                        source.to_string(),
                        models.iter().map(|m| m.to_string()).collect(),
                    )
                })
                .collect(),
            default_model: BTreeMap::new(),
        }
    }
}

impl FileSourcesConfig {
    /// Enabled sources, falling back to the built-in three when the list is empty.
    pub fn parse_enabled(&self) -> (Vec<SourceId>, Vec<ConfigIssue>) {
        let sources: Vec<SourceId> = self
            .enabled
            .iter()
            .filter(|s| !s.trim().is_empty())
            .map(|s| SourceId::from(s.as_str()))
            .collect();

        if sources.is_empty() {
            let issue = ConfigIssue::warning(
                ConfigIssueCode::NoSourcesEnabled,
                "sources.enabled is empty, using chatgpt, perplexity, gemini",
            );
            return (SourceId::default_sources(), vec![issue]);
        }

        (sources, Vec::new())
    }

    /// Model catalog keyed by source. Blank model names are dropped.
    pub fn parse_catalog(&self) -> (HashMap<SourceId, Vec<String>>, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let mut catalog = HashMap::new();

        for (source, models) in &self.models {
            let mut kept = Vec::with_capacity(models.len());
            for model in models {
                if model.trim().is_empty() {
                    issues.push(empty_model_issue(format!("sources.models.{}", source)));
                } else {
                    kept.push(model.trim().to_string());
                }
            }
            catalog.insert(SourceId::from(source.as_str()), kept);
        }

        (catalog, issues)
    }

    /// Default model per source. Blank entries are dropped.
    pub fn parse_default_models(&self) -> (HashMap<SourceId, String>, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let mut defaults = HashMap::new();

        for (source, model) in &self.default_model {
            if model.trim().is_empty() {
                issues.push(empty_model_issue(format!("sources.default_model.{}", source)));
            } else {
                defaults.insert(SourceId::from(source.as_str()), model.trim().to_string());
            }
        }

        (defaults, issues)
    }
}

fn empty_model_issue(field: String) -> ConfigIssue {
    ConfigIssue::error(
        ConfigIssueCode::EmptyModelName {
            field: field.clone(),
        },
        format!("{}: model name cannot be empty", field),
    )
}
