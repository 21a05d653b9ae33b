//! CSV and JSON export of ranking results
//!
//! CSV is row-oriented: one row per ranked item, or one `ERROR` row for a
//! source that failed. JSON keeps the nested form, keyed by source.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;
use tracker_application::{ComparisonOutput, ModelSweepOutput};
use tracker_domain::{ConsensusReport, SourceRankingResult};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One CSV row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub platform: String,
    /// Rank number, or `ERROR` for a failed source
    pub rank: String,
    pub title: String,
    pub description: String,
    pub model: String,
    pub cost: f64,
    pub web_search: bool,
}

impl ExportRow {
    /// Flatten one source result into rows
    pub fn from_result(result: &SourceRankingResult) -> Vec<ExportRow> {
        let response = &result.response;
        let platform = result.source().to_string();

        if let Some(error) = result.error() {
            return vec![ExportRow {
                platform,
                rank: "ERROR".to_string(),
                title: error.to_string(),
                description: String::new(),
                model: response.model.clone(),
                cost: 0.0,
                web_search: false,
            }];
        }

        result
            .entities()
            .iter()
            .map(|entity| ExportRow {
                platform: platform.clone(),
                rank: entity.rank().to_string(),
                title: entity.title().to_string(),
                description: entity.description().unwrap_or_default().to_string(),
                model: response.model.clone(),
                cost: response.usage.cost,
                web_search: response.usage.web_search_used,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedItemDocument {
    pub rank: usize,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

/// Nested form of one source result
#[derive(Debug, Clone, Serialize)]
pub struct SourceDocument {
    pub model: String,
    pub cost: f64,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub web_search_used: bool,
    pub error: Option<String>,
    pub ranked_items: Vec<RankedItemDocument>,
    pub raw_text: String,
}

impl From<&SourceRankingResult> for SourceDocument {
    fn from(result: &SourceRankingResult) -> Self {
        let response = &result.response;
        Self {
            model: response.model.clone(),
            cost: response.usage.cost,
            input_tokens: response.usage.input_tokens,
            output_tokens: response.usage.output_tokens,
            web_search_used: response.usage.web_search_used,
            error: response.error.clone(),
            ranked_items: result
                .entities()
                .iter()
                .map(|e| RankedItemDocument {
                    rank: e.rank(),
                    title: e.title().to_string(),
                    description: e.description().unwrap_or_default().to_string(),
                    source_url: e.source_url().map(str::to_string),
                })
                .collect(),
            raw_text: response.text.clone(),
        }
    }
}

/// JSON export of a comparison run
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonDocument<'a> {
    pub timestamp: String,
    pub keyword: &'a str,
    pub results: BTreeMap<String, SourceDocument>,
    pub comparison: &'a ConsensusReport,
}

impl<'a> ComparisonDocument<'a> {
    pub fn new(output: &'a ComparisonOutput) -> Self {
        Self {
            timestamp: output.run.started_at.to_rfc3339(),
            keyword: output.run.query.keyword(),
            results: output
                .run
                .results
                .iter()
                .map(|r| (r.source().to_string(), SourceDocument::from(r)))
                .collect(),
            comparison: &output.report,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SweepSourceDocument<'a> {
    pub total_cost: f64,
    pub models: BTreeMap<String, SourceDocument>,
    pub consensus: &'a ConsensusReport,
}

/// JSON export of a model sweep
#[derive(Debug, Clone, Serialize)]
pub struct SweepDocument<'a> {
    pub timestamp: String,
    pub keyword: &'a str,
    pub total_cost: f64,
    pub sources: BTreeMap<String, SweepSourceDocument<'a>>,
}

impl<'a> SweepDocument<'a> {
    pub fn new(output: &'a ModelSweepOutput, timestamp: DateTime<Utc>) -> Self {
        let sources = output
            .sweeps
            .iter()
            .map(|sweep| {
                let models = sweep
                    .results
                    .iter()
                    .map(|r| (r.response.model.clone(), SourceDocument::from(r)))
                    .collect();
                (
                    sweep.source.to_string(),
                    SweepSourceDocument {
                        total_cost: sweep.report.total_cost,
                        models,
                        consensus: &sweep.report,
                    },
                )
            })
            .collect();

        Self {
            timestamp: timestamp.to_rfc3339(),
            keyword: output.query.keyword(),
            total_cost: output.total_cost(),
            sources,
        }
    }
}

fn write_rows<'a>(
    path: &Path,
    results: impl IntoIterator<Item = &'a SourceRankingResult>,
) -> Result<usize, ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    let mut count = 0;
    for result in results {
        for row in ExportRow::from_result(result) {
            writer.serialize(&row)?;
            count += 1;
        }
    }
    writer.flush()?;
    Ok(count)
}

fn write_document<T: Serialize>(path: &Path, document: &T) -> Result<(), ExportError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, document)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Write a comparison run as CSV. Returns the number of rows written.
pub fn write_csv(path: &Path, output: &ComparisonOutput) -> Result<usize, ExportError> {
    write_rows(path, &output.run.results)
}

pub fn write_json(path: &Path, output: &ComparisonOutput) -> Result<(), ExportError> {
    write_document(path, &ComparisonDocument::new(output))
}

/// Write every model of a sweep as CSV rows. Returns the number of rows written.
pub fn write_sweep_csv(path: &Path, output: &ModelSweepOutput) -> Result<usize, ExportError> {
    write_rows(path, output.sweeps.iter().flat_map(|s| s.results.iter()))
}

pub fn write_sweep_json(
    path: &Path,
    output: &ModelSweepOutput,
    timestamp: DateTime<Utc>,
) -> Result<(), ExportError> {
    write_document(path, &SweepDocument::new(output, timestamp))
}
