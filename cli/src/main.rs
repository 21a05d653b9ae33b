//! CLI entrypoint for rank-tracker
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracker_application::{
    CompareRankingsUseCase, ExecutionMode, ListModelsUseCase, ModelSweepInput, ModelSweepUseCase,
    NoProgress, ProgressNotifier, RunLogger, RunRankingInput, RunRankingUseCase,
};
use tracker_domain::{OutputFormat, RankingQuery, Severity, TextRankingExtractor};
use tracker_infrastructure::{ConfigLoader, DataForSeoConfig, JsonlRunLogger, build_registry};
use tracker_presentation::{
    Cli, ConsoleFormatter, ProgressReporter, SimpleProgress, write_csv, write_json, write_sweep_csv,
    write_sweep_json,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(&cli)?;

    info!("Starting rank-tracker");

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("failed to load configuration: {}", e))?
    };

    for issue in config.validate() {
        match issue.severity {
            Severity::Error => error!("Config: {}", issue),
            Severity::Warning => warn!("Config: {}", issue),
        }
    }

    if !config.output.color {
        colored::control::set_override(false);
    }

    let format: OutputFormat = cli
        .output
        .map(Into::into)
        .or(config.output.format)
        .unwrap_or_default();

    let (mut params, _) = config.query.to_execution_params();
    if cli.no_web_search {
        params = params.with_web_search(false);
    }
    if cli.sequential {
        params = params.with_mode(ExecutionMode::Sequential);
    }

    let (policy, _) = config.extraction.to_policy();
    let extractor = TextRankingExtractor::new(policy);
    let (aggregator, _) = config.matching.to_aggregator();
    let (enabled, _) = config.sources.parse_enabled();
    let sources = cli.requested_sources().unwrap_or(enabled);

    // === Dependency Injection ===
    let connection = DataForSeoConfig::from_env(&config.gateway, params.timeout)?;
    let registry = Arc::new(build_registry(&config, connection)?);

    let run_logger: Option<Arc<dyn RunLogger>> = cli
        .run_log
        .as_ref()
        .and_then(|path| JsonlRunLogger::open(path))
        .map(|logger| Arc::new(logger) as Arc<dyn RunLogger>);

    if cli.list_models {
        let listings = ListModelsUseCase::new(registry).execute(&sources).await;
        println!("{}", ConsoleFormatter::format_models(&listings));
        return Ok(());
    }

    let keyword = cli
        .keyword
        .clone()
        .ok_or_else(|| anyhow!("--keyword is required"))?;
    let query = RankingQuery::new(keyword)?;

    let progress: Box<dyn ProgressNotifier> = if cli.quiet || format == OutputFormat::Json {
        Box::new(NoProgress)
    } else if !std::io::stderr().is_terminal() {
        Box::new(SimpleProgress)
    } else if cli.all_models {
        Box::new(ProgressReporter::with_label("Sweeping models"))
    } else {
        Box::new(ProgressReporter::new())
    };

    if cli.all_models {
        let (catalog, _) = config.sources.parse_catalog();
        let mut input = ModelSweepInput::new(query, sources).with_params(params);
        input.catalog = catalog;

        let mut use_case = ModelSweepUseCase::new(registry, aggregator).with_extractor(extractor);
        if let Some(logger) = &run_logger {
            use_case = use_case.with_logger(logger.clone());
        }

        let output = use_case
            .execute_with_progress(input, progress.as_ref())
            .await?;

        let rendered = match format {
            OutputFormat::Json => ConsoleFormatter::format_sweep_json(&output),
            OutputFormat::Full | OutputFormat::Summary => ConsoleFormatter::format_sweep(&output),
        };
        println!("{}", rendered);

        if let Some(path) = &cli.export_csv {
            let rows = write_sweep_csv(path, &output)
                .with_context(|| format!("failed to export CSV to {}", path.display()))?;
            note(&cli, format!("Exported {} rows to {}", rows, path.display()));
        }
        if let Some(path) = &cli.export_json {
            write_sweep_json(path, &output, chrono::Utc::now())
                .with_context(|| format!("failed to export JSON to {}", path.display()))?;
            note(&cli, format!("Exported JSON to {}", path.display()));
        }
        return Ok(());
    }

    let mut input = RunRankingInput::new(query, sources).with_params(params);
    for (source, model) in cli.model_overrides() {
        input = input.with_model(source, model);
    }

    let mut runner = RunRankingUseCase::new(registry).with_extractor(extractor);
    if let Some(logger) = &run_logger {
        runner = runner.with_logger(logger.clone());
    }
    let mut use_case = CompareRankingsUseCase::new(runner, aggregator);
    if let Some(logger) = &run_logger {
        use_case = use_case.with_logger(logger.clone());
    }

    let output = use_case
        .execute_with_progress(input, progress.as_ref())
        .await?;

    let rendered = match format {
        OutputFormat::Full => ConsoleFormatter::format(&output),
        OutputFormat::Summary => ConsoleFormatter::format_summary(&output),
        OutputFormat::Json => ConsoleFormatter::format_json(&output),
    };
    println!("{}", rendered);

    if let Some(path) = &cli.export_csv {
        let rows = write_csv(path, &output)
            .with_context(|| format!("failed to export CSV to {}", path.display()))?;
        note(&cli, format!("Exported {} rows to {}", rows, path.display()));
    }
    if let Some(path) = &cli.export_json {
        write_json(path, &output)
            .with_context(|| format!("failed to export JSON to {}", path.display()))?;
        note(&cli, format!("Exported JSON to {}", path.display()));
    }

    Ok(())
}

/// Initialize logging based on verbosity level.
///
/// With `--log-file` diagnostics go to the file instead of stderr; the
/// returned guard flushes it on drop.
fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match &cli.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            builder.with_writer(writer).with_ansi(false).init();
            Ok(Some(guard))
        }
        None => {
            builder.with_writer(std::io::stderr).init();
            Ok(None)
        }
    }
}

/// Status line on stderr so stdout stays parseable
fn note(cli: &Cli, message: String) {
    if !cli.quiet {
        eprintln!("{}", message);
    }
}
