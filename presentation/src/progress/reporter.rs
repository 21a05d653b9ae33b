//! Progress reporting for ranking runs

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;
use tracker_application::ProgressNotifier;
use tracker_domain::SourceId;

/// Reports fan-out progress with a progress bar
pub struct ProgressReporter {
    multi: MultiProgress,
    bar: Mutex<Option<ProgressBar>>,
    label: String,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self::with_label("Querying sources")
    }

    /// Reporter whose bar is prefixed with `label` (e.g. "Sweeping models")
    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            multi: MultiProgress::new(),
            bar: Mutex::new(None),
            label: label.into(),
        }
    }

    fn fanout_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .map(|style| style.progress_chars("=>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_fanout_start(&self, total_sources: usize) {
        let pb = self.multi.add(ProgressBar::new(total_sources as u64));
        pb.set_style(Self::fanout_style());
        pb.set_prefix(self.label.clone());
        pb.set_message("Starting...");

        if let Ok(mut bar) = self.bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_source_start(&self, source: &SourceId, model: Option<&str>) {
        if let Ok(bar) = self.bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            match model {
                Some(model) => pb.set_message(format!("{} ({})", source.display_name(), model)),
                None => pb.set_message(source.display_name().to_string()),
            }
        }
    }

    fn on_source_complete(&self, source: &SourceId, success: bool) {
        if let Ok(bar) = self.bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            let status = if success {
                format!("{} {}", "v".green(), source.display_name())
            } else {
                format!("{} {}", "x".red(), source.display_name())
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_fanout_complete(&self) {
        if let Ok(mut bar) = self.bar.lock()
            && let Some(pb) = bar.take()
        {
            pb.finish_with_message(format!("{}", "done".green()));
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_fanout_start(&self, total_sources: usize) {
        println!(
            "{} {} ({} sources)",
            "->".cyan(),
            "Querying".bold(),
            total_sources
        );
    }

    fn on_source_complete(&self, source: &SourceId, success: bool) {
        if success {
            println!("  {} {}", "v".green(), source.display_name());
        } else {
            println!("  {} {} (failed)", "x".red(), source.display_name());
        }
    }

    fn on_fanout_complete(&self) {
        println!();
    }
}
