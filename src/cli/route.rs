//! CLI route: dispatches parsed commands to the suite runner and formats
//! their results.

use crate::cli::parse::Commands;
use crate::config::{ConfigLoader, ProctorConfig};
use crate::context::Invocation;
use crate::error::HarnessError;
use crate::runner::ContextReport;
use crate::submission::SubmissionRegistry;
use crate::suite::{RunOptions, Suite, SubmissionSpec};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::info;

/// Runtime context for CLI execution: resolved configuration and the
/// registry of named submissions.
pub struct RunContext {
    config: ProctorConfig,
    registry: SubmissionRegistry,
}

impl RunContext {
    /// Create run context from an optional config path using ConfigLoader.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, HarnessError> {
        let config = ConfigLoader::load(config_path.as_deref())?;
        Ok(RunContext {
            config,
            registry: SubmissionRegistry::with_builtins(),
        })
    }

    /// Execute a parsed command and return its textual output.
    pub fn execute(&self, command: &Commands) -> Result<String, HarnessError> {
        match command {
            Commands::Run {
                suite,
                context,
                output_dir,
                submission,
            } => self.run_suite(suite, context.as_deref(), output_dir.as_deref(), submission.as_deref()),
            Commands::List { suite, format } => self.list_suite(suite, format),
        }
    }

    fn run_suite(
        &self,
        suite_path: &Path,
        context: Option<&str>,
        output_dir: Option<&Path>,
        submission: Option<&Path>,
    ) -> Result<String, HarnessError> {
        let suite = Suite::from_manifest_file(suite_path)?;
        let output_dir = output_dir.unwrap_or_else(|| self.config.output_dir.as_path());
        std::fs::create_dir_all(output_dir).map_err(|source| HarnessError::OutputDir {
            path: output_dir.to_path_buf(),
            source,
        })?;

        let options = RunOptions {
            output_dir,
            registry: &self.registry,
            command: submission,
        };

        let reports = match context {
            Some(id) => vec![suite.run_context(id, &options)?],
            None => suite.run_all(&options)?,
        };

        let mut lines = Vec::with_capacity(reports.len());
        let mut uncaught: Option<String> = None;
        for report in &reports {
            lines.push(format_report(report));
            if report.entry_point_failed() && uncaught.is_none() {
                uncaught = Some(report.context_id().to_string());
            }
        }
        info!(contexts = reports.len(), "suite run finished");

        // The exception is already in the context's exception log; surfacing
        // it through the exit status as well is a deliberate departure from
        // the always-zero reference behavior.
        if let Some(id) = uncaught {
            return Err(HarnessError::UncaughtException(id));
        }

        Ok(lines.join("\n"))
    }

    fn list_suite(&self, suite_path: &Path, format: &str) -> Result<String, HarnessError> {
        let suite = Suite::from_manifest_file(suite_path)?;
        match format {
            "json" => {
                let contexts: Vec<_> = suite
                    .entries()
                    .iter()
                    .map(|entry| {
                        let context = entry.context();
                        json!({
                            "id": context.id().as_str(),
                            "style": style_name(context.invocation()),
                            "cases": context.case_count(),
                            "values_file": context.values_file_name(),
                            "exceptions_file": context.exceptions_file_name(),
                            "submission": submission_name(entry.submission()),
                        })
                    })
                    .collect();
                serde_json::to_string_pretty(&json!({ "contexts": contexts }))
                    .map_err(HarnessError::ManifestParse)
            }
            "text" => {
                let mut lines = Vec::with_capacity(suite.entries().len());
                for entry in suite.entries() {
                    let context = entry.context();
                    lines.push(format!(
                        "{}  {}  {} case(s)  -> {}, {}",
                        context.id(),
                        style_name(context.invocation()),
                        context.case_count(),
                        context.values_file_name(),
                        context.exceptions_file_name(),
                    ));
                }
                Ok(lines.join("\n"))
            }
            other => Err(HarnessError::Config(format!(
                "Invalid list format: {} (must be 'text' or 'json')",
                other
            ))),
        }
    }
}

fn style_name(invocation: &Invocation) -> &'static str {
    match invocation {
        Invocation::Function(_) => "function",
        Invocation::EntryPoint(_) => "entry-point",
    }
}

fn submission_name(spec: &SubmissionSpec) -> String {
    match spec {
        SubmissionSpec::Named(name) => name.clone(),
        SubmissionSpec::ExternalCommand => "<external command>".to_string(),
    }
}

fn format_report(report: &ContextReport) -> String {
    format!(
        "context {}: {} value(s), {} exception(s)",
        report.context_id(),
        report.values_captured(),
        report.exceptions_recorded(),
    )
}
