//! Suite loading and batch execution.
//!
//! A suite manifest is a JSON document listing contexts in order. Harness
//! generation happens at load time: contexts without an explicit id get a
//! fresh unique one, which fixes their separator token and log file names.
//! Running a suite executes each context independently; each owns a disjoint
//! log-file pair, so there is no shared mutable state between contexts.

use crate::context::{Context, TestCase};
use crate::error::HarnessError;
use crate::runner::{ContextReport, ContextRunner};
use crate::submission::{CommandSubmission, SubmissionRegistry};
use crate::types::ContextId;
use crate::values::{JsonSerializer, Value};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// How a context's submission is resolved at run time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionSpec {
    /// Resolve a function-style submission from the registry by name.
    Named(String),
    /// Entry-point context driven by the externally supplied program.
    ExternalCommand,
}

/// One context plus the way its submission is resolved.
#[derive(Debug, Clone)]
pub struct SuiteEntry {
    context: Context,
    submission: SubmissionSpec,
}

impl SuiteEntry {
    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn submission(&self) -> &SubmissionSpec {
        &self.submission
    }
}

/// Everything a suite run needs besides the suite itself.
pub struct RunOptions<'a> {
    /// Directory receiving every context's log-file pair.
    pub output_dir: &'a Path,
    /// Named function-style submissions.
    pub registry: &'a SubmissionRegistry,
    /// Program backing entry-point contexts that do not name a registered
    /// submission.
    pub command: Option<&'a Path>,
}

/// An ordered collection of contexts loaded from a manifest.
#[derive(Debug)]
pub struct Suite {
    entries: Vec<SuiteEntry>,
}

impl Suite {
    /// Load and validate a manifest file.
    pub fn from_manifest_file(path: &Path) -> Result<Self, HarnessError> {
        let text = std::fs::read_to_string(path).map_err(|source| HarnessError::ManifestRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_manifest_str(&text)
    }

    /// Parse and validate a manifest from its JSON text.
    pub fn from_manifest_str(text: &str) -> Result<Self, HarnessError> {
        let manifest: SuiteManifest = serde_json::from_str(text)?;
        let mut entries = Vec::with_capacity(manifest.contexts.len());
        for context in manifest.contexts {
            entries.push(context.into_entry()?);
        }
        Ok(Suite { entries })
    }

    pub fn entries(&self) -> &[SuiteEntry] {
        &self.entries
    }

    /// Run every context in order. Resource errors (log creation, channel
    /// writes) are fatal and stop the batch at the failing context.
    pub fn run_all(&self, options: &RunOptions<'_>) -> Result<Vec<ContextReport>, HarnessError> {
        info!(contexts = self.entries.len(), "running suite");
        self.entries
            .iter()
            .map(|entry| self.run_entry(entry, options))
            .collect()
    }

    /// Run exactly one context selected by id. Selecting an id the suite
    /// does not define is an error.
    pub fn run_context(
        &self,
        id: &str,
        options: &RunOptions<'_>,
    ) -> Result<ContextReport, HarnessError> {
        let entry = self
            .entries
            .iter()
            .find(|entry| entry.context.id().as_str() == id)
            .ok_or_else(|| HarnessError::UnknownContext(id.to_string()))?;
        self.run_entry(entry, options)
    }

    fn run_entry(
        &self,
        entry: &SuiteEntry,
        options: &RunOptions<'_>,
    ) -> Result<ContextReport, HarnessError> {
        let serializer = JsonSerializer;
        let runner = ContextRunner::open(entry.context.clone(), options.output_dir)?;
        match &entry.submission {
            SubmissionSpec::Named(name) => {
                let submission = options.registry.resolve(name)?;
                runner.run(submission.as_ref(), &serializer)
            }
            SubmissionSpec::ExternalCommand => {
                let program = options.command.ok_or_else(|| {
                    HarnessError::MissingSubmission(entry.context.id().to_string())
                })?;
                let submission = CommandSubmission::new(program);
                runner.run(&submission, &serializer)
            }
        }
    }
}

fn default_arguments() -> Vec<String> {
    vec!["solution".to_string()]
}

#[derive(Debug, Deserialize)]
struct SuiteManifest {
    #[serde(default)]
    contexts: Vec<ContextManifest>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ContextManifest {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    submission: Option<String>,
    #[serde(default)]
    cases: Option<Vec<CaseManifest>>,
    #[serde(default)]
    entry_point: Option<EntryPointManifest>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CaseManifest {
    input: Value,
    #[serde(default)]
    expected: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EntryPointManifest {
    #[serde(default = "default_arguments")]
    arguments: Vec<String>,
}

impl ContextManifest {
    fn into_entry(self) -> Result<SuiteEntry, HarnessError> {
        let id = match self.id {
            Some(id) => ContextId::new(id)?,
            None => ContextId::generate(),
        };

        match (self.cases, self.entry_point) {
            (Some(_), Some(_)) => Err(HarnessError::InvalidManifest(format!(
                "context '{}' defines both cases and an entry point",
                id
            ))),
            (None, None) => Err(HarnessError::InvalidManifest(format!(
                "context '{}' defines neither cases nor an entry point",
                id
            ))),
            (Some(cases), None) => {
                let submission = self.submission.ok_or_else(|| {
                    HarnessError::InvalidManifest(format!(
                        "function-style context '{}' names no submission",
                        id
                    ))
                })?;
                let cases = cases
                    .into_iter()
                    .map(|case| TestCase {
                        input: case.input,
                        expected: case.expected,
                    })
                    .collect();
                Ok(SuiteEntry {
                    context: Context::function(id, cases),
                    submission: SubmissionSpec::Named(submission),
                })
            }
            (None, Some(entry_point)) => {
                let context = Context::entry_point(id, entry_point.arguments)?;
                let submission = match self.submission {
                    Some(name) => SubmissionSpec::Named(name),
                    None => SubmissionSpec::ExternalCommand,
                };
                Ok(SuiteEntry {
                    context,
                    submission,
                })
            }
        }
    }
}
