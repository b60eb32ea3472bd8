//! Submission interface: the opaque, untrusted unit of code under test.
//!
//! A submission is driven either as a fixed callable (once per test case) or
//! as a command-line-style entry point (once per context). Implementations
//! signal exceptional outcomes through [`SubmissionError`]; the runner
//! contains those at the invocation boundary and records them.

use crate::error::{HarnessError, SubmissionError};
use crate::runner::CaptureHandle;
use crate::values::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

/// The unit under test. A submission typically supports one of the two
/// invocation styles; the defaults reject the other.
pub trait Submission {
    /// Function-style invocation: run the fixed callable on one input.
    fn invoke(&self, _input: &Value) -> Result<Value, SubmissionError> {
        Err(SubmissionError::Unsupported("function"))
    }

    /// Entry-point-style invocation: run the program once. `args[0]` is the
    /// conventional program-name placeholder. The capture handle binds any
    /// value-capture calls made inside the submission to the active
    /// context's value log.
    fn run_main(
        &self,
        _args: &[String],
        _capture: &mut CaptureHandle<'_>,
    ) -> Result<(), SubmissionError> {
        Err(SubmissionError::Unsupported("entry point"))
    }
}

/// Adapter for plain closures as function-style submissions.
pub struct FnSubmission<F>(F);

impl<F> FnSubmission<F>
where
    F: Fn(&Value) -> Result<Value, SubmissionError>,
{
    pub fn new(f: F) -> Self {
        FnSubmission(f)
    }
}

impl<F> Submission for FnSubmission<F>
where
    F: Fn(&Value) -> Result<Value, SubmissionError>,
{
    fn invoke(&self, input: &Value) -> Result<Value, SubmissionError> {
        (self.0)(input)
    }
}

/// Built-in reference submission: returns its input unchanged. Used by the
/// CLI for manifest smoke runs and by the test suite.
#[derive(Debug, Default)]
pub struct EchoSubmission;

impl Submission for EchoSubmission {
    fn invoke(&self, input: &Value) -> Result<Value, SubmissionError> {
        Ok(input.clone())
    }
}

/// Entry-point submission backed by an external program.
///
/// The child is spawned with the context's argument vector minus the
/// program-name placeholder, with stdio inherited: whatever the submission
/// prints passes through uncontrolled, as the protocol requires. A spawn
/// failure or non-zero exit is the submission's exceptional outcome.
#[derive(Debug, Clone)]
pub struct CommandSubmission {
    program: PathBuf,
}

impl CommandSubmission {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        CommandSubmission {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Submission for CommandSubmission {
    fn run_main(
        &self,
        args: &[String],
        _capture: &mut CaptureHandle<'_>,
    ) -> Result<(), SubmissionError> {
        let extra = args.get(1..).unwrap_or(&[]);
        let status = Command::new(&self.program)
            .args(extra)
            .status()
            .map_err(|source| SubmissionError::Launch {
                program: self.program.display().to_string(),
                source,
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(SubmissionError::NonZeroExit(status.code().unwrap_or(-1)))
        }
    }
}

/// Named function-style submissions available to suite manifests.
pub struct SubmissionRegistry {
    entries: HashMap<String, Arc<dyn Submission>>,
}

impl SubmissionRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        SubmissionRegistry {
            entries: HashMap::new(),
        }
    }

    /// Registry pre-loaded with the built-in submissions (`echo`).
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("echo", Arc::new(EchoSubmission));
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, submission: Arc<dyn Submission>) {
        self.entries.insert(name.into(), submission);
    }

    pub fn resolve(&self, name: &str) -> Result<&Arc<dyn Submission>, HarnessError> {
        self.entries
            .get(name)
            .ok_or_else(|| HarnessError::UnknownSubmission(name.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for SubmissionRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
