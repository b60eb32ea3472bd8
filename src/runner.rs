//! Context runner: executes one context's test cases against a submission
//! and records the outcomes.
//!
//! The runner owns the context's two log files for the duration of the run.
//! Lifecycle is `open` (creates both logs, truncating) followed by a single
//! `run` that consumes the runner, so a completed run can never be restarted
//! on the same handles. Files are released on every exit path by RAII.

use crate::context::{Context, Invocation, TestCase};
use crate::error::{HarnessError, SubmissionError};
use crate::separator;
use crate::submission::Submission;
use crate::types::ContextId;
use crate::values::{Evaluation, ExceptionRecord, Value, ValueSerializer};
use std::fs::File;
use std::io::Write;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use tracing::{debug, info, warn};

/// Outcome of one test-case execution: exactly one of a captured value or a
/// recorded exception.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseDisposition {
    Value,
    Exception,
}

/// Summary of a completed context run, for callers deciding exit status.
#[derive(Debug)]
pub struct ContextReport {
    context_id: ContextId,
    dispositions: Vec<CaseDisposition>,
    entry_point_failed: bool,
}

impl ContextReport {
    pub fn context_id(&self) -> &ContextId {
        &self.context_id
    }

    /// Per-case outcomes, in execution order. Empty for entry-point style.
    pub fn dispositions(&self) -> &[CaseDisposition] {
        &self.dispositions
    }

    pub fn values_captured(&self) -> usize {
        self.dispositions
            .iter()
            .filter(|d| **d == CaseDisposition::Value)
            .count()
    }

    pub fn exceptions_recorded(&self) -> usize {
        let cases = self
            .dispositions
            .iter()
            .filter(|d| **d == CaseDisposition::Exception)
            .count();
        cases + usize::from(self.entry_point_failed)
    }

    /// True when an entry-point invocation raised: there was no further case
    /// to recover into, so the run ended on the exception.
    pub fn entry_point_failed(&self) -> bool {
        self.entry_point_failed
    }
}

/// Binds value-capture calls made inside a submission to the active
/// context's value log. Threaded explicitly through entry-point invocations
/// instead of relying on ambient global handles.
pub struct CaptureHandle<'a> {
    value_log: &'a mut dyn Write,
    serializer: &'a dyn ValueSerializer,
}

impl<'a> CaptureHandle<'a> {
    pub fn new(value_log: &'a mut dyn Write, serializer: &'a dyn ValueSerializer) -> Self {
        CaptureHandle {
            value_log,
            serializer,
        }
    }

    /// Record a raw literal value.
    pub fn send_value(&mut self, value: &Value) -> Result<(), SubmissionError> {
        self.serializer
            .write_value(self.value_log, value)
            .map_err(SubmissionError::Capture)
    }

    /// Record an oracle verdict.
    pub fn send_evaluated(&mut self, evaluation: &Evaluation) -> Result<(), SubmissionError> {
        self.serializer
            .write_evaluated(self.value_log, evaluation)
            .map_err(SubmissionError::Capture)
    }
}

/// Runs one context to completion. Owns the context's log-file pair.
pub struct ContextRunner {
    context: Context,
    value_log: File,
    exception_log: File,
}

impl ContextRunner {
    /// Open both log files in write (truncate) mode inside `output_dir`.
    /// Failure to create either file is fatal for the run; nothing has been
    /// written to any channel at that point.
    pub fn open(context: Context, output_dir: &Path) -> Result<Self, HarnessError> {
        let values_path = output_dir.join(context.values_file_name());
        let exceptions_path = output_dir.join(context.exceptions_file_name());

        let value_log = File::create(&values_path).map_err(|source| HarnessError::LogCreate {
            path: values_path.clone(),
            source,
        })?;
        let exception_log =
            File::create(&exceptions_path).map_err(|source| HarnessError::LogCreate {
                path: exceptions_path.clone(),
                source,
            })?;

        debug!(context = %context.id(), ?values_path, ?exceptions_path, "opened capture logs");
        Ok(ContextRunner {
            context,
            value_log,
            exception_log,
        })
    }

    /// Execute the context against the submission.
    ///
    /// Writes the entry separator first (even for zero cases), then one
    /// separator per test case before its invocation. A submission exception
    /// in a function-style case is recorded and never aborts sibling cases;
    /// an entry-point exception is recorded and ends the run, since no
    /// further case exists to recover into. Consuming `self` guarantees the
    /// logs are flushed and closed on all exit paths and that a completed
    /// runner cannot be re-run.
    pub fn run(
        mut self,
        submission: &dyn Submission,
        serializer: &dyn ValueSerializer,
    ) -> Result<ContextReport, HarnessError> {
        info!(context = %self.context.id(), cases = self.context.case_count(), "running context");

        // Entry marker: anchors parsers expecting at least one boundary per
        // context, and for a non-empty case list sits adjacent to the first
        // case marker.
        self.mark()?;

        let invocation = self.context.invocation().clone();
        let mut dispositions = Vec::new();
        let mut entry_point_failed = false;

        match invocation {
            Invocation::Function(cases) => {
                for (index, case) in cases.iter().enumerate() {
                    self.mark()?;
                    let disposition = self.run_case(index, case, submission, serializer)?;
                    dispositions.push(disposition);
                }
            }
            Invocation::EntryPoint(args) => {
                let outcome = {
                    let mut capture = CaptureHandle::new(&mut self.value_log, serializer);
                    contain(|| submission.run_main(&args, &mut capture))
                };
                if let Err(exception) = outcome {
                    warn!(context = %self.context.id(), %exception, "entry point raised");
                    self.record_exception(&exception, serializer)?;
                    entry_point_failed = true;
                }
            }
        }

        self.value_log.flush().map_err(HarnessError::ChannelWrite)?;
        self.exception_log
            .flush()
            .map_err(HarnessError::ChannelWrite)?;

        let report = ContextReport {
            context_id: self.context.id().clone(),
            dispositions,
            entry_point_failed,
        };
        info!(
            context = %report.context_id,
            values = report.values_captured(),
            exceptions = report.exceptions_recorded(),
            "context completed"
        );
        Ok(report)
    }

    fn run_case(
        &mut self,
        index: usize,
        case: &TestCase,
        submission: &dyn Submission,
        serializer: &dyn ValueSerializer,
    ) -> Result<CaseDisposition, HarnessError> {
        match contain(|| submission.invoke(&case.input)) {
            Ok(value) => {
                match &case.expected {
                    Some(expected) => {
                        let evaluation = Evaluation::compare(expected, &value);
                        serializer
                            .write_evaluated(&mut self.value_log, &evaluation)
                            .map_err(HarnessError::ChannelWrite)?;
                    }
                    None => {
                        serializer
                            .write_value(&mut self.value_log, &value)
                            .map_err(HarnessError::ChannelWrite)?;
                    }
                }
                Ok(CaseDisposition::Value)
            }
            Err(exception) => {
                debug!(context = %self.context.id(), case = index, %exception, "case raised");
                self.record_exception(&exception, serializer)?;
                Ok(CaseDisposition::Exception)
            }
        }
    }

    fn record_exception(
        &mut self,
        exception: &SubmissionError,
        serializer: &dyn ValueSerializer,
    ) -> Result<(), HarnessError> {
        let record = ExceptionRecord::from(exception);
        serializer
            .write_exception(&mut self.exception_log, &record)
            .map_err(HarnessError::ChannelWrite)
    }

    /// Write the context's separator token to all four channels.
    fn mark(&mut self) -> Result<(), HarnessError> {
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        let mut out = stdout.lock();
        let mut err = stderr.lock();
        let mut destinations: [&mut dyn Write; 4] = [
            &mut self.value_log,
            &mut self.exception_log,
            &mut out,
            &mut err,
        ];
        separator::mark(self.context.token(), &mut destinations)
            .map_err(HarnessError::ChannelWrite)
    }
}

/// Contain a submission invocation at the call-site boundary: a panic inside
/// the submission becomes a recorded exceptional outcome instead of
/// unwinding through the runner.
fn contain<T>(f: impl FnOnce() -> Result<T, SubmissionError>) -> Result<T, SubmissionError> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let message = if let Some(s) = payload.downcast_ref::<&str>() {
                (*s).to_string()
            } else if let Some(s) = payload.downcast_ref::<String>() {
                s.clone()
            } else {
                "opaque panic payload".to_string()
            };
            Err(SubmissionError::raised("panic", message))
        }
    }
}
