//! End-to-end capture protocol tests for the context runner.
//!
//! Logs are parsed the way a downstream judge does: by scanning for
//! separator-token occurrences and treating the text between tokens as one
//! case's record.

use proctor::context::{Context, TestCase};
use proctor::error::SubmissionError;
use proctor::runner::{CaptureHandle, CaseDisposition, ContextRunner};
use proctor::submission::{EchoSubmission, FnSubmission, Submission};
use proctor::types::ContextId;
use proctor::values::{Evaluation, JsonSerializer, Value};
use tempfile::TempDir;

/// Split a log into the per-boundary segments following each token.
fn segments(log: &str, token: &str) -> Vec<String> {
    let parts: Vec<String> = log.split(token).map(str::to_string).collect();
    assert!(
        !parts.is_empty() && parts[0].is_empty(),
        "log must start with a separator, got: {:?}",
        log
    );
    parts[1..].to_vec()
}

fn read_logs(dir: &TempDir, id: &str) -> (String, String) {
    let values = std::fs::read_to_string(dir.path().join(format!("{}_values.txt", id))).unwrap();
    let exceptions =
        std::fs::read_to_string(dir.path().join(format!("{}_exceptions.txt", id))).unwrap();
    (values, exceptions)
}

#[test]
fn test_scenario_echo_function_two_cases() {
    let temp = TempDir::new().unwrap();
    let ctx = Context::function(
        ContextId::new("X1").unwrap(),
        vec![
            TestCase::literal(Value::Text("a".to_string())),
            TestCase::literal(Value::Text("b".to_string())),
        ],
    );
    let token = ctx.token().as_str().to_string();

    let runner = ContextRunner::open(ctx, temp.path()).unwrap();
    let report = runner.run(&EchoSubmission, &JsonSerializer).unwrap();

    assert_eq!(report.values_captured(), 2);
    assert_eq!(report.exceptions_recorded(), 0);

    let (values, exceptions) = read_logs(&temp, "X1");

    // Value log: entry marker, case marker, value("a"), case marker,
    // value("b"). The first two tokens are adjacent.
    let value_segments = segments(&values, &token);
    assert_eq!(value_segments.len(), 3);
    assert_eq!(value_segments[0], "");
    assert_eq!(
        serde_json::from_str::<Value>(&value_segments[1]).unwrap(),
        Value::Text("a".to_string())
    );
    assert_eq!(
        serde_json::from_str::<Value>(&value_segments[2]).unwrap(),
        Value::Text("b".to_string())
    );

    // Exception log: three separators, no records.
    assert_eq!(exceptions.matches(&token).count(), 3);
    for segment in segments(&exceptions, &token) {
        assert_eq!(segment, "");
    }
}

#[test]
fn test_raising_case_recorded_and_siblings_continue() {
    let temp = TempDir::new().unwrap();
    let ctx = Context::function(
        ContextId::new("R1").unwrap(),
        vec![
            TestCase::literal(Value::Text("ok".to_string())),
            TestCase::literal(Value::Text("bad".to_string())),
            TestCase::literal(Value::Text("ok".to_string())),
        ],
    );
    let token = ctx.token().as_str().to_string();

    let submission = FnSubmission::new(|input: &Value| match input {
        Value::Text(s) if s == "bad" => Err(SubmissionError::raised("ValueError", "bad input")),
        other => Ok(other.clone()),
    });

    let runner = ContextRunner::open(ctx, temp.path()).unwrap();
    let report = runner.run(&submission, &JsonSerializer).unwrap();

    assert_eq!(
        report.dispositions(),
        &[
            CaseDisposition::Value,
            CaseDisposition::Exception,
            CaseDisposition::Value
        ]
    );

    let (values, exceptions) = read_logs(&temp, "R1");

    // The raising case leaves its value-log slot empty and puts exactly one
    // record in the matching exception-log slot.
    let value_segments = segments(&values, &token);
    assert_eq!(value_segments.len(), 4);
    assert!(!value_segments[1].is_empty());
    assert_eq!(value_segments[2], "");
    assert!(!value_segments[3].is_empty());

    let exception_segments = segments(&exceptions, &token);
    assert_eq!(exception_segments.len(), 4);
    assert_eq!(exception_segments[1], "");
    let record: serde_json::Value = serde_json::from_str(&exception_segments[2]).unwrap();
    assert_eq!(record["class"], "ValueError");
    assert_eq!(exception_segments[3], "");
}

#[test]
fn test_panicking_submission_is_contained() {
    let temp = TempDir::new().unwrap();
    let ctx = Context::function(
        ContextId::new("P1").unwrap(),
        vec![
            TestCase::literal(Value::Integer(1)),
            TestCase::literal(Value::Integer(2)),
        ],
    );
    let token = ctx.token().as_str().to_string();

    let submission = FnSubmission::new(|input: &Value| match input {
        Value::Integer(1) => panic!("submission exploded"),
        other => Ok(other.clone()),
    });

    let runner = ContextRunner::open(ctx, temp.path()).unwrap();
    let report = runner.run(&submission, &JsonSerializer).unwrap();

    // The panic is contained at the invocation boundary; the second case
    // still runs.
    assert_eq!(
        report.dispositions(),
        &[CaseDisposition::Exception, CaseDisposition::Value]
    );

    let (_, exceptions) = read_logs(&temp, "P1");
    let exception_segments = segments(&exceptions, &token);
    let record: serde_json::Value = serde_json::from_str(&exception_segments[1]).unwrap();
    assert_eq!(record["class"], "panic");
    assert!(record["message"]
        .as_str()
        .unwrap()
        .contains("submission exploded"));
}

#[test]
fn test_zero_cases_still_writes_entry_marker() {
    let temp = TempDir::new().unwrap();
    let ctx = Context::function(ContextId::new("Z1").unwrap(), vec![]);
    let token = ctx.token().as_str().to_string();

    let runner = ContextRunner::open(ctx, temp.path()).unwrap();
    let report = runner.run(&EchoSubmission, &JsonSerializer).unwrap();
    assert_eq!(report.dispositions().len(), 0);

    let (values, exceptions) = read_logs(&temp, "Z1");
    assert_eq!(values, token);
    assert_eq!(exceptions, token);
}

#[test]
fn test_evaluated_case_records_verdict() {
    let temp = TempDir::new().unwrap();
    let ctx = Context::function(
        ContextId::new("E1").unwrap(),
        vec![
            TestCase::evaluated(Value::Integer(1), Value::Integer(1)),
            TestCase::evaluated(Value::Integer(2), Value::Integer(5)),
        ],
    );
    let token = ctx.token().as_str().to_string();

    let runner = ContextRunner::open(ctx, temp.path()).unwrap();
    runner.run(&EchoSubmission, &JsonSerializer).unwrap();

    let (values, _) = read_logs(&temp, "E1");
    let value_segments = segments(&values, &token);
    let pass: Evaluation = serde_json::from_str(&value_segments[1]).unwrap();
    assert!(pass.result);
    let fail: Evaluation = serde_json::from_str(&value_segments[2]).unwrap();
    assert!(!fail.result);
    assert_eq!(fail.readable_expected, "5");
    assert_eq!(fail.readable_actual, "2");
}

/// Entry point that emits one value through the capture handle, the way a
/// generated submission body does.
struct EmittingMain;

impl Submission for EmittingMain {
    fn run_main(
        &self,
        args: &[String],
        capture: &mut CaptureHandle<'_>,
    ) -> Result<(), SubmissionError> {
        assert_eq!(args[0], "solution");
        capture.send_value(&Value::Text("from main".to_string()))?;
        Ok(())
    }
}

#[test]
fn test_scenario_entry_point_clean_run() {
    let temp = TempDir::new().unwrap();
    let ctx = Context::entry_point(
        ContextId::new("X2").unwrap(),
        vec!["solution".to_string()],
    )
    .unwrap();
    let token = ctx.token().as_str().to_string();

    let runner = ContextRunner::open(ctx, temp.path()).unwrap();
    let report = runner.run(&EmittingMain, &JsonSerializer).unwrap();
    assert!(!report.entry_point_failed());
    assert_eq!(report.exceptions_recorded(), 0);

    let (values, exceptions) = read_logs(&temp, "X2");
    // One separator each; the value log additionally carries whatever the
    // entry point emitted through the handle.
    assert_eq!(values.matches(&token).count(), 1);
    assert_eq!(exceptions, token);
    let body = values.strip_prefix(&token).unwrap();
    assert_eq!(
        serde_json::from_str::<Value>(body).unwrap(),
        Value::Text("from main".to_string())
    );
}

struct RaisingMain;

impl Submission for RaisingMain {
    fn run_main(
        &self,
        _args: &[String],
        _capture: &mut CaptureHandle<'_>,
    ) -> Result<(), SubmissionError> {
        Err(SubmissionError::raised("RuntimeError", "no such file"))
    }
}

#[test]
fn test_entry_point_exception_ends_run_but_is_recorded() {
    let temp = TempDir::new().unwrap();
    let ctx = Context::entry_point(
        ContextId::new("X3").unwrap(),
        vec!["solution".to_string()],
    )
    .unwrap();
    let token = ctx.token().as_str().to_string();

    let runner = ContextRunner::open(ctx, temp.path()).unwrap();
    let report = runner.run(&RaisingMain, &JsonSerializer).unwrap();
    assert!(report.entry_point_failed());
    assert_eq!(report.exceptions_recorded(), 1);

    let (values, exceptions) = read_logs(&temp, "X3");
    assert_eq!(values, token);
    let body = exceptions.strip_prefix(&token).unwrap();
    let record: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(record["class"], "RuntimeError");
}

#[test]
fn test_unwritable_output_fails_before_any_separator() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("not-created");
    let ctx = Context::function(
        ContextId::new("F1").unwrap(),
        vec![TestCase::literal(Value::Nothing)],
    );

    assert!(ContextRunner::open(ctx, &missing).is_err());

    // No half-created file pair: neither log exists.
    assert!(!missing.join("F1_values.txt").exists());
    assert!(!missing.join("F1_exceptions.txt").exists());
}
