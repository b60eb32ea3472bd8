//! Value serialization for capture logs.
//!
//! Captured values are written as self-describing tagged JSON objects
//! (`{"type": ..., "data": ...}`) so the judge can reconstruct typed results
//! without knowing the submission language. Oracle verdicts and exception
//! payloads have their own envelopes.

use crate::error::SubmissionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;

/// A captured result value of the submission.
///
/// The variant set mirrors the types a grading oracle can compare across
/// languages; anything richer must be lowered to a sequence or text by the
/// submission adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Rational(f64),
    Text(String),
    Sequence(Vec<Value>),
    Nothing,
}

impl fmt::Display for Value {
    /// Human-readable rendering, used for the `readable_*` fields of an
    /// [`Evaluation`]. Not machine-parsable; the JSON form is.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Rational(r) => write!(f, "{}", r),
            Value::Text(s) => f.write_str(s),
            Value::Sequence(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Nothing => f.write_str("nothing"),
        }
    }
}

/// Verdict of a case-specific oracle: produced when a test case configures an
/// expected value, so the harness evaluates the result before recording it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub result: bool,
    pub readable_expected: String,
    pub readable_actual: String,
    pub messages: Vec<String>,
}

impl Evaluation {
    /// Compare an actual value against the expected one.
    pub fn compare(expected: &Value, actual: &Value) -> Self {
        let result = expected == actual;
        let messages = if result {
            Vec::new()
        } else {
            vec![format!("expected {}, got {}", expected, actual)]
        };
        Evaluation {
            result,
            readable_expected: expected.to_string(),
            readable_actual: actual.to_string(),
            messages,
        }
    }
}

/// Serialized form of an exceptional outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExceptionRecord {
    /// Exception class, e.g. "panic" or "exit".
    #[serde(rename = "class")]
    pub kind: String,
    pub message: String,
}

impl From<&SubmissionError> for ExceptionRecord {
    fn from(err: &SubmissionError) -> Self {
        let kind = match err {
            SubmissionError::Raised { kind, .. } => kind.clone(),
            SubmissionError::NonZeroExit(_) => "exit".to_string(),
            SubmissionError::Launch { .. } => "launch".to_string(),
            SubmissionError::Capture(_) => "capture".to_string(),
            SubmissionError::Unsupported(_) => "unsupported".to_string(),
        };
        ExceptionRecord {
            kind,
            message: err.to_string(),
        }
    }
}

/// External serializer collaborator: converts captured outcomes to the
/// textual form that goes into the capture logs.
pub trait ValueSerializer {
    /// Write a raw literal value.
    fn write_value(&self, out: &mut dyn Write, value: &Value) -> std::io::Result<()>;

    /// Write an oracle verdict (a value that required evaluation first).
    fn write_evaluated(&self, out: &mut dyn Write, evaluation: &Evaluation) -> std::io::Result<()>;

    /// Write an exception payload.
    fn write_exception(&self, out: &mut dyn Write, record: &ExceptionRecord)
        -> std::io::Result<()>;
}

/// The shipped serializer: compact JSON, one record per write.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSerializer;

impl ValueSerializer for JsonSerializer {
    fn write_value(&self, out: &mut dyn Write, value: &Value) -> std::io::Result<()> {
        serde_json::to_writer(out, value).map_err(std::io::Error::from)
    }

    fn write_evaluated(&self, out: &mut dyn Write, evaluation: &Evaluation) -> std::io::Result<()> {
        serde_json::to_writer(out, evaluation).map_err(std::io::Error::from)
    }

    fn write_exception(
        &self,
        out: &mut dyn Write,
        record: &ExceptionRecord,
    ) -> std::io::Result<()> {
        serde_json::to_writer(out, record).map_err(std::io::Error::from)
    }
}
