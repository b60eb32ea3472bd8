//! Context definitions: one exercise's identity, test cases, and invocation
//! style. Instantiated at harness-generation time and immutable afterwards;
//! one context maps to exactly one runnable unit owning a disjoint pair of
//! log files.

use crate::error::HarnessError;
use crate::separator::SeparatorToken;
use crate::types::ContextId;
use crate::values::Value;
use serde::{Deserialize, Serialize};

/// One input to be run through the submission, producing one capture record.
///
/// A case with an `expected` value is an evaluated case: the runner compares
/// the produced value against it and records the verdict via
/// `write_evaluated`. Without one, the produced value is recorded verbatim
/// via `write_value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub input: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<Value>,
}

impl TestCase {
    /// A case whose produced value is recorded as a raw literal.
    pub fn literal(input: Value) -> Self {
        TestCase {
            input,
            expected: None,
        }
    }

    /// A case whose produced value is evaluated against `expected` before
    /// recording.
    pub fn evaluated(input: Value, expected: Value) -> Self {
        TestCase {
            input,
            expected: Some(expected),
        }
    }
}

/// How the submission is driven for a context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Invocation {
    /// Invoke a fixed callable once per test case, in order.
    Function(Vec<TestCase>),
    /// Invoke the submission's entry point exactly once with this argument
    /// vector. The first element is the conventional program-name
    /// placeholder, as for any command-line program.
    EntryPoint(Vec<String>),
}

/// One exercise/test-unit definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Context {
    id: ContextId,
    token: SeparatorToken,
    invocation: Invocation,
}

impl Context {
    /// Function-style context: each case's input goes to a fixed callable.
    pub fn function(id: ContextId, cases: Vec<TestCase>) -> Self {
        let token = SeparatorToken::for_context(&id);
        Context {
            id,
            token,
            invocation: Invocation::Function(cases),
        }
    }

    /// Entry-point-style context: a single command-line-style invocation.
    /// The argument vector must carry at least the program-name placeholder.
    pub fn entry_point(id: ContextId, arguments: Vec<String>) -> Result<Self, HarnessError> {
        if arguments.is_empty() {
            return Err(HarnessError::InvalidManifest(format!(
                "entry-point context '{}' has an empty argument vector",
                id
            )));
        }
        let token = SeparatorToken::for_context(&id);
        Ok(Context {
            id,
            token,
            invocation: Invocation::EntryPoint(arguments),
        })
    }

    pub fn id(&self) -> &ContextId {
        &self.id
    }

    pub fn token(&self) -> &SeparatorToken {
        &self.token
    }

    pub fn invocation(&self) -> &Invocation {
        &self.invocation
    }

    /// Number of configured test cases (zero for entry-point style, which is
    /// a single invocation rather than an enumerated case list).
    pub fn case_count(&self) -> usize {
        match &self.invocation {
            Invocation::Function(cases) => cases.len(),
            Invocation::EntryPoint(_) => 0,
        }
    }

    pub fn values_file_name(&self) -> String {
        self.id.values_file_name()
    }

    pub fn exceptions_file_name(&self) -> String {
        self.id.exceptions_file_name()
    }
}
