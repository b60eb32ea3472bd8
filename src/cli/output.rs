//! CLI output: maps domain errors to the message and exit status the
//! binary surfaces.

use crate::error::HarnessError;

/// Exit status for a failed invocation.
///
/// An uncaught entry-point exception is distinguished from harness faults
/// (bad manifests, unwritable logs, config problems) so batch callers can
/// tell "the submission failed" from "the run itself broke".
pub fn exit_code(e: &HarnessError) -> i32 {
    match e {
        HarnessError::UncaughtException(_) => 2,
        _ => 1,
    }
}

pub fn map_error(e: &HarnessError) -> String {
    e.to_string()
}
