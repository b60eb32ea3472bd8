//! Separator protocol: per-context boundary tokens.
//!
//! Each context writes the same token to four channels (value log, exception
//! log, stdout, stderr) at every test-case boundary. Downstream consumers
//! re-align the interleaved output by counting token occurrences per channel;
//! token content only distinguishes contexts, never cases within one.

use crate::types::ContextId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;

/// The boundary marker string of one context, derived from its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeparatorToken(String);

impl SeparatorToken {
    /// Token for a context: `--<id>-- SEP`. Because the id is unique across
    /// contexts, so is the token.
    pub fn for_context(id: &ContextId) -> Self {
        SeparatorToken(format!("--{}-- SEP", id.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeparatorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Write the token verbatim to every destination, then flush them all.
///
/// All writes must land for the mark to be complete; any failure is returned
/// to the caller and is fatal to the run (the files are owned for the whole
/// run and only closed at the end, so a dead channel cannot recover).
/// Calling this twice in succession is legal and produces two adjacent
/// markers, which is exactly the entry-marker pattern.
pub fn mark(token: &SeparatorToken, destinations: &mut [&mut dyn Write]) -> std::io::Result<()> {
    for dest in destinations.iter_mut() {
        dest.write_all(token.as_str().as_bytes())?;
    }
    for dest in destinations.iter_mut() {
        dest.flush()?;
    }
    Ok(())
}
