//! Core identifier types for contexts.

use crate::error::HarnessError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Number of characters kept from a generated UUID when minting a fresh id.
/// Long enough that collisions across the contexts of one judge run are not
/// a practical concern, short enough to keep file names readable.
const GENERATED_ID_LEN: usize = 12;

/// Unique identifier for one context (one exercise/test-unit definition).
///
/// The id doubles as the collision-avoidance secret of the run: the separator
/// token and both log file names are derived from it, so two contexts with
/// distinct ids can never write to each other's files or produce each other's
/// boundary markers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextId(String);

impl ContextId {
    /// Create an id from a caller-supplied token. Must be non-empty ASCII
    /// alphanumeric so the derived file names and separator token stay
    /// unambiguous.
    pub fn new(id: impl Into<String>) -> Result<Self, HarnessError> {
        let id = id.into();
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(HarnessError::InvalidContextId(id));
        }
        Ok(ContextId(id))
    }

    /// Mint a fresh unique id from a random UUID.
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        ContextId(hex[..GENERATED_ID_LEN].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of this context's value log.
    pub fn values_file_name(&self) -> String {
        format!("{}_values.txt", self.0)
    }

    /// File name of this context's exception log.
    pub fn exceptions_file_name(&self) -> String {
        format!("{}_exceptions.txt", self.0)
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
