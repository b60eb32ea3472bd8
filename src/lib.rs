//! Proctor: Test Harness Runner for Automated Grading
//!
//! Executes program submissions against per-exercise contexts and records
//! produced values and raised exceptions to per-context capture logs,
//! interleaved with unique separator tokens for downstream re-alignment.

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod runner;
pub mod separator;
pub mod submission;
pub mod suite;
pub mod types;
pub mod values;
