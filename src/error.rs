//! Error taxonomy for the quality gate
//!
//! Input and configuration problems are reported before any analysis
//! runs. The analyzers themselves are pure and cannot fail on
//! well-formed input; a partial sub-check simply counts as a failed
//! check against its category.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GateError {
    #[error("cannot read document {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("document is empty{0}")]
    EmptyDocument(&'static str),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl GateError {
    pub fn config(msg: impl Into<String>) -> Self {
        GateError::Config(msg.into())
    }

    /// Exit code for the CLI: input/config errors are 1. Completed runs
    /// map elsewhere (0 accepted, 2 escalated).
    pub fn exit_code(&self) -> i32 {
        1
    }
}
