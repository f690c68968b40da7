//! Build pipeline error types.
//!
//! Every variant here is fatal: the orchestrator removes the partially
//! written output root and `main` exits non-zero. Recoverable conditions
//! (minifier warnings, optional inputs that are absent) never become a
//! `BuildError`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    /// A source whose presence is mandatory does not exist.
    #[error("required source `{0}` not found")]
    MissingSource(PathBuf),

    #[error("IO error at `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("CSS parse error in `{path}`: {message}")]
    CssParse { path: PathBuf, message: String },

    #[error("failed to serialize CSS from `{path}`: {message}")]
    CssPrint { path: PathBuf, message: String },

    #[error("JavaScript parse error in `{path}`: {message}")]
    ScriptParse { path: PathBuf, message: String },

    #[error("failed to rewrite `{path}`: {message}")]
    Rewrite { path: PathBuf, message: String },
}

impl BuildError {
    /// Wrap an IO error with the path that caused it.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io(path.into(), err)
    }
}
