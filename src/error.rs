//! Error taxonomy for the header-to-markdown pipeline.
//!
//! Every variant is fatal. Nothing in the pipeline recovers from a
//! `DocError`; it is propagated to `main` and ends the run.

use crate::model::DocKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocError {
    #[error("{path}:{line} expected a documented declaration, got: {text}")]
    UnclassifiedLine {
        path: PathBuf,
        line: usize,
        text: String,
    },

    #[error("{path}:{line} {kind} block is never closed")]
    UnterminatedBlock {
        path: PathBuf,
        line: usize,
        kind: DocKind,
    },

    #[error("{path}:{line} cannot extract {kind} name from: {signature}")]
    NameExtraction {
        path: PathBuf,
        line: usize,
        kind: DocKind,
        signature: String,
    },

    #[error("{path}:{line} {kind}: {}", describe_empty(.missing))]
    InvalidEntry {
        path: PathBuf,
        line: usize,
        kind: DocKind,
        missing: Vec<&'static str>,
    },

    #[error("unsupported file type: {path}")]
    UnsupportedFile { path: PathBuf },

    #[error("documentation file {path} does not exist")]
    MissingTarget { path: PathBuf },

    #[error("documentation is stale: {path} differs from its header, rerun without --verify")]
    StaleDocumentation { path: PathBuf },

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid return type whitelist: {source}")]
    Grammar { source: regex::Error },

    #[error("invalid glob pattern {pattern}: {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },
}

/// "comment is empty", "comment and signature are empty"
fn describe_empty(fields: &[&str]) -> String {
    match fields {
        [one] => format!("{one} is empty"),
        _ => format!("{} are empty", fields.join(" and ")),
    }
}

impl DocError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DocError::Io {
            path: path.into(),
            source,
        }
    }
}
