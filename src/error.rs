//! Error types
//!
//! Only network/HTTP failures and output I/O surface as errors. Missing page
//! elements are recovered inside the extractors and never reach this module.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to retrieve a page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to fetch {url}: {message}")]
    Transport { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("failed to read body of {url}: {message}")]
    Body { url: String, message: String },

    #[error("{url} is disallowed by robots.txt")]
    Disallowed { url: String },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            FetchError::Transport { url, .. }
            | FetchError::Status { url, .. }
            | FetchError::Body { url, .. }
            | FetchError::Disallowed { url } => url,
        }
    }
}

/// Errors that end a harvest run or a merge
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("row has {actual} values but the schema has {expected} columns")]
    RowWidth { expected: usize, actual: usize },

    #[error("header of {path} does not match the first input")]
    HeaderMismatch { path: PathBuf },

    #[error("merge output {path} is also one of its inputs")]
    OutputIsInput { path: PathBuf },

    #[error("nothing to merge")]
    NoInputs,

    #[error("invalid config {path}: {message}")]
    Config { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, HarvestError>;
