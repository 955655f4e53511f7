//! Harvest configuration
//!
//! Every field has a default, so a config file only needs the keys it changes.

use serde::Deserialize;
use std::path::Path;

use crate::error::{HarvestError, Result};

/// What to do when a listing's detail page cannot be fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop the run; rows written so far stay in the file
    #[default]
    Abort,
    /// Log the failure and continue with the next listing
    SkipListing,
}

/// HTTP settings for the page fetcher
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
    pub respect_robots_txt: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("listing-harvester/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            respect_robots_txt: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    pub fetch: FetchConfig,
    pub failure_policy: FailurePolicy,
}

impl HarvestConfig {
    /// Load a JSON config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| HarvestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|e| HarvestError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn from_json(text: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
