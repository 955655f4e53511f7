//! Page fetching
//!
//! One blocking GET per call, parsed into a [`Document`]. No caching and no
//! retries; a failure goes straight back to the caller.

use std::time::Duration;
use tracing::debug;

use crate::config::FetchConfig;
use crate::document::Document;
use crate::error::FetchError;
use crate::robots::RobotsGate;

/// Retrieves a URL as a queryable document
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> Result<Document, FetchError>;
}

/// Fetcher backed by a blocking ureq agent
pub struct HttpFetcher {
    agent: ureq::Agent,
    user_agent: String,
    robots: Option<RobotsGate>,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Self {
        let agent = ureq::Agent::new_with_config(
            ureq::Agent::config_builder()
                .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
                .user_agent(config.user_agent.as_str())
                .build(),
        );

        Self {
            agent,
            user_agent: config.user_agent.clone(),
            robots: config.respect_robots_txt.then(RobotsGate::new),
        }
    }

    /// Raw body of a successful response
    pub fn get_text(&self, url: &str) -> Result<String, FetchError> {
        if let Some(robots) = &self.robots {
            if !robots.allowed(&self.agent, url, &self.user_agent) {
                return Err(FetchError::Disallowed {
                    url: url.to_string(),
                });
            }
        }

        let resp = match self.agent.get(url).call() {
            Ok(resp) => resp,
            Err(ureq::Error::StatusCode(status)) => {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status,
                });
            }
            Err(e) => {
                return Err(FetchError::Transport {
                    url: url.to_string(),
                    message: e.to_string(),
                });
            }
        };

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp
            .into_body()
            .read_to_string()
            .map_err(|e| FetchError::Body {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        debug!(url, bytes = body.len(), "fetched page");
        Ok(body)
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Document, FetchError> {
        self.get_text(url).map(|body| Document::parse(&body))
    }
}
