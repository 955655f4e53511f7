//! robots.txt gate for the HTTP fetcher

use std::collections::HashMap;
use std::sync::RwLock;
use texting_robots::Robot;
use tracing::debug;

/// robots.txt bodies cached per host for the lifetime of a fetcher
#[derive(Debug, Default)]
pub struct RobotsGate {
    cache: RwLock<HashMap<String, String>>,
}

impl RobotsGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether `user_agent` may fetch `url`.
    ///
    /// robots.txt is requested once per origin (scheme, host and port). A missing or
    /// unreadable robots.txt allows everything.
    pub fn allowed(&self, agent: &ureq::Agent, url: &str, user_agent: &str) -> bool {
        let parsed = match url::Url::parse(url) {
            Ok(u) => u,
            Err(_) => return true,
        };
        let origin = parsed.origin();
        if !origin.is_tuple() {
            return true;
        }
        // scheme://host[:port], the port only when it is not the default
        let key = origin.ascii_serialization();

        let cached = self
            .cache
            .read()
            .ok()
            .and_then(|cache| cache.get(&key).cloned());

        let robots_txt = match cached {
            Some(body) => body,
            None => {
                let robots_url = format!("{}/robots.txt", key);
                let body = match agent.get(&robots_url).call() {
                    Ok(resp) if resp.status().is_success() => {
                        resp.into_body().read_to_string().unwrap_or_default()
                    }
                    _ => String::new(),
                };
                debug!(robots_url = %robots_url, bytes = body.len(), "fetched robots.txt");
                if let Ok(mut cache) = self.cache.write() {
                    cache.insert(key, body.clone());
                }
                body
            }
        };

        is_allowed(&robots_txt, url, user_agent)
    }
}

/// Evaluate a robots.txt body for one URL
pub fn is_allowed(robots_txt: &str, url: &str, user_agent: &str) -> bool {
    Robot::new(user_agent, robots_txt.as_bytes())
        .map(|r| r.allowed(url))
        .unwrap_or(true)
}
