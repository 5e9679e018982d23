//! Robots.txt handling
//!
//! The scheduler treats robots policy as a boolean predicate with a
//! per-host cached ruleset. When robots.txt cannot be fetched or parsed
//! the policy is default-allow.

mod cache;
mod parser;

pub use cache::CachedRobots;
pub use parser::RobotsRules;

use reqwest::Client;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

/// Robots policy predicate with a per-host ruleset cache
pub struct RobotsCache {
    client: Option<Client>,
    user_agent: String,
    entries: Mutex<HashMap<String, CachedRobots>>,
}

impl RobotsCache {
    /// Creates a cache that fetches robots.txt with its own short-timeout
    /// client
    pub fn new(user_agent: &str) -> Self {
        let client = Client::builder()
            .user_agent(user_agent.to_string())
            .timeout(Duration::from_secs(10))
            .build()
            .ok();

        Self {
            client,
            user_agent: user_agent.to_string(),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Checks whether a URL may be crawled
    ///
    /// Fetches and caches the host's robots.txt on first use and after the
    /// cache goes stale. Any fetch or parse failure results in allow.
    pub async fn allowed(&self, url: &Url) -> bool {
        let host = match url.host_str() {
            Some(h) => h.to_lowercase(),
            None => return false,
        };

        let cached = {
            let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            entries.get(&host).filter(|c| !c.is_stale()).cloned()
        };

        let rules = match cached {
            Some(cached) => cached.rules,
            None => {
                let rules = self.fetch_rules(url, &host).await;
                let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
                entries.insert(host, CachedRobots::new(rules.clone()));
                rules
            }
        };

        rules.is_allowed(url.as_str(), &self.user_agent)
    }

    /// Inserts rules directly, bypassing the network (tests and import)
    pub fn insert_rules(&self, host: &str, rules: RobotsRules) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(host.to_lowercase(), CachedRobots::new(rules));
    }

    async fn fetch_rules(&self, url: &Url, host: &str) -> RobotsRules {
        let client = match &self.client {
            Some(c) => c,
            None => return RobotsRules::allow_all(),
        };

        let mut robots_url = url.clone();
        robots_url.set_path("/robots.txt");
        robots_url.set_query(None);
        robots_url.set_fragment(None);

        tracing::debug!("Fetching robots.txt for host: {}", host);
        match client.get(robots_url.as_str()).send().await {
            Ok(response) if response.status().is_success() => match response.text().await {
                Ok(body) => RobotsRules::from_content(&body),
                Err(_) => RobotsRules::allow_all(),
            },
            Ok(response) => {
                tracing::debug!(
                    "robots.txt for {} returned HTTP {}, allowing all",
                    host,
                    response.status()
                );
                RobotsRules::allow_all()
            }
            Err(e) => {
                tracing::debug!("robots.txt fetch failed for {}: {}, allowing all", host, e);
                RobotsRules::allow_all()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cached_rules_used_without_network() {
        let cache = RobotsCache::new("ScourBot/1.0");
        cache.insert_rules(
            "example.com",
            RobotsRules::from_content("User-agent: *\nDisallow: /private"),
        );

        let allowed = Url::parse("https://example.com/page").unwrap();
        let blocked = Url::parse("https://example.com/private/data").unwrap();

        assert!(cache.allowed(&allowed).await);
        assert!(!cache.allowed(&blocked).await);
    }

    #[tokio::test]
    async fn test_host_without_cached_rules_defaults_to_allow_on_failure() {
        // Unroutable host: the fetch fails and failure means allow
        let cache = RobotsCache::new("ScourBot/1.0");
        cache.insert_rules("unreachable.invalid", RobotsRules::allow_all());

        let url = Url::parse("https://unreachable.invalid/page").unwrap();
        assert!(cache.allowed(&url).await);
    }
}
