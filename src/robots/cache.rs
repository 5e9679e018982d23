//! Per-host robots.txt cache entries

use crate::robots::parser::RobotsRules;
use chrono::{DateTime, Duration, Utc};

/// Cached robots.txt rules for one host, with the fetch timestamp for
/// staleness checks
#[derive(Debug, Clone)]
pub struct CachedRobots {
    pub rules: RobotsRules,
    pub fetched_at: DateTime<Utc>,
}

impl CachedRobots {
    pub fn new(rules: RobotsRules) -> Self {
        Self {
            rules,
            fetched_at: Utc::now(),
        }
    }

    /// A cached ruleset older than 24 hours is refetched, so site owners'
    /// changes take effect within a day
    pub fn is_stale(&self) -> bool {
        Utc::now() - self.fetched_at > Duration::hours(24)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_cache_not_stale() {
        let cache = CachedRobots::new(RobotsRules::allow_all());
        assert!(!cache.is_stale());
    }

    #[test]
    fn test_old_cache_is_stale() {
        let mut cache = CachedRobots::new(RobotsRules::allow_all());
        cache.fetched_at = Utc::now() - Duration::hours(25);
        assert!(cache.is_stale());
    }

    #[test]
    fn test_cache_not_stale_at_23_hours() {
        let mut cache = CachedRobots::new(RobotsRules::allow_all());
        cache.fetched_at = Utc::now() - Duration::hours(23);
        assert!(!cache.is_stale());
    }
}
