//! Where a run's events come from.
//!
//! [`FeedSource::load`] resolves a username to raw events:
//!
//! 1. a fresh cache entry, unless cache reads are disabled
//! 2. the GitHub API; the result is written back to the cache
//! 3. if the API is unreachable, the cache entry regardless of age
//!
//! The returned [`LoadedFeed`] says which path was taken so the caller can
//! tell the user.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::FeedCache;
use crate::github::{GitHubClient, GitHubError, RATE_LIMIT_WARNING_THRESHOLD};

/// Which path produced the events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedOrigin {
    /// Fetched from the API.
    Network,

    /// Fresh cache entry.
    Cache,

    /// Stale cache entry used because the API was unreachable.
    OfflineCache {
        /// User-facing description of the connection failure.
        reason: String,
    },
}

/// Raw events plus provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedFeed {
    /// Raw event records in API order.
    pub events: Vec<Value>,

    /// Where `events` came from.
    pub origin: FeedOrigin,

    /// Remaining API quota, only known for [`FeedOrigin::Network`].
    pub rate_limit_remaining: Option<u32>,
}

impl LoadedFeed {
    /// Notice to show for cache-served feeds, `None` for network results.
    #[must_use]
    pub fn notice(&self, username: &str) -> Option<String> {
        match self.origin {
            FeedOrigin::Network => None,
            FeedOrigin::Cache => Some(format!("(Loaded cached activity for '{username}')")),
            FeedOrigin::OfflineCache { .. } => Some(format!(
                "(Loaded cached activity for '{username}' - offline mode)"
            )),
        }
    }

    /// Rate-limit warning, when the remaining quota is low.
    #[must_use]
    pub fn rate_limit_warning(&self) -> Option<String> {
        self.rate_limit_remaining
            .filter(|&remaining| remaining <= RATE_LIMIT_WARNING_THRESHOLD)
            .map(|remaining| {
                format!(
                    "Warning: You are nearing the GitHub API rate limit. Only {remaining} requests remaining."
                )
            })
    }
}

/// Combines the API client with an optional cache.
#[derive(Debug, Clone)]
pub struct FeedSource {
    client: GitHubClient,
    cache: Option<FeedCache>,
    read_cache: bool,
}

impl FeedSource {
    /// A source without a cache.
    #[must_use]
    pub fn new(client: GitHubClient) -> Self {
        Self {
            client,
            cache: None,
            read_cache: true,
        }
    }

    /// Attaches a cache.
    #[must_use]
    pub fn with_cache(mut self, cache: FeedCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// When `false`, fresh cache entries are not served; fetched results are
    /// still stored and the offline fallback still applies.
    #[must_use]
    pub fn read_cache(mut self, enabled: bool) -> Self {
        self.read_cache = enabled;
        self
    }

    /// Loads the events for `username`.
    ///
    /// # Errors
    ///
    /// Returns the fetch error when the API fails and no fallback applies.
    pub async fn load(&self, username: &str, now: DateTime<Utc>) -> Result<LoadedFeed, GitHubError> {
        if self.read_cache {
            if let Some(events) = self.cache.as_ref().and_then(|c| c.load(username, now)) {
                return Ok(LoadedFeed {
                    events,
                    origin: FeedOrigin::Cache,
                    rate_limit_remaining: None,
                });
            }
        }

        match self.client.fetch_events(username).await {
            Ok(fetched) => {
                if let Some(cache) = &self.cache {
                    if let Err(e) = cache.store(username, &fetched.events, now) {
                        warn!(error = %e, "Failed to write cache");
                    }
                }
                Ok(LoadedFeed {
                    events: fetched.events,
                    origin: FeedOrigin::Network,
                    rate_limit_remaining: fetched.rate_limit_remaining,
                })
            }
            Err(e) if e.is_connection() => {
                let stale = self.cache.as_ref().and_then(|c| c.load_stale(username));
                match stale {
                    Some(events) => {
                        info!(username, error = %e, "API unreachable, using cached events");
                        Ok(LoadedFeed {
                            events,
                            origin: FeedOrigin::OfflineCache {
                                reason: e.user_message(),
                            },
                            rate_limit_remaining: None,
                        })
                    }
                    None => {
                        debug!(username, "No cached events for offline fallback");
                        Err(e)
                    }
                }
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(origin: FeedOrigin, remaining: Option<u32>) -> LoadedFeed {
        LoadedFeed {
            events: Vec::new(),
            origin,
            rate_limit_remaining: remaining,
        }
    }

    #[test]
    fn notices_by_origin() {
        assert_eq!(feed(FeedOrigin::Network, None).notice("octocat"), None);
        assert_eq!(
            feed(FeedOrigin::Cache, None).notice("octocat").as_deref(),
            Some("(Loaded cached activity for 'octocat')")
        );
        assert_eq!(
            feed(
                FeedOrigin::OfflineCache {
                    reason: "Connection error".to_string()
                },
                None
            )
            .notice("octocat")
            .as_deref(),
            Some("(Loaded cached activity for 'octocat' - offline mode)")
        );
    }

    #[test]
    fn rate_limit_warning_only_when_low() {
        assert_eq!(feed(FeedOrigin::Network, Some(60)).rate_limit_warning(), None);
        assert_eq!(feed(FeedOrigin::Network, None).rate_limit_warning(), None);
        assert_eq!(
            feed(FeedOrigin::Network, Some(3)).rate_limit_warning().as_deref(),
            Some("Warning: You are nearing the GitHub API rate limit. Only 3 requests remaining.")
        );
    }
}
