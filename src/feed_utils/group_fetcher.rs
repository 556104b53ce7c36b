use chrono::{TimeDelta, TimeZone};
use std::sync::Arc;

use super::{page_cache::PageCache, FeedKey, RepositoryGroup};
use crate::{
    clock::Clock,
    error::FetchError,
    github_api_utils::{search_query::SearchQuery, SearchApi},
    trending_window::window_calculator::compute_window,
};

/// Turns `(filter key, offset)` into a `RepositoryGroup`: one window, one
/// search call, at most `PAGE_SIZE` repositories.
///
/// Pages don't depend on each other, page `n` is the same request whether or
/// not `n - 1` was ever fetched. There is always a next page.
pub struct GroupFetcher<Tz: TimeZone> {
    api: Arc<dyn SearchApi>,
    clock: Arc<dyn Clock>,
    tz: Tz,
    cache: PageCache,
}

impl<Tz: TimeZone> GroupFetcher<Tz> {
    pub fn new(api: Arc<dyn SearchApi>, clock: Arc<dyn Clock>, tz: Tz, cache_ttl: TimeDelta) -> Self {
        Self {
            api,
            clock,
            tz,
            cache: PageCache::new(cache_ttl),
        }
    }

    pub fn time_zone(&self) -> &Tz {
        &self.tz
    }

    /// Fetches page `offset` of `key`. A page fetched less than the cache ttl
    /// ago for the same window is returned as is, without asking GitHub again.
    /// Failures are not cached so a retry always reaches upstream.
    pub async fn fetch_page(&mut self, key: &FeedKey, offset: u32) -> Result<RepositoryGroup, FetchError> {
        let fetched_at = self.clock.now();
        let range = compute_window(key.cadence(), offset, &fetched_at.with_timezone(&self.tz));
        if let Some(group) = self.cache.get(key, offset, &range, fetched_at) {
            debug!("Serving page {} of {} from cache", offset, key);
            return Ok(group.clone());
        }

        let query = SearchQuery::for_window(key.languages(), &range);
        info!("Fetching page {} of {}: {}", offset, key, query.q);

        let response = self.api.search_repositories(&query).await?;
        if response.incomplete_results {
            warn!("GitHub returned incomplete results for page {} of {}", offset, key);
        }

        let group = RepositoryGroup::new(offset, range, response.repositories);
        let evicted = self.cache.evict_expired(fetched_at);
        if evicted > 0 {
            debug!("Evicted {} stale pages", evicted);
        }
        self.cache.insert(key.clone(), offset, group.clone(), fetched_at);
        Ok(group)
    }
}
