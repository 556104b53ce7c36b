use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;

use super::{FeedKey, RepositoryGroup};
use crate::trending_window::DateRange;

struct CachedPage {
    fetched_at: DateTime<Utc>,
    group: RepositoryGroup,
}

/// Groups already fetched, keyed by `(filter key, offset)`. An entry is served
/// while younger than `ttl` and only for the window it was fetched for: once the
/// day rolls over, the same offset names a different window and misses.
pub struct PageCache {
    ttl: TimeDelta,
    entries: HashMap<(FeedKey, u32), CachedPage>,
}

impl PageCache {
    pub fn new(ttl: TimeDelta) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn get(
        &self,
        key: &FeedKey,
        offset: u32,
        range: &DateRange,
        now: DateTime<Utc>,
    ) -> Option<&RepositoryGroup> {
        let entry = self.entries.get(&(key.clone(), offset))?;
        if now - entry.fetched_at < self.ttl && entry.group.range() == *range {
            Some(&entry.group)
        } else {
            None
        }
    }

    pub fn insert(&mut self, key: FeedKey, offset: u32, group: RepositoryGroup, now: DateTime<Utc>) {
        self.entries.insert(
            (key, offset),
            CachedPage {
                fetched_at: now,
                group,
            },
        );
    }

    /// Drops every stale entry, returns how many were removed.
    pub fn evict_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries.retain(|_, entry| now - entry.fetched_at < ttl);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
