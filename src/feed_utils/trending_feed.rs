use chrono::TimeZone;

use super::{
    feed_state::{FeedState, LoadOutcome},
    group_fetcher::GroupFetcher,
    FeedKey, RepositoryGroup,
};
use crate::error::FetchError;

/// The feed a consumer scrolls: a fetcher plus the groups shown for the
/// current filter.
pub struct TrendingFeed<Tz: TimeZone> {
    fetcher: GroupFetcher<Tz>,
    state: FeedState,
}

impl<Tz: TimeZone> TrendingFeed<Tz> {
    pub fn new(fetcher: GroupFetcher<Tz>, key: FeedKey) -> Self {
        Self {
            fetcher,
            state: FeedState::new(key),
        }
    }

    pub fn key(&self) -> &FeedKey {
        self.state.key()
    }

    pub fn groups(&self) -> &[RepositoryGroup] {
        self.state.groups()
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn fetcher(&self) -> &GroupFetcher<Tz> {
        &self.fetcher
    }

    pub fn set_filter(&mut self, key: FeedKey) -> bool {
        self.state.set_filter(key)
    }

    /// Fetches the next window and appends it. Called when the consumer is
    /// close to the end of what it has rendered.
    pub async fn load_more(&mut self) -> LoadOutcome {
        let Some(ticket) = self.state.begin_load() else {
            return LoadOutcome::Busy;
        };
        let result = self.fetcher.fetch_page(&ticket.key, ticket.offset).await;
        self.state.finish_load(ticket, result)
    }

    /// Loads until `pages` groups are present, stopping at the first failure.
    pub async fn load_pages(&mut self, pages: u32) -> Result<(), FetchError> {
        while self.state.next_offset() < pages {
            match self.load_more().await {
                LoadOutcome::Appended { .. } => {}
                LoadOutcome::Failed(err) => return Err(err),
                LoadOutcome::Busy | LoadOutcome::Discarded => break,
            }
        }
        Ok(())
    }

    /// Heading for every group, in feed order.
    pub fn labels(&self) -> Vec<String> {
        let cadence = self.state.key().cadence();
        self.groups()
            .iter()
            .map(|group| group.label(cadence, self.fetcher.time_zone()))
            .collect()
    }
}
