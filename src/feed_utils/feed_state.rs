use super::{FeedKey, RepositoryGroup};
use crate::error::FetchError;

/// Handed out by `FeedState::begin_load` and given back with the result.
/// Identifies which filter generation the request was made for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTicket {
    pub key: FeedKey,
    pub offset: u32,
    generation: u64,
}

#[derive(Debug)]
pub enum LoadOutcome {
    /// The group for `offset` was appended to the list.
    Appended { offset: u32 },
    /// The result belongs to a filter that has since been replaced.
    Discarded,
    /// A fetch for the current filter is still outstanding.
    Busy,
    /// The page failed. The offset didn't advance, loading again retries it.
    Failed(FetchError),
}

/// Groups fetched so far for the current filter, in increasing offset order.
///
/// At most one page is in flight per filter. Switching filters bumps the
/// generation, so a response that arrives late for the old filter is
/// recognised and dropped in `finish_load` instead of being appended.
#[derive(Debug)]
pub struct FeedState {
    key: FeedKey,
    generation: u64,
    groups: Vec<RepositoryGroup>,
    next_offset: u32,
    loading: bool,
}

impl FeedState {
    pub fn new(key: FeedKey) -> Self {
        Self {
            key,
            generation: 0,
            groups: Vec::new(),
            next_offset: 0,
            loading: false,
        }
    }

    pub fn key(&self) -> &FeedKey {
        &self.key
    }

    pub fn groups(&self) -> &[RepositoryGroup] {
        &self.groups
    }

    pub fn next_offset(&self) -> u32 {
        self.next_offset
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Switches to `key`. Returns false (and keeps everything) when it's the
    /// key already in use.
    pub fn set_filter(&mut self, key: FeedKey) -> bool {
        if key == self.key {
            return false;
        }
        info!("Filter changed from {} to {}, restarting feed", self.key, key);
        self.key = key;
        self.generation += 1;
        self.groups.clear();
        self.next_offset = 0;
        self.loading = false;
        true
    }

    /// Claims the next page. `None` while another fetch is outstanding.
    pub fn begin_load(&mut self) -> Option<PageTicket> {
        if self.loading {
            return None;
        }
        self.loading = true;
        Some(PageTicket {
            key: self.key.clone(),
            offset: self.next_offset,
            generation: self.generation,
        })
    }

    pub fn finish_load(
        &mut self,
        ticket: PageTicket,
        result: Result<RepositoryGroup, FetchError>,
    ) -> LoadOutcome {
        if ticket.generation != self.generation || ticket.key != self.key {
            debug!(
                "Dropping page {} of {}, feed now shows {}",
                ticket.offset, ticket.key, self.key
            );
            return LoadOutcome::Discarded;
        }
        self.loading = false;

        match result {
            Ok(group) if group.offset == self.next_offset => {
                let offset = group.offset;
                self.groups.push(group);
                self.next_offset = self.next_offset.saturating_add(1);
                LoadOutcome::Appended { offset }
            }
            Ok(group) => {
                warn!(
                    "Got page {} while expecting page {}, ignoring it",
                    group.offset, self.next_offset
                );
                LoadOutcome::Discarded
            }
            Err(err) => {
                error!("Loading page {} of {} failed: {}", ticket.offset, self.key, err);
                LoadOutcome::Failed(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trending_window::{Cadence, DateRange};
    use chrono::{TimeZone, Utc};

    fn group(offset: u32) -> RepositoryGroup {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        RepositoryGroup::new(offset, DateRange::new(at, at), Vec::new())
    }

    fn rust_weekly() -> FeedKey {
        FeedKey::new(["rust"], Cadence::Week)
    }

    #[test]
    fn one_fetch_in_flight_at_a_time() {
        let mut state = FeedState::new(rust_weekly());
        let ticket = state.begin_load().unwrap();
        assert!(state.is_loading());
        assert!(state.begin_load().is_none());

        assert!(matches!(
            state.finish_load(ticket, Ok(group(0))),
            LoadOutcome::Appended { offset: 0 }
        ));
        assert!(!state.is_loading());
        assert_eq!(state.begin_load().unwrap().offset, 1);
    }

    #[test]
    fn failure_keeps_offset_for_retry() {
        let mut state = FeedState::new(rust_weekly());
        let ticket = state.begin_load().unwrap();
        let outcome = state.finish_load(ticket, Err(FetchError::upstream(500, None)));
        assert!(matches!(outcome, LoadOutcome::Failed(_)));
        assert!(state.groups().is_empty());
        assert_eq!(state.begin_load().unwrap().offset, 0);
    }

    #[test]
    fn late_result_for_old_filter_is_dropped() {
        let mut state = FeedState::new(rust_weekly());
        let stale = state.begin_load().unwrap();

        assert!(state.set_filter(FeedKey::new(["go"], Cadence::Week)));
        let fresh = state.begin_load().unwrap();
        assert_eq!(fresh.offset, 0);

        assert!(matches!(
            state.finish_load(stale, Ok(group(0))),
            LoadOutcome::Discarded
        ));
        assert!(state.groups().is_empty());
        // the new filter's own fetch is still outstanding
        assert!(state.is_loading());

        assert!(matches!(
            state.finish_load(fresh, Ok(group(0))),
            LoadOutcome::Appended { offset: 0 }
        ));
        assert_eq!(state.groups().len(), 1);
    }

    #[test]
    fn switching_back_to_the_same_key_still_drops_old_tickets() {
        let mut state = FeedState::new(rust_weekly());
        let stale = state.begin_load().unwrap();
        state.set_filter(FeedKey::new(["go"], Cadence::Week));
        state.set_filter(rust_weekly());
        assert!(matches!(
            state.finish_load(stale, Ok(group(0))),
            LoadOutcome::Discarded
        ));
    }

    #[test]
    fn same_filter_is_a_no_op() {
        let mut state = FeedState::new(rust_weekly());
        let ticket = state.begin_load().unwrap();
        state.finish_load(ticket, Ok(group(0)));
        assert!(!state.set_filter(FeedKey::new(["Rust"], Cadence::Week)));
        assert_eq!(state.groups().len(), 1);
    }
}
