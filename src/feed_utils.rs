use chrono::{DateTime, TimeZone, Utc};
use std::fmt;

use crate::{
    gh_api_search_repo_response::Repository,
    trending_window::{group_label::format_label, Cadence, DateRange},
};

pub mod feed_state;
pub mod group_fetcher;
pub mod page_cache;
pub mod trending_feed;

/// Filter the feed is keyed by. Changing any part of it restarts the feed.
///
/// Languages are trimmed, lower-cased, deduplicated and sorted so that
/// `["Rust", "go"]` and `["go", "rust "]` are the same key. No languages means
/// every language.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FeedKey {
    languages: Vec<String>,
    cadence: Cadence,
}

impl FeedKey {
    pub fn new<I, S>(languages: I, cadence: Cadence) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut languages: Vec<String> = languages
            .into_iter()
            .map(|l| l.as_ref().trim().to_lowercase())
            .filter(|l| !l.is_empty())
            .collect();
        languages.sort();
        languages.dedup();
        Self { languages, cadence }
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }
}

impl fmt::Display for FeedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.languages.is_empty() {
            write!(f, "all/{}", self.cadence)
        } else {
            write!(f, "{}/{}", self.languages.join("+"), self.cadence)
        }
    }
}

/// One fetched window: the repositories created in `[start, end)`, most
/// starred first. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct RepositoryGroup {
    pub offset: u32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub repositories: Vec<Repository>,
}

impl RepositoryGroup {
    pub fn new(offset: u32, range: DateRange, repositories: Vec<Repository>) -> Self {
        Self {
            offset,
            start: range.start,
            end: range.end,
            repositories,
        }
    }

    pub fn range(&self) -> DateRange {
        DateRange::new(self.start, self.end)
    }

    pub fn label<Tz: TimeZone>(&self, cadence: Cadence, tz: &Tz) -> String {
        format_label(&self.range(), cadence, tz)
    }
}
