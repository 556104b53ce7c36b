use crate::{error::FetchError, gh_api_search_repo_response::SearchResponse};

pub mod github_api_helper;
pub mod search_query;

use search_query::SearchQuery;

/// Upstream repository search. The feed only ever issues one query per window,
/// so this is the whole surface it needs from GitHub.
#[async_trait::async_trait]
pub trait SearchApi: Send + Sync {
    async fn search_repositories(&self, query: &SearchQuery) -> Result<SearchResponse, FetchError>;
}
