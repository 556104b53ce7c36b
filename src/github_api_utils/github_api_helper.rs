use crate::{
    config::Config,
    error::FetchError,
    gh_api_search_repo_response::{ErrorResponse, SearchResponse},
};

use super::{search_query::SearchQuery, SearchApi};
use chrono::{TimeDelta, TimeZone, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, StatusCode};

const GITHUB_API_VERSION: &str = "2022-11-28";
const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// Creates the standard GitHub api request headers:
/// 1. **accept**, the GitHub json media type.
/// 2. **X-GitHub-Api-Version**, GitHub api version.
/// 3. **user-agent**, GitHub rejects requests without one.
/// 4. **authorization**, only when a token is configured. Anonymous search works
///    with a lower rate limit.
fn get_requests_headers(user_agent: &str, token: Option<&str>) -> Result<HeaderMap, FetchError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
    headers.insert(
        "X-GitHub-Api-Version",
        HeaderValue::from_static(GITHUB_API_VERSION),
    );
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(user_agent)
            .map_err(|_| FetchError::InvalidHeader("user-agent".to_owned()))?,
    );
    if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
            .map_err(|_| FetchError::InvalidHeader("authorization".to_owned()))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}

fn header_number(headers: &HeaderMap, name: &str) -> Option<i64> {
    headers.get(name)?.to_str().ok()?.trim().parse::<i64>().ok()
}

/// Uses GitHub response headers to tell how long the caller should hold off
/// before the next request. `None` when nothing indicates a rate limit.
///
/// The feed never sleeps on its own (requests are user driven), the wait is
/// only reported.
fn rate_limit_wait(response_headers: &HeaderMap, response_status: StatusCode) -> Option<TimeDelta> {
    if let Some(retry_after) = header_number(response_headers, "retry-after") {
        // secondary rate limit, value is in seconds
        return Some(TimeDelta::seconds(retry_after.max(0)));
    }

    let remaining = header_number(response_headers, "x-ratelimit-remaining")?;
    if remaining > 0 {
        return None;
    }

    let reset = header_number(response_headers, "x-ratelimit-reset")
        .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
        .unwrap_or_else(Utc::now);
    let wait = (reset - Utc::now()) + TimeDelta::seconds(1);
    if wait > TimeDelta::zero() || !response_status.is_success() {
        Some(wait.max(TimeDelta::zero()))
    } else {
        None
    }
}

/// `reqwest` backed client for the GitHub REST search endpoint.
#[derive(Debug, Clone)]
pub struct GithubClient {
    client: Client,
    base_url: String,
    headers: HeaderMap,
}

impl GithubClient {
    pub fn new(client: Client, base_url: &str, user_agent: &str, token: Option<&str>) -> Result<Self, FetchError> {
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            headers: get_requests_headers(user_agent, token)?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        Self::new(
            Client::new(),
            &config.api_base_url,
            &config.user_agent,
            config.token.as_deref(),
        )
    }

    fn search_url(&self) -> String {
        format!("{}/search/repositories", self.base_url)
    }
}

#[async_trait::async_trait]
impl SearchApi for GithubClient {
    async fn search_repositories(&self, query: &SearchQuery) -> Result<SearchResponse, FetchError> {
        let response = self
            .client
            .get(self.search_url())
            .headers(self.headers.clone())
            .query(&query.params())
            .send()
            .await?;

        let status = response.status();
        if let Some(wait) = rate_limit_wait(response.headers(), status) {
            warn!(
                "GitHub rate limit reached, next request should wait {} s",
                wait.num_seconds()
            );
        }

        let body = response.text().await?;
        if status.is_success() {
            info!("Request successful: {}", status);
            Ok(serde_json::from_str(&body)?)
        } else {
            error!("Request failed: {}", status);
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .and_then(|body| body.message);
            Err(FetchError::upstream(status.as_u16(), message))
        }
    }
}
