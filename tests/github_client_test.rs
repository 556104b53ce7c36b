use std::sync::Arc;

use chrono::{TimeDelta, TimeZone, Utc};
use github_trending_feed::{
    clock::ManualClock,
    feed_utils::{group_fetcher::GroupFetcher, FeedKey},
    github_api_utils::github_api_helper::GithubClient,
    trending_window::Cadence,
};
use serde_json::json;
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn fetcher_for(server: &MockServer, token: Option<&str>) -> GroupFetcher<Utc> {
    let client = GithubClient::new(reqwest::Client::new(), &server.uri(), "feed-test", token).unwrap();
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 13, 15, 30, 0).unwrap());
    GroupFetcher::new(Arc::new(client), Arc::new(clock), Utc, TimeDelta::minutes(5))
}

fn search_body() -> serde_json::Value {
    json!({
        "total_count": 2,
        "incomplete_results": false,
        "items": [
            {
                "id": 1,
                "name": "fast",
                "full_name": "octo/fast",
                "owner": { "login": "octo" },
                "html_url": "https://github.com/octo/fast",
                "description": "goes fast",
                "stargazers_count": 900,
                "forks_count": 12,
                "language": "Rust",
                "created_at": "2024-03-12T08:00:00Z"
            },
            {
                "id": 2,
                "name": "slow",
                "full_name": "octo/slow",
                "owner": { "login": "octo" },
                "html_url": "https://github.com/octo/slow",
                "description": null,
                "stargazers_count": 4,
                "language": null,
                "created_at": "2024-03-08T08:00:00Z"
            }
        ]
    })
}

#[tokio::test]
async fn sends_window_query_and_builds_group() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .and(query_param(
            "q",
            "language:rust created:2024-03-07T00:00:00Z..2024-03-13T23:59:59Z",
        ))
        .and(query_param("sort", "stars"))
        .and(query_param("order", "desc"))
        .and(query_param("per_page", "25"))
        .and(header("authorization", "Bearer secret"))
        .and(header("X-GitHub-Api-Version", "2022-11-28"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body()))
        .expect(1)
        .mount(&server)
        .await;

    let mut fetcher = fetcher_for(&server, Some("secret"));
    let key = FeedKey::new(["Rust"], Cadence::Week);
    let group = fetcher.fetch_page(&key, 0).await.unwrap();

    assert_eq!(group.offset, 0);
    assert_eq!(group.start, Utc.with_ymd_and_hms(2024, 3, 7, 0, 0, 0).unwrap());
    assert_eq!(group.end, Utc.with_ymd_and_hms(2024, 3, 14, 0, 0, 0).unwrap());
    let names: Vec<_> = group.repositories.iter().map(|r| r.full_name.as_str()).collect();
    assert_eq!(names, vec!["octo/fast", "octo/slow"]);

    // served from cache, the mock expects exactly one call
    fetcher.fetch_page(&key, 0).await.unwrap();
}

#[tokio::test]
async fn validation_failure_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "message": "Validation Failed" })),
        )
        .mount(&server)
        .await;

    let mut fetcher = fetcher_for(&server, None);
    let err = fetcher
        .fetch_page(&FeedKey::new(["rust"], Cadence::Day), 0)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Validation Failed");
    assert_eq!(err.status(), Some(422));
}

#[tokio::test]
async fn status_without_body_gets_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let mut fetcher = fetcher_for(&server, None);
    let err = fetcher
        .fetch_page(&FeedKey::default(), 3)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "GitHub API request failed with status 503");
}

#[tokio::test]
async fn anonymous_requests_carry_no_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body()))
        .mount(&server)
        .await;

    let mut fetcher = fetcher_for(&server, None);
    fetcher
        .fetch_page(&FeedKey::new(["go"], Cadence::Month), 0)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
    assert_eq!(
        requests[0].headers.get("user-agent").unwrap().to_str().unwrap(),
        "feed-test"
    );
}
