#[macro_use]
extern crate log;

pub mod clock;
pub mod config;
pub mod error;
pub mod feed_utils;
pub mod gh_api_search_repo_response;
pub mod github_api_utils;
pub mod rss_export;
pub mod trending_window;
