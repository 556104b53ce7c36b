use chrono::TimeZone;
use rss::{Category, CategoryBuilder, Channel, ChannelBuilder, GuidBuilder, Item, ItemBuilder};
use std::{collections::HashSet, io::Write};

use crate::{
    feed_utils::{FeedKey, RepositoryGroup},
    gh_api_search_repo_response::Repository,
};

pub const CHANNEL_LINK: &str = "https://github.com/trending";

fn channel_title(key: &FeedKey) -> String {
    let languages = if key.languages().is_empty() {
        "all".to_owned()
    } else {
        key.languages().join(", ")
    };
    format!("Trending {} repositories ({})", languages, key.cadence())
}

fn category(name: &str) -> Category {
    CategoryBuilder::default().name(name.to_owned()).build()
}

fn repository_item(repo: &Repository, label: &str) -> Item {
    let mut categories = vec![category(label)];
    if let Some(language) = &repo.language {
        categories.push(category(language));
    }
    let guid = GuidBuilder::default()
        .value(repo.html_url.clone())
        .permalink(true)
        .build();

    ItemBuilder::default()
        .title(repo.full_name.clone())
        .link(repo.html_url.clone())
        .description(repo.description.clone())
        .author(repo.owner.login.clone())
        .pub_date(repo.created_at.to_rfc2822())
        .guid(guid)
        .categories(categories)
        .build()
}

/// RSS channel with one item per repository, in feed order. A repository
/// that shows up in more than one group is only emitted the first time.
pub fn groups_to_channel<Tz: TimeZone>(groups: &[RepositoryGroup], key: &FeedKey, tz: &Tz) -> Channel {
    let mut seen = HashSet::new();
    let mut items = Vec::new();
    for group in groups {
        let label = group.label(key.cadence(), tz);
        for repo in &group.repositories {
            if seen.insert(repo.id) {
                items.push(repository_item(repo, &label));
            }
        }
    }

    ChannelBuilder::default()
        .title(channel_title(key))
        .link(CHANNEL_LINK.to_owned())
        .description(format!(
            "Most starred repositories created per {} window",
            key.cadence()
        ))
        .items(items)
        .build()
}

pub fn write_channel<W: Write>(channel: &Channel, writer: W) -> Result<(), rss::Error> {
    channel.pretty_write_to(writer, b' ', 2)?;
    Ok(())
}
