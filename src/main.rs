use std::{fs::File, io, path::PathBuf, sync::Arc};

use chrono::{Local, TimeZone, Utc};
use clap::{Parser, Subcommand};
use dotenv::dotenv;

use github_trending_feed::{
    clock::SystemClock,
    config::Config,
    feed_utils::{group_fetcher::GroupFetcher, trending_feed::TrendingFeed, FeedKey},
    github_api_utils::github_api_helper::GithubClient,
    rss_export::{groups_to_channel, write_channel},
    trending_window::Cadence,
};

extern crate pretty_env_logger;
#[macro_use]
extern crate log;

#[derive(Parser, Debug)]
#[command(name = "trending", version, about = "Walk back through trending GitHub repositories, one window at a time")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file, defaults to ./trending.toml when present
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Only repositories in this language, repeat for several
    #[arg(short, long = "language", global = true)]
    languages: Vec<String>,

    /// daily, weekly or monthly
    #[arg(short, long, global = true)]
    cadence: Option<Cadence>,

    /// Take day boundaries in UTC instead of local time
    #[arg(long, global = true)]
    utc: bool,

    /// GitHub token, overrides GH_API_KEY
    #[arg(long, global = true)]
    token: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the most starred repositories of each window
    Feed {
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },
    /// Export the windows as an RSS channel
    Rss {
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn resolve_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = Config::load(cli.config.as_deref())?.with_env();
    if !cli.languages.is_empty() {
        config.languages = cli.languages.clone();
    }
    if let Some(cadence) = cli.cadence {
        config.cadence = cadence;
    }
    if let Some(token) = &cli.token {
        config.token = Some(token.clone());
    }
    config.utc |= cli.utc;
    config.validate()?;
    Ok(config)
}

async fn run<Tz: TimeZone>(cli: &Cli, config: &Config, tz: Tz) -> Result<(), Box<dyn std::error::Error>> {
    let client = GithubClient::from_config(config)?;
    let fetcher = GroupFetcher::new(
        Arc::new(client),
        Arc::new(SystemClock),
        tz,
        config.cache_ttl(),
    );
    let key: FeedKey = config.feed_key();
    let mut feed = TrendingFeed::new(fetcher, key);

    match &cli.command {
        Command::Feed { pages } => {
            feed.load_pages(*pages).await?;
            for (label, group) in feed.labels().iter().zip(feed.groups()) {
                println!("== {} ({} repositories)", label, group.repositories.len());
                for repo in &group.repositories {
                    println!(
                        "  {:>7} *  {:<40} {}",
                        repo.stargazers_count,
                        repo.full_name,
                        repo.language.as_deref().unwrap_or("-")
                    );
                    if let Some(description) = &repo.description {
                        println!("           {}", description);
                    }
                }
            }
        }
        Command::Rss { pages, output } => {
            feed.load_pages(*pages).await?;
            let channel = groups_to_channel(feed.groups(), feed.key(), feed.fetcher().time_zone());
            match output {
                Some(path) => {
                    write_channel(&channel, File::create(path)?)?;
                    info!(
                        "Wrote {} items to {}",
                        channel.items().len(),
                        path.display()
                    );
                }
                None => {
                    write_channel(&channel, io::stdout().lock())?;
                    println!();
                }
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    // load env variables
    dotenv().ok();
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            error!("{err}");
            std::process::exit(2);
        }
    };

    let result = if config.utc {
        run(&cli, &config, Utc).await
    } else {
        run(&cli, &config, Local).await
    };
    if let Err(err) = result {
        error!("{err}");
        std::process::exit(1);
    }
}
