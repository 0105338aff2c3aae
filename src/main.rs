use std::str::FromStr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use log::{info, LevelFilter};
use serde::Serialize;
use simple_logger::SimpleLogger;

use ytanalytics::models::config::Config;
use ytanalytics::services::{
    page_service::PageService,
    response_cache::{ResponseCache, SystemClock},
    transport::ReqwestTransport,
    youtube_service::YoutubeService,
};
use ytanalytics::utils::format_utils;

#[derive(Debug, Parser)]
#[command(name = "ytanalytics", about = "YouTube channel and video statistics")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Trending videos and popular channels
    Home,
    /// Search channels by name
    Search { query: String },
    /// Details, uploads, playlists and similar channels of one channel
    Channel { id: String },
    /// Trending videos, optionally for one category
    Trending {
        #[arg(long, default_value_t = 25)]
        max: usize,
        #[arg(long)]
        category: Option<String>,
    },
    /// Video categories of a region
    Categories {
        #[arg(long, default_value = "")]
        region: String,
    },
}

#[tokio::main]
pub async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    let config = Config::load()?;

    let level = LevelFilter::from_str(&config.log_level).unwrap_or(LevelFilter::Info);
    SimpleLogger::new().with_level(level).init()?;

    let cache = Arc::new(ResponseCache::with_sweep_threshold(
        Arc::new(SystemClock),
        config.cache_sweep_threshold,
    ));
    let youtube = YoutubeService::new(&config, cache, Arc::new(ReqwestTransport::default()));
    let pages = PageService::new(&youtube);

    match cli.command {
        Command::Home => {
            let page = pages.home_page().await;
            for video in &page.videos {
                info!(
                    "{} ({} views, {})",
                    video.title,
                    format_utils::format_count(video.statistics.view_count),
                    video.formatted_duration().unwrap_or_default()
                );
            }
            print_json(&page)?;
        }
        Command::Search { query } => print_json(&pages.search_page(&query).await)?,
        Command::Channel { id } => {
            let page = pages.channel_page(&id).await;
            if let Some(channel) = &page.channel {
                info!(
                    "{}: {} subscribers, joined {}",
                    channel.title,
                    format_utils::format_count(channel.statistics.subscriber_count),
                    format_utils::format_published_date(&channel.published_at)
                );
            }
            print_json(&page)?;
        }
        Command::Trending { max, category } => {
            let videos = youtube
                .fetch_trending_videos(max, category.as_deref())
                .await?;
            print_json(&videos)?;
        }
        Command::Categories { region } => {
            print_json(&youtube.fetch_video_categories(&region).await?)?
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), anyhow::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
