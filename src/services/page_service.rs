use futures::join;
use log::{error, info};

use crate::errors::ApiError;
use crate::models::pages::{ChannelPage, HomePage, SearchPage};
use crate::services::youtube_service::YoutubeService;

const HOME_TRENDING_VIDEOS: usize = 12;
const HOME_POPULAR_CHANNELS: usize = 10;
const SEARCH_RESULTS: usize = 10;
const CHANNEL_VIDEOS: usize = 8;
const CHANNEL_PLAYLISTS: usize = 6;
const SIMILAR_CHANNELS: usize = 5;

/// Gathers the data each screen needs. Independent lookups run concurrently
/// and a failed lookup leaves its section empty instead of failing the page.
pub struct PageService<'a> {
    youtube: &'a YoutubeService,
}

impl<'a> PageService<'a> {
    pub fn new(youtube: &'a YoutubeService) -> PageService<'a> {
        PageService { youtube }
    }

    pub async fn home_page(&self) -> HomePage {
        let (videos, channels) = join!(
            self.youtube.fetch_trending_videos(HOME_TRENDING_VIDEOS, None),
            self.youtube.fetch_popular_channels(HOME_POPULAR_CHANNELS)
        );

        HomePage {
            videos: or_default(videos, "trending videos"),
            channels: or_default(channels, "popular channels"),
        }
    }

    /// Search failures are kept on the page so the caller can show them.
    pub async fn search_page(&self, query: &str) -> SearchPage {
        let query = query.trim().to_string();

        match self.youtube.search_channels(&query, SEARCH_RESULTS).await {
            Ok(channels) => {
                info!("Search for {:?} found {} channels", query, channels.len());
                SearchPage {
                    query,
                    channels,
                    error: None,
                }
            }
            Err(err) => {
                error!("Error searching channels: {}", err);
                SearchPage {
                    query,
                    channels: Vec::new(),
                    error: Some(err.to_string()),
                }
            }
        }
    }

    pub async fn channel_page(&self, channel_id: &str) -> ChannelPage {
        let (channel, videos, playlists, similar_channels) = join!(
            self.youtube.fetch_channel_details(channel_id),
            self.youtube.fetch_channel_videos(channel_id, CHANNEL_VIDEOS),
            self.youtube.fetch_channel_playlists(channel_id, CHANNEL_PLAYLISTS),
            self.youtube.fetch_similar_channels(channel_id, SIMILAR_CHANNELS)
        );

        let channel = or_default(channel, "channel details");
        if channel.is_none() {
            info!("Channel {} not found", channel_id);
        }

        ChannelPage {
            channel,
            videos: or_default(videos, "channel videos"),
            playlists: or_default(playlists, "channel playlists"),
            similar_channels: or_default(similar_channels, "similar channels"),
        }
    }
}

fn or_default<T: Default>(result: Result<T, ApiError>, section: &str) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            error!("Error loading {}: {}", section, err);
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::Config;
    use crate::services::response_cache::{ResponseCache, SystemClock};
    use crate::services::transport::tests::FakeTransport;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn youtube(transport: Arc<FakeTransport>) -> YoutubeService {
        let config = Config {
            youtube_api_key: Some("test-key".to_string()),
            youtube_api_base_url: "https://yt.test/v3".to_string(),
            popular_channel_ids: vec!["UC1".to_string()],
            ..Config::default()
        };

        YoutubeService::new(
            &config,
            Arc::new(ResponseCache::new(Arc::new(SystemClock))),
            transport,
        )
    }

    fn channel_json(id: &str) -> Value {
        json!({
            "id": id,
            "snippet": { "title": "Sailing Uma", "publishedAt": "2012-02-02T00:00:00Z" },
            "statistics": { "viewCount": "1", "subscriberCount": "2", "videoCount": "3" }
        })
    }

    #[tokio::test]
    async fn home_page_survives_failed_trending_lookup() {
        let transport = Arc::new(
            FakeTransport::new()
                .fail(
                    "chart=mostPopular",
                    ApiError::Status {
                        status: 500,
                        message: "backendError".to_string(),
                    },
                )
                .route("/channels?", json!({ "items": [channel_json("UC1")] })),
        );
        let youtube = youtube(transport);

        let page = PageService::new(&youtube).home_page().await;

        assert!(page.videos.is_empty());
        assert_eq!(page.channels.len(), 1);
    }

    #[tokio::test]
    async fn channel_page_keeps_details_when_enrichment_fails() {
        let transport = Arc::new(
            FakeTransport::new()
                .fail(
                    "/playlists?",
                    ApiError::Transport("connection reset".to_string()),
                )
                .fail(
                    "/search?",
                    ApiError::Transport("connection reset".to_string()),
                )
                .route("/channels?", json!({ "items": [channel_json("UC1")] })),
        );
        let youtube = youtube(transport);

        let page = PageService::new(&youtube).channel_page("UC1").await;

        assert_eq!(page.channel.map(|channel| channel.id).as_deref(), Some("UC1"));
        assert!(page.videos.is_empty());
        assert!(page.playlists.is_empty());
        assert!(page.similar_channels.is_empty());
    }

    #[tokio::test]
    async fn channel_page_for_unknown_channel() {
        let transport = Arc::new(FakeTransport::new().route("/channels?", json!({ "items": [] })));
        let youtube = youtube(transport);

        let page = PageService::new(&youtube).channel_page("UCmissing").await;

        assert_eq!(page, ChannelPage::default());
    }

    #[tokio::test]
    async fn search_page_reports_errors() {
        let transport = Arc::new(FakeTransport::new().fail(
            "/search?",
            ApiError::Status {
                status: 403,
                message: "quotaExceeded".to_string(),
            },
        ));
        let youtube = youtube(transport);

        let page = PageService::new(&youtube).search_page(" boats ").await;

        assert_eq!(page.query, "boats");
        assert!(page.channels.is_empty());
        assert_eq!(
            page.error.as_deref(),
            Some("YouTube API error: 403. quotaExceeded")
        );
    }
}
