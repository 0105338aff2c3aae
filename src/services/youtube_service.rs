use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info, warn};
use rand::seq::SliceRandom;
use regex::Regex;
use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::errors::ApiError;
use crate::models::{
    category::Category,
    channel::Channel,
    config::Config,
    playlist::Playlist,
    video::{Video, VideoStatistics},
    youtube_channel_details::YouTubeChannelDetails,
    youtube_playlist_items::YouTubePlaylistItems,
    youtube_playlists::YouTubePlaylists,
    youtube_search_response::YouTubeSearchResponse,
    youtube_video_categories::YouTubeVideoCategories,
    youtube_video_details::YouTubeVideoDetails,
};
use crate::services::{response_cache::ResponseCache, transport::HttpTransport};

const TRENDING_PAGE_SIZE: usize = 50;
const TRENDING_PARTS: &str = "snippet,statistics,topicDetails,contentDetails";
const CHANNEL_PARTS: &str = "snippet,statistics,brandingSettings";
const CHANNEL_DETAIL_PARTS: &str = "snippet,statistics,brandingSettings,contentDetails";
const ALL_CATEGORIES: &str = "all";

/// Statistics and duration of one upload, keyed by video id.
type UploadDetails = HashMap<String, (VideoStatistics, Option<String>)>;

/// Query operations over the YouTube Data API.
///
/// Every response goes through the shared [`ResponseCache`], keyed by the full
/// request URL. Primary lookups (trending videos, channel search) return
/// upstream errors to the caller. Enrichment lookups log the error and fall
/// back to an empty result, except for a missing API key, which is always
/// returned as [`ApiError::MissingCredential`].
pub struct YoutubeService {
    api_key: Option<String>,
    base_url: String,
    region_code: String,
    popular_channel_ids: Vec<String>,
    cache: Arc<ResponseCache>,
    transport: Arc<dyn HttpTransport>,
}

impl YoutubeService {
    pub fn new(
        config: &Config,
        cache: Arc<ResponseCache>,
        transport: Arc<dyn HttpTransport>,
    ) -> YoutubeService {
        YoutubeService {
            api_key: config.youtube_api_key.clone(),
            base_url: config.youtube_api_base_url.trim_end_matches('/').to_string(),
            region_code: config.region_code.clone(),
            popular_channel_ids: config.popular_channel_ids.clone(),
            cache,
            transport,
        }
    }

    /// Most popular videos for the configured region, in chart order.
    ///
    /// Pages through the chart 50 videos at a time until `max_results` is
    /// covered or the chart runs out. `category_id` of `"all"` means no filter.
    pub async fn fetch_trending_videos(
        &self,
        max_results: usize,
        category_id: Option<&str>,
    ) -> Result<Vec<Video>, ApiError> {
        let category = category_id
            .map(str::trim)
            .filter(|category| !category.is_empty() && *category != ALL_CATEGORIES);

        if self.api_key.is_none() {
            return Err(ApiError::MissingCredential);
        }

        info!(
            "Fetching up to {} trending videos{}",
            max_results,
            category.map_or(String::new(), |c| format!(" for category {}", c))
        );

        let num_requests = max_results.div_ceil(TRENDING_PAGE_SIZE);
        let page_size = TRENDING_PAGE_SIZE.to_string();
        let mut videos: Vec<Video> = Vec::new();
        let mut page_token: Option<String> = None;

        for page in 0..num_requests {
            let url = {
                let mut params = vec![
                    ("part", TRENDING_PARTS),
                    ("chart", "mostPopular"),
                    ("regionCode", self.region_code.as_str()),
                    ("maxResults", page_size.as_str()),
                ];
                if let Some(category) = category {
                    params.push(("videoCategoryId", category));
                }
                if let Some(token) = page_token.as_deref() {
                    params.push(("pageToken", token));
                }
                self.api_url("videos", &params)?
            };

            let (page_videos, next_page_token) =
                self.fetch_with_cache(url, normalize_video_page).await?;
            debug!(
                "Received {} trending videos for page {}",
                page_videos.len(),
                page + 1
            );

            videos.extend(page_videos);

            match next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => {
                    debug!("No more trending pages available");
                    break;
                }
            }
        }

        if videos.is_empty() {
            return Err(ApiError::NoTrendingVideos {
                category: category.map(str::to_string),
            });
        }

        videos.truncate(max_results);
        Ok(videos)
    }

    /// A random selection of well-known channels, most subscribed first.
    pub async fn fetch_popular_channels(&self, max_results: usize) -> Result<Vec<Channel>, ApiError> {
        degrade(
            self.load_popular_channels(max_results).await,
            "popular channels",
        )
    }

    async fn load_popular_channels(&self, max_results: usize) -> Result<Vec<Channel>, ApiError> {
        let channel_ids = self.pick_popular_channel_ids(max_results);
        if channel_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut channels = self.load_channels(&channel_ids, CHANNEL_PARTS).await?;
        channels.sort_by(|a, b| {
            b.statistics
                .subscriber_count
                .cmp(&a.statistics.subscriber_count)
        });

        Ok(channels)
    }

    fn pick_popular_channel_ids(&self, max_results: usize) -> Vec<String> {
        let mut channel_ids = self.popular_channel_ids.clone();
        channel_ids.shuffle(&mut rand::thread_rng());
        channel_ids.truncate(max_results);

        channel_ids
    }

    /// Channels matching a free-text query. A blank query returns nothing
    /// without contacting the API.
    pub async fn search_channels(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<Channel>, ApiError> {
        let query = query.trim();
        if query.is_empty() {
            debug!("Empty search query, skipping search");
            return Ok(Vec::new());
        }

        let channel_ids = self.search_channel_ids(query, max_results).await?;
        if channel_ids.is_empty() {
            info!("No channels found for {:?}", query);
            return Ok(Vec::new());
        }

        self.load_channels(&channel_ids, CHANNEL_PARTS).await
    }

    /// Full details of one channel, or `None` if it does not exist.
    pub async fn fetch_channel_details(&self, channel_id: &str) -> Result<Option<Channel>, ApiError> {
        let channel_id = channel_id.trim();
        if channel_id.is_empty() {
            return Ok(None);
        }

        degrade(
            self.load_channel_details(channel_id).await,
            "channel details",
        )
    }

    async fn load_channel_details(&self, channel_id: &str) -> Result<Option<Channel>, ApiError> {
        let url = self.api_url(
            "channels",
            &[("part", CHANNEL_DETAIL_PARTS), ("id", channel_id)],
        )?;
        let channels = self.fetch_with_cache(url, normalize_channels).await?;

        Ok(channels.into_iter().next())
    }

    /// Latest uploads of a channel with their statistics.
    pub async fn fetch_channel_videos(
        &self,
        channel_id: &str,
        max_results: usize,
    ) -> Result<Vec<Video>, ApiError> {
        let channel_id = channel_id.trim();
        if channel_id.is_empty() {
            return Ok(Vec::new());
        }

        degrade(
            self.load_channel_videos(channel_id, max_results).await,
            "channel videos",
        )
    }

    async fn load_channel_videos(
        &self,
        channel_id: &str,
        max_results: usize,
    ) -> Result<Vec<Video>, ApiError> {
        let url = self.api_url(
            "channels",
            &[("part", "contentDetails"), ("id", channel_id)],
        )?;
        let uploads_playlist_id = self
            .fetch_with_cache(url, |channel: YouTubeChannelDetails| {
                Ok(channel
                    .items
                    .first()
                    .and_then(|item| item.uploads_playlist_id())
                    .map(str::to_string))
            })
            .await?;

        let uploads_playlist_id = match uploads_playlist_id {
            Some(playlist_id) => playlist_id,
            None => {
                debug!("Channel {} has no uploads playlist", channel_id);
                return Ok(Vec::new());
            }
        };

        let max_results = max_results.to_string();
        let url = self.api_url(
            "playlistItems",
            &[
                ("part", "snippet"),
                ("maxResults", max_results.as_str()),
                ("playlistId", uploads_playlist_id.as_str()),
            ],
        )?;
        let uploads = self.fetch_with_cache(url, normalize_uploads).await?;
        if uploads.is_empty() {
            return Ok(Vec::new());
        }

        let video_ids = uploads
            .iter()
            .map(|video| video.id.as_str())
            .collect::<Vec<&str>>()
            .join(",");
        let url = self.api_url(
            "videos",
            &[("part", "statistics,contentDetails"), ("id", video_ids.as_str())],
        )?;
        let mut details = self.fetch_with_cache(url, normalize_upload_details).await?;

        Ok(uploads
            .into_iter()
            .map(|video| match details.remove(&video.id) {
                Some((statistics, duration)) => Video {
                    statistics,
                    duration,
                    ..video
                },
                None => video,
            })
            .collect())
    }

    pub async fn fetch_channel_playlists(
        &self,
        channel_id: &str,
        max_results: usize,
    ) -> Result<Vec<Playlist>, ApiError> {
        let channel_id = channel_id.trim();
        if channel_id.is_empty() {
            return Ok(Vec::new());
        }

        degrade(
            self.load_channel_playlists(channel_id, max_results).await,
            "channel playlists",
        )
    }

    async fn load_channel_playlists(
        &self,
        channel_id: &str,
        max_results: usize,
    ) -> Result<Vec<Playlist>, ApiError> {
        let max_results = max_results.to_string();
        let url = self.api_url(
            "playlists",
            &[
                ("part", "snippet,contentDetails"),
                ("channelId", channel_id),
                ("maxResults", max_results.as_str()),
            ],
        )?;

        self.fetch_with_cache(url, |response: YouTubePlaylists| {
            response.items.into_iter().map(Playlist::try_from).collect()
        })
        .await
    }

    /// Channels found by searching for the first two words of the channel's
    /// title. The channel itself is never part of the result.
    pub async fn fetch_similar_channels(
        &self,
        channel_id: &str,
        max_results: usize,
    ) -> Result<Vec<Channel>, ApiError> {
        let channel_id = channel_id.trim();
        if channel_id.is_empty() {
            return Ok(Vec::new());
        }

        degrade(
            self.load_similar_channels(channel_id, max_results).await,
            "similar channels",
        )
    }

    async fn load_similar_channels(
        &self,
        channel_id: &str,
        max_results: usize,
    ) -> Result<Vec<Channel>, ApiError> {
        let channel = match self.fetch_channel_details(channel_id).await? {
            Some(channel) => channel,
            None => return Ok(Vec::new()),
        };

        let query = similar_channel_query(&channel.title);
        if query.is_empty() {
            return Ok(Vec::new());
        }

        // one extra result makes up for the channel itself showing up
        let channel_ids: Vec<String> = self
            .search_channel_ids(&query, max_results.saturating_add(1))
            .await?
            .into_iter()
            .filter(|id| id != channel_id)
            .take(max_results)
            .collect();
        if channel_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut channels = self.load_channels(&channel_ids, CHANNEL_PARTS).await?;
        channels.retain(|similar| similar.id != channel_id);

        Ok(channels)
    }

    /// Categories assignable to videos in a region. A blank region falls back
    /// to the configured one.
    pub async fn fetch_video_categories(&self, region_code: &str) -> Result<Vec<Category>, ApiError> {
        let region_code = match region_code.trim() {
            "" => self.region_code.as_str(),
            region_code => region_code,
        };

        degrade(
            self.load_video_categories(region_code).await,
            "video categories",
        )
    }

    async fn load_video_categories(&self, region_code: &str) -> Result<Vec<Category>, ApiError> {
        let url = self.api_url(
            "videoCategories",
            &[("part", "snippet"), ("regionCode", region_code)],
        )?;

        self.fetch_with_cache(url, |response: YouTubeVideoCategories| {
            response.items.into_iter().map(Category::try_from).collect()
        })
        .await
    }

    async fn search_channel_ids(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<String>, ApiError> {
        let max_results = max_results.to_string();
        let url = self.api_url(
            "search",
            &[
                ("part", "snippet"),
                ("type", "channel"),
                ("q", query),
                ("maxResults", max_results.as_str()),
            ],
        )?;

        self.fetch_with_cache(url, |response: YouTubeSearchResponse| {
            Ok(response
                .items
                .iter()
                .filter_map(|item| item.channel_id())
                .map(str::to_string)
                .collect())
        })
        .await
    }

    async fn load_channels(&self, channel_ids: &[String], part: &str) -> Result<Vec<Channel>, ApiError> {
        let ids = channel_ids.join(",");
        let url = self.api_url("channels", &[("part", part), ("id", ids.as_str())])?;

        self.fetch_with_cache(url, normalize_channels).await
    }

    fn api_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Url, ApiError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ApiError::MissingCredential)?;
        let endpoint_url = format!("{}/{}", self.base_url, endpoint);

        Url::parse_with_params(
            &endpoint_url,
            params.iter().copied().chain(std::iter::once(("key", api_key))),
        )
        .map_err(|err| ApiError::InvalidRequest(format!("{}: {}", endpoint_url, err)))
    }

    /// Serves the payload from the cache or fetches it, then decodes and
    /// normalizes it. A payload is only cached once `normalize` accepts it.
    async fn fetch_with_cache<T, R, F>(&self, url: Url, normalize: F) -> Result<R, ApiError>
    where
        T: DeserializeOwned,
        F: FnOnce(T) -> Result<R, ApiError>,
    {
        let key = url.to_string();

        if let Some(payload) = self.cache.get(&key) {
            debug!("Cache hit for {}", url.path());
            return normalize(serde_json::from_value::<T>(payload)?);
        }

        let payload = self.transport.get_json(&url).await?;
        let normalized = normalize(serde_json::from_value::<T>(payload.clone())?)?;
        self.cache.put(&key, payload);

        Ok(normalized)
    }
}

fn normalize_channels(response: YouTubeChannelDetails) -> Result<Vec<Channel>, ApiError> {
    response.items.into_iter().map(Channel::try_from).collect()
}

fn normalize_video_page(
    response: YouTubeVideoDetails,
) -> Result<(Vec<Video>, Option<String>), ApiError> {
    let videos = response
        .items
        .into_iter()
        .map(Video::try_from)
        .collect::<Result<Vec<Video>, ApiError>>()?;

    Ok((videos, response.next_page_token))
}

/// Uploads without statistics yet. Entries without a video id are skipped.
fn normalize_uploads(response: YouTubePlaylistItems) -> Result<Vec<Video>, ApiError> {
    response
        .items
        .into_iter()
        .filter(|item| item.video_id().is_some())
        .map(Video::from_playlist_item)
        .collect()
}

fn normalize_upload_details(response: YouTubeVideoDetails) -> Result<UploadDetails, ApiError> {
    response
        .items
        .into_iter()
        .map(|item| {
            let statistics = match item.statistics.as_ref() {
                Some(statistics) => VideoStatistics::try_from(statistics)?,
                None => VideoStatistics::default(),
            };
            let duration = item.content_details.and_then(|content| content.duration);

            Ok((item.id, (statistics, duration)))
        })
        .collect()
}

/// Enrichment lookups never fail the caller, unless the API key is missing.
fn degrade<T: Default>(result: Result<T, ApiError>, what: &str) -> Result<T, ApiError> {
    match result {
        Ok(value) => Ok(value),
        Err(ApiError::MissingCredential) => Err(ApiError::MissingCredential),
        Err(err) => {
            warn!("Error while fetching {}: {}", what, err);
            Ok(T::default())
        }
    }
}

fn similar_channel_query(title: &str) -> String {
    let separator = Regex::new(r"[\s-]+").expect("separator pattern is valid");

    separator
        .split(title)
        .filter(|word| !word.is_empty())
        .take(2)
        .collect::<Vec<&str>>()
        .join(" ")
}
