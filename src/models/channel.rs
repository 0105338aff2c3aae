use chrono::{DateTime, Utc};
use serde::Serialize;

use super::youtube_channel_details::YoutubeChannelItem;
use super::youtube_thumbnails::Thumbnails;
use super::{parse_count, parse_timestamp};
use crate::errors::ApiError;
use crate::utils::keyword_utils;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: String,
    pub title: String,
    pub description: String,
    pub custom_url: Option<String>,
    pub thumbnails: Thumbnails,
    pub published_at: DateTime<Utc>,
    pub statistics: ChannelStatistics,
    pub country: Option<String>,
    pub uploads_playlist_id: Option<String>,
    pub branding: Option<Branding>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStatistics {
    pub subscriber_count: u64,
    pub view_count: u64,
    pub video_count: u64,
    pub hidden_subscriber_count: bool,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Branding {
    pub keywords: Vec<String>,
    pub banner_url: Option<String>,
    pub trailer_video_id: Option<String>,
}

impl TryFrom<YoutubeChannelItem> for Channel {
    type Error = ApiError;

    fn try_from(item: YoutubeChannelItem) -> Result<Self, Self::Error> {
        let uploads_playlist_id = item.uploads_playlist_id().map(str::to_string);

        let snippet = item.snippet.ok_or_else(|| {
            ApiError::ContractViolation(format!("channel {} has no snippet", item.id))
        })?;

        let statistics = match item.statistics {
            Some(statistics) => ChannelStatistics {
                subscriber_count: parse_count(
                    statistics.subscriber_count.as_deref(),
                    "subscriberCount",
                )?,
                view_count: parse_count(statistics.view_count.as_deref(), "viewCount")?,
                video_count: parse_count(statistics.video_count.as_deref(), "videoCount")?,
                hidden_subscriber_count: statistics.hidden_subscriber_count,
            },
            None => ChannelStatistics::default(),
        };

        let branding = item.branding_settings.map(|settings| {
            let channel = settings.channel.unwrap_or_default();
            Branding {
                keywords: keyword_utils::parse_keywords(&channel.keywords.unwrap_or_default()),
                banner_url: settings.image.and_then(|image| image.banner_external_url),
                trailer_video_id: channel.unsubscribed_trailer,
            }
        });

        Ok(Channel {
            published_at: parse_timestamp(&snippet.published_at, "publishedAt")?,
            id: item.id,
            title: snippet.title,
            description: snippet.description.unwrap_or_default(),
            custom_url: snippet.custom_url,
            thumbnails: snippet.thumbnails,
            statistics,
            country: snippet.country.map(|country| country.to_lowercase()),
            uploads_playlist_id,
            branding,
        })
    }
}
