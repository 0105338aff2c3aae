use chrono::{DateTime, Utc};
use serde::Serialize;

use super::youtube_playlist_items::PlaylistItem;
use super::youtube_thumbnails::Thumbnails;
use super::youtube_video_details::{Statistics, YouTubeVideoItem};
use super::{parse_count, parse_timestamp};
use crate::errors::ApiError;
use crate::utils::format_utils;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnails: Thumbnails,
    pub channel_id: String,
    pub channel_title: String,
    pub published_at: DateTime<Utc>,
    pub tags: Vec<String>,
    pub category_id: Option<String>,
    pub statistics: VideoStatistics,
    pub topic_ids: Vec<String>,
    pub duration: Option<String>,
}

const MAX_TOPIC_LABELS: usize = 3;

const TOPIC_LABELS: &[(&str, &str)] = &[
    ("/m/04rlf", "Music"),
    ("/m/02mscn", "Christian music"),
    ("/m/0glt670", "Hip hop music"),
    ("/m/06by7", "Rock music"),
    ("/m/03_d0", "Jazz"),
    ("/m/0g293", "Pop music"),
    ("/m/064t9", "Pop rock"),
    ("/m/0gywn", "Classical music"),
    ("/m/0bzvm2", "Gaming"),
    ("/m/02jjt", "Entertainment"),
    ("/m/098wr", "Society"),
    ("/m/09s1f", "Politics"),
    ("/m/01k8wb", "Knowledge"),
    ("/m/01h6rj", "Lifestyle"),
    ("/m/07c1v", "Technology"),
    ("/m/019_rr", "Vehicles"),
    ("/m/07bxq", "Tourism"),
    ("/m/032tl", "Fashion"),
    ("/m/027x7n", "Fitness"),
    ("/m/02wbm", "Food"),
    ("/m/0f2f9", "Pets"),
    ("/m/068hy", "Religion"),
    ("/m/041xxh", "Comedy"),
    ("/m/05qjc", "Nature"),
];

#[derive(Default, Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
}

impl Video {
    /// `MM:SS` / `H:MM:SS`, when the duration was requested.
    pub fn formatted_duration(&self) -> Option<String> {
        self.duration.as_deref().map(format_utils::format_duration)
    }

    /// Up to three readable labels for the video's topics. Unknown topic ids
    /// are skipped.
    pub fn topic_labels(&self) -> Vec<&'static str> {
        self.topic_ids
            .iter()
            .filter_map(|id| topic_label(id))
            .take(MAX_TOPIC_LABELS)
            .collect()
    }

    /// Builds a video from an uploads playlist entry. Statistics and duration
    /// are looked up separately and start out empty.
    pub fn from_playlist_item(item: PlaylistItem) -> Result<Video, ApiError> {
        let id = item.video_id().map(str::to_string).ok_or_else(|| {
            ApiError::ContractViolation(format!("playlist item {} has no video id", item.id))
        })?;
        let snippet = item.snippet.ok_or_else(|| {
            ApiError::ContractViolation(format!("playlist item {} has no snippet", item.id))
        })?;

        Ok(Video {
            published_at: parse_timestamp(&snippet.published_at, "publishedAt")?,
            id,
            title: snippet.title,
            description: snippet.description,
            thumbnails: snippet.thumbnails,
            channel_id: snippet.video_owner_channel_id.unwrap_or(snippet.channel_id),
            channel_title: snippet
                .video_owner_channel_title
                .unwrap_or(snippet.channel_title),
            tags: Vec::new(),
            category_id: None,
            statistics: VideoStatistics::default(),
            topic_ids: Vec::new(),
            duration: None,
        })
    }
}

/// Freebase topic id to label, for the topics YouTube assigns most often.
pub fn topic_label(topic_id: &str) -> Option<&'static str> {
    TOPIC_LABELS
        .iter()
        .find(|(id, _)| *id == topic_id)
        .map(|(_, label)| *label)
}

impl TryFrom<&Statistics> for VideoStatistics {
    type Error = ApiError;

    fn try_from(statistics: &Statistics) -> Result<Self, Self::Error> {
        Ok(VideoStatistics {
            view_count: parse_count(statistics.view_count.as_deref(), "viewCount")?,
            like_count: parse_count(statistics.like_count.as_deref(), "likeCount")?,
            comment_count: parse_count(statistics.comment_count.as_deref(), "commentCount")?,
        })
    }
}

impl TryFrom<YouTubeVideoItem> for Video {
    type Error = ApiError;

    fn try_from(item: YouTubeVideoItem) -> Result<Self, Self::Error> {
        let snippet = item.snippet.ok_or_else(|| {
            ApiError::ContractViolation(format!("video {} has no snippet", item.id))
        })?;

        let statistics = match item.statistics.as_ref() {
            Some(statistics) => VideoStatistics::try_from(statistics)?,
            None => VideoStatistics::default(),
        };

        Ok(Video {
            published_at: parse_timestamp(&snippet.published_at, "publishedAt")?,
            id: item.id,
            title: snippet.title,
            description: snippet.description,
            thumbnails: snippet.thumbnails,
            channel_id: snippet.channel_id,
            channel_title: snippet.channel_title,
            tags: snippet.tags.unwrap_or_default(),
            category_id: snippet.category_id,
            statistics,
            topic_ids: item
                .topic_details
                .and_then(|topics| topics.relevant_topic_ids)
                .unwrap_or_default(),
            duration: item.content_details.and_then(|content| content.duration),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_trending_video() {
        let item: YouTubeVideoItem = serde_json::from_value(json!({
            "id": "v1",
            "snippet": {
                "publishedAt": "2024-03-01T12:00:00Z",
                "channelId": "UC1",
                "channelTitle": "Channel One",
                "title": "First",
                "description": "desc",
                "thumbnails": { "high": { "url": "https://i.ytimg.com/h.jpg", "width": 480, "height": 360 } },
                "categoryId": "10"
            },
            "statistics": { "viewCount": "1500", "likeCount": "20" },
            "topicDetails": { "relevantTopicIds": ["/m/04rlf"] },
            "contentDetails": { "duration": "PT3M7S" }
        }))
        .unwrap();

        let video = Video::try_from(item).unwrap();
        assert_eq!(video.statistics.view_count, 1500);
        assert_eq!(video.statistics.comment_count, 0);
        assert_eq!(video.tags, Vec::<String>::new());
        assert_eq!(video.topic_ids, vec!["/m/04rlf"]);
        assert_eq!(video.category_id.as_deref(), Some("10"));
        assert_eq!(video.formatted_duration().as_deref(), Some("03:07"));
    }

    #[test]
    fn playlist_entry_starts_without_statistics() {
        let entry: PlaylistItem = serde_json::from_value(json!({
            "id": "pi1",
            "snippet": {
                "publishedAt": "2024-03-01T12:00:00Z",
                "channelId": "UC1",
                "channelTitle": "Channel One",
                "title": "Upload",
                "resourceId": { "kind": "youtube#video", "videoId": "v9" }
            }
        }))
        .unwrap();

        let video = Video::from_playlist_item(entry).unwrap();
        assert_eq!(video.id, "v9");
        assert_eq!(video.channel_title, "Channel One");
        assert_eq!(video.statistics, VideoStatistics::default());
        assert_eq!(video.duration, None);
    }

    #[test]
    fn playlist_entry_without_video_id_is_rejected() {
        let entry: PlaylistItem = serde_json::from_value(json!({
            "id": "pi2",
            "snippet": {
                "publishedAt": "2024-03-01T12:00:00Z",
                "channelId": "UC1",
                "title": "Deleted video"
            }
        }))
        .unwrap();

        assert!(matches!(
            Video::from_playlist_item(entry),
            Err(ApiError::ContractViolation(_))
        ));
    }

    #[test]
    fn topic_labels_skip_unknown_ids_and_keep_three() {
        assert_eq!(topic_label("/m/0bzvm2"), Some("Gaming"));
        assert_eq!(topic_label("/m/unknown"), None);

        let item: YouTubeVideoItem = serde_json::from_value(json!({
            "id": "v2",
            "snippet": {
                "publishedAt": "2024-03-01T12:00:00Z",
                "channelId": "UC1",
                "title": "Mixed"
            },
            "topicDetails": {
                "relevantTopicIds": ["/m/unknown", "/m/04rlf", "/m/06by7", "/m/02jjt", "/m/07c1v"]
            }
        }))
        .unwrap();

        let video = Video::try_from(item).unwrap();
        assert_eq!(video.topic_labels(), vec!["Music", "Rock music", "Entertainment"]);
    }
}
