use chrono::{DateTime, Utc};

use crate::errors::ApiError;

pub mod category;
pub mod channel;
pub mod config;
pub mod pages;
pub mod playlist;
pub mod video;
pub mod youtube_channel_details;
pub mod youtube_playlist_items;
pub mod youtube_playlists;
pub mod youtube_search_response;
pub mod youtube_thumbnails;
pub mod youtube_video_categories;
pub mod youtube_video_details;

/// Counts arrive as decimal strings. Absent counts are zero.
pub(crate) fn parse_count(value: Option<&str>, field: &str) -> Result<u64, ApiError> {
    match value {
        None => Ok(0),
        Some(value) => value.trim().parse::<u64>().map_err(|_| {
            ApiError::ContractViolation(format!("{} is not a count: {:?}", field, value))
        }),
    }
}

pub(crate) fn parse_timestamp(value: &str, field: &str) -> Result<DateTime<Utc>, ApiError> {
    DateTime::parse_from_rfc3339(value)
        .map(|date| date.with_timezone(&Utc))
        .map_err(|err| {
            ApiError::ContractViolation(format!("{} is not a timestamp ({}): {:?}", field, err, value))
        })
}
