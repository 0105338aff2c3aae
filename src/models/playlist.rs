use serde::Serialize;

use super::youtube_playlists::YouTubePlaylistItem;
use super::youtube_thumbnails::Thumbnails;
use crate::errors::ApiError;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnails: Thumbnails,
    pub item_count: Option<u64>,
}

impl TryFrom<YouTubePlaylistItem> for Playlist {
    type Error = ApiError;

    fn try_from(item: YouTubePlaylistItem) -> Result<Self, Self::Error> {
        let snippet = item.snippet.ok_or_else(|| {
            ApiError::ContractViolation(format!("playlist {} has no snippet", item.id))
        })?;

        Ok(Playlist {
            id: item.id,
            title: snippet.title,
            description: snippet.description,
            thumbnails: snippet.thumbnails,
            item_count: item.content_details.and_then(|details| details.item_count),
        })
    }
}
