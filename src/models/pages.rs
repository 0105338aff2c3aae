use serde::Serialize;

use super::channel::Channel;
use super::playlist::Playlist;
use super::video::Video;

#[derive(Default, Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomePage {
    pub videos: Vec<Video>,
    pub channels: Vec<Channel>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub query: String,
    pub channels: Vec<Channel>,
    pub error: Option<String>,
}

/// `channel` is `None` when the channel does not exist.
#[derive(Default, Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelPage {
    pub channel: Option<Channel>,
    pub videos: Vec<Video>,
    pub playlists: Vec<Playlist>,
    pub similar_channels: Vec<Channel>,
}
