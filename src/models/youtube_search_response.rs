use serde::Deserialize;

#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YouTubeSearchResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
    pub next_page_token: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItem {
    pub id: SearchId,
    pub snippet: Option<SearchSnippet>,
}

#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchId {
    pub kind: String,
    pub channel_id: Option<String>,
    pub video_id: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnippet {
    pub channel_id: Option<String>,
    pub title: Option<String>,
}

impl SearchItem {
    /// Channel id of a `type=channel` result, from the id or the snippet.
    pub fn channel_id(&self) -> Option<&str> {
        self.id
            .channel_id
            .as_deref()
            .or_else(|| self.snippet.as_ref()?.channel_id.as_deref())
            .filter(|id| !id.is_empty())
    }
}
