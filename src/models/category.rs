use serde::Serialize;

use super::youtube_video_categories::VideoCategoryItem;
use crate::errors::ApiError;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub title: String,
    pub assignable: bool,
}

impl TryFrom<VideoCategoryItem> for Category {
    type Error = ApiError;

    fn try_from(item: VideoCategoryItem) -> Result<Self, Self::Error> {
        let snippet = item.snippet.ok_or_else(|| {
            ApiError::ContractViolation(format!("category {} has no snippet", item.id))
        })?;

        Ok(Category {
            id: item.id,
            title: snippet.title,
            assignable: snippet.assignable,
        })
    }
}
