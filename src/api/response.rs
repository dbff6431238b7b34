//! Response shapes consumed from the collection API

use crate::types::{ItemId, JsonValue};
use serde::{Deserialize, Serialize};

/// One page of the shoebox listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListItemsResponse {
    /// Items on this page, in listing order
    pub items: Vec<ListingItem>,
}

/// An item in the shoebox listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingItem {
    /// Object id or post id, depending on `type_id`
    #[serde(alias = "itemId")]
    pub item_id: ItemId,
    /// Remote type tag
    #[serde(alias = "typeId")]
    pub type_id: i64,
}

/// One page of an object's image listing
///
/// Entries stay as raw JSON so a malformed image can be skipped without
/// failing its siblings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageListResponse {
    /// Image records in listing order
    pub images: Vec<JsonValue>,
}

/// Instagram post detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstagramPostResponse {
    /// The post record
    #[serde(alias = "Post")]
    pub post: InstagramPost,
}

/// An Instagram post record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstagramPost {
    /// Caption text
    #[serde(default)]
    pub caption: Option<InstagramPostCaption>,
    /// Post id
    #[serde(default)]
    pub id: Option<ItemId>,
    /// Provider media id
    #[serde(default)]
    pub media_id: Option<String>,
    /// Path of the post's media file
    #[serde(default)]
    pub path: String,
    /// Perceptual hash of the media file
    #[serde(default)]
    pub perceptual_hash: Option<String>,
    /// Unix timestamp the post was taken
    #[serde(default)]
    pub taken: i64,
    /// Human-readable timestamp
    #[serde(default)]
    pub taken_at: Option<String>,
    /// Gazetteer id
    #[serde(rename = "wof:id", default)]
    pub wof_id: Option<i64>,
}

/// Caption block of an Instagram post
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstagramPostCaption {
    /// Full caption body
    #[serde(default)]
    pub body: String,
    /// Short excerpt of the caption
    #[serde(default)]
    pub excerpt: String,
    /// Hashtags mentioned in the caption
    #[serde(default)]
    pub hashtags: Vec<String>,
    /// Users mentioned in the caption
    #[serde(default)]
    pub users: Vec<String>,
}

/// Caption for a collection image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageCaptionResponse {
    /// Caption text
    pub caption: String,
}
