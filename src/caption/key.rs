//! Caption key classification

use crate::error::{Error, Result};
use crate::types::{final_segment, ItemId, INSTAGRAM_PROVIDER_TAG, PROVIDER_FRAGMENT_MARKER};
use regex::Regex;
use std::sync::LazyLock;

/// Leading numeric image id of a media file name (`1913663409_abc_k.jpg`)
static IMAGE_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)_").unwrap());

/// What a resource key refers to, for captioning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionKey {
    /// Synthetic social post key (`...#ig:<post id>`)
    SocialPost {
        /// Post id from the fragment
        post_id: ItemId,
    },
    /// Plain media URI whose file name starts with `<image id>_`
    Image {
        /// Image id from the file name
        image_id: i64,
    },
}

impl CaptionKey {
    /// Classify `key`
    ///
    /// Fails with `Error::UnsupportedKey` when the key matches neither shape.
    pub fn classify(key: &str) -> Result<Self> {
        let segment = final_segment(key);

        if let Some((_, fragment)) = segment.split_once(PROVIDER_FRAGMENT_MARKER) {
            return match fragment.split_once(':') {
                Some((INSTAGRAM_PROVIDER_TAG, id)) => id
                    .parse::<ItemId>()
                    .map(|post_id| Self::SocialPost { post_id })
                    .map_err(|_| Error::unsupported_key(key)),
                _ => Err(Error::unsupported_key(key)),
            };
        }

        IMAGE_ID_REGEX
            .captures(segment)
            .and_then(|caps| caps[1].parse::<i64>().ok())
            .map(|image_id| Self::Image { image_id })
            .ok_or_else(|| Error::unsupported_key(key))
    }
}
