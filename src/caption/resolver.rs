//! Caption resolution with write-through caching

use super::cache::CaptionCache;
use super::key::CaptionKey;
use crate::api::{methods, ApiClient, ImageCaptionResponse, InstagramPost, MethodCall};
use crate::config::{AppConfig, CaptionConfig};
use crate::error::{Error, Result};
use crate::resolve::SocialPostResolver;
use crate::types::ItemId;
use async_trait::async_trait;
use chrono::DateTime;
use std::sync::Arc;
use tracing::{debug, error};

/// Produces caption text for resolved resources
#[async_trait]
pub trait Captioner: Send + Sync {
    /// Caption for `key`
    async fn caption(&self, key: &str) -> Result<String>;

    /// Release resources held by the captioner
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Caption resolver backed by the collection API
///
/// Owns its cache. The API client is shared and injected.
pub struct CaptionResolver {
    client: Arc<dyn ApiClient>,
    social: SocialPostResolver,
    cache: CaptionCache,
    config: CaptionConfig,
}

impl CaptionResolver {
    /// Create a resolver with a fresh cache of `max_cost` bytes
    pub fn new(client: Arc<dyn ApiClient>, config: CaptionConfig, max_cost: u64) -> Self {
        Self {
            social: SocialPostResolver::new(Arc::clone(&client)),
            client,
            cache: CaptionCache::new(max_cost),
            config,
        }
    }

    /// Create a resolver from application config
    pub fn from_config(client: Arc<dyn ApiClient>, config: &AppConfig) -> Self {
        Self::new(client, config.captions.clone(), config.cache.max_cost)
    }

    /// The resolver's cache
    pub fn cache(&self) -> &CaptionCache {
        &self.cache
    }

    /// Caption for `key`, served from cache when present
    ///
    /// On a miss the key is classified, the matching API method is called
    /// and the caption is cached before it is returned. Keys of unknown shape
    /// fail with `Error::UnsupportedKey` and are never cached.
    pub async fn caption_for(&self, key: &str) -> Result<String> {
        self.cache
            .try_get_or_insert_with(key, || async {
                debug!(key, "Caption cache miss");
                self.fetch_caption(key).await.inspect_err(|e| {
                    error!(key, error = %e, "Failed to derive caption");
                })
            })
            .await
    }

    async fn fetch_caption(&self, key: &str) -> Result<String> {
        match CaptionKey::classify(key)? {
            CaptionKey::SocialPost { post_id } => {
                let post = self.social.fetch_post(post_id).await?;
                format_post_caption(&post, post_id, &self.config)
            }
            CaptionKey::Image { image_id } => self.image_caption(image_id).await,
        }
    }

    async fn image_caption(&self, image_id: i64) -> Result<String> {
        let call = MethodCall::new(methods::GET_IMAGE_CAPTION).with("image_id", image_id);
        let rsp: ImageCaptionResponse = self.client.execute_method(&call).await?.decode()?;
        Ok(rsp.caption)
    }
}

#[async_trait]
impl Captioner for CaptionResolver {
    async fn caption(&self, key: &str) -> Result<String> {
        self.caption_for(key).await
    }
}

impl std::fmt::Debug for CaptionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptionResolver")
            .field("cache", &self.cache)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Three-line caption for a social post
///
/// Quoted excerpt, posting date (UTC, `January 02, 2006`) and permalink.
pub fn format_post_caption(
    post: &InstagramPost,
    post_id: ItemId,
    config: &CaptionConfig,
) -> Result<String> {
    let taken = DateTime::from_timestamp(post.taken, 0)
        .ok_or_else(|| Error::decode(format!("Invalid post timestamp {}", post.taken)))?;
    let excerpt = post
        .caption
        .as_ref()
        .map(|c| c.excerpt.as_str())
        .unwrap_or_default();

    Ok([
        format!("\"{excerpt}\""),
        format!(
            "This was posted to the {} Instagram account on {}",
            config.account_name,
            taken.format("%B %d, %Y")
        ),
        format!(
            "{}/{post_id}",
            config.permalink_base.trim_end_matches('/')
        ),
    ]
    .join("\n"))
}
