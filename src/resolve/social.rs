//! Social post resolution

use crate::api::{methods, ApiClient, InstagramPost, InstagramPostResponse, MethodCall};
use crate::error::Result;
use crate::types::{ItemId, ResolvedResource};
use std::sync::Arc;
use tracing::debug;

/// Resolves social post ids to synthetic keys
///
/// The key is the post's media path followed by `#ig:<post id>`, e.g.
/// `media/ig/3411.jpg#ig:3411`. The fragment is what the caption resolver
/// recognises; the bucket refuses such keys for reads.
#[derive(Clone)]
pub struct SocialPostResolver {
    client: Arc<dyn ApiClient>,
}

impl SocialPostResolver {
    /// Create a resolver over a shared API client
    pub fn new(client: Arc<dyn ApiClient>) -> Self {
        Self { client }
    }

    /// Fetch the detail record of one post
    pub async fn fetch_post(&self, post_id: ItemId) -> Result<InstagramPost> {
        let call = MethodCall::new(methods::GET_INSTAGRAM_POST).with("post_id", post_id);
        let rsp: InstagramPostResponse = self.client.execute_method(&call).await?.decode()?;
        Ok(rsp.post)
    }

    /// Resolve one post to its synthetic key
    pub async fn resolve(&self, post_id: ItemId) -> Result<ResolvedResource> {
        let post = self.fetch_post(post_id).await?;
        let id = post.id.unwrap_or(post_id);
        let key = ResolvedResource::social_post(&post.path, id);

        debug!(post = post_id, key = %key, "Resolved social post");
        Ok(key)
    }
}

impl std::fmt::Debug for SocialPostResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocialPostResolver").finish_non_exhaustive()
    }
}
