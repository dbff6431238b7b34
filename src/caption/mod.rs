//! Caption resolution
//!
//! Derives human-readable captions for resolved resources.
//!
//! # Overview
//!
//! - `CaptionResolver` - classifies a key, calls the image caption or social
//!   post method, and caches the result
//! - `CaptionKey` - the two key shapes that can be captioned
//! - `CaptionCache` - cost-bounded concurrent cache (moka)
//! - `Captioner` - trait the registry hands out

mod cache;
mod key;
mod resolver;

pub use cache::CaptionCache;
pub use key::CaptionKey;
pub use resolver::{format_post_caption, CaptionResolver, Captioner};
