//! Common types used throughout shoebox-picturebook
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// Identifier of an item in a listing (object id or post id)
pub type ItemId = i64;

// ============================================================================
// Backoff Type
// ============================================================================

/// Backoff strategy for the HTTP transport's optional retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}

// ============================================================================
// Item Kind
// ============================================================================

/// Kind of a listing item, decoded from its integer type tag
///
/// The mapping is total: every tag the remote side may send lands in
/// exactly one variant, with `Unsupported` carrying the unknown tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// A collection object with zero or more images (tag 1)
    Object,
    /// A social media post (tag 2)
    SocialPost,
    /// Any other tag
    Unsupported(i64),
}

impl ItemKind {
    /// Tag used by the remote API for collection objects
    pub const OBJECT_TAG: i64 = 1;
    /// Tag used by the remote API for social posts
    pub const SOCIAL_POST_TAG: i64 = 2;

    /// Map a remote type tag to a kind
    pub fn from_type_id(type_id: i64) -> Self {
        match type_id {
            Self::OBJECT_TAG => Self::Object,
            Self::SOCIAL_POST_TAG => Self::SocialPost,
            other => Self::Unsupported(other),
        }
    }

    /// Remote type tag for this kind
    pub fn type_id(&self) -> i64 {
        match self {
            Self::Object => Self::OBJECT_TAG,
            Self::SocialPost => Self::SOCIAL_POST_TAG,
            Self::Unsupported(tag) => *tag,
        }
    }
}

// ============================================================================
// Resolved Resource
// ============================================================================

/// Separator between a social post's path and its provider fragment
pub const PROVIDER_FRAGMENT_MARKER: char = '#';

/// Provider tag for Instagram posts inside a synthetic key
pub const INSTAGRAM_PROVIDER_TAG: &str = "ig";

/// Identifier emitted by discovery
///
/// Two shapes exist:
/// - a plain fetchable URI for object images
///   (`https://static.sfomuseum.org/media/.../1913663409_abc_k.jpg`)
/// - a synthetic key for social posts: the post's own media path followed
///   by a provider fragment (`media/ig/3411.jpg#ig:3411`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedResource(String);

impl ResolvedResource {
    /// Wrap a plain fetchable URI
    pub fn uri(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// Build the synthetic key for a social post
    pub fn social_post(path: &str, post_id: ItemId) -> Self {
        Self(format!(
            "{path}{PROVIDER_FRAGMENT_MARKER}{INSTAGRAM_PROVIDER_TAG}:{post_id}"
        ))
    }

    /// Borrow the identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take ownership of the identifier
    pub fn into_string(self) -> String {
        self.0
    }

    /// True when the identifier carries a provider fragment
    pub fn is_synthetic(&self) -> bool {
        has_provider_fragment(&self.0)
    }
}

/// Check whether the final path segment of a key carries a provider fragment
pub fn has_provider_fragment(key: &str) -> bool {
    final_segment(key).contains(PROVIDER_FRAGMENT_MARKER)
}

/// Final `/`-delimited segment of a key
pub fn final_segment(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

impl fmt::Display for ResolvedResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ResolvedResource {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<ResolvedResource> for String {
    fn from(resource: ResolvedResource) -> Self {
        resource.0
    }
}

impl PartialEq<&str> for ResolvedResource {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// ============================================================================
// Attributes
// ============================================================================

/// Attributes of a stored media file, derived from a HEAD response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    /// Size in bytes (`Content-Length`)
    pub size: u64,
    /// Last modification time (`Last-Modified`)
    pub mod_time: DateTime<Utc>,
}

// ============================================================================
// Utility Types
// ============================================================================

/// Extension trait for Option<String>
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}
