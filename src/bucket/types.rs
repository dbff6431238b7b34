//! Bucket trait and key/header helpers

use crate::error::{Error, Result};
use crate::resolve::ResultSequence;
use crate::types::{has_provider_fragment, Attributes};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, CONTENT_LENGTH, LAST_MODIFIED};
use tokio::io::AsyncWrite;
use tokio_util::sync::CancellationToken;

/// Read-only store of discovered media
#[async_trait]
pub trait Bucket: Send + Sync {
    /// Lazily discover every resource in the bucket
    fn gather_pictures(&self, cancel: &CancellationToken) -> ResultSequence;

    /// Read the full contents of `key`
    async fn new_reader(&self, key: &str) -> Result<Bytes>;

    /// Size and modification time of `key`
    async fn attributes(&self, key: &str) -> Result<Attributes>;

    /// Open `key` for writing
    async fn new_writer(&self, key: &str) -> Result<Box<dyn AsyncWrite + Send + Unpin>> {
        let _ = key;
        Err(Error::not_implemented("new_writer"))
    }

    /// Remove `key`
    async fn delete(&self, key: &str) -> Result<()> {
        let _ = key;
        Err(Error::not_implemented("delete"))
    }

    /// Release resources held by the bucket
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Check that `key` is a fetchable media URI under `trusted_prefix`
///
/// Synthetic social post keys are refused even when they happen to share
/// the prefix.
pub fn validate_key(key: &str, trusted_prefix: &str) -> Result<()> {
    if !key.starts_with(trusted_prefix) || has_provider_fragment(key) {
        return Err(Error::invalid_key(key));
    }
    Ok(())
}

/// Derive attributes from HEAD response headers
///
/// `Content-Length` must be a base-10 integer and `Last-Modified` an HTTP
/// date; a missing or malformed header is an error.
pub fn attributes_from_headers(headers: &HeaderMap) -> Result<Attributes> {
    let size = header_str(headers, CONTENT_LENGTH.as_str())?
        .trim()
        .parse::<u64>()
        .map_err(|e| Error::invalid_header(CONTENT_LENGTH.as_str(), e.to_string()))?;

    let mod_time = DateTime::parse_from_rfc2822(header_str(headers, LAST_MODIFIED.as_str())?)
        .map_err(|e| Error::invalid_header(LAST_MODIFIED.as_str(), e.to_string()))?
        .with_timezone(&Utc);

    Ok(Attributes { size, mod_time })
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str> {
    headers
        .get(name)
        .ok_or_else(|| Error::invalid_header(name, "missing"))?
        .to_str()
        .map_err(|e| Error::invalid_header(name, e.to_string()))
}
