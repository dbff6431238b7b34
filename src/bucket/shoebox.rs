//! Shoebox-backed bucket

use super::types::{attributes_from_headers, validate_key, Bucket};
use crate::api::{ApiClient, RestApiClient};
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::resolve::{Discovery, ResultSequence};
use crate::types::Attributes;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Response, StatusCode};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Bucket over the caller's shoebox
///
/// Discovery goes through the collection API. Reads and attribute lookups
/// are plain GET/HEAD requests against the media host and only accept keys
/// under the trusted prefix.
#[derive(Debug)]
pub struct ShoeboxBucket {
    discovery: Discovery,
    media: HttpClient,
    trusted_prefix: String,
}

impl ShoeboxBucket {
    /// Create a bucket from its collaborators
    pub fn new(
        client: Arc<dyn ApiClient>,
        media: HttpClient,
        trusted_prefix: impl Into<String>,
    ) -> Self {
        Self {
            discovery: Discovery::new(client),
            media,
            trusted_prefix: trusted_prefix.into(),
        }
    }

    /// Create a bucket from application config
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = RestApiClient::from_config(config)?;
        let media = HttpClient::with_config(config.http.to_client_config())?;
        Ok(Self::new(
            Arc::new(client),
            media,
            config.media.trusted_prefix.clone(),
        ))
    }

    /// Prefix every readable key must start with
    pub fn trusted_prefix(&self) -> &str {
        &self.trusted_prefix
    }

    fn check_ok(response: &Response) -> Result<()> {
        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::http_status(
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl Bucket for ShoeboxBucket {
    fn gather_pictures(&self, cancel: &CancellationToken) -> ResultSequence {
        self.discovery.gather(cancel)
    }

    async fn new_reader(&self, key: &str) -> Result<Bytes> {
        validate_key(key, &self.trusted_prefix)?;

        let response = self.media.get(key).await?;
        Self::check_ok(&response)?;

        let bytes = response.bytes().await?;
        debug!(key, bytes = bytes.len(), "Read media");
        Ok(bytes)
    }

    async fn attributes(&self, key: &str) -> Result<Attributes> {
        validate_key(key, &self.trusted_prefix)?;

        let response = self.media.head(key).await?;
        Self::check_ok(&response)?;

        attributes_from_headers(response.headers())
    }
}
