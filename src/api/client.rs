//! API client trait and REST implementation

use super::body::PageBody;
use super::method::MethodCall;
use crate::auth::AuthConfig;
use crate::config::AppConfig;
use crate::error::Result;
use crate::http::{HttpClient, HttpClientConfig, RequestConfig};
use async_trait::async_trait;
use tracing::debug;

/// Default endpoint for the collection API
pub const DEFAULT_API_ENDPOINT: &str = "https://api.sfomuseum.org/rest";

/// Executes remote API methods
///
/// Implementations are shared across resolvers and must be safe to call
/// concurrently.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Execute one method call and return its raw body
    ///
    /// Any transport failure, including a non-success status, is an error.
    async fn execute_method(&self, call: &MethodCall) -> Result<PageBody>;
}

/// REST client for the collection API
///
/// Sends `GET {endpoint}?method=<name>&<args>` with the access token
/// attached by the configured authenticator.
#[derive(Debug)]
pub struct RestApiClient {
    http: HttpClient,
    endpoint: String,
}

impl RestApiClient {
    /// Create a client for `endpoint`
    pub fn new(
        endpoint: impl Into<String>,
        auth: AuthConfig,
        http_config: HttpClientConfig,
    ) -> Result<Self> {
        Ok(Self {
            http: HttpClient::with_auth(http_config, auth)?,
            endpoint: endpoint.into(),
        })
    }

    /// Create a client from application config
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let auth = match &config.api.access_token {
            Some(token) => AuthConfig::query_token(&config.api.token_param, token),
            None => AuthConfig::None,
        };
        Self::new(
            config.api.endpoint.clone(),
            auth,
            config.http.to_client_config(),
        )
    }

    /// API endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ApiClient for RestApiClient {
    async fn execute_method(&self, call: &MethodCall) -> Result<PageBody> {
        let mut request = RequestConfig::new().query("method", call.method());
        for (key, value) in call.args() {
            request = request.query(key, value);
        }

        let bytes = self
            .http
            .get_bytes_with_config(&self.endpoint, request)
            .await?;

        debug!(
            method = call.method(),
            bytes = bytes.len(),
            "Executed API method"
        );
        Ok(PageBody::new(bytes))
    }
}
