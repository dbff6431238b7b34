//! Application configuration
//!
//! Settings for the API client, HTTP transport, media host, caption cache
//! and caption text, loadable from YAML. Every section has defaults, so an
//! empty document is a valid config.

use crate::api::DEFAULT_API_ENDPOINT;
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::{BackoffType, OptionStringExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Environment variable holding the access token
pub const ACCESS_TOKEN_ENV: &str = "SHOEBOX_ACCESS_TOKEN";

/// Default prefix every fetchable media URI must start with
pub const DEFAULT_TRUSTED_PREFIX: &str = "https://static.sfomuseum.org/media";

/// Default caption cache budget (bytes of cached keys and captions)
pub const DEFAULT_CACHE_MAX_COST: u64 = 1 << 30;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Collection API settings
    pub api: ApiConfig,
    /// HTTP transport settings
    pub http: HttpConfig,
    /// Media host settings
    pub media: MediaConfig,
    /// Caption cache settings
    pub cache: CacheConfig,
    /// Caption text settings
    pub captions: CaptionConfig,
}

impl AppConfig {
    /// Load config from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load config from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        // An empty document deserializes as null
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: AppConfig = serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Failed to parse config YAML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the access token when `token` is non-empty
    #[must_use]
    pub fn with_access_token(mut self, token: Option<String>) -> Self {
        if let Some(token) = token.none_if_empty() {
            self.api.access_token = Some(token);
        }
        self
    }

    /// Validate the config
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.api.endpoint)
            .map_err(|e| Error::invalid_config("api.endpoint", e.to_string()))?;

        if self.api.token_param.is_empty() {
            return Err(Error::invalid_config("api.token_param", "cannot be empty"));
        }

        let prefix = Url::parse(&self.media.trusted_prefix)
            .map_err(|e| Error::invalid_config("media.trusted_prefix", e.to_string()))?;
        if prefix.scheme() != "https" {
            return Err(Error::invalid_config(
                "media.trusted_prefix",
                "must be an https URL",
            ));
        }

        if self.cache.max_cost == 0 {
            return Err(Error::invalid_config(
                "cache.max_cost",
                "must be greater than zero",
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Sections
// ============================================================================

/// Collection API settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// REST endpoint
    pub endpoint: String,
    /// Pre-formed access token
    pub access_token: Option<String>,
    /// Query parameter carrying the token
    pub token_param: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_API_ENDPOINT.to_string(),
            access_token: None,
            token_param: "access_token".to_string(),
        }
    }
}

/// HTTP transport settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Transport-level retries, off by default
    ///
    /// Discovery, resolution and captions never retry on their own: a
    /// failed call is terminal for its page or caption. A non-zero value
    /// makes the HTTP transport resend timed-out, refused, 429 and 5xx
    /// requests before that failure is reported, which goes beyond that
    /// no-retry behaviour and is opt-in only.
    pub max_retries: u32,
    /// Backoff between retries
    pub backoff: BackoffType,
    /// Requests per second allowed by the rate limiter (0 disables it)
    pub requests_per_second: u32,
    /// Rate limiter burst size
    pub burst_size: u32,
    /// User agent override
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        let limits = RateLimiterConfig::default();
        Self {
            timeout_secs: 30,
            max_retries: 0,
            backoff: BackoffType::default(),
            requests_per_second: limits.requests_per_second,
            burst_size: limits.burst_size,
            user_agent: None,
        }
    }
}

impl HttpConfig {
    /// Build the HTTP client config for these settings
    pub fn to_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .max_retries(self.max_retries)
            .backoff(
                self.backoff,
                Duration::from_millis(100),
                Duration::from_secs(60),
            );

        builder = if self.requests_per_second == 0 {
            builder.no_rate_limit()
        } else {
            builder.rate_limit(RateLimiterConfig::new(
                self.requests_per_second,
                self.burst_size,
            ))
        };

        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent);
        }

        builder.build()
    }
}

/// Media host settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Prefix a key must match to be read or inspected
    pub trusted_prefix: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            trusted_prefix: DEFAULT_TRUSTED_PREFIX.to_string(),
        }
    }
}

/// Caption cache settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cost budget: total bytes of cached keys plus caption text
    pub max_cost: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_cost: DEFAULT_CACHE_MAX_COST,
        }
    }
}

/// Caption text settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionConfig {
    /// Account named in social post captions
    pub account_name: String,
    /// Base URL of social post permalinks
    pub permalink_base: String,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            account_name: "SFO Museum".to_string(),
            permalink_base: "https://millsfield.sfomuseum.org/instagram".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api.endpoint, "https://api.sfomuseum.org/rest");
        assert_eq!(config.api.token_param, "access_token");
        assert!(config.api.access_token.is_none());
        assert_eq!(config.http.max_retries, 0);
        assert_eq!(config.media.trusted_prefix, DEFAULT_TRUSTED_PREFIX);
        assert_eq!(config.cache.max_cost, 1 << 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_retries_are_opt_in() {
        let config = AppConfig::default();
        assert_eq!(config.http.to_client_config().max_retries, 0);

        let config = AppConfig::from_yaml_str("http:\n  max_retries: 2\n").unwrap();
        assert_eq!(config.http.to_client_config().max_retries, 2);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(AppConfig::from_yaml_str("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = r"
api:
  access_token: abc123
http:
  timeout_secs: 5
  requests_per_second: 0
captions:
  account_name: Test Museum
";
        let config = AppConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.api.access_token.as_deref(), Some("abc123"));
        assert_eq!(config.api.endpoint, DEFAULT_API_ENDPOINT);
        assert_eq!(config.http.timeout_secs, 5);
        assert_eq!(config.captions.account_name, "Test Museum");
        assert_eq!(
            config.captions.permalink_base,
            "https://millsfield.sfomuseum.org/instagram"
        );

        let client_config = config.http.to_client_config();
        assert_eq!(client_config.timeout, Duration::from_secs(5));
        assert!(client_config.rate_limit.is_none());
    }

    #[test]
    fn test_invalid_yaml() {
        let err = AppConfig::from_yaml_str("api: [not, a, map]").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.media.trusted_prefix = "ftp://static.example.org".to_string();
        assert!(matches!(
            config.validate().unwrap_err(),
            Error::InvalidConfigValue { .. }
        ));

        let mut config = AppConfig::default();
        config.cache.max_cost = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.api.endpoint = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_with_access_token() {
        let config = AppConfig::default().with_access_token(Some("tok".to_string()));
        assert_eq!(config.api.access_token.as_deref(), Some("tok"));

        let config = config.with_access_token(Some(String::new()));
        assert_eq!(config.api.access_token.as_deref(), Some("tok"));

        let config = config.with_access_token(None);
        assert_eq!(config.api.access_token.as_deref(), Some("tok"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "media:\n  trusted_prefix: https://static.example.org/media").unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(
            config.media.trusted_prefix,
            "https://static.example.org/media"
        );
    }

    #[test]
    fn test_from_missing_file() {
        let err = AppConfig::from_file("/nonexistent/shoebox.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
