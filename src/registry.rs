//! Provider registry
//!
//! Maps URI schemes to named constructors. The host builds a registry at
//! startup, registers the providers it wants, and creates instances from
//! URIs such as `shoebox://` or `shoebox://?token=abc`.

use crate::api::RestApiClient;
use crate::bucket::{Bucket, ShoeboxBucket};
use crate::caption::{CaptionResolver, Captioner};
use crate::config::AppConfig;
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::sync::Arc;
use url::Url;

/// Scheme of the built-in shoebox providers
pub const SHOEBOX_SCHEME: &str = "shoebox";

/// Query parameter of a provider URI overriding the access token
pub const TOKEN_PARAM: &str = "token";

/// Named constructor for a provider
pub type Constructor<T> = Box<dyn Fn(&Url, &AppConfig) -> Result<Arc<T>> + Send + Sync>;

/// Registry of provider constructors keyed by URI scheme
pub struct ProviderRegistry<T: ?Sized> {
    constructors: BTreeMap<String, Constructor<T>>,
}

impl<T: ?Sized> Default for ProviderRegistry<T> {
    fn default() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }
}

impl<T: ?Sized> ProviderRegistry<T> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `constructor` under `scheme`
    ///
    /// Fails with `Error::DuplicateProvider` if the scheme is taken.
    pub fn register<F>(&mut self, scheme: impl Into<String>, constructor: F) -> Result<()>
    where
        F: Fn(&Url, &AppConfig) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        let scheme = scheme.into().to_ascii_lowercase();
        if self.constructors.contains_key(&scheme) {
            return Err(Error::DuplicateProvider { name: scheme });
        }
        self.insert(&scheme, constructor);
        Ok(())
    }

    /// Register `constructor`, replacing any previous entry for `scheme`
    fn insert<F>(&mut self, scheme: &str, constructor: F)
    where
        F: Fn(&Url, &AppConfig) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.constructors
            .insert(scheme.to_ascii_lowercase(), Box::new(constructor));
    }

    /// Create a provider for `uri`
    ///
    /// A `token` query parameter overrides the configured access token.
    pub fn create(&self, uri: &str, config: &AppConfig) -> Result<Arc<T>> {
        let url = Url::parse(uri)?;
        let constructor =
            self.constructors
                .get(url.scheme())
                .ok_or_else(|| Error::UnknownProvider {
                    name: url.scheme().to_string(),
                })?;

        let token = url
            .query_pairs()
            .find(|(k, _)| k == TOKEN_PARAM)
            .map(|(_, v)| v.into_owned());
        let config = config.clone().with_access_token(token);

        constructor(&url, &config)
    }

    /// Registered schemes, sorted
    pub fn schemes(&self) -> Vec<&str> {
        self.constructors.keys().map(String::as_str).collect()
    }

    /// True when `scheme` is registered
    pub fn contains(&self, scheme: &str) -> bool {
        self.constructors.contains_key(scheme)
    }
}

impl<T: ?Sized> std::fmt::Debug for ProviderRegistry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("schemes", &self.schemes())
            .finish()
    }
}

/// Bucket and captioner registries
#[derive(Debug, Default)]
pub struct Providers {
    /// Bucket constructors
    pub buckets: ProviderRegistry<dyn Bucket>,
    /// Captioner constructors
    pub captioners: ProviderRegistry<dyn Captioner>,
}

impl Providers {
    /// Registries with the built-in `shoebox` providers
    pub fn with_defaults() -> Self {
        let mut providers = Self::default();

        providers.buckets.insert(SHOEBOX_SCHEME, |_, config| {
            Ok(Arc::new(ShoeboxBucket::from_config(config)?) as Arc<dyn Bucket>)
        });
        providers.captioners.insert(SHOEBOX_SCHEME, |_, config| {
            let client = RestApiClient::from_config(config)?;
            Ok(Arc::new(CaptionResolver::from_config(Arc::new(client), config))
                as Arc<dyn Captioner>)
        });

        providers
    }

    /// Create a bucket for `uri`
    pub fn bucket(&self, uri: &str, config: &AppConfig) -> Result<Arc<dyn Bucket>> {
        self.buckets.create(uri, config)
    }

    /// Create a captioner for `uri`
    pub fn captioner(&self, uri: &str, config: &AppConfig) -> Result<Arc<dyn Captioner>> {
        self.captioners.create(uri, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Provider echoing the token it was built with
    trait Echo: Send + Sync + std::fmt::Debug {
        fn token(&self) -> Option<String>;
    }

    #[derive(Debug)]
    struct TokenEcho(Option<String>);

    impl Echo for TokenEcho {
        fn token(&self) -> Option<String> {
            self.0.clone()
        }
    }

    fn echo_registry() -> ProviderRegistry<dyn Echo> {
        let mut registry: ProviderRegistry<dyn Echo> = ProviderRegistry::new();
        registry
            .register("echo", |_, config| {
                Ok(Arc::new(TokenEcho(config.api.access_token.clone())) as Arc<dyn Echo>)
            })
            .unwrap();
        registry
    }

    #[test]
    fn test_create_registered_provider() {
        let registry = echo_registry();
        let config = AppConfig::default().with_access_token(Some("from-config".to_string()));

        let echo = registry.create("echo://", &config).unwrap();
        assert_eq!(echo.token().as_deref(), Some("from-config"));
    }

    #[test]
    fn test_uri_token_overrides_config() {
        let registry = echo_registry();
        let config = AppConfig::default().with_access_token(Some("from-config".to_string()));

        let echo = registry.create("echo://?token=from-uri", &config).unwrap();
        assert_eq!(echo.token().as_deref(), Some("from-uri"));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = echo_registry();
        let err = registry
            .register("ECHO", |_, _| Ok(Arc::new(TokenEcho(None)) as Arc<dyn Echo>))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateProvider { .. }));
    }

    #[test]
    fn test_unknown_scheme() {
        let registry = echo_registry();
        let err = registry.create("s3://bucket", &AppConfig::default()).unwrap_err();
        assert!(matches!(err, Error::UnknownProvider { ref name } if name == "s3"));
    }

    #[test]
    fn test_unknown_scheme_without_debug_bound() {
        let registry = echo_registry();
        match registry.create("ftp://host", &AppConfig::default()) {
            Err(Error::UnknownProvider { name }) => assert_eq!(name, "ftp"),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("ftp should not be registered"),
        }
    }

    #[test]
    fn test_invalid_uri() {
        let registry = echo_registry();
        assert!(registry.create("not a uri", &AppConfig::default()).is_err());
    }

    #[test]
    fn test_defaults_register_shoebox() {
        let providers = Providers::with_defaults();
        assert_eq!(providers.buckets.schemes(), vec!["shoebox"]);
        assert!(providers.captioners.contains("shoebox"));

        let bucket = providers.bucket("shoebox://", &AppConfig::default());
        assert!(bucket.is_ok());
        let captioner = providers.captioner("shoebox://?token=abc", &AppConfig::default());
        assert!(captioner.is_ok());
    }

    #[test]
    fn test_defaults_reject_second_shoebox_registration() {
        let mut providers = Providers::with_defaults();
        let err = providers
            .buckets
            .register("shoebox", |_, config| {
                Ok(Arc::new(ShoeboxBucket::from_config(config)?) as Arc<dyn Bucket>)
            })
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateProvider { ref name } if name == "shoebox"));
    }
}
