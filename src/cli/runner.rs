//! CLI runner - executes commands

use crate::bucket::Bucket;
use crate::caption::Captioner;
use crate::cli::commands::{Cli, Commands};
use crate::config::AppConfig;
use crate::error::{Result, ResultExt};
use crate::registry::Providers;
use futures::StreamExt;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
    providers: Providers,
    cancel: CancellationToken,
}

impl Runner {
    /// Create a runner with the built-in providers
    pub fn new(cli: Cli) -> Self {
        Self::with_providers(cli, Providers::with_defaults())
    }

    /// Create a runner with custom providers
    pub fn with_providers(cli: Cli, providers: Providers) -> Self {
        Self {
            cli,
            providers,
            cancel: CancellationToken::new(),
        }
    }

    /// Token that stops a running traversal when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;

        match &self.cli.command {
            Commands::Gather { limit } => self.gather(&config, *limit).await,
            Commands::Captions { limit } => self.captions(&config, *limit).await,
            Commands::Caption { key } => self.caption(&config, key).await,
            Commands::Attributes { key } => self.attributes(&config, key).await,
            Commands::Fetch { key, output } => self.fetch(&config, key, output).await,
        }
    }

    /// Load config from file or defaults, then apply the CLI token
    fn load_config(&self) -> Result<AppConfig> {
        let config = match &self.cli.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };
        Ok(config.with_access_token(self.cli.access_token.clone()))
    }

    fn bucket(&self, config: &AppConfig) -> Result<Arc<dyn Bucket>> {
        self.providers
            .bucket(&self.cli.source_uri, config)
            .with_context(|| format!("Failed to create bucket for '{}'", self.cli.source_uri))
    }

    fn captioner(&self, config: &AppConfig) -> Result<Arc<dyn Captioner>> {
        let uri = self.cli.caption_uri();
        self.providers
            .captioner(uri, config)
            .with_context(|| format!("Failed to create captioner for '{uri}'"))
    }

    /// Print every resolved resource, one per line
    async fn gather(&self, config: &AppConfig, limit: Option<usize>) -> Result<()> {
        let bucket = self.bucket(config)?;
        let start = Instant::now();
        let mut pictures = bucket.gather_pictures(&self.cancel);
        let mut count = 0;

        while let Some(item) = pictures.next().await {
            println!("{}", item?);
            count += 1;
            if limit.is_some_and(|l| count >= l) {
                break;
            }
        }

        info!(
            count,
            elapsed_ms = start.elapsed().as_millis() as u64,
            cancelled = self.cancel.is_cancelled(),
            "Gathered pictures"
        );
        bucket.close().await
    }

    /// Print `{uri, caption}` JSON lines; caption failures are reported inline
    async fn captions(&self, config: &AppConfig, limit: Option<usize>) -> Result<()> {
        let bucket = self.bucket(config)?;
        let captioner = self.captioner(config)?;
        let mut pictures = bucket.gather_pictures(&self.cancel);
        let mut count = 0;

        while let Some(item) = pictures.next().await {
            let resource = item?;
            let line = match captioner.caption(resource.as_str()).await {
                Ok(caption) => json!({"uri": resource, "caption": caption}),
                Err(e) => {
                    warn!(uri = %resource, error = %e, "Caption failed");
                    json!({"uri": resource, "error": e.to_string()})
                }
            };
            println!("{line}");

            count += 1;
            if limit.is_some_and(|l| count >= l) {
                break;
            }
        }

        info!(count, "Captioned pictures");
        captioner.close().await?;
        bucket.close().await
    }

    /// Print the caption of one key
    async fn caption(&self, config: &AppConfig, key: &str) -> Result<()> {
        let captioner = self.captioner(config)?;
        let caption = captioner.caption(key).await?;
        println!("{caption}");
        captioner.close().await
    }

    /// Print size and modification time of one key as JSON
    async fn attributes(&self, config: &AppConfig, key: &str) -> Result<()> {
        let bucket = self.bucket(config)?;
        let attrs = bucket.attributes(key).await?;
        println!(
            "{}",
            json!({
                "key": key,
                "size": attrs.size,
                "mod_time": attrs.mod_time.to_rfc3339(),
            })
        );
        bucket.close().await
    }

    /// Download one key to `output`
    async fn fetch(&self, config: &AppConfig, key: &str, output: &Path) -> Result<()> {
        let bucket = self.bucket(config)?;
        let bytes = bucket.new_reader(key).await?;

        tokio::fs::write(output, &bytes)
            .await
            .with_context(|| format!("Failed to write '{}'", output.display()))?;

        info!(key, bytes = bytes.len(), output = %output.display(), "Fetched media");
        bucket.close().await
    }
}
