// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Shoebox Picturebook
//!
//! Discovers the media in a museum visitor's shoebox and captions it.
//!
//! ## Features
//!
//! - **Paginated discovery**: walks the shoebox listing page by page
//! - **Per-kind resolution**: collection objects become image URIs through
//!   URI templates; social posts become synthetic `#ig:` keys
//! - **Lazy results**: a pull-based `Stream` that fetches nothing until polled
//! - **Cached captions**: write-through, cost-bounded caption cache
//! - **Read-only bucket**: trusted-prefix GET/HEAD access to media
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use futures::StreamExt;
//! use shoebox_picturebook::{AppConfig, Providers, Result};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AppConfig::default().with_access_token(Some("...".into()));
//!     let providers = Providers::with_defaults();
//!
//!     let bucket = providers.bucket("shoebox://", &config)?;
//!     let captioner = providers.captioner("shoebox://", &config)?;
//!
//!     let mut pictures = bucket.gather_pictures(&CancellationToken::new());
//!     while let Some(item) = pictures.next().await {
//!         let resource = item?;
//!         println!("{resource}: {}", captioner.caption(resource.as_str()).await?);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       Provider Registry                      │
//! │        shoebox:// → ShoeboxBucket, CaptionResolver           │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//! ┌────────────┬────────────────┴───────────┬────────────────────┐
//! │ Pagination │          Resolve           │      Caption       │
//! ├────────────┼────────────────────────────┼────────────────────┤
//! │ Driver     │ ItemClassifier             │ CaptionKey         │
//! │ Envelope   │ ImageResolver + templates  │ CaptionCache       │
//! │ Cursor     │ SocialPostResolver         │ CaptionResolver    │
//! │            │ ResultSequence             │                    │
//! └────────────┴────────────────────────────┴────────────────────┘
//!                               │
//! ┌──────────────────────────────────────────────────────────────┐
//! │         ApiClient  ·  HttpClient (retry, rate limit)         │
//! └──────────────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Authentication for API requests
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Collection API client and response shapes
pub mod api;

/// Paginated method traversal
pub mod pagination;

/// URI templates
pub mod template;

/// Discovery and resolution
pub mod resolve;

/// Captions and the caption cache
pub mod caption;

/// Read-only media bucket
pub mod bucket;

/// Provider registry
pub mod registry;

/// Application configuration
pub mod config;

/// Command-line interface
pub mod cli;

#[cfg(test)]
mod testing;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, ErrorKind, Result};
pub use types::*;

// Re-export commonly used types
pub use api::{ApiClient, RestApiClient};
pub use bucket::{Bucket, ShoeboxBucket};
pub use caption::{CaptionResolver, Captioner};
pub use config::AppConfig;
pub use pagination::PaginationDriver;
pub use registry::{ProviderRegistry, Providers};
pub use resolve::{Discovery, ResultSequence};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
