//! Read-only media bucket
//!
//! Exposes discovery plus GET/HEAD access to discovered media.
//!
//! # Overview
//!
//! - `Bucket` - the storage trait the registry hands out
//! - `ShoeboxBucket` - discovery over the collection API, media over HTTP
//! - `validate_key` - trusted-prefix check applied before any request
//! - `attributes_from_headers` - `Content-Length` / `Last-Modified` parsing

mod shoebox;
mod types;

pub use shoebox::ShoeboxBucket;
pub use types::{attributes_from_headers, validate_key, Bucket};
