//! Remote collection API
//!
//! Method-call client for the collection API plus the response shapes the
//! discovery and caption pipelines decode.
//!
//! # Overview
//!
//! - `ApiClient` - the seam every resolver talks through
//! - `RestApiClient` - `GET {endpoint}?method=...` over the crate's `HttpClient`
//! - `MethodCall` - a method name and its ordered arguments
//! - `PageBody` - raw, re-readable response bytes

mod body;
mod client;
mod method;
mod response;

pub use body::PageBody;
pub use client::{ApiClient, RestApiClient, DEFAULT_API_ENDPOINT};
pub use method::{methods, MethodCall};
pub use response::{
    ImageCaptionResponse, ImageListResponse, InstagramPost, InstagramPostCaption,
    InstagramPostResponse, ListItemsResponse, ListingItem,
};

#[cfg(test)]
mod tests;
