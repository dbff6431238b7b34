//! Object image resolution
//!
//! Turns the image listing of one collection object into fetchable URIs by
//! expanding each image's URI template with its preferred size variant.

use super::sequence::{Emitter, ResultSequence};
use crate::api::{methods, ApiClient, ImageListResponse, MethodCall, PageBody};
use crate::error::{Error, Result};
use crate::pagination::{PageHandler, PaginationDriver};
use crate::template::{TemplateVars, UriTemplate};
use crate::types::{ItemId, JsonValue, ResolvedResource};
use async_trait::async_trait;
use serde_json::Map;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Size labels in order of preference
///
/// `o` original, `k` large, `b` medium, `c` small.
pub const SIZE_LABEL_PREFERENCE: [&str; 4] = ["o", "k", "b", "c"];

// JSON pointers, namespaced form first
const TEMPLATE_FIELDS: [&str; 2] = ["/media:uri_template", "/uri_template"];
const SIZES_FIELDS: [&str; 2] = ["/media:properties/sizes", "/sizes"];
const ID_FIELDS: [&str; 2] = ["/id", "/wof:id"];

/// Reason an image record was skipped
#[derive(Debug, thiserror::Error)]
pub enum ImageSkip {
    /// No URI template field
    #[error("missing URI template")]
    MissingTemplate,

    /// No sizes map
    #[error("missing sizes")]
    MissingSizes,

    /// Template did not parse
    #[error("invalid URI template: {0}")]
    InvalidTemplate(#[source] Error),

    /// No preferred label has a usable variant
    #[error("no usable size label")]
    NoUsableSize,

    /// Template did not expand
    #[error("failed to expand URI template: {0}")]
    Expansion(#[source] Error),
}

/// Variant chosen for an image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedSize {
    /// Size label
    pub label: String,
    /// Variant secret
    pub secret: String,
    /// File extension
    pub extension: String,
}

impl SelectedSize {
    /// Template variables for this variant
    pub fn to_vars(&self) -> TemplateVars {
        TemplateVars::from([
            ("label".to_string(), self.label.clone()),
            ("secret".to_string(), self.secret.clone()),
            ("extension".to_string(), self.extension.clone()),
        ])
    }
}

/// Pick the first label in `SIZE_LABEL_PREFERENCE` with a usable variant
///
/// A variant is usable when both `secret` and `extension` are non-empty
/// strings.
pub fn select_size(sizes: &Map<String, JsonValue>) -> Option<SelectedSize> {
    SIZE_LABEL_PREFERENCE.iter().find_map(|label| {
        let variant = sizes.get(*label)?;
        let secret = non_empty_str(variant.get("secret"))?;
        let extension = non_empty_str(variant.get("extension"))?;
        Some(SelectedSize {
            label: (*label).to_string(),
            secret: secret.to_string(),
            extension: extension.to_string(),
        })
    })
}

/// Resolve one image record to its URI
pub fn resolve_image_record(record: &JsonValue) -> std::result::Result<String, ImageSkip> {
    let source =
        first_field(record, &TEMPLATE_FIELDS, JsonValue::as_str).ok_or(ImageSkip::MissingTemplate)?;

    let sizes =
        first_field(record, &SIZES_FIELDS, JsonValue::as_object).ok_or(ImageSkip::MissingSizes)?;

    let template = UriTemplate::parse(source).map_err(ImageSkip::InvalidTemplate)?;
    let size = select_size(sizes).ok_or(ImageSkip::NoUsableSize)?;

    template
        .expand(&size.to_vars())
        .map_err(ImageSkip::Expansion)
}

/// First field along `pointers` that `extract` accepts
///
/// A field of the wrong type does not hide the ones after it.
fn first_field<'a, T>(
    record: &'a JsonValue,
    pointers: &[&str],
    extract: impl Fn(&'a JsonValue) -> Option<T>,
) -> Option<T> {
    pointers
        .iter()
        .find_map(|pointer| record.pointer(pointer).and_then(&extract))
}

fn non_empty_str(value: Option<&JsonValue>) -> Option<&str> {
    value.and_then(JsonValue::as_str).filter(|s| !s.is_empty())
}

fn image_id(record: &JsonValue) -> Option<i64> {
    first_field(record, &ID_FIELDS, JsonValue::as_i64)
}

// ============================================================================
// Resolver
// ============================================================================

/// Resolves collection objects to image URIs
#[derive(Clone)]
pub struct ImageResolver {
    client: Arc<dyn ApiClient>,
}

impl ImageResolver {
    /// Create a resolver over a shared API client
    pub fn new(client: Arc<dyn ApiClient>) -> Self {
        Self { client }
    }

    /// Lazily resolve every image of `object_id`
    pub fn resolve(&self, object_id: ItemId, cancel: CancellationToken) -> ResultSequence {
        let resolver = self.clone();
        ResultSequence::new(cancel, move |emitter| async move {
            resolver.resolve_into(object_id, &emitter).await
        })
    }

    /// Resolve every image of `object_id` into `emitter`, in listing order
    ///
    /// Malformed images are logged and skipped. Transport and decode
    /// failures of the image listing abort with an error.
    pub async fn resolve_into(&self, object_id: ItemId, emitter: &Emitter) -> Result<()> {
        let driver = PaginationDriver::new(
            Arc::clone(&self.client),
            emitter.cancellation_token().clone(),
        );
        let call = MethodCall::new(methods::GET_OBJECT_IMAGES).with("object_id", object_id);
        let mut handler = ImagePageHandler {
            object_id,
            emitter,
            emitted: 0,
        };

        driver.drive(call, &mut handler).await?;
        debug!(
            object = object_id,
            emitted = handler.emitted,
            "Resolved object images"
        );
        Ok(())
    }
}

impl std::fmt::Debug for ImageResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageResolver").finish_non_exhaustive()
    }
}

struct ImagePageHandler<'a> {
    object_id: ItemId,
    emitter: &'a Emitter,
    emitted: usize,
}

#[async_trait]
impl PageHandler for ImagePageHandler<'_> {
    async fn handle_page(&mut self, page: Result<&PageBody>) -> Result<()> {
        let listing: ImageListResponse = page?.decode()?;

        for record in &listing.images {
            match resolve_image_record(record) {
                Ok(uri) => {
                    if !self.emitter.emit(ResolvedResource::uri(uri)).await {
                        return Ok(());
                    }
                    self.emitted += 1;
                }
                Err(skip) => {
                    warn!(
                        object = self.object_id,
                        image = ?image_id(record),
                        error = %skip,
                        "Skipping image"
                    );
                }
            }
        }

        Ok(())
    }
}
