//! Listing classification and discovery

use super::image::ImageResolver;
use super::sequence::{Emitter, ResultSequence};
use super::social::SocialPostResolver;
use crate::api::{methods, ApiClient, ListItemsResponse, ListingItem, MethodCall, PageBody};
use crate::error::Result;
use crate::pagination::{PageHandler, PaginationDriver};
use crate::types::ItemKind;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Dispatches listing items to the resolver for their kind
///
/// Items are handled one at a time in listing order; a later item is not
/// touched until every resource of the earlier one has been emitted.
#[derive(Debug, Clone)]
pub struct ItemClassifier {
    images: ImageResolver,
    social: SocialPostResolver,
}

impl ItemClassifier {
    /// Create a classifier from its resolvers
    pub fn new(images: ImageResolver, social: SocialPostResolver) -> Self {
        Self { images, social }
    }

    /// Create a classifier whose resolvers share `client`
    pub fn with_client(client: Arc<dyn ApiClient>) -> Self {
        Self::new(
            ImageResolver::new(Arc::clone(&client)),
            SocialPostResolver::new(client),
        )
    }

    /// Decode one listing page and dispatch each of its items
    ///
    /// A page that fails to decode is an error. Stops early, without error,
    /// once the consumer has gone away.
    pub async fn classify_page(&self, body: &PageBody, emitter: &Emitter) -> Result<()> {
        let listing: ListItemsResponse = body.decode()?;

        for item in &listing.items {
            if emitter.is_cancelled() {
                break;
            }
            self.dispatch(item, emitter).await?;
        }

        Ok(())
    }

    /// Resolve one listing item
    pub async fn dispatch(&self, item: &ListingItem, emitter: &Emitter) -> Result<()> {
        match ItemKind::from_type_id(item.type_id) {
            ItemKind::Object => self.images.resolve_into(item.item_id, emitter).await,
            ItemKind::SocialPost => {
                let key = self.social.resolve(item.item_id).await?;
                emitter.emit(key).await;
                Ok(())
            }
            ItemKind::Unsupported(type_id) => {
                debug!(item = item.item_id, type_id, "Skipping unsupported item type");
                Ok(())
            }
        }
    }
}

struct ListingPageHandler<'a> {
    classifier: &'a ItemClassifier,
    emitter: &'a Emitter,
}

#[async_trait]
impl PageHandler for ListingPageHandler<'_> {
    async fn handle_page(&mut self, page: Result<&PageBody>) -> Result<()> {
        self.classifier.classify_page(page?, self.emitter).await
    }
}

// ============================================================================
// Discovery
// ============================================================================

/// Discovers every resource in the caller's shoebox
#[derive(Clone)]
pub struct Discovery {
    client: Arc<dyn ApiClient>,
    classifier: ItemClassifier,
}

impl Discovery {
    /// Create a discovery pipeline over a shared API client
    pub fn new(client: Arc<dyn ApiClient>) -> Self {
        let classifier = ItemClassifier::with_client(Arc::clone(&client));
        Self { client, classifier }
    }

    /// Lazily list, classify and resolve the whole shoebox
    ///
    /// The returned sequence observes a child of `cancel`; cancelling
    /// `cancel` or dropping the sequence stops the traversal at the next
    /// page boundary.
    pub fn gather(&self, cancel: &CancellationToken) -> ResultSequence {
        let discovery = self.clone();
        ResultSequence::new(cancel.child_token(), move |emitter| async move {
            discovery.run(&emitter).await
        })
    }

    async fn run(&self, emitter: &Emitter) -> Result<()> {
        let driver = PaginationDriver::new(
            Arc::clone(&self.client),
            emitter.cancellation_token().clone(),
        );
        let mut handler = ListingPageHandler {
            classifier: &self.classifier,
            emitter,
        };

        driver
            .drive(MethodCall::new(methods::LIST_SHOEBOX_ITEMS), &mut handler)
            .await
    }
}

impl std::fmt::Debug for Discovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Discovery")
            .field("classifier", &self.classifier)
            .finish_non_exhaustive()
    }
}
