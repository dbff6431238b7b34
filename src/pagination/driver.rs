//! Paginated method traversal

use super::types::{PageHandler, PaginationCursor, PaginationEnvelope, PAGE_ARG};
use crate::api::{ApiClient, MethodCall};
use crate::error::Result;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Drives a paginated method call from its starting page to the last page
///
/// The page count is learned from the first page that decodes and is fixed
/// for the rest of the traversal. Pages are fetched strictly one after
/// another, and each one is fully handled before the next is requested.
#[derive(Clone)]
pub struct PaginationDriver {
    client: Arc<dyn ApiClient>,
    cancel: CancellationToken,
}

impl PaginationDriver {
    /// Create a driver over `client`, observing `cancel`
    pub fn new(client: Arc<dyn ApiClient>, cancel: CancellationToken) -> Self {
        Self { client, cancel }
    }

    /// Cancellation signal observed by this driver
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Shared API client
    pub fn client(&self) -> &Arc<dyn ApiClient> {
        &self.client
    }

    /// Copy of this driver observing `cancel` instead
    #[must_use]
    pub fn with_cancellation(&self, cancel: CancellationToken) -> Self {
        Self {
            client: Arc::clone(&self.client),
            cancel,
        }
    }

    /// Traverse every page of `call`, handing each to `handler`
    ///
    /// Returns `Ok(())` when the last page has been handled or when
    /// cancellation is observed before a page fetch. Fails when the starting
    /// `page` argument is invalid (before any call is made), when the handler
    /// fails, or when the first page's pagination envelope does not decode.
    ///
    /// A transport error is passed to the handler. If the handler swallows
    /// it, traversal moves on to the next page when the page count is known,
    /// and ends when it is not.
    pub async fn drive<H>(&self, mut call: MethodCall, handler: &mut H) -> Result<()>
    where
        H: PageHandler + ?Sized,
    {
        let mut cursor = PaginationCursor::from_call(&call)?;

        loop {
            if self.cancel.is_cancelled() {
                debug!(
                    method = call.method(),
                    page = cursor.page(),
                    "Pagination cancelled"
                );
                return Ok(());
            }

            call.set(PAGE_ARG, cursor.page());

            match self.client.execute_method(&call).await {
                Ok(body) => {
                    handler.handle_page(Ok(&body)).await?;

                    if cursor.total_pages().is_none() {
                        let envelope = PaginationEnvelope::decode(&body)?;
                        cursor.learn_total(envelope.pages);
                        debug!(
                            method = call.method(),
                            pages = envelope.pages,
                            "Learned page count"
                        );
                    }
                }
                Err(err) => {
                    let page = cursor.page();
                    handler.handle_page(Err(err)).await?;

                    if cursor.total_pages().is_none() {
                        warn!(
                            method = call.method(),
                            page,
                            "Page failed before page count was known, ending traversal"
                        );
                        return Ok(());
                    }
                }
            }

            if !cursor.advance() {
                debug!(method = call.method(), "Pagination complete");
                return Ok(());
            }
        }
    }
}

impl std::fmt::Debug for PaginationDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationDriver")
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}
