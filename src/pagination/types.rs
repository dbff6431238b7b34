//! Pagination types and traits

use crate::api::{MethodCall, PageBody};
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Method argument carrying the page number
pub const PAGE_ARG: &str = "page";

/// Receives each page of a paginated traversal
#[async_trait]
pub trait PageHandler: Send {
    /// Handle one page
    ///
    /// `page` is the raw body, or the transport error for that page. Returning
    /// an error aborts the traversal with it; returning `Ok(())` after a
    /// transport error swallows the failure.
    async fn handle_page(&mut self, page: Result<&PageBody>) -> Result<()>;
}

/// Page-count part of a paginated response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationEnvelope {
    /// Total number of pages
    pub pages: u32,
    /// Page this response belongs to
    #[serde(default)]
    pub page: Option<u32>,
    /// Items per page
    #[serde(default)]
    pub per_page: Option<u32>,
    /// Total number of items
    #[serde(default)]
    pub total: Option<u64>,
}

impl PaginationEnvelope {
    /// Decode the envelope from a page body
    pub fn decode(body: &PageBody) -> Result<Self> {
        body.decode::<Self>()
            .map_err(|e| Error::decode(format!("Failed to derive pagination: {e}")))
    }
}

/// Position within a paginated traversal
///
/// `total_pages` stays `None` until the first page has been read and is
/// never changed afterwards, even if the remote collection grows or shrinks
/// mid-traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationCursor {
    page: u32,
    total_pages: Option<u32>,
}

impl Default for PaginationCursor {
    fn default() -> Self {
        Self {
            page: 1,
            total_pages: None,
        }
    }
}

impl PaginationCursor {
    /// Start at `page`
    pub fn starting_at(page: u32) -> Self {
        Self {
            page,
            total_pages: None,
        }
    }

    /// Derive the starting cursor from a call's `page` argument
    ///
    /// A missing argument starts at page 1; a present one must be a
    /// positive integer.
    pub fn from_call(call: &MethodCall) -> Result<Self> {
        match call.get(PAGE_ARG) {
            None => Ok(Self::default()),
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(page) if page > 0 => Ok(Self::starting_at(page)),
                Ok(_) => Err(Error::invalid_argument(
                    PAGE_ARG,
                    format!("Invalid page number '{raw}', must be positive"),
                )),
                Err(e) => Err(Error::invalid_argument(
                    PAGE_ARG,
                    format!("Invalid page number '{raw}', {e}"),
                )),
            },
        }
    }

    /// Current page
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Page count, once learned
    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    /// Record the page count; only the first call has any effect
    pub fn learn_total(&mut self, pages: u32) {
        if self.total_pages.is_none() {
            self.total_pages = Some(pages);
        }
    }

    /// Move to the next page, returning whether it exists
    pub fn advance(&mut self) -> bool {
        self.page = self.page.saturating_add(1);
        self.total_pages.is_some_and(|total| self.page <= total)
    }
}
