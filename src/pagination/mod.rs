//! Pagination module
//!
//! Drives one paginated API method to exhaustion.
//!
//! # Overview
//!
//! - `PaginationDriver` - fetches page after page, handing each raw body to a
//!   `PageHandler`, until the page count learned from the first page is
//!   reached or the traversal is cancelled
//! - `PaginationEnvelope` - the page-count part of a response body
//! - `PaginationCursor` - current page plus the learned page count

mod driver;
mod types;

pub use driver::PaginationDriver;
pub use types::{PageHandler, PaginationCursor, PaginationEnvelope, PAGE_ARG};

#[cfg(test)]
mod tests;
