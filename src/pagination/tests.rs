//! Tests for the pagination module

use super::*;
use crate::api::{methods, MethodCall, PageBody};
use crate::error::{Error, Result};
use crate::testing::{page_of, ScriptedClient};
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use test_case::test_case;
use tokio_util::sync::CancellationToken;

/// Records the page numbers it sees; optionally cancels or fails on a page
#[derive(Default)]
struct RecordingHandler {
    seen: Vec<u64>,
    errors: Vec<String>,
    cancel_on: Option<(usize, CancellationToken)>,
    fail_on: Option<usize>,
    swallow_errors: bool,
}

#[async_trait]
impl PageHandler for RecordingHandler {
    async fn handle_page(&mut self, page: Result<&PageBody>) -> Result<()> {
        match page {
            Ok(body) => {
                let value: serde_json::Value = body.decode()?;
                self.seen.push(value["page"].as_u64().unwrap_or_default());
            }
            Err(err) => {
                self.errors.push(err.to_string());
                if !self.swallow_errors {
                    return Err(err);
                }
            }
        }

        let invocations = self.seen.len() + self.errors.len();
        if let Some((at, token)) = &self.cancel_on {
            if invocations == *at {
                token.cancel();
            }
        }
        if self.fail_on == Some(invocations) {
            return Err(Error::Other("handler failed".to_string()));
        }
        Ok(())
    }
}

fn paged_client(pages: u32) -> Arc<ScriptedClient> {
    ScriptedClient::new(move |call| {
        Ok(PageBody::from(json!({
            "items": [],
            "page": page_of(call),
            "pages": pages,
        })))
    })
}

fn list_call() -> MethodCall {
    MethodCall::new(methods::LIST_SHOEBOX_ITEMS)
}

// ============================================================================
// Cursor Tests
// ============================================================================

#[test]
fn test_cursor_defaults_to_first_page() {
    let cursor = PaginationCursor::from_call(&list_call()).unwrap();
    assert_eq!(cursor.page(), 1);
    assert_eq!(cursor.total_pages(), None);
}

#[test]
fn test_cursor_total_is_learned_once() {
    let mut cursor = PaginationCursor::default();
    cursor.learn_total(2);
    cursor.learn_total(10);
    assert_eq!(cursor.total_pages(), Some(2));
    assert!(cursor.advance());
    assert!(!cursor.advance());
}

#[test]
fn test_cursor_without_total_does_not_advance() {
    let mut cursor = PaginationCursor::default();
    assert!(!cursor.advance());
}

#[test_case("0" ; "zero")]
#[test_case("-1" ; "negative")]
#[test_case("two" ; "not a number")]
#[test_case("" ; "empty")]
fn test_cursor_rejects_invalid_page(raw: &str) {
    let call = list_call().with("page", raw);
    let err = PaginationCursor::from_call(&call).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
}

#[test]
fn test_envelope_decode() {
    let body = PageBody::from(json!({"pages": 4, "page": 1, "per_page": 100, "total": 310}));
    let envelope = PaginationEnvelope::decode(&body).unwrap();
    assert_eq!(envelope.pages, 4);
    assert_eq!(envelope.total, Some(310));

    let missing = PageBody::from(json!({"items": []}));
    assert!(PaginationEnvelope::decode(&missing).unwrap_err().is_decode());
}

// ============================================================================
// Driver Tests
// ============================================================================

#[test_case(1 ; "single page")]
#[test_case(3 ; "three pages")]
#[tokio::test]
async fn test_drive_visits_every_page_in_order(pages: u32) {
    let client = paged_client(pages);
    let driver = PaginationDriver::new(client.clone(), CancellationToken::new());
    let mut handler = RecordingHandler::default();

    driver.drive(list_call(), &mut handler).await.unwrap();

    let expected: Vec<u64> = (1..=u64::from(pages)).collect();
    assert_eq!(handler.seen, expected);
    assert_eq!(client.call_count(), pages as usize);

    let requested: Vec<String> = (1..=pages).map(|p| p.to_string()).collect();
    assert_eq!(client.pages_requested(methods::LIST_SHOEBOX_ITEMS), requested);
}

#[tokio::test]
async fn test_drive_starts_at_requested_page() {
    let client = paged_client(4);
    let driver = PaginationDriver::new(client.clone(), CancellationToken::new());
    let mut handler = RecordingHandler::default();

    driver
        .drive(list_call().with("page", 3), &mut handler)
        .await
        .unwrap();

    assert_eq!(handler.seen, vec![3, 4]);
}

#[tokio::test]
async fn test_drive_zero_pages_still_handles_first_page() {
    let client = paged_client(0);
    let driver = PaginationDriver::new(client.clone(), CancellationToken::new());
    let mut handler = RecordingHandler::default();

    driver.drive(list_call(), &mut handler).await.unwrap();

    assert_eq!(handler.seen, vec![1]);
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn test_drive_invalid_page_makes_no_call() {
    let client = paged_client(3);
    let driver = PaginationDriver::new(client.clone(), CancellationToken::new());
    let mut handler = RecordingHandler::default();

    let err = driver
        .drive(list_call().with("page", "abc"), &mut handler)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidArgument { .. }));
    assert_eq!(client.call_count(), 0);
    assert!(handler.seen.is_empty());
}

#[tokio::test]
async fn test_drive_cancelled_after_second_page() {
    let client = paged_client(5);
    let cancel = CancellationToken::new();
    let driver = PaginationDriver::new(client.clone(), cancel.clone());
    let mut handler = RecordingHandler {
        cancel_on: Some((2, cancel)),
        ..Default::default()
    };

    driver.drive(list_call(), &mut handler).await.unwrap();

    assert_eq!(handler.seen, vec![1, 2]);
    assert_eq!(client.call_count(), 2);
}

#[tokio::test]
async fn test_drive_already_cancelled_makes_no_call() {
    let client = paged_client(5);
    let cancel = CancellationToken::new();
    cancel.cancel();
    let driver = PaginationDriver::new(client.clone(), cancel);
    let mut handler = RecordingHandler::default();

    driver.drive(list_call(), &mut handler).await.unwrap();

    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn test_drive_handler_error_aborts() {
    let client = paged_client(5);
    let driver = PaginationDriver::new(client.clone(), CancellationToken::new());
    let mut handler = RecordingHandler {
        fail_on: Some(2),
        ..Default::default()
    };

    let err = driver.drive(list_call(), &mut handler).await.unwrap_err();

    assert_eq!(err.to_string(), "handler failed");
    assert_eq!(client.call_count(), 2);
}

#[tokio::test]
async fn test_drive_envelope_decode_failure_is_fatal() {
    let client = ScriptedClient::new(|_| Ok(PageBody::from(json!({"page": 1, "items": []}))));
    let driver = PaginationDriver::new(client.clone(), CancellationToken::new());
    let mut handler = RecordingHandler::default();

    let err = driver.drive(list_call(), &mut handler).await.unwrap_err();

    assert!(err.is_decode());
    assert_eq!(handler.seen, vec![1]);
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn test_drive_transport_error_reaches_handler() {
    let client = ScriptedClient::new(|_| Err(Error::http_status(503, "unavailable")));
    let driver = PaginationDriver::new(client.clone(), CancellationToken::new());
    let mut handler = RecordingHandler::default();

    let err = driver.drive(list_call(), &mut handler).await.unwrap_err();

    assert!(err.is_transport());
    assert_eq!(handler.errors.len(), 1);
}

#[tokio::test]
async fn test_drive_swallowed_error_on_first_page_ends_traversal() {
    let client = ScriptedClient::new(|_| Err(Error::http_status(503, "unavailable")));
    let driver = PaginationDriver::new(client.clone(), CancellationToken::new());
    let mut handler = RecordingHandler {
        swallow_errors: true,
        ..Default::default()
    };

    driver.drive(list_call(), &mut handler).await.unwrap();

    assert_eq!(handler.errors.len(), 1);
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn test_drive_swallowed_error_mid_traversal_continues() {
    let client = ScriptedClient::new(|call| match page_of(call) {
        2 => Err(Error::http_status(502, "bad gateway")),
        page => Ok(PageBody::from(json!({"page": page, "pages": 3}))),
    });
    let driver = PaginationDriver::new(client.clone(), CancellationToken::new());
    let mut handler = RecordingHandler {
        swallow_errors: true,
        ..Default::default()
    };

    driver.drive(list_call(), &mut handler).await.unwrap();

    assert_eq!(handler.seen, vec![1, 3]);
    assert_eq!(handler.errors.len(), 1);
    assert_eq!(client.call_count(), 3);
}

#[tokio::test]
async fn test_page_count_fixed_after_first_page() {
    // Later pages report a larger count; the first page's count wins
    let client = ScriptedClient::new(|call| {
        let page = page_of(call);
        let pages = if page == 1 { 2 } else { 9 };
        Ok(PageBody::from(json!({"page": page, "pages": pages})))
    });
    let driver = PaginationDriver::new(client.clone(), CancellationToken::new());
    let mut handler = RecordingHandler::default();

    driver.drive(list_call(), &mut handler).await.unwrap();

    assert_eq!(handler.seen, vec![1, 2]);
}
