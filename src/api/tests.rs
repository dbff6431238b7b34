//! Tests for the API module

use super::*;
use crate::auth::AuthConfig;
use crate::error::Error;
use crate::http::HttpClientConfig;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> RestApiClient {
    RestApiClient::new(
        format!("{}/rest", server.uri()),
        AuthConfig::query_token("access_token", "tok"),
        HttpClientConfig::builder().no_rate_limit().build(),
    )
    .unwrap()
}

// ============================================================================
// MethodCall Tests
// ============================================================================

#[test]
fn test_method_call_set_and_get() {
    let mut call = MethodCall::new(methods::GET_OBJECT_IMAGES).with("object_id", 42);
    call.set("page", 1);
    call.set("page", 2);

    assert_eq!(call.method(), "sfomuseum.collection.objects.getImages");
    assert_eq!(call.get("object_id"), Some("42"));
    assert_eq!(call.get("page"), Some("2"));
    assert_eq!(call.get("missing"), None);
    assert_eq!(
        call.args(),
        &[
            ("object_id".to_string(), "42".to_string()),
            ("page".to_string(), "2".to_string())
        ]
    );
}

// ============================================================================
// PageBody Tests
// ============================================================================

#[test]
fn test_page_body_decodes_repeatedly() {
    let body = PageBody::from(json!({"items": [{"item_id": 1, "type_id": 2}], "pages": 3}));

    let first: ListItemsResponse = body.decode().unwrap();
    let second: serde_json::Value = body.decode().unwrap();

    assert_eq!(first.items, vec![ListingItem { item_id: 1, type_id: 2 }]);
    assert_eq!(second["pages"], 3);
    assert!(!body.is_empty());
}

#[test]
fn test_page_body_decode_error() {
    let body = PageBody::from("not json");
    let err = body.decode::<ListItemsResponse>().unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

#[test]
fn test_list_items_requires_items() {
    let body = PageBody::from(json!({"pages": 1}));
    assert!(body.decode::<ListItemsResponse>().unwrap_err().is_decode());
}

#[test]
fn test_listing_item_camel_case_alias() {
    let body = PageBody::from(json!({"items": [{"itemId": 42, "typeId": 1}]}));
    let rsp: ListItemsResponse = body.decode().unwrap();
    assert_eq!(rsp.items[0], ListingItem { item_id: 42, type_id: 1 });
}

#[test]
fn test_instagram_post_decode() {
    let body = PageBody::from(json!({
        "post": {
            "caption": {"excerpt": "Flying high", "body": "Flying high over SFO", "hashtags": ["sfo"]},
            "id": 3411,
            "path": "media/ig/3411.jpg",
            "taken": 1_700_000_000,
            "wof:id": 1_511_214_999
        }
    }));

    let rsp: InstagramPostResponse = body.decode().unwrap();
    assert_eq!(rsp.post.id, Some(3411));
    assert_eq!(rsp.post.path, "media/ig/3411.jpg");
    assert_eq!(rsp.post.taken, 1_700_000_000);
    assert_eq!(rsp.post.wof_id, Some(1_511_214_999));
    assert_eq!(rsp.post.caption.unwrap().excerpt, "Flying high");
}

// ============================================================================
// RestApiClient Tests
// ============================================================================

#[tokio::test]
async fn test_rest_client_sends_method_and_args() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest"))
        .and(query_param("method", methods::GET_IMAGE_CAPTION))
        .and(query_param("image_id", "1913663409"))
        .and(query_param("access_token", "tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "caption": "Boeing 747"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let call = MethodCall::new(methods::GET_IMAGE_CAPTION).with("image_id", "1913663409");
    let body = client.execute_method(&call).await.unwrap();

    let rsp: ImageCaptionResponse = body.decode().unwrap();
    assert_eq!(rsp.caption, "Boeing 747");
}

#[tokio::test]
async fn test_rest_client_status_error_is_transport() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .execute_method(&MethodCall::new(methods::LIST_SHOEBOX_ITEMS))
        .await
        .unwrap_err();

    assert!(err.is_transport());
}

#[test]
fn test_rest_client_from_config() {
    let mut config = crate::config::AppConfig::default();
    config.api.access_token = Some("abc".to_string());

    let client = RestApiClient::from_config(&config).unwrap();
    assert_eq!(client.endpoint(), DEFAULT_API_ENDPOINT);
}
