//! Integration tests for the REST provider using wiremock.
//!
//! These verify the provider's request shapes and response handling against
//! mocked endpoints: bearer auth, status-code mapping, and list pagination.

use cloudcuts::{CreateRequest, Error, Provider, ResourceId, ResourceKind, RestProvider};
use serde_json::json;
use wiremock::matchers::{bearer_token, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider_for(server: &MockServer) -> RestProvider {
    RestProvider::new(&server.uri(), "test-token").expect("valid endpoint")
}

#[tokio::test]
async fn create_sends_payload_and_parses_state() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/groups/grp1"))
        .and(bearer_token("test-token"))
        .and(body_partial_json(json!({
            "name": "grp1",
            "region": "westus"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "grp1",
            "kind": "group",
            "name": "grp1",
            "region": "westus",
            "tags": {"env": "test"}
        })))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let mut request = CreateRequest::new(ResourceKind::Group, "grp1", "westus");
    request.tags.insert("env".to_string(), "test".to_string());

    let state = provider.create_resource(request).await.unwrap();
    assert_eq!(state.id, ResourceId::from("grp1"));
    assert_eq!(state.kind, ResourceKind::Group);
    assert_eq!(state.tags.get("env").map(String::as_str), Some("test"));
}

#[tokio::test]
async fn grouped_create_targets_the_group_collection() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/grp1/virtual-machines/vm1"))
        .and(bearer_token("test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "grp1/virtual-machines/vm1",
            "kind": "virtual-machine",
            "name": "vm1",
            "region": "westus",
            "group": "grp1"
        })))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let state = provider
        .create_resource(
            CreateRequest::new(ResourceKind::VirtualMachine, "vm1", "westus")
                .in_group(ResourceId::from("grp1")),
        )
        .await
        .unwrap();

    assert_eq!(state.group, Some(ResourceId::from("grp1")));
}

#[tokio::test]
async fn get_maps_404_to_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/grp1/virtual-machines/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": 404, "message": "no such resource"}
        })))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let id = ResourceId::from("grp1/virtual-machines/ghost");
    let err = provider
        .get_resource(ResourceKind::VirtualMachine, &id)
        .await
        .unwrap_err();

    match err {
        Error::NotFound(missing) => assert_eq!(missing, id),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn get_with_mismatched_kind_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/grp1/networks/net1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "grp1/networks/net1",
            "kind": "network",
            "name": "net1",
            "region": "westus"
        })))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let id = ResourceId::from("grp1/networks/net1");
    let err = provider
        .get_resource(ResourceKind::VirtualMachine, &id)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn delete_tolerates_empty_body() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/grp1/networks/net1"))
        .and(bearer_token("test-token"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    provider
        .delete_resource(ResourceKind::Network, &ResourceId::from("grp1/networks/net1"))
        .await
        .unwrap();
}

#[tokio::test]
async fn delete_missing_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/groups/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let err = provider
        .delete_resource(ResourceKind::Group, &ResourceId::from("groups/ghost"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn server_errors_surface_as_api_errors() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/groups/grp1"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": {"code": 500, "message": "internal"}
        })))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let err = provider
        .create_resource(CreateRequest::new(ResourceKind::Group, "grp1", "westus"))
        .await
        .unwrap_err();

    match err {
        Error::Api { status, .. } => assert_eq!(status, 500),
        other => panic!("expected Api, got {other:?}"),
    }
}

#[tokio::test]
async fn long_localized_error_bodies_surface_as_api_errors() {
    let server = MockServer::start().await;

    // Over 200 bytes of multibyte text, so log truncation cuts mid-body.
    let body = format!("x{}", "é".repeat(300));
    Mock::given(method("PUT"))
        .and(path("/groups/grp1"))
        .respond_with(ResponseTemplate::new(500).set_body_string(body))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let err = provider
        .create_resource(CreateRequest::new(ResourceKind::Group, "grp1", "westus"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Api { status: 500, .. }), "got {err:?}");
}

#[tokio::test]
async fn list_follows_next_page_token() {
    let server = MockServer::start().await;

    // First page carries a continuation token.
    Mock::given(method("GET"))
        .and(path("/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": "alpha", "kind": "group", "name": "alpha", "region": "westus"},
                {"id": "beta", "kind": "group", "name": "beta", "region": "westus"}
            ],
            "nextPageToken": "token-page-2"
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    // Second page ends the listing.
    Mock::given(method("GET"))
        .and(path("/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": "gamma", "kind": "group", "name": "gamma", "region": "westus"}
            ]
        })))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let states = provider
        .list_resources(ResourceKind::Group, None)
        .await
        .unwrap();

    let names: Vec<&str> = states.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "beta", "gamma"]);
}
