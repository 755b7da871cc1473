//! Integration tests for the HTTP transport.

use jsonapi_orchestrator::{
    ApiConfig, ApiUrl, HttpClient, HttpError, RequestBuilder, Resource, ResourceReader,
    ResourceWriter,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> ApiConfig {
    ApiConfig::new(ApiUrl::new(server.uri()).unwrap())
}

#[tokio::test]
async fn test_read_request_is_sent_with_jsonapi_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/conversations/cafebabe"))
        .and(query_param("include", "messages"))
        .and(header("Accept", "application/vnd.api+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "type": "conversation", "id": "cafebabe", "attributes": {} }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut reader = ResourceReader::new("conversation");
    reader.param("id", "cafebabe").sideload(json!({ "messages": true }));
    let compiled = RequestBuilder::new()
        .resource(Resource::Read(reader))
        .path("/conversations/:id")
        .api(api_for(&mock_server))
        .compile()
        .unwrap();

    let client = HttpClient::new().unwrap();
    let response = client.request(&compiled).await.unwrap();

    assert_eq!(response.code, 200);
    assert_eq!(response.body["data"]["id"], json!("cafebabe"));
}

#[tokio::test]
async fn test_write_request_sends_document() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/conversations"))
        .and(header("Content-Type", "application/vnd.api+json"))
        .and(body_partial_json(json!({
            "data": { "type": "conversation", "attributes": { "subject": "Hi" } }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": { "type": "conversation", "id": "1" }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut conversation = ResourceWriter::new("conversation");
    conversation.add_attributes(json!({ "subject": "Hi" }));
    let compiled = RequestBuilder::new()
        .resource(Resource::Write(conversation))
        .path("/conversations")
        .api(api_for(&mock_server))
        .compile()
        .unwrap();

    let response = HttpClient::new().unwrap().request(&compiled).await.unwrap();
    assert_eq!(response.code, 201);
}

#[tokio::test]
async fn test_failing_status_maps_to_response_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/conversations"))
        .respond_with(
            ResponseTemplate::new(422)
                .insert_header("X-Request-Id", "req-42")
                .set_body_json(json!({ "errors": [{ "title": "is invalid" }] })),
        )
        .mount(&mock_server)
        .await;

    let compiled = RequestBuilder::new()
        .resource(Resource::ReadList(ResourceReader::new("conversation")))
        .path("/conversations")
        .api(api_for(&mock_server))
        .compile()
        .unwrap();

    let result = HttpClient::new().unwrap().request(&compiled).await;
    match result {
        Err(HttpError::Response(error)) => {
            assert_eq!(error.code, 422);
            assert!(error.message.contains("is invalid"));
            assert_eq!(error.error_reference.as_deref(), Some("req-42"));
        }
        other => panic!("Expected a response error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_redirect_class_status_is_not_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/conversations"))
        .respond_with(ResponseTemplate::new(304))
        .mount(&mock_server)
        .await;

    let compiled = RequestBuilder::new()
        .resource(Resource::ReadList(ResourceReader::new("conversation")))
        .path("/conversations")
        .api(api_for(&mock_server))
        .compile()
        .unwrap();

    let response = HttpClient::new().unwrap().request(&compiled).await.unwrap();
    assert_eq!(response.code, 304);
    assert_eq!(response.body, json!({}));
}

#[tokio::test]
async fn test_relative_url_is_rejected_before_sending() {
    let compiled = RequestBuilder::new()
        .resource(Resource::ReadList(ResourceReader::new("conversation")))
        .path("/conversations")
        .compile()
        .unwrap();

    let result = HttpClient::new().unwrap().request(&compiled).await;
    assert!(matches!(result, Err(HttpError::Request(_))));
}
