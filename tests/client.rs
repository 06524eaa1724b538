//! Execution tests for the client transport.
//!
//! Covers authentication modes, error mapping, empty bodies and multipart
//! uploads against a wiremock server.

use std::collections::HashMap;

use hubapi::{ApiRequest, Credentials, Deal, HubSpotClient, HubSpotError, SchemaMode};
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{
    bearer_token, body_string_contains, header_exists, method, path, query_param,
    query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Default, serde::Deserialize)]
struct UploadReceipt {
    id: Option<String>,
}

#[tokio::test]
async fn test_api_key_travels_as_query_param() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/deals/v1/deal/1"))
        .and(query_param("hapikey", "secret-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"dealId": 1})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client =
        HubSpotClient::new(Credentials::ApiKey("secret-key".to_string()), &mock_server.uri())
            .unwrap();
    let deal = assert_ok!(client.deals().get_by_id::<Deal>(1).await);

    assert_eq!(deal.and_then(|d| d.id), Some(1));
}

#[tokio::test]
async fn test_oauth_token_travels_as_bearer_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/deals/v1/deal/1"))
        .and(bearer_token("oauth-token"))
        .and(query_param_is_missing("hapikey"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"dealId": 1})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client =
        HubSpotClient::new(Credentials::OAuth("oauth-token".to_string()), &mock_server.uri())
            .unwrap();
    assert!(client.uses_oauth());
    assert_ok!(client.deals().get_by_id::<Deal>(1).await);
}

#[tokio::test]
async fn test_base_url_path_prefix_is_kept() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/proxy/deals/v1/deal/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"dealId": 3})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let base = format!("{}/proxy", mock_server.uri());
    let client = HubSpotClient::new(Credentials::OAuth("t".to_string()), &base).unwrap();
    assert_ok!(client.deals().get_by_id::<Deal>(3).await);
}

#[tokio::test]
async fn test_error_status_maps_to_remote() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/properties/v1/deals/properties/named/dealname"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "status": "error",
            "message": "This hapikey doesn't exist."
        })))
        .mount(&mock_server)
        .await;

    let client =
        HubSpotClient::new(Credentials::ApiKey("bad".to_string()), &mock_server.uri()).unwrap();
    let err = assert_err!(client.deal_properties().get_property("dealname").await);

    assert_eq!(err.status_code(), Some(401));
    match err {
        HubSpotError::Remote { description, body, .. } => {
            assert_eq!(description, "Unauthorized");
            assert!(body.unwrap().contains("hapikey"));
        }
        other => panic!("expected Remote, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rate_limit_is_plain_remote_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client =
        HubSpotClient::new(Credentials::ApiKey("k".to_string()), &mock_server.uri()).unwrap();
    let err = assert_err!(client.deals().get_by_id::<Deal>(1).await);

    assert!(matches!(err, HubSpotError::Remote { status: 429, body: None, .. }));
}

#[tokio::test]
async fn test_empty_body_yields_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/deals/v1/deal/8"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client =
        HubSpotClient::new(Credentials::ApiKey("k".to_string()), &mock_server.uri()).unwrap();
    let deal = assert_ok!(client.deals().get_by_id::<Deal>(8).await);

    assert_eq!(deal, Some(Deal::default()));
}

#[tokio::test]
async fn test_malformed_body_is_serialization_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/deals/v1/deal/8"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&mock_server)
        .await;

    let client =
        HubSpotClient::new(Credentials::ApiKey("k".to_string()), &mock_server.uri()).unwrap();
    let err = assert_err!(client.deals().get_by_id::<Deal>(8).await);

    assert!(matches!(err, HubSpotError::Serialization(_)));
}

#[tokio::test]
async fn test_multipart_upload_sends_file_and_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/filemanager/api/v3/files/upload"))
        .and(header_exists("content-type"))
        .and(body_string_contains("name=\"report.csv\""))
        .and(body_string_contains("name=\"folderPath\""))
        .and(body_string_contains("dealname,amount"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "f-1"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client =
        HubSpotClient::new(Credentials::OAuth("t".to_string()), &mock_server.uri()).unwrap();
    let parameters = HashMap::from([("folderPath".to_string(), "/imports".to_string())]);
    let receipt: UploadReceipt = assert_ok!(
        client
            .execute_multipart(
                ApiRequest::post("/filemanager/api/v3/files/upload"),
                b"dealname,amount\nTest,1000\n".to_vec(),
                "report.csv",
                &parameters,
            )
            .await
    );

    assert_eq!(receipt.id.as_deref(), Some("f-1"));
}

#[tokio::test]
async fn test_multipart_rejects_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client =
        HubSpotClient::new(Credentials::OAuth("t".to_string()), &mock_server.uri()).unwrap();
    let request = ApiRequest::post("/upload")
        .json(&Deal::default().with_name("x"), SchemaMode::Properties)
        .unwrap();
    let result: Result<UploadReceipt, _> = client
        .execute_multipart(request, Vec::new(), "empty.bin", &HashMap::new())
        .await;

    assert!(matches!(result, Err(HubSpotError::Validation(_))));
}
