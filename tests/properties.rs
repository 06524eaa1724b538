//! Execution tests for deal property definition operations.

use hubapi::{Credentials, DealProperty, HubSpotClient, HubSpotError, PropertyOption};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> HubSpotClient {
    HubSpotClient::new(Credentials::OAuth("test-token".to_string()), &server.uri()).unwrap()
}

#[tokio::test]
async fn test_get_all_reads_bare_array() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/properties/v1/deals/properties"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "name": "dealname",
                "label": "Deal Name",
                "groupName": "dealinformation",
                "type": "string",
                "fieldType": "text",
                "options": []
            },
            {
                "name": "dealstage",
                "label": "Deal Stage",
                "type": "enumeration",
                "fieldType": "select",
                "options": [
                    {"label": "Won", "value": "closedwon", "displayOrder": 0, "hidden": false}
                ]
            }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let properties = client(&mock_server).deal_properties().get_all().await.unwrap();

    assert_eq!(properties.results.len(), 2);
    let stage = properties.find("dealstage").unwrap();
    assert_eq!(stage.property_type.as_deref(), Some("enumeration"));
    assert_eq!(stage.options[0].value, "closedwon");
}

#[tokio::test]
async fn test_create_posts_plain_definition() {
    let mock_server = MockServer::start().await;

    let expected = serde_json::json!({
        "name": "contract_length",
        "label": "Contract length",
        "groupName": "dealinformation",
        "type": "enumeration",
        "fieldType": "select",
        "options": [{"label": "One year", "value": "12", "hidden": false}]
    });

    Mock::given(method("POST"))
        .and(path("/properties/v1/deals/properties"))
        .and(body_json(&expected))
        .respond_with(ResponseTemplate::new(200).set_body_json(&expected))
        .expect(1)
        .mount(&mock_server)
        .await;

    let property = DealProperty::new("contract_length", "Contract length", "enumeration", "select")
        .in_group("dealinformation")
        .with_option(PropertyOption::new("One year", "12"));
    let created = client(&mock_server)
        .deal_properties()
        .create(&property)
        .await
        .unwrap();

    assert_eq!(created, property);
}

#[tokio::test]
async fn test_update_addresses_property_by_name() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/properties/v1/deals/properties/named/region"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "region",
            "label": "Sales region"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let property = DealProperty::new("region", "Sales region", "string", "text");
    let updated = client(&mock_server)
        .deal_properties()
        .update(&property)
        .await
        .unwrap();

    assert_eq!(updated.label.as_deref(), Some("Sales region"));
}

#[tokio::test]
async fn test_delete_and_missing_property() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/properties/v1/deals/properties/named/region"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/properties/v1/deals/properties/named/region"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    client.deal_properties().delete("region").await.unwrap();

    let err = client
        .deal_properties()
        .get_property("region")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_empty_name_is_rejected_locally() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let err = client(&mock_server)
        .deal_properties()
        .get_property("  ")
        .await
        .unwrap_err();
    assert!(matches!(err, HubSpotError::Validation(_)));
}
