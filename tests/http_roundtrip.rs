//! End-to-end tests against a mock MyMobileAPI server, using the real `reqwest` transport.

use httpmock::prelude::*;
use mymobileapi::{
    BulkMessageRequest, Credentials, Destination, GroupMessageRequest, GroupName, Message,
    MessageText, MyMobileApiClient, MyMobileApiError, SendOptions,
};
use serde_json::json;

// base64("client:secret")
const BASIC: &str = "BASIC Y2xpZW50OnNlY3JldA==";

fn credentials() -> Credentials {
    Credentials::new("client", "secret").unwrap()
}

fn mock_authentication<'a>(server: &'a MockServer, token: &str) -> httpmock::Mock<'a> {
    server.mock(|when, then| {
        when.method(GET)
            .path("/v1/Authentication")
            .header("authorization", BASIC);
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "token": token, "schema": "JWT", "expiresInMinutes": 1440 }));
    })
}

async fn connect(server: &MockServer) -> MyMobileApiClient {
    MyMobileApiClient::builder(credentials())
        .endpoint(server.url("/v1/"))
        .build()
        .await
        .unwrap()
}

fn message() -> Message {
    Message::new(
        Destination::new("27831234567").unwrap(),
        MessageText::new("hello").unwrap(),
    )
}

#[tokio::test]
async fn balance_round_trip_with_bearer_token() {
    let server = MockServer::start();
    let auth = mock_authentication(&server, "integration-tok");
    let balance = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/Balance")
            .header("authorization", "Bearer integration-tok")
            .header("content-type", "application/json");
        then.status(200).json_body(json!({ "balance": 4200 }));
    });

    let client = connect(&server).await;
    assert_eq!(client.get_balance().await.unwrap(), 4200);

    auth.assert_calls(1);
    balance.assert_calls(1);
}

#[tokio::test]
async fn construction_fails_when_authentication_is_rejected() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/Authentication");
        then.status(401)
            .json_body(json!({ "code": 401, "message": "Invalid credentials" }));
    });

    let err = MyMobileApiClient::builder(credentials())
        .endpoint(server.url("/v1"))
        .build()
        .await
        .err()
        .unwrap();
    assert!(matches!(err, MyMobileApiError::Api { status: 401, .. }));
    assert_eq!(err.to_string(), "401: Invalid credentials");
}

#[tokio::test]
async fn bulk_messages_send_nested_body() {
    let server = MockServer::start();
    mock_authentication(&server, "tok");
    let send = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/BulkMessages")
            .header("authorization", "Bearer tok")
            .json_body(json!({
                "SendOptions": {
                    "CheckOptOuts": true,
                    "ShortenUrls": false,
                    "TestMode": true,
                    "CampaignName": "spring"
                },
                "Messages": [{ "Content": "hello", "Destination": "27831234567" }]
            }));
        then.status(200).json_body(json!({
            "cost": 1,
            "remainingBalance": 4199,
            "eventId": 987,
            "sample": "hello",
            "costBreakdown": [{ "quantity": 1, "cost": 1, "network": "MTN" }],
            "messages": 1,
            "parts": 1,
            "errorReport": { "noNetwork": 0, "duplicates": 0, "optedOuts": 0, "faults": [] }
        }));
    });

    let client = connect(&server).await;
    let options = SendOptions {
        check_opt_outs: true,
        test_mode: true,
        campaign_name: Some("spring".to_owned()),
        ..Default::default()
    };
    let request = BulkMessageRequest::new(vec![message()], options).unwrap();
    let response = client.send_bulk_messages(request).await.unwrap();

    send.assert_calls(1);
    assert_eq!(response.remaining_balance, 4199);
    assert_eq!(response.event_id, 987);
    assert_eq!(response.cost_breakdown[0].network, "MTN");
}

#[tokio::test]
async fn group_messages_report_field_errors() {
    let server = MockServer::start();
    mock_authentication(&server, "tok");
    server.mock(|when, then| {
        when.method(POST).path("/v1/GroupMessages");
        then.status(400).json_body(json!({
            "errors": [
                { "location": "body", "name": "Groups", "description": "unknown group" }
            ]
        }));
    });

    let client = connect(&server).await;
    let request = GroupMessageRequest::new(
        Message::for_groups(MessageText::new("hello").unwrap()),
        vec![GroupName::new("nobody").unwrap()],
        SendOptions::default(),
    )
    .unwrap();
    let err = client.send_group_messages(request).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.to_string(), "Groups: unknown group");
}
