use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    BulkMessageRequest, BulkMessageResponse, CostBreakdown, Document, ErrorReport, Fault,
    GroupMessageRequest, Message, SendOptions,
};

const DELIVERY_UTC_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BulkMessagesJsonRequest<'a> {
    send_options: SendOptionsJson<'a>,
    messages: Vec<MessageJson<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GroupMessagesJsonRequest<'a> {
    send_options: SendOptionsJson<'a>,
    message: MessageJson<'a>,
    groups: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendOptionsJson<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    sender_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duplicate_check: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_delivery_utc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_delivery_utc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_rule_set_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    campaign_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cost_centre: Option<&'a str>,
    check_opt_outs: bool,
    shorten_urls: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    validity_period: Option<u32>,
    test_mode: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    rule_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_rule_version: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    extra_forward_emails: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct MessageJson<'a> {
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    destination: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    customer_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    document: Option<DocumentJson<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct DocumentJson<'a> {
    template: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
    #[serde(skip_serializing_if = "is_null")]
    variables: &'a serde_json::Value,
}

fn is_null(value: &&serde_json::Value) -> bool {
    value.is_null()
}

pub fn encode_bulk_messages_body(request: &BulkMessageRequest) -> BulkMessagesJsonRequest<'_> {
    BulkMessagesJsonRequest {
        send_options: encode_send_options(request.options()),
        messages: request.messages().iter().map(encode_message).collect(),
    }
}

pub fn encode_group_messages_body(request: &GroupMessageRequest) -> GroupMessagesJsonRequest<'_> {
    GroupMessagesJsonRequest {
        send_options: encode_send_options(request.options()),
        message: encode_message(request.message()),
        groups: request.groups().iter().map(|it| it.as_str()).collect(),
    }
}

fn encode_delivery_utc(value: Option<DateTime<Utc>>) -> Option<String> {
    value.map(|it| it.format(DELIVERY_UTC_FORMAT).to_string())
}

fn encode_send_options(options: &SendOptions) -> SendOptionsJson<'_> {
    SendOptionsJson {
        sender_id: options.sender_id.as_ref().map(|it| it.as_str()),
        duplicate_check: options.duplicate_check.as_deref(),
        start_delivery_utc: encode_delivery_utc(options.start_delivery_utc),
        end_delivery_utc: encode_delivery_utc(options.end_delivery_utc),
        reply_rule_set_name: options.reply_rule_set_name.as_deref(),
        campaign_name: options.campaign_name.as_deref(),
        cost_centre: options.cost_centre.as_deref(),
        check_opt_outs: options.check_opt_outs,
        shorten_urls: options.shorten_urls,
        validity_period: options.validity_period,
        test_mode: options.test_mode,
        rule_name: options.rule_name.as_deref(),
        reply_rule_version: options.reply_rule_version,
        extra_forward_emails: options.extra_forward_emails.as_deref(),
    }
}

fn encode_message(message: &Message) -> MessageJson<'_> {
    MessageJson {
        content: message.content.as_str(),
        destination: message.destination.as_ref().map(|it| it.raw()),
        customer_id: message.customer_id.as_ref().map(|it| it.as_str()),
        document: message.document.as_ref().map(encode_document),
    }
}

fn encode_document(document: &Document) -> DocumentJson<'_> {
    DocumentJson {
        template: &document.template,
        version: document.version,
        password: document.password.as_deref(),
        variables: &document.variables,
    }
}

/// `costBreakdown` and `faults` show up both as a single object and as a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(values) => values,
            Self::One(value) => vec![value],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BulkMessageJsonResponse {
    cost: i64,
    remaining_balance: i64,
    event_id: i64,
    sample: Option<String>,
    cost_breakdown: Option<OneOrMany<CostBreakdownJson>>,
    messages: i64,
    parts: i64,
    error_report: Option<ErrorReportJson>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct CostBreakdownJson {
    quantity: i64,
    cost: i64,
    network: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ErrorReportJson {
    no_network: i64,
    duplicates: i64,
    opted_outs: i64,
    faults: Option<OneOrMany<FaultJson>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct FaultJson {
    raw_destination: Option<String>,
    scrubbed_destination: Option<String>,
    customer_id: Option<String>,
    error_message: Option<String>,
    status: Option<String>,
}

impl From<BulkMessageJsonResponse> for BulkMessageResponse {
    fn from(value: BulkMessageJsonResponse) -> Self {
        Self {
            cost: value.cost,
            remaining_balance: value.remaining_balance,
            event_id: value.event_id,
            sample: value.sample.unwrap_or_default(),
            cost_breakdown: value
                .cost_breakdown
                .map(OneOrMany::into_vec)
                .unwrap_or_default()
                .into_iter()
                .map(|it| CostBreakdown {
                    quantity: it.quantity,
                    cost: it.cost,
                    network: it.network.unwrap_or_default(),
                })
                .collect(),
            messages: value.messages,
            parts: value.parts,
            error_report: value.error_report.map(Into::into).unwrap_or_default(),
        }
    }
}

impl From<ErrorReportJson> for ErrorReport {
    fn from(value: ErrorReportJson) -> Self {
        Self {
            no_network: value.no_network,
            duplicates: value.duplicates,
            opted_outs: value.opted_outs,
            faults: value
                .faults
                .map(OneOrMany::into_vec)
                .unwrap_or_default()
                .into_iter()
                .map(|it| Fault {
                    raw_destination: it.raw_destination.unwrap_or_default(),
                    scrubbed_destination: it.scrubbed_destination.unwrap_or_default(),
                    customer_id: it.customer_id.unwrap_or_default(),
                    error_message: it.error_message.unwrap_or_default(),
                    status: it.status.unwrap_or_default(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use crate::domain::{
        CustomerId, Destination, GroupName, MessageText, SenderId, ValidationError,
    };

    use super::*;

    fn message(destination: &str, content: &str) -> Result<Message, ValidationError> {
        Ok(Message::new(
            Destination::new(destination)?,
            MessageText::new(content)?,
        ))
    }

    #[test]
    fn encode_bulk_body_with_defaults_omits_unset_options() {
        let request = BulkMessageRequest::new(
            vec![message("27831234567", "hello").unwrap()],
            SendOptions::default(),
        )
        .unwrap();

        let body = serde_json::to_value(encode_bulk_messages_body(&request)).unwrap();
        assert_eq!(
            body,
            json!({
                "SendOptions": {
                    "CheckOptOuts": false,
                    "ShortenUrls": false,
                    "TestMode": false
                },
                "Messages": [
                    { "Content": "hello", "Destination": "27831234567" }
                ]
            })
        );
    }

    #[test]
    fn encode_bulk_body_with_every_option() {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 3, 1, 17, 0, 5).unwrap();
        let options = SendOptions {
            sender_id: Some(SenderId::new("ACME").unwrap()),
            duplicate_check: Some("Content".to_owned()),
            start_delivery_utc: Some(start),
            end_delivery_utc: Some(end),
            reply_rule_set_name: Some("replies".to_owned()),
            campaign_name: Some("spring".to_owned()),
            cost_centre: Some("marketing".to_owned()),
            check_opt_outs: true,
            shorten_urls: true,
            validity_period: Some(24),
            test_mode: true,
            rule_name: Some("auto".to_owned()),
            reply_rule_version: Some(3),
            extra_forward_emails: Some("ops@example.com".to_owned()),
        };
        let msg = message("27831234567", "hello")
            .unwrap()
            .customer_id(CustomerId::new("order-17").unwrap())
            .document(
                Document::new("invoice")
                    .unwrap()
                    .version(2)
                    .password("pin")
                    .variables(json!({ "amount": "R10" })),
            );
        let request = BulkMessageRequest::new(vec![msg], options).unwrap();

        let body = serde_json::to_value(encode_bulk_messages_body(&request)).unwrap();
        assert_eq!(
            body,
            json!({
                "SendOptions": {
                    "SenderId": "ACME",
                    "DuplicateCheck": "Content",
                    "StartDeliveryUtc": "2026-03-01T09:30:00Z",
                    "EndDeliveryUtc": "2026-03-01T17:00:05Z",
                    "ReplyRuleSetName": "replies",
                    "CampaignName": "spring",
                    "CostCentre": "marketing",
                    "CheckOptOuts": true,
                    "ShortenUrls": true,
                    "ValidityPeriod": 24,
                    "TestMode": true,
                    "RuleName": "auto",
                    "ReplyRuleVersion": 3,
                    "ExtraForwardEmails": "ops@example.com"
                },
                "Messages": [
                    {
                        "Content": "hello",
                        "Destination": "27831234567",
                        "CustomerId": "order-17",
                        "Document": {
                            "Template": "invoice",
                            "Version": 2,
                            "Password": "pin",
                            "Variables": { "amount": "R10" }
                        }
                    }
                ]
            })
        );
    }

    #[test]
    fn encode_group_body_lists_groups_in_order() {
        let request = GroupMessageRequest::new(
            Message::for_groups(MessageText::new("hello").unwrap()),
            vec![GroupName::new("staff").unwrap(), GroupName::new("vip").unwrap()],
            SendOptions {
                test_mode: true,
                ..Default::default()
            },
        )
        .unwrap();

        let body = serde_json::to_value(encode_group_messages_body(&request)).unwrap();
        assert_eq!(
            body,
            json!({
                "SendOptions": {
                    "CheckOptOuts": false,
                    "ShortenUrls": false,
                    "TestMode": true
                },
                "Message": { "Content": "hello" },
                "Groups": ["staff", "vip"]
            })
        );
    }

    #[test]
    fn decode_bulk_response_maps_every_field() {
        let json = r#"
        {
          "cost": 2,
          "remainingBalance": 98,
          "eventId": 12345,
          "sample": "hello",
          "costBreakdown": [
            { "quantity": 2, "cost": 2, "network": "Vodacom" }
          ],
          "messages": 2,
          "parts": 2,
          "errorReport": {
            "noNetwork": 0,
            "duplicates": 1,
            "optedOuts": 0,
            "faults": [
              {
                "rawDestination": "0831",
                "scrubbedDestination": "27831",
                "customerId": "order-17",
                "errorMessage": "Invalid destination",
                "status": "Failed"
              }
            ]
          }
        }
        "#;

        let parsed: BulkMessageJsonResponse = serde_json::from_str(json).unwrap();
        let response = BulkMessageResponse::from(parsed);
        assert_eq!(
            response,
            BulkMessageResponse {
                cost: 2,
                remaining_balance: 98,
                event_id: 12345,
                sample: "hello".to_owned(),
                cost_breakdown: vec![CostBreakdown {
                    quantity: 2,
                    cost: 2,
                    network: "Vodacom".to_owned(),
                }],
                messages: 2,
                parts: 2,
                error_report: ErrorReport {
                    no_network: 0,
                    duplicates: 1,
                    opted_outs: 0,
                    faults: vec![Fault {
                        raw_destination: "0831".to_owned(),
                        scrubbed_destination: "27831".to_owned(),
                        customer_id: "order-17".to_owned(),
                        error_message: "Invalid destination".to_owned(),
                        status: "Failed".to_owned(),
                    }],
                },
            }
        );
    }

    #[test]
    fn decode_bulk_response_accepts_single_objects_and_missing_fields() {
        let json = r#"
        {
          "cost": 1,
          "costBreakdown": { "quantity": 1, "cost": 1, "network": "MTN" },
          "errorReport": { "faults": null }
        }
        "#;

        let parsed: BulkMessageJsonResponse = serde_json::from_str(json).unwrap();
        let response = BulkMessageResponse::from(parsed);
        assert_eq!(response.cost, 1);
        assert_eq!(response.cost_breakdown.len(), 1);
        assert_eq!(response.cost_breakdown[0].network, "MTN");
        assert_eq!(response.error_report, ErrorReport::default());
        assert_eq!(response.sample, "");
    }
}
