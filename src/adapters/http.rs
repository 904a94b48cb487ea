use crate::config::TomlConfig;
use crate::domain::model::{Operation, Parameters, ParsedResponse};
use crate::domain::ports::Transport;
use crate::utils::error::{EasyShipError, Result};
use async_trait::async_trait;
use chrono::Utc;
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::StatusCode;
use serde_json::{Map, Value};
use std::time::Duration;
use url::Url;

pub const API_VERSION: &str = "2018-09-01";
pub const API_PATH: &str = "/EasyShip/2018-09-01";

/// Default transport for the marketplace web service.
///
/// Submits each operation as one form-encoded POST to the Easy Ship section
/// endpoint and parses the XML response body into a generic JSON tree.
/// Structured parameter values are flattened to the dotted/indexed field
/// names the service expects.
pub struct MwsTransport {
    client: reqwest::Client,
    request_url: Url,
    seller_id: String,
    access_key_id: String,
}

impl MwsTransport {
    pub fn new(
        endpoint: &str,
        seller_id: &str,
        access_key_id: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let base = Url::parse(endpoint).map_err(|e| EasyShipError::InvalidConfigValueError {
            field: "endpoint".to_string(),
            value: endpoint.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;
        let request_url =
            base.join(API_PATH)
                .map_err(|e| EasyShipError::InvalidConfigValueError {
                    field: "endpoint".to_string(),
                    value: endpoint.to_string(),
                    reason: format!("Cannot append API path: {}", e),
                })?;

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            request_url,
            seller_id: seller_id.to_string(),
            access_key_id: access_key_id.to_string(),
        })
    }

    pub fn from_config(config: &TomlConfig) -> Result<Self> {
        Self::new(
            &config.service.endpoint,
            &config.credentials.seller_id,
            &config.credentials.access_key_id,
            config.timeout(),
        )
    }
}

#[async_trait]
impl Transport for MwsTransport {
    async fn run(&self, operation: Operation) -> Result<ParsedResponse> {
        let mut form: Vec<(String, String)> = vec![
            ("Action".to_string(), operation.name.clone()),
            ("Version".to_string(), API_VERSION.to_string()),
            (
                "Timestamp".to_string(),
                Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            ),
            ("SellerId".to_string(), self.seller_id.clone()),
            ("AWSAccessKeyId".to_string(), self.access_key_id.clone()),
        ];
        form.extend(flatten_parameters(&operation.parameters));

        tracing::debug!(
            "Submitting {} to {} ({} fields)",
            operation.name,
            self.request_url,
            form.len()
        );
        let response = self
            .client
            .post(self.request_url.clone())
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!("{} response status: {}", operation.name, status);

        let payload = parse_xml_payload(&body)?;
        if !status.is_success() {
            return Err(service_error(&payload, status));
        }

        Ok(ParsedResponse {
            operation: operation.name,
            payload,
        })
    }
}

/// Flattens a parameter mapping into form fields. Nested members become
/// dotted names (`PackageDimensions.Length`), list entries 1-based indices
/// (`ScheduledPackageUpdateDetailsList.1.…`). Null members are omitted.
pub fn flatten_parameters(parameters: &Parameters) -> Vec<(String, String)> {
    let mut fields = Vec::new();
    for (name, value) in parameters.iter() {
        flatten_value(name, value, &mut fields);
    }
    fields
}

fn flatten_value(prefix: &str, value: &Value, fields: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::String(s) => fields.push((prefix.to_string(), s.clone())),
        Value::Number(n) => fields.push((prefix.to_string(), n.to_string())),
        Value::Bool(b) => fields.push((prefix.to_string(), b.to_string())),
        Value::Object(members) => {
            for (member, member_value) in members {
                flatten_value(&format!("{}.{}", prefix, member), member_value, fields);
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_value(&format!("{}.{}", prefix, index + 1), item, fields);
            }
        }
    }
}

/// Parses an XML document into a JSON tree: elements become object members,
/// text-only elements become strings, repeated sibling names collect into
/// arrays. Attributes and the XML declaration are dropped.
pub fn parse_xml_payload(body: &str) -> Result<Value> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut root = Map::new();
    // Stack of open elements: (name, child members, accumulated text).
    let mut stack: Vec<(String, Map<String, Value>, String)> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                stack.push((name, Map::new(), String::new()));
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                let target = match stack.last_mut() {
                    Some((_, children, _)) => children,
                    None => &mut root,
                };
                insert_member(target, name, Value::Null);
            }
            Event::Text(e) => {
                if let Some((_, _, text)) = stack.last_mut() {
                    let unescaped = e.unescape().map_err(quick_xml::Error::from)?;
                    text.push_str(&unescaped);
                }
            }
            Event::End(_) => {
                let (name, children, text) = match stack.pop() {
                    Some(frame) => frame,
                    None => {
                        return Err(EasyShipError::UnexpectedResponseError {
                            message: "Unbalanced closing tag in response body".to_string(),
                        })
                    }
                };
                let value = if !children.is_empty() {
                    Value::Object(children)
                } else if !text.is_empty() {
                    Value::String(text)
                } else {
                    Value::Null
                };
                let target = match stack.last_mut() {
                    Some((_, parent_children, _)) => parent_children,
                    None => &mut root,
                };
                insert_member(target, name, value);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(Value::Object(root))
}

fn insert_member(members: &mut Map<String, Value>, name: String, value: Value) {
    match members.get_mut(&name) {
        None => {
            members.insert(name, value);
        }
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
    }
}

/// Maps the service's error envelope to a typed error. Falls back to the
/// HTTP status when the body carries no recognizable `<Error>` element.
fn service_error(payload: &Value, status: StatusCode) -> EasyShipError {
    let error = payload
        .get("ErrorResponse")
        .and_then(|r| r.get("Error"))
        .map(|e| match e {
            Value::Array(items) => items.first().cloned().unwrap_or(Value::Null),
            other => other.clone(),
        })
        .unwrap_or(Value::Null);

    let code = error
        .get("Code")
        .and_then(Value::as_str)
        .unwrap_or(status.as_str())
        .to_string();
    let message = error
        .get("Message")
        .and_then(Value::as_str)
        .unwrap_or("Service request failed")
        .to_string();

    EasyShipError::ServiceError { code, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_scalar_and_nested_parameters() {
        let mut params = Parameters::new();
        params.insert("MarketplaceId", serde_json::json!("MKT1"));
        params.insert(
            "PackageDimensions",
            serde_json::json!({"Length": 20.0, "Unit": "cm"}),
        );

        let fields = flatten_parameters(&params);
        assert!(fields.contains(&("MarketplaceId".to_string(), "MKT1".to_string())));
        assert!(fields.contains(&("PackageDimensions.Length".to_string(), "20.0".to_string())));
        assert!(fields.contains(&("PackageDimensions.Unit".to_string(), "cm".to_string())));
    }

    #[test]
    fn test_flatten_list_parameters_use_one_based_indices() {
        let mut params = Parameters::new();
        params.insert(
            "ScheduledPackageUpdateDetailsList",
            serde_json::json!([
                {"ScheduledPackageId": {"AmazonOrderId": "ORDER1"}},
                {"ScheduledPackageId": {"AmazonOrderId": "ORDER2"}}
            ]),
        );

        let fields = flatten_parameters(&params);
        assert!(fields.contains(&(
            "ScheduledPackageUpdateDetailsList.1.ScheduledPackageId.AmazonOrderId".to_string(),
            "ORDER1".to_string()
        )));
        assert!(fields.contains(&(
            "ScheduledPackageUpdateDetailsList.2.ScheduledPackageId.AmazonOrderId".to_string(),
            "ORDER2".to_string()
        )));
    }

    #[test]
    fn test_flatten_skips_null_members() {
        let mut params = Parameters::new();
        params.insert(
            "ScheduledPackageId",
            serde_json::json!({"AmazonOrderId": "ORDER1", "PackageId": null}),
        );

        let fields = flatten_parameters(&params);
        assert_eq!(
            fields,
            vec![(
                "ScheduledPackageId.AmazonOrderId".to_string(),
                "ORDER1".to_string()
            )]
        );
    }

    #[test]
    fn test_parse_xml_payload_nested_elements() {
        let xml = r#"<?xml version="1.0"?>
            <GetServiceStatusResponse>
                <GetServiceStatusResult>
                    <Status>GREEN</Status>
                    <Timestamp>2019-02-14T10:39:52Z</Timestamp>
                </GetServiceStatusResult>
            </GetServiceStatusResponse>"#;

        let payload = parse_xml_payload(xml).unwrap();
        assert_eq!(
            payload["GetServiceStatusResponse"]["GetServiceStatusResult"]["Status"],
            serde_json::json!("GREEN")
        );
    }

    #[test]
    fn test_parse_xml_payload_collects_repeated_elements_into_arrays() {
        let xml = r#"
            <ListPickupSlotsResult>
                <PickupSlotList>
                    <PickupSlot><SlotId>SLOT-1</SlotId></PickupSlot>
                    <PickupSlot><SlotId>SLOT-2</SlotId></PickupSlot>
                </PickupSlotList>
            </ListPickupSlotsResult>"#;

        let payload = parse_xml_payload(xml).unwrap();
        let slots = &payload["ListPickupSlotsResult"]["PickupSlotList"]["PickupSlot"];
        assert!(slots.is_array());
        assert_eq!(slots[0]["SlotId"], serde_json::json!("SLOT-1"));
        assert_eq!(slots[1]["SlotId"], serde_json::json!("SLOT-2"));
    }

    #[test]
    fn test_parse_xml_payload_empty_element_becomes_null() {
        let payload = parse_xml_payload("<Result><PackageId/></Result>").unwrap();
        assert_eq!(payload["Result"]["PackageId"], Value::Null);
    }

    #[test]
    fn test_service_error_extracts_code_and_message() {
        let payload = serde_json::json!({
            "ErrorResponse": {
                "Error": {
                    "Type": "Sender",
                    "Code": "InvalidParameterValue",
                    "Message": "Invalid MarketplaceId"
                },
                "RequestID": "abc-123"
            }
        });

        let err = service_error(&payload, StatusCode::BAD_REQUEST);
        match err {
            EasyShipError::ServiceError { code, message } => {
                assert_eq!(code, "InvalidParameterValue");
                assert_eq!(message, "Invalid MarketplaceId");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_service_error_falls_back_to_http_status() {
        let payload = serde_json::json!({});
        let err = service_error(&payload, StatusCode::SERVICE_UNAVAILABLE);
        match err {
            EasyShipError::ServiceError { code, .. } => assert_eq!(code, "503"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
