use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Insertion-ordered mapping from field name to value.
///
/// Scalar fields carry string values; composite fields (dimensions, weight,
/// update lists) carry structured JSON values and are flattened by the
/// transport. A fresh mapping is built per call and not retained afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    entries: Vec<(String, Value)>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field, replacing any earlier entry with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == name) {
            entry.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A named remote action and its parameter mapping. Created per call,
/// submitted once, discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub name: String,
    pub parameters: Parameters,
}

impl Operation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Parameters::new(),
        }
    }
}

/// Parsed result of a remote call, returned by the transport unchanged.
/// The facade neither inspects nor mutates the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResponse {
    pub operation: String,
    pub payload: Value,
}

/// Package dimensions as defined by the Easy Ship 2018-09-01 schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PackageDimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PackageWeight {
    pub value: f64,
    pub unit: String,
}

/// A pickup window offered by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PickupSlot {
    pub slot_id: String,
    pub pickup_time_start: DateTime<Utc>,
    pub pickup_time_end: DateTime<Utc>,
}

/// Details for scheduling a package pickup. SerialNumber additionally
/// triggers warranty document generation on the service side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PackageRequestDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_dimensions: Option<PackageDimensions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_weight: Option<PackageWeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    pub package_pickup_slot: PickupSlot,
}

/// Identifies a scheduled package. PackageId is absent until the service
/// assigns one at scheduling time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScheduledPackageId {
    pub amazon_order_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_id: Option<String>,
}

/// One reschedule entry: which package, and the new pickup slot for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScheduledPackageUpdateDetails {
    pub scheduled_package_id: ScheduledPackageId,
    pub package_pickup_slot: PickupSlot,
}

/// Operational status reported by the GetServiceStatus operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceStatus {
    #[serde(rename = "GREEN")]
    Green,
    #[serde(rename = "YELLOW")]
    Yellow,
    #[serde(rename = "RED")]
    Red,
}

impl std::str::FromStr for ServiceStatus {
    type Err = crate::utils::error::EasyShipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GREEN" => Ok(ServiceStatus::Green),
            "YELLOW" => Ok(ServiceStatus::Yellow),
            "RED" => Ok(ServiceStatus::Red),
            other => Err(crate::utils::error::EasyShipError::UnexpectedResponseError {
                message: format!("Unknown service status: {}", other),
            }),
        }
    }
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ServiceStatus::Green => "GREEN",
            ServiceStatus::Yellow => "YELLOW",
            ServiceStatus::Red => "RED",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameters_preserve_insertion_order() {
        let mut params = Parameters::new();
        params.insert("MarketplaceId", Value::String("MKT1".to_string()));
        params.insert("AmazonOrderId", Value::String("ORDER1".to_string()));
        params.insert("ScheduledPackageId", serde_json::json!({"AmazonOrderId": "ORDER1"}));

        let keys: Vec<&str> = params.keys().collect();
        assert_eq!(keys, vec!["MarketplaceId", "AmazonOrderId", "ScheduledPackageId"]);
    }

    #[test]
    fn test_parameters_insert_replaces_existing_key() {
        let mut params = Parameters::new();
        params.insert("MarketplaceId", Value::String("MKT1".to_string()));
        params.insert("MarketplaceId", Value::String("MKT2".to_string()));

        assert_eq!(params.len(), 1);
        assert_eq!(
            params.get("MarketplaceId"),
            Some(&Value::String("MKT2".to_string()))
        );
    }

    #[test]
    fn test_package_dimensions_serialize_with_schema_field_names() {
        let dims = PackageDimensions {
            length: 20.0,
            width: 15.0,
            height: 10.0,
            unit: "cm".to_string(),
        };

        let value = serde_json::to_value(&dims).unwrap();
        assert_eq!(value["Length"], serde_json::json!(20.0));
        assert_eq!(value["Width"], serde_json::json!(15.0));
        assert_eq!(value["Height"], serde_json::json!(10.0));
        assert_eq!(value["Unit"], serde_json::json!("cm"));
    }

    #[test]
    fn test_scheduled_package_id_omits_absent_package_id() {
        let id = ScheduledPackageId {
            amazon_order_id: "403-1234567-1234567".to_string(),
            package_id: None,
        };

        let value = serde_json::to_value(&id).unwrap();
        assert_eq!(value["AmazonOrderId"], serde_json::json!("403-1234567-1234567"));
        assert!(value.get("PackageId").is_none());
    }

    #[test]
    fn test_service_status_parsing() {
        assert_eq!("GREEN".parse::<ServiceStatus>().unwrap(), ServiceStatus::Green);
        assert_eq!("YELLOW".parse::<ServiceStatus>().unwrap(), ServiceStatus::Yellow);
        assert_eq!("RED".parse::<ServiceStatus>().unwrap(), ServiceStatus::Red);
        assert!("BLUE".parse::<ServiceStatus>().is_err());
        assert_eq!(ServiceStatus::Green.to_string(), "GREEN");
    }
}
