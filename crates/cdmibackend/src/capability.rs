//! Mapping of EOS QoS classes to CDMI capabilities

use eosclient::{EosClientError, JsonObject, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Root of all capability URIs
pub const CAPABILITIES_ROOT: &str = "/cdmi_capabilities";

/// Name of the capability standing for "no QoS class assigned"
pub const EMPTY_CAPABILITY: &str = "empty";

/// CDMI capability type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityKind {
    Container,
    DataObject,
}

impl CapabilityKind {
    pub const ALL: [CapabilityKind; 2] = [CapabilityKind::Container, CapabilityKind::DataObject];

    /// Name used in capability URIs
    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityKind::Container => "container",
            CapabilityKind::DataObject => "dataobject",
        }
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Features the backend advertises for every capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CapabilityFlags {
    pub cdmi_data_redundancy: bool,
    pub cdmi_geographic_placement: bool,
    pub cdmi_capabilities_allowed: bool,
    pub cdmi_latency: bool,
}

/// The flag set EOS advertises, independent of the QoS class
pub const EOS_CAPABILITIES: CapabilityFlags = CapabilityFlags {
    cdmi_data_redundancy: true,
    cdmi_geographic_placement: true,
    cdmi_capabilities_allowed: true,
    cdmi_latency: true,
};

/// A CDMI capability as exposed to the host
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackendCapability {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CapabilityKind,
    pub metadata: JsonObject,
    pub capabilities: CapabilityFlags,
}

impl BackendCapability {
    pub fn uri(&self) -> String {
        capability_uri(self.kind, &self.name)
    }
}

impl fmt::Display for BackendCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            self.uri(),
            Value::Object(self.metadata.clone())
        )
    }
}

/// `/cdmi_capabilities/<kind>/<name>`
pub fn capability_uri(kind: CapabilityKind, name: &str) -> String {
    format!("{}/{}/{}", CAPABILITIES_ROOT, kind, name)
}

/// `/cdmi_capabilities/<kind>/<name>/`, the form used in `cdmi_capabilities_allowed`
pub fn transition_uri(kind: CapabilityKind, name: &str) -> String {
    format!("{}/", capability_uri(kind, name))
}

/// QoS class as described by `qos list <class>`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QosClassDescription {
    pub name: String,
    pub metadata: QosClassMetadata,
    /// Classes this class may transition to. `None` when the MGM gave no
    /// transition information, which is not the same as an empty list.
    #[serde(default)]
    pub transition: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QosClassMetadata {
    pub cdmi_data_redundancy_provided: i64,
    pub cdmi_latency_provided: i64,
    pub cdmi_geographic_placement_provided: Vec<String>,
}

impl QosClassDescription {
    pub fn from_json(object: &JsonObject) -> Result<Self> {
        serde_json::from_value(Value::Object(object.clone())).map_err(|e| {
            EosClientError::MalformedResponse(format!("invalid QoS class description: {}", e))
        })
    }

    /// Build the capability of the given kind for this class
    pub fn to_capability(&self, kind: CapabilityKind, flags: &CapabilityFlags) -> BackendCapability {
        let mut metadata = JsonObject::new();
        metadata.insert(
            "cdmi_data_redundancy".to_string(),
            Value::from(self.metadata.cdmi_data_redundancy_provided),
        );
        metadata.insert(
            "cdmi_latency".to_string(),
            Value::from(self.metadata.cdmi_latency_provided),
        );
        metadata.insert(
            "cdmi_geographic_placement".to_string(),
            Value::from(self.metadata.cdmi_geographic_placement_provided.clone()),
        );

        if let Some(transition) = &self.transition {
            let allowed = transition
                .iter()
                .map(|class| Value::String(transition_uri(kind, class)))
                .collect();
            metadata.insert("cdmi_capabilities_allowed".to_string(), Value::Array(allowed));
        }

        BackendCapability {
            name: self.name.clone(),
            kind,
            metadata,
            capabilities: *flags,
        }
    }
}

/// Map a raw class description to the capability of the given kind
pub fn map_capability(
    description: &JsonObject,
    kind: CapabilityKind,
    flags: &CapabilityFlags,
) -> Result<BackendCapability> {
    Ok(QosClassDescription::from_json(description)?.to_capability(kind, flags))
}

/// The capability of objects without a QoS class
pub fn map_empty_capability(kind: CapabilityKind, flags: &CapabilityFlags) -> BackendCapability {
    BackendCapability {
        name: EMPTY_CAPABILITY.to_string(),
        kind,
        metadata: JsonObject::new(),
        capabilities: *flags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn class_json(value: Value) -> JsonObject {
        value.as_object().unwrap().clone()
    }

    fn gold() -> JsonObject {
        class_json(json!({
            "name": "disk_replica",
            "metadata": {
                "cdmi_data_redundancy_provided": 2,
                "cdmi_latency_provided": 75,
                "cdmi_geographic_placement_provided": ["CH", "HU"]
            },
            "transition": ["gold", "silver"]
        }))
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(CapabilityKind::Container.as_str(), "container");
        assert_eq!(CapabilityKind::DataObject.to_string(), "dataobject");
        assert_eq!(
            serde_json::to_value(CapabilityKind::DataObject).unwrap(),
            json!("dataobject")
        );
    }

    #[test]
    fn test_transitions_container() {
        let capability = map_capability(&gold(), CapabilityKind::Container, &EOS_CAPABILITIES).unwrap();

        assert_eq!(capability.name, "disk_replica");
        assert_eq!(capability.kind, CapabilityKind::Container);
        assert_eq!(
            capability.metadata.get("cdmi_capabilities_allowed"),
            Some(&json!([
                "/cdmi_capabilities/container/gold/",
                "/cdmi_capabilities/container/silver/"
            ]))
        );
    }

    #[test]
    fn test_transitions_follow_kind() {
        let capability = map_capability(&gold(), CapabilityKind::DataObject, &EOS_CAPABILITIES).unwrap();

        assert_eq!(
            capability.metadata.get("cdmi_capabilities_allowed"),
            Some(&json!([
                "/cdmi_capabilities/dataobject/gold/",
                "/cdmi_capabilities/dataobject/silver/"
            ]))
        );
    }

    #[test]
    fn test_metadata_fields() {
        let capability = map_capability(&gold(), CapabilityKind::DataObject, &EOS_CAPABILITIES).unwrap();

        assert_eq!(capability.metadata.get("cdmi_data_redundancy"), Some(&json!(2)));
        assert_eq!(capability.metadata.get("cdmi_latency"), Some(&json!(75)));
        assert_eq!(
            capability.metadata.get("cdmi_geographic_placement"),
            Some(&json!(["CH", "HU"]))
        );
        assert_eq!(capability.capabilities, EOS_CAPABILITIES);
        assert_eq!(capability.uri(), "/cdmi_capabilities/dataobject/disk_replica");
    }

    #[test]
    fn test_missing_transition_omits_allowed() {
        let mut description = gold();
        description.remove("transition");

        let capability =
            map_capability(&description, CapabilityKind::Container, &EOS_CAPABILITIES).unwrap();
        assert!(!capability.metadata.contains_key("cdmi_capabilities_allowed"));
        assert_eq!(capability.metadata.len(), 3);
    }

    #[test]
    fn test_empty_transition_keeps_empty_list() {
        let mut description = gold();
        description.insert("transition".to_string(), json!([]));

        let capability =
            map_capability(&description, CapabilityKind::Container, &EOS_CAPABILITIES).unwrap();
        assert_eq!(
            capability.metadata.get("cdmi_capabilities_allowed"),
            Some(&json!([]))
        );
    }

    #[test]
    fn test_malformed_description() {
        let description = class_json(json!({
            "name": "broken",
            "metadata": { "cdmi_latency_provided": 10 }
        }));

        let err = map_capability(&description, CapabilityKind::Container, &EOS_CAPABILITIES)
            .unwrap_err();
        assert!(err.is_malformed_response());
    }

    #[test]
    fn test_empty_capability() {
        for kind in CapabilityKind::ALL {
            let capability = map_empty_capability(kind, &EOS_CAPABILITIES);
            assert_eq!(capability.name, "empty");
            assert_eq!(capability.kind, kind);
            assert!(capability.metadata.is_empty());
            assert_eq!(capability.capabilities, EOS_CAPABILITIES);
        }
    }

    #[test]
    fn test_capability_serialization() {
        let capability = map_empty_capability(CapabilityKind::DataObject, &EOS_CAPABILITIES);
        assert_eq!(
            serde_json::to_value(&capability).unwrap(),
            json!({
                "name": "empty",
                "type": "dataobject",
                "metadata": {},
                "capabilities": {
                    "cdmi_data_redundancy": true,
                    "cdmi_geographic_placement": true,
                    "cdmi_capabilities_allowed": true,
                    "cdmi_latency": true
                }
            })
        );
    }
}
