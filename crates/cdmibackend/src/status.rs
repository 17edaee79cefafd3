//! QoS status of data objects

use crate::capability::{capability_uri, CapabilityKind, EMPTY_CAPABILITY};
use eosclient::{EosClientError, JsonObject, Result};
use serde::Serialize;
use serde_json::Value;

/// Class name the MGM reports for objects without a QoS class
pub const NULL_QOS: &str = "null";

pub const CURRENT_QOS_FIELD: &str = "current_qos";
pub const TARGET_QOS_FIELD: &str = "target_qos";

const S_IFMT: u64 = 0o170000;
const S_IFDIR: u64 = 0o040000;

/// `fileinfo` fields only reported for containers
const CONTAINER_FIELDS: [&str; 3] = ["children", "nndirectories", "nfiles"];

/// CDMI view of an object's QoS state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CdmiObjectStatus {
    /// Everything `qos get` reported besides the class fields
    pub monitored_attributes: JsonObject,
    pub current_capabilities_uri: String,
    /// Set only while a transition is in progress
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_capabilities_uri: Option<String>,
}

/// Whether a `fileinfo` answer describes a directory
pub fn is_directory(fileinfo: &JsonObject) -> bool {
    if CONTAINER_FIELDS.iter().any(|field| fileinfo.contains_key(*field)) {
        return true;
    }

    fileinfo
        .get("mode")
        .and_then(Value::as_u64)
        .is_some_and(|mode| mode & S_IFMT == S_IFDIR)
}

/// Data object capability URI for a class name as reported by the MGM
pub fn object_capability_uri(class_name: &str) -> String {
    let name = if class_name == NULL_QOS {
        EMPTY_CAPABILITY
    } else {
        class_name
    };
    capability_uri(CapabilityKind::DataObject, name)
}

fn class_uri(value: &Value, field: &str) -> Result<String> {
    value
        .as_str()
        .map(object_capability_uri)
        .ok_or_else(|| EosClientError::MalformedResponse(format!("\"{}\" is not a string: {}", field, value)))
}

/// Build the object status from a `qos get` answer
///
/// A missing `current_qos` is treated like `"null"`. A missing `target_qos`
/// means no transition is in progress.
pub fn map_object_status(mut qos: JsonObject) -> Result<CdmiObjectStatus> {
    let current_capabilities_uri = match qos.remove(CURRENT_QOS_FIELD) {
        Some(value) => class_uri(&value, CURRENT_QOS_FIELD)?,
        None => object_capability_uri(NULL_QOS),
    };

    let target_capabilities_uri = qos
        .remove(TARGET_QOS_FIELD)
        .map(|value| class_uri(&value, TARGET_QOS_FIELD))
        .transpose()?;

    Ok(CdmiObjectStatus {
        monitored_attributes: qos,
        current_capabilities_uri,
        target_capabilities_uri,
    })
}

/// Extract the class name from a data object capability URI
///
/// Accepts `/cdmi_capabilities/dataobject/<class>` with or without a
/// trailing slash.
pub fn class_name_from_uri(uri: &str) -> Result<String> {
    let marker = format!("/{}/", CapabilityKind::DataObject);

    let start = uri.find(&marker).ok_or_else(|| {
        EosClientError::InvalidOperation(format!("not a dataobject capability URI: {}", uri))
    })? + marker.len();

    let name = uri[start..].trim_end_matches('/');
    if name.is_empty() || name.contains('/') {
        return Err(EosClientError::InvalidOperation(format!(
            "no capability name in URI: {}",
            uri
        )));
    }

    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> JsonObject {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_null_class_without_target() {
        let status = map_object_status(object(json!({
            "current_qos": "null",
            "layout": "replica",
            "replica": 2
        })))
        .unwrap();

        assert_eq!(status.current_capabilities_uri, "/cdmi_capabilities/dataobject/empty");
        assert_eq!(status.target_capabilities_uri, None);
        assert_eq!(
            Value::Object(status.monitored_attributes),
            json!({"layout": "replica", "replica": 2})
        );
    }

    #[test]
    fn test_transition_in_progress() {
        let status = map_object_status(object(json!({
            "current_qos": "disk_plain",
            "target_qos": "disk_replica",
            "checksum": "adler"
        })))
        .unwrap();

        assert_eq!(status.current_capabilities_uri, "/cdmi_capabilities/dataobject/disk_plain");
        assert_eq!(
            status.target_capabilities_uri.as_deref(),
            Some("/cdmi_capabilities/dataobject/disk_replica")
        );
        assert_eq!(status.monitored_attributes.len(), 1);
    }

    #[test]
    fn test_transition_to_empty_is_kept() {
        let status = map_object_status(object(json!({
            "current_qos": "gold",
            "target_qos": "null"
        })))
        .unwrap();

        assert_eq!(
            status.target_capabilities_uri.as_deref(),
            Some("/cdmi_capabilities/dataobject/empty")
        );
    }

    #[test]
    fn test_missing_current_is_empty() {
        let status = map_object_status(JsonObject::new()).unwrap();
        assert_eq!(status.current_capabilities_uri, "/cdmi_capabilities/dataobject/empty");
    }

    #[test]
    fn test_non_string_class() {
        let err = map_object_status(object(json!({"current_qos": 3}))).unwrap_err();
        assert!(err.is_malformed_response());
    }

    #[test]
    fn test_is_directory() {
        assert!(is_directory(&object(json!({"mode": 0o40755, "name": "dir"}))));
        assert!(is_directory(&object(json!({"nndirectories": 2, "nfiles": 10}))));
        assert!(is_directory(&object(json!({"children": []}))));
        assert!(!is_directory(&object(json!({"mode": 0o100644, "size": 3}))));
        assert!(!is_directory(&object(json!({"size": 3}))));
    }

    #[test]
    fn test_class_name_from_uri() {
        assert_eq!(
            class_name_from_uri("/cdmi_capabilities/dataobject/gold").unwrap(),
            "gold"
        );
        assert_eq!(
            class_name_from_uri("/cdmi_capabilities/dataobject/gold/").unwrap(),
            "gold"
        );
        assert_eq!(
            class_name_from_uri("https://cdmi.example.org/cdmi_capabilities/dataobject/disk_replica")
                .unwrap(),
            "disk_replica"
        );
    }

    #[test]
    fn test_class_name_from_bad_uri() {
        for uri in [
            "/cdmi_capabilities/container/gold",
            "/cdmi_capabilities/dataobject/",
            "/cdmi_capabilities/dataobject/a/b",
            "gold",
        ] {
            assert!(class_name_from_uri(uri).unwrap_err().is_invalid_operation());
        }
    }

    #[test]
    fn test_status_serialization_skips_missing_target() {
        let status = map_object_status(object(json!({"current_qos": "null"}))).unwrap();
        assert_eq!(
            serde_json::to_value(&status).unwrap(),
            json!({
                "monitored_attributes": {},
                "current_capabilities_uri": "/cdmi_capabilities/dataobject/empty"
            })
        );
    }
}
