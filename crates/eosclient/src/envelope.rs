//! MGM response envelope parsing
//!
//! Command responses come back as
//!
//! ```text
//! mgm.proc.stdout=<output>&mgm.proc.stderr=<errors>&mgm.proc.retc=<retc>
//! ```
//!
//! where field order is not guaranteed and any field may be missing. Some
//! endpoints answer with bare JSON and no envelope at all.

use crate::error::{EosClientError, Result};
use serde_json::{Map, Value};
use tracing::{debug, warn};

pub const STDOUT_KEY: &str = "mgm.proc.stdout=";
pub const STDERR_KEY: &str = "mgm.proc.stderr=";
pub const RETC_KEY: &str = "mgm.proc.retc=";

/// Field name under which a bare JSON array payload is wrapped
pub const ARRAY_FIELD: &str = "name";

pub type JsonObject = Map<String, Value>;

/// All reserved fields of an envelope
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandEnvelope<'a> {
    pub stdout: Option<&'a str>,
    pub stderr: Option<&'a str>,
    pub retc: Option<i32>,
}

/// Value of `key` up to the next `&` or the end of the response
fn field<'a>(response: &'a str, key: &str) -> Option<&'a str> {
    let start = response.find(key)? + key.len();
    let end = response[start..]
        .find('&')
        .map_or(response.len(), |pos| start + pos);
    Some(&response[start..end])
}

/// Split a response into its reserved fields
///
/// An unparsable `retc` is reported as `None`.
pub fn parse_envelope(response: &str) -> CommandEnvelope<'_> {
    CommandEnvelope {
        stdout: field(response, STDOUT_KEY),
        stderr: field(response, STDERR_KEY),
        retc: field(response, RETC_KEY).and_then(|s| s.trim().parse().ok()),
    }
}

/// Extract the command output from a response
///
/// Fails if the response carries a non-empty error message, whether or not
/// an output field is present. Responses without an output field are
/// returned unchanged.
pub fn extract_payload(response: &str) -> Result<&str> {
    debug!("Extracting output from command response: {}", response);

    let envelope = parse_envelope(response);
    if let Some(message) = envelope.stderr.filter(|m| !m.is_empty()) {
        return Err(EosClientError::Protocol(message.to_string()));
    }

    match envelope.retc {
        Some(0) | None => {}
        Some(retc) => warn!("Command returned retc={} without error message", retc),
    }

    Ok(envelope.stdout.unwrap_or(response))
}

/// Parse a payload into a JSON object
///
/// A top-level array is accepted and wrapped as `{"name": [...]}`; the
/// class listing is the one command that answers this way.
pub fn normalize(payload: &str) -> Result<JsonObject> {
    let object_err = match serde_json::from_str::<JsonObject>(payload) {
        Ok(object) => return Ok(object),
        Err(e) => e,
    };

    warn!("Failed conversion from output to JSON object");

    match serde_json::from_str::<Vec<Value>>(payload) {
        Ok(array) => {
            let mut object = JsonObject::new();
            object.insert(ARRAY_FIELD.to_string(), Value::Array(array));
            Ok(object)
        }
        Err(_) => {
            warn!("Failed conversion from output to JSON array");
            Err(EosClientError::MalformedResponse(object_err.to_string()))
        }
    }
}

/// Extract and normalize the JSON output of a response
pub fn response_to_json(response: &str) -> Result<JsonObject> {
    let payload = extract_payload(response)?;
    debug!("Converting response output to JSON: {}", payload);
    normalize(payload)
}
