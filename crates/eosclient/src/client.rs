//! EOS client implementation
//!
//! Sends administrative commands to the MGM and turns its answers into JSON
//! objects or typed errors.

use crate::command::QosCommand;
use crate::endpoint::EosEndpoint;
use crate::envelope::{extract_payload, normalize, response_to_json, JsonObject, ARRAY_FIELD};
use crate::error::{EosClientError, Result};
use crate::transport::{HttpResponse, HttpTransport, Transport};
use eosconfig::{HttpOptions, PluginConfig};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

/// How a response status is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// 200-202: the body holds the command envelope
    Ok,
    /// 400, 401, 404, 500, 501: the body holds `{"error": "<message>"}`
    Error,
    /// Anything else
    Unexpected,
}

impl StatusClass {
    pub fn of(status: u16) -> Self {
        match status {
            200..=202 => StatusClass::Ok,
            400 | 401 | 404 | 500 | 501 => StatusClass::Error,
            _ => StatusClass::Unexpected,
        }
    }
}

/// Client for the MGM administrative interface
pub struct EosClient<T: Transport = HttpTransport> {
    endpoint: EosEndpoint,
    transport: T,
}

impl EosClient<HttpTransport> {
    /// Create a client from the plugin configuration
    ///
    /// Fails if any of the endpoint settings is missing or invalid.
    pub fn from_config(config: &PluginConfig) -> Result<Self> {
        let endpoint = EosEndpoint::from_config(config)?;
        let transport = HttpTransport::new(&HttpOptions::from_plugin_config(config))?;
        Ok(Self::new(endpoint, transport))
    }
}

impl<T: Transport> EosClient<T> {
    pub fn new(endpoint: EosEndpoint, transport: T) -> Self {
        Self {
            endpoint,
            transport,
        }
    }

    pub fn endpoint(&self) -> &EosEndpoint {
        &self.endpoint
    }

    /// GET `url` and return the response payload as text
    ///
    /// Errors are annotated with the request method and URL.
    pub async fn execute_raw(&self, url: &str) -> Result<String> {
        self.fetch(url)
            .await
            .and_then(|response| {
                extract_payload(&response.body).map(|payload| payload.to_string())
            })
            .map_err(|e| e.in_command("GET", url))
    }

    /// GET `url` and return the response payload as a JSON object
    pub async fn execute(&self, url: &str) -> Result<JsonObject> {
        self.fetch(url)
            .await
            .and_then(|response| response_to_json(&response.body))
            .map_err(|e| e.in_command("GET", url))
    }

    /// Perform the request and reject non-success statuses
    async fn fetch(&self, url: &str) -> Result<HttpResponse> {
        debug!("HTTP Request: GET {}", url);
        let response = self.transport.get(url).await?;

        match StatusClass::of(response.status) {
            StatusClass::Ok => Ok(response),
            StatusClass::Error => {
                warn!("GET {} {}: {}", url, response.status, response.body);
                Err(error_from_body(&response.body))
            }
            StatusClass::Unexpected => {
                warn!("GET {} {}: {}", url, response.status, response.body);
                Err(EosClientError::Transport(format!(
                    "unexpected HTTP status {}",
                    response.status
                )))
            }
        }
    }

    /// Send a QoS command and parse its JSON output
    pub async fn command(&self, command: &QosCommand) -> Result<JsonObject> {
        let url = self.endpoint.proto_command_url(command);
        self.execute(&url).await
    }

    /// Names of all QoS classes
    pub async fn qos_list(&self) -> Result<Vec<String>> {
        let url = self.endpoint.proto_command_url(&QosCommand::List);
        let response = self.execute(&url).await?;

        string_list(&response, ARRAY_FIELD).map_err(|e| e.in_command("GET", &url))
    }

    /// Description of a single QoS class
    pub async fn qos_list_class(&self, class_name: &str) -> Result<JsonObject> {
        self.command(&QosCommand::ListClass {
            class_name: class_name.to_string(),
        })
        .await
    }

    /// QoS properties of the object at `path`
    pub async fn qos_get(&self, path: &str) -> Result<JsonObject> {
        self.command(&QosCommand::Get {
            path: path.to_string(),
        })
        .await
    }

    /// Request a QoS class change for the object at `path`
    ///
    /// Only envelope errors are checked; the output of a successful `set`
    /// is not interpreted.
    pub async fn qos_set(&self, path: &str, class_name: &str) -> Result<()> {
        let command = QosCommand::Set {
            path: path.to_string(),
            class_name: class_name.to_string(),
        };
        let url = self.endpoint.proto_command_url(&command);
        let output = self.execute_raw(&url).await?;

        debug!("{} --> {}", command, output);
        Ok(())
    }

    /// Namespace metadata of the entry at `path`
    pub async fn fileinfo(&self, path: &str) -> Result<JsonObject> {
        let url = self.endpoint.fileinfo_url(path);
        self.execute(&url).await
    }
}

/// Body the MGM sends with an HTTP error status
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Turn an HTTP error body into an error carrying the server's message
fn error_from_body(body: &str) -> EosClientError {
    let json = match extract_payload(body).and_then(normalize) {
        Ok(json) => json,
        Err(e) => return e,
    };

    match serde_json::from_value::<ErrorBody>(Value::Object(json)) {
        Ok(body) => EosClientError::Protocol(body.error),
        Err(e) => EosClientError::MalformedResponse(format!("error response: {}", e)),
    }
}

/// Read `object[key]` as a list of strings
pub fn string_list(object: &JsonObject, key: &str) -> Result<Vec<String>> {
    let array = object
        .get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| EosClientError::MalformedResponse(format!("\"{}\" is not an array", key)))?;

    array
        .iter()
        .map(|v| {
            v.as_str().map(str::to_string).ok_or_else(|| {
                EosClientError::MalformedResponse(format!("non-string entry in \"{}\": {}", key, v))
            })
        })
        .collect()
}
