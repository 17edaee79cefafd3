//! Client for the EOS MGM administrative interface
//!
//! This crate encodes QoS commands as protobuf console requests, sends them
//! to the MGM over HTTP, and recovers the JSON output from the MGM's
//! `mgm.proc.stdout=…&mgm.proc.stderr=…` response envelope.
//!
//! # Example
//!
//! ```no_run
//! use eosclient::EosClient;
//! use eosconfig::PluginConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = PluginConfig::from_file("config/eos.config")?;
//!     let client = EosClient::from_config(&config)?;
//!
//!     for class in client.qos_list().await? {
//!         let description = client.qos_list_class(&class).await?;
//!         println!("{}: {}", class, serde_json::Value::Object(description));
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod command;
pub mod endpoint;
pub mod envelope;
pub mod error;
pub mod messages;
pub mod transport;

pub use client::{string_list, EosClient, StatusClass};
pub use command::{decode_command, encode_command, QosCommand};
pub use endpoint::{EosEndpoint, Scheme, CMD_PATH};
pub use envelope::{extract_payload, normalize, parse_envelope, CommandEnvelope, JsonObject};
pub use error::{EosClientError, Result};
pub use transport::{HttpResponse, HttpTransport, Transport};
