//! MGM endpoint and administrative URL construction

use crate::command::{encode_command, QosCommand};
use eosconfig::{ConfigError, ConfigValue, PluginConfig};
use std::fmt;

/// Administrative command path on the MGM HTTP interface
pub const CMD_PATH: &str = "/proc/user/";

/// Query key carrying an encoded protobuf command
pub const PROTO_COMMAND_KEY: &str = "mgm.cmd.proto";

pub const CONFIG_SERVER: &str = "eos.server";
pub const CONFIG_PORT: &str = "eos.server.port";
pub const CONFIG_SCHEME: &str = "eos.server.scheme";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConfigValue for Scheme {
    fn parse_config_value(s: &str) -> Result<Self, ConfigError> {
        match s.trim().to_lowercase().as_str() {
            "http" => Ok(Scheme::Http),
            "https" => Ok(Scheme::Https),
            other => Err(ConfigError::ParseError(format!("Invalid scheme: {}", other))),
        }
    }

    fn type_name() -> &'static str {
        "scheme"
    }
}

/// Location of the EOS MGM HTTP interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EosEndpoint {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
}

impl EosEndpoint {
    pub fn new(scheme: Scheme, host: impl Into<String>, port: u16) -> Self {
        Self {
            scheme,
            host: host.into(),
            port,
        }
    }

    /// Read the endpoint from the plugin configuration
    ///
    /// All three settings must be present; presence is checked before any
    /// value is parsed so a missing option is always reported as such.
    pub fn from_config(config: &PluginConfig) -> Result<Self, ConfigError> {
        for key in [CONFIG_SERVER, CONFIG_PORT, CONFIG_SCHEME] {
            config.require(key)?;
        }

        let host: String = config.get_required(CONFIG_SERVER)?;
        if host.is_empty() {
            return Err(ConfigError::ParseError(format!("{} is empty", CONFIG_SERVER)));
        }

        Ok(Self {
            scheme: config.get_required(CONFIG_SCHEME)?,
            host,
            port: config.get_required(CONFIG_PORT)?,
        })
    }

    /// `<scheme>://<host>:<port>`
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }

    /// URL carrying an already encoded protobuf command
    pub fn command_url(&self, encoded_command: &str) -> String {
        format!(
            "{}{}?{}={}",
            self.base_url(),
            CMD_PATH,
            PROTO_COMMAND_KEY,
            encoded_command
        )
    }

    /// Encode `command` and build its URL
    pub fn proto_command_url(&self, command: &QosCommand) -> String {
        self.command_url(&encode_command(command))
    }

    /// URL of the JSON `fileinfo` query for a namespace path
    pub fn fileinfo_url(&self, path: &str) -> String {
        let encoded_path: String = form_urlencoded::byte_serialize(path.as_bytes()).collect();
        format!(
            "{}{}?mgm.cmd=fileinfo&mgm.path={}&mgm.format=json",
            self.base_url(),
            CMD_PATH,
            encoded_path
        )
    }
}

impl fmt::Display for EosEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base_url())
    }
}
