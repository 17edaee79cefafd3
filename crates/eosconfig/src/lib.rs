//! EOS plugin configuration parser
//!
//! This crate parses the plugin configuration file (`eos.config`), a
//! Java-properties style file of `key = value` lines, and exposes typed
//! access to the options.
//!
//! # Example
//!
//! ```no_run
//! use eosconfig::PluginConfig;
//!
//! let config = PluginConfig::from_file("config/eos.config").unwrap();
//! let server: String = config.get_required("eos.server").unwrap();
//! let port: u16 = config.get_required("eos.server.port").unwrap();
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default location of the plugin configuration, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config/eos.config";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Missing required option: {0}")]
    MissingOption(String),
}

/// Trait for types that can be parsed from eos.config values
pub trait ConfigValue: Sized + Clone {
    /// Parse from a string value in eos.config
    fn parse_config_value(s: &str) -> Result<Self, ConfigError>;

    /// Get the type name for error messages
    fn type_name() -> &'static str;
}

/// Duration value (supports time units: s, ms, us, m, h, d)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duration(pub std::time::Duration);

impl ConfigValue for Duration {
    fn parse_config_value(s: &str) -> Result<Self, ConfigError> {
        parse_duration(s).map(Duration)
    }

    fn type_name() -> &'static str {
        "duration"
    }
}

/// Count value (plain integer)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Count(pub u64);

impl ConfigValue for Count {
    fn parse_config_value(s: &str) -> Result<Self, ConfigError> {
        s.trim()
            .parse()
            .map(Count)
            .map_err(|_| ConfigError::ParseError(format!("Invalid count: {}", s)))
    }

    fn type_name() -> &'static str {
        "count"
    }
}

impl ConfigValue for u16 {
    fn parse_config_value(s: &str) -> Result<Self, ConfigError> {
        s.trim()
            .parse()
            .map_err(|_| ConfigError::ParseError(format!("Invalid port: {}", s)))
    }

    fn type_name() -> &'static str {
        "port"
    }
}

impl ConfigValue for String {
    fn parse_config_value(s: &str) -> Result<Self, ConfigError> {
        Ok(s.to_string())
    }

    fn type_name() -> &'static str {
        "string"
    }
}

/// A configuration option with key, type, and default value
pub struct ConfigOption<T: ConfigValue> {
    key: &'static str,
    default: T,
}

impl<T: ConfigValue> ConfigOption<T> {
    pub const fn new(key: &'static str, default: T) -> Self {
        Self { key, default }
    }

    /// Get the value from config, falling back to default
    ///
    /// Values that fail to parse are ignored in favour of the default.
    pub fn get(&self, config: &PluginConfig) -> T {
        config
            .get(self.key)
            .and_then(|s| T::parse_config_value(s).ok())
            .unwrap_or_else(|| self.default.clone())
    }
}

/// Parse duration string with time units
fn parse_duration(s: &str) -> Result<std::time::Duration, ConfigError> {
    let s = s.trim();

    let mut num_end = s.len();
    for (i, c) in s.char_indices() {
        if !c.is_ascii_digit() && c != '.' {
            num_end = i;
            break;
        }
    }

    let num_str = &s[..num_end];
    let unit = &s[num_end..].trim().to_lowercase();

    let num: f64 = num_str
        .parse()
        .map_err(|_| ConfigError::ParseError(format!("Invalid number: {}", num_str)))?;

    let seconds = match unit.as_str() {
        "" | "s" | "sec" | "second" | "seconds" => num,
        "ms" | "msec" | "millisecond" | "milliseconds" => num / 1000.0,
        "us" | "usec" | "microsecond" | "microseconds" => num / 1_000_000.0,
        "m" | "min" | "minute" | "minutes" => num * 60.0,
        "h" | "hr" | "hour" | "hours" => num * 3600.0,
        "d" | "day" | "days" => num * 86400.0,
        _ => {
            return Err(ConfigError::ParseError(format!(
                "Unknown time unit: {}",
                unit
            )))
        }
    };

    Ok(std::time::Duration::from_secs_f64(seconds))
}

/// Represents a parsed plugin configuration
#[derive(Debug, Clone, Default)]
pub struct PluginConfig {
    properties: HashMap<String, String>,
}

impl PluginConfig {
    /// Parse a plugin configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a plugin configuration from a string
    ///
    /// Each non-comment line is split on the first `=` or `:`. Lines without
    /// a separator declare a key with an empty value.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut properties = HashMap::new();

        for (lineno, line) in content.lines().enumerate() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }

            let (key, value) = match line.find(['=', ':']) {
                Some(pos) => (line[..pos].trim(), line[pos + 1..].trim()),
                None => (line, ""),
            };

            if key.is_empty() {
                return Err(ConfigError::ParseError(format!(
                    "line {}: missing key before separator",
                    lineno + 1
                )));
            }

            properties.insert(key.to_string(), value.to_string());
        }

        Ok(Self { properties })
    }

    /// Get a raw property value
    pub fn get(&self, key: &str) -> std::option::Option<&str> {
        self.properties.get(key).map(|v| v.as_str())
    }

    /// Fail with [`ConfigError::MissingOption`] if the property is not set
    pub fn require(&self, key: &str) -> Result<&str, ConfigError> {
        self.get(key)
            .ok_or_else(|| ConfigError::MissingOption(key.to_string()))
    }

    /// Get a required property parsed as `T`
    pub fn get_required<T: ConfigValue>(&self, key: &str) -> Result<T, ConfigError> {
        let raw = self.require(key)?;
        T::parse_config_value(raw).map_err(|e| {
            ConfigError::ParseError(format!("{} (expected {}): {}", key, T::type_name(), e))
        })
    }
}

/// Define a configuration struct with typed options
///
/// Each field is bound to a dotted property key.
///
/// # Example
///
/// ```
/// use eosconfig::{define_options, PluginConfig, Count, Duration};
///
/// define_options! {
///     /// Transport tuning
///     pub struct TransportConfig {
///         /// Request timeout
///         "eos.http.timeout" => timeout: Duration = Duration(std::time::Duration::from_secs(60)),
///
///         /// Idle connections kept per host
///         "eos.http.pool.max.idle" => max_idle: Count = Count(8),
///     }
/// }
///
/// let config = PluginConfig::parse("eos.http.timeout = 5s").unwrap();
/// let transport = TransportConfig::from_plugin_config(&config);
///
/// assert_eq!(transport.timeout.0, std::time::Duration::from_secs(5));
/// assert_eq!(transport.max_idle.0, 8);
/// ```
#[macro_export]
macro_rules! define_options {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $key:literal => $field:ident: $ty:ty = $default:expr
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                pub $field: $ty,
            )*
        }

        impl $name {
            /// Create with default values
            pub fn new() -> Self {
                Self {
                    $(
                        $field: $default,
                    )*
                }
            }

            /// Load from eos.config, falling back to defaults
            pub fn from_plugin_config(config: &$crate::PluginConfig) -> Self {
                Self {
                    $(
                        $field: {
                            let opt = $crate::ConfigOption::new($key, $default);
                            opt.get(config)
                        },
                    )*
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

define_options! {
    /// HTTP transport settings
    pub struct HttpOptions {
        /// Total request timeout
        "eos.http.timeout" => timeout: Duration = Duration(std::time::Duration::from_secs(60)),

        /// TCP connect timeout
        "eos.http.connect.timeout" => connect_timeout: Duration = Duration(std::time::Duration::from_secs(30)),

        /// Idle connections kept per host
        "eos.http.pool.max.idle" => pool_max_idle: Count = Count(8),
    }
}
