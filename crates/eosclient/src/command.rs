//! QoS command encoding
//!
//! A [`QosCommand`] travels to the MGM as the `mgm.cmd.proto` query value:
//! the serialized [`RequestProto`], base64 encoded, then form-urlencoded so
//! that `+`, `/` and `=` survive the query string.

use crate::error::{EosClientError, Result};
use crate::messages::qos_proto::{self, identifier_proto::Identifier, IdentifierProto};
use crate::messages::{request_proto, QoSProto, RequestProto};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use prost::Message;
use std::fmt;
use tracing::debug;

/// QoS administrative commands understood by the MGM
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QosCommand {
    /// `qos list`: names of all QoS classes
    List,
    /// `qos list <class>`: description of one class
    ///
    /// An empty `class_name` is indistinguishable from [`QosCommand::List`]
    /// on the wire and decodes as such.
    ListClass { class_name: String },
    /// `qos get <path>`: QoS status of an object
    Get { path: String },
    /// `qos set <path> <class>`: schedule a transition
    Set { path: String, class_name: String },
}

impl QosCommand {
    /// Build the console request for this command
    pub fn to_request(&self) -> RequestProto {
        let subcmd = match self {
            QosCommand::List => qos_proto::Subcmd::List(qos_proto::ListProto::default()),
            QosCommand::ListClass { class_name } => {
                qos_proto::Subcmd::List(qos_proto::ListProto {
                    classname: class_name.clone(),
                })
            }
            QosCommand::Get { path } => qos_proto::Subcmd::Get(qos_proto::GetProto {
                identifier: Some(IdentifierProto::path(path.as_str())),
                key: Vec::new(),
            }),
            QosCommand::Set { path, class_name } => {
                qos_proto::Subcmd::Set(qos_proto::SetProto {
                    identifier: Some(IdentifierProto::path(path.as_str())),
                    classname: class_name.clone(),
                })
            }
        };

        RequestProto::qos(QoSProto {
            subcmd: Some(subcmd),
        })
    }

    /// Rebuild a command from a decoded console request
    pub fn from_request(request: RequestProto) -> Result<Self> {
        let qos = match request.command {
            Some(request_proto::Command::Qos(qos)) => qos,
            None => return Err(EosClientError::Decoding("request carries no qos command".into())),
        };

        match qos.subcmd {
            Some(qos_proto::Subcmd::List(list)) if list.classname.is_empty() => Ok(QosCommand::List),
            Some(qos_proto::Subcmd::List(list)) => Ok(QosCommand::ListClass {
                class_name: list.classname,
            }),
            Some(qos_proto::Subcmd::Get(get)) => Ok(QosCommand::Get {
                path: identifier_path(get.identifier)?,
            }),
            Some(qos_proto::Subcmd::Set(set)) => Ok(QosCommand::Set {
                path: identifier_path(set.identifier)?,
                class_name: set.classname,
            }),
            None => Err(EosClientError::Decoding("qos command has no subcommand".into())),
        }
    }
}

impl fmt::Display for QosCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QosCommand::List => write!(f, "qos list"),
            QosCommand::ListClass { class_name } => write!(f, "qos list {}", class_name),
            QosCommand::Get { path } => write!(f, "qos get {}", path),
            QosCommand::Set { path, class_name } => write!(f, "qos set {} {}", path, class_name),
        }
    }
}

fn identifier_path(identifier: Option<IdentifierProto>) -> Result<String> {
    match identifier.and_then(|id| id.identifier) {
        Some(Identifier::Path(path)) => Ok(path),
        Some(Identifier::FileId(fid)) => Err(EosClientError::Decoding(format!(
            "identifier is file id {}, expected a path",
            fid
        ))),
        Some(Identifier::ContainerId(cid)) => Err(EosClientError::Decoding(format!(
            "identifier is container id {}, expected a path",
            cid
        ))),
        None => Err(EosClientError::Decoding("missing identifier".into())),
    }
}

/// Encode a command as a transport-safe `mgm.cmd.proto` value
pub fn encode_command(command: &QosCommand) -> String {
    let request = command.to_request();
    let base64 = BASE64.encode(request.encode_to_vec());

    debug!("Base64 encoding: {} --> {}", command, base64);

    form_urlencoded::byte_serialize(base64.as_bytes()).collect()
}

/// Reverse [`encode_command`]
pub fn decode_command(encoded: &str) -> Result<QosCommand> {
    // An encoded command never contains a raw '&' or '=', so the whole input
    // parses as a single form key.
    let base64 = form_urlencoded::parse(encoded.as_bytes())
        .next()
        .map(|(key, _)| key.into_owned())
        .unwrap_or_default();

    let raw = BASE64
        .decode(base64.trim())
        .map_err(|e| EosClientError::Decoding(format!("invalid base64: {}", e)))?;

    let request = RequestProto::decode(raw.as_slice())
        .map_err(|e| EosClientError::Decoding(format!("invalid request protobuf: {}", e)))?;

    QosCommand::from_request(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_commands() -> Vec<QosCommand> {
        vec![
            QosCommand::List,
            QosCommand::ListClass {
                class_name: "disk_plain".to_string(),
            },
            QosCommand::Get {
                path: "/eos/test/file".to_string(),
            },
            QosCommand::Set {
                path: "/eos/test/dir with space/file+1".to_string(),
                class_name: "gold".to_string(),
            },
        ]
    }

    #[test]
    fn test_encode_decode_all_commands() {
        for command in all_commands() {
            let encoded = encode_command(&command);
            let decoded = decode_command(&encoded).unwrap();
            assert_eq!(decoded, command);
        }
    }

    #[test]
    fn test_unnamed_class_listing_is_plain_list() {
        let command = QosCommand::ListClass {
            class_name: String::new(),
        };
        assert_eq!(encode_command(&command), encode_command(&QosCommand::List));
        assert_eq!(
            decode_command(&encode_command(&command)).unwrap(),
            QosCommand::List
        );
    }

    #[test]
    fn test_encoded_is_query_safe() {
        for command in all_commands() {
            let encoded = encode_command(&command);
            assert!(
                encoded
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || "%*-._".contains(c)),
                "unexpected character in {}",
                encoded
            );
        }
    }

    #[test]
    fn test_encoding_layers() {
        // Known request bytes for `qos list`, see messages::tests
        let expected_base64 =
            BASE64.encode([0x08, 0x01, 0xaa, 0x01, 0x02, 0x0a, 0x00, 0xf8, 0x01, 0x01]);
        assert_eq!(expected_base64, "CAGqAQIKAPgBAQ==");

        assert_eq!(encode_command(&QosCommand::List), "CAGqAQIKAPgBAQ%3D%3D");
    }

    #[test]
    fn test_request_is_json_and_uncolored() {
        for command in all_commands() {
            let request = command.to_request();
            assert_eq!(request.format(), request_proto::FormatType::Json);
            assert!(request.dont_color);
        }
    }

    #[test]
    fn test_set_command_fields() {
        let request = QosCommand::Set {
            path: "/eos/test/file".to_string(),
            class_name: "gold".to_string(),
        }
        .to_request();

        match request.command {
            Some(request_proto::Command::Qos(QoSProto {
                subcmd: Some(qos_proto::Subcmd::Set(set)),
            })) => {
                assert_eq!(set.classname, "gold");
                assert_eq!(
                    set.identifier,
                    Some(IdentifierProto::path("/eos/test/file"))
                );
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_command("%%%not-base64"),
            Err(EosClientError::Decoding(_))
        ));

        let empty_request = BASE64.encode(RequestProto::default().encode_to_vec());
        let encoded: String = form_urlencoded::byte_serialize(empty_request.as_bytes()).collect();
        assert!(matches!(
            decode_command(&encoded),
            Err(EosClientError::Decoding(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(QosCommand::List.to_string(), "qos list");
        assert_eq!(
            QosCommand::Set {
                path: "/eos/a".into(),
                class_name: "gold".into()
            }
            .to_string(),
            "qos set /eos/a gold"
        );
    }
}
