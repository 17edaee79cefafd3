//! EOS console protocol messages
//!
//! Protobuf definitions for the subset of the MGM console protocol used to
//! drive QoS commands. Field tags follow `ConsoleRequest.proto` and
//! `QoS.proto` from the EOS source tree; only the `qos` branch of the
//! request `command` oneof is modelled.

/// Top-level console request
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RequestProto {
    #[prost(enumeration = "request_proto::FormatType", tag = "1")]
    pub format: i32,
    #[prost(oneof = "request_proto::Command", tags = "21")]
    pub command: ::core::option::Option<request_proto::Command>,
    #[prost(string, tag = "30")]
    pub comment: ::prost::alloc::string::String,
    /// Ask the MGM not to emit ANSI color codes
    #[prost(bool, tag = "31")]
    pub dont_color: bool,
}

/// Nested message and enum types in `RequestProto`.
pub mod request_proto {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum FormatType {
        Default = 0,
        Json = 1,
        Http = 2,
        Fuse = 3,
    }

    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Command {
        #[prost(message, tag = "21")]
        Qos(super::QoSProto),
    }
}

/// `qos` console command
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QoSProto {
    #[prost(oneof = "qos_proto::Subcmd", tags = "1, 2, 3")]
    pub subcmd: ::core::option::Option<qos_proto::Subcmd>,
}

/// Nested message and enum types in `QoSProto`.
pub mod qos_proto {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct IdentifierProto {
        #[prost(oneof = "identifier_proto::Identifier", tags = "1, 2, 3")]
        pub identifier: ::core::option::Option<identifier_proto::Identifier>,
    }

    /// Nested message and enum types in `IdentifierProto`.
    pub mod identifier_proto {
        #[derive(Clone, PartialEq, ::prost::Oneof)]
        pub enum Identifier {
            #[prost(fixed64, tag = "1")]
            FileId(u64),
            #[prost(fixed64, tag = "2")]
            ContainerId(u64),
            #[prost(string, tag = "3")]
            Path(::prost::alloc::string::String),
        }
    }

    /// `qos list [<class>]`; an empty class name lists every class
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ListProto {
        #[prost(string, tag = "1")]
        pub classname: ::prost::alloc::string::String,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct GetProto {
        #[prost(message, optional, tag = "1")]
        pub identifier: ::core::option::Option<IdentifierProto>,
        #[prost(string, repeated, tag = "2")]
        pub key: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct SetProto {
        #[prost(message, optional, tag = "1")]
        pub identifier: ::core::option::Option<IdentifierProto>,
        #[prost(string, tag = "2")]
        pub classname: ::prost::alloc::string::String,
    }

    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Subcmd {
        #[prost(message, tag = "1")]
        List(ListProto),
        #[prost(message, tag = "2")]
        Get(GetProto),
        #[prost(message, tag = "3")]
        Set(SetProto),
    }
}

impl qos_proto::IdentifierProto {
    pub fn path(path: impl Into<String>) -> Self {
        Self {
            identifier: Some(qos_proto::identifier_proto::Identifier::Path(path.into())),
        }
    }
}

impl RequestProto {
    /// Wrap a QoS command in a JSON-formatted, uncolored console request
    pub fn qos(qos: QoSProto) -> Self {
        Self {
            format: request_proto::FormatType::Json as i32,
            command: Some(request_proto::Command::Qos(qos)),
            comment: String::new(),
            dont_color: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_qos_request_defaults() {
        let request = RequestProto::qos(QoSProto {
            subcmd: Some(qos_proto::Subcmd::List(qos_proto::ListProto::default())),
        });

        assert_eq!(request.format(), request_proto::FormatType::Json);
        assert!(request.dont_color);
        assert!(request.comment.is_empty());
    }

    #[test]
    fn test_request_encode_decode() {
        let request = RequestProto::qos(QoSProto {
            subcmd: Some(qos_proto::Subcmd::Set(qos_proto::SetProto {
                identifier: Some(qos_proto::IdentifierProto::path("/eos/test/file")),
                classname: "gold".to_string(),
            })),
        });

        let encoded = request.encode_to_vec();
        let decoded = RequestProto::decode(encoded.as_slice()).unwrap();

        assert_eq!(decoded, request);
    }

    #[test]
    fn test_wire_tags() {
        // format=JSON (field 1, varint), qos (field 21, length-delimited)
        // holding an empty list subcommand, DontColor (field 31, varint).
        let request = RequestProto::qos(QoSProto {
            subcmd: Some(qos_proto::Subcmd::List(qos_proto::ListProto::default())),
        });

        let encoded = request.encode_to_vec();
        assert_eq!(
            encoded,
            vec![0x08, 0x01, 0xaa, 0x01, 0x02, 0x0a, 0x00, 0xf8, 0x01, 0x01]
        );
    }
}
