//! Error types for EosClient

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EosClientError>;

#[derive(Debug, Error)]
pub enum EosClientError {
    #[error("Configuration error: {0}")]
    Config(#[from] eosconfig::ConfigError),

    #[error("Transport error: {0}")]
    Transport(String),

    /// Error reported by the MGM, either through the `mgm.proc.stderr`
    /// envelope field or an HTTP error body. Carries the message verbatim.
    #[error("Server responded with error message -- {0}")]
    Protocol(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Decoding error: {0}")]
    Decoding(String),

    #[error("Failed {operation} {url} -- {source}")]
    Command {
        operation: String,
        url: String,
        #[source]
        source: Box<EosClientError>,
    },
}

impl EosClientError {
    /// Attach the operation and target URL to an error
    pub fn in_command(self, operation: impl Into<String>, url: impl Into<String>) -> Self {
        EosClientError::Command {
            operation: operation.into(),
            url: url.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with all `Command` context layers removed
    pub fn root_cause(&self) -> &EosClientError {
        let mut err = self;
        while let EosClientError::Command { source, .. } = err {
            err = source;
        }
        err
    }

    pub fn is_invalid_operation(&self) -> bool {
        matches!(self.root_cause(), EosClientError::InvalidOperation(_))
    }

    pub fn is_protocol(&self) -> bool {
        matches!(self.root_cause(), EosClientError::Protocol(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self.root_cause(), EosClientError::Transport(_))
    }

    pub fn is_malformed_response(&self) -> bool {
        matches!(self.root_cause(), EosClientError::MalformedResponse(_))
    }
}

impl From<reqwest::Error> for EosClientError {
    fn from(e: reqwest::Error) -> Self {
        EosClientError::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for EosClientError {
    fn from(e: serde_json::Error) -> Self {
        EosClientError::MalformedResponse(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_context_message() {
        let err = EosClientError::Transport("connection refused".into())
            .in_command("GET", "http://eos:8000/proc/user/?mgm.cmd.proto=abc");

        assert_eq!(
            err.to_string(),
            "Failed GET http://eos:8000/proc/user/?mgm.cmd.proto=abc -- Transport error: connection refused"
        );
        assert!(err.is_transport());
    }

    #[test]
    fn test_root_cause_unwraps_nested_context() {
        let err = EosClientError::InvalidOperation("is a directory".into())
            .in_command("GET", "http://eos/a")
            .in_command("status", "/eos/dir");

        assert!(err.is_invalid_operation());
        assert!(!err.is_protocol());
        assert!(matches!(
            err.root_cause(),
            EosClientError::InvalidOperation(msg) if msg == "is a directory"
        ));
    }
}
