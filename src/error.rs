use std::time::Duration;
use thiserror::Error;

/// Startup failure: the endpoint binding or gateway configuration is unusable.
/// The process refuses to serve when one of these is raised.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed interface description: {0}")]
    MalformedInterface(String),

    #[error("interface description is missing operation `{0}`")]
    MissingOperation(&'static str),

    #[error("operation `{name}` expects parameters ({expected}), interface declares ({found})")]
    SignatureMismatch {
        name: &'static str,
        expected: String,
        found: String,
    },

    #[error("operation `{0}` is declared with the wrong state mutability")]
    WrongMutability(&'static str),

    #[error("invalid contract address `{0}`")]
    InvalidAddress(String),

    #[error("invalid value for {key}: {reason}")]
    InvalidSetting { key: &'static str, reason: String },

    #[error("failed to read interface description {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Failure of a single remote call against the ledger node.
#[derive(Debug, Clone, Error)]
pub enum CallError {
    /// The node answered with a JSON-RPC error object: a revert or a request it refused.
    #[error("{message}")]
    Rejected {
        code: i64,
        message: String,
        data: Option<Vec<u8>>,
    },

    /// No usable answer came back from the node.
    #[error("{0}")]
    Transport(String),

    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
}
