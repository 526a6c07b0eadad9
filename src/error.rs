//! Error types for the relay, one enum per pipeline stage.

/// Top-level error type for the relay.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Event error: {0}")]
    Event(#[from] EventError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Message error: {0}")]
    Message(#[from] MessageError),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors decoding the inbound event at the invocation boundary.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("No Records in event")]
    MissingRecords,

    #[error("Failed to decode event: {0}")]
    Decode(String),

    #[error("Malformed {source_kind} record: {reason}")]
    MalformedRecord { source_kind: String, reason: String },
}

/// Errors reading raw message bytes from the object store.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Store request for {bucket}/{key} failed: {reason}")]
    Request {
        bucket: String,
        key: String,
        reason: String,
    },

    #[error("Store returned {status} for {bucket}/{key}")]
    Status {
        bucket: String,
        key: String,
        status: u16,
    },
}

/// Errors parsing a raw message or decoding its body.
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("Failed to parse message")]
    Parse,

    #[error("Message body is not valid UTF-8: {0}")]
    BodyDecode(String),
}

/// Errors sending the forwarded message.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Invalid {field} address: {reason}")]
    InvalidAddress { field: String, reason: String },

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("Send failed: {0}")]
    Send(String),
}

/// Result type alias for the relay.
pub type Result<T> = std::result::Result<T, Error>;
