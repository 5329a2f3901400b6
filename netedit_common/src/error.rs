use thiserror::Error;

/// Errors raised while parsing or compiling shared netedit values.
#[derive(Debug, Error)]
pub enum CommonError {
    /// A name pattern could not be compiled into a matcher.
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// An object reference string was malformed.
    #[error("Invalid object reference: {0}")]
    InvalidObjectRef(String),

    /// A pin or port endpoint string was malformed.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// A placement status string was not recognized.
    #[error("Unknown placement status: {0}")]
    UnknownStatus(String),

    /// The configuration file could not be read.
    #[error("Failed to read configuration: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// The configuration file was not valid JSON for `Config`.
    #[error("Failed to parse configuration: {0}")]
    ConfigJson(#[from] serde_json::Error),
}

impl CommonError {
    /// Create an invalid object reference error.
    pub fn invalid_object(msg: impl Into<String>) -> Self {
        Self::InvalidObjectRef(msg.into())
    }

    /// Create an invalid endpoint error.
    pub fn invalid_endpoint(msg: impl Into<String>) -> Self {
        Self::InvalidEndpoint(msg.into())
    }
}
