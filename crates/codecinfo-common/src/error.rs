//! Common error types for codecinfo.

use thiserror::Error;

/// Result type alias using codecinfo's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for codecinfo operations.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (reading a descriptor dump, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// The codec source could not be queried at all
    #[error("codec source unavailable: {0}")]
    SourceUnavailable(String),

    /// A single descriptor could not be inspected
    #[error("malformed descriptor: {0}")]
    MalformedDescriptor(String),

    /// Profile-level lookup for one mime-type failed
    #[error("capability lookup failed: {0}")]
    CapabilityLookup(String),

    /// The build was cancelled by its caller
    #[error("cancelled")]
    Cancelled,
}

impl Error {
    /// Create a serialization error from any displayable type.
    pub fn serialization(msg: impl std::fmt::Display) -> Self {
        Self::Serialization(msg.to_string())
    }

    /// Create a config error from any displayable type.
    pub fn config(msg: impl std::fmt::Display) -> Self {
        Self::Config(msg.to_string())
    }

    /// Create a source-unavailable error from any displayable type.
    pub fn source_unavailable(msg: impl std::fmt::Display) -> Self {
        Self::SourceUnavailable(msg.to_string())
    }

    /// Create a malformed-descriptor error from any displayable type.
    pub fn malformed(msg: impl std::fmt::Display) -> Self {
        Self::MalformedDescriptor(msg.to_string())
    }

    /// Create a capability-lookup error from any displayable type.
    pub fn capability_lookup(msg: impl std::fmt::Display) -> Self {
        Self::CapabilityLookup(msg.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helpers_format_message() {
        let err = Error::malformed("OMX.bad.decoder: no supported types");
        assert_eq!(
            err.to_string(),
            "malformed descriptor: OMX.bad.decoder: no supported types"
        );

        let err = Error::source_unavailable("codec list not reachable");
        assert_eq!(
            err.to_string(),
            "codec source unavailable: codec list not reachable"
        );
    }

    #[test]
    fn test_json_error_converts_to_serialization() {
        let json_err = serde_json::from_str::<u32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
