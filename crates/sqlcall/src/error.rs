//! Call preparation error types.

use sqlcall_metadata::MetadataError;
use sqlcall_types::TypeError;
use thiserror::Error;

/// Errors that can occur while preparing or matching a call.
#[derive(Debug, Error)]
pub enum Error {
    /// The call definition cannot be satisfied. Retrying will not help.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A procedure, catalog or schema name is not a valid identifier.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Introspection failed.
    #[error("metadata error: {0}")]
    Metadata(#[from] MetadataError),

    /// An argument value could not be read or converted.
    #[error("type error: {0}")]
    Type(#[from] TypeError),
}

impl Error {
    /// Check if the call definition itself is at fault.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::InvalidIdentifier(_))
    }

    /// Check if the error came from introspection.
    #[must_use]
    pub fn is_metadata_error(&self) -> bool {
        matches!(self, Self::Metadata(_))
    }

    /// Check if the error may succeed on retry.
    ///
    /// Only failures of the metadata source itself qualify; a missing or
    /// ambiguous procedure will not appear by retrying.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Metadata(e) if e.is_source_error())
    }
}

/// Result type for call operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let err = Error::Configuration("no return parameter".into());
        assert!(err.is_configuration_error());
        assert!(!err.is_transient());

        let err = Error::from(MetadataError::source_error("timeout"));
        assert!(err.is_metadata_error());
        assert!(err.is_transient());

        let err = Error::from(MetadataError::ProcedureNotFound { name: "X".into() });
        assert!(!err.is_transient());
    }
}
