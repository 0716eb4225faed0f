//! Metadata error types.

use thiserror::Error;

/// Errors that can occur while introspecting a procedure.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// No procedure or function matched the lookup.
    #[error("unable to determine the call signature: no procedure/function named {name} found")]
    ProcedureNotFound {
        /// Qualified name that was looked up.
        name: String,
    },

    /// More than one procedure, function or overload matched the lookup.
    #[error(
        "unable to determine the call signature: multiple procedures/functions/signatures for {name} found: {}",
        .found.join(", ")
    )]
    AmbiguousSignature {
        /// Qualified name that was looked up.
        name: String,
        /// Qualified names of the matching signatures.
        found: Vec<String>,
    },

    /// The metadata source itself failed (connectivity, permissions, ...).
    #[error("metadata source error: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl MetadataError {
    /// Wrap a failure reported by a metadata source.
    pub fn source_error<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Source(err.into())
    }

    /// Check if the error came from the metadata source rather than the lookup.
    #[must_use]
    pub fn is_source_error(&self) -> bool {
        matches!(self, Self::Source(_))
    }
}
