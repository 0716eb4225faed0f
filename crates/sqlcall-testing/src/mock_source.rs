//! In-memory metadata source.
//!
//! [`MockMetadataSource`] answers introspection requests from a fixed list of
//! [`ProcedureSignature`]s, filtering them exactly the way a live source
//! filters catalog rows.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use sqlcall_metadata::{
    DatabaseInfo, MetadataError, MetadataSource, ProcedureLookup, ProcedureSignature,
};

/// Builder for [`MockMetadataSource`].
#[derive(Debug)]
pub struct MockSourceBuilder {
    database_info: DatabaseInfo,
    signatures: Vec<ProcedureSignature>,
    failure: Option<String>,
    latency: Option<Duration>,
}

impl MockSourceBuilder {
    /// Create a builder reporting Microsoft SQL Server with no procedures.
    pub fn new() -> Self {
        Self {
            database_info: DatabaseInfo::new("Microsoft SQL Server"),
            signatures: Vec::new(),
            failure: None,
            latency: None,
        }
    }

    /// Set the database info returned by the source.
    #[must_use]
    pub fn with_database_info(mut self, info: DatabaseInfo) -> Self {
        self.database_info = info;
        self
    }

    /// Add a procedure signature.
    ///
    /// Adding two signatures with the same name simulates overloads.
    #[must_use]
    pub fn with_signature(mut self, signature: ProcedureSignature) -> Self {
        self.signatures.push(signature);
        self
    }

    /// Add several procedure signatures.
    #[must_use]
    pub fn with_signatures(mut self, signatures: impl IntoIterator<Item = ProcedureSignature>) -> Self {
        self.signatures.extend(signatures);
        self
    }

    /// Make every signature lookup fail with a source error.
    #[must_use]
    pub fn failing_with(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Delay every signature lookup.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Build the source.
    pub fn build(self) -> MockMetadataSource {
        MockMetadataSource {
            database_info: self.database_info,
            signatures: self.signatures,
            failure: self.failure,
            latency: self.latency,
            lookups: Mutex::new(Vec::new()),
        }
    }
}

impl Default for MockSourceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A metadata source backed by in-memory signatures.
pub struct MockMetadataSource {
    database_info: DatabaseInfo,
    signatures: Vec<ProcedureSignature>,
    failure: Option<String>,
    latency: Option<Duration>,
    lookups: Mutex<Vec<ProcedureLookup>>,
}

impl MockMetadataSource {
    /// Create a new builder for the mock source.
    pub fn builder() -> MockSourceBuilder {
        MockSourceBuilder::new()
    }

    /// Get the number of signature lookups received.
    #[must_use]
    pub fn lookup_count(&self) -> usize {
        self.lookups.lock().len()
    }

    /// Get a copy of every lookup received, oldest first.
    #[must_use]
    pub fn lookups(&self) -> Vec<ProcedureLookup> {
        self.lookups.lock().clone()
    }

    /// Forget recorded lookups.
    pub fn reset_lookups(&self) {
        self.lookups.lock().clear();
    }

    /// Get the configured signatures.
    #[must_use]
    pub fn signatures(&self) -> &[ProcedureSignature] {
        &self.signatures
    }
}

impl fmt::Debug for MockMetadataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockMetadataSource")
            .field("product", &self.database_info.product_name)
            .field("signatures", &self.signatures.len())
            .field("failing", &self.failure.is_some())
            .field("lookups", &self.lookup_count())
            .finish()
    }
}

#[async_trait]
impl MetadataSource for MockMetadataSource {
    async fn database_info(&self) -> Result<DatabaseInfo, MetadataError> {
        Ok(self.database_info.clone())
    }

    async fn procedure_signatures(
        &self,
        lookup: &ProcedureLookup,
    ) -> Result<Vec<ProcedureSignature>, MetadataError> {
        self.lookups.lock().push(lookup.clone());

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if let Some(message) = &self.failure {
            tracing::debug!(lookup = %lookup.qualified_name(), "mock source failing lookup");
            return Err(MetadataError::source_error(message.clone()));
        }

        Ok(self
            .signatures
            .iter()
            .filter(|signature| lookup.matches(signature))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[tokio::test]
    async fn test_filters_by_lookup() {
        let source = MockMetadataSource::builder()
            .with_signature(fixtures::sql_server_add_user())
            .with_signature(ProcedureSignature::new("other").in_schema("dbo"))
            .build();

        let mut lookup = ProcedureLookup::new("ADD_USER");
        lookup.schema = Some("dbo".into());
        let found = source.procedure_signatures(&lookup).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "add_user");
        assert_eq!(source.lookup_count(), 1);
        assert_eq!(source.lookups()[0], lookup);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let source = MockMetadataSource::builder()
            .failing_with("connection reset")
            .build();

        let err = source
            .procedure_signatures(&ProcedureLookup::new("anything"))
            .await
            .unwrap_err();
        assert!(err.is_source_error());
        assert!(err.to_string().contains("connection reset"));

        source.reset_lookups();
        assert_eq!(source.lookup_count(), 0);
    }
}
