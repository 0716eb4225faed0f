//! The introspection collaborator.

use async_trait::async_trait;

use crate::column::{ProcedureColumn, ProcedureSignature};
use crate::database::DatabaseInfo;
use crate::error::MetadataError;
use crate::provider::CallMetaDataProvider;

/// Filter for a procedure column lookup.
///
/// Names are already normalized for the target database; `None` means "any".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcedureLookup {
    /// Catalog (or Oracle package) filter.
    pub catalog: Option<String>,
    /// Schema filter.
    pub schema: Option<String>,
    /// Procedure name.
    pub procedure_name: String,
}

impl ProcedureLookup {
    /// Create a lookup with no catalog or schema filter.
    pub fn new(procedure_name: impl Into<String>) -> Self {
        Self {
            catalog: None,
            schema: None,
            procedure_name: procedure_name.into(),
        }
    }

    /// Build the lookup for a call, applying the provider's metadata naming
    /// rules to each part.
    pub fn for_call(
        provider: &dyn CallMetaDataProvider,
        catalog: Option<&str>,
        schema: Option<&str>,
        procedure_name: &str,
    ) -> Self {
        Self {
            catalog: provider.metadata_catalog_name_to_use(catalog),
            schema: provider.metadata_schema_name_to_use(schema),
            procedure_name: provider.procedure_name_to_use(procedure_name),
        }
    }

    /// Check whether a signature satisfies this lookup.
    ///
    /// Name comparison ignores ASCII case; an empty catalog filter matches
    /// signatures with no catalog.
    #[must_use]
    pub fn matches(&self, signature: &ProcedureSignature) -> bool {
        fn part_matches(filter: Option<&str>, actual: Option<&str>) -> bool {
            match filter {
                None => true,
                Some("") => actual.is_none_or(str::is_empty),
                Some(f) => actual.is_some_and(|a| a.eq_ignore_ascii_case(f)),
            }
        }

        signature.name.eq_ignore_ascii_case(&self.procedure_name)
            && part_matches(self.catalog.as_deref(), signature.catalog.as_deref())
            && part_matches(self.schema.as_deref(), signature.schema.as_deref())
    }

    /// Get `catalog.schema.procedure`, skipping absent or empty parts.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        [self.catalog.as_deref(), self.schema.as_deref()]
            .into_iter()
            .flatten()
            .filter(|p| !p.is_empty())
            .chain(std::iter::once(self.procedure_name.as_str()))
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Source of database and procedure metadata.
///
/// Implemented over a live connection by driver integrations, and in memory
/// by `sqlcall-testing`.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Report the database product and identifier rules.
    async fn database_info(&self) -> Result<DatabaseInfo, MetadataError>;

    /// Return every procedure or function signature matching the lookup.
    ///
    /// Overloads are returned as separate signatures.
    async fn procedure_signatures(
        &self,
        lookup: &ProcedureLookup,
    ) -> Result<Vec<ProcedureSignature>, MetadataError>;
}

/// Fetch the columns of the single procedure matching `lookup`.
///
/// Fails with [`MetadataError::ProcedureNotFound`] when nothing matches and
/// [`MetadataError::AmbiguousSignature`] when more than one signature does.
/// Columns come back ordered by ordinal position.
pub async fn load_procedure_columns(
    source: &dyn MetadataSource,
    lookup: &ProcedureLookup,
) -> Result<Vec<ProcedureColumn>, MetadataError> {
    let mut signatures = source.procedure_signatures(lookup).await?;

    match signatures.len() {
        0 => Err(MetadataError::ProcedureNotFound {
            name: lookup.qualified_name(),
        }),
        1 => {
            let signature = signatures.remove(0);
            tracing::debug!(
                procedure = %signature,
                columns = signature.columns.len(),
                "loaded procedure column metadata"
            );
            Ok(signature.into_ordered_columns())
        }
        _ => Err(MetadataError::AmbiguousSignature {
            name: lookup.qualified_name(),
            found: signatures.iter().map(ProcedureSignature::qualified_name).collect(),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::column::ProcedureColumnKind;
    use crate::provider::OracleCallMetaDataProvider;
    use sqlcall_types::SqlType;

    struct FixedSource(Vec<ProcedureSignature>);

    #[async_trait]
    impl MetadataSource for FixedSource {
        async fn database_info(&self) -> Result<DatabaseInfo, MetadataError> {
            Ok(DatabaseInfo::new("MySQL"))
        }

        async fn procedure_signatures(
            &self,
            lookup: &ProcedureLookup,
        ) -> Result<Vec<ProcedureSignature>, MetadataError> {
            Ok(self.0.iter().filter(|s| lookup.matches(s)).cloned().collect())
        }
    }

    fn signature(schema: &str) -> ProcedureSignature {
        ProcedureSignature::new("add_user")
            .in_schema(schema)
            .column(ProcedureColumn::new("age", ProcedureColumnKind::In, SqlType::INTEGER, 2))
            .column(ProcedureColumn::new("name", ProcedureColumnKind::In, SqlType::VARCHAR, 1))
    }

    #[tokio::test]
    async fn test_single_match_orders_columns() {
        let source = FixedSource(vec![signature("app")]);
        let columns = load_procedure_columns(&source, &ProcedureLookup::new("ADD_USER"))
            .await
            .unwrap();
        let names: Vec<_> = columns.iter().filter_map(|c| c.name.as_deref()).collect();
        assert_eq!(names, ["name", "age"]);
    }

    #[tokio::test]
    async fn test_no_match() {
        let source = FixedSource(vec![]);
        let err = load_procedure_columns(&source, &ProcedureLookup::new("missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, MetadataError::ProcedureNotFound { ref name } if name == "missing"));
    }

    #[tokio::test]
    async fn test_ambiguous_match() {
        let source = FixedSource(vec![signature("app"), signature("audit")]);
        let err = load_procedure_columns(&source, &ProcedureLookup::new("add_user"))
            .await
            .unwrap_err();
        match err {
            MetadataError::AmbiguousSignature { found, .. } => {
                assert_eq!(found, ["app.add_user", "audit.add_user"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_lookup_for_oracle_call() {
        let provider = OracleCallMetaDataProvider::new(
            DatabaseInfo::new("Oracle").user_name("scott").stores_upper_case(),
        );
        let lookup = ProcedureLookup::for_call(&provider, None, None, "get_user");
        assert_eq!(lookup.catalog.as_deref(), Some(""));
        assert_eq!(lookup.schema.as_deref(), Some("SCOTT"));
        assert_eq!(lookup.procedure_name, "GET_USER");
        assert_eq!(lookup.qualified_name(), "SCOTT.GET_USER");

        let standalone = ProcedureSignature::new("GET_USER").in_schema("SCOTT");
        let packaged = ProcedureSignature::new("GET_USER").in_catalog("PKG").in_schema("SCOTT");
        assert!(lookup.matches(&standalone));
        assert!(!lookup.matches(&packaged));
    }
}
