//! Provider selection.

use std::sync::Arc;

use crate::database::{DatabaseFamily, DatabaseInfo};
use crate::provider::{
    CallMetaDataProvider, DerbyCallMetaDataProvider, GenericCallMetaDataProvider,
    OracleCallMetaDataProvider, PostgresCallMetaDataProvider, SqlServerCallMetaDataProvider,
    SybaseCallMetaDataProvider,
};

/// Build the provider for a database.
///
/// Column metadata is used only when `access_metadata` is set and the
/// database family can report columns for the call kind (`is_function`).
/// An unsupported combination falls back to declared parameters and logs a
/// warning.
pub fn create_provider(
    info: DatabaseInfo,
    is_function: bool,
    access_metadata: bool,
) -> Arc<dyn CallMetaDataProvider> {
    let family = info.family();
    let supported = if is_function {
        family.supports_function_metadata()
    } else {
        family.supports_procedure_metadata()
    };

    if access_metadata && !supported {
        tracing::warn!(
            product = %info.product_name,
            kind = if is_function { "function" } else { "procedure" },
            "column metadata lookup is not supported for this database; \
             using declared parameters only"
        );
    }
    let used = access_metadata && supported;

    tracing::debug!(
        db.system = family.as_str(),
        procedure_column_metadata_used = used,
        "using call metadata provider"
    );

    match family {
        DatabaseFamily::SqlServer => Arc::new(
            SqlServerCallMetaDataProvider::new(info).with_procedure_column_metadata(used),
        ),
        DatabaseFamily::Sybase => {
            Arc::new(SybaseCallMetaDataProvider::new(info).with_procedure_column_metadata(used))
        }
        DatabaseFamily::Oracle => {
            Arc::new(OracleCallMetaDataProvider::new(info).with_procedure_column_metadata(used))
        }
        DatabaseFamily::Postgres => Arc::new(
            PostgresCallMetaDataProvider::new(info).with_procedure_column_metadata(used),
        ),
        DatabaseFamily::Derby => {
            Arc::new(DerbyCallMetaDataProvider::new(info).with_procedure_column_metadata(used))
        }
        DatabaseFamily::MySql | DatabaseFamily::Db2 | DatabaseFamily::Other => {
            Arc::new(GenericCallMetaDataProvider::new(info).with_procedure_column_metadata(used))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selects_provider_by_family() {
        let p = create_provider(DatabaseInfo::new("PostgreSQL"), true, true);
        assert_eq!(p.family(), DatabaseFamily::Postgres);
        assert!(p.is_procedure_column_metadata_used());

        let p = create_provider(DatabaseInfo::new("DB2/LINUXX8664"), false, true);
        assert_eq!(p.family(), DatabaseFamily::Db2);
        assert!(p.is_procedure_column_metadata_used());
    }

    #[test]
    fn test_function_metadata_unsupported() {
        let p = create_provider(DatabaseInfo::new("Apache Derby"), true, true);
        assert_eq!(p.family(), DatabaseFamily::Derby);
        assert!(!p.is_procedure_column_metadata_used());

        let p = create_provider(DatabaseInfo::new("Adaptive Server Enterprise"), true, true);
        assert!(!p.is_procedure_column_metadata_used());
    }

    #[test]
    fn test_unknown_product_never_uses_metadata() {
        let p = create_provider(DatabaseInfo::new("H2"), false, true);
        assert_eq!(p.family(), DatabaseFamily::Other);
        assert!(!p.is_procedure_column_metadata_used());
    }

    #[test]
    fn test_access_disabled_by_caller() {
        let p = create_provider(DatabaseInfo::new("Microsoft SQL Server"), false, false);
        assert!(!p.is_procedure_column_metadata_used());
        assert_eq!(p.parameter_name_to_use("@id"), "id");
    }
}
