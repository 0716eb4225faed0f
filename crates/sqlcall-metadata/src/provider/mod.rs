//! Per-database call metadata policies.
//!
//! A [`CallMetaDataProvider`] answers the naming and typing questions the
//! reconciler asks while merging declared and introspected parameters:
//! how to normalize a name, whether a return column can be skipped, and
//! what parameter to synthesize for a column nobody declared.
//!
//! Most behavior is shared and lives in the trait's provided methods, driven
//! by the [`DatabaseInfo`] flags. Providers override only their quirks.

mod derby;
mod generic;
mod oracle;
mod postgres;
mod sqlserver;

use std::fmt;

use sqlcall_types::{ParameterSpec, SqlType};

use crate::column::ProcedureColumn;
use crate::database::{DatabaseFamily, DatabaseInfo};

pub use derby::DerbyCallMetaDataProvider;
pub use generic::GenericCallMetaDataProvider;
pub use oracle::OracleCallMetaDataProvider;
pub use postgres::PostgresCallMetaDataProvider;
pub use sqlserver::{SqlServerCallMetaDataProvider, SybaseCallMetaDataProvider};

/// Policy object describing how one database family names and types call
/// parameters.
///
/// Providers are immutable once built and shared behind an `Arc`.
pub trait CallMetaDataProvider: Send + Sync + fmt::Debug {
    /// Get the database family this provider serves.
    fn family(&self) -> DatabaseFamily;

    /// Get the database facts the provider was built from.
    fn database_info(&self) -> &DatabaseInfo;

    /// Check if introspected procedure columns should drive reconciliation.
    ///
    /// `false` when metadata access was turned off for the call or the
    /// family cannot report columns for the call kind.
    fn is_procedure_column_metadata_used(&self) -> bool;

    /// Apply the database's identifier case rules to a name.
    fn identifier_name_to_use(&self, name: &str) -> String {
        let info = self.database_info();
        if info.stores_upper_case_identifiers {
            name.to_uppercase()
        } else if info.stores_lower_case_identifiers {
            name.to_lowercase()
        } else {
            name.to_owned()
        }
    }

    /// Normalize a parameter name reported by, or declared for, this database.
    fn parameter_name_to_use(&self, name: &str) -> String {
        self.identifier_name_to_use(name)
    }

    /// Get the catalog qualifier to place in the call string.
    fn catalog_name_to_use(&self, catalog: Option<&str>) -> Option<String> {
        if !self.database_info().supports_catalogs_in_procedure_calls {
            return None;
        }
        catalog.map(|c| self.identifier_name_to_use(c))
    }

    /// Get the schema qualifier to place in the call string.
    fn schema_name_to_use(&self, schema: Option<&str>) -> Option<String> {
        if !self.database_info().supports_schemas_in_procedure_calls {
            return None;
        }
        schema.map(|s| self.identifier_name_to_use(s))
    }

    /// Get the procedure name to place in the call string.
    fn procedure_name_to_use(&self, procedure: &str) -> String {
        self.identifier_name_to_use(procedure)
    }

    /// Get the catalog to filter on when looking up procedure columns.
    fn metadata_catalog_name_to_use(&self, catalog: Option<&str>) -> Option<String> {
        self.catalog_name_to_use(catalog)
    }

    /// Get the schema to filter on when looking up procedure columns.
    fn metadata_schema_name_to_use(&self, schema: Option<&str>) -> Option<String> {
        self.schema_name_to_use(schema)
    }

    /// Check if procedures hand back result sets without a placeholder.
    fn is_return_result_set_supported(&self) -> bool {
        true
    }

    /// Check if result sets come back through ref cursor OUT parameters.
    fn is_ref_cursor_supported(&self) -> bool {
        false
    }

    /// Get the SQL type used to register ref cursor OUT parameters.
    fn ref_cursor_sql_type(&self) -> SqlType {
        SqlType::OTHER
    }

    /// Check if an introspected return column can be left out of the call.
    fn by_pass_return_parameter(&self, _name: Option<&str>) -> bool {
        false
    }

    /// Synthesize an IN parameter for an undeclared column.
    fn create_default_in_parameter(&self, name: &str, column: &ProcedureColumn) -> ParameterSpec {
        with_column_type_name(ParameterSpec::input(name, column.sql_type), column)
    }

    /// Synthesize an OUT parameter for an undeclared column.
    fn create_default_out_parameter(&self, name: &str, column: &ProcedureColumn) -> ParameterSpec {
        with_column_type_name(ParameterSpec::output(name, column.sql_type), column)
    }

    /// Synthesize an INOUT parameter for an undeclared column.
    fn create_default_in_out_parameter(
        &self,
        name: &str,
        column: &ProcedureColumn,
    ) -> ParameterSpec {
        with_column_type_name(ParameterSpec::in_out(name, column.sql_type), column)
    }
}

fn with_column_type_name(spec: ParameterSpec, column: &ProcedureColumn) -> ParameterSpec {
    match &column.type_name {
        Some(type_name) => spec.with_type_name(type_name.as_str()),
        None => spec,
    }
}

/// Strip a leading `@` from a parameter name, as Transact-SQL dialects
/// report it. A lone `@` is kept.
pub(crate) fn strip_at_prefix(name: &str) -> &str {
    match name.strip_prefix('@') {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => name,
    }
}
