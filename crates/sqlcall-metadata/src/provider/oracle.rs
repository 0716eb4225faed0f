//! Oracle provider.

use sqlcall_types::{ParameterSpec, SqlType};

use crate::column::ProcedureColumn;
use crate::database::{DatabaseFamily, DatabaseInfo};

use super::{CallMetaDataProvider, with_column_type_name};

/// Provider for Oracle Database.
///
/// Result sets come back through `SYS_REFCURSOR` OUT parameters. A package
/// name is passed as the catalog; for metadata lookups an absent package is
/// the empty string, which Oracle uses for standalone procedures.
#[derive(Debug, Clone)]
pub struct OracleCallMetaDataProvider {
    info: DatabaseInfo,
    procedure_column_metadata_used: bool,
}

impl OracleCallMetaDataProvider {
    /// Create a provider with column metadata enabled.
    pub fn new(info: DatabaseInfo) -> Self {
        Self {
            info,
            procedure_column_metadata_used: true,
        }
    }

    /// Enable or disable the use of introspected procedure columns.
    #[must_use]
    pub fn with_procedure_column_metadata(mut self, used: bool) -> Self {
        self.procedure_column_metadata_used = used;
        self
    }
}

impl CallMetaDataProvider for OracleCallMetaDataProvider {
    fn family(&self) -> DatabaseFamily {
        DatabaseFamily::Oracle
    }

    fn database_info(&self) -> &DatabaseInfo {
        &self.info
    }

    fn is_procedure_column_metadata_used(&self) -> bool {
        self.procedure_column_metadata_used
    }

    fn metadata_catalog_name_to_use(&self, catalog: Option<&str>) -> Option<String> {
        Some(match catalog {
            Some(package) => self.identifier_name_to_use(package),
            None => String::new(),
        })
    }

    fn metadata_schema_name_to_use(&self, schema: Option<&str>) -> Option<String> {
        match schema {
            Some(schema) => Some(self.identifier_name_to_use(schema)),
            None => self.info.user_name.as_deref().map(str::to_uppercase),
        }
    }

    fn is_return_result_set_supported(&self) -> bool {
        false
    }

    fn is_ref_cursor_supported(&self) -> bool {
        true
    }

    fn ref_cursor_sql_type(&self) -> SqlType {
        SqlType::ORACLE_CURSOR
    }

    fn create_default_out_parameter(&self, name: &str, column: &ProcedureColumn) -> ParameterSpec {
        if column.sql_type == SqlType::ORACLE_CURSOR {
            ParameterSpec::output(name, SqlType::ORACLE_CURSOR)
        } else {
            with_column_type_name(ParameterSpec::output(name, column.sql_type), column)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ProcedureColumnKind;

    fn provider() -> OracleCallMetaDataProvider {
        OracleCallMetaDataProvider::new(
            DatabaseInfo::new("Oracle").user_name("scott").stores_upper_case(),
        )
    }

    #[test]
    fn test_lookup_defaults() {
        let p = provider();
        assert_eq!(p.metadata_schema_name_to_use(None), Some("SCOTT".into()));
        assert_eq!(p.metadata_schema_name_to_use(Some("hr")), Some("HR".into()));
        assert_eq!(p.metadata_catalog_name_to_use(None), Some(String::new()));
        assert_eq!(p.metadata_catalog_name_to_use(Some("pkg_users")), Some("PKG_USERS".into()));
    }

    #[test]
    fn test_cursor_out_column() {
        let p = provider();
        assert!(p.is_ref_cursor_supported());
        assert!(!p.is_return_result_set_supported());

        let column = ProcedureColumn::new("P_CUR", ProcedureColumnKind::Out, SqlType::ORACLE_CURSOR, 2);
        let spec = p.create_default_out_parameter("P_CUR", &column);
        assert_eq!(spec.sql_type(), SqlType::ORACLE_CURSOR);
        assert!(spec.is_output());
    }
}
