//! PostgreSQL provider.

use sqlcall_types::{ParameterSpec, SqlType};

use crate::column::ProcedureColumn;
use crate::database::{DatabaseFamily, DatabaseInfo};

use super::{CallMetaDataProvider, with_column_type_name};

const RETURN_VALUE: &str = "returnValue";
const DEFAULT_SCHEMA: &str = "public";
const REF_CURSOR_TYPE_NAME: &str = "refcursor";

/// Provider for PostgreSQL.
#[derive(Debug, Clone)]
pub struct PostgresCallMetaDataProvider {
    info: DatabaseInfo,
    procedure_column_metadata_used: bool,
}

impl PostgresCallMetaDataProvider {
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

impl CallMetaDataProvider for PostgresCallMetaDataProvider {
    fn family(&self) -> DatabaseFamily {
        DatabaseFamily::Postgres
    }

    fn database_info(&self) -> &DatabaseInfo {
        &self.info
    }

    fn is_procedure_column_metadata_used(&self) -> bool {
        self.procedure_column_metadata_used
    }

    fn metadata_schema_name_to_use(&self, schema: Option<&str>) -> Option<String> {
        Some(match schema {
            Some(schema) => self.identifier_name_to_use(schema),
            None => DEFAULT_SCHEMA.to_owned(),
        })
    }

    fn is_return_result_set_supported(&self) -> bool {
        false
    }

    fn is_ref_cursor_supported(&self) -> bool {
        true
    }

    fn ref_cursor_sql_type(&self) -> SqlType {
        SqlType::OTHER
    }

    fn by_pass_return_parameter(&self, name: Option<&str>) -> bool {
        name == Some(RETURN_VALUE)
    }

    fn create_default_out_parameter(&self, name: &str, column: &ProcedureColumn) -> ParameterSpec {
        let is_cursor = column
            .type_name
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case(REF_CURSOR_TYPE_NAME));
        if is_cursor {
            ParameterSpec::output(name, SqlType::OTHER).with_type_name(REF_CURSOR_TYPE_NAME)
        } else {
            with_column_type_name(ParameterSpec::output(name, column.sql_type), column)
        }
    }
}
