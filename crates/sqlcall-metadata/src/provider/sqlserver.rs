//! Transact-SQL providers: Microsoft SQL Server and Sybase ASE.
//!
//! Both report parameter names with their `@` prefix and expose the
//! procedure status code as an extra return column.

use crate::database::{DatabaseFamily, DatabaseInfo};

use super::{CallMetaDataProvider, strip_at_prefix};

const SQL_SERVER_RETURN_VALUE: &str = "@RETURN_VALUE";
const SYBASE_RETURN_VALUE: &str = "RETURN_VALUE";

/// Provider for Microsoft SQL Server.
#[derive(Debug, Clone)]
pub struct SqlServerCallMetaDataProvider {
    info: DatabaseInfo,
    procedure_column_metadata_used: bool,
}

impl SqlServerCallMetaDataProvider {
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

impl CallMetaDataProvider for SqlServerCallMetaDataProvider {
    fn family(&self) -> DatabaseFamily {
        DatabaseFamily::SqlServer
    }

    fn database_info(&self) -> &DatabaseInfo {
        &self.info
    }

    fn is_procedure_column_metadata_used(&self) -> bool {
        self.procedure_column_metadata_used
    }

    fn parameter_name_to_use(&self, name: &str) -> String {
        self.identifier_name_to_use(strip_at_prefix(name))
    }

    fn by_pass_return_parameter(&self, name: Option<&str>) -> bool {
        name == Some(SQL_SERVER_RETURN_VALUE)
    }
}

/// Provider for Sybase Adaptive Server Enterprise.
#[derive(Debug, Clone)]
pub struct SybaseCallMetaDataProvider {
    info: DatabaseInfo,
    procedure_column_metadata_used: bool,
}

impl SybaseCallMetaDataProvider {
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

impl CallMetaDataProvider for SybaseCallMetaDataProvider {
    fn family(&self) -> DatabaseFamily {
        DatabaseFamily::Sybase
    }

    fn database_info(&self) -> &DatabaseInfo {
        &self.info
    }

    fn is_procedure_column_metadata_used(&self) -> bool {
        self.procedure_column_metadata_used
    }

    fn parameter_name_to_use(&self, name: &str) -> String {
        self.identifier_name_to_use(strip_at_prefix(name))
    }

    fn by_pass_return_parameter(&self, name: Option<&str>) -> bool {
        name == Some(SYBASE_RETURN_VALUE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_server_strips_at_prefix() {
        let provider = SqlServerCallMetaDataProvider::new(DatabaseInfo::new("Microsoft SQL Server"));
        assert_eq!(provider.parameter_name_to_use("@UserName"), "UserName");
        assert_eq!(provider.parameter_name_to_use("@"), "@");
        assert_eq!(provider.parameter_name_to_use("plain"), "plain");
    }

    #[test]
    fn test_sql_server_bypasses_status_return() {
        let provider = SqlServerCallMetaDataProvider::new(DatabaseInfo::new("Microsoft SQL Server"));
        assert!(provider.by_pass_return_parameter(Some("@RETURN_VALUE")));
        assert!(!provider.by_pass_return_parameter(Some("RETURN_VALUE")));
        assert!(!provider.by_pass_return_parameter(None));
    }

    #[test]
    fn test_sybase_bypasses_unprefixed_return() {
        let provider = SybaseCallMetaDataProvider::new(DatabaseInfo::new("Adaptive Server Enterprise"));
        assert!(provider.by_pass_return_parameter(Some("RETURN_VALUE")));
        assert!(!provider.by_pass_return_parameter(Some("@RETURN_VALUE")));
        assert_eq!(provider.parameter_name_to_use("@id"), "id");
        assert_eq!(provider.family(), DatabaseFamily::Sybase);
    }
}
