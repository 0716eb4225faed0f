//! Database identity as reported by the metadata source.

use std::fmt;

/// Database-level facts a provider needs to pick naming rules.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[non_exhaustive]
pub struct DatabaseInfo {
    /// Product name, e.g. `Microsoft SQL Server` or `PostgreSQL`.
    pub product_name: String,
    /// Product version string.
    pub product_version: Option<String>,
    /// User the metadata connection is logged in as.
    pub user_name: Option<String>,
    /// Whether unquoted identifiers are stored upper-case.
    pub stores_upper_case_identifiers: bool,
    /// Whether unquoted identifiers are stored lower-case.
    pub stores_lower_case_identifiers: bool,
    /// Whether a catalog qualifier may appear in a procedure call.
    pub supports_catalogs_in_procedure_calls: bool,
    /// Whether a schema qualifier may appear in a procedure call.
    pub supports_schemas_in_procedure_calls: bool,
}

impl DatabaseInfo {
    /// Create info for a product with mixed-case identifiers and full
    /// qualification support.
    pub fn new(product_name: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            product_version: None,
            user_name: None,
            stores_upper_case_identifiers: false,
            stores_lower_case_identifiers: false,
            supports_catalogs_in_procedure_calls: true,
            supports_schemas_in_procedure_calls: true,
        }
    }

    /// Set the product version.
    #[must_use]
    pub fn product_version(mut self, version: impl Into<String>) -> Self {
        self.product_version = Some(version.into());
        self
    }

    /// Set the connected user name.
    #[must_use]
    pub fn user_name(mut self, user: impl Into<String>) -> Self {
        self.user_name = Some(user.into());
        self
    }

    /// Mark identifiers as stored upper-case.
    #[must_use]
    pub fn stores_upper_case(mut self) -> Self {
        self.stores_upper_case_identifiers = true;
        self.stores_lower_case_identifiers = false;
        self
    }

    /// Mark identifiers as stored lower-case.
    #[must_use]
    pub fn stores_lower_case(mut self) -> Self {
        self.stores_lower_case_identifiers = true;
        self.stores_upper_case_identifiers = false;
        self
    }

    /// Set catalog/schema qualification support.
    #[must_use]
    pub fn qualification(mut self, catalogs: bool, schemas: bool) -> Self {
        self.supports_catalogs_in_procedure_calls = catalogs;
        self.supports_schemas_in_procedure_calls = schemas;
        self
    }

    /// Get the family this product belongs to.
    #[must_use]
    pub fn family(&self) -> DatabaseFamily {
        DatabaseFamily::from_product_name(&self.product_name)
    }
}

/// Database families with distinct call metadata behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum DatabaseFamily {
    /// Microsoft SQL Server.
    SqlServer,
    /// Sybase Adaptive Server Enterprise.
    Sybase,
    /// Oracle Database.
    Oracle,
    /// PostgreSQL.
    Postgres,
    /// MySQL.
    MySql,
    /// IBM DB2.
    Db2,
    /// Apache Derby.
    Derby,
    /// Any other product; column metadata is not used.
    Other,
}

impl DatabaseFamily {
    /// Resolve a family from a product name reported by the database.
    #[must_use]
    pub fn from_product_name(product_name: &str) -> Self {
        let name = product_name.trim();
        match name {
            "Microsoft SQL Server" => Self::SqlServer,
            "Sybase SQL Server" | "Adaptive Server Enterprise" | "ASE" | "sql server" => {
                Self::Sybase
            }
            "Oracle" => Self::Oracle,
            "PostgreSQL" => Self::Postgres,
            "MySQL" => Self::MySql,
            "Apache Derby" => Self::Derby,
            _ if name.starts_with("DB2") => Self::Db2,
            _ if name.starts_with("Sybase") => Self::Sybase,
            _ => Self::Other,
        }
    }

    /// Check if procedure column metadata can be used for procedures.
    #[must_use]
    pub fn supports_procedure_metadata(self) -> bool {
        !matches!(self, Self::Other)
    }

    /// Check if procedure column metadata can be used for functions.
    #[must_use]
    pub fn supports_function_metadata(self) -> bool {
        matches!(self, Self::SqlServer | Self::Oracle | Self::Postgres | Self::MySql)
    }

    /// Get the short system identifier used in logs and spans.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SqlServer => "mssql",
            Self::Sybase => "sybase",
            Self::Oracle => "oracle",
            Self::Postgres => "postgresql",
            Self::MySql => "mysql",
            Self::Db2 => "db2",
            Self::Derby => "derby",
            Self::Other => "other_sql",
        }
    }
}

impl fmt::Display for DatabaseFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_from_product_name() {
        assert_eq!(
            DatabaseFamily::from_product_name("Microsoft SQL Server"),
            DatabaseFamily::SqlServer
        );
        assert_eq!(
            DatabaseFamily::from_product_name("DB2/LINUXX8664"),
            DatabaseFamily::Db2
        );
        assert_eq!(
            DatabaseFamily::from_product_name("Adaptive Server Enterprise"),
            DatabaseFamily::Sybase
        );
        assert_eq!(DatabaseFamily::from_product_name("HSQL Database Engine"), DatabaseFamily::Other);
    }

    #[test]
    fn test_function_metadata_support() {
        assert!(DatabaseFamily::Postgres.supports_function_metadata());
        assert!(!DatabaseFamily::Derby.supports_function_metadata());
        assert!(DatabaseFamily::Derby.supports_procedure_metadata());
        assert!(!DatabaseFamily::Other.supports_procedure_metadata());
    }

    #[test]
    fn test_identifier_case_flags_are_exclusive() {
        let info = DatabaseInfo::new("Oracle").stores_lower_case().stores_upper_case();
        assert!(info.stores_upper_case_identifiers);
        assert!(!info.stores_lower_case_identifiers);
    }
}
