//! Introspected procedure columns.

use std::fmt;

use sqlcall_types::SqlType;

/// Kind of a procedure column as reported by database metadata.
///
/// The discriminants are the portable metadata codes used by ODBC and JDBC
/// drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i16)]
pub enum ProcedureColumnKind {
    /// Kind not reported by the driver.
    #[default]
    Unknown = 0,
    /// Input parameter.
    In = 1,
    /// Input/output parameter.
    InOut = 2,
    /// Result set column.
    Result = 3,
    /// Output parameter.
    Out = 4,
    /// Function or procedure return value.
    Return = 5,
}

impl ProcedureColumnKind {
    /// Create a kind from a metadata code; unknown codes map to `Unknown`.
    #[must_use]
    pub fn from_code(code: i16) -> Self {
        match code {
            1 => Self::In,
            2 => Self::InOut,
            3 => Self::Result,
            4 => Self::Out,
            5 => Self::Return,
            _ => Self::Unknown,
        }
    }

    /// Get the metadata code.
    #[must_use]
    pub fn code(self) -> i16 {
        self as i16
    }

    /// Check if this column is an OUT or INOUT parameter.
    #[must_use]
    pub fn is_out_or_in_out(self) -> bool {
        matches!(self, Self::Out | Self::InOut)
    }
}

/// A single introspected parameter of a procedure or function.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureColumn {
    /// Column name as reported (may carry a vendor prefix such as `@`).
    pub name: Option<String>,
    /// Column kind.
    pub kind: ProcedureColumnKind,
    /// SQL type code.
    pub sql_type: SqlType,
    /// Database type name (e.g. `refcursor`, `NVARCHAR`).
    pub type_name: Option<String>,
    /// Whether the column accepts NULL.
    pub nullable: bool,
    /// One-based position in the signature (0 for a return value).
    pub ordinal: u16,
}

impl ProcedureColumn {
    /// Create a new column.
    pub fn new(
        name: impl Into<String>,
        kind: ProcedureColumnKind,
        sql_type: SqlType,
        ordinal: u16,
    ) -> Self {
        Self {
            name: Some(name.into()),
            kind,
            sql_type,
            type_name: None,
            nullable: true,
            ordinal,
        }
    }

    /// Create an unnamed return value column at ordinal 0.
    pub fn unnamed_return(sql_type: SqlType) -> Self {
        Self {
            name: None,
            kind: ProcedureColumnKind::Return,
            sql_type,
            type_name: None,
            nullable: true,
            ordinal: 0,
        }
    }

    /// Set the database type name.
    #[must_use]
    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Set nullability.
    #[must_use]
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }
}

/// One introspected procedure or function signature.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProcedureSignature {
    /// Catalog (or Oracle package) the procedure belongs to.
    pub catalog: Option<String>,
    /// Schema the procedure belongs to.
    pub schema: Option<String>,
    /// Procedure name.
    pub name: String,
    /// Parameter columns.
    pub columns: Vec<ProcedureColumn>,
}

impl ProcedureSignature {
    /// Create an empty signature.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the catalog.
    #[must_use]
    pub fn in_catalog(mut self, catalog: impl Into<String>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    /// Set the schema.
    #[must_use]
    pub fn in_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Append a column.
    #[must_use]
    pub fn column(mut self, column: ProcedureColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Get `catalog.schema.name`, skipping absent or empty parts.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(3);
        for part in [self.catalog.as_deref(), self.schema.as_deref()]
            .into_iter()
            .flatten()
        {
            if !part.is_empty() {
                parts.push(part);
            }
        }
        parts.push(&self.name);
        parts.join(".")
    }

    /// Take the columns ordered by ordinal position.
    #[must_use]
    pub fn into_ordered_columns(self) -> Vec<ProcedureColumn> {
        let mut columns = self.columns;
        columns.sort_by_key(|c| c.ordinal);
        columns
    }
}

impl fmt::Display for ProcedureSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_codes() {
        assert_eq!(ProcedureColumnKind::from_code(5), ProcedureColumnKind::Return);
        assert_eq!(ProcedureColumnKind::from_code(42), ProcedureColumnKind::Unknown);
        assert_eq!(ProcedureColumnKind::Out.code(), 4);
        assert!(ProcedureColumnKind::InOut.is_out_or_in_out());
        assert!(!ProcedureColumnKind::Return.is_out_or_in_out());
    }

    #[test]
    fn test_qualified_name_skips_empty_parts() {
        let sig = ProcedureSignature::new("GETX").in_catalog("").in_schema("DBO");
        assert_eq!(sig.qualified_name(), "DBO.GETX");

        let sig = ProcedureSignature::new("P").in_catalog("PKG").in_schema("HR");
        assert_eq!(sig.to_string(), "PKG.HR.P");
    }

    #[test]
    fn test_columns_ordered_by_ordinal() {
        let sig = ProcedureSignature::new("P")
            .column(ProcedureColumn::new("b", ProcedureColumnKind::In, SqlType::INTEGER, 2))
            .column(ProcedureColumn::unnamed_return(SqlType::INTEGER))
            .column(ProcedureColumn::new("a", ProcedureColumnKind::In, SqlType::INTEGER, 1));

        let names: Vec<_> = sig
            .into_ordered_columns()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec![None, Some("a".into()), Some("b".into())]);
    }
}
