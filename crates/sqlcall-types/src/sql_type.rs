//! SQL type codes.
//!
//! Database metadata reports parameter types as integer codes. The codes used
//! here are the portable ones shared by ODBC and JDBC drivers, plus the few
//! vendor-specific codes needed for cursor parameters.

use std::fmt;

/// An integer SQL type code as reported by procedure column metadata.
///
/// Unknown codes are preserved as-is so vendor types round-trip through
/// reconciliation untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SqlType(i32);

impl SqlType {
    /// BIT.
    pub const BIT: Self = Self(-7);
    /// TINYINT.
    pub const TINYINT: Self = Self(-6);
    /// SMALLINT.
    pub const SMALLINT: Self = Self(5);
    /// INTEGER.
    pub const INTEGER: Self = Self(4);
    /// BIGINT.
    pub const BIGINT: Self = Self(-5);
    /// FLOAT.
    pub const FLOAT: Self = Self(6);
    /// REAL.
    pub const REAL: Self = Self(7);
    /// DOUBLE.
    pub const DOUBLE: Self = Self(8);
    /// NUMERIC.
    pub const NUMERIC: Self = Self(2);
    /// DECIMAL.
    pub const DECIMAL: Self = Self(3);
    /// CHAR.
    pub const CHAR: Self = Self(1);
    /// VARCHAR.
    pub const VARCHAR: Self = Self(12);
    /// LONGVARCHAR.
    pub const LONGVARCHAR: Self = Self(-1);
    /// NCHAR.
    pub const NCHAR: Self = Self(-15);
    /// NVARCHAR.
    pub const NVARCHAR: Self = Self(-9);
    /// DATE.
    pub const DATE: Self = Self(91);
    /// TIME.
    pub const TIME: Self = Self(92);
    /// TIMESTAMP.
    pub const TIMESTAMP: Self = Self(93);
    /// TIMESTAMP WITH TIME ZONE.
    pub const TIMESTAMP_WITH_TIMEZONE: Self = Self(2014);
    /// BINARY.
    pub const BINARY: Self = Self(-2);
    /// VARBINARY.
    pub const VARBINARY: Self = Self(-3);
    /// LONGVARBINARY.
    pub const LONGVARBINARY: Self = Self(-4);
    /// NULL.
    pub const NULL: Self = Self(0);
    /// Vendor-specific type (PostgreSQL reports `refcursor` with this code).
    pub const OTHER: Self = Self(1111);
    /// BOOLEAN.
    pub const BOOLEAN: Self = Self(16);
    /// BLOB.
    pub const BLOB: Self = Self(2004);
    /// CLOB.
    pub const CLOB: Self = Self(2005);
    /// SQLXML.
    pub const SQLXML: Self = Self(2009);
    /// Standard REF CURSOR.
    pub const REF_CURSOR: Self = Self(2012);
    /// Oracle cursor type used for `SYS_REFCURSOR` parameters.
    pub const ORACLE_CURSOR: Self = Self(-10);

    /// Create a type from its integer code.
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        Self(code)
    }

    /// Get the integer code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self.0
    }

    /// Get the conventional name of the type, if the code is known.
    #[must_use]
    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Self::BIT => "BIT",
            Self::TINYINT => "TINYINT",
            Self::SMALLINT => "SMALLINT",
            Self::INTEGER => "INTEGER",
            Self::BIGINT => "BIGINT",
            Self::FLOAT => "FLOAT",
            Self::REAL => "REAL",
            Self::DOUBLE => "DOUBLE",
            Self::NUMERIC => "NUMERIC",
            Self::DECIMAL => "DECIMAL",
            Self::CHAR => "CHAR",
            Self::VARCHAR => "VARCHAR",
            Self::LONGVARCHAR => "LONGVARCHAR",
            Self::NCHAR => "NCHAR",
            Self::NVARCHAR => "NVARCHAR",
            Self::DATE => "DATE",
            Self::TIME => "TIME",
            Self::TIMESTAMP => "TIMESTAMP",
            Self::TIMESTAMP_WITH_TIMEZONE => "TIMESTAMP_WITH_TIMEZONE",
            Self::BINARY => "BINARY",
            Self::VARBINARY => "VARBINARY",
            Self::LONGVARBINARY => "LONGVARBINARY",
            Self::NULL => "NULL",
            Self::OTHER => "OTHER",
            Self::BOOLEAN => "BOOLEAN",
            Self::BLOB => "BLOB",
            Self::CLOB => "CLOB",
            Self::SQLXML => "SQLXML",
            Self::REF_CURSOR => "REF_CURSOR",
            Self::ORACLE_CURSOR => "CURSOR",
            _ => return None,
        };
        Some(name)
    }

    /// Check if this is a character type.
    #[must_use]
    pub fn is_character(self) -> bool {
        matches!(
            self,
            Self::CHAR | Self::VARCHAR | Self::LONGVARCHAR | Self::NCHAR | Self::NVARCHAR | Self::CLOB
        )
    }

    /// Check if this is an exact or approximate numeric type.
    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::TINYINT
                | Self::SMALLINT
                | Self::INTEGER
                | Self::BIGINT
                | Self::FLOAT
                | Self::REAL
                | Self::DOUBLE
                | Self::NUMERIC
                | Self::DECIMAL
        )
    }

    /// Check if this code denotes a cursor that yields a result set.
    #[must_use]
    pub fn is_cursor(self) -> bool {
        matches!(self, Self::REF_CURSOR | Self::ORACLE_CURSOR)
    }
}

impl Default for SqlType {
    fn default() -> Self {
        Self::OTHER
    }
}

impl From<i32> for SqlType {
    fn from(code: i32) -> Self {
        Self(code)
    }
}

impl From<SqlType> for i32 {
    fn from(ty: SqlType) -> Self {
        ty.0
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "SQLTYPE({})", self.0),
        }
    }
}
