//! Declared call parameters.
//!
//! A [`ParameterSpec`] describes one argument of a stored-procedure or
//! function call: its name, direction and SQL type, and optionally a
//! [`RowMapper`] for parameters that yield rows (returned result sets and
//! cursor OUT parameters).
//!
//! ## Example
//!
//! ```rust
//! use sqlcall_types::{ParameterDirection, ParameterSpec, SqlType, SqlValue};
//!
//! let name = ParameterSpec::input("name", SqlType::VARCHAR);
//! let id = ParameterSpec::output("id", SqlType::INTEGER);
//! let users = ParameterSpec::result_set("users", |row: &[SqlValue], _n: usize| {
//!     Ok(row[0].clone())
//! });
//!
//! assert!(name.is_input());
//! assert!(id.is_output());
//! assert_eq!(users.direction(), ParameterDirection::ResultSet);
//! ```

use std::fmt;
use std::sync::Arc;

use crate::error::TypeError;
use crate::sql_type::SqlType;
use crate::value::SqlValue;

/// Direction of a call parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParameterDirection {
    /// Value is passed to the procedure.
    #[default]
    In,
    /// Value is produced by the procedure.
    Out,
    /// Value is passed in and may be modified.
    InOut,
    /// Function return value.
    Return,
    /// Result set returned by the procedure without a placeholder.
    ResultSet,
}

impl ParameterDirection {
    /// Check if a value is bound for this direction.
    #[must_use]
    pub fn is_input(self) -> bool {
        matches!(self, Self::In | Self::InOut)
    }

    /// Check if a value is registered for output extraction.
    #[must_use]
    pub fn is_output(self) -> bool {
        matches!(self, Self::Out | Self::InOut | Self::Return)
    }

    /// Get the direction keyword used in log output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::In => "IN",
            Self::Out => "OUT",
            Self::InOut => "INOUT",
            Self::Return => "RETURN",
            Self::ResultSet => "RESULT_SET",
        }
    }
}

impl fmt::Display for ParameterDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps one row of a returned result set or cursor to a value.
///
/// Implemented for any `Fn(&[SqlValue], usize) -> Result<SqlValue, TypeError>`
/// closure that is `Send + Sync`, so compiled calls holding mappers can be
/// shared across threads.
pub trait RowMapper: Send + Sync {
    /// Map the row at `row_num` (zero-based).
    fn map_row(&self, row: &[SqlValue], row_num: usize) -> Result<SqlValue, TypeError>;
}

impl<F> RowMapper for F
where
    F: Fn(&[SqlValue], usize) -> Result<SqlValue, TypeError> + Send + Sync,
{
    fn map_row(&self, row: &[SqlValue], row_num: usize) -> Result<SqlValue, TypeError> {
        self(row, row_num)
    }
}

/// A call parameter declaration.
#[derive(Clone)]
pub struct ParameterSpec {
    name: Option<String>,
    direction: ParameterDirection,
    sql_type: SqlType,
    type_name: Option<String>,
    row_mapper: Option<Arc<dyn RowMapper>>,
}

impl ParameterSpec {
    /// Create a parameter with an explicit direction.
    pub fn new(name: impl Into<String>, direction: ParameterDirection, sql_type: SqlType) -> Self {
        Self {
            name: Some(name.into()),
            direction,
            sql_type,
            type_name: None,
            row_mapper: None,
        }
    }

    /// Create a parameter whose name may be unknown.
    ///
    /// Introspection can report unnamed columns; they still occupy a
    /// placeholder in the call.
    pub fn with_optional_name(
        name: Option<String>,
        direction: ParameterDirection,
        sql_type: SqlType,
    ) -> Self {
        Self {
            name,
            direction,
            sql_type,
            type_name: None,
            row_mapper: None,
        }
    }

    /// Create an IN parameter.
    pub fn input(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self::new(name, ParameterDirection::In, sql_type)
    }

    /// Create an OUT parameter.
    pub fn output(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self::new(name, ParameterDirection::Out, sql_type)
    }

    /// Create an INOUT parameter.
    pub fn in_out(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self::new(name, ParameterDirection::InOut, sql_type)
    }

    /// Create a function return parameter.
    pub fn return_value(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self::new(name, ParameterDirection::Return, sql_type)
    }

    /// Create a returned result set parameter with a row mapper.
    pub fn result_set<M>(name: impl Into<String>, mapper: M) -> Self
    where
        M: Fn(&[SqlValue], usize) -> Result<SqlValue, TypeError> + Send + Sync + 'static,
    {
        Self {
            name: Some(name.into()),
            direction: ParameterDirection::ResultSet,
            sql_type: SqlType::OTHER,
            type_name: None,
            row_mapper: Some(Arc::new(mapper)),
        }
    }

    /// Create an unnamed result set marker.
    pub fn unnamed_result_set() -> Self {
        Self::with_optional_name(None, ParameterDirection::ResultSet, SqlType::OTHER)
    }

    /// Attach a row mapper.
    #[must_use]
    pub fn with_row_mapper<M>(mut self, mapper: M) -> Self
    where
        M: Fn(&[SqlValue], usize) -> Result<SqlValue, TypeError> + Send + Sync + 'static,
    {
        self.row_mapper = Some(Arc::new(mapper));
        self
    }

    /// Attach a shared row mapper, such as a custom [`RowMapper`] implementation.
    #[must_use]
    pub fn with_shared_row_mapper(mut self, mapper: Arc<dyn RowMapper>) -> Self {
        self.row_mapper = Some(mapper);
        self
    }

    /// Set the database type name (e.g. `refcursor`, `dbo.IdList`).
    #[must_use]
    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Get the parameter name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Get the direction.
    #[must_use]
    pub fn direction(&self) -> ParameterDirection {
        self.direction
    }

    /// Get the SQL type code.
    #[must_use]
    pub fn sql_type(&self) -> SqlType {
        self.sql_type
    }

    /// Get the database type name, if one was given.
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Get the row mapper, if any.
    #[must_use]
    pub fn row_mapper(&self) -> Option<&Arc<dyn RowMapper>> {
        self.row_mapper.as_ref()
    }

    /// Check if this is a returned result set (no placeholder in the call).
    #[must_use]
    pub fn is_results_parameter(&self) -> bool {
        self.direction == ParameterDirection::ResultSet
    }

    /// Check if a value is bound for this parameter.
    #[must_use]
    pub fn is_input(&self) -> bool {
        self.direction.is_input()
    }

    /// Check if this parameter produces an output value.
    #[must_use]
    pub fn is_output(&self) -> bool {
        self.direction.is_output()
    }

    /// Map returned rows through the row mapper.
    ///
    /// Without a mapper, each row is kept as a nested [`SqlValue::Rows`].
    pub fn map_rows(&self, rows: &[Vec<SqlValue>]) -> Result<SqlValue, TypeError> {
        let mapped = match &self.row_mapper {
            Some(mapper) => rows
                .iter()
                .enumerate()
                .map(|(row_num, row)| mapper.map_row(row, row_num))
                .collect::<Result<Vec<_>, _>>()?,
            None => rows.iter().map(|row| SqlValue::Rows(row.clone())).collect(),
        };
        Ok(SqlValue::Rows(mapped))
    }
}

impl fmt::Debug for ParameterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterSpec")
            .field("name", &self.name)
            .field("direction", &self.direction)
            .field("sql_type", &self.sql_type)
            .field("type_name", &self.type_name)
            .field("row_mapper", &self.row_mapper.is_some())
            .finish()
    }
}

impl PartialEq for ParameterSpec {
    fn eq(&self, other: &Self) -> bool {
        let mappers_equal = match (&self.row_mapper, &other.row_mapper) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        self.name == other.name
            && self.direction == other.direction
            && self.sql_type == other.sql_type
            && self.type_name == other.type_name
            && mappers_equal
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_flags() {
        assert!(ParameterDirection::In.is_input());
        assert!(ParameterDirection::InOut.is_input());
        assert!(ParameterDirection::InOut.is_output());
        assert!(ParameterDirection::Return.is_output());
        assert!(!ParameterDirection::ResultSet.is_output());
        assert!(!ParameterDirection::ResultSet.is_input());
    }

    #[test]
    fn test_constructors() {
        let p = ParameterSpec::input("name", SqlType::VARCHAR);
        assert_eq!(p.name(), Some("name"));
        assert_eq!(p.direction(), ParameterDirection::In);
        assert!(!p.is_results_parameter());

        let rs = ParameterSpec::unnamed_result_set();
        assert_eq!(rs.name(), None);
        assert!(rs.is_results_parameter());
    }

    #[test]
    fn test_map_rows_with_mapper() {
        let spec = ParameterSpec::result_set("names", |row: &[SqlValue], n: usize| {
            let name = row[0].as_str().ok_or(TypeError::RowMapping {
                row: n,
                message: "name column is not a string".into(),
            })?;
            Ok(SqlValue::String(name.to_uppercase()))
        });

        let rows = vec![vec![SqlValue::from("ann")], vec![SqlValue::from("bo")]];
        let mapped = spec.map_rows(&rows).unwrap();
        assert_eq!(
            mapped,
            SqlValue::Rows(vec![SqlValue::from("ANN"), SqlValue::from("BO")])
        );

        let bad = vec![vec![SqlValue::Int(1)]];
        assert!(matches!(
            spec.map_rows(&bad),
            Err(TypeError::RowMapping { row: 0, .. })
        ));
    }

    #[test]
    fn test_map_rows_without_mapper() {
        let spec = ParameterSpec::output("cur", SqlType::REF_CURSOR);
        let mapped = spec.map_rows(&[vec![SqlValue::Int(1)]]).unwrap();
        assert_eq!(
            mapped,
            SqlValue::Rows(vec![SqlValue::Rows(vec![SqlValue::Int(1)])])
        );
    }

    #[test]
    fn test_equality_tracks_mapper_identity() {
        let mapper: Arc<dyn RowMapper> =
            Arc::new(|row: &[SqlValue], _: usize| -> Result<SqlValue, TypeError> { Ok(row[0].clone()) });
        let a = ParameterSpec::output("c", SqlType::OTHER).with_shared_row_mapper(mapper.clone());
        let b = ParameterSpec::output("c", SqlType::OTHER).with_shared_row_mapper(mapper);
        let c = ParameterSpec::output("c", SqlType::OTHER);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
