//! # sqlcall-types
//!
//! SQL type codes, runtime values and parameter declarations shared by the
//! `sqlcall` crates.
//!
//! This crate provides the vocabulary used when describing a stored-procedure
//! or function call: the integer type codes reported by database metadata,
//! the values bound to call arguments, and the [`ParameterSpec`] declarations
//! an application author supplies for a call.
//!
//! ## Features
//!
//! - `chrono` (default): Enable date/time value support via chrono
//! - `uuid` (default): Enable UUID value support
//! - `decimal` (default): Enable decimal value support via rust_decimal
//! - `json`: Enable JSON value support via serde_json
//!
//! ## Type Mappings
//!
//! | SQL type code | Rust Type |
//! |-----------------|-----------|
//! | `BIT`/`BOOLEAN` | `bool` |
//! | `TINYINT` | `u8` |
//! | `SMALLINT` | `i16` |
//! | `INTEGER` | `i32` |
//! | `BIGINT` | `i64` |
//! | `REAL` | `f32` |
//! | `DOUBLE` | `f64` |
//! | `DECIMAL`/`NUMERIC` | `rust_decimal::Decimal` |
//! | `VARCHAR`/`NVARCHAR` | `String` |
//! | `DATE` | `chrono::NaiveDate` |
//! | `TIME` | `chrono::NaiveTime` |
//! | `TIMESTAMP` | `chrono::NaiveDateTime` |

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod parameter;
pub mod sql_type;
pub mod to_sql;
pub mod value;

pub use error::TypeError;
pub use parameter::{ParameterDirection, ParameterSpec, RowMapper};
pub use sql_type::SqlType;
pub use to_sql::ToSql;
pub use value::SqlValue;
