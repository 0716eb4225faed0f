//! # sqlcall-metadata
//!
//! Procedure metadata for stored-procedure and function calls.
//!
//! This crate defines what database introspection reports about a procedure
//! ([`ProcedureColumn`], [`ProcedureSignature`], [`DatabaseInfo`]), the async
//! [`MetadataSource`] collaborator that fetches it, and the
//! [`CallMetaDataProvider`] policy that captures per-database naming quirks.
//!
//! ## Providers
//!
//! One provider exists per database family. The factory picks it from the
//! product name reported by the database:
//!
//! | Product | Provider | Column metadata |
//! |---------|----------|-----------------|
//! | Microsoft SQL Server | [`SqlServerCallMetaDataProvider`] | procedures, functions |
//! | Sybase / ASE | [`SybaseCallMetaDataProvider`] | procedures |
//! | Oracle | [`OracleCallMetaDataProvider`] | procedures, functions |
//! | PostgreSQL | [`PostgresCallMetaDataProvider`] | procedures, functions |
//! | MySQL | [`GenericCallMetaDataProvider`] | procedures, functions |
//! | DB2 | [`GenericCallMetaDataProvider`] | procedures |
//! | Apache Derby | [`DerbyCallMetaDataProvider`] | procedures |
//!
//! ## Example
//!
//! ```rust
//! use sqlcall_metadata::{DatabaseInfo, create_provider};
//!
//! let info = DatabaseInfo::new("Microsoft SQL Server");
//! let provider = create_provider(info, false, true);
//!
//! assert_eq!(provider.parameter_name_to_use("@UserName"), "UserName");
//! assert!(provider.by_pass_return_parameter(Some("@RETURN_VALUE")));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod column;
pub mod database;
pub mod error;
pub mod factory;
pub mod provider;
pub mod source;

pub use column::{ProcedureColumn, ProcedureColumnKind, ProcedureSignature};
pub use database::{DatabaseFamily, DatabaseInfo};
pub use error::MetadataError;
pub use factory::create_provider;
pub use provider::{
    CallMetaDataProvider, DerbyCallMetaDataProvider, GenericCallMetaDataProvider,
    OracleCallMetaDataProvider, PostgresCallMetaDataProvider, SqlServerCallMetaDataProvider,
    SybaseCallMetaDataProvider,
};
pub use source::{MetadataSource, ProcedureLookup, load_procedure_columns};
