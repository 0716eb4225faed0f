//! # sqlcall
//!
//! Stored-procedure and function call preparation.
//!
//! Calling a stored procedure needs three things: the ordered list of
//! parameters with their directions and types, the escape-syntax call
//! string, and the argument values matched to parameter names. This crate
//! derives all three from the parameters an application declares and the
//! columns the database reports for the procedure.
//!
//! ## Features
//!
//! - **Reconciliation**: declared parameters win, introspection fills gaps
//! - **Per-database policies**: `@` prefixes, bypassed status returns,
//!   ref cursors, identifier case (see `sqlcall-metadata`)
//! - **Type-state calls**: `Call<Declaring>` compiles into an immutable,
//!   shareable `Call<Compiled>`
//! - **Caching**: compiled calls kept in an LRU cache
//! - **Flexible argument sources**: maps or `#[derive(ParameterSource)]`
//!   structs, matched by name or property-style name
//!
//! ## Example
//!
//! ```rust
//! use sqlcall::{Call, MapParameterSource};
//! use sqlcall_metadata::{DatabaseInfo, ProcedureColumn, ProcedureColumnKind, create_provider};
//! use sqlcall_types::{ParameterSpec, SqlType, SqlValue};
//!
//! // Columns as reported by SQL Server for `dbo.add_user`.
//! let columns = vec![
//!     ProcedureColumn::new("@RETURN_VALUE", ProcedureColumnKind::Return, SqlType::INTEGER, 0),
//!     ProcedureColumn::new("@user_name", ProcedureColumnKind::In, SqlType::NVARCHAR, 1),
//!     ProcedureColumn::new("@new_id", ProcedureColumnKind::Out, SqlType::INTEGER, 2),
//! ];
//! let provider = create_provider(DatabaseInfo::new("Microsoft SQL Server"), false, true);
//!
//! let call = Call::procedure("add_user")
//!     .schema("dbo")
//!     .declare_parameter(ParameterSpec::output("new_id", SqlType::BIGINT))
//!     .compile_with(provider, columns)?;
//!
//! assert_eq!(call.call_string(), "{call dbo.add_user(?, ?)}");
//! assert_eq!(call.out_parameter_names(), ["new_id"]);
//!
//! let args = call.match_arguments(&MapParameterSource::new().add_value("userName", "Bob"))?;
//! assert_eq!(args.get("user_name"), Some(&SqlValue::from("Bob")));
//! # Ok::<(), sqlcall::Error>(())
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod cache;
pub mod call;
pub mod call_string;
pub mod config;
pub mod context;
pub mod error;
pub mod instrumentation;
pub mod matching;
pub mod naming;
pub mod reconcile;
pub mod state;

pub use cache::{CallCache, CallCacheConfig, CallKey, SharedCallCache};
pub use call::Call;
pub use call_string::build_call_string;
pub use config::{CallConfig, DEFAULT_FUNCTION_RETURN_NAME, validate_identifier};
pub use context::CallContext;
pub use error::{Error, Result};
pub use matching::{
    MapParameterSource, MatchedArguments, ParameterSource, match_arguments_to_parameters,
};
pub use naming::convert_underscore_name_to_property_name;
pub use reconcile::{ReconciledParameterList, reconcile};
pub use state::{CallState, Compiled, Declaring};

// Re-exported so derived `ParameterSource` impls and downstream users only
// need this crate.
pub use sqlcall_metadata;
pub use sqlcall_types;
