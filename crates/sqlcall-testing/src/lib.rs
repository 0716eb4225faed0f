//! # sqlcall-testing
//!
//! Test infrastructure for stored-procedure call reconciliation.
//!
//! This crate provides an in-memory [`MetadataSource`](sqlcall_metadata::MetadataSource)
//! so calls can be compiled without a database, plus fixtures describing
//! typical procedures as each database family reports them.
//!
//! ## Features
//!
//! - Mock metadata source with pre-configured signatures
//! - Failure injection and simulated latency
//! - Recording of every lookup the source receives
//! - Per-database fixtures for common procedure shapes
//!
//! ## Example
//!
//! ```rust,ignore
//! use sqlcall_testing::{MockMetadataSource, fixtures};
//!
//! #[tokio::test]
//! async fn test_add_user() {
//!     let source = MockMetadataSource::builder()
//!         .with_database_info(fixtures::sql_server_info())
//!         .with_signature(fixtures::sql_server_add_user())
//!         .build();
//!
//!     let call = Call::procedure("add_user")
//!         .schema("dbo")
//!         .compile(&source)
//!         .await
//!         .unwrap();
//!     assert_eq!(source.lookup_count(), 1);
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod fixtures;
pub mod mock_source;

pub use mock_source::{MockMetadataSource, MockSourceBuilder};
