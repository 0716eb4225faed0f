//! End-to-end compilation tests against the mock metadata source.
//!
//! Run with:
//!   cargo test -p sqlcall --test compile

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use sqlcall::{Call, CallCacheConfig, CallConfig, Error, MapParameterSource, SharedCallCache};
use sqlcall_metadata::MetadataError;
use sqlcall_testing::{MockMetadataSource, fixtures};
use sqlcall_types::{ParameterSpec, SqlType, SqlValue};

fn source_for(info: sqlcall_metadata::DatabaseInfo) -> MockMetadataSource {
    MockMetadataSource::builder()
        .with_database_info(info)
        .with_signatures(fixtures::all_signatures())
        .build()
}

// =============================================================================
// Compilation
// =============================================================================

#[tokio::test]
async fn test_compile_sql_server_procedure() {
    let source = source_for(fixtures::sql_server_info());

    let call = Call::procedure("add_user")
        .schema("dbo")
        .compile(&source)
        .await
        .expect("compile should succeed");

    assert_eq!(call.call_string(), "{call dbo.add_user(?, ?)}");
    assert_eq!(call.out_parameter_names(), ["new_id"]);
    assert_eq!(call.scalar_out_parameter_name(), Some("new_id"));
    assert_eq!(source.lookup_count(), 1);

    let lookup = &source.lookups()[0];
    assert_eq!(lookup.procedure_name, "add_user");
    assert_eq!(lookup.schema.as_deref(), Some("dbo"));
}

#[tokio::test]
async fn test_compile_oracle_uses_login_schema() {
    let source = source_for(fixtures::oracle_info());

    let call = Call::procedure("get_employees")
        .compile(&source)
        .await
        .unwrap();

    assert_eq!(call.call_string(), "{call GET_EMPLOYEES(?, ?)}");
    let cursor = call.parameters().get("P_CUR").unwrap();
    assert_eq!(cursor.sql_type(), SqlType::ORACLE_CURSOR);
    assert_eq!(source.lookups()[0].schema.as_deref(), Some("SCOTT"));
}

#[tokio::test]
async fn test_compile_postgres_function() {
    let source = source_for(fixtures::postgres_info());

    let call = Call::function("get_orders")
        .declare_parameter(ParameterSpec::output("orders", SqlType::OTHER))
        .compile(&source)
        .await
        .unwrap();

    assert_eq!(call.call_string(), "{? = call get_orders(?)}");
    assert_eq!(call.function_return_name(), "orders");
    assert_eq!(call.scalar_out_parameter_name(), Some("orders"));
    assert_eq!(source.lookups()[0].schema.as_deref(), Some("public"));
}

#[tokio::test]
async fn test_compile_function_without_return_declaration_fails() {
    let source = source_for(fixtures::postgres_info());

    let err = Call::function("order_total").compile(&source).await.unwrap_err();
    assert!(err.is_configuration_error());
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_compile_without_metadata_skips_lookup() {
    let source = source_for(fixtures::sql_server_info());

    let call = Call::procedure("add_user")
        .schema("dbo")
        .declare_parameter(ParameterSpec::input("user_name", SqlType::NVARCHAR))
        .declare_parameter(ParameterSpec::output("new_id", SqlType::INTEGER))
        .without_procedure_column_metadata_access()
        .compile(&source)
        .await
        .unwrap();

    assert_eq!(call.call_string(), "{call dbo.add_user(?, ?)}");
    assert_eq!(source.lookup_count(), 0);
}

#[tokio::test]
async fn test_compile_from_descriptor() {
    let source = source_for(fixtures::oracle_info());
    let config =
        CallConfig::from_descriptor("Procedure=raise_salary;Package=pkg_payroll;InParameters=p_emp_id")
            .unwrap();

    let call = Call::from_config(config).compile(&source).await.unwrap();
    assert_eq!(call.call_string(), "{call PKG_PAYROLL.RAISE_SALARY(?, ?)}");
    assert_eq!(source.lookups()[0].catalog.as_deref(), Some("PKG_PAYROLL"));
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_unknown_procedure_is_metadata_error() {
    let source = source_for(fixtures::sql_server_info());

    let err = Call::procedure("missing").compile(&source).await.unwrap_err();
    assert!(err.is_metadata_error());
    assert!(matches!(
        err,
        Error::Metadata(MetadataError::ProcedureNotFound { .. })
    ));
}

#[tokio::test]
async fn test_source_failure_propagates_unchanged() {
    let source = MockMetadataSource::builder()
        .with_database_info(fixtures::sql_server_info())
        .failing_with("connection reset by peer")
        .build();

    let err = Call::procedure("add_user").compile(&source).await.unwrap_err();
    assert!(err.is_transient());
    assert!(err.to_string().contains("connection reset by peer"));
}

#[tokio::test]
async fn test_invalid_name_fails_before_lookup() {
    let source = source_for(fixtures::sql_server_info());

    let err = Call::procedure("add_user; --").compile(&source).await.unwrap_err();
    assert!(matches!(err, Error::InvalidIdentifier(_)));
    assert_eq!(source.lookup_count(), 0);
}

// =============================================================================
// Argument matching on compiled calls
// =============================================================================

#[tokio::test]
async fn test_match_arguments_after_compile() {
    let source = source_for(fixtures::sql_server_info());
    let call = Call::procedure("get_greeting")
        .schema("dbo")
        .compile(&source)
        .await
        .unwrap();

    let args = MapParameterSource::new()
        .add_value("firstName", "Ada")
        .add_value("LAST_NAME", "Lovelace")
        .add_value("title", "Countess");
    let matched = call.match_arguments(&args).unwrap();

    assert_eq!(matched.names().collect::<Vec<_>>(), ["first_name", "last_name"]);
    assert_eq!(matched.get("first_name"), Some(&SqlValue::from("Ada")));
    assert_eq!(matched.get("last_name"), Some(&SqlValue::from("Lovelace")));
}

#[tokio::test]
async fn test_compiled_call_shared_across_tasks() {
    let source = source_for(fixtures::sql_server_info());
    let call = Arc::new(
        Call::procedure("add_user")
            .schema("dbo")
            .compile(&source)
            .await
            .unwrap(),
    );

    let mut handles = Vec::new();
    for i in 0..8 {
        let call = Arc::clone(&call);
        handles.push(tokio::spawn(async move {
            let args = MapParameterSource::new().add_value("user_name", format!("user{i}"));
            call.match_arguments(&args).unwrap()
        }));
    }
    for (i, handle) in handles.into_iter().enumerate() {
        let matched = handle.await.unwrap();
        assert_eq!(matched.get("user_name"), Some(&SqlValue::from(format!("user{i}"))));
    }
}

// =============================================================================
// Shared cache
// =============================================================================

#[tokio::test]
async fn test_shared_cache_compiles_once() {
    let source = source_for(fixtures::sql_server_info());
    let cache = SharedCallCache::default();

    let first = cache
        .get_or_compile(Call::procedure("add_user").schema("dbo"), &source)
        .await
        .unwrap();
    let second = cache
        .get_or_compile(Call::procedure("ADD_USER").schema("DBO"), &source)
        .await
        .unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(source.lookup_count(), 1);
    assert_eq!(cache.stats(), (1, 1));
    assert_eq!(cache.len(), 1);

    assert!(cache.invalidate(&first.cache_key()));
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_shared_cache_separates_call_definitions() {
    let source = source_for(fixtures::mysql_info());
    let cache = SharedCallCache::default();

    let plain = cache
        .get_or_compile(
            Call::procedure("p")
                .declare_parameter(ParameterSpec::input("x", SqlType::INTEGER))
                .without_procedure_column_metadata_access(),
            &source,
        )
        .await
        .unwrap();
    let with_return = cache
        .get_or_compile(
            Call::procedure("p")
                .return_value()
                .declare_parameter(ParameterSpec::output("rc", SqlType::INTEGER))
                .declare_parameter(ParameterSpec::input("x", SqlType::INTEGER))
                .declare_parameter(ParameterSpec::input("y", SqlType::INTEGER))
                .function_return_name("rc")
                .without_procedure_column_metadata_access(),
            &source,
        )
        .await
        .unwrap();

    assert_eq!(plain.call_string(), "{call p(?)}");
    assert_eq!(with_return.call_string(), "{? = call p(?, ?)}");
    assert!(!Arc::ptr_eq(&plain, &with_return));
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.stats(), (0, 2));

    let again = cache
        .get_or_compile(
            Call::procedure("P")
                .declare_parameter(ParameterSpec::input("x", SqlType::INTEGER))
                .without_procedure_column_metadata_access(),
            &source,
        )
        .await
        .unwrap();
    assert!(Arc::ptr_eq(&plain, &again));
}

#[tokio::test]
async fn test_disabled_cache_always_compiles() {
    let source = source_for(fixtures::sql_server_info());
    let cache = SharedCallCache::new(&CallCacheConfig::disabled());

    for _ in 0..3 {
        cache
            .get_or_compile(Call::procedure("add_user").schema("dbo"), &source)
            .await
            .unwrap();
    }
    assert_eq!(source.lookup_count(), 3);
    assert!(cache.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_compiles_settle_on_one_entry() {
    let source = Arc::new(
        MockMetadataSource::builder()
            .with_database_info(fixtures::sql_server_info())
            .with_signatures(fixtures::all_signatures())
            .with_latency(Duration::from_millis(20))
            .build(),
    );
    let cache = Arc::new(SharedCallCache::default());

    let mut handles = Vec::new();
    for _ in 0..4 {
        let source = Arc::clone(&source);
        let cache = Arc::clone(&cache);
        handles.push(tokio::spawn(async move {
            cache
                .get_or_compile(Call::procedure("add_user").schema("dbo"), &*source)
                .await
                .unwrap()
        }));
    }

    let mut compiled = Vec::new();
    for handle in handles {
        compiled.push(handle.await.unwrap());
    }

    assert_eq!(cache.len(), 1);
    let cached = cache
        .get_or_compile(Call::procedure("add_user").schema("dbo"), &*source)
        .await
        .unwrap();
    assert!(compiled.iter().any(|c| Arc::ptr_eq(c, &cached)));
}
