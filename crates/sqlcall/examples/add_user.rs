//! Compiling a stored-procedure call from introspected metadata.
//!
//! This example compiles `dbo.add_user` against the in-memory SQL Server
//! catalog from `sqlcall-testing`, prints the call string and the parameters
//! introspection contributed, then matches a set of argument values.
//!
//! # Running
//!
//! ```bash
//! cargo run -p sqlcall --example add_user
//! ```

// Allow common patterns in example code
#![allow(clippy::unwrap_used, clippy::expect_used)]

use sqlcall::{Call, Error, MapParameterSource, SharedCallCache};
use sqlcall_testing::{MockMetadataSource, fixtures};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    let source = MockMetadataSource::builder()
        .with_database_info(fixtures::sql_server_info())
        .with_signatures(fixtures::all_signatures())
        .build();

    let cache = SharedCallCache::default();
    let call = cache
        .get_or_compile(Call::procedure("add_user").schema("dbo"), &source)
        .await?;

    println!("call string: {}", call.call_string());
    for param in call.parameters() {
        println!(
            "  {:<12} {:<6} type {}",
            param.name().unwrap_or("<unnamed>"),
            param.direction().as_str(),
            i32::from(param.sql_type()),
        );
    }
    if let Some(out) = call.scalar_out_parameter_name() {
        println!("scalar out parameter: {out}");
    }

    // Property-style names match underscore-separated parameter names.
    let args = MapParameterSource::new()
        .add_value("userName", "ada")
        .add_value("nickname", "countess");
    let matched = call.match_arguments(&args)?;
    for (name, value) in matched.iter() {
        println!("bind {name} = {value:?}");
    }

    // The second lookup is served from the cache.
    let again = cache
        .get_or_compile(Call::procedure("add_user").schema("dbo"), &source)
        .await?;
    let (hits, misses) = cache.stats();
    println!(
        "cached: {} (hits {hits}, misses {misses}, lookups {})",
        std::sync::Arc::ptr_eq(&call, &again),
        source.lookup_count()
    );

    Ok(())
}
