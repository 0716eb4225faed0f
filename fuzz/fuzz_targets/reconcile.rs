#![no_main]

use std::sync::Arc;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sqlcall::{CallConfig, CallContext, build_call_string, reconcile};
use sqlcall_metadata::{DatabaseInfo, ProcedureColumn, ProcedureColumnKind, create_provider};
use sqlcall_types::{ParameterDirection, ParameterSpec, SqlType};

const PRODUCTS: [&str; 6] = [
    "Microsoft SQL Server",
    "Oracle",
    "PostgreSQL",
    "MySQL",
    "Sybase SQL Server",
    "Apache Derby",
];

#[derive(Debug, Arbitrary)]
struct FuzzColumn {
    name: Option<String>,
    kind: i16,
    sql_type: i32,
    ordinal: u16,
}

#[derive(Debug, Arbitrary)]
struct FuzzDeclared {
    name: Option<String>,
    direction: u8,
    sql_type: i32,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    product: u8,
    is_function: bool,
    return_value_required: bool,
    access_metadata: bool,
    limited_in: Vec<String>,
    declared: Vec<FuzzDeclared>,
    columns: Vec<FuzzColumn>,
}

fuzz_target!(|input: FuzzInput| {
    let product = PRODUCTS[usize::from(input.product) % PRODUCTS.len()];
    let config = if input.is_function {
        CallConfig::function("fuzz_call")
    } else {
        CallConfig::procedure("fuzz_call")
    }
    .return_value(input.return_value_required)
    .access_metadata(input.access_metadata)
    .in_parameter_names(input.limited_in);

    let provider = create_provider(DatabaseInfo::new(product), input.is_function, input.access_metadata);
    let ctx = CallContext::new(&config, provider);

    let declared: Vec<Arc<ParameterSpec>> = input
        .declared
        .into_iter()
        .map(|d| {
            let direction = match d.direction % 5 {
                0 => ParameterDirection::In,
                1 => ParameterDirection::Out,
                2 => ParameterDirection::InOut,
                3 => ParameterDirection::Return,
                _ => ParameterDirection::ResultSet,
            };
            Arc::new(ParameterSpec::with_optional_name(d.name, direction, SqlType::from_code(d.sql_type)))
        })
        .collect();

    let columns: Vec<ProcedureColumn> = input
        .columns
        .into_iter()
        .map(|c| {
            let mut column = ProcedureColumn::new(
                "",
                ProcedureColumnKind::from_code(c.kind),
                SqlType::from_code(c.sql_type),
                c.ordinal,
            );
            column.name = c.name;
            column
        })
        .collect();

    if let Ok(list) = reconcile(&declared, &columns, &ctx) {
        if let Some(index) = list.return_parameter_index() {
            assert!(index < list.len());
        }
        let call = build_call_string(&ctx, &list);
        assert!(call.starts_with('{') && call.ends_with(")}"));
    }
});
