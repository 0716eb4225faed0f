#![no_main]

use std::sync::Arc;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sqlcall::{CallConfig, CallContext, MapParameterSource, reconcile};
use sqlcall_metadata::{DatabaseInfo, create_provider};
use sqlcall_types::{ParameterSpec, SqlType};

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    parameter_names: Vec<String>,
    argument_names: Vec<String>,
}

fuzz_target!(|input: FuzzInput| {
    let config = CallConfig::procedure("fuzz_call").access_metadata(false);
    let provider = create_provider(DatabaseInfo::new("Microsoft SQL Server"), false, false);
    let ctx = CallContext::new(&config, provider);

    let declared: Vec<Arc<ParameterSpec>> = input
        .parameter_names
        .into_iter()
        .map(|name| Arc::new(ParameterSpec::input(name, SqlType::VARCHAR)))
        .collect();
    let Ok(list) = reconcile(&declared, &[], &ctx) else {
        return;
    };

    let source: MapParameterSource = input
        .argument_names
        .iter()
        .map(|name| (name.as_str(), name.as_str()))
        .collect();

    if let Ok(matched) = ctx.match_in_parameter_values(&list, &source) {
        // Every matched key is a reconciled parameter name
        for name in matched.names() {
            assert!(list.iter().any(|p| p.name() == Some(name)));
        }
    }
});
