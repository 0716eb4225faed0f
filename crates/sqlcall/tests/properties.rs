//! Property-based tests for reconciliation and call strings.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeSet;
use std::sync::Arc;

use proptest::prelude::*;
use sqlcall::{CallConfig, CallContext, build_call_string, reconcile};
use sqlcall_metadata::{DatabaseInfo, ProcedureColumn, ProcedureColumnKind, create_provider};
use sqlcall_types::{ParameterSpec, SqlType};

fn context(product: &str, config: CallConfig) -> CallContext {
    let provider = create_provider(
        DatabaseInfo::new(product),
        config.is_function,
        config.access_call_parameter_metadata,
    );
    CallContext::new(&config, provider)
}

fn unique_names(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z][a-z0-9_]{0,7}", 0..max)
        .prop_map(|names| names.into_iter().collect())
}

fn kind_strategy() -> impl Strategy<Value = ProcedureColumnKind> {
    prop_oneof![
        Just(ProcedureColumnKind::In),
        Just(ProcedureColumnKind::Out),
        Just(ProcedureColumnKind::InOut),
    ]
}

proptest! {
    #[test]
    fn metadata_disabled_returns_result_sets_then_declared(
        names in unique_names(10),
        result_sets in 0usize..3,
    ) {
        let ctx = context("MySQL", CallConfig::procedure("p").access_metadata(false));

        let mut declared: Vec<Arc<ParameterSpec>> = names
            .iter()
            .map(|n| Arc::new(ParameterSpec::input(n.as_str(), SqlType::INTEGER)))
            .collect();
        for i in 0..result_sets {
            declared.insert(0, Arc::new(ParameterSpec::unnamed_result_set()));
            if i % 2 == 1 {
                declared.push(Arc::new(ParameterSpec::unnamed_result_set()));
            }
        }

        let list = reconcile(&declared, &[], &ctx).unwrap();
        let result_count = declared.iter().filter(|p| p.is_results_parameter()).count();

        prop_assert_eq!(list.len(), declared.len());
        prop_assert!(list.iter().take(result_count).all(|p| p.is_results_parameter()));
        let tail: Vec<&str> = list.iter().skip(result_count).filter_map(|p| p.name()).collect();
        let expected: Vec<&str> = names.iter().map(String::as_str).collect();
        prop_assert_eq!(tail, expected);
    }

    #[test]
    fn declared_parameters_are_reused_by_identity(
        names in unique_names(8),
        uppercase in any::<bool>(),
    ) {
        let ctx = context("Microsoft SQL Server", CallConfig::procedure("p"));
        let declared: Vec<Arc<ParameterSpec>> = names
            .iter()
            .map(|n| {
                let declared_name = if uppercase { n.to_uppercase() } else { n.clone() };
                Arc::new(ParameterSpec::input(declared_name, SqlType::VARCHAR))
            })
            .collect();
        let columns: Vec<ProcedureColumn> = names
            .iter()
            .enumerate()
            .map(|(i, n)| {
                ProcedureColumn::new(format!("@{n}"), ProcedureColumnKind::In, SqlType::INTEGER, i as u16 + 1)
            })
            .collect();

        let list = reconcile(&declared, &columns, &ctx).unwrap();

        prop_assert_eq!(list.len(), declared.len());
        for (reconciled, original) in list.iter().zip(&declared) {
            prop_assert!(Arc::ptr_eq(reconciled, original));
        }
    }

    #[test]
    fn each_undeclared_column_synthesized_once(
        names in unique_names(10),
        kinds in prop::collection::vec(kind_strategy(), 10),
    ) {
        let ctx = context("Microsoft SQL Server", CallConfig::procedure("p"));
        let columns: Vec<ProcedureColumn> = names
            .iter()
            .zip(&kinds)
            .enumerate()
            .map(|(i, (n, kind))| {
                ProcedureColumn::new(format!("@{n}"), *kind, SqlType::INTEGER, i as u16 + 1)
            })
            .collect();

        let list = reconcile(&[], &columns, &ctx).unwrap();

        let produced: Vec<&str> = list.iter().filter_map(|p| p.name()).collect();
        let expected: Vec<&str> = names.iter().map(String::as_str).collect();
        prop_assert_eq!(produced, expected);

        let outputs = columns.iter().filter(|c| c.kind.is_out_or_in_out()).count();
        prop_assert_eq!(list.out_parameter_names().len(), outputs);
    }

    #[test]
    fn limited_in_names_exclude_unlisted_columns(
        names in unique_names(10),
        keep_mask in prop::collection::vec(any::<bool>(), 10),
    ) {
        let kept: BTreeSet<&str> = names
            .iter()
            .zip(&keep_mask)
            .filter(|(_, keep)| **keep)
            .map(|(n, _)| n.as_str())
            .collect();
        // An empty limited set means "all", so make sure at least one name
        // is listed.
        let mut limited: Vec<String> = kept.iter().map(|n| n.to_uppercase()).collect();
        limited.push("not_a_column".into());

        let ctx = context("MySQL", CallConfig::procedure("p").in_parameter_names(limited));
        let columns: Vec<ProcedureColumn> = names
            .iter()
            .enumerate()
            .map(|(i, n)| ProcedureColumn::new(n.as_str(), ProcedureColumnKind::In, SqlType::INTEGER, i as u16 + 1))
            .collect();

        let list = reconcile(&[], &columns, &ctx).unwrap();
        let produced: BTreeSet<&str> = list.iter().filter_map(|p| p.name()).collect();
        prop_assert_eq!(produced, kept);
    }

    #[test]
    fn call_string_has_one_placeholder_per_bound_parameter(
        names in unique_names(12),
        is_function in any::<bool>(),
        result_sets in 0usize..3,
    ) {
        prop_assume!(!names.iter().any(|n| n == "return"));

        let config = if is_function {
            CallConfig::function("f")
        } else {
            CallConfig::procedure("f")
        };
        let ctx = context("MySQL", config.access_metadata(false));

        let mut declared: Vec<Arc<ParameterSpec>> = names
            .iter()
            .map(|n| Arc::new(ParameterSpec::input(n.as_str(), SqlType::INTEGER)))
            .collect();
        for _ in 0..result_sets {
            declared.push(Arc::new(ParameterSpec::unnamed_result_set()));
        }

        let list = reconcile(&declared, &[], &ctx).unwrap();
        let sql = build_call_string(&ctx, &list);

        prop_assert_eq!(sql.matches('?').count(), names.len() + usize::from(is_function));
        prop_assert_eq!(sql.starts_with("{? = call "), is_function);
        prop_assert!(sql.ends_with(")}"), "call string should end with )}}: {}", sql);
    }
}
