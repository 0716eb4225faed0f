//! Escape-syntax call strings.

use crate::context::CallContext;
use crate::reconcile::ReconciledParameterList;

/// Build `{[? = ]call [catalog.][schema.]name(?, ...)}` for a call.
///
/// The `? =` prefix appears for functions and calls requiring a return
/// value; the return parameter is then bound there and not repeated in the
/// argument list. Result set parameters take no placeholder.
pub fn build_call_string(context: &CallContext, parameters: &ReconciledParameterList) -> String {
    let provider = context.provider();
    let binds_return = context.is_function() || context.is_return_value_required();

    let mut call = String::with_capacity(32 + context.procedure_name().len() + parameters.len() * 3);
    call.push('{');
    if binds_return {
        call.push_str("? = ");
    }
    call.push_str("call ");

    let qualifiers = [
        provider.catalog_name_to_use(context.catalog_name()),
        provider.schema_name_to_use(context.schema_name()),
    ];
    for qualifier in qualifiers.into_iter().flatten() {
        if !qualifier.is_empty() {
            call.push_str(&qualifier);
            call.push('.');
        }
    }
    call.push_str(&provider.procedure_name_to_use(context.procedure_name()));

    let bound_to_return = if binds_return {
        parameters.return_parameter_index()
    } else {
        None
    };

    call.push('(');
    let mut placeholders = 0usize;
    for (index, param) in parameters.iter().enumerate() {
        if param.is_results_parameter() || Some(index) == bound_to_return {
            continue;
        }
        if placeholders > 0 {
            call.push_str(", ");
        }
        call.push('?');
        placeholders += 1;
    }
    call.push_str(")}");

    tracing::debug!(call = %call, "compiled call string");
    call
}
