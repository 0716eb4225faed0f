//! Parameter reconciliation.
//!
//! Merges the parameters an application declares for a call with the
//! columns the database reports for the procedure, producing the ordered
//! parameter list that drives placeholder binding and output extraction.
//!
//! Declared parameters always win: introspection only fills the gaps, and a
//! declared parameter that matches a column is reused as the same `Arc`.
//! Returned result sets are placed first since they take no placeholder.

use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;
use sqlcall_metadata::{ProcedureColumn, ProcedureColumnKind};
use sqlcall_types::ParameterSpec;

use crate::context::CallContext;
use crate::error::{Error, Result};
use crate::instrumentation;
use crate::naming::normalize_name;

/// The ordered parameter list of a compiled call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconciledParameterList {
    parameters: Vec<Arc<ParameterSpec>>,
    return_parameter_index: Option<usize>,
    out_parameter_names: Vec<String>,
    function_return_name: String,
}

impl ReconciledParameterList {
    /// Get the parameters in call order.
    #[must_use]
    pub fn parameters(&self) -> &[Arc<ParameterSpec>] {
        &self.parameters
    }

    /// Iterate the parameters in call order.
    pub fn iter(&self) -> std::slice::Iter<'_, Arc<ParameterSpec>> {
        self.parameters.iter()
    }

    /// Get the number of parameters, result sets included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Check if the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Get the position of the parameter carrying the return value, if any.
    #[must_use]
    pub fn return_parameter_index(&self) -> Option<usize> {
        self.return_parameter_index
    }

    /// Get the parameter carrying the return value, if any.
    #[must_use]
    pub fn return_parameter(&self) -> Option<&Arc<ParameterSpec>> {
        self.return_parameter_index
            .and_then(|index| self.parameters.get(index))
    }

    /// Get the names of all output parameters, declared ones first.
    #[must_use]
    pub fn out_parameter_names(&self) -> &[String] {
        &self.out_parameter_names
    }

    /// Get the name under which the function result is reported.
    #[must_use]
    pub fn function_return_name(&self) -> &str {
        &self.function_return_name
    }

    /// Find a parameter by name, ignoring ASCII case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<ParameterSpec>> {
        self.parameters
            .iter()
            .find(|p| p.name().is_some_and(|n| n.eq_ignore_ascii_case(name)))
    }
}

impl<'a> IntoIterator for &'a ReconciledParameterList {
    type Item = &'a Arc<ParameterSpec>;
    type IntoIter = std::slice::Iter<'a, Arc<ParameterSpec>>;

    fn into_iter(self) -> Self::IntoIter {
        self.parameters.iter()
    }
}

/// Reconcile declared parameters with introspected procedure columns.
///
/// With column metadata unused, the result is the declared result sets
/// followed by the declared named parameters. Otherwise the columns, in
/// ordinal order, decide which parameters take part:
///
/// - a declared parameter with the same normalized name is reused;
/// - an undeclared OUT or INOUT column gets a synthesized parameter;
/// - an undeclared IN column gets one only if the limited IN name set is
///   empty or lists it;
/// - a RETURN column of a function must resolve to a declared output
///   parameter, while a procedure's may be bypassed or synthesized.
///
/// Fails with [`Error::Configuration`] when a function's return column has
/// no declared output parameter to land in.
pub fn reconcile(
    declared: &[Arc<ParameterSpec>],
    discovered: &[ProcedureColumn],
    context: &CallContext,
) -> Result<ReconciledParameterList> {
    let span = instrumentation::reconcile_span(context.procedure_name(), declared.len(), discovered.len());
    let _guard = span.enter();

    let provider = context.provider();
    let metadata_used =
        context.access_call_parameter_metadata() && provider.is_procedure_column_metadata_used();

    let discovered_names: HashSet<String> = if metadata_used {
        discovered
            .iter()
            .filter(|c| c.kind != ProcedureColumnKind::Return)
            .filter_map(|c| c.name.as_deref())
            .map(|n| normalize_name(provider, n))
            .collect()
    } else {
        HashSet::new()
    };

    let mut parameters: Vec<Arc<ParameterSpec>> = Vec::with_capacity(declared.len().max(discovered.len()));
    let mut placed: HashSet<String> = HashSet::new();
    let mut declared_by_name: IndexMap<String, &Arc<ParameterSpec>> = IndexMap::new();
    let mut out_parameter_names: Vec<String> = Vec::new();
    let mut function_return_name = context.function_return_name().to_owned();
    let mut return_declared = false;

    for param in declared.iter().filter(|p| p.is_results_parameter()) {
        if let Some(name) = param.name() {
            placed.insert(normalize_name(provider, name));
        }
        parameters.push(Arc::clone(param));
    }

    for param in declared.iter().filter(|p| !p.is_results_parameter()) {

        let Some(name) = param.name() else {
            tracing::warn!(
                direction = %param.direction(),
                "ignoring declared parameter without a name"
            );
            continue;
        };

        let key = normalize_name(provider, name);
        if placed.contains(&key) {
            tracing::warn!(
                parameter = name,
                "ignoring declared parameter shadowed by a result set of the same name"
            );
            continue;
        }
        if declared_by_name.contains_key(&key) {
            tracing::warn!(
                parameter = name,
                "ignoring duplicate declaration; the first declaration is kept"
            );
            continue;
        }

        if param.is_output() {
            out_parameter_names.push(name.to_owned());
            if context.is_function() && !return_declared && !discovered_names.contains(&key) {
                tracing::debug!(
                    parameter = name,
                    "using declared out parameter for function return value"
                );
                function_return_name = name.to_owned();
                return_declared = true;
            }
        }
        declared_by_name.insert(key, param);
    }

    if !metadata_used {
        for (key, param) in &declared_by_name {
            if placed.insert(key.clone()) {
                parameters.push(Arc::clone(param));
            }
        }

        let return_parameter_index = if context.is_function() || context.is_return_value_required() {
            let return_key = normalize_name(provider, &function_return_name);
            parameters.iter().position(|p| {
                !p.is_results_parameter()
                    && p.name().is_some_and(|n| normalize_name(provider, n) == return_key)
            })
        } else {
            None
        };

        tracing::debug!(
            parameters = parameters.len(),
            "column metadata not used; taking declared parameters as-is"
        );
        return Ok(ReconciledParameterList {
            parameters,
            return_parameter_index,
            out_parameter_names,
            function_return_name,
        });
    }

    let limited_in: HashSet<String> = context
        .limited_in_parameter_names()
        .iter()
        .map(|n| normalize_name(provider, n))
        .collect();

    let mut columns: Vec<&ProcedureColumn> = discovered.iter().collect();
    columns.sort_by_key(|c| c.ordinal);

    let mut return_parameter_index = None;

    for column in columns {
        let name_to_use = column.name.as_deref().map(|n| provider.parameter_name_to_use(n));
        let key = name_to_use.as_deref().map(str::to_lowercase);

        if key.as_ref().is_some_and(|k| placed.contains(k)) {
            tracing::debug!(
                column = column.name.as_deref(),
                "skipping column already bound to a parameter"
            );
            continue;
        }

        let unplaced_declared = |k: &str| {
            declared_by_name
                .get(k)
                .copied()
                .filter(|_| !placed.contains(k))
        };

        match column.kind {
            ProcedureColumnKind::Return => {
                let return_key = normalize_name(provider, &function_return_name);
                let reused = key
                    .as_deref()
                    .and_then(unplaced_declared)
                    .or_else(|| unplaced_declared(&return_key));

                if context.is_function() {
                    let reused = reused.or_else(|| {
                        declared_by_name
                            .iter()
                            .find(|(k, p)| p.is_output() && !placed.contains(*k))
                            .map(|(_, p)| *p)
                    });
                    let Some(param) = reused else {
                        return Err(Error::Configuration(format!(
                            "unable to locate declared parameter for function return value; \
                             declare an out parameter named '{function_return_name}'"
                        )));
                    };
                    if let Some(name) = param.name() {
                        function_return_name = name.to_owned();
                    }
                    tracing::debug!(
                        parameter = %function_return_name,
                        "using declared parameter for function return value"
                    );
                    return_parameter_index = Some(parameters.len());
                    push_placed(&mut parameters, &mut placed, provider_key(context, param), Arc::clone(param));
                } else if let Some(param) = reused {
                    tracing::debug!(
                        parameter = param.name(),
                        "using declared parameter for return value"
                    );
                    return_parameter_index = Some(parameters.len());
                    push_placed(&mut parameters, &mut placed, provider_key(context, param), Arc::clone(param));
                } else if !context.is_return_value_required()
                    && provider.by_pass_return_parameter(column.name.as_deref())
                {
                    tracing::debug!(
                        column = column.name.as_deref(),
                        "bypassing metadata return parameter"
                    );
                } else {
                    let name = name_to_use.unwrap_or_else(|| function_return_name.clone());
                    let spec = provider.create_default_out_parameter(&name, column);
                    tracing::debug!(parameter = %name, "added metadata return parameter");
                    out_parameter_names.push(name.clone());
                    return_parameter_index = Some(parameters.len());
                    let key = name.to_lowercase();
                    push_placed(&mut parameters, &mut placed, key, Arc::new(spec));
                }
            }
            ProcedureColumnKind::Out | ProcedureColumnKind::InOut => {
                let (Some(name), Some(key)) = (name_to_use, key) else {
                    tracing::warn!(kind = ?column.kind, "skipping unnamed output column");
                    continue;
                };
                if let Some(param) = unplaced_declared(&key) {
                    tracing::debug!(parameter = %name, "using declared out parameter");
                    push_placed(&mut parameters, &mut placed, key, Arc::clone(param));
                } else {
                    let spec = if column.kind == ProcedureColumnKind::Out {
                        provider.create_default_out_parameter(&name, column)
                    } else {
                        provider.create_default_in_out_parameter(&name, column)
                    };
                    tracing::debug!(parameter = %name, kind = ?column.kind, "added metadata out parameter");
                    out_parameter_names.push(name);
                    push_placed(&mut parameters, &mut placed, key, Arc::new(spec));
                }
            }
            ProcedureColumnKind::In | ProcedureColumnKind::Unknown | ProcedureColumnKind::Result => {
                let (Some(name), Some(key)) = (name_to_use, key) else {
                    tracing::debug!("skipping unnamed input column");
                    continue;
                };
                if let Some(param) = unplaced_declared(&key) {
                    tracing::debug!(parameter = %name, "using declared in parameter");
                    push_placed(&mut parameters, &mut placed, key, Arc::clone(param));
                } else if limited_in.is_empty() || limited_in.contains(&key) {
                    let spec = provider.create_default_in_parameter(&name, column);
                    tracing::debug!(parameter = %name, "added metadata in parameter");
                    push_placed(&mut parameters, &mut placed, key, Arc::new(spec));
                } else {
                    tracing::debug!(
                        parameter = %name,
                        "limited set of in parameters excludes metadata parameter"
                    );
                }
            }
        }
    }

    for (key, param) in &declared_by_name {
        if !placed.contains(key) {
            tracing::debug!(
                parameter = param.name(),
                "declared parameter not reported by column metadata; leaving it out"
            );
        }
    }

    Ok(ReconciledParameterList {
        parameters,
        return_parameter_index,
        out_parameter_names,
        function_return_name,
    })
}

fn provider_key(context: &CallContext, param: &ParameterSpec) -> String {
    param
        .name()
        .map(|n| normalize_name(context.provider(), n))
        .unwrap_or_default()
}

fn push_placed(
    parameters: &mut Vec<Arc<ParameterSpec>>,
    placed: &mut HashSet<String>,
    key: String,
    param: Arc<ParameterSpec>,
) {
    placed.insert(key);
    parameters.push(param);
}
