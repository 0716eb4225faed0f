//! Per-call reconciliation context.

use std::sync::Arc;

use sqlcall_metadata::{CallMetaDataProvider, ProcedureColumn, ProcedureLookup};
use sqlcall_types::{ParameterDirection, ParameterSpec, RowMapper, SqlType};

use crate::call_string::build_call_string;
use crate::config::CallConfig;
use crate::error::{Error, Result};
use crate::matching::{MatchedArguments, ParameterSource, match_arguments_to_parameters};
use crate::reconcile::{ReconciledParameterList, reconcile};

/// Everything known about one call while it is being prepared.
///
/// Built from a [`CallConfig`] and the provider for the target database.
/// [`process_parameters`](Self::process_parameters) fills in the output
/// parameter names and the authoritative function return name; after that
/// the context is only read.
#[derive(Debug, Clone)]
pub struct CallContext {
    procedure_name: String,
    catalog_name: Option<String>,
    schema_name: Option<String>,
    is_function: bool,
    return_value_required: bool,
    function_return_name: String,
    limited_in_parameter_names: Vec<String>,
    access_call_parameter_metadata: bool,
    out_parameter_names: Vec<String>,
    provider: Arc<dyn CallMetaDataProvider>,
}

impl CallContext {
    /// Create a context for a call definition.
    pub fn new(config: &CallConfig, provider: Arc<dyn CallMetaDataProvider>) -> Self {
        Self {
            procedure_name: config.procedure_name.clone(),
            catalog_name: config.catalog_name.clone(),
            schema_name: config.schema_name.clone(),
            is_function: config.is_function,
            return_value_required: config.return_value_required,
            function_return_name: config.function_return_name.clone(),
            limited_in_parameter_names: config.limited_in_parameter_names.clone(),
            access_call_parameter_metadata: config.access_call_parameter_metadata,
            out_parameter_names: Vec::new(),
            provider,
        }
    }

    /// Get the procedure or function name.
    #[must_use]
    pub fn procedure_name(&self) -> &str {
        &self.procedure_name
    }

    /// Get the catalog (package).
    #[must_use]
    pub fn catalog_name(&self) -> Option<&str> {
        self.catalog_name.as_deref()
    }

    /// Get the schema.
    #[must_use]
    pub fn schema_name(&self) -> Option<&str> {
        self.schema_name.as_deref()
    }

    /// Check if the call targets a function.
    #[must_use]
    pub fn is_function(&self) -> bool {
        self.is_function
    }

    /// Check if a return value is bound.
    #[must_use]
    pub fn is_return_value_required(&self) -> bool {
        self.return_value_required
    }

    /// Get the function return name.
    #[must_use]
    pub fn function_return_name(&self) -> &str {
        &self.function_return_name
    }

    /// Get the limited IN parameter names.
    #[must_use]
    pub fn limited_in_parameter_names(&self) -> &[String] {
        &self.limited_in_parameter_names
    }

    /// Check if procedure column metadata was requested.
    #[must_use]
    pub fn access_call_parameter_metadata(&self) -> bool {
        self.access_call_parameter_metadata
    }

    /// Get the output parameter names found by the last reconciliation.
    #[must_use]
    pub fn out_parameter_names(&self) -> &[String] {
        &self.out_parameter_names
    }

    /// Get the provider.
    #[must_use]
    pub fn provider(&self) -> &dyn CallMetaDataProvider {
        self.provider.as_ref()
    }

    /// Build the column lookup for this call.
    #[must_use]
    pub fn procedure_lookup(&self) -> ProcedureLookup {
        ProcedureLookup::for_call(
            self.provider(),
            self.catalog_name(),
            self.schema_name(),
            &self.procedure_name,
        )
    }

    /// Reconcile declared parameters with introspected columns and record
    /// the resulting output names and function return name.
    pub fn process_parameters(
        &mut self,
        declared: &[Arc<ParameterSpec>],
        discovered: &[ProcedureColumn],
    ) -> Result<ReconciledParameterList> {
        let reconciled = reconcile(declared, discovered, self)?;
        self.out_parameter_names = reconciled.out_parameter_names().to_vec();
        self.function_return_name = reconciled.function_return_name().to_owned();
        Ok(reconciled)
    }

    /// Build the escape-syntax call string.
    #[must_use]
    pub fn create_call_string(&self, parameters: &ReconciledParameterList) -> String {
        build_call_string(self, parameters)
    }

    /// Match argument values to the reconciled parameters.
    pub fn match_in_parameter_values(
        &self,
        parameters: &ReconciledParameterList,
        source: &dyn ParameterSource,
    ) -> Result<MatchedArguments> {
        match_arguments_to_parameters(parameters, source, self.provider())
    }

    /// Get the name of the single scalar output of the call.
    ///
    /// For a function this is the return name. For a procedure it is the
    /// first output parameter; a warning is logged when there are several.
    #[must_use]
    pub fn scalar_out_parameter_name(&self) -> Option<&str> {
        if self.is_function {
            return Some(&self.function_return_name);
        }
        if self.out_parameter_names.len() > 1 {
            tracing::warn!(
                procedure = %self.procedure_name,
                out_parameters = ?self.out_parameter_names,
                "more than one out parameter; using the first as the scalar result"
            );
        }
        self.out_parameter_names.first().map(String::as_str)
    }

    /// Create the parameter that carries a returned result set.
    ///
    /// A plain result set parameter when the database returns result sets
    /// directly, a ref cursor OUT parameter when it returns them through
    /// cursors.
    pub fn create_return_result_set_parameter(
        &self,
        name: impl Into<String>,
        row_mapper: Option<Arc<dyn RowMapper>>,
    ) -> Result<ParameterSpec> {
        let name = name.into();
        let spec = if self.provider.is_return_result_set_supported() {
            ParameterSpec::with_optional_name(
                Some(name),
                ParameterDirection::ResultSet,
                SqlType::OTHER,
            )
        } else if self.provider.is_ref_cursor_supported() {
            ParameterSpec::output(name, self.provider.ref_cursor_sql_type())
        } else {
            return Err(Error::Configuration(format!(
                "returning a result set from a stored procedure is not supported on {}",
                self.provider.family()
            )));
        };

        Ok(match row_mapper {
            Some(mapper) => spec.with_shared_row_mapper(mapper),
            None => spec,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sqlcall_metadata::{DatabaseInfo, create_provider};
    use sqlcall_types::{SqlValue, TypeError};

    fn context(product: &str, config: CallConfig) -> CallContext {
        let provider = create_provider(DatabaseInfo::new(product), config.is_function, true);
        CallContext::new(&config, provider)
    }

    #[test]
    fn test_result_set_parameter_per_family() {
        let mapper: Arc<dyn RowMapper> =
            Arc::new(|row: &[SqlValue], _: usize| -> std::result::Result<SqlValue, TypeError> {
                Ok(row[0].clone())
            });

        let ctx = context("MySQL", CallConfig::procedure("list_users"));
        let spec = ctx
            .create_return_result_set_parameter("users", Some(mapper.clone()))
            .unwrap();
        assert!(spec.is_results_parameter());
        assert!(spec.row_mapper().is_some());

        let ctx = context("Oracle", CallConfig::procedure("list_users"));
        let spec = ctx.create_return_result_set_parameter("users", None).unwrap();
        assert!(spec.is_output());
        assert_eq!(spec.sql_type(), SqlType::ORACLE_CURSOR);

        let ctx = context("PostgreSQL", CallConfig::procedure("list_users"));
        let spec = ctx.create_return_result_set_parameter("users", Some(mapper)).unwrap();
        assert_eq!(spec.sql_type(), SqlType::OTHER);
        assert!(spec.row_mapper().is_some());
    }

    #[test]
    fn test_scalar_out_parameter_name() {
        let mut ctx = context("MySQL", CallConfig::procedure("p").access_metadata(false));
        assert_eq!(ctx.scalar_out_parameter_name(), None);

        let declared = vec![
            Arc::new(ParameterSpec::output("total", SqlType::INTEGER)),
            Arc::new(ParameterSpec::output("count", SqlType::INTEGER)),
        ];
        ctx.process_parameters(&declared, &[]).unwrap();
        assert_eq!(ctx.scalar_out_parameter_name(), Some("total"));

        let ctx = context("MySQL", CallConfig::function("f"));
        assert_eq!(ctx.scalar_out_parameter_name(), Some("return"));
    }

    #[test]
    fn test_procedure_lookup_uses_provider_rules() {
        let provider = create_provider(
            DatabaseInfo::new("PostgreSQL").stores_lower_case(),
            false,
            true,
        );
        let ctx = CallContext::new(&CallConfig::procedure("Add_User"), provider);
        let lookup = ctx.procedure_lookup();
        assert_eq!(lookup.procedure_name, "add_user");
        assert_eq!(lookup.schema.as_deref(), Some("public"));
    }
}
