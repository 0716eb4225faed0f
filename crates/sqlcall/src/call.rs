//! Stored-procedure and function calls.

use std::fmt;
use std::sync::Arc;

use sqlcall_metadata::{
    CallMetaDataProvider, MetadataSource, ProcedureColumn, create_provider, load_procedure_columns,
};
use sqlcall_types::ParameterSpec;
use tracing::Instrument;

use crate::cache::CallKey;
use crate::config::CallConfig;
use crate::context::CallContext;
use crate::error::Result;
use crate::instrumentation::{self, InstrumentationContext};
use crate::matching::{MatchedArguments, ParameterSource};
use crate::reconcile::ReconciledParameterList;
use crate::state::{CallState, Compiled, Declaring};

/// A stored-procedure or function call.
///
/// ```rust
/// use sqlcall::Call;
/// use sqlcall_metadata::{DatabaseInfo, create_provider};
/// use sqlcall_types::{ParameterSpec, SqlType};
///
/// let call = Call::procedure("ADDUSER")
///     .declare_parameter(ParameterSpec::input("name", SqlType::VARCHAR))
///     .declare_parameter(ParameterSpec::input("age", SqlType::INTEGER))
///     .without_procedure_column_metadata_access();
///
/// let provider = create_provider(DatabaseInfo::new("MySQL"), false, false);
/// let call = call.compile_with(provider, Vec::new())?;
///
/// assert_eq!(call.call_string(), "{call ADDUSER(?, ?)}");
/// # Ok::<(), sqlcall::Error>(())
/// ```
pub struct Call<S: CallState> {
    config: CallConfig,
    declared: Vec<Arc<ParameterSpec>>,
    state: S,
}

impl Call<Declaring> {
    /// Start defining a stored-procedure call.
    pub fn procedure(name: impl Into<String>) -> Self {
        Self::from_config(CallConfig::procedure(name))
    }

    /// Start defining a function call.
    pub fn function(name: impl Into<String>) -> Self {
        Self::from_config(CallConfig::function(name))
    }

    /// Start defining a call from a configuration.
    pub fn from_config(config: CallConfig) -> Self {
        Self {
            config,
            declared: Vec::new(),
            state: Declaring,
        }
    }

    /// Set the catalog (Oracle package).
    #[must_use]
    pub fn catalog(mut self, catalog: impl Into<String>) -> Self {
        self.config.catalog_name = Some(catalog.into());
        self
    }

    /// Set the schema.
    #[must_use]
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.config.schema_name = Some(schema.into());
        self
    }

    /// Declare a parameter.
    #[must_use]
    pub fn declare_parameter(mut self, parameter: ParameterSpec) -> Self {
        self.declared.push(Arc::new(parameter));
        self
    }

    /// Declare a parameter that is shared with other calls.
    #[must_use]
    pub fn declare_shared_parameter(mut self, parameter: Arc<ParameterSpec>) -> Self {
        self.declared.push(parameter);
        self
    }

    /// Declare several parameters, in order.
    #[must_use]
    pub fn declare_parameters<I>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = ParameterSpec>,
    {
        self.declared.extend(parameters.into_iter().map(Arc::new));
        self
    }

    /// Restrict which undeclared IN parameters are taken from metadata.
    #[must_use]
    pub fn use_in_parameter_names<I, N>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.config.limited_in_parameter_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Bind a return value (`? = call ...`) even for a procedure.
    #[must_use]
    pub fn return_value(mut self) -> Self {
        self.config.return_value_required = true;
        self
    }

    /// Set the name the function result is reported under.
    #[must_use]
    pub fn function_return_name(mut self, name: impl Into<String>) -> Self {
        self.config.function_return_name = name.into();
        self
    }

    /// Use declared parameters only; skip the procedure column lookup.
    #[must_use]
    pub fn without_procedure_column_metadata_access(mut self) -> Self {
        self.config.access_call_parameter_metadata = false;
        self
    }

    /// Introspect the procedure and compile the call.
    ///
    /// Fetches database info from `source`, picks the provider, loads the
    /// procedure columns when the provider uses them, then reconciles.
    pub async fn compile(self, source: &dyn MetadataSource) -> Result<Call<Compiled>> {
        self.config.validate()?;

        let span = instrumentation::compile_span(&self.config.qualified_name(), self.config.is_function);
        async move {
            let info = source.database_info().await?;
            let provider = create_provider(
                info,
                self.config.is_function,
                self.config.access_call_parameter_metadata,
            );
            tracing::Span::current().record("db.system", instrumentation::db_system(provider.family()));

            let columns = if provider.is_procedure_column_metadata_used() {
                let lookup = sqlcall_metadata::ProcedureLookup::for_call(
                    provider.as_ref(),
                    self.config.catalog_name.as_deref(),
                    self.config.schema_name.as_deref(),
                    &self.config.procedure_name,
                );
                let introspect = instrumentation::introspect_span(&lookup, provider.family());
                load_procedure_columns(source, &lookup)
                    .instrument(introspect)
                    .await?
            } else {
                Vec::new()
            };

            self.compile_with(provider, columns)
        }
        .instrument(span)
        .await
    }

    /// Compile the call against already fetched metadata.
    pub fn compile_with(
        self,
        provider: Arc<dyn CallMetaDataProvider>,
        columns: Vec<ProcedureColumn>,
    ) -> Result<Call<Compiled>> {
        self.config.validate()?;

        let telemetry = InstrumentationContext::new(provider.family());
        #[cfg(feature = "otel")]
        let mut otel_span =
            telemetry.compile_span(&self.config.qualified_name(), self.config.is_function);

        let mut context = CallContext::new(&self.config, provider);
        let result = context.process_parameters(&self.declared, &columns);

        #[cfg(feature = "otel")]
        {
            if let Err(e) = &result {
                InstrumentationContext::record_error(&mut otel_span, e);
            }
        }
        let parameters = result?;
        let call_string = context.create_call_string(&parameters);

        #[cfg(feature = "otel")]
        InstrumentationContext::record_success(&mut otel_span, &call_string, parameters.len());

        tracing::debug!(
            db.system = instrumentation::db_system(telemetry.family),
            procedure = %self.config.qualified_name(),
            call = %call_string,
            parameters = parameters.len(),
            "compiled call"
        );

        Ok(Call {
            config: self.config,
            declared: self.declared,
            state: Compiled {
                context,
                parameters,
                call_string,
            },
        })
    }
}

impl Call<Compiled> {
    /// Get the escape-syntax call string.
    #[must_use]
    pub fn call_string(&self) -> &str {
        &self.state.call_string
    }

    /// Get the reconciled parameters.
    #[must_use]
    pub fn parameters(&self) -> &ReconciledParameterList {
        &self.state.parameters
    }

    /// Get the reconciliation context.
    #[must_use]
    pub fn context(&self) -> &CallContext {
        &self.state.context
    }

    /// Get the output parameter names.
    #[must_use]
    pub fn out_parameter_names(&self) -> &[String] {
        self.state.context.out_parameter_names()
    }

    /// Get the name the function result is reported under.
    #[must_use]
    pub fn function_return_name(&self) -> &str {
        self.state.context.function_return_name()
    }

    /// Get the name of the single scalar output of the call.
    #[must_use]
    pub fn scalar_out_parameter_name(&self) -> Option<&str> {
        self.state.context.scalar_out_parameter_name()
    }

    /// Match argument values to the call's parameters.
    pub fn match_arguments(&self, source: &dyn ParameterSource) -> Result<MatchedArguments> {
        self.state
            .context
            .match_in_parameter_values(&self.state.parameters, source)
    }
}

impl<S: CallState> Call<S> {
    /// Get the call configuration.
    #[must_use]
    pub fn config(&self) -> &CallConfig {
        &self.config
    }

    /// Get the parameters declared so far.
    #[must_use]
    pub fn declared_parameters(&self) -> &[Arc<ParameterSpec>] {
        &self.declared
    }

    /// Get the key identifying this call in a [`CallCache`](crate::CallCache).
    #[must_use]
    pub fn cache_key(&self) -> CallKey {
        CallKey::from_definition(&self.config, &self.declared)
    }
}

impl<S: CallState> fmt::Debug for Call<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Call")
            .field("procedure", &self.config.qualified_name())
            .field("is_function", &self.config.is_function)
            .field("declared", &self.declared.len())
            .field("state", &std::any::type_name::<S>())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sqlcall_metadata::{DatabaseInfo, ProcedureColumnKind};
    use sqlcall_types::SqlType;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_compiled_call_is_send_sync() {
        assert_send_sync::<Call<Compiled>>();
        assert_send_sync::<Arc<Call<Compiled>>>();
    }

    #[test]
    fn test_compile_with_function_columns() {
        let provider = create_provider(DatabaseInfo::new("MySQL"), true, true);
        let columns = vec![
            ProcedureColumn::new("a", ProcedureColumnKind::In, SqlType::INTEGER, 1),
            ProcedureColumn::new("b", ProcedureColumnKind::In, SqlType::INTEGER, 2),
        ];
        let call = Call::function("GETX")
            .schema("DBO")
            .compile_with(provider, columns)
            .unwrap();
        assert_eq!(call.call_string(), "{? = call DBO.GETX(?, ?)}");
        assert_eq!(call.function_return_name(), "return");
        assert_eq!(call.scalar_out_parameter_name(), Some("return"));
    }

    #[test]
    fn test_invalid_name_rejected_before_reconciling() {
        let provider = create_provider(DatabaseInfo::new("MySQL"), false, false);
        let err = Call::procedure("drop table;")
            .compile_with(provider, Vec::new())
            .unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_debug_shows_state() {
        let call = Call::procedure("p").declare_parameter(ParameterSpec::input("x", SqlType::INTEGER));
        let debug = format!("{call:?}");
        assert!(debug.contains("Declaring"));
        assert!(debug.contains("declared: 1"));
    }
}
