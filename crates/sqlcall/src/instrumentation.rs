//! Tracing and OpenTelemetry instrumentation for call preparation.
//!
//! Every compile runs inside `tracing` spans named after [`span_names`].
//! With the `otel` feature enabled, [`InstrumentationContext`] additionally
//! emits OpenTelemetry spans through the global tracer provider, using the
//! database semantic conventions:
//!
//! - `db.system`: database family (`mssql`, `oracle`, `postgresql`, ...)
//! - `db.sql.procedure`: qualified procedure name
//! - `db.statement`: the compiled call string

#[cfg(feature = "otel")]
use opentelemetry::{
    KeyValue, global,
    trace::{Span, SpanKind, Status, Tracer},
};
use sqlcall_metadata::{DatabaseFamily, ProcedureLookup};

/// Span names for call preparation.
pub mod span_names {
    /// Span name for compiling a call.
    pub const COMPILE: &str = "sqlcall.compile";
    /// Span name for the procedure column lookup.
    pub const INTROSPECT: &str = "sqlcall.introspect";
    /// Span name for parameter reconciliation.
    pub const RECONCILE: &str = "sqlcall.reconcile";
    /// Span name for argument matching.
    pub const MATCH_ARGUMENTS: &str = "sqlcall.match_arguments";
}

/// Attribute keys following OpenTelemetry semantic conventions.
pub mod attributes {
    /// Database system type.
    pub const DB_SYSTEM: &str = "db.system";
    /// Qualified procedure name.
    pub const DB_PROCEDURE: &str = "db.sql.procedure";
    /// `procedure` or `function`.
    pub const DB_CALL_KIND: &str = "db.sql.call_kind";
    /// Compiled call string.
    pub const DB_STATEMENT: &str = "db.statement";
    /// Number of reconciled parameters.
    pub const DB_PARAMETER_COUNT: &str = "db.sql.parameter_count";
    /// Error type.
    pub const ERROR_TYPE: &str = "error.type";
}

/// Get the `db.system` value for a database family.
#[must_use]
pub fn db_system(family: DatabaseFamily) -> &'static str {
    family.as_str()
}

/// Get the `db.sql.call_kind` value.
#[must_use]
pub fn call_kind(is_function: bool) -> &'static str {
    if is_function { "function" } else { "procedure" }
}

/// Create the span covering a whole compile.
///
/// `db.system` is recorded once the database is known.
pub fn compile_span(procedure: &str, is_function: bool) -> tracing::Span {
    tracing::debug_span!(
        span_names::COMPILE,
        db.sql.procedure = procedure,
        db.sql.call_kind = call_kind(is_function),
        db.system = tracing::field::Empty,
    )
}

/// Create the span covering the procedure column lookup.
pub fn introspect_span(lookup: &ProcedureLookup, family: DatabaseFamily) -> tracing::Span {
    tracing::debug_span!(
        span_names::INTROSPECT,
        db.system = db_system(family),
        db.sql.procedure = %lookup.qualified_name(),
    )
}

/// Create the span covering reconciliation.
pub fn reconcile_span(procedure: &str, declared: usize, discovered: usize) -> tracing::Span {
    tracing::trace_span!(
        span_names::RECONCILE,
        db.sql.procedure = procedure,
        declared,
        discovered,
    )
}

/// Create the span covering argument matching.
pub fn match_span(parameters: usize) -> tracing::Span {
    tracing::trace_span!(span_names::MATCH_ARGUMENTS, parameters)
}

/// OpenTelemetry context for compile spans.
#[cfg(feature = "otel")]
#[derive(Debug, Clone)]
pub struct InstrumentationContext {
    /// Database family.
    pub family: DatabaseFamily,
}

#[cfg(feature = "otel")]
impl InstrumentationContext {
    /// Create a new instrumentation context.
    #[must_use]
    pub fn new(family: DatabaseFamily) -> Self {
        Self { family }
    }

    /// Get base attributes for spans.
    pub fn base_attributes(&self) -> Vec<KeyValue> {
        vec![KeyValue::new(attributes::DB_SYSTEM, db_system(self.family))]
    }

    /// Create a compile span.
    pub fn compile_span(&self, procedure: &str, is_function: bool) -> impl Span {
        let tracer = global::tracer("sqlcall");
        let mut attrs = self.base_attributes();
        attrs.push(KeyValue::new(attributes::DB_PROCEDURE, procedure.to_owned()));
        attrs.push(KeyValue::new(attributes::DB_CALL_KIND, call_kind(is_function)));

        tracer
            .span_builder(span_names::COMPILE)
            .with_kind(SpanKind::Internal)
            .with_attributes(attrs)
            .start(&tracer)
    }

    /// Record an error on a span.
    pub fn record_error(span: &mut impl Span, error: &crate::error::Error) {
        let error_type = if error.is_configuration_error() {
            "configuration"
        } else if error.is_metadata_error() {
            "metadata"
        } else {
            "type"
        };
        span.set_attribute(KeyValue::new(attributes::ERROR_TYPE, error_type));
        span.set_status(Status::error(error.to_string()));
        span.record_error(error);
    }

    /// Record a successful compile.
    pub fn record_success(span: &mut impl Span, call_string: &str, parameter_count: usize) {
        span.set_attribute(KeyValue::new(attributes::DB_STATEMENT, call_string.to_owned()));
        span.set_attribute(KeyValue::new(
            attributes::DB_PARAMETER_COUNT,
            i64::try_from(parameter_count).unwrap_or(i64::MAX),
        ));
        span.set_status(Status::Ok);
    }
}

/// No-op instrumentation context when the otel feature is disabled.
#[cfg(not(feature = "otel"))]
#[derive(Debug, Clone)]
pub struct InstrumentationContext {
    /// Database family.
    pub family: DatabaseFamily,
}

#[cfg(not(feature = "otel"))]
impl InstrumentationContext {
    /// Create a new instrumentation context (no-op).
    #[must_use]
    pub fn new(family: DatabaseFamily) -> Self {
        Self { family }
    }
}
