//! Call definition configuration.
//!
//! A [`CallConfig`] names the procedure or function to call and controls how
//! its parameters are reconciled. It can be built in code or parsed from a
//! descriptor string in `key=value;` form:
//!
//! ```rust
//! use sqlcall::CallConfig;
//!
//! let config = CallConfig::from_descriptor(
//!     "Function=get_balance;Schema=billing;ReturnName=balance;Metadata=yes",
//! )?;
//!
//! assert!(config.is_function);
//! assert_eq!(config.schema_name.as_deref(), Some("billing"));
//! # Ok::<(), sqlcall::Error>(())
//! ```
//!
//! | Key | Aliases | Value |
//! |-----|---------|-------|
//! | `Procedure` | `Proc` | procedure name |
//! | `Function` | | function name |
//! | `Catalog` | `Package` | catalog or package |
//! | `Schema` | `Owner` | schema |
//! | `ReturnValue` | | boolean |
//! | `ReturnName` | | name of the function return parameter |
//! | `Metadata` | `AccessMetadata` | boolean |
//! | `InParameters` | | comma-separated IN parameter names |

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

/// Name used for the function return parameter unless configured.
pub const DEFAULT_FUNCTION_RETURN_NAME: &str = "return";

/// Configuration for one procedure or function call.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct CallConfig {
    /// Procedure or function name.
    pub procedure_name: String,
    /// Whether the call targets a function.
    pub is_function: bool,
    /// Catalog, or package for Oracle.
    pub catalog_name: Option<String>,
    /// Schema.
    pub schema_name: Option<String>,
    /// Whether the call binds a return value (`? = call ...`).
    pub return_value_required: bool,
    /// Name of the function return parameter.
    pub function_return_name: String,
    /// IN parameters to synthesize from metadata; empty means all.
    pub limited_in_parameter_names: Vec<String>,
    /// Whether procedure column metadata is looked up.
    pub access_call_parameter_metadata: bool,
}

impl Default for CallConfig {
    fn default() -> Self {
        Self {
            procedure_name: String::new(),
            is_function: false,
            catalog_name: None,
            schema_name: None,
            return_value_required: false,
            function_return_name: DEFAULT_FUNCTION_RETURN_NAME.to_owned(),
            limited_in_parameter_names: Vec::new(),
            access_call_parameter_metadata: true,
        }
    }
}

impl CallConfig {
    /// Create a configuration for a stored procedure.
    pub fn procedure(name: impl Into<String>) -> Self {
        Self {
            procedure_name: name.into(),
            ..Self::default()
        }
    }

    /// Create a configuration for a function.
    pub fn function(name: impl Into<String>) -> Self {
        Self {
            procedure_name: name.into(),
            is_function: true,
            ..Self::default()
        }
    }

    /// Parse a `key=value;` descriptor.
    ///
    /// Keys are case-insensitive. Unknown keys are ignored. Exactly one of
    /// `Procedure` and `Function` must be given.
    pub fn from_descriptor(descriptor: &str) -> Result<Self> {
        let mut config = Self::default();
        let mut procedure: Option<String> = None;
        let mut function: Option<String> = None;

        for part in descriptor.split(';') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| Error::Configuration(format!("invalid key-value: {part}")))?;

            let key = key.trim().to_lowercase();
            let value = value.trim();

            match key.as_str() {
                "procedure" | "proc" => procedure = Some(value.to_owned()),
                "function" => function = Some(value.to_owned()),
                "catalog" | "package" => config.catalog_name = non_empty(value),
                "schema" | "owner" => config.schema_name = non_empty(value),
                "returnvalue" | "return value" => {
                    config.return_value_required = parse_bool(&key, value)?;
                }
                "returnname" | "return name" => {
                    if value.is_empty() {
                        return Err(Error::Configuration("ReturnName cannot be empty".into()));
                    }
                    config.function_return_name = value.to_owned();
                }
                "metadata" | "accessmetadata" | "access metadata" => {
                    config.access_call_parameter_metadata = parse_bool(&key, value)?;
                }
                "inparameters" | "in parameters" => {
                    config.limited_in_parameter_names = value
                        .split(',')
                        .map(str::trim)
                        .filter(|name| !name.is_empty())
                        .map(str::to_owned)
                        .collect();
                }
                _ => {
                    tracing::debug!(key = key, "ignoring unknown call descriptor key");
                }
            }
        }

        match (procedure, function) {
            (Some(name), None) => {
                config.procedure_name = name;
            }
            (None, Some(name)) => {
                config.procedure_name = name;
                config.is_function = true;
            }
            (Some(_), Some(_)) => {
                return Err(Error::Configuration(
                    "descriptor names both a procedure and a function".into(),
                ));
            }
            (None, None) => {
                return Err(Error::Configuration(
                    "descriptor must name a procedure or a function".into(),
                ));
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the catalog (Oracle package).
    #[must_use]
    pub fn catalog(mut self, catalog: impl Into<String>) -> Self {
        self.catalog_name = Some(catalog.into());
        self
    }

    /// Set the schema.
    #[must_use]
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema_name = Some(schema.into());
        self
    }

    /// Require a bound return value even for a procedure.
    #[must_use]
    pub fn return_value(mut self, required: bool) -> Self {
        self.return_value_required = required;
        self
    }

    /// Set the function return parameter name.
    #[must_use]
    pub fn function_return_name(mut self, name: impl Into<String>) -> Self {
        self.function_return_name = name.into();
        self
    }

    /// Restrict which undeclared IN parameters are taken from metadata.
    #[must_use]
    pub fn in_parameter_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.limited_in_parameter_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable the procedure column metadata lookup.
    #[must_use]
    pub fn access_metadata(mut self, access: bool) -> Self {
        self.access_call_parameter_metadata = access;
        self
    }

    /// Check the names in this configuration.
    pub fn validate(&self) -> Result<()> {
        validate_identifier(&self.procedure_name)?;
        for qualifier in [&self.catalog_name, &self.schema_name].into_iter().flatten() {
            if !qualifier.is_empty() {
                validate_identifier(qualifier)?;
            }
        }
        if self.function_return_name.is_empty() {
            return Err(Error::Configuration(
                "function return name cannot be empty".into(),
            ));
        }
        Ok(())
    }

    /// Get `catalog.schema.name`, skipping absent or empty parts.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        [self.catalog_name.as_deref(), self.schema_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .chain(std::iter::once(self.procedure_name.as_str()))
            .collect::<Vec<_>>()
            .join(".")
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_owned())
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    if value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("yes") || value == "1" {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") || value.eq_ignore_ascii_case("no") || value == "0"
    {
        Ok(false)
    } else {
        Err(Error::Configuration(format!(
            "invalid boolean for {key}: {value}"
        )))
    }
}

/// Validate a procedure, catalog or schema name.
///
/// Names must start with a letter or underscore, contain only
/// alphanumerics, `_`, `@`, `#` or `$`, and be 1-128 characters long.
pub fn validate_identifier(name: &str) -> Result<()> {
    #[allow(clippy::expect_used)]
    static IDENTIFIER_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_@#$]{0,127}$").expect("identifier pattern is valid")
    });

    if name.is_empty() {
        return Err(Error::InvalidIdentifier(
            "identifier cannot be empty".into(),
        ));
    }

    if !IDENTIFIER_RE.is_match(name) {
        return Err(Error::InvalidIdentifier(format!(
            "invalid identifier '{name}': must start with letter/underscore, \
             contain only alphanumerics/_/@/#/$, and be 1-128 characters"
        )));
    }

    Ok(())
}
