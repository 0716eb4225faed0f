//! # sqlcall-derive
//!
//! `#[derive(ParameterSource)]` lets a struct supply argument values for a
//! stored-procedure call. Each field becomes a named value; the field type
//! must implement `sqlcall_types::ToSql`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sqlcall_derive::ParameterSource;
//!
//! #[derive(ParameterSource)]
//! struct NewUser {
//!     user_name: String,
//!     #[sqlcall(rename = "mail")]
//!     email: Option<String>,
//!     #[sqlcall(skip)]
//!     draft: bool,
//! }
//!
//! let args = call.match_arguments(&new_user)?;
//! ```

#![warn(missing_docs)]

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Expr, ExprLit, Fields, Lit, parse_macro_input};

/// Field configuration extracted from attributes.
#[derive(Default)]
struct FieldConfig {
    /// Value name to use instead of the field name.
    rename: Option<String>,
    /// Leave this field out.
    skip: bool,
}

/// Struct-level configuration extracted from attributes.
#[derive(Default)]
struct StructConfig {
    /// Rename all fields using a casing convention.
    rename_all: Option<String>,
}

const RENAME_ALL_STYLES: [&str; 4] = ["snake_case", "camelCase", "PascalCase", "SCREAMING_SNAKE_CASE"];

fn string_value(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<String> {
    let value: Expr = meta.value()?.parse()?;
    match value {
        Expr::Lit(ExprLit {
            lit: Lit::Str(lit), ..
        }) => Ok(lit.value()),
        other => Err(syn::Error::new_spanned(other, "expected a string literal")),
    }
}

fn parse_field_config(attrs: &[Attribute]) -> syn::Result<FieldConfig> {
    let mut config = FieldConfig::default();

    for attr in attrs {
        if !attr.path().is_ident("sqlcall") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                config.rename = Some(string_value(&meta)?);
            } else if meta.path.is_ident("skip") {
                config.skip = true;
            } else {
                return Err(meta.error("unknown sqlcall field attribute"));
            }
            Ok(())
        })?;
    }

    Ok(config)
}

fn parse_struct_config(attrs: &[Attribute]) -> syn::Result<StructConfig> {
    let mut config = StructConfig::default();

    for attr in attrs {
        if !attr.path().is_ident("sqlcall") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                let style = string_value(&meta)?;
                if !RENAME_ALL_STYLES.contains(&style.as_str()) {
                    return Err(meta.error(format!(
                        "unsupported rename_all style `{style}`; expected one of {}",
                        RENAME_ALL_STYLES.join(", ")
                    )));
                }
                config.rename_all = Some(style);
            } else {
                return Err(meta.error("unknown sqlcall struct attribute"));
            }
            Ok(())
        })?;
    }

    Ok(config)
}

/// Convert a field name according to the `rename_all` setting.
fn apply_rename_all(name: &str, rename_all: Option<&str>) -> String {
    match rename_all {
        Some("snake_case") => to_snake_case(name),
        Some("camelCase") => to_camel_case(name),
        Some("PascalCase") => to_pascal_case(name),
        Some("SCREAMING_SNAKE_CASE") => to_snake_case(name).to_uppercase(),
        _ => name.to_owned(),
    }
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 && !result.ends_with('_') {
                result.push('_');
            }
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

fn to_camel_case(s: &str) -> String {
    let pascal = to_pascal_case(s);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn to_pascal_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = true;
    for c in s.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }
    result
}

/// Derive `sqlcall::ParameterSource` for a struct with named fields.
///
/// ## Attributes
///
/// - `#[sqlcall(rename = "name")]` on a field: use a different value name
/// - `#[sqlcall(skip)]` on a field: leave the field out
/// - `#[sqlcall(rename_all = "...")]` on the struct: `snake_case`,
///   `camelCase`, `PascalCase` or `SCREAMING_SNAKE_CASE`
#[proc_macro_derive(ParameterSource, attributes(sqlcall))]
pub fn derive_parameter_source(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match impl_parameter_source(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn impl_parameter_source(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let struct_config = parse_struct_config(&input.attrs)?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "ParameterSource can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "ParameterSource can only be derived for structs",
            ));
        }
    };

    let mut value_names = Vec::new();
    let mut field_idents = Vec::new();

    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let config = parse_field_config(&field.attrs)?;
        if config.skip {
            continue;
        }

        let field_name = ident.to_string();
        let field_name = field_name.strip_prefix("r#").unwrap_or(&field_name);
        let value_name = config.rename.unwrap_or_else(|| {
            apply_rename_all(field_name, struct_config.rename_all.as_deref())
        });

        if value_names.contains(&value_name) {
            return Err(syn::Error::new_spanned(
                field,
                format!("duplicate parameter value name `{value_name}`"),
            ));
        }
        value_names.push(value_name);
        field_idents.push(ident);
    }

    Ok(quote! {
        impl #impl_generics ::sqlcall::ParameterSource for #name #ty_generics #where_clause {
            fn parameter_names(&self) -> ::std::vec::Vec<::std::string::String> {
                ::std::vec![#(::std::string::String::from(#value_names)),*]
            }

            fn has_value(&self, name: &str) -> bool {
                const NAMES: &[&str] = &[#(#value_names),*];
                NAMES.contains(&name)
            }

            fn value(
                &self,
                name: &str,
            ) -> ::std::result::Result<
                ::std::option::Option<::sqlcall::sqlcall_types::SqlValue>,
                ::sqlcall::sqlcall_types::TypeError,
            > {
                match name {
                    #(
                        #value_names => ::sqlcall::sqlcall_types::ToSql::to_sql(&self.#field_idents)
                            .map(::std::option::Option::Some),
                    )*
                    _ => ::std::result::Result::Ok(::std::option::Option::None),
                }
            }
        }
    })
}
