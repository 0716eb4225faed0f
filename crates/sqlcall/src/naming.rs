//! Parameter name normalization.

use sqlcall_metadata::CallMetaDataProvider;

/// Normalize a name for matching: provider rules, then lower case.
pub fn normalize_name(provider: &dyn CallMetaDataProvider, name: &str) -> String {
    provider.parameter_name_to_use(name).to_lowercase()
}

/// Convert an underscored column-style name to a property-style name.
///
/// `user_name` becomes `userName`. Characters not following an underscore
/// are lower-cased, so `userName` becomes `username`. When the second
/// character is an underscore the first is upper-cased (`a_b` becomes `AB`).
pub fn convert_underscore_name_to_property_name(name: &str) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut result = String::with_capacity(name.len());
    if name[first.len_utf8()..].starts_with('_') {
        result.extend(first.to_uppercase());
    } else {
        result.extend(first.to_lowercase());
    }

    let mut next_is_upper = false;
    for c in chars {
        if c == '_' {
            next_is_upper = true;
        } else if next_is_upper {
            result.extend(c.to_uppercase());
            next_is_upper = false;
        } else {
            result.extend(c.to_lowercase());
        }
    }
    result
}

/// Check whether two names denote the same property.
pub(crate) fn property_names_match(a: &str, b: &str) -> bool {
    convert_underscore_name_to_property_name(a)
        .eq_ignore_ascii_case(&convert_underscore_name_to_property_name(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlcall_metadata::{DatabaseInfo, create_provider};

    #[test]
    fn test_property_name_conversion() {
        assert_eq!(convert_underscore_name_to_property_name("user_name"), "userName");
        assert_eq!(convert_underscore_name_to_property_name("USER_NAME"), "userName");
        assert_eq!(convert_underscore_name_to_property_name("userName"), "username");
        assert_eq!(convert_underscore_name_to_property_name("a_b"), "AB");
        assert_eq!(convert_underscore_name_to_property_name("x"), "x");
        assert_eq!(convert_underscore_name_to_property_name(""), "");
        assert_eq!(convert_underscore_name_to_property_name("in__id"), "inId");
    }

    #[test]
    fn test_property_names_match() {
        assert!(property_names_match("user_name", "userName"));
        assert!(property_names_match("FIRST_NAME", "firstName"));
        assert!(!property_names_match("user_id", "userName"));
    }

    #[test]
    fn test_normalize_name() {
        let provider = create_provider(DatabaseInfo::new("Microsoft SQL Server"), false, true);
        assert_eq!(normalize_name(provider.as_ref(), "@UserName"), "username");

        let provider = create_provider(DatabaseInfo::new("Oracle").stores_upper_case(), false, true);
        assert_eq!(normalize_name(provider.as_ref(), "p_Id"), "p_id");
    }
}
