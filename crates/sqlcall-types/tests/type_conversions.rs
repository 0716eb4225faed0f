//! Value conversion edge case tests.
//!
//! Tests edge cases for:
//! - NULL handling
//! - Integer widening and range limits
//! - Type code classification

#![allow(clippy::unwrap_used, clippy::expect_used)]

use bytes::Bytes;
use sqlcall_types::{ParameterDirection, ParameterSpec, SqlType, SqlValue, ToSql, TypeError};

// ============================================================================
// NULL Handling Edge Cases
// ============================================================================

mod null_handling {
    use super::*;

    #[test]
    fn test_option_none_to_sql() {
        let none_value: Option<i32> = None;
        let result = none_value.to_sql().unwrap();
        assert!(result.is_null());
    }

    #[test]
    fn test_option_some_to_sql() {
        let some_value: Option<i32> = Some(42);
        assert_eq!(some_value.to_sql().unwrap(), SqlValue::Int(42));
    }

    #[test]
    fn test_nested_option_reference() {
        let value: Option<&str> = Some("x");
        assert_eq!((&value).to_sql().unwrap(), SqlValue::String("x".into()));
    }

    #[test]
    fn test_null_accessors_return_none() {
        let null = SqlValue::Null;
        assert_eq!(null.as_i32(), None);
        assert_eq!(null.as_str(), None);
        assert_eq!(null.as_bool(), None);
        assert_eq!(null.as_bytes(), None);
    }
}

// ============================================================================
// Numeric Boundaries
// ============================================================================

mod numeric_boundaries {
    use super::*;

    #[test]
    fn test_i64_extremes() {
        assert_eq!(i64::MIN.to_sql().unwrap(), SqlValue::BigInt(i64::MIN));
        assert_eq!(i64::MAX.to_sql().unwrap(), SqlValue::BigInt(i64::MAX));
    }

    #[test]
    fn test_u32_widens_to_bigint() {
        assert_eq!(u32::MAX.to_sql().unwrap(), SqlValue::BigInt(i64::from(u32::MAX)));
    }

    #[test]
    fn test_u64_above_i64_is_out_of_range() {
        let err = (i64::MAX as u64 + 1).to_sql().unwrap_err();
        assert!(matches!(err, TypeError::OutOfRange { .. }));
    }

    #[test]
    fn test_float_to_f64() {
        assert_eq!(SqlValue::Float(1.5).as_f64(), Some(1.5));
    }
}

// ============================================================================
// Binary and Type Codes
// ============================================================================

mod binary_and_codes {
    use super::*;

    #[test]
    fn test_bytes_round_through_value() {
        let data = vec![0u8, 1, 2, 255];
        let value = data.to_sql().unwrap();
        assert_eq!(value.as_bytes(), Some(&data[..]));
        assert_eq!(value, SqlValue::Binary(Bytes::from(data)));
    }

    #[test]
    fn test_sql_type_from_code() {
        let ty: SqlType = 12.into();
        assert_eq!(ty, SqlType::VARCHAR);
        assert_eq!(i32::from(SqlType::ORACLE_CURSOR), -10);
    }

    #[test]
    fn test_parameter_sql_type_preserved() {
        let spec = ParameterSpec::new("amount", ParameterDirection::InOut, SqlType::DECIMAL);
        assert_eq!(spec.sql_type(), SqlType::DECIMAL);
        assert!(spec.is_input() && spec.is_output());
    }
}

// ============================================================================
// Integer Widening Properties
// ============================================================================

mod widening_properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn u64_converts_iff_it_fits_bigint(v in any::<u64>()) {
            match v.to_sql() {
                Ok(value) => prop_assert_eq!(value.as_i64(), Some(v as i64)),
                Err(err) => {
                    prop_assert!(v > i64::MAX as u64);
                    prop_assert!(matches!(err, TypeError::OutOfRange { .. }), "unexpected error");
                }
            }
        }

        #[test]
        fn small_integers_widen_without_loss(a in any::<i16>(), b in any::<u8>()) {
            prop_assert_eq!(a.to_sql().unwrap().as_i64(), Some(i64::from(a)));
            prop_assert_eq!(b.to_sql().unwrap().as_i32(), Some(i32::from(b)));
        }
    }
}
