//! Property-based tests for the builtin object protocols.
//!
//! These check the string and array types against host behavior:
//! 1. String equality agrees with host text equality
//! 2. Array subscripts succeed exactly inside `0..len`
//! 3. String repetition scales the character count

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::redundant_closure_for_method_calls,
    clippy::cast_possible_wrap,
    reason = "Proptest macros generate code with these patterns"
)]

use ail_object::{ErrorKind, ObjRef, Slot, TypeRegistry, Value};
use proptest::prelude::*;

fn string_object(reg: &TypeRegistry, text: &str) -> ObjRef {
    reg.to_object(&Value::string(text)).expect("string construction")
}

fn int_array(reg: &TypeRegistry, len: usize) -> ObjRef {
    let items = (0..len).map(|i| Value::Int(i as i64)).collect();
    reg.new_object(&reg.types().array, &[Value::List(items)])
        .expect("array construction")
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_string_eq_matches_host(a in "\\PC{0,12}", b in "\\PC{0,12}") {
        let reg = TypeRegistry::global();
        let lhs = Value::Object(string_object(reg, &a));
        let rhs = Value::Object(string_object(reg, &b));
        prop_assert_eq!(reg.equals(&lhs, &rhs), a == b);
    }

    #[test]
    fn prop_string_eq_is_reflexive(a in "\\PC{0,12}") {
        let reg = TypeRegistry::global();
        let lhs = Value::Object(string_object(reg, &a));
        let rhs = Value::Object(string_object(reg, &a));
        prop_assert!(reg.equals(&lhs, &rhs));
    }

    #[test]
    fn prop_array_subscript_bounds(len in 0usize..16, index in -4i64..24) {
        let reg = TypeRegistry::global();
        let arr = int_array(reg, len);
        let in_bounds = usize::try_from(index).is_ok_and(|i| i < len);
        match reg.get_item(&arr, &Value::Int(index)) {
            Ok(value) => {
                prop_assert!(in_bounds);
                prop_assert_eq!(value.unwrapped(), Value::Int(index));
            }
            Err(err) => {
                prop_assert!(!in_bounds);
                prop_assert!(err.is(&ErrorKind::IndexError));
            }
        }
    }

    #[test]
    fn prop_array_append_grows_len(len in 0usize..16, extra in 0usize..8) {
        let reg = TypeRegistry::global();
        let arr = int_array(reg, len);
        for i in 0..extra {
            reg.call_method(&arr, "append", &[Value::Int(i as i64)]).unwrap();
        }
        prop_assert_eq!(reg.len(&arr).unwrap(), len + extra);
    }

    #[test]
    fn prop_string_mul_scales_len(text in "\\PC{0,8}", count in -3i64..6) {
        let reg = TypeRegistry::global();
        let s = string_object(reg, &text);
        let repeated = reg.binary_op(&s, Slot::Mul, &Value::Int(count)).unwrap();
        let Value::Str(result) = repeated.unwrapped() else {
            return Err(TestCaseError::fail("repetition should yield text"));
        };
        let expected = text.chars().count() * usize::try_from(count).unwrap_or(0);
        prop_assert_eq!(result.chars().count(), expected);
    }
}
