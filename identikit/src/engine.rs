//! Value-level comparison and hash algorithms.
//!
//! These are the array-aware primitives the per-type operations are built
//! on. Hashes are 32-bit with wrapping arithmetic: accumulation starts from
//! [`HASH_SEED`] and folds each contribution as `h * 31 + next`, and every
//! scalar kind hashes exactly the way the reference semantics define
//! (bit-pattern hashes for floats, folded halves for 64-bit values, the
//! classic 31-polynomial for text).
use std::sync::Arc;

use crate::{declare::ArrayMode, value::Value};

/// Starting value of every hash accumulation.
pub const HASH_SEED: i32 = 1;
/// Per-property and per-element hash multiplier.
pub const HASH_MULTIPLIER: i32 = 31;
/// Hash contribution of a null value.
pub const NULL_HASH: i32 = 0;
/// Stand-in contribution for nested arrays under shallow hashing. Shallow
/// mode never considers two distinct nested arrays equal, so a fixed marker
/// keeps the hash contract intact.
const SHALLOW_ARRAY_HASH: i32 = 17;

/// Structural equality of two property values under the given object-array
/// mode.
///
/// Mismatched kinds — array versus non-array, or arrays of different
/// element kinds — are always unequal. Floats compare by bit pattern, so
/// NaN equals NaN and `0.0` differs from `-0.0`, keeping equality aligned
/// with [`value_hash`].
pub fn values_equal(left: &Value, right: &Value, mode: ArrayMode) -> bool {
    use Value::*;
    match (left, right) {
        (Null, Null) => true,
        (Bool(a), Bool(b)) => a == b,
        (I8(a), I8(b)) => a == b,
        (I16(a), I16(b)) => a == b,
        (I32(a), I32(b)) => a == b,
        (I64(a), I64(b)) => a == b,
        (F32(a), F32(b)) => a.to_bits() == b.to_bits(),
        (F64(a), F64(b)) => a.to_bits() == b.to_bits(),
        (Char(a), Char(b)) => a == b,
        (Str(a), Str(b)) => a == b,
        (Object(a), Object(b)) => Arc::ptr_eq(a, b) || a.obj_eq(b.as_ref()),
        (BoolArray(a), BoolArray(b)) => a == b,
        (I8Array(a), I8Array(b)) => a == b,
        (I16Array(a), I16Array(b)) => a == b,
        (I32Array(a), I32Array(b)) => a == b,
        (I64Array(a), I64Array(b)) => a == b,
        (F32Array(a), F32Array(b)) => {
            a.len() == b.len()
                && a.iter()
                    .zip(b.iter())
                    .all(|(x, y)| x.to_bits() == y.to_bits())
        }
        (F64Array(a), F64Array(b)) => {
            a.len() == b.len()
                && a.iter()
                    .zip(b.iter())
                    .all(|(x, y)| x.to_bits() == y.to_bits())
        }
        (CharArray(a), CharArray(b)) => a == b,
        (ObjectArray(a), ObjectArray(b)) => {
            a.len() == b.len()
                && match mode {
                    ArrayMode::Deep => a
                        .iter()
                        .zip(b.iter())
                        .all(|(x, y)| values_equal(x, y, ArrayMode::Deep)),
                    ArrayMode::Shallow => a
                        .iter()
                        .zip(b.iter())
                        .all(|(x, y)| shallow_elements_equal(x, y)),
                }
        }
        _ => false,
    }
}

// Element equality without descent: nested arrays are opaque objects here,
// and two distinct ones are never equal.
fn shallow_elements_equal(left: &Value, right: &Value) -> bool {
    if left.is_array() || right.is_array() {
        return false;
    }
    values_equal(left, right, ArrayMode::Shallow)
}

/// 32-bit structural hash of a property value under the given object-array
/// mode. Equal values (per [`values_equal`] with the same mode) always hash
/// equally.
pub fn value_hash(value: &Value, mode: ArrayMode) -> i32 {
    match value {
        Value::Null => NULL_HASH,
        Value::Bool(v) => hash_bool(*v),
        Value::I8(v) => *v as i32,
        Value::I16(v) => *v as i32,
        Value::I32(v) => *v,
        Value::I64(v) => hash_i64(*v),
        Value::F32(v) => v.to_bits() as i32,
        Value::F64(v) => hash_f64(*v),
        Value::Char(v) => *v as i32,
        Value::Str(v) => text_hash(v),
        Value::Object(v) => v.obj_hash(),
        Value::BoolArray(vs) => fold_hash(vs.iter().map(|v| hash_bool(*v))),
        Value::I8Array(vs) => fold_hash(vs.iter().map(|v| *v as i32)),
        Value::I16Array(vs) => fold_hash(vs.iter().map(|v| *v as i32)),
        Value::I32Array(vs) => fold_hash(vs.iter().copied()),
        Value::I64Array(vs) => fold_hash(vs.iter().map(|v| hash_i64(*v))),
        Value::F32Array(vs) => fold_hash(vs.iter().map(|v| v.to_bits() as i32)),
        Value::F64Array(vs) => fold_hash(vs.iter().map(|v| hash_f64(*v))),
        Value::CharArray(vs) => fold_hash(vs.iter().map(|v| *v as i32)),
        Value::ObjectArray(vs) => fold_hash(vs.iter().map(|element| match mode {
            ArrayMode::Deep => value_hash(element, ArrayMode::Deep),
            ArrayMode::Shallow if element.is_array() => SHALLOW_ARRAY_HASH,
            ArrayMode::Shallow => value_hash(element, ArrayMode::Shallow),
        })),
    }
}

/// The 31-polynomial text hash (`h = h * 31 + code_point`), so
/// `text_hash("hello")` matches the widely known reference value.
pub fn text_hash(text: &str) -> i32 {
    text.chars()
        .fold(0_i32, |h, c| h.wrapping_mul(31).wrapping_add(c as i32))
}

fn fold_hash(contributions: impl Iterator<Item = i32>) -> i32 {
    contributions.fold(HASH_SEED, |h, next| {
        h.wrapping_mul(HASH_MULTIPLIER).wrapping_add(next)
    })
}

fn hash_bool(value: bool) -> i32 {
    if value { 1231 } else { 1237 }
}

fn hash_i64(value: i64) -> i32 {
    let wide = value as u64;
    (wide ^ (wide >> 32)) as i32
}

fn hash_f64(value: f64) -> i32 {
    let bits = value.to_bits();
    (bits ^ (bits >> 32)) as i32
}

/// Deep structural equality; used by [`crate::diff::ValueDifference`] and
/// by tests. Per-property comparison inside the engines goes through
/// [`values_equal`] with the property's configured mode instead.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        values_equal(self, other, ArrayMode::Deep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_kinds_are_unequal() {
        let cases = [
            (Value::from(1_i32), Value::from(1_i64)),
            (Value::from("x"), Value::from(vec![Value::from("x")])),
            (Value::from(vec![1_i32]), Value::from(vec![1_i64])),
            (Value::from(vec![1_i8]), Value::from(1_i8)),
            (Value::Null, Value::from(0_i32)),
        ];
        for (left, right) in cases {
            assert!(!values_equal(&left, &right, ArrayMode::Deep));
            assert!(!values_equal(&right, &left, ArrayMode::Deep));
        }
    }

    #[test]
    fn floats_compare_by_bit_pattern() {
        assert!(values_equal(
            &Value::from(f64::NAN),
            &Value::from(f64::NAN),
            ArrayMode::Shallow,
        ));
        assert!(!values_equal(
            &Value::from(0.0_f64),
            &Value::from(-0.0_f64),
            ArrayMode::Shallow,
        ));
    }

    #[test]
    fn deep_mode_descends_into_nested_arrays() {
        let nested = || Value::from(vec![Value::from(vec![Value::from(1_i32)])]);
        assert!(values_equal(&nested(), &nested(), ArrayMode::Deep));
        assert!(!values_equal(&nested(), &nested(), ArrayMode::Shallow));
    }

    #[test]
    fn shallow_mode_still_compares_scalar_elements() {
        let left = Value::from(vec![Value::from("a"), Value::Null]);
        let right = Value::from(vec![Value::from("a"), Value::Null]);
        assert!(values_equal(&left, &right, ArrayMode::Shallow));

        let different = Value::from(vec![Value::from("b"), Value::Null]);
        assert!(!values_equal(&left, &different, ArrayMode::Shallow));
    }

    #[test]
    fn text_hash_matches_reference_value() {
        assert_eq!(text_hash("hello"), 99_162_322);
        assert_eq!(text_hash(""), 0);
    }

    #[test]
    fn scalar_hashes_follow_reference_semantics() {
        assert_eq!(value_hash(&Value::from(true), ArrayMode::Deep), 1231);
        assert_eq!(value_hash(&Value::from(false), ArrayMode::Deep), 1237);
        assert_eq!(value_hash(&Value::from('A'), ArrayMode::Deep), 65);
        assert_eq!(value_hash(&Value::Null, ArrayMode::Deep), NULL_HASH);
        // high and low halves fold together: 1 ^ 1 == 0
        assert_eq!(
            value_hash(&Value::from(0x1_0000_0001_i64), ArrayMode::Deep),
            0
        );
    }

    #[test]
    fn array_hashes_accumulate_from_seed_one() {
        assert_eq!(
            value_hash(&Value::from(Vec::<i32>::new()), ArrayMode::Deep),
            HASH_SEED
        );
        assert_eq!(
            value_hash(&Value::from(vec![true]), ArrayMode::Deep),
            31 + 1231
        );
        assert_eq!(
            value_hash(&Value::from(vec![1_i32, 2]), ArrayMode::Deep),
            (31 + 1) * 31 + 2
        );
    }

    #[test]
    fn equal_object_arrays_hash_equally_in_both_modes() {
        for mode in [ArrayMode::Shallow, ArrayMode::Deep] {
            let left = Value::from(vec![Value::from("a"), Value::from(3_i32)]);
            let right = Value::from(vec![Value::from("a"), Value::from(3_i32)]);
            assert!(values_equal(&left, &right, mode));
            assert_eq!(value_hash(&left, mode), value_hash(&right, mode));
        }
    }
}
