//! Dynamic property values.
//!
//! Accessors surface every property read as a [`Value`]: null, one of the
//! eight primitive kinds, text, an opaque object, or an array of any of
//! those. Keeping the arrays as dedicated variants (rather than a generic
//! `Vec<Value>` for everything) is what lets the comparison, hashing, and
//! rendering engines special-case each primitive element kind the way the
//! operation contracts require.
use std::{
    fmt,
    hash::{DefaultHasher, Hash, Hasher},
    sync::Arc,
};

use downcast_rs::{DowncastSync, impl_downcast};

/// A dynamically typed property value.
///
/// `Object` holds an opaque caller value behind [`ObjectValue`]; object
/// arrays hold further `Value`s so nested arrays can be descended into when
/// a property is configured for deep comparison.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Char(char),
    Str(String),
    Object(Arc<dyn ObjectValue>),
    BoolArray(Vec<bool>),
    I8Array(Vec<i8>),
    I16Array(Vec<i16>),
    I32Array(Vec<i32>),
    I64Array(Vec<i64>),
    F32Array(Vec<f32>),
    F64Array(Vec<f64>),
    CharArray(Vec<char>),
    ObjectArray(Vec<Value>),
}

impl Value {
    /// Wrap any [`ObjectValue`] implementation.
    pub fn object<T: ObjectValue>(value: T) -> Self {
        Value::Object(Arc::new(value))
    }

    /// Wrap an ordinary `PartialEq + Hash + Display` value as an opaque object.
    pub fn opaque<T>(value: T) -> Self
    where
        T: PartialEq + Hash + fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        Value::object(Opaque(value))
    }

    /// Whether this value is an array of any element kind.
    pub fn is_array(&self) -> bool {
        matches!(
            self,
            Value::BoolArray(_)
                | Value::I8Array(_)
                | Value::I16Array(_)
                | Value::I32Array(_)
                | Value::I64Array(_)
                | Value::F32Array(_)
                | Value::F64Array(_)
                | Value::CharArray(_)
                | Value::ObjectArray(_)
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// Capability trait for opaque object values.
///
/// The engines never inspect the payload; they only need structural
/// equality, a 32-bit hash consistent with that equality, and a textual
/// rendering. Implementations must be downcast-friendly so equality can
/// reject payloads of a different concrete type.
pub trait ObjectValue: DowncastSync + fmt::Debug {
    /// Structural equality against another opaque value. Must return false
    /// for payloads of a different concrete type.
    fn obj_eq(&self, other: &dyn ObjectValue) -> bool;

    /// A hash consistent with [`ObjectValue::obj_eq`]: equal values must
    /// produce equal hashes.
    fn obj_hash(&self) -> i32;

    /// Append the textual rendering of this value to `out`.
    fn obj_display(&self, out: &mut String);
}
impl_downcast!(sync ObjectValue);

/// Adapter turning any `PartialEq + Hash + Display` type into an
/// [`ObjectValue`].
#[derive(Debug, Clone)]
pub struct Opaque<T>(pub T);

impl<T> ObjectValue for Opaque<T>
where
    T: PartialEq + Hash + fmt::Display + fmt::Debug + Send + Sync + 'static,
{
    fn obj_eq(&self, other: &dyn ObjectValue) -> bool {
        other
            .downcast_ref::<Opaque<T>>()
            .is_some_and(|other| self.0 == other.0)
    }

    fn obj_hash(&self) -> i32 {
        let mut hasher = DefaultHasher::new();
        self.0.hash(&mut hasher);
        let wide = hasher.finish();
        (wide ^ (wide >> 32)) as i32
    }

    fn obj_display(&self, out: &mut String) {
        use fmt::Write;
        let _ = write!(out, "{}", self.0);
    }
}

macro_rules! value_from {
    ($($variant:ident: $ty:ty),* $(,)?) => {
        $(impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Value::$variant(value)
            }
        })*
    };
}

value_from! {
    Bool: bool,
    I8: i8,
    I16: i16,
    I32: i32,
    I64: i64,
    F32: f32,
    F64: f64,
    Char: char,
    Str: String,
    BoolArray: Vec<bool>,
    I8Array: Vec<i8>,
    I16Array: Vec<i16>,
    I32Array: Vec<i32>,
    I64Array: Vec<i64>,
    F32Array: Vec<f32>,
    F64Array: Vec<f64>,
    CharArray: Vec<char>,
    ObjectArray: Vec<Value>,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_option_maps_none_to_null() {
        assert!(Value::from(None::<i32>).is_null());
        assert!(matches!(Value::from(Some(3_i32)), Value::I32(3)));
    }

    #[test]
    fn opaque_equality_requires_same_payload_type() {
        let a = Opaque(7_u64);
        let b = Opaque(7_u64);
        let c = Opaque("7".to_string());
        assert!(a.obj_eq(&b));
        assert!(!a.obj_eq(&c));
        assert_eq!(a.obj_hash(), b.obj_hash());
    }

    #[test]
    fn array_detection_covers_every_element_kind() {
        assert!(Value::from(vec![true]).is_array());
        assert!(Value::from(vec![1_i64]).is_array());
        assert!(Value::from(vec!['x']).is_array());
        assert!(Value::from(vec![Value::Null]).is_array());
        assert!(!Value::from("text").is_array());
        assert!(!Value::Null.is_array());
    }
}
