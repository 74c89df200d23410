//! Pluggable rendering for record values and record layout.
//!
//! Two capability traits drive `render`: [`PropertyFormatter`] turns one
//! property value into text, [`RecordFormatter`] owns the type-level and
//! per-property prefixes and suffixes. Custom implementations decorate the
//! defaults by explicit delegation rather than implementation inheritance:
//!
//! ```
//! use identikit::{DefaultRecordFormatter, RecordFormatter, TypeTag};
//!
//! struct Branded;
//!
//! impl RecordFormatter for Branded {
//!     fn append_type_prefix(&self, out: &mut String, tag: TypeTag) {
//!         out.push_str("PREFIX");
//!         DefaultRecordFormatter.append_type_prefix(out, tag);
//!     }
//!     fn append_type_suffix(&self, out: &mut String, tag: TypeTag) {
//!         DefaultRecordFormatter.append_type_suffix(out, tag);
//!     }
//!     fn append_property_prefix(
//!         &self,
//!         out: &mut String,
//!         property: &identikit::PropertyDescriptor,
//!         index: usize,
//!     ) {
//!         DefaultRecordFormatter.append_property_prefix(out, property, index);
//!     }
//!     fn append_property_suffix(
//!         &self,
//!         out: &mut String,
//!         property: &identikit::PropertyDescriptor,
//!         index: usize,
//!     ) {
//!         DefaultRecordFormatter.append_property_suffix(out, property, index);
//!     }
//! }
//! ```
use std::fmt::{Display, Write};

use crate::{property::PropertyDescriptor, record::TypeTag, value::Value};

/// Renders a single property value.
pub trait PropertyFormatter: Send + Sync {
    fn append_value(&self, out: &mut String, value: &Value);
}

/// The default value rendering: deep, type-aware array expansion.
pub struct DefaultPropertyFormatter;

impl PropertyFormatter for DefaultPropertyFormatter {
    fn append_value(&self, out: &mut String, value: &Value) {
        append_default_value(out, value);
    }
}

/// Type-level layout of a rendered record. The default layout is
/// `TypeName{a: {1}, b: {2}}`.
pub trait RecordFormatter: Send + Sync {
    fn append_type_prefix(&self, out: &mut String, tag: TypeTag);
    fn append_type_suffix(&self, out: &mut String, tag: TypeTag);
    fn append_property_prefix(&self, out: &mut String, property: &PropertyDescriptor, index: usize);
    fn append_property_suffix(&self, out: &mut String, property: &PropertyDescriptor, index: usize);
}

/// The canonical `TypeName{name: {value}, ...}` layout.
pub struct DefaultRecordFormatter;

impl RecordFormatter for DefaultRecordFormatter {
    fn append_type_prefix(&self, out: &mut String, tag: TypeTag) {
        out.push_str(tag.name());
        out.push('{');
    }

    fn append_type_suffix(&self, out: &mut String, _tag: TypeTag) {
        out.push('}');
    }

    fn append_property_prefix(
        &self,
        out: &mut String,
        property: &PropertyDescriptor,
        index: usize,
    ) {
        if index > 0 {
            out.push_str(", ");
        }
        out.push_str(property.name());
        out.push_str(": {");
    }

    fn append_property_suffix(
        &self,
        out: &mut String,
        _property: &PropertyDescriptor,
        _index: usize,
    ) {
        out.push('}');
    }
}

/// Append the default rendering of `value` to `out`.
///
/// Null renders as the literal `null`. Arrays always expand deeply,
/// whatever the property's comparison mode; char array elements are quoted,
/// with control characters hex-escaped (`'0x1f'`).
pub fn append_default_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(v) => {
            let _ = write!(out, "{v}");
        }
        Value::I8(v) => {
            let _ = write!(out, "{v}");
        }
        Value::I16(v) => {
            let _ = write!(out, "{v}");
        }
        Value::I32(v) => {
            let _ = write!(out, "{v}");
        }
        Value::I64(v) => {
            let _ = write!(out, "{v}");
        }
        Value::F32(v) => {
            let _ = write!(out, "{v}");
        }
        Value::F64(v) => {
            let _ = write!(out, "{v}");
        }
        Value::Char(v) => out.push(*v),
        Value::Str(v) => out.push_str(v),
        Value::Object(v) => v.obj_display(out),
        Value::BoolArray(vs) => append_slice(out, vs),
        Value::I8Array(vs) => append_slice(out, vs),
        Value::I16Array(vs) => append_slice(out, vs),
        Value::I32Array(vs) => append_slice(out, vs),
        Value::I64Array(vs) => append_slice(out, vs),
        Value::F32Array(vs) => append_slice(out, vs),
        Value::F64Array(vs) => append_slice(out, vs),
        Value::CharArray(vs) => append_char_slice(out, vs),
        Value::ObjectArray(vs) => {
            out.push('[');
            for (index, element) in vs.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                append_default_value(out, element);
            }
            out.push(']');
        }
    }
}

fn append_slice<T: Display>(out: &mut String, elements: &[T]) {
    out.push('[');
    for (index, element) in elements.iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{element}");
    }
    out.push(']');
}

fn append_char_slice(out: &mut String, elements: &[char]) {
    out.push('[');
    for (index, element) in elements.iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        out.push('\'');
        if element.is_control() {
            let _ = write!(out, "0x{:x}", *element as u32);
        } else {
            out.push(*element);
        }
        out.push('\'');
    }
    out.push(']');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(value: &Value) -> String {
        let mut out = String::new();
        append_default_value(&mut out, value);
        out
    }

    #[test]
    fn null_renders_as_literal() {
        assert_eq!(rendered(&Value::Null), "null");
    }

    #[test]
    fn primitive_arrays_render_bracketed() {
        assert_eq!(rendered(&Value::from(vec![1_i32, 2, 3])), "[1, 2, 3]");
        assert_eq!(rendered(&Value::from(vec![true, false])), "[true, false]");
        assert_eq!(rendered(&Value::from(Vec::<i64>::new())), "[]");
    }

    #[test]
    fn char_arrays_quote_and_escape_control_characters() {
        let value = Value::from(vec!['a', '\u{1f}', 'b']);
        assert_eq!(rendered(&value), "['a', '0x1f', 'b']");
    }

    #[test]
    fn object_arrays_expand_deeply() {
        let value = Value::from(vec![
            Value::from("x"),
            Value::from(vec![Value::from(1_i32), Value::Null]),
        ]);
        assert_eq!(rendered(&value), "[x, [1, null]]");
    }

    #[test]
    fn opaque_objects_render_through_display() {
        assert_eq!(rendered(&Value::opaque(42_u16)), "42");
    }
}
