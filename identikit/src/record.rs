//! Record instances, symbolic type identity, and accessor binding.
//!
//! The engines never look at Rust's own type hierarchy: a record reports a
//! symbolic [`TypeTag`], and parent/child relationships between tags are
//! declared at registration. This keeps cross-type equality a pure function
//! over property-set descriptions instead of inheritance-based dispatch.
use std::{any::type_name, fmt, sync::Arc};

use downcast_rs::{DowncastSync, impl_downcast};

use crate::{error::AccessError, value::Value};

/// Symbolic identity of a logical record type.
///
/// Tags are compared by name; two registrations with the same tag describe
/// the same logical type regardless of which Rust types back them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeTag(&'static str);

impl TypeTag {
    pub const fn new(name: &'static str) -> Self {
        TypeTag(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// An instance the identity operations can be applied to.
///
/// Implementations only need to report their concrete tag; property reads go
/// through the accessors registered for that tag.
pub trait Record: DowncastSync {
    fn type_tag(&self) -> TypeTag;
}
impl_downcast!(sync Record);

/// An accessor bound to a property name: a single read operation against an
/// arbitrary instance of the registering type.
///
/// Accessors are resolved once per type at bundle-construction time; the
/// hot-path operations invoke the stored closure directly.
pub type RawAccessor = Arc<dyn Fn(&dyn Record) -> Result<Value, AccessError> + Send + Sync>;

/// Build a [`RawAccessor`] from a typed, infallible read.
///
/// The downcast to `T` happens inside the returned closure; a mismatched
/// instance surfaces as [`AccessError::WrongInstanceType`] rather than a
/// panic.
pub fn accessor<T, F>(read: F) -> RawAccessor
where
    T: Record,
    F: Fn(&T) -> Value + Send + Sync + 'static,
{
    Arc::new(move |record: &dyn Record| {
        let typed = record
            .downcast_ref::<T>()
            .ok_or_else(|| AccessError::WrongInstanceType {
                expected: type_name::<T>(),
                actual: record.type_tag(),
            })?;
        Ok(read(typed))
    })
}

/// Build a [`RawAccessor`] from a typed read that may itself fail.
///
/// Caller failures are propagated unmodified as [`AccessError::Custom`];
/// they are never coerced into a default value.
pub fn fallible_accessor<T, F>(read: F) -> RawAccessor
where
    T: Record,
    F: Fn(&T) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> + Send + Sync + 'static,
{
    Arc::new(move |record: &dyn Record| {
        let typed = record
            .downcast_ref::<T>()
            .ok_or_else(|| AccessError::WrongInstanceType {
                expected: type_name::<T>(),
                actual: record.type_tag(),
            })?;
        read(typed).map_err(AccessError::from)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Point {
        x: i32,
    }

    impl Record for Point {
        fn type_tag(&self) -> TypeTag {
            TypeTag::new("Point")
        }
    }

    struct NotAPoint;

    impl Record for NotAPoint {
        fn type_tag(&self) -> TypeTag {
            TypeTag::new("NotAPoint")
        }
    }

    #[test]
    fn typed_accessor_reads_through_dyn_record() {
        let read = accessor(|p: &Point| Value::from(p.x));
        let point = Point { x: 9 };
        assert!(matches!(read(&point), Ok(Value::I32(9))));
    }

    #[test]
    fn typed_accessor_rejects_wrong_instance_type() {
        let read = accessor(|p: &Point| Value::from(p.x));
        let err = read(&NotAPoint).unwrap_err();
        assert!(matches!(err, AccessError::WrongInstanceType { .. }));
    }
}
