//! Structural identity operations for record-like types.
//!
//! `identikit` synthesizes equality, hashing, textual rendering, and
//! field-level diffing for arbitrary record-like types from a per-type
//! declaration of "properties" — named reads partitioned into equality,
//! hash, and string categories. A type is resolved once into an immutable
//! property set, cached for the process lifetime, and exposed as a
//! [`Bundle`] whose operations honor the classic identity contracts:
//! reflexivity, symmetry, hash consistency with equality, and well-behaved
//! comparison across declared subtype relationships.
//!
//! ```
//! use identikit::{accessor, PropertySpec, Record, Registry, TypeSpec, TypeTag, Value};
//!
//! const POINT: TypeTag = TypeTag::new("Point");
//!
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! impl Record for Point {
//!     fn type_tag(&self) -> TypeTag {
//!         POINT
//!     }
//! }
//!
//! let registry = Registry::new();
//! registry
//!     .register(
//!         TypeSpec::new(POINT)
//!             .property(PropertySpec::field("x"))
//!             .property(PropertySpec::field("y"))
//!             .auto_detect(identikit::AutoDetectPolicy::Field)
//!             .accessor("x", accessor(|p: &Point| Value::from(p.x)))
//!             .accessor("y", accessor(|p: &Point| Value::from(p.y))),
//!     )
//!     .unwrap();
//!
//! let bundle = registry.bundle_for(POINT).unwrap();
//! let a = Point { x: 1, y: 2 };
//! let b = Point { x: 1, y: 2 };
//! assert!(bundle.equals(Some(&a), Some(&b)).unwrap());
//! assert_eq!(bundle.render(Some(&a)).unwrap(), "Point{x: {1}, y: {2}}");
//! ```

pub mod bundle;
pub mod declare;
pub mod diff;
pub mod engine;
pub mod error;
pub mod format;
pub mod property;
pub mod record;
pub mod registry;
pub mod value;

pub use bundle::Bundle;
pub use declare::{ArrayMode, AutoDetectPolicy, PropertyOrigin, PropertySpec, Roles, TypeSpec};
pub use diff::{DiffResult, ValueDifference};
pub use error::{AccessError, ConfigError, KitError, KitResult};
pub use format::{
    DefaultPropertyFormatter, DefaultRecordFormatter, PropertyFormatter, RecordFormatter,
    append_default_value,
};
pub use property::{ClassPropertySet, PropertyDescriptor, compatible_for_equals};
pub use record::{RawAccessor, Record, TypeTag, accessor, fallible_accessor};
pub use registry::Registry;
pub use value::{ObjectValue, Opaque, Value};

/// Equality through the global registry, using `instance`'s own type.
pub fn equals(instance: &dyn Record, other: Option<&dyn Record>) -> KitResult<bool> {
    Registry::global()
        .bundle_for(instance.type_tag())?
        .equals(Some(instance), other)
}

/// Hash through the global registry, using `instance`'s own type.
pub fn hash_code(instance: &dyn Record) -> KitResult<i32> {
    Registry::global()
        .bundle_for(instance.type_tag())?
        .hash_code(Some(instance))
}

/// Rendering through the global registry, using `instance`'s own type.
pub fn render(instance: &dyn Record) -> KitResult<String> {
    Registry::global()
        .bundle_for(instance.type_tag())?
        .render(Some(instance))
}

/// Diff through the global registry, using `instance`'s own type.
pub fn diff(instance: &dyn Record, other: &dyn Record) -> KitResult<DiffResult> {
    Registry::global()
        .bundle_for(instance.type_tag())?
        .diff(Some(instance), Some(other))
}
