//! The registration contract: how a logical type advertises its properties.
//!
//! A [`TypeSpec`] is the declaration side of the system — an ordered list of
//! [`PropertySpec`]s, a named accessor table, an optional parent tag, and an
//! auto-detection policy for properties that carry no explicit role set.
//! Declarations are inert until the registry resolves them into a cached
//! [`crate::property::ClassPropertySet`].
use std::{collections::BTreeMap, sync::Arc};

use bitflags::bitflags;

use crate::{
    format::{PropertyFormatter, RecordFormatter},
    record::{RawAccessor, TypeTag},
};

bitflags! {
    /// Which operation categories a property participates in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Roles: u8 {
        const EQUALS = 1 << 0;
        const HASH = 1 << 1;
        const STRING = 1 << 2;
    }
}

impl Roles {
    pub const ALL: Roles = Roles::all();
}

/// How undeclared-role properties are picked up, mirroring the origin of the
/// accessor they were declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
pub enum AutoDetectPolicy {
    /// Include field-origin properties with every role.
    Field,
    /// Include zero-argument-method-origin properties with every role.
    Method,
    /// Only explicitly tagged properties participate.
    #[default]
    Explicit,
}

/// Whether a property was declared as a field read or a zero-argument
/// method invocation. Purely descriptive here — both shapes bind to the
/// same [`RawAccessor`] form — but the auto-detection policy selects on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum PropertyOrigin {
    Field,
    Method,
}

/// Shallow versus deep treatment of object-array property values.
///
/// Shallow compares and hashes array elements one level deep and treats
/// nested arrays as opaque (two distinct nested arrays are never
/// shallow-equal); deep descends recursively. Rendering is always deep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
pub enum ArrayMode {
    #[default]
    Shallow,
    Deep,
}

/// Declaration of a single property.
#[derive(Clone)]
pub struct PropertySpec {
    pub(crate) name: String,
    pub(crate) origin: PropertyOrigin,
    pub(crate) roles: Option<Roles>,
    pub(crate) mode: ArrayMode,
    pub(crate) formatter: Option<Arc<dyn PropertyFormatter>>,
}

impl PropertySpec {
    /// Declare a field-origin property.
    pub fn field(name: impl Into<String>) -> Self {
        PropertySpec {
            name: name.into(),
            origin: PropertyOrigin::Field,
            roles: None,
            mode: ArrayMode::default(),
            formatter: None,
        }
    }

    /// Declare a zero-argument-method-origin property.
    pub fn method(name: impl Into<String>) -> Self {
        PropertySpec {
            origin: PropertyOrigin::Method,
            ..PropertySpec::field(name)
        }
    }

    /// Explicitly set the operation categories this property belongs to.
    /// Without this, membership follows the type's auto-detection policy.
    pub fn roles(mut self, roles: Roles) -> Self {
        self.roles = Some(roles);
        self
    }

    /// Configure shallow or deep object-array handling.
    pub fn array_mode(mut self, mode: ArrayMode) -> Self {
        self.mode = mode;
        self
    }

    /// Attach a custom per-property formatter.
    pub fn formatter(mut self, formatter: Arc<dyn PropertyFormatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }
}

/// Declaration of a logical type: its tag, optional parent, properties, and
/// the accessor table the resolver binds property names against.
#[derive(Clone)]
pub struct TypeSpec {
    pub(crate) tag: TypeTag,
    pub(crate) parent: Option<TypeTag>,
    pub(crate) auto_detect: AutoDetectPolicy,
    pub(crate) properties: Vec<PropertySpec>,
    pub(crate) accessors: BTreeMap<String, RawAccessor>,
    pub(crate) formatter: Option<Arc<dyn RecordFormatter>>,
}

impl TypeSpec {
    pub fn new(tag: TypeTag) -> Self {
        TypeSpec {
            tag,
            parent: None,
            auto_detect: AutoDetectPolicy::default(),
            properties: Vec::new(),
            accessors: BTreeMap::new(),
            formatter: None,
        }
    }

    /// Declare this type as a subtype of `parent`. Parent properties are
    /// inherited, deduplicated by name with this type's declarations winning.
    pub fn parent(mut self, parent: TypeTag) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn auto_detect(mut self, policy: AutoDetectPolicy) -> Self {
        self.auto_detect = policy;
        self
    }

    /// Append a property declaration. Declaration order is preserved in the
    /// resolved property sequences.
    pub fn property(mut self, property: PropertySpec) -> Self {
        self.properties.push(property);
        self
    }

    /// Register the accessor backing the property of the same name. Subtypes
    /// should re-register accessors for inherited properties so reads bind
    /// against their own concrete Rust type.
    pub fn accessor(mut self, name: impl Into<String>, accessor: RawAccessor) -> Self {
        self.accessors.insert(name.into(), accessor);
        self
    }

    /// Attach a custom type-level formatter. Inherited by subtypes that do
    /// not attach their own.
    pub fn formatter(mut self, formatter: Arc<dyn RecordFormatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    pub fn tag(&self) -> TypeTag {
        self.tag
    }
}
