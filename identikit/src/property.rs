//! Resolved property metadata.
//!
//! A [`PropertyDescriptor`] is the immutable, bound form of one declared
//! property; a [`ClassPropertySet`] is the per-type collection of
//! descriptors partitioned into the equality, hash, and string sequences.
//! Both are created once during resolution and never mutated, so they are
//! freely shared across threads.
use std::sync::Arc;

use smallvec::SmallVec;

use crate::{
    declare::{ArrayMode, PropertyOrigin, Roles},
    format::{PropertyFormatter, RecordFormatter},
    record::{RawAccessor, TypeTag},
};

type Descriptors = SmallVec<[Arc<PropertyDescriptor>; 8]>;

/// Immutable metadata for one property, with its accessor already bound for
/// the concrete type owning the set.
pub struct PropertyDescriptor {
    pub(crate) name: String,
    pub(crate) declared_by: TypeTag,
    pub(crate) origin: PropertyOrigin,
    pub(crate) roles: Roles,
    pub(crate) mode: ArrayMode,
    pub(crate) formatter: Option<Arc<dyn PropertyFormatter>>,
    pub(crate) accessor: RawAccessor,
}

impl PropertyDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The tag of the type whose declaration this descriptor carries; for
    /// inherited properties this is the ancestor, not the owning type.
    pub fn declared_by(&self) -> TypeTag {
        self.declared_by
    }

    pub fn origin(&self) -> PropertyOrigin {
        self.origin
    }

    pub fn roles(&self) -> Roles {
        self.roles
    }

    pub fn array_mode(&self) -> ArrayMode {
        self.mode
    }

    pub fn formatter(&self) -> Option<&Arc<dyn PropertyFormatter>> {
        self.formatter.as_ref()
    }

    pub(crate) fn accessor(&self) -> &RawAccessor {
        &self.accessor
    }
}

impl std::fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("declared_by", &self.declared_by)
            .field("origin", &self.origin)
            .field("roles", &self.roles)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

/// The resolved property collection for one concrete type.
///
/// Sequences preserve declaration order: inherited properties first, at the
/// position of their ancestral declaration, then the type's own additions.
/// The set also records the *equality root* — the most ancestral tag whose
/// equality-property names match this type's — which is what the
/// compatibility resolver compares.
pub struct ClassPropertySet {
    pub(crate) tag: TypeTag,
    pub(crate) all: Descriptors,
    pub(crate) equals_props: Descriptors,
    pub(crate) hash_props: Descriptors,
    pub(crate) string_props: Descriptors,
    pub(crate) equality_root: TypeTag,
    pub(crate) formatter: Arc<dyn RecordFormatter>,
}

impl ClassPropertySet {
    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    pub fn properties(&self) -> &[Arc<PropertyDescriptor>] {
        &self.all
    }

    pub fn equals_properties(&self) -> &[Arc<PropertyDescriptor>] {
        &self.equals_props
    }

    pub fn hash_properties(&self) -> &[Arc<PropertyDescriptor>] {
        &self.hash_props
    }

    pub fn string_properties(&self) -> &[Arc<PropertyDescriptor>] {
        &self.string_props
    }

    pub fn equality_root(&self) -> TypeTag {
        self.equality_root
    }

    pub(crate) fn record_formatter(&self) -> &Arc<dyn RecordFormatter> {
        &self.formatter
    }

    pub fn by_name(&self, name: &str) -> Option<&Arc<PropertyDescriptor>> {
        // Property counts are small; a scan beats a side table here.
        self.all.iter().find(|descriptor| descriptor.name == name)
    }

    pub(crate) fn equals_names(&self) -> impl Iterator<Item = &str> {
        self.equals_props.iter().map(|d| d.name.as_str())
    }
}

impl std::fmt::Debug for ClassPropertySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassPropertySet")
            .field("tag", &self.tag)
            .field("all", &self.all)
            .field("equality_root", &self.equality_root)
            .finish_non_exhaustive()
    }
}

/// Whether two resolved types may validly be compared for equality.
///
/// Pure function over the two set descriptions: compatible iff their
/// equality roots coincide, i.e. neither side carries equality state the
/// other lacks. This makes cross-type equality symmetric and rejects
/// subtypes that introduce additional equality properties.
pub fn compatible_for_equals(left: &ClassPropertySet, right: &ClassPropertySet) -> bool {
    left.equality_root == right.equality_root
}
