//! The per-type operation bundle: `equals`, `hash_code`, `render`, `diff`.
//!
//! A [`Bundle`] is a cheap handle over the cached, immutable property set
//! for its type plus the registry core it may need to resolve the property
//! sets of compatible subtypes. Instances are passed as
//! `Option<&dyn Record>` so the null-argument contracts of each operation
//! can be honored: `equals` tolerates a null `other`, nothing else
//! tolerates null anywhere.
use std::{fmt, ptr, sync::Arc};

use crate::{
    diff::{DiffResult, ValueDifference},
    engine::{HASH_MULTIPLIER, HASH_SEED, value_hash, values_equal},
    error::{KitError, KitResult},
    format::append_default_value,
    property::{ClassPropertySet, PropertyDescriptor, compatible_for_equals},
    record::{Record, TypeTag},
    registry::RegistryCore,
    value::Value,
};

/// The resolved, shareable operation set for one registered type.
#[derive(Clone)]
pub struct Bundle {
    core: Arc<RegistryCore>,
    props: Arc<ClassPropertySet>,
}

impl Bundle {
    pub(crate) fn new(core: Arc<RegistryCore>, props: Arc<ClassPropertySet>) -> Self {
        Bundle { core, props }
    }

    pub fn type_tag(&self) -> TypeTag {
        self.props.tag()
    }

    pub fn property_set(&self) -> &ClassPropertySet {
        &self.props
    }

    /// Whether instances of `other` may validly be compared for equality
    /// against instances of this bundle's type. Unregistered or
    /// unresolvable tags are never compatible.
    pub fn is_compatible_for_equality(&self, other: TypeTag) -> bool {
        if other == self.props.tag() {
            return true;
        }
        match self.core.resolve(other) {
            Ok(set) => compatible_for_equals(&self.props, &set),
            Err(_) => false,
        }
    }

    /// Structural equality over the equality-property sequence.
    ///
    /// Evaluation order is part of the contract: identity first, then the
    /// compatibility check of `other`'s type, and only then property reads
    /// in declared order with a short-circuit on the first mismatch — so an
    /// incompatible or identical `other` never triggers an accessor.
    pub fn equals(
        &self,
        instance: Option<&dyn Record>,
        other: Option<&dyn Record>,
    ) -> KitResult<bool> {
        let instance = instance.ok_or(KitError::NullArgument("instance"))?;
        let Some(other) = other else {
            return Ok(false);
        };
        if same_instance(instance, other) {
            return Ok(true);
        }
        if !self.is_compatible_for_equality(other.type_tag()) {
            return Ok(false);
        }

        let left = self.side_set(instance.type_tag())?;
        let right = self.side_set(other.type_tag())?;
        for descriptor in self.props.equals_properties() {
            let left_value = self.read_value(&left, descriptor, instance)?;
            let right_value = self.read_value(&right, descriptor, other)?;
            if !values_equal(&left_value, &right_value, descriptor.array_mode()) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// 32-bit structural hash over the hash-property sequence, accumulated
    /// as `h = h * 31 + property_hash` from seed 1 with wrapping
    /// arithmetic. Equal instances always hash equally.
    pub fn hash_code(&self, instance: Option<&dyn Record>) -> KitResult<i32> {
        let instance = instance.ok_or(KitError::NullArgument("instance"))?;
        let side = self.side_set(instance.type_tag())?;
        let mut hash = HASH_SEED;
        for descriptor in self.props.hash_properties() {
            let value = self.read_value(&side, descriptor, instance)?;
            hash = hash
                .wrapping_mul(HASH_MULTIPLIER)
                .wrapping_add(value_hash(&value, descriptor.array_mode()));
        }
        Ok(hash)
    }

    /// Render the string-property sequence through the type's record
    /// formatter and each property's value formatter.
    pub fn render(&self, instance: Option<&dyn Record>) -> KitResult<String> {
        let instance = instance.ok_or(KitError::NullArgument("instance"))?;
        let side = self.side_set(instance.type_tag())?;
        let formatter = self.props.record_formatter();

        let mut out = String::new();
        formatter.append_type_prefix(&mut out, self.props.tag());
        for (index, descriptor) in self.props.string_properties().iter().enumerate() {
            formatter.append_property_prefix(&mut out, descriptor, index);
            let value = self.read_value(&side, descriptor, instance)?;
            match descriptor.formatter() {
                Some(property_formatter) => property_formatter.append_value(&mut out, &value),
                None => append_default_value(&mut out, &value),
            }
            formatter.append_property_suffix(&mut out, descriptor, index);
        }
        formatter.append_type_suffix(&mut out, self.props.tag());
        Ok(out)
    }

    /// Report every differing equality property between two compatible
    /// instances. Unlike `equals`, both sides must be non-null and both
    /// sides' types are compatibility-checked, and evaluation does not stop
    /// at the first difference.
    pub fn diff(
        &self,
        instance: Option<&dyn Record>,
        other: Option<&dyn Record>,
    ) -> KitResult<DiffResult> {
        let instance = instance.ok_or(KitError::NullArgument("instance"))?;
        let other = other.ok_or(KitError::NullArgument("other"))?;
        if same_instance(instance, other) {
            return Ok(DiffResult::NoDifferences);
        }
        self.check_compatible(instance, "instance")?;
        self.check_compatible(other, "other")?;

        let left = self.side_set(instance.type_tag())?;
        let right = self.side_set(other.type_tag())?;
        let mut differences = Vec::new();
        for descriptor in self.props.equals_properties() {
            let left_value = self.read_value(&left, descriptor, instance)?;
            let right_value = self.read_value(&right, descriptor, other)?;
            if !values_equal(&left_value, &right_value, descriptor.array_mode()) {
                differences.push(ValueDifference {
                    property: descriptor.name().to_string(),
                    left: left_value,
                    right: right_value,
                });
            }
        }
        if differences.is_empty() {
            Ok(DiffResult::NoDifferences)
        } else {
            Ok(DiffResult::PropertyDifferences(differences))
        }
    }

    fn check_compatible(&self, record: &dyn Record, label: &'static str) -> KitResult<()> {
        if self.is_compatible_for_equality(record.type_tag()) {
            Ok(())
        } else {
            Err(KitError::Incompatible {
                label,
                actual: record.type_tag(),
                expected: self.props.tag(),
            })
        }
    }

    // The resolved set whose bound accessors can read `tag` instances.
    fn side_set(&self, tag: TypeTag) -> KitResult<Arc<ClassPropertySet>> {
        if tag == self.props.tag() {
            Ok(self.props.clone())
        } else {
            Ok(self.core.resolve(tag)?)
        }
    }

    fn read_value(
        &self,
        side: &Arc<ClassPropertySet>,
        descriptor: &Arc<PropertyDescriptor>,
        record: &dyn Record,
    ) -> KitResult<Value> {
        let bound = if side.tag() == self.props.tag() {
            descriptor
        } else {
            side.by_name(descriptor.name())
                .ok_or_else(|| KitError::Incompatible {
                    label: "instance",
                    actual: side.tag(),
                    expected: self.props.tag(),
                })?
        };
        bound.accessor().as_ref()(record).map_err(|source| KitError::Accessor {
                property: descriptor.name().to_string(),
                tag: side.tag(),
                source,
            })
    }
}

impl fmt::Debug for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bundle")
            .field("type_tag", &self.props.tag())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let list = |f: &mut fmt::Formatter<'_>, props: &[Arc<PropertyDescriptor>]| {
            f.write_str("{")?;
            for (index, descriptor) in props.iter().enumerate() {
                if index > 0 {
                    f.write_str(",")?;
                }
                f.write_str(descriptor.name())?;
            }
            f.write_str("}")
        };

        write!(f, "Bundle for {} with equals properties ", self.props.tag())?;
        list(f, self.props.equals_properties())?;
        f.write_str(", hash properties ")?;
        list(f, self.props.hash_properties())?;
        f.write_str(", and string properties ")?;
        list(f, self.props.string_properties())?;
        Ok(())
    }
}

// Address identity plus tag identity; the tag check keeps zero-sized
// records of different types from aliasing through a shared address.
fn same_instance(left: &dyn Record, right: &dyn Record) -> bool {
    ptr::addr_eq(left as *const dyn Record, right as *const dyn Record)
        && left.type_tag() == right.type_tag()
}
