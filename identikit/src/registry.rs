//! Type declarations, lazy resolution, and the per-type bundle cache.
//!
//! Registration stores inert [`TypeSpec`]s; the first `bundle_for` request
//! for a tag resolves the declaration chain into an immutable
//! [`ClassPropertySet`] (merging inherited properties, selecting per the
//! auto-detection policy, validating roles, and binding accessors) and
//! caches it for the process lifetime. Concurrent first requests may build
//! redundantly, but the first inserted entry wins and every caller
//! converges on it; reads never take a lock beyond the map's own sharding.
use std::{collections::BTreeMap, sync::Arc};

use dashmap::DashMap;
use log::debug;
use once_cell::sync::Lazy;
use smallvec::SmallVec;

use crate::{
    bundle::Bundle,
    declare::{AutoDetectPolicy, PropertyOrigin, PropertySpec, Roles, TypeSpec},
    error::ConfigError,
    format::DefaultRecordFormatter,
    property::{ClassPropertySet, PropertyDescriptor},
    record::{RawAccessor, TypeTag},
};

static GLOBAL: Lazy<Registry> = Lazy::new(Registry::default);

/// The declaration store and bundle factory.
#[derive(Clone, Default)]
pub struct Registry {
    core: Arc<RegistryCore>,
}

#[derive(Default)]
pub(crate) struct RegistryCore {
    specs: DashMap<TypeTag, TypeSpec>,
    resolved: DashMap<TypeTag, Arc<ClassPropertySet>>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    /// The process-wide default registry.
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    /// Store a type declaration. Resolution is deferred to the first
    /// `bundle_for` request for the tag (or for a subtype of it).
    pub fn register(&self, spec: TypeSpec) -> Result<(), ConfigError> {
        let tag = spec.tag();
        use dashmap::mapref::entry::Entry;
        match self.core.specs.entry(tag) {
            Entry::Occupied(_) => Err(ConfigError::DuplicateType(tag)),
            Entry::Vacant(slot) => {
                slot.insert(spec);
                debug!("registered type declaration for {tag}");
                Ok(())
            }
        }
    }

    /// Produce or reuse the operation bundle for `tag`.
    ///
    /// Construction failures are returned to the caller and nothing is
    /// cached; a later request retries resolution from the current
    /// declarations.
    pub fn bundle_for(&self, tag: TypeTag) -> Result<Bundle, ConfigError> {
        let props = self.core.resolve(tag)?;
        Ok(Bundle::new(self.core.clone(), props))
    }
}

impl RegistryCore {
    pub(crate) fn resolve(&self, tag: TypeTag) -> Result<Arc<ClassPropertySet>, ConfigError> {
        let mut chain = SmallVec::new();
        self.resolve_with(tag, &mut chain)
    }

    fn resolve_with(
        &self,
        tag: TypeTag,
        chain: &mut SmallVec<[TypeTag; 8]>,
    ) -> Result<Arc<ClassPropertySet>, ConfigError> {
        if let Some(resolved) = self.resolved.get(&tag) {
            return Ok(resolved.clone());
        }
        if chain.contains(&tag) {
            return Err(ConfigError::ParentCycle(tag));
        }
        chain.push(tag);

        let spec = self
            .specs
            .get(&tag)
            .ok_or(ConfigError::UnknownType(tag))?
            .clone();
        let parent = match spec.parent {
            Some(parent_tag) => Some(self.resolve_with(parent_tag, chain)?),
            None => None,
        };

        let set = Arc::new(self.build_set(&spec, parent.as_deref())?);
        debug!(
            "resolved property set for {tag}: {} properties, equality root {}",
            set.properties().len(),
            set.equality_root(),
        );

        // Convergent construction: a racing thread may have inserted an
        // equivalent set first, in which case that entry wins.
        Ok(self
            .resolved
            .entry(tag)
            .or_insert_with(|| set.clone())
            .clone())
    }

    fn build_set(
        &self,
        spec: &TypeSpec,
        parent: Option<&ClassPropertySet>,
    ) -> Result<ClassPropertySet, ConfigError> {
        let tag = spec.tag();
        let own = selected_properties(spec)?;

        let mut all: SmallVec<[Arc<PropertyDescriptor>; 8]> = SmallVec::new();
        let mut overriding: BTreeMap<&str, &(PropertySpec, Roles)> = own
            .iter()
            .map(|entry| (entry.0.name.as_str(), entry))
            .collect();

        // Inherited properties keep their ancestral position; a same-named
        // declaration on this type replaces the metadata in place.
        if let Some(parent) = parent {
            for inherited in parent.properties() {
                let descriptor = match overriding.remove(inherited.name()) {
                    Some((property, roles)) => self.bind_descriptor(tag, property, *roles)?,
                    None => PropertyDescriptor {
                        name: inherited.name.clone(),
                        declared_by: inherited.declared_by,
                        origin: inherited.origin,
                        roles: inherited.roles,
                        mode: inherited.mode,
                        formatter: inherited.formatter.clone(),
                        accessor: self.find_accessor(tag, inherited.name())?,
                    },
                };
                all.push(Arc::new(descriptor));
            }
        }
        for (property, roles) in &own {
            if overriding.remove(property.name.as_str()).is_some() {
                all.push(Arc::new(self.bind_descriptor(tag, property, *roles)?));
            }
        }

        for descriptor in &all {
            if descriptor.roles.contains(Roles::HASH) && !descriptor.roles.contains(Roles::EQUALS) {
                return Err(ConfigError::HashOutsideEquals {
                    tag,
                    name: descriptor.name.clone(),
                });
            }
        }

        let partition = |role: Roles| {
            all.iter()
                .filter(|descriptor| descriptor.roles.contains(role))
                .cloned()
                .collect::<SmallVec<[Arc<PropertyDescriptor>; 8]>>()
        };
        let equals_props = partition(Roles::EQUALS);
        let hash_props = partition(Roles::HASH);
        let string_props = partition(Roles::STRING);

        let equality_root = match parent {
            Some(parent)
                if equals_props
                    .iter()
                    .map(|d| d.name.as_str())
                    .eq(parent.equals_names()) =>
            {
                parent.equality_root()
            }
            _ => tag,
        };

        let formatter = spec
            .formatter
            .clone()
            .or_else(|| parent.map(|p| p.record_formatter().clone()))
            .unwrap_or_else(|| Arc::new(DefaultRecordFormatter));

        Ok(ClassPropertySet {
            tag,
            all,
            equals_props,
            hash_props,
            string_props,
            equality_root,
            formatter,
        })
    }

    fn bind_descriptor(
        &self,
        tag: TypeTag,
        property: &PropertySpec,
        roles: Roles,
    ) -> Result<PropertyDescriptor, ConfigError> {
        Ok(PropertyDescriptor {
            name: property.name.clone(),
            declared_by: tag,
            origin: property.origin,
            roles,
            mode: property.mode,
            formatter: property.formatter.clone(),
            accessor: self.find_accessor(tag, &property.name)?,
        })
    }

    // Accessor binding walks from the concrete type toward the root so a
    // subtype's re-registered accessor shadows its ancestor's.
    fn find_accessor(&self, tag: TypeTag, name: &str) -> Result<RawAccessor, ConfigError> {
        let mut current = Some(tag);
        while let Some(tag) = current {
            let Some(spec) = self.specs.get(&tag) else {
                break;
            };
            if let Some(accessor) = spec.accessors.get(name) {
                return Ok(accessor.clone());
            }
            current = spec.parent;
        }
        Err(ConfigError::MissingAccessor {
            tag,
            name: name.to_string(),
        })
    }
}

/// Apply the auto-detection policy: explicitly tagged properties always
/// participate with their declared roles, untagged ones participate with
/// every role when the policy matches their origin.
fn selected_properties(spec: &TypeSpec) -> Result<Vec<(PropertySpec, Roles)>, ConfigError> {
    let mut selected = Vec::with_capacity(spec.properties.len());
    let mut seen: SmallVec<[&str; 8]> = SmallVec::new();
    for property in &spec.properties {
        if seen.contains(&property.name.as_str()) {
            return Err(ConfigError::DuplicateProperty {
                tag: spec.tag(),
                name: property.name.clone(),
            });
        }
        seen.push(property.name.as_str());

        let roles = match property.roles {
            Some(roles) => roles,
            None => match (spec.auto_detect, property.origin) {
                (AutoDetectPolicy::Field, PropertyOrigin::Field) => Roles::ALL,
                (AutoDetectPolicy::Method, PropertyOrigin::Method) => Roles::ALL,
                _ => continue,
            },
        };
        if roles.is_empty() {
            continue;
        }
        selected.push((property.clone(), roles));
    }
    Ok(selected)
}
