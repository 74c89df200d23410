use identikit::{
    PropertySpec, Record, Registry, Roles, TypeSpec, TypeTag, Value, accessor,
};

const PARENT: TypeTag = TypeTag::new("Parent");
const CHILD_PLAIN: TypeTag = TypeTag::new("ChildPlain");
const CHILD_EXTRA: TypeTag = TypeTag::new("ChildExtra");
const SIBLING: TypeTag = TypeTag::new("OtherChild");

struct Parent {
    x: i32,
}

impl Record for Parent {
    fn type_tag(&self) -> TypeTag {
        PARENT
    }
}

// Inherits the parent's equality properties unchanged, so it shares the
// parent's equality root.
struct ChildPlain {
    x: i32,
}

impl Record for ChildPlain {
    fn type_tag(&self) -> TypeTag {
        CHILD_PLAIN
    }
}

// Adds its own equality property, which starts a fresh equality root.
struct ChildExtra {
    x: i32,
    y: i32,
}

impl Record for ChildExtra {
    fn type_tag(&self) -> TypeTag {
        CHILD_EXTRA
    }
}

struct Sibling {
    x: i32,
}

impl Record for Sibling {
    fn type_tag(&self) -> TypeTag {
        SIBLING
    }
}

fn family_registry() -> Registry {
    let registry = Registry::new();
    registry
        .register(
            TypeSpec::new(PARENT)
                .property(PropertySpec::field("x").roles(Roles::ALL))
                .accessor("x", accessor(|p: &Parent| Value::from(p.x))),
        )
        .unwrap();
    registry
        .register(
            TypeSpec::new(CHILD_PLAIN)
                .parent(PARENT)
                .accessor("x", accessor(|c: &ChildPlain| Value::from(c.x))),
        )
        .unwrap();
    registry
        .register(
            TypeSpec::new(CHILD_EXTRA)
                .parent(PARENT)
                .property(PropertySpec::field("y").roles(Roles::ALL))
                .accessor("x", accessor(|c: &ChildExtra| Value::from(c.x)))
                .accessor("y", accessor(|c: &ChildExtra| Value::from(c.y))),
        )
        .unwrap();
    registry
        .register(
            TypeSpec::new(SIBLING)
                .parent(PARENT)
                .accessor("x", accessor(|s: &Sibling| Value::from(s.x))),
        )
        .unwrap();
    registry
}

#[test]
fn plain_child_shares_the_parent_equality_root() {
    let registry = family_registry();
    let parent_bundle = registry.bundle_for(PARENT).unwrap();
    let child_bundle = registry.bundle_for(CHILD_PLAIN).unwrap();
    assert!(parent_bundle.is_compatible_for_equality(CHILD_PLAIN));
    assert!(child_bundle.is_compatible_for_equality(PARENT));
}

#[test]
fn extending_child_starts_a_fresh_equality_root() {
    let registry = family_registry();
    let parent_bundle = registry.bundle_for(PARENT).unwrap();
    let child_bundle = registry.bundle_for(CHILD_EXTRA).unwrap();
    assert!(!parent_bundle.is_compatible_for_equality(CHILD_EXTRA));
    assert!(!child_bundle.is_compatible_for_equality(PARENT));
}

#[test]
fn parent_and_plain_child_compare_by_shared_properties() {
    let registry = family_registry();
    let bundle = registry.bundle_for(PARENT).unwrap();
    let parent = Parent { x: 1 };
    let child = ChildPlain { x: 1 };
    let other_child = ChildPlain { x: 2 };

    assert!(bundle.equals(Some(&parent), Some(&child)).unwrap());
    assert!(bundle.equals(Some(&child), Some(&parent)).unwrap());
    assert!(!bundle.equals(Some(&parent), Some(&other_child)).unwrap());
}

#[test]
fn extending_child_never_equals_the_parent() {
    let registry = family_registry();
    let parent_bundle = registry.bundle_for(PARENT).unwrap();
    let child_bundle = registry.bundle_for(CHILD_EXTRA).unwrap();
    let parent = Parent { x: 1 };
    let child = ChildExtra { x: 1, y: 1 };

    assert!(!parent_bundle.equals(Some(&parent), Some(&child)).unwrap());
    assert!(!child_bundle.equals(Some(&child), Some(&parent)).unwrap());
}

#[test]
fn siblings_under_one_root_compare_equal() {
    let registry = family_registry();
    let bundle = registry.bundle_for(CHILD_PLAIN).unwrap();
    let left = ChildPlain { x: 7 };
    let right = Sibling { x: 7 };
    assert!(bundle.equals(Some(&left), Some(&right)).unwrap());
    assert!(bundle.is_compatible_for_equality(SIBLING));
}

#[test]
fn extending_children_compare_on_all_their_properties() {
    let registry = family_registry();
    let bundle = registry.bundle_for(CHILD_EXTRA).unwrap();
    let a = ChildExtra { x: 1, y: 2 };
    let b = ChildExtra { x: 1, y: 2 };
    let c = ChildExtra { x: 1, y: 3 };
    assert!(bundle.equals(Some(&a), Some(&b)).unwrap());
    assert!(!bundle.equals(Some(&a), Some(&c)).unwrap());
}

#[test]
fn hashes_agree_across_compatible_types() {
    let registry = family_registry();
    let parent_bundle = registry.bundle_for(PARENT).unwrap();
    let child_bundle = registry.bundle_for(CHILD_PLAIN).unwrap();
    let parent = Parent { x: 5 };
    let child = ChildPlain { x: 5 };
    assert_eq!(
        parent_bundle.hash_code(Some(&parent)).unwrap(),
        child_bundle.hash_code(Some(&child)).unwrap()
    );
}

#[test]
fn inherited_properties_keep_their_ancestral_position() {
    let registry = family_registry();
    let bundle = registry.bundle_for(CHILD_EXTRA).unwrap();
    let child = ChildExtra { x: 1, y: 2 };
    assert_eq!(
        bundle.render(Some(&child)).unwrap(),
        "ChildExtra{x: {1}, y: {2}}"
    );
}

#[test]
fn child_accessors_shadow_the_parents() {
    let registry = family_registry();
    let bundle = registry.bundle_for(PARENT).unwrap();
    // Reading a plain child through the parent bundle must bind the child's
    // own accessor, not the parent's downcasting one.
    let child = ChildPlain { x: 9 };
    assert_eq!(bundle.render(Some(&child)).unwrap(), "Parent{x: {9}}");
}
