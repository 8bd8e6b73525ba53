// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::*;
use crate::builtin::{COMPARABLE, FLAG, LOGICAL, NUMERIC, REAL, TEXT, TEXTUAL, WHOLE};
use crate::registry::Registry;
use std::collections::HashSet;

fn cap(registry: &Registry, name: &str) -> Capability {
    registry.capability(name).cloned().unwrap()
}

fn ty(registry: &Registry, name: &str) -> DataType {
    registry.type_of_name(name).unwrap()
}

fn names(ty: &DataType) -> Vec<&str> {
    ty.capabilities().iter().map(Capability::name).collect()
}

/// Builtin natives, the missing descriptor and a few non-native shapes.
fn zoo(registry: &Registry) -> Vec<DataType> {
    let whole = ty(registry, WHOLE);
    let text = ty(registry, TEXT);
    let (_, missing) = registry.missing_value();
    vec![
        whole.clone(),
        ty(registry, REAL),
        text.clone(),
        ty(registry, FLAG),
        missing,
        DataType::common_supertype(&whole, &text),
        DataType::with_preferred(&whole, &cap(registry, COMPARABLE)).unwrap(),
        DataType::from_raw(false, vec![cap(registry, COMPARABLE)]).unwrap(),
        DataType::from_raw(true, vec![cap(registry, LOGICAL)]).unwrap(),
    ]
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

#[test]
fn native_descriptor_puts_preferred_first() {
    let registry = Registry::builtin();
    let whole = ty(&registry, WHOLE);
    assert_eq!(names(&whole), vec![NUMERIC, COMPARABLE]);
    assert!(whole.has_preferred());
    assert_eq!(whole.preferred_capability().map(Capability::name), Some(NUMERIC));
    assert!(whole.is_native());
    assert_eq!(whole.cell_kind().map(CellKind::name), Some(WHOLE));

    let flag = ty(&registry, FLAG);
    assert_eq!(names(&flag), vec![LOGICAL, COMPARABLE]);
}

#[test]
fn with_preferred_builds_non_native_copy() {
    let registry = Registry::builtin();
    let whole = ty(&registry, WHOLE);
    let by_order = DataType::with_preferred(&whole, &cap(&registry, COMPARABLE)).unwrap();

    assert!(!by_order.is_native());
    assert_eq!(by_order.cell_kind(), None);
    assert_eq!(names(&by_order), vec![COMPARABLE, NUMERIC]);
    assert_eq!(
        by_order.preferred_capability().map(Capability::name),
        Some(COMPARABLE)
    );
    assert_ne!(by_order, whole);
}

#[test]
fn with_preferred_rejects_foreign_capability() {
    let registry = Registry::builtin();
    let text = ty(&registry, TEXT);
    let err = DataType::with_preferred(&text, &cap(&registry, NUMERIC)).unwrap_err();
    assert!(matches!(err, TypeError::InvalidArgument(_)));
}

#[test]
fn from_raw_validates_shape() {
    let registry = Registry::builtin();
    assert!(matches!(
        DataType::from_raw(true, Vec::new()),
        Err(TypeError::InvalidArgument(_))
    ));

    let numeric = cap(&registry, NUMERIC);
    assert!(matches!(
        DataType::from_raw(false, vec![numeric.clone(), numeric.clone()]),
        Err(TypeError::InvalidArgument(_))
    ));

    let raw = DataType::from_raw(true, vec![numeric.clone()]).unwrap();
    assert_eq!(raw.preferred_capability(), Some(&numeric));
}

// ---------------------------------------------------------------------------
// Equality and hashing
// ---------------------------------------------------------------------------

#[test]
fn equality_ignores_order_beyond_preferred() {
    let registry = Registry::builtin();
    let numeric = cap(&registry, NUMERIC);
    let comparable = cap(&registry, COMPARABLE);
    let textual = cap(&registry, TEXTUAL);

    let a = DataType::from_raw(false, vec![numeric.clone(), comparable.clone(), textual.clone()])
        .unwrap();
    let b = DataType::from_raw(false, vec![textual.clone(), numeric.clone(), comparable.clone()])
        .unwrap();
    assert_eq!(a, b);

    let pa = DataType::from_raw(true, vec![numeric.clone(), comparable.clone(), textual.clone()])
        .unwrap();
    let pb = DataType::from_raw(true, vec![numeric.clone(), textual, comparable]).unwrap();
    assert_eq!(pa, pb);
    assert_ne!(pa, a);
}

#[test]
fn equal_descriptors_hash_equal() {
    let registry = Registry::builtin();
    let whole = ty(&registry, WHOLE);
    let real = ty(&registry, REAL);
    let raw = DataType::from_raw(
        true,
        vec![cap(&registry, NUMERIC), cap(&registry, COMPARABLE)],
    )
    .unwrap();

    // Same capabilities, same preference: the bound kind does not matter.
    assert_eq!(whole, real);
    assert_eq!(whole, raw);

    let set: HashSet<DataType> = [whole, real, raw, ty(&registry, TEXT)].into_iter().collect();
    assert_eq!(set.len(), 2);
}

#[test]
fn display_names() {
    let registry = Registry::builtin();
    let whole = ty(&registry, WHOLE);
    let (_, missing) = registry.missing_value();
    let by_order = DataType::with_preferred(&whole, &cap(&registry, COMPARABLE)).unwrap();

    assert_eq!(whole.to_string(), WHOLE);
    assert_eq!(missing.name(), "MissingCell");
    assert_eq!(by_order.to_string(), "Non-Native [Comparable, Numeric]");
}

// ---------------------------------------------------------------------------
// Compatibility
// ---------------------------------------------------------------------------

#[test]
fn compatibility_follows_capability_hierarchy() {
    let registry = Registry::builtin();
    let comparable = cap(&registry, COMPARABLE);
    let numeric = cap(&registry, NUMERIC);

    assert!(ty(&registry, WHOLE).is_compatible(&comparable));
    assert!(!ty(&registry, TEXT).is_compatible(&numeric));
    // Logical extends Comparable.
    let logical_only = DataType::from_raw(false, vec![cap(&registry, LOGICAL)]).unwrap();
    assert!(logical_only.is_compatible(&comparable));

    let (_, missing) = registry.missing_value();
    assert!(missing.is_compatible(&numeric));
    assert!(missing.is_compatible(&cap(&registry, TEXTUAL)));
}

#[test]
fn supertype_checks_reachable_capabilities() {
    let registry = Registry::builtin();
    let whole = ty(&registry, WHOLE);
    let flag = ty(&registry, FLAG);
    let comparable_only = DataType::from_raw(false, vec![cap(&registry, COMPARABLE)]).unwrap();

    assert!(whole.is_supertype_of(&whole));
    assert!(comparable_only.is_supertype_of(&whole));
    assert!(comparable_only.is_supertype_of(&flag));
    assert!(!whole.is_supertype_of(&comparable_only));
    assert!(!whole.is_supertype_of(&flag));
}

// ---------------------------------------------------------------------------
// Meet
// ---------------------------------------------------------------------------

#[test]
fn meet_of_whole_and_real_keeps_preference() {
    let registry = Registry::builtin();
    let whole = ty(&registry, WHOLE);
    let real = ty(&registry, REAL);

    let meet = DataType::common_supertype(&whole, &real);
    assert!(meet.has_preferred());
    assert_eq!(meet.preferred_capability().map(Capability::name), Some(NUMERIC));
    assert_eq!(meet, whole);
    assert_eq!(meet, real);
}

#[test]
fn meet_of_disjoint_types_is_empty() {
    let registry = Registry::builtin();
    let meet = DataType::common_supertype(&ty(&registry, TEXT), &ty(&registry, WHOLE));
    assert!(meet.capabilities().is_empty());
    assert!(!meet.has_preferred());
    assert!(!meet.is_native());
}

#[test]
fn meet_absorbs_missing() {
    let registry = Registry::builtin();
    let whole = ty(&registry, WHOLE);
    let (_, missing) = registry.missing_value();

    assert_eq!(DataType::common_supertype(&missing, &whole), whole);
    assert_eq!(DataType::common_supertype(&whole, &missing), whole);
    assert_eq!(
        DataType::common_supertype(&missing, &whole).cell_kind(),
        whole.cell_kind()
    );
}

#[test]
fn meet_keeps_shared_capabilities_only() {
    let registry = Registry::builtin();
    let meet = DataType::common_supertype(&ty(&registry, FLAG), &ty(&registry, WHOLE));
    assert_eq!(names(&meet), vec![COMPARABLE]);
    assert!(!meet.has_preferred());
}

#[test]
fn meet_of_different_preferences_drops_the_flag() {
    let registry = Registry::builtin();
    let whole = ty(&registry, WHOLE);
    let by_order = DataType::with_preferred(&whole, &cap(&registry, COMPARABLE)).unwrap();

    let ab = DataType::common_supertype(&whole, &by_order);
    let ba = DataType::common_supertype(&by_order, &whole);
    assert_eq!(ab, ba);
    assert!(!ab.has_preferred());
    assert_eq!(ab.capabilities().len(), 2);
}

#[test]
fn meet_is_reflexive_and_commutative() {
    let registry = Registry::builtin();
    let zoo = zoo(&registry);
    for a in &zoo {
        assert_eq!(&DataType::common_supertype(a, a), a, "reflexive for {a}");
        for b in &zoo {
            assert_eq!(
                DataType::common_supertype(a, b),
                DataType::common_supertype(b, a),
                "commutative for {a} / {b}"
            );
        }
    }
}

#[test]
fn meet_returns_the_supertype() {
    let registry = Registry::builtin();
    let zoo = zoo(&registry);
    for a in zoo.iter().filter(|a| !a.is_missing()) {
        for b in &zoo {
            let mutual_unequal = b.is_supertype_of(a) && a != b;
            if a.is_supertype_of(b) && !mutual_unequal {
                assert_eq!(&DataType::common_supertype(a, b), a, "{a} over {b}");
            }
        }
    }
}

#[test]
fn preferred_is_always_first() {
    let registry = Registry::builtin();
    let zoo = zoo(&registry);
    let meets: Vec<DataType> = zoo
        .iter()
        .flat_map(|a| zoo.iter().map(move |b| DataType::common_supertype(a, b)))
        .collect();
    for ty in zoo.iter().chain(&meets) {
        if ty.has_preferred() {
            assert_eq!(ty.capabilities().first(), ty.preferred_capability());
        } else {
            assert_eq!(ty.preferred_capability(), None);
        }
    }
}
