// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Capabilities: the typed views a cell kind can be read as.
//!
//! Capabilities form a directed acyclic hierarchy. A handle owns its parents,
//! so a hierarchy built from handles can never contain a cycle; name-based
//! declarations are checked for cycles by the catalog builder.

use crate::utility::UtilityFactory;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[derive(Debug)]
struct CapabilityDef {
    name: Arc<str>,
    parents: Vec<Capability>,
    utility: Option<Arc<UtilityFactory>>,
}

/// Shared handle to a capability definition.
///
/// Equality and hashing use the capability name; a catalog guarantees that
/// names are unique.
#[derive(Clone)]
pub struct Capability(Arc<CapabilityDef>);

impl Capability {
    /// Create a capability extending `parents`.
    pub fn new(
        name: impl Into<Arc<str>>,
        parents: Vec<Capability>,
        utility: Option<UtilityFactory>,
    ) -> Self {
        Self(Arc::new(CapabilityDef {
            name: name.into(),
            parents,
            utility: utility.map(Arc::new),
        }))
    }

    /// Capability name, also its persisted identity.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Directly extended capabilities, in declaration order.
    #[must_use]
    pub fn parents(&self) -> &[Capability] {
        &self.0.parents
    }

    /// Utility bundle declared by this capability itself (not inherited).
    #[must_use]
    pub fn declared_utility(&self) -> Option<&Arc<UtilityFactory>> {
        self.0.utility.as_ref()
    }

    /// True if `other` is this capability or transitively extends it.
    #[must_use]
    pub fn is_assignable_from(&self, other: &Capability) -> bool {
        if self == other {
            return true;
        }
        other.parents().iter().any(|p| self.is_assignable_from(p))
    }

    /// Every transitively extended capability, depth-first, without
    /// duplicates and without `self`.
    #[must_use]
    pub fn ancestors(&self) -> Vec<Capability> {
        let mut out = Vec::new();
        collect_ancestors(self, &mut out);
        out
    }
}

fn collect_ancestors(cap: &Capability, out: &mut Vec<Capability>) {
    for parent in cap.parents() {
        if !out.contains(parent) {
            out.push(parent.clone());
            collect_ancestors(parent, out);
        }
    }
}

impl PartialEq for Capability {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.name == other.0.name
    }
}

impl Eq for Capability {}

impl Hash for Capability {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.name.hash(state);
    }
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Capability({})", self.0.name)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cap(name: &str, parents: &[&Capability]) -> Capability {
        Capability::new(name, parents.iter().map(|c| (*c).clone()).collect(), None)
    }

    #[test]
    fn assignability_follows_the_hierarchy() {
        let comparable = cap("Comparable", &[]);
        let numeric = cap("Numeric", &[&comparable]);
        let integral = cap("Integral", &[&numeric]);
        let text = cap("Textual", &[]);

        assert!(numeric.is_assignable_from(&numeric));
        assert!(numeric.is_assignable_from(&integral));
        assert!(comparable.is_assignable_from(&integral));
        assert!(!integral.is_assignable_from(&numeric));
        assert!(!text.is_assignable_from(&integral));
    }

    #[test]
    fn ancestors_are_unique_and_depth_first() {
        let root = cap("Root", &[]);
        let left = cap("Left", &[&root]);
        let right = cap("Right", &[&root]);
        let leaf = cap("Leaf", &[&left, &right]);

        let names: Vec<_> = leaf.ancestors().iter().map(|c| c.name().to_string()).collect();
        assert_eq!(names, vec!["Left", "Root", "Right"]);
    }

    #[test]
    fn equality_is_by_name() {
        let a = cap("Numeric", &[]);
        let b = cap("Numeric", &[]);
        assert_eq!(a, b);
        assert_eq!(format!("{a:?}"), "Capability(Numeric)");
    }
}
