// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Capability discovery for a cell kind.
//!
//! Walks the kind's lineage depth-first: for each kind, nearest first, every
//! directly implemented capability followed by its ancestor capabilities.
//! The first visit of a capability records it and, when a cache is given,
//! resolves its utility bundle so later metadata lookups hit the cache.

use crate::capability::Capability;
use crate::cell::CellKind;
use crate::utility::UtilityCache;

/// Result of [`discover`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    /// Every reachable capability in first-visit order, without duplicates.
    pub capabilities: Vec<Capability>,
    /// Preferred capability in effect for the kind, if any. Not necessarily
    /// a member of `capabilities`; see [`Discovery::preferred_is_implemented`].
    pub preferred: Option<Capability>,
}

impl Discovery {
    /// False when the kind prefers a capability it does not implement.
    #[must_use]
    pub fn preferred_is_implemented(&self) -> bool {
        self.preferred
            .as_ref()
            .map_or(true, |p| self.capabilities.contains(p))
    }
}

/// Collect the capabilities of `kind`.
pub fn discover(kind: &CellKind, warm: Option<&UtilityCache>) -> Discovery {
    let mut capabilities = Vec::new();
    for current in kind.lineage() {
        for cap in current.implements() {
            visit(cap, &mut capabilities, warm);
        }
    }

    let preferred = kind.preferred().cloned();
    let discovery = Discovery {
        capabilities,
        preferred,
    };

    if !discovery.preferred_is_implemented() {
        if let Some(preferred) = &discovery.preferred {
            log::warn!(
                "[coding] cell kind '{}' declares '{}' as its preferred capability but does not implement it",
                kind,
                preferred
            );
        }
    }

    log::debug!(
        "[discovery] {} -> {:?} (preferred: {:?})",
        kind,
        discovery.capabilities,
        discovery.preferred
    );
    discovery
}

fn visit(cap: &Capability, seen: &mut Vec<Capability>, warm: Option<&UtilityCache>) {
    if seen.contains(cap) {
        return;
    }
    if let Some(cache) = warm {
        cache.resolve(cap);
    }
    seen.push(cap.clone());
    for parent in cap.parents() {
        visit(parent, seen, warm);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(caps: &[Capability]) -> Vec<&str> {
        caps.iter().map(Capability::name).collect()
    }

    #[test]
    fn walks_capabilities_then_parent_kinds() {
        let comparable = Capability::new("Comparable", vec![], None);
        let numeric = Capability::new("Numeric", vec![comparable.clone()], None);
        let textual = Capability::new("Textual", vec![], None);

        let base = CellKind::builder("Base").implements(textual.clone()).build();
        let kind = CellKind::builder("Kind")
            .extends(base)
            .implements(numeric.clone())
            .implements(comparable.clone())
            .preferred(numeric.clone())
            .build();

        let found = discover(&kind, None);
        assert_eq!(names(&found.capabilities), vec!["Numeric", "Comparable", "Textual"]);
        assert_eq!(found.preferred, Some(numeric));
        assert!(found.preferred_is_implemented());
    }

    #[test]
    fn warms_the_utility_cache() {
        let comparable = Capability::new("Comparable", vec![], None);
        let numeric = Capability::new("Numeric", vec![comparable], None);
        let kind = CellKind::builder("Kind").implements(numeric).build();

        let cache = UtilityCache::new();
        discover(&kind, Some(&cache));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn unimplemented_preference_is_reported_but_kept() {
        let numeric = Capability::new("Numeric", vec![], None);
        let textual = Capability::new("Textual", vec![], None);
        let kind = CellKind::builder("Odd")
            .implements(numeric)
            .preferred(textual.clone())
            .build();

        let found = discover(&kind, None);
        assert_eq!(found.preferred, Some(textual));
        assert!(!found.preferred_is_implemented());
    }
}
