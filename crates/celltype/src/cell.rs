// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Cell kinds: the concrete cell implementations of the table model.
//!
//! A cell kind sits in a single-inheritance hierarchy (`extends`), directly
//! implements zero or more capabilities, and may declare a preferred
//! capability and a fast-path [`CellSerializer`]. The preferred capability
//! declaration is inherited by kinds that do not declare their own; the
//! serializer declaration is not.

use crate::capability::Capability;
use crate::error::SerializeError;
use crate::value::DataValue;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Fast-path binary serializer for one cell kind.
pub trait CellSerializer: Send + Sync + fmt::Debug {
    /// Name of the cell kind this serializer reads and writes.
    fn cell_kind(&self) -> &str;

    fn serialize(&self, value: &dyn DataValue, out: &mut Vec<u8>) -> Result<(), SerializeError>;

    fn deserialize(&self, input: &[u8]) -> Result<Box<dyn DataValue>, SerializeError>;
}

struct CellKindDef {
    name: Arc<str>,
    parent: Option<CellKind>,
    implements: Vec<Capability>,
    preferred: Option<Capability>,
    serializer: Option<Arc<dyn CellSerializer>>,
}

/// Shared handle to a cell kind definition. Equality and hashing use the
/// kind name.
#[derive(Clone)]
pub struct CellKind(Arc<CellKindDef>);

impl CellKind {
    pub fn builder(name: impl Into<Arc<str>>) -> CellKindBuilder {
        CellKindBuilder {
            name: name.into(),
            parent: None,
            implements: Vec::new(),
            preferred: None,
            serializer: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Kind this one extends.
    #[must_use]
    pub fn parent(&self) -> Option<&CellKind> {
        self.0.parent.as_ref()
    }

    /// Capabilities implemented directly by this kind, in declaration order.
    #[must_use]
    pub fn implements(&self) -> &[Capability] {
        &self.0.implements
    }

    /// Preferred capability declared by this kind itself.
    #[must_use]
    pub fn declared_preferred(&self) -> Option<&Capability> {
        self.0.preferred.as_ref()
    }

    /// Preferred capability in effect: the own declaration, else the nearest
    /// one up the parent chain.
    #[must_use]
    pub fn preferred(&self) -> Option<&Capability> {
        self.lineage().find_map(CellKind::declared_preferred)
    }

    /// Serializer declared by this kind itself.
    #[must_use]
    pub fn declared_serializer(&self) -> Option<&Arc<dyn CellSerializer>> {
        self.0.serializer.as_ref()
    }

    /// This kind followed by its ancestors, nearest first.
    pub fn lineage(&self) -> impl Iterator<Item = &CellKind> {
        std::iter::successors(Some(self), |kind| kind.parent())
    }

    /// True if this kind is `other` or extends it.
    #[must_use]
    pub fn is_subkind_of(&self, other: &CellKind) -> bool {
        self.lineage().any(|kind| kind == other)
    }
}

impl CellKind {
    /// Whether both handles share one definition, not just a name.
    pub(crate) fn same_definition(&self, other: &CellKind) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for CellKind {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.name == other.0.name
    }
}

impl Eq for CellKind {}

impl Hash for CellKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.name.hash(state);
    }
}

impl fmt::Debug for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CellKind({})", self.0.name)
    }
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

/// Builder for [`CellKind`].
#[derive(Debug)]
pub struct CellKindBuilder {
    name: Arc<str>,
    parent: Option<CellKind>,
    implements: Vec<Capability>,
    preferred: Option<Capability>,
    serializer: Option<Arc<dyn CellSerializer>>,
}

impl CellKindBuilder {
    #[must_use]
    pub fn extends(mut self, parent: CellKind) -> Self {
        self.parent = Some(parent);
        self
    }

    #[must_use]
    pub fn implements(mut self, cap: Capability) -> Self {
        if !self.implements.contains(&cap) {
            self.implements.push(cap);
        }
        self
    }

    #[must_use]
    pub fn preferred(mut self, cap: Capability) -> Self {
        self.preferred = Some(cap);
        self
    }

    #[must_use]
    pub fn serializer(mut self, serializer: Arc<dyn CellSerializer>) -> Self {
        self.serializer = Some(serializer);
        self
    }

    #[must_use]
    pub fn build(self) -> CellKind {
        CellKind(Arc::new(CellKindDef {
            name: self.name,
            parent: self.parent,
            implements: self.implements,
            preferred: self.preferred,
            serializer: self.serializer,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preferred_is_inherited_unless_overridden() {
        let numeric = Capability::new("Numeric", vec![], None);
        let textual = Capability::new("Textual", vec![], None);

        let base = CellKind::builder("Base")
            .implements(numeric.clone())
            .preferred(numeric.clone())
            .build();
        let child = CellKind::builder("Child").extends(base.clone()).build();
        let other = CellKind::builder("Other")
            .extends(base.clone())
            .implements(textual.clone())
            .preferred(textual.clone())
            .build();

        assert_eq!(child.declared_preferred(), None);
        assert_eq!(child.preferred(), Some(&numeric));
        assert_eq!(other.preferred(), Some(&textual));
    }

    #[test]
    fn lineage_walks_to_the_root() {
        let root = CellKind::builder("Root").build();
        let mid = CellKind::builder("Mid").extends(root.clone()).build();
        let leaf = CellKind::builder("Leaf").extends(mid.clone()).build();

        let names: Vec<_> = leaf.lineage().map(CellKind::name).collect();
        assert_eq!(names, vec!["Leaf", "Mid", "Root"]);
        assert!(leaf.is_subkind_of(&root));
        assert!(!root.is_subkind_of(&leaf));
    }
}
