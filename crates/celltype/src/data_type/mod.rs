// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors for table columns and cells.
//!
//! A [`DataType`] is either *native* (bound to one [`CellKind`], created and
//! cached by the registry), the dedicated missing-value descriptor, or
//! *non-native* (an ad-hoc capability list produced by a meet, by changing
//! the preferred capability, or by loading a saved descriptor).
//!
//! # Invariants
//!
//! - `capabilities` has no duplicates.
//! - If `has_preferred`, `capabilities` is non-empty and its first element
//!   is the preferred capability.
//!
//! # Equality
//!
//! Two descriptors are equal when their preference flags match, their
//! preferred capabilities (if any) match, and their capability *sets* are
//! equal. Order beyond the preferred slot and the bound cell kind are
//! ignored, so the descriptors of two kinds with the same capabilities and
//! the same preference compare equal.

mod meet;

use crate::capability::Capability;
use crate::cell::CellKind;
use crate::discovery::Discovery;
use crate::error::TypeError;
use crate::value::MISSING_CELL_NAME;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Origin {
    Native(CellKind),
    Missing,
    Derived,
}

/// Immutable type descriptor. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct DataType {
    origin: Origin,
    capabilities: Arc<[Capability]>,
    has_preferred: bool,
}

impl DataType {
    /// Native descriptor of `kind` from its discovered capabilities.
    ///
    /// The preferred capability moves to the front; the rest keep discovery
    /// order.
    pub(crate) fn native(kind: &CellKind, discovery: Discovery) -> Self {
        let mut capabilities = Vec::with_capacity(discovery.capabilities.len() + 1);
        let has_preferred = discovery.preferred.is_some();
        if let Some(preferred) = discovery.preferred {
            capabilities.push(preferred);
        }
        for cap in discovery.capabilities {
            if !capabilities.contains(&cap) {
                capabilities.push(cap);
            }
        }
        Self {
            origin: Origin::Native(kind.clone()),
            capabilities: capabilities.into(),
            has_preferred,
        }
    }

    /// Descriptor of the missing value: no capabilities, yet compatible
    /// with every capability.
    pub(crate) fn missing() -> Self {
        Self {
            origin: Origin::Missing,
            capabilities: Vec::new().into(),
            has_preferred: false,
        }
    }

    fn derived(capabilities: Vec<Capability>, has_preferred: bool) -> Self {
        Self {
            origin: Origin::Derived,
            capabilities: capabilities.into(),
            has_preferred,
        }
    }

    /// Non-native copy of `base` with `preferred` as its preferred
    /// capability.
    ///
    /// # Errors
    ///
    /// [`TypeError::InvalidArgument`] if `preferred` is not one of `base`'s
    /// capabilities.
    pub fn with_preferred(base: &DataType, preferred: &Capability) -> Result<Self, TypeError> {
        if !base.capabilities.contains(preferred) {
            return Err(TypeError::InvalidArgument(format!(
                "invalid preferred capability '{}' for {}",
                preferred, base
            )));
        }
        let mut capabilities = Vec::with_capacity(base.capabilities.len());
        capabilities.push(preferred.clone());
        capabilities.extend(base.capabilities.iter().filter(|c| *c != preferred).cloned());
        Ok(Self::derived(capabilities, true))
    }

    /// Non-native descriptor from an explicit capability list, as stored by
    /// the codec. When `has_preferred` is set the first element is the
    /// preferred capability.
    ///
    /// # Errors
    ///
    /// [`TypeError::InvalidArgument`] if the list contains duplicates, or if
    /// `has_preferred` is set on an empty list.
    pub fn from_raw(has_preferred: bool, capabilities: Vec<Capability>) -> Result<Self, TypeError> {
        if has_preferred && capabilities.is_empty() {
            return Err(TypeError::InvalidArgument(
                "preferred capability flag set on an empty capability list".into(),
            ));
        }
        for (i, cap) in capabilities.iter().enumerate() {
            if capabilities[..i].contains(cap) {
                return Err(TypeError::InvalidArgument(format!(
                    "capability '{}' listed twice",
                    cap
                )));
            }
        }
        Ok(Self::derived(capabilities, has_preferred))
    }

    /// Cell kind this descriptor is native to.
    #[must_use]
    pub fn cell_kind(&self) -> Option<&CellKind> {
        match &self.origin {
            Origin::Native(kind) => Some(kind),
            Origin::Missing | Origin::Derived => None,
        }
    }

    /// True for descriptors bound to a cell kind, the missing value's
    /// included.
    #[must_use]
    pub fn is_native(&self) -> bool {
        !matches!(self.origin, Origin::Derived)
    }

    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self.origin, Origin::Missing)
    }

    /// Capabilities in stored order; the preferred one first if present.
    #[must_use]
    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    #[must_use]
    pub fn has_preferred(&self) -> bool {
        self.has_preferred
    }

    #[must_use]
    pub fn preferred_capability(&self) -> Option<&Capability> {
        if self.has_preferred {
            self.capabilities.first()
        } else {
            None
        }
    }

    /// True if values of this type can be read through `cap`: the missing
    /// descriptor always, otherwise if `cap` is assignable from one of the
    /// descriptor's capabilities.
    #[must_use]
    pub fn is_compatible(&self, cap: &Capability) -> bool {
        if self.is_missing() {
            return true;
        }
        self.capabilities.iter().any(|own| cap.is_assignable_from(own))
    }

    /// True if `other` is compatible with every capability of `self`.
    #[must_use]
    pub fn is_supertype_of(&self, other: &DataType) -> bool {
        if std::ptr::eq(self, other) || Arc::ptr_eq(&self.capabilities, &other.capabilities) {
            return true;
        }
        self.capabilities.iter().all(|cap| other.is_compatible(cap))
    }

    /// Name used in logs and listings.
    #[must_use]
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl PartialEq for DataType {
    fn eq(&self, other: &Self) -> bool {
        if self.has_preferred != other.has_preferred {
            return false;
        }
        if self.preferred_capability() != other.preferred_capability() {
            return false;
        }
        self.capabilities.len() == other.capabilities.len()
            && self.capabilities.iter().all(|c| other.capabilities.contains(c))
            && other.capabilities.iter().all(|c| self.capabilities.contains(c))
    }
}

impl Eq for DataType {}

impl Hash for DataType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.has_preferred.hash(state);
        let folded = self.capabilities.iter().fold(0u64, |acc, cap| {
            let mut hasher = DefaultHasher::new();
            cap.hash(&mut hasher);
            acc ^ hasher.finish()
        });
        folded.hash(state);
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.origin {
            Origin::Native(kind) => write!(f, "{}", kind),
            Origin::Missing => f.write_str(MISSING_CELL_NAME),
            Origin::Derived => {
                f.write_str("Non-Native [")?;
                for (i, cap) in self.capabilities.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", cap)?;
                }
                f.write_str("]")
            }
        }
    }
}

#[cfg(test)]
mod tests;
