// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type registry: memoizing caches over a [`Catalog`].
//!
//! ```text
//!   CellKind ──type_of──> DataType          (DashMap, lazy)
//!   CellKind ──serializer_for──> serializer (DashMap, lazy)
//!   Capability ──resolve──> UtilityFactory  (UtilityCache, lazy)
//! ```
//!
//! Every cache is filled at-least-once: concurrent misses on the same key
//! may each build a value, the first insertion wins, and because building
//! is pure all candidates are equal.

use crate::capability::Capability;
use crate::catalog::Catalog;
use crate::cell::{CellKind, CellSerializer};
use crate::data_type::DataType;
use crate::discovery::discover;
use crate::error::{CatalogError, TypeError};
use crate::utility::{ColumnSpec, DataValueComparator, Icon, RendererSet, UtilityCache};
use crate::value::{MissingValue, MISSING, MISSING_CELL_NAME};
use dashmap::DashMap;
use std::sync::{Arc, OnceLock};

static GLOBAL: OnceLock<Registry> = OnceLock::new();

/// Install `registry` as the process-wide registry.
///
/// # Errors
///
/// [`CatalogError::AlreadyInstalled`] if [`install`] already succeeded or
/// [`global`] already initialized the builtin registry.
pub fn install(registry: Registry) -> Result<&'static Registry, CatalogError> {
    GLOBAL
        .set(registry)
        .map_err(|_| CatalogError::AlreadyInstalled)?;
    log::debug!("[registry] global registry installed");
    Ok(global())
}

/// Process-wide registry, initialized from [`Catalog::builtin`] on first
/// use unless one was [`install`]ed before.
pub fn global() -> &'static Registry {
    GLOBAL.get_or_init(|| {
        log::debug!("[registry] initializing global registry from builtin catalog");
        Registry::new(Catalog::builtin())
    })
}

/// Memoizing registry of type descriptors, utility bundles and serializers.
#[derive(Debug)]
pub struct Registry {
    catalog: Catalog,
    types: DashMap<CellKind, DataType>,
    serializers: DashMap<CellKind, Option<Arc<dyn CellSerializer>>>,
    utilities: UtilityCache,
    missing: DataType,
}

impl Registry {
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            types: DashMap::new(),
            serializers: DashMap::new(),
            utilities: UtilityCache::new(),
            missing: DataType::missing(),
        }
    }

    /// Registry over [`Catalog::builtin`].
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(Catalog::builtin())
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Capability registered under `name`.
    #[must_use]
    pub fn capability(&self, name: &str) -> Option<&Capability> {
        self.catalog.capability(name)
    }

    /// Utility bundle cache shared by every descriptor of this registry.
    #[must_use]
    pub fn utilities(&self) -> &UtilityCache {
        &self.utilities
    }

    /// Native descriptor of `kind`.
    ///
    /// Only kinds of this registry's catalog are memoized. Any other handle
    /// is described on every call, so it never shadows a registered kind of
    /// the same name.
    pub fn type_of(&self, kind: &CellKind) -> DataType {
        if !self.is_registered(kind) {
            return DataType::native(kind, discover(kind, None));
        }
        if let Some(hit) = self.types.get(kind) {
            return hit.value().clone();
        }

        let warm = self
            .catalog
            .settings()
            .warm_utilities
            .then_some(&self.utilities);
        let built = DataType::native(kind, discover(kind, warm));
        log::debug!("[registry] type_of({}) -> {:?}", kind, built.capabilities());

        self.types
            .entry(kind.clone())
            .or_insert(built)
            .value()
            .clone()
    }

    /// Descriptor of the cell kind registered under `name`. The reserved
    /// missing-cell name maps to the missing descriptor.
    ///
    /// # Errors
    ///
    /// [`TypeError::UnresolvableReference`] if no kind is registered under
    /// `name`.
    pub fn type_of_name(&self, name: &str) -> Result<DataType, TypeError> {
        if name == MISSING_CELL_NAME {
            return Ok(self.missing.clone());
        }
        self.catalog
            .cell(name)
            .map(|kind| self.type_of(kind))
            .ok_or_else(|| TypeError::UnresolvableReference(format!("cell kind '{}'", name)))
    }

    /// The missing value and its descriptor.
    #[must_use]
    pub fn missing_value(&self) -> (MissingValue, DataType) {
        (MISSING, self.missing.clone())
    }

    /// Common supertype of two descriptors.
    ///
    /// # Errors
    ///
    /// [`TypeError::InvalidArgument`] if either input is absent.
    pub fn common_supertype(
        &self,
        a: Option<&DataType>,
        b: Option<&DataType>,
    ) -> Result<DataType, TypeError> {
        match (a, b) {
            (Some(a), Some(b)) => Ok(DataType::common_supertype(a, b)),
            _ => Err(TypeError::InvalidArgument(
                "common supertype requires two descriptors".into(),
            )),
        }
    }

    /// `false` when `cap` is absent.
    #[must_use]
    pub fn is_compatible(&self, ty: &DataType, cap: Option<&Capability>) -> bool {
        cap.is_some_and(|cap| ty.is_compatible(cap))
    }

    /// Comparator of the first capability, in stored order, whose bundle
    /// has one; the `Display`-text comparator otherwise.
    pub fn comparator(&self, ty: &DataType) -> DataValueComparator {
        ty.capabilities()
            .iter()
            .find_map(|cap| self.utilities.resolve(cap).comparator().cloned())
            .map_or_else(DataValueComparator::fallback, DataValueComparator::new)
    }

    /// Icon of the first capability whose bundle has one; the universal
    /// icon otherwise.
    pub fn icon(&self, ty: &DataType) -> Icon {
        if let Some(icon) = ty
            .capabilities()
            .iter()
            .find_map(|cap| self.utilities.resolve(cap).icon().cloned())
        {
            return icon;
        }
        match self.utilities.universal().icon() {
            Some(icon) => icon.clone(),
            None => {
                debug_assert!(false, "universal utility bundle has no icon");
                log::error!("[coding] no icon resolvable for {}", ty);
                Icon::generic()
            }
        }
    }

    /// Every renderer family offered by the descriptor's capabilities, in
    /// order. Never empty.
    pub fn renderer_family(&self, ty: &DataType, spec: &ColumnSpec) -> RendererSet {
        let families = ty
            .capabilities()
            .iter()
            .filter_map(|cap| self.utilities.resolve(cap).renderer_family(spec))
            .collect();
        RendererSet::new(families)
    }

    /// Fast-path serializer declared by `kind` itself.
    ///
    /// A serializer whose [`CellSerializer::cell_kind`] names neither `kind`
    /// nor a registered kind extending it is ignored with a coding
    /// diagnostic.
    pub fn serializer_for(&self, kind: &CellKind) -> Option<Arc<dyn CellSerializer>> {
        if !self.is_registered(kind) {
            return self.check_serializer(kind);
        }
        if let Some(hit) = self.serializers.get(kind) {
            return hit.value().clone();
        }

        let resolved = self.check_serializer(kind);
        self.serializers
            .entry(kind.clone())
            .or_insert(resolved)
            .value()
            .clone()
    }

    /// Whether `kind` is the definition this registry's catalog holds under
    /// its name.
    fn is_registered(&self, kind: &CellKind) -> bool {
        match self.catalog.cell(kind.name()) {
            Some(own) if own.same_definition(kind) => true,
            Some(_) => {
                log::warn!(
                    "[coding] cell kind '{}' is not the definition registered under that name; not caching it",
                    kind
                );
                false
            }
            None => {
                log::debug!("[registry] cell kind '{}' is not registered; not caching it", kind);
                false
            }
        }
    }

    fn check_serializer(&self, kind: &CellKind) -> Option<Arc<dyn CellSerializer>> {
        let Some(serializer) = kind.declared_serializer() else {
            log::debug!("[registry] cell kind '{}' declares no serializer", kind);
            return None;
        };

        let target = serializer.cell_kind();
        let fits = target == kind.name()
            || self
                .catalog
                .cell(target)
                .is_some_and(|other| other.is_subkind_of(kind));
        if !fits {
            log::warn!(
                "[coding] serializer declared by '{}' handles '{}', which is not '{}' or one of its subkinds; ignoring it",
                kind,
                target,
                kind
            );
            return None;
        }
        Some(Arc::clone(serializer))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::{COMPARABLE, NUMERIC, TEXT, WHOLE};
    use crate::catalog::{CapabilityDecl, CellDecl};

    #[test]
    fn type_of_is_memoized() {
        let registry = Registry::builtin();
        let whole = registry.catalog().cell(WHOLE).unwrap().clone();
        let first = registry.type_of(&whole);
        let second = registry.type_of(&whole);
        assert_eq!(first, second);
        assert_eq!(registry.types.len(), 1);
        assert_eq!(first.cell_kind(), Some(&whole));
    }

    #[test]
    fn foreign_handle_does_not_shadow_registered_kind() {
        let registry = Registry::builtin();
        let bogus = Capability::new("Bogus", vec![], None);
        let foreign = CellKind::builder(WHOLE).implements(bogus).build();

        let described = registry.type_of(&foreign);
        assert_eq!(names(&described), vec!["Bogus"]);
        assert!(registry.types.is_empty());
        assert!(registry.serializer_for(&foreign).is_none());
        assert!(registry.serializers.is_empty());

        let whole = registry.type_of_name(WHOLE).unwrap();
        assert_eq!(names(&whole), vec![NUMERIC, COMPARABLE]);
        assert_eq!(registry.types.len(), 1);
        assert_eq!(names(&registry.type_of(&foreign)), vec!["Bogus"]);
    }

    fn names(ty: &DataType) -> Vec<&str> {
        ty.capabilities().iter().map(Capability::name).collect()
    }

    #[test]
    fn type_of_name_resolves_missing_and_rejects_unknown() {
        let registry = Registry::builtin();
        assert!(registry.type_of_name(MISSING_CELL_NAME).unwrap().is_missing());
        assert_eq!(
            registry.type_of_name("Nope").unwrap_err(),
            TypeError::UnresolvableReference("cell kind 'Nope'".into())
        );
    }

    #[test]
    fn absent_descriptors_are_invalid_arguments() {
        let registry = Registry::builtin();
        let whole = registry.type_of_name(WHOLE).unwrap();
        assert!(matches!(
            registry.common_supertype(Some(&whole), None),
            Err(TypeError::InvalidArgument(_))
        ));
        assert!(matches!(
            registry.common_supertype(None, None),
            Err(TypeError::InvalidArgument(_))
        ));
    }

    #[test]
    fn absent_capability_is_incompatible() {
        let registry = Registry::builtin();
        let (_, missing) = registry.missing_value();
        assert!(!registry.is_compatible(&missing, None));
        let numeric = registry.capability(NUMERIC).cloned();
        assert!(registry.is_compatible(&missing, numeric.as_ref()));
    }

    #[test]
    fn metadata_falls_back_on_empty_descriptor() {
        let registry = Registry::builtin();
        let whole = registry.type_of_name(WHOLE).unwrap();
        let text = registry.type_of_name(TEXT).unwrap();
        let empty = DataType::common_supertype(&whole, &text);
        assert!(empty.capabilities().is_empty());

        assert_eq!(registry.icon(&empty), Icon::generic());
        let renderers = registry.renderer_family(&empty, &ColumnSpec::new("c"));
        assert_eq!(renderers.descriptions(), vec!["String"]);
        let cmp = registry.comparator(&empty);
        assert_eq!(format!("{:?}", cmp.inner()), "ToStringComparator");
    }

    #[test]
    fn comparable_without_bundle_uses_universal() {
        let registry = Registry::builtin();
        let comparable = registry.capability(COMPARABLE).unwrap().clone();
        let only = DataType::from_raw(false, vec![comparable]).unwrap();
        assert_eq!(registry.icon(&only), Icon::generic());
    }

    #[test]
    fn mismatched_serializer_is_ignored() {
        let catalog = Catalog::builtin()
            .extend()
            .cell(
                CellDecl::new("Stamp")
                    .implements(NUMERIC)
                    .serializer(Arc::new(crate::builtin::TextSerializer)),
            )
            .build()
            .unwrap();
        let registry = Registry::new(catalog);
        let stamp = registry.catalog().cell("Stamp").unwrap().clone();
        assert!(registry.serializer_for(&stamp).is_none());

        let whole = registry.catalog().cell(WHOLE).unwrap().clone();
        assert_eq!(registry.serializer_for(&whole).unwrap().cell_kind(), WHOLE);
    }

    #[test]
    fn serializer_for_subkind_is_accepted() {
        #[derive(Debug)]
        struct ChildSerializer;
        impl CellSerializer for ChildSerializer {
            fn cell_kind(&self) -> &str {
                "Child"
            }
            fn serialize(
                &self,
                _value: &dyn crate::value::DataValue,
                _out: &mut Vec<u8>,
            ) -> Result<(), crate::error::SerializeError> {
                Ok(())
            }
            fn deserialize(
                &self,
                _input: &[u8],
            ) -> Result<Box<dyn crate::value::DataValue>, crate::error::SerializeError> {
                Ok(Box::new(MISSING))
            }
        }

        let catalog = Catalog::builder()
            .capability(CapabilityDecl::new("Plain"))
            .cell(
                CellDecl::new("Parent")
                    .implements("Plain")
                    .serializer(Arc::new(ChildSerializer)),
            )
            .cell(CellDecl::new("Child").extends("Parent"))
            .build()
            .unwrap();
        let registry = Registry::new(catalog);
        let parent = registry.catalog().cell("Parent").unwrap().clone();
        let child = registry.catalog().cell("Child").unwrap().clone();
        assert!(registry.serializer_for(&parent).is_some());
        // Declarations are not inherited.
        assert!(registry.serializer_for(&child).is_none());
    }
}
