// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Start-up registration table of capabilities and cell kinds.
//!
//! Declarations reference each other by name and are resolved into
//! [`Capability`] and [`CellKind`] handles by [`CatalogBuilder::build`],
//! which validates the whole table eagerly:
//!
//! - duplicate names, unknown references, hierarchy cycles and the reserved
//!   missing-cell name are errors;
//! - a preferred capability naming no registered capability is a malformed
//!   declaration: logged, then treated as absent;
//! - a registered but unimplemented preferred capability is logged at
//!   discovery time, or rejected here when
//!   [`RegistrySettings::strict_preferred`] is set.
//!
//! A builder created with [`Catalog::extend`] layers new declarations over
//! an existing catalog; names resolve against both.

mod file;

pub use file::{CapabilityEntry, CatalogFile, CellEntry};

use crate::capability::Capability;
use crate::cell::{CellKind, CellSerializer};
use crate::config::RegistrySettings;
use crate::discovery::discover;
use crate::error::CatalogError;
use crate::utility::UtilityFactory;
use crate::value::MISSING_CELL_NAME;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Declarations
// ---------------------------------------------------------------------------

/// Name-based capability declaration.
#[derive(Debug, Clone)]
pub struct CapabilityDecl {
    name: String,
    extends: Vec<String>,
    utility: Option<UtilityFactory>,
}

impl CapabilityDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extends: Vec::new(),
            utility: None,
        }
    }

    #[must_use]
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.extends.push(parent.into());
        self
    }

    #[must_use]
    pub fn utility(mut self, utility: UtilityFactory) -> Self {
        self.utility = Some(utility);
        self
    }
}

/// Name-based cell kind declaration.
#[derive(Debug, Clone)]
pub struct CellDecl {
    name: String,
    extends: Option<String>,
    implements: Vec<String>,
    preferred: Option<String>,
    serializer: Option<Arc<dyn CellSerializer>>,
}

impl CellDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extends: None,
            implements: Vec::new(),
            preferred: None,
            serializer: None,
        }
    }

    #[must_use]
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.extends = Some(parent.into());
        self
    }

    #[must_use]
    pub fn implements(mut self, capability: impl Into<String>) -> Self {
        self.implements.push(capability.into());
        self
    }

    #[must_use]
    pub fn preferred(mut self, capability: impl Into<String>) -> Self {
        self.preferred = Some(capability.into());
        self
    }

    #[must_use]
    pub fn serializer(mut self, serializer: Arc<dyn CellSerializer>) -> Self {
        self.serializer = Some(serializer);
        self
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Validated registration table.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    capabilities: Vec<Capability>,
    cells: Vec<CellKind>,
    capability_index: HashMap<String, Capability>,
    cell_index: HashMap<String, CellKind>,
    settings: RegistrySettings,
}

impl Catalog {
    #[must_use]
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// Builder layering new declarations over `self`.
    #[must_use]
    pub fn extend(&self) -> CatalogBuilder {
        CatalogBuilder {
            base: Some(self.clone()),
            settings: self.settings.clone(),
            ..CatalogBuilder::default()
        }
    }

    /// The statically known cell kinds; see [`crate::builtin`].
    #[must_use]
    pub fn builtin() -> Self {
        crate::builtin::catalog()
    }

    /// Index already-resolved handles. Parents must precede children.
    pub(crate) fn from_handles(
        capabilities: Vec<Capability>,
        cells: Vec<CellKind>,
        settings: RegistrySettings,
    ) -> Self {
        let capability_index = capabilities
            .iter()
            .map(|c| (c.name().to_string(), c.clone()))
            .collect();
        let cell_index = cells
            .iter()
            .map(|k| (k.name().to_string(), k.clone()))
            .collect();
        Self {
            capabilities,
            cells,
            capability_index,
            cell_index,
            settings,
        }
    }

    #[must_use]
    pub fn capability(&self, name: &str) -> Option<&Capability> {
        self.capability_index.get(name)
    }

    #[must_use]
    pub fn cell(&self, name: &str) -> Option<&CellKind> {
        self.cell_index.get(name)
    }

    /// Capabilities in registration order.
    #[must_use]
    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    /// Cell kinds in registration order.
    #[must_use]
    pub fn cells(&self) -> &[CellKind] {
        &self.cells
    }

    #[must_use]
    pub fn settings(&self) -> &RegistrySettings {
        &self.settings
    }
}

// ---------------------------------------------------------------------------
// CatalogBuilder
// ---------------------------------------------------------------------------

/// Collects declarations; see the module docs for validation rules.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    base: Option<Catalog>,
    capabilities: Vec<CapabilityDecl>,
    cells: Vec<CellDecl>,
    settings: RegistrySettings,
}

impl CatalogBuilder {
    #[must_use]
    pub fn capability(mut self, decl: CapabilityDecl) -> Self {
        self.capabilities.push(decl);
        self
    }

    #[must_use]
    pub fn cell(mut self, decl: CellDecl) -> Self {
        self.cells.push(decl);
        self
    }

    #[must_use]
    pub fn settings(mut self, settings: RegistrySettings) -> Self {
        self.settings = settings;
        self
    }

    /// Resolve and validate every declaration.
    ///
    /// # Errors
    ///
    /// See [`CatalogError`].
    pub fn build(self) -> Result<Catalog, CatalogError> {
        let CatalogBuilder {
            base,
            capabilities: cap_decls,
            cells: cell_decls,
            settings,
        } = self;
        let base = base.unwrap_or_default();

        let mut resolver = Resolver {
            base: &base,
            cap_decls: index_unique(&cap_decls, |d| &d.name, |n| {
                base.capability(n).is_some()
            })
            .map_err(CatalogError::DuplicateCapability)?,
            cell_decls: index_unique(&cell_decls, |d| &d.name, |n| base.cell(n).is_some())
                .map_err(CatalogError::DuplicateCell)?,
            visiting: HashSet::new(),
            caps: HashMap::new(),
            cells: HashMap::new(),
            cap_order: Vec::new(),
            cell_order: Vec::new(),
        };

        if let Some(decl) = cell_decls.iter().find(|d| d.name == MISSING_CELL_NAME) {
            return Err(CatalogError::ReservedName(decl.name.clone()));
        }

        for decl in &cap_decls {
            resolver.capability(&decl.name, &cap_decls)?;
        }
        for decl in &cell_decls {
            resolver.cell(&decl.name, &cell_decls)?;
        }

        let Resolver {
            cap_order,
            cell_order,
            ..
        } = resolver;

        if settings.strict_preferred {
            for kind in &cell_order {
                let found = discover(kind, None);
                if let (false, Some(preferred)) = (found.preferred_is_implemented(), found.preferred)
                {
                    return Err(CatalogError::PreferredNotImplemented {
                        cell: kind.name().to_string(),
                        capability: preferred.name().to_string(),
                    });
                }
            }
        }

        let mut capabilities = base.capabilities.clone();
        capabilities.extend(cap_order);
        let mut cells = base.cells.clone();
        cells.extend(cell_order);

        log::debug!(
            "[catalog] built {} capabilities, {} cell kinds",
            capabilities.len(),
            cells.len()
        );
        Ok(Catalog::from_handles(capabilities, cells, settings))
    }
}

fn index_unique<T>(
    decls: &[T],
    name: impl Fn(&T) -> &String,
    in_base: impl Fn(&str) -> bool,
) -> Result<HashMap<String, usize>, String> {
    let mut index = HashMap::new();
    for (i, decl) in decls.iter().enumerate() {
        let n = name(decl);
        if in_base(n) || index.insert(n.clone(), i).is_some() {
            return Err(n.clone());
        }
    }
    Ok(index)
}

struct Resolver<'a> {
    base: &'a Catalog,
    cap_decls: HashMap<String, usize>,
    cell_decls: HashMap<String, usize>,
    visiting: HashSet<String>,
    caps: HashMap<String, Capability>,
    cells: HashMap<String, CellKind>,
    cap_order: Vec<Capability>,
    cell_order: Vec<CellKind>,
}

impl Resolver<'_> {
    fn lookup_capability(&self, name: &str) -> Option<Capability> {
        self.caps
            .get(name)
            .or_else(|| self.base.capability(name))
            .cloned()
    }

    fn capability(
        &mut self,
        name: &str,
        decls: &[CapabilityDecl],
    ) -> Result<Capability, CatalogError> {
        if let Some(cap) = self.lookup_capability(name) {
            return Ok(cap);
        }
        if !self.visiting.insert(format!("capability:{name}")) {
            return Err(CatalogError::CapabilityCycle(name.to_string()));
        }

        let Some(&idx) = self.cap_decls.get(name) else {
            return self
                .base
                .capability(name)
                .cloned()
                .ok_or_else(|| CatalogError::Invalid(format!("unknown capability '{name}'")));
        };
        let decl = &decls[idx];

        let mut parents = Vec::with_capacity(decl.extends.len());
        for parent in &decl.extends {
            if self.cap_decls.get(parent.as_str()).is_none() && self.base.capability(parent).is_none()
            {
                return Err(CatalogError::UnknownCapability {
                    owner: decl.name.clone(),
                    name: parent.clone(),
                });
            }
            let resolved = self.capability(parent, decls)?;
            if !parents.contains(&resolved) {
                parents.push(resolved);
            }
        }

        let cap = Capability::new(decl.name.as_str(), parents, decl.utility.clone());
        self.caps.insert(name.to_string(), cap.clone());
        self.cap_order.push(cap.clone());
        Ok(cap)
    }

    fn cell(&mut self, name: &str, decls: &[CellDecl]) -> Result<CellKind, CatalogError> {
        if let Some(kind) = self.cells.get(name).or_else(|| self.base.cell(name)) {
            return Ok(kind.clone());
        }
        if !self.visiting.insert(format!("cell:{name}")) {
            return Err(CatalogError::CellCycle(name.to_string()));
        }

        let Some(&idx) = self.cell_decls.get(name) else {
            return self
                .base
                .cell(name)
                .cloned()
                .ok_or_else(|| CatalogError::Invalid(format!("unknown cell kind '{name}'")));
        };
        let decl = &decls[idx];

        let mut builder = CellKind::builder(decl.name.as_str());
        if let Some(parent) = &decl.extends {
            if self.cell_decls.get(parent.as_str()).is_none() && self.base.cell(parent).is_none() {
                return Err(CatalogError::UnknownCell {
                    owner: decl.name.clone(),
                    name: parent.clone(),
                });
            }
            builder = builder.extends(self.cell(parent, decls)?);
        }

        for cap_name in &decl.implements {
            let cap = self.lookup_capability(cap_name).ok_or_else(|| {
                CatalogError::UnknownCapability {
                    owner: decl.name.clone(),
                    name: cap_name.clone(),
                }
            })?;
            builder = builder.implements(cap);
        }

        if let Some(preferred) = &decl.preferred {
            match self.lookup_capability(preferred) {
                Some(cap) => builder = builder.preferred(cap),
                None => log::warn!(
                    "[coding] cell kind '{}' names unknown capability '{}' as preferred; ignoring the preference",
                    decl.name,
                    preferred
                ),
            }
        }

        if let Some(serializer) = &decl.serializer {
            builder = builder.serializer(Arc::clone(serializer));
        }

        let kind = builder.build();
        self.cells.insert(name.to_string(), kind.clone());
        self.cell_order.push(kind.clone());
        Ok(kind)
    }
}
