// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! TOML catalog files.
//!
//! ```toml
//! include_builtin = true
//!
//! [registry]
//! strict_preferred = false
//!
//! [[capability]]
//! name = "Geo"
//! extends = ["Comparable"]
//! icon = "globe"
//! comparator = "lexical"   # numeric | lexical | logical | text
//! renderer = "string"      # string | numeric
//!
//! [[cell]]
//! name = "Point"
//! implements = ["Geo"]
//! preferred = "Geo"
//! ```

use super::{Catalog, CapabilityDecl, CellDecl};
use crate::config::RegistrySettings;
use crate::error::CatalogError;
use crate::utility::{
    Icon, LexicalComparator, LogicalComparator, NumericComparator, NumericRendererFamily,
    RendererFamily, StringRendererFamily, ToStringComparator, UtilityFactory, ValueComparator,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Parsed catalog file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    /// Layer the declarations over [`Catalog::builtin`].
    #[serde(default = "default_true")]
    pub include_builtin: bool,

    #[serde(default)]
    pub registry: RegistrySettings,

    #[serde(default, rename = "capability")]
    pub capabilities: Vec<CapabilityEntry>,

    #[serde(default, rename = "cell")]
    pub cells: Vec<CellEntry>,
}

/// `[[capability]]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityEntry {
    pub name: String,
    #[serde(default)]
    pub extends: Vec<String>,
    pub icon: Option<String>,
    pub comparator: Option<String>,
    pub renderer: Option<String>,
}

/// `[[cell]]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellEntry {
    pub name: String,
    pub extends: Option<String>,
    #[serde(default)]
    pub implements: Vec<String>,
    pub preferred: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for CatalogFile {
    fn default() -> Self {
        Self {
            include_builtin: true,
            registry: RegistrySettings::default(),
            capabilities: Vec::new(),
            cells: Vec::new(),
        }
    }
}

impl CatalogFile {
    /// Load a catalog file from disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse catalog TOML.
    pub fn parse(content: &str) -> Result<Self, CatalogError> {
        Ok(toml::from_str(content)?)
    }

    /// Resolve the declarations into a [`Catalog`].
    pub fn into_catalog(self) -> Result<Catalog, CatalogError> {
        let mut builder = if self.include_builtin {
            Catalog::builtin().extend()
        } else {
            Catalog::builder()
        };
        builder = builder.settings(self.registry);

        for entry in self.capabilities {
            let mut decl = CapabilityDecl::new(entry.name.as_str());
            for parent in &entry.extends {
                decl = decl.extends(parent.as_str());
            }
            if let Some(utility) = utility_for(&entry)? {
                decl = decl.utility(utility);
            }
            builder = builder.capability(decl);
        }

        for entry in self.cells {
            let mut decl = CellDecl::new(entry.name);
            if let Some(parent) = entry.extends {
                decl = decl.extends(parent);
            }
            for cap in entry.implements {
                decl = decl.implements(cap);
            }
            if let Some(preferred) = entry.preferred {
                decl = decl.preferred(preferred);
            }
            builder = builder.cell(decl);
        }

        builder.build()
    }
}

fn utility_for(entry: &CapabilityEntry) -> Result<Option<UtilityFactory>, CatalogError> {
    if entry.icon.is_none() && entry.comparator.is_none() && entry.renderer.is_none() {
        return Ok(None);
    }

    let mut utility = UtilityFactory::new();
    if let Some(icon) = &entry.icon {
        utility = utility.with_icon(Icon::named(icon.as_str()));
    }
    if let Some(name) = &entry.comparator {
        let comparator: Arc<dyn ValueComparator> = match name.as_str() {
            "numeric" => Arc::new(NumericComparator),
            "lexical" => Arc::new(LexicalComparator),
            "logical" => Arc::new(LogicalComparator),
            "text" => Arc::new(ToStringComparator),
            other => {
                return Err(CatalogError::Invalid(format!(
                    "capability '{}': unknown comparator '{}'",
                    entry.name, other
                )))
            }
        };
        utility = utility.with_comparator(comparator);
    }
    if let Some(name) = &entry.renderer {
        utility = match name.as_str() {
            "string" => utility.with_renderer(|_| {
                Some(Arc::new(StringRendererFamily) as Arc<dyn RendererFamily>)
            }),
            "numeric" => utility.with_renderer(|spec| {
                Some(Arc::new(NumericRendererFamily::for_column(spec)) as Arc<dyn RendererFamily>)
            }),
            other => {
                return Err(CatalogError::Invalid(format!(
                    "capability '{}': unknown renderer '{}'",
                    entry.name, other
                )))
            }
        };
    }
    Ok(Some(utility))
}
