// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! celltype-inspect - Inspect cell kinds and type descriptors
//!
//! Lists the registration table, prints native descriptors and their
//! metadata, computes common supertypes and loads saved descriptors.

use anyhow::{Context, Result};
use celltype::{codec, Catalog, CatalogFile, ColumnSpec, ConfigTree, DataType, Registry};
use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "celltype-inspect")]
#[command(about = "Inspect cell kinds, type descriptors and saved descriptors")]
#[command(version)]
struct Cli {
    /// TOML catalog file layered over the builtin catalog
    #[arg(long, value_name = "FILE", global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered capabilities and cell kinds
    List,

    /// Show the descriptor of a cell kind
    Type {
        /// Cell kind name
        cell: String,

        /// Column property (KEY=VALUE) passed to renderer factories
        #[arg(short, long, value_name = "KEY=VALUE")]
        property: Vec<String>,
    },

    /// Show the common supertype of two cell kinds
    Meet {
        /// First cell kind
        a: String,

        /// Second cell kind
        b: String,
    },

    /// Load a saved descriptor (JSON config tree)
    Load {
        /// Input JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let registry = open_registry(cli.catalog.as_deref())?;

    match cli.command {
        Commands::List => print!("{}", list(&registry)),
        Commands::Type { cell, property } => {
            let ty = registry.type_of_name(&cell)?;
            let spec = column_spec(&cell, &property)?;
            print!("{}", describe(&registry, &ty, &spec)?);
        }
        Commands::Meet { a, b } => {
            let ta = registry.type_of_name(&a)?;
            let tb = registry.type_of_name(&b)?;
            let meet = registry.common_supertype(Some(&ta), Some(&tb))?;
            println!("{} ^ {}", ta, tb);
            print!("{}", describe(&registry, &meet, &ColumnSpec::new("meet"))?);
        }
        Commands::Load { input } => {
            let ty = load_file(&registry, &input)?;
            print!("{}", describe(&registry, &ty, &ColumnSpec::new("loaded"))?);
        }
    }

    Ok(())
}

fn open_registry(catalog: Option<&Path>) -> Result<Registry> {
    let catalog = match catalog {
        Some(path) => {
            log::debug!("[inspect] loading catalog {}", path.display());
            CatalogFile::from_path(path)
                .and_then(CatalogFile::into_catalog)
                .with_context(|| format!("failed to load catalog {}", path.display()))?
        }
        None => Catalog::builtin(),
    };
    Ok(Registry::new(catalog))
}

fn column_spec(name: &str, properties: &[String]) -> Result<ColumnSpec> {
    let mut spec = ColumnSpec::new(name);
    for raw in properties {
        let (key, value) = raw
            .split_once('=')
            .with_context(|| format!("property '{}' is not KEY=VALUE", raw))?;
        spec = spec.with_property(key.trim(), value.trim());
    }
    Ok(spec)
}

fn load_file(registry: &Registry, path: &Path) -> Result<DataType> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let tree = ConfigTree::from_json(&content)?;
    Ok(codec::load(&tree, registry)?)
}

fn list(registry: &Registry) -> String {
    let catalog = registry.catalog();
    let mut out = String::new();

    let _ = writeln!(out, "Capabilities ({}):", catalog.capabilities().len());
    for cap in catalog.capabilities() {
        let parents: Vec<_> = cap.parents().iter().map(|p| p.name()).collect();
        if parents.is_empty() {
            let _ = writeln!(out, "  {}", cap);
        } else {
            let _ = writeln!(out, "  {} : {}", cap, parents.join(", "));
        }
    }

    let _ = writeln!(out, "Cell kinds ({}):", catalog.cells().len());
    for kind in catalog.cells() {
        let ty = registry.type_of(kind);
        let extends = kind
            .parent()
            .map(|p| format!(" extends {}", p))
            .unwrap_or_default();
        let _ = writeln!(out, "  {}{} -> {}", kind, extends, capability_list(&ty));
    }
    out
}

fn capability_list(ty: &DataType) -> String {
    let names: Vec<String> = ty
        .capabilities()
        .iter()
        .enumerate()
        .map(|(i, cap)| {
            if i == 0 && ty.has_preferred() {
                format!("*{}", cap)
            } else {
                cap.to_string()
            }
        })
        .collect();
    format!("[{}]", names.join(", "))
}

fn describe(registry: &Registry, ty: &DataType, spec: &ColumnSpec) -> Result<String> {
    let mut out = String::new();
    let _ = writeln!(out, "type:         {}", ty);
    let _ = writeln!(out, "native:       {}", ty.is_native());
    let _ = writeln!(out, "capabilities: {}", capability_list(ty));
    let _ = writeln!(out, "icon:         {}", registry.icon(ty).name());
    let _ = writeln!(
        out,
        "comparator:   {:?}",
        registry.comparator(ty).inner()
    );
    let _ = writeln!(
        out,
        "renderers:    {}",
        registry.renderer_family(ty, spec).descriptions().join(", ")
    );
    if let Some(kind) = ty.cell_kind() {
        let serializer = registry
            .serializer_for(kind)
            .map_or_else(|| "none".to_string(), |s| format!("{:?}", s));
        let _ = writeln!(out, "serializer:   {}", serializer);
    }

    let mut tree = ConfigTree::new();
    codec::save(ty, &mut tree);
    let _ = writeln!(out, "saved:\n{}", tree.to_json()?);
    Ok(out)
}
