// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Cell type system for tabular data.
//!
//! Every table cell is an instance of a *cell kind*. A cell kind implements
//! a set of *capabilities* (typed views such as numeric or textual), may
//! nominate one of them as preferred, and may ship a fast-path binary
//! serializer. This crate derives immutable type descriptors from those
//! declarations and provides the operations column-type inference needs.
//!
//! # Features
//!
//! - **Registration**: a validated [`Catalog`] of capabilities and cell
//!   kinds, built in code or loaded from a TOML [`CatalogFile`]
//! - **Descriptors**: [`DataType`] with compatibility, supertype and meet
//!   ([`DataType::common_supertype`]) operations
//! - **Utility metadata**: comparator, icon and renderer family per
//!   descriptor, resolved through the capability hierarchy
//! - **Persistence**: descriptors saved to and loaded from a flat
//!   [`ConfigTree`] ([`codec`])
//!
//! # Architecture
//!
//! ```text
//!   Catalog (capabilities, cell kinds, settings)
//!        |
//!        v
//!   Registry ── type_of ──> DataType ── codec ──> ConfigTree
//!        |
//!        v
//!   UtilityCache (comparator / icon / renderers)
//! ```
//!
//! # Example
//!
//! ```
//! use celltype::{builtin, DataType, Registry};
//!
//! let registry = Registry::builtin();
//! let whole = registry.type_of_name(builtin::WHOLE).unwrap();
//! let real = registry.type_of_name(builtin::REAL).unwrap();
//!
//! let column = DataType::common_supertype(&whole, &real);
//! assert_eq!(column, whole);
//! ```

pub mod builtin;
pub mod capability;
pub mod catalog;
pub mod cell;
pub mod codec;
pub mod config;
pub mod data_type;
pub mod discovery;
pub mod error;
pub mod registry;
pub mod utility;
pub mod value;

pub use capability::Capability;
pub use catalog::{CapabilityDecl, Catalog, CatalogBuilder, CatalogFile, CellDecl};
pub use cell::{CellKind, CellKindBuilder, CellSerializer};
pub use config::{ConfigTree, ConfigValue, RegistrySettings};
pub use data_type::DataType;
pub use discovery::{discover, Discovery};
pub use error::{CatalogError, ConfigError, SerializeError, TypeError};
pub use registry::{global, install, Registry};
pub use utility::{
    ColumnSpec, DataValueComparator, Icon, RendererFamily, RendererSet, UtilityCache,
    UtilityFactory, ValueComparator,
};
pub use value::{DataValue, MissingValue, MISSING, MISSING_CELL_NAME};
