// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Descriptor persistence in a [`ConfigTree`].
//!
//! | key                    | leaf          | written for          |
//! |------------------------|---------------|----------------------|
//! | `cell_class`           | string / null | every descriptor     |
//! | `has_pref_value_class` | bool          | non-native only      |
//! | `value_classes`        | string array  | non-native only      |
//!
//! Native descriptors store only their cell kind name and are re-derived
//! through the registry on load. The missing descriptor stores the reserved
//! missing-cell name.

use crate::config::ConfigTree;
use crate::data_type::DataType;
use crate::error::TypeError;
use crate::registry::Registry;
use crate::value::MISSING_CELL_NAME;

pub const CELL_CLASS_KEY: &str = "cell_class";
pub const HAS_PREFERRED_KEY: &str = "has_pref_value_class";
pub const VALUE_CLASSES_KEY: &str = "value_classes";

/// Write `ty` into `tree`.
pub fn save(ty: &DataType, tree: &mut ConfigTree) {
    if let Some(kind) = ty.cell_kind() {
        tree.add_string(CELL_CLASS_KEY, Some(kind.name()));
        return;
    }
    if ty.is_missing() {
        tree.add_string(CELL_CLASS_KEY, Some(MISSING_CELL_NAME));
        return;
    }

    tree.add_string(CELL_CLASS_KEY, None);
    tree.add_bool(HAS_PREFERRED_KEY, ty.has_preferred());
    tree.add_string_array(
        VALUE_CLASSES_KEY,
        ty.capabilities().iter().map(|cap| cap.name().to_string()),
    );
}

/// Read a descriptor written by [`save`].
///
/// # Errors
///
/// - [`TypeError::InvalidArgument`] if a key is missing or holds the wrong
///   kind of leaf, or the stored capability list is malformed.
/// - [`TypeError::UnresolvableReference`] naming the first cell kind or
///   capability the registry does not know.
pub fn load(tree: &ConfigTree, registry: &Registry) -> Result<DataType, TypeError> {
    if let Some(name) = tree.get_string(CELL_CLASS_KEY)? {
        return registry.type_of_name(name);
    }

    let has_preferred = tree.get_bool(HAS_PREFERRED_KEY)?;
    let capabilities = tree
        .get_string_array(VALUE_CLASSES_KEY)?
        .iter()
        .map(|name| {
            registry
                .capability(name)
                .cloned()
                .ok_or_else(|| TypeError::UnresolvableReference(format!("capability '{}'", name)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    DataType::from_raw(has_preferred, capabilities)
}
