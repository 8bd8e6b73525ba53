// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Common supertype (lattice meet) of two descriptors.

use super::DataType;

impl DataType {
    /// Most specific descriptor compatible with everything both `a` and `b`
    /// are compatible with. Total and commutative.
    ///
    /// 1. The missing descriptor is absorbed: `meet(missing, x) == x`.
    /// 2. If exactly one side is a supertype of the other, that side is
    ///    returned (equal inputs return `a`).
    /// 3. Otherwise the result is non-native: the capabilities present in
    ///    both inputs, in `a`'s order, preferred only when both inputs
    ///    prefer the same capability. Two mutual supertypes that are not
    ///    equal (same reachable capabilities, different preference) take
    ///    this path too, which keeps the operation commutative.
    #[must_use]
    pub fn common_supertype(a: &DataType, b: &DataType) -> DataType {
        if a.is_missing() {
            return b.clone();
        }
        if b.is_missing() {
            return a.clone();
        }

        match (a.is_supertype_of(b), b.is_supertype_of(a)) {
            (true, false) => return a.clone(),
            (false, true) => return b.clone(),
            (true, true) if a == b => return a.clone(),
            _ => {}
        }

        let has_preferred = match (a.preferred_capability(), b.preferred_capability()) {
            (Some(pa), Some(pb)) => pa == pb,
            _ => false,
        };
        let shared = a
            .capabilities()
            .iter()
            .filter(|cap| b.capabilities().contains(*cap))
            .cloned()
            .collect();

        DataType::derived(shared, has_preferred)
    }
}
