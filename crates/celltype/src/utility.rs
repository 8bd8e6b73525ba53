// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-capability utility metadata: comparator, icon and renderer family.
//!
//! # Resolution
//!
//! A capability's bundle is the one it declares itself, else the bundle of
//! its first declaring ancestor (depth-first over `parents`), else the
//! universal bundle. Results are memoized in a [`UtilityCache`].
//!
//! Bundle members are individually optional. Descriptor-level lookups walk
//! a descriptor's capabilities in order and take the first present member,
//! falling back to [`DataValueComparator::fallback`], [`Icon::generic`] and
//! [`StringRendererFamily`].

use crate::capability::Capability;
use crate::value::DataValue;
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Icon
// ---------------------------------------------------------------------------

/// Named icon handle. Rendering the icon is up to the front end.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Icon {
    name: Arc<str>,
}

impl Icon {
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        Self { name: name.into() }
    }

    /// Icon used when no capability declares one.
    #[must_use]
    pub fn generic() -> Self {
        Self::named("generic")
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

// ---------------------------------------------------------------------------
// Comparators
// ---------------------------------------------------------------------------

/// Orders two (non-missing) values of one capability.
pub trait ValueComparator: Send + Sync + fmt::Debug {
    fn compare_values(&self, a: &dyn DataValue, b: &dyn DataValue) -> Ordering;
}

/// Orders by the values' `Display` text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToStringComparator;

impl ValueComparator for ToStringComparator {
    fn compare_values(&self, a: &dyn DataValue, b: &dyn DataValue) -> Ordering {
        a.to_string().cmp(&b.to_string())
    }
}

/// Orders by the numeric view (`f64::total_cmp`).
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericComparator;

impl ValueComparator for NumericComparator {
    fn compare_values(&self, a: &dyn DataValue, b: &dyn DataValue) -> Ordering {
        match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => ToStringComparator.compare_values(a, b),
        }
    }
}

/// Orders by the textual view.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalComparator;

impl ValueComparator for LexicalComparator {
    fn compare_values(&self, a: &dyn DataValue, b: &dyn DataValue) -> Ordering {
        match (a.as_text(), b.as_text()) {
            (Some(x), Some(y)) => x.cmp(y),
            _ => ToStringComparator.compare_values(a, b),
        }
    }
}

/// Orders by the logical view, `false` first.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogicalComparator;

impl ValueComparator for LogicalComparator {
    fn compare_values(&self, a: &dyn DataValue, b: &dyn DataValue) -> Ordering {
        match (a.as_bool(), b.as_bool()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => ToStringComparator.compare_values(a, b),
        }
    }
}

/// Comparator handed out by descriptors.
///
/// Missing values sort before every other value. Comparing two missing
/// values is a precondition violation: callers must filter them first.
#[derive(Debug, Clone)]
pub struct DataValueComparator {
    inner: Arc<dyn ValueComparator>,
}

impl DataValueComparator {
    pub fn new(inner: Arc<dyn ValueComparator>) -> Self {
        Self { inner }
    }

    /// Comparator ordering by `Display` text.
    #[must_use]
    pub fn fallback() -> Self {
        Self::new(Arc::new(ToStringComparator))
    }

    /// The wrapped capability comparator.
    #[must_use]
    pub fn inner(&self) -> &Arc<dyn ValueComparator> {
        &self.inner
    }

    /// Compare two cell values.
    ///
    /// # Panics
    ///
    /// In debug builds, if both values are missing.
    pub fn compare(&self, a: &dyn DataValue, b: &dyn DataValue) -> Ordering {
        match (a.is_missing(), b.is_missing()) {
            (true, true) => {
                debug_assert!(false, "two missing values must never be compared");
                log::error!("[coding] DataValueComparator::compare called with two missing values");
                Ordering::Equal
            }
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self.inner.compare_values(a, b),
        }
    }
}

// ---------------------------------------------------------------------------
// Renderers
// ---------------------------------------------------------------------------

/// Column metadata passed to renderer factories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub properties: BTreeMap<String, String>,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

/// A family of renderers for one value view.
pub trait RendererFamily: Send + Sync + fmt::Debug {
    fn description(&self) -> &str;

    fn render(&self, value: &dyn DataValue) -> String;
}

/// Renders any value through `Display`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringRendererFamily;

impl RendererFamily for StringRendererFamily {
    fn description(&self) -> &str {
        "String"
    }

    fn render(&self, value: &dyn DataValue) -> String {
        value.to_string()
    }
}

/// Column property holding the number of decimals for numeric rendering.
pub const DECIMALS_PROPERTY: &str = "renderer.decimals";

/// Largest accepted [`DECIMALS_PROPERTY`] value.
pub const MAX_DECIMALS: usize = 17;

/// Renders the numeric view, optionally with a fixed number of decimals.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericRendererFamily {
    decimals: Option<usize>,
}

impl NumericRendererFamily {
    /// Configure from the column's [`DECIMALS_PROPERTY`]. Unparsable values
    /// and values above [`MAX_DECIMALS`] are ignored.
    #[must_use]
    pub fn for_column(spec: &ColumnSpec) -> Self {
        let decimals = spec.property(DECIMALS_PROPERTY).and_then(|raw| {
            match raw.trim().parse::<usize>() {
                Ok(d) if d <= MAX_DECIMALS => Some(d),
                Ok(_) => {
                    log::debug!(
                        "[utility] column '{}' has out-of-range {}='{}' (max {})",
                        spec.name,
                        DECIMALS_PROPERTY,
                        raw,
                        MAX_DECIMALS
                    );
                    None
                }
                Err(_) => {
                    log::debug!(
                        "[utility] column '{}' has unparsable {}='{}'",
                        spec.name,
                        DECIMALS_PROPERTY,
                        raw
                    );
                    None
                }
            }
        });
        Self { decimals }
    }
}

impl RendererFamily for NumericRendererFamily {
    fn description(&self) -> &str {
        "Numeric"
    }

    fn render(&self, value: &dyn DataValue) -> String {
        match (value.as_f64(), self.decimals) {
            (Some(v), Some(d)) => format!("{v:.d$}"),
            (Some(v), None) => v.to_string(),
            (None, _) => value.to_string(),
        }
    }
}

/// Ordered, never empty composite of renderer families.
#[derive(Debug, Clone)]
pub struct RendererSet {
    families: Vec<Arc<dyn RendererFamily>>,
}

impl RendererSet {
    /// Build from collected families, substituting [`StringRendererFamily`]
    /// for an empty list.
    #[must_use]
    pub fn new(mut families: Vec<Arc<dyn RendererFamily>>) -> Self {
        if families.is_empty() {
            families.push(Arc::new(StringRendererFamily));
        }
        Self { families }
    }

    #[must_use]
    pub fn families(&self) -> &[Arc<dyn RendererFamily>] {
        &self.families
    }

    #[must_use]
    pub fn descriptions(&self) -> Vec<&str> {
        self.families.iter().map(|f| f.description()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.families.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    /// Render with the first (preferred) family.
    #[must_use]
    pub fn render(&self, value: &dyn DataValue) -> String {
        match self.families.first() {
            Some(family) => family.render(value),
            None => value.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// UtilityFactory
// ---------------------------------------------------------------------------

/// Builds a renderer family for one column, or declines with `None`.
pub type RendererFactory =
    Arc<dyn Fn(&ColumnSpec) -> Option<Arc<dyn RendererFamily>> + Send + Sync>;

/// Utility bundle declared by a capability.
#[derive(Clone, Default)]
pub struct UtilityFactory {
    comparator: Option<Arc<dyn ValueComparator>>,
    icon: Option<Icon>,
    renderer: Option<RendererFactory>,
}

impl UtilityFactory {
    /// Empty bundle; every member is absent.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bundle every capability resolves to when nothing in its hierarchy
    /// declares one. Only the icon is present.
    #[must_use]
    pub fn universal() -> Self {
        Self::new().with_icon(Icon::generic())
    }

    #[must_use]
    pub fn with_comparator(mut self, comparator: Arc<dyn ValueComparator>) -> Self {
        self.comparator = Some(comparator);
        self
    }

    #[must_use]
    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    #[must_use]
    pub fn with_renderer<F>(mut self, factory: F) -> Self
    where
        F: Fn(&ColumnSpec) -> Option<Arc<dyn RendererFamily>> + Send + Sync + 'static,
    {
        self.renderer = Some(Arc::new(factory));
        self
    }

    #[must_use]
    pub fn comparator(&self) -> Option<&Arc<dyn ValueComparator>> {
        self.comparator.as_ref()
    }

    #[must_use]
    pub fn icon(&self) -> Option<&Icon> {
        self.icon.as_ref()
    }

    #[must_use]
    pub fn renderer_family(&self, spec: &ColumnSpec) -> Option<Arc<dyn RendererFamily>> {
        self.renderer.as_ref().and_then(|factory| factory(spec))
    }
}

impl fmt::Debug for UtilityFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UtilityFactory")
            .field("comparator", &self.comparator)
            .field("icon", &self.icon)
            .field("renderer", &self.renderer.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// UtilityCache
// ---------------------------------------------------------------------------

/// Memoizing capability -> bundle map.
///
/// Resolution is pure, so concurrent misses may resolve the same capability
/// twice; the first insertion wins and every reader sees an equal bundle.
#[derive(Debug)]
pub struct UtilityCache {
    resolved: RwLock<HashMap<Capability, Arc<UtilityFactory>>>,
    universal: Arc<UtilityFactory>,
}

impl UtilityCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            resolved: RwLock::new(HashMap::new()),
            universal: Arc::new(UtilityFactory::universal()),
        }
    }

    /// Bundle for `cap`, resolving and caching it on first use.
    pub fn resolve(&self, cap: &Capability) -> Arc<UtilityFactory> {
        if let Some(hit) = self.resolved.read().get(cap) {
            return Arc::clone(hit);
        }

        let bundle = match find_declared(cap) {
            Some(bundle) => bundle,
            None => {
                log::debug!(
                    "[utility] capability '{}' declares no utility bundle, using universal bundle",
                    cap
                );
                Arc::clone(&self.universal)
            }
        };

        Arc::clone(self.resolved.write().entry(cap.clone()).or_insert(bundle))
    }

    /// The universal bundle.
    #[must_use]
    pub fn universal(&self) -> &Arc<UtilityFactory> {
        &self.universal
    }

    /// Number of resolved capabilities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resolved.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resolved.read().is_empty()
    }
}

impl Default for UtilityCache {
    fn default() -> Self {
        Self::new()
    }
}

fn find_declared(cap: &Capability) -> Option<Arc<UtilityFactory>> {
    if let Some(own) = cap.declared_utility() {
        return Some(Arc::clone(own));
    }
    cap.parents().iter().find_map(find_declared)
}
