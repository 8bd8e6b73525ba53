// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Configuration: registry settings and the portable key/value tree that
//! descriptors are saved into.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// RegistrySettings
// ---------------------------------------------------------------------------

/// Registry behaviour switches, read from the `[registry]` table of a
/// catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySettings {
    /// Reject cell kinds that prefer a capability they do not implement
    /// instead of logging and honoring the preference.
    #[serde(default)]
    pub strict_preferred: bool,

    /// Resolve utility bundles while discovering capabilities.
    #[serde(default = "default_true")]
    pub warm_utilities: bool,
}

fn default_true() -> bool {
    true
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            strict_preferred: false,
            warm_utilities: true,
        }
    }
}

// ---------------------------------------------------------------------------
// ConfigTree
// ---------------------------------------------------------------------------

/// Leaf of a [`ConfigTree`]. `Null` is the absent-marker of a string leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Null,
    Bool(bool),
    String(String),
    StringArray(Vec<String>),
}

impl ConfigValue {
    fn kind(&self) -> &'static str {
        match self {
            ConfigValue::Null => "null",
            ConfigValue::Bool(_) => "bool",
            ConfigValue::String(_) => "string",
            ConfigValue::StringArray(_) => "string array",
        }
    }
}

/// Flat key/value configuration tree.
///
/// Serializes to a JSON object; array leaves keep their element order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigTree {
    entries: BTreeMap<String, ConfigValue>,
}

impl ConfigTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a string leaf; `None` stores the absent-marker.
    pub fn add_string(&mut self, key: &str, value: Option<&str>) {
        let leaf = match value {
            Some(s) => ConfigValue::String(s.to_string()),
            None => ConfigValue::Null,
        };
        self.entries.insert(key.to_string(), leaf);
    }

    pub fn add_bool(&mut self, key: &str, value: bool) {
        self.entries.insert(key.to_string(), ConfigValue::Bool(value));
    }

    pub fn add_string_array<I, S>(&mut self, key: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.entries
            .insert(key.to_string(), ConfigValue::StringArray(values));
    }

    /// Read a string leaf; `Ok(None)` for the absent-marker.
    ///
    /// # Errors
    ///
    /// If the key is missing or holds another kind of leaf.
    pub fn get_string(&self, key: &str) -> Result<Option<&str>, ConfigError> {
        match self.get(key)? {
            ConfigValue::Null => Ok(None),
            ConfigValue::String(s) => Ok(Some(s)),
            other => Err(wrong_type(key, "string", other)),
        }
    }

    /// # Errors
    ///
    /// If the key is missing or not a bool leaf.
    pub fn get_bool(&self, key: &str) -> Result<bool, ConfigError> {
        match self.get(key)? {
            ConfigValue::Bool(b) => Ok(*b),
            other => Err(wrong_type(key, "bool", other)),
        }
    }

    /// # Errors
    ///
    /// If the key is missing or not a string array leaf.
    pub fn get_string_array(&self, key: &str) -> Result<&[String], ConfigError> {
        match self.get(key)? {
            ConfigValue::StringArray(values) => Ok(values),
            other => Err(wrong_type(key, "string array", other)),
        }
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// # Errors
    ///
    /// Propagates `serde_json` failures.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// # Errors
    ///
    /// If `json` is not an object of supported leaves.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    fn get(&self, key: &str) -> Result<&ConfigValue, ConfigError> {
        self.entries
            .get(key)
            .ok_or_else(|| ConfigError::MissingKey(key.to_string()))
    }
}

fn wrong_type(key: &str, expected: &'static str, found: &ConfigValue) -> ConfigError {
    ConfigError::WrongType {
        key: key.to_string(),
        expected,
        found: found.kind(),
    }
}
