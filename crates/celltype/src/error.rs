// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types.
//!
//! Runtime operations on descriptors surface exactly two kinds of failure
//! ([`TypeError`]). Problems that can be repaired with a sane default are
//! logged with the `[coding]` prefix instead and never reach the caller.

use thiserror::Error;

/// Failures surfaced by descriptor operations and the descriptor codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// The caller passed data that violates an operation's contract.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A persisted cell kind or capability name could not be resolved.
    #[error("unresolvable reference: {0}")]
    UnresolvableReference(String),
}

impl From<ConfigError> for TypeError {
    fn from(err: ConfigError) -> Self {
        TypeError::InvalidArgument(err.to_string())
    }
}

/// Registration-table failures, raised once at start-up.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("capability '{0}' is registered twice")]
    DuplicateCapability(String),

    #[error("cell kind '{0}' is registered twice")]
    DuplicateCell(String),

    #[error("'{owner}' references unknown capability '{name}'")]
    UnknownCapability { owner: String, name: String },

    #[error("'{owner}' extends unknown cell kind '{name}'")]
    UnknownCell { owner: String, name: String },

    #[error("capability hierarchy contains a cycle through '{0}'")]
    CapabilityCycle(String),

    #[error("cell hierarchy contains a cycle through '{0}'")]
    CellCycle(String),

    #[error("'{0}' is reserved for the missing value")]
    ReservedName(String),

    #[error("cell kind '{cell}' prefers '{capability}' but does not implement it")]
    PreferredNotImplemented { cell: String, capability: String },

    #[error("a global registry is already installed")]
    AlreadyInstalled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid catalog: {0}")]
    Invalid(String),
}

/// Configuration tree access failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing key '{0}'")]
    MissingKey(String),

    #[error("key '{key}' holds {found}, expected {expected}")]
    WrongType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Cell serializer failures.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("serializer for '{expected}' cannot handle value '{value}'")]
    UnsupportedValue { expected: String, value: String },

    #[error("truncated input: need {need} bytes, got {got}")]
    Truncated { need: usize, got: usize },

    #[error("trailing bytes: expected exactly {expected} bytes, got {got}")]
    TrailingBytes { expected: usize, got: usize },

    #[error("invalid UTF-8 payload: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
