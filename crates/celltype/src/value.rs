// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Cell values.
//!
//! A [`DataValue`] is the content of one table cell. The typed accessors
//! stand in for the capability views a cell can be read as; a value returns
//! `None` for every view its cell kind does not offer.

use std::any::Any;
use std::fmt;

/// Content of a single table cell.
pub trait DataValue: fmt::Display + fmt::Debug + Send + Sync {
    /// Name of the cell kind this value belongs to.
    fn cell_kind(&self) -> &str;

    /// Numeric view.
    fn as_f64(&self) -> Option<f64> {
        None
    }

    /// Textual view.
    fn as_text(&self) -> Option<&str> {
        None
    }

    /// Logical view.
    fn as_bool(&self) -> Option<bool> {
        None
    }

    /// True only for [`MissingValue`].
    fn is_missing(&self) -> bool {
        false
    }

    /// Downcast support for serializers.
    fn as_any(&self) -> &dyn Any;
}

/// Reserved cell kind name of the missing value.
pub const MISSING_CELL_NAME: &str = "MissingCell";

/// The absent value. There is exactly one, [`MISSING`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MissingValue {
    _private: (),
}

/// Process-wide missing value.
pub const MISSING: MissingValue = MissingValue { _private: () };

impl fmt::Display for MissingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("?")
    }
}

impl DataValue for MissingValue {
    fn cell_kind(&self) -> &str {
        MISSING_CELL_NAME
    }

    fn is_missing(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// 64-bit integer cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WholeCell(pub i64);

impl fmt::Display for WholeCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl DataValue for WholeCell {
    fn cell_kind(&self) -> &str {
        "Whole"
    }

    #[allow(clippy::cast_precision_loss)]
    fn as_f64(&self) -> Option<f64> {
        Some(self.0 as f64)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Double precision cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RealCell(pub f64);

impl fmt::Display for RealCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl DataValue for RealCell {
    fn cell_kind(&self) -> &str {
        "Real"
    }

    fn as_f64(&self) -> Option<f64> {
        Some(self.0)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// String cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextCell(pub String);

impl TextCell {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }
}

impl fmt::Display for TextCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl DataValue for TextCell {
    fn cell_kind(&self) -> &str {
        "Text"
    }

    fn as_text(&self) -> Option<&str> {
        Some(&self.0)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Boolean cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlagCell(pub bool);

impl fmt::Display for FlagCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl DataValue for FlagCell {
    fn cell_kind(&self) -> &str {
        "Flag"
    }

    fn as_bool(&self) -> Option<bool> {
        Some(self.0)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
