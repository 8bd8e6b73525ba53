// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Statically known capabilities and cell kinds.
//!
//! | Cell kind | Value        | Capabilities            | Preferred |
//! |-----------|--------------|-------------------------|-----------|
//! | `Whole`   | [`WholeCell`] | Numeric, Comparable    | Numeric   |
//! | `Real`    | [`RealCell`]  | Numeric, Comparable    | Numeric   |
//! | `Text`    | [`TextCell`]  | Textual                | Textual   |
//! | `Flag`    | [`FlagCell`]  | Logical, Comparable    | Logical   |
//!
//! `Logical` extends `Comparable`. Every kind has a fast-path serializer.

use crate::capability::Capability;
use crate::catalog::Catalog;
use crate::cell::{CellKind, CellSerializer};
use crate::config::RegistrySettings;
use crate::error::SerializeError;
use crate::utility::{
    Icon, LexicalComparator, LogicalComparator, NumericComparator, NumericRendererFamily,
    RendererFamily, StringRendererFamily, UtilityFactory,
};
use crate::value::{DataValue, FlagCell, RealCell, TextCell, WholeCell};
use std::sync::Arc;

pub const COMPARABLE: &str = "Comparable";
pub const NUMERIC: &str = "Numeric";
pub const TEXTUAL: &str = "Textual";
pub const LOGICAL: &str = "Logical";

pub const WHOLE: &str = "Whole";
pub const REAL: &str = "Real";
pub const TEXT: &str = "Text";
pub const FLAG: &str = "Flag";

/// Build the builtin catalog.
pub(crate) fn catalog() -> Catalog {
    let comparable = Capability::new(COMPARABLE, vec![], None);
    let numeric = Capability::new(
        NUMERIC,
        vec![],
        Some(
            UtilityFactory::new()
                .with_comparator(Arc::new(NumericComparator))
                .with_icon(Icon::named("numeric"))
                .with_renderer(|spec| {
                    Some(Arc::new(NumericRendererFamily::for_column(spec)) as Arc<dyn RendererFamily>)
                }),
        ),
    );
    let textual = Capability::new(
        TEXTUAL,
        vec![],
        Some(
            UtilityFactory::new()
                .with_comparator(Arc::new(LexicalComparator))
                .with_icon(Icon::named("text"))
                .with_renderer(|_| Some(Arc::new(StringRendererFamily) as Arc<dyn RendererFamily>)),
        ),
    );
    let logical = Capability::new(
        LOGICAL,
        vec![comparable.clone()],
        Some(
            UtilityFactory::new()
                .with_comparator(Arc::new(LogicalComparator))
                .with_icon(Icon::named("logical")),
        ),
    );

    let whole = CellKind::builder(WHOLE)
        .implements(numeric.clone())
        .implements(comparable.clone())
        .preferred(numeric.clone())
        .serializer(Arc::new(WholeSerializer))
        .build();
    let real = CellKind::builder(REAL)
        .implements(numeric.clone())
        .implements(comparable.clone())
        .preferred(numeric.clone())
        .serializer(Arc::new(RealSerializer))
        .build();
    let text = CellKind::builder(TEXT)
        .implements(textual.clone())
        .preferred(textual.clone())
        .serializer(Arc::new(TextSerializer))
        .build();
    let flag = CellKind::builder(FLAG)
        .implements(logical.clone())
        .preferred(logical.clone())
        .serializer(Arc::new(FlagSerializer))
        .build();

    Catalog::from_handles(
        vec![comparable, numeric, textual, logical],
        vec![whole, real, text, flag],
        RegistrySettings::default(),
    )
}

// ---------------------------------------------------------------------------
// Serializers
// ---------------------------------------------------------------------------

fn unsupported(expected: &str, value: &dyn DataValue) -> SerializeError {
    SerializeError::UnsupportedValue {
        expected: expected.to_string(),
        value: value.to_string(),
    }
}

fn fixed<const N: usize>(input: &[u8]) -> Result<[u8; N], SerializeError> {
    if input.len() > N {
        return Err(SerializeError::TrailingBytes {
            expected: N,
            got: input.len(),
        });
    }
    input.try_into().map_err(|_| SerializeError::Truncated {
        need: N,
        got: input.len(),
    })
}

/// Big-endian `i64`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WholeSerializer;

impl CellSerializer for WholeSerializer {
    fn cell_kind(&self) -> &str {
        WHOLE
    }

    fn serialize(&self, value: &dyn DataValue, out: &mut Vec<u8>) -> Result<(), SerializeError> {
        let cell = value
            .as_any()
            .downcast_ref::<WholeCell>()
            .ok_or_else(|| unsupported(WHOLE, value))?;
        out.extend_from_slice(&cell.0.to_be_bytes());
        Ok(())
    }

    fn deserialize(&self, input: &[u8]) -> Result<Box<dyn DataValue>, SerializeError> {
        Ok(Box::new(WholeCell(i64::from_be_bytes(fixed(input)?))))
    }
}

/// Big-endian IEEE-754 bits.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealSerializer;

impl CellSerializer for RealSerializer {
    fn cell_kind(&self) -> &str {
        REAL
    }

    fn serialize(&self, value: &dyn DataValue, out: &mut Vec<u8>) -> Result<(), SerializeError> {
        let cell = value
            .as_any()
            .downcast_ref::<RealCell>()
            .ok_or_else(|| unsupported(REAL, value))?;
        out.extend_from_slice(&cell.0.to_bits().to_be_bytes());
        Ok(())
    }

    fn deserialize(&self, input: &[u8]) -> Result<Box<dyn DataValue>, SerializeError> {
        let bits = u64::from_be_bytes(fixed(input)?);
        Ok(Box::new(RealCell(f64::from_bits(bits))))
    }
}

/// Raw UTF-8.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextSerializer;

impl CellSerializer for TextSerializer {
    fn cell_kind(&self) -> &str {
        TEXT
    }

    fn serialize(&self, value: &dyn DataValue, out: &mut Vec<u8>) -> Result<(), SerializeError> {
        let cell = value
            .as_any()
            .downcast_ref::<TextCell>()
            .ok_or_else(|| unsupported(TEXT, value))?;
        out.extend_from_slice(cell.0.as_bytes());
        Ok(())
    }

    fn deserialize(&self, input: &[u8]) -> Result<Box<dyn DataValue>, SerializeError> {
        Ok(Box::new(TextCell(String::from_utf8(input.to_vec())?)))
    }
}

/// One byte, `0` or `1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlagSerializer;

impl CellSerializer for FlagSerializer {
    fn cell_kind(&self) -> &str {
        FLAG
    }

    fn serialize(&self, value: &dyn DataValue, out: &mut Vec<u8>) -> Result<(), SerializeError> {
        let cell = value
            .as_any()
            .downcast_ref::<FlagCell>()
            .ok_or_else(|| unsupported(FLAG, value))?;
        out.push(u8::from(cell.0));
        Ok(())
    }

    fn deserialize(&self, input: &[u8]) -> Result<Box<dyn DataValue>, SerializeError> {
        let [byte] = fixed::<1>(input)?;
        Ok(Box::new(FlagCell(byte != 0)))
    }
}
