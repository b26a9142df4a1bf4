// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use crate::chain::{Flow, Handler};
use crate::convert::{MappingContext, NumberFormat};
use crate::error::Result;
use crate::types::PrimitiveKind;
use crate::value::Value;

/// Converts to numeric primitives.
///
/// Numeric sources are narrowed or widened with range checks (floats
/// truncate toward zero), `bool` maps to 0/1, `char` to its code point and
/// strings are parsed after removing the number format's grouping
/// separator. Null maps to zero. Out-of-range or unparsable sources fall
/// through.
#[derive(Debug, Default)]
pub struct NumberHandler;

impl Handler<MappingContext, Result<Value>> for NumberHandler {
    fn name(&self) -> &str {
        "number"
    }

    fn handle(&self, ctx: &mut MappingContext) -> Flow<Result<Value>> {
        let Some(kind) = ctx.dst.primitive().filter(|kind| kind.is_numeric()) else {
            return Flow::Continue;
        };
        if ctx.value.is_null() {
            return Flow::Value(Ok(Value::zero(kind)));
        }
        let number = match &ctx.value {
            Value::String(text) => Number::parse(text, &ctx.env.options().number_format),
            other => Number::of(other),
        };
        match number.and_then(|n| n.to_kind(kind)) {
            Some(value) => Flow::Value(Ok(value)),
            None => Flow::Continue,
        }
    }
}

/// Widest representation of a numeric value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Number {
    Int(i128),
    UInt(u128),
    Float(f64),
}

impl Number {
    /// Numeric view of a scalar value.
    pub(crate) fn of(value: &Value) -> Option<Self> {
        Some(match *value {
            Value::Bool(v) => Self::UInt(u128::from(v)),
            Value::Char(v) => Self::UInt(u128::from(u32::from(v))),
            Value::I8(v) => Self::Int(v.into()),
            Value::I16(v) => Self::Int(v.into()),
            Value::I32(v) => Self::Int(v.into()),
            Value::I64(v) => Self::Int(v.into()),
            Value::I128(v) => Self::Int(v),
            Value::U8(v) => Self::UInt(v.into()),
            Value::U16(v) => Self::UInt(v.into()),
            Value::U32(v) => Self::UInt(v.into()),
            Value::U64(v) => Self::UInt(v.into()),
            Value::U128(v) => Self::UInt(v),
            Value::F32(v) => Self::Float(v.into()),
            Value::F64(v) => Self::Float(v),
            _ => return None,
        })
    }

    /// Parse text, integers first.
    pub(crate) fn parse(text: &str, format: &NumberFormat) -> Option<Self> {
        let text = format.normalize(text);
        if let Ok(v) = text.parse::<i128>() {
            return Some(Self::Int(v));
        }
        if let Ok(v) = text.parse::<u128>() {
            return Some(Self::UInt(v));
        }
        text.parse::<f64>().ok().map(Self::Float)
    }

    /// True if the number equals one.
    pub(crate) fn is_one(self) -> bool {
        match self {
            Self::Int(v) => v == 1,
            Self::UInt(v) => v == 1,
            Self::Float(v) => v == 1.0,
        }
    }

    /// Convert to `kind`, or `None` if the value does not fit.
    pub(crate) fn to_kind(self, kind: PrimitiveKind) -> Option<Value> {
        match kind {
            PrimitiveKind::F32 => self.to_f64().map(|v| Value::F32(v as f32)),
            PrimitiveKind::F64 => self.to_f64().map(Value::F64),
            PrimitiveKind::Bool => Some(Value::Bool(self.is_one())),
            PrimitiveKind::Char => self
                .to_int::<u32>()
                .and_then(char::from_u32)
                .map(Value::Char),
            PrimitiveKind::I8 => self.to_int().map(Value::I8),
            PrimitiveKind::I16 => self.to_int().map(Value::I16),
            PrimitiveKind::I32 => self.to_int().map(Value::I32),
            PrimitiveKind::I64 => self.to_int().map(Value::I64),
            PrimitiveKind::I128 => self.to_int().map(Value::I128),
            PrimitiveKind::U8 => self.to_int().map(Value::U8),
            PrimitiveKind::U16 => self.to_int().map(Value::U16),
            PrimitiveKind::U32 => self.to_int().map(Value::U32),
            PrimitiveKind::U64 => self.to_int().map(Value::U64),
            PrimitiveKind::U128 => self.to_int().map(Value::U128),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn to_f64(self) -> Option<f64> {
        Some(match self {
            Self::Int(v) => v as f64,
            Self::UInt(v) => v as f64,
            Self::Float(v) => v,
        })
    }

    fn to_int<T>(self) -> Option<T>
    where
        T: TryFrom<i128> + TryFrom<u128>,
    {
        match self {
            Self::Int(v) => T::try_from(v).ok(),
            Self::UInt(v) => T::try_from(v).ok(),
            Self::Float(v) => {
                if !v.is_finite() {
                    return None;
                }
                let truncated = v.trunc();
                // i128 covers every integer kind except the top half of u128.
                if truncated >= 0.0 && truncated >= i128::MAX as f64 {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let wide = truncated as u128;
                    if (wide as f64) != truncated {
                        return None;
                    }
                    return T::try_from(wide).ok();
                }
                if truncated < i128::MIN as f64 {
                    return None;
                }
                #[allow(clippy::cast_possible_truncation)]
                let wide = truncated as i128;
                T::try_from(wide).ok()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_narrowing() {
        assert_eq!(Number::Int(127).to_kind(PrimitiveKind::I8), Some(Value::I8(127)));
        assert_eq!(Number::Int(128).to_kind(PrimitiveKind::I8), None);
        assert_eq!(Number::Int(-1).to_kind(PrimitiveKind::U32), None);
        assert_eq!(
            Number::UInt(u128::MAX).to_kind(PrimitiveKind::U128),
            Some(Value::U128(u128::MAX))
        );
        assert_eq!(Number::UInt(u128::MAX).to_kind(PrimitiveKind::I128), None);
    }

    #[test]
    fn test_float_truncation() {
        assert_eq!(Number::Float(3.9).to_kind(PrimitiveKind::I32), Some(Value::I32(3)));
        assert_eq!(Number::Float(-3.9).to_kind(PrimitiveKind::I64), Some(Value::I64(-3)));
        assert_eq!(Number::Float(f64::NAN).to_kind(PrimitiveKind::I32), None);
        assert_eq!(Number::Float(1e20).to_kind(PrimitiveKind::I32), None);
        assert_eq!(Number::Float(1e20).to_kind(PrimitiveKind::U128), Some(Value::U128(100_000_000_000_000_000_000)));
        assert_eq!(Number::Int(3).to_kind(PrimitiveKind::F64), Some(Value::F64(3.0)));
    }

    #[test]
    fn test_parse_with_format() {
        let grouped = NumberFormat::default().with_grouping(',');
        assert_eq!(Number::parse("1,024", &grouped), Some(Number::Int(1024)));
        assert_eq!(Number::parse(" 2.5 ", &NumberFormat::PLAIN), Some(Number::Float(2.5)));
        assert_eq!(Number::parse("1,024", &NumberFormat::PLAIN), None);
        assert_eq!(Number::parse("abc", &NumberFormat::PLAIN), None);
    }

    #[test]
    fn test_scalar_sources() {
        assert_eq!(Number::of(&Value::Bool(true)), Some(Number::UInt(1)));
        assert_eq!(Number::of(&Value::Char('A')), Some(Number::UInt(65)));
        assert_eq!(Number::of(&Value::from("1")), None);
        assert!(Number::Float(1.0).is_one());
    }
}
