// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::number::Number;
use crate::chain::{Flow, Handler};
use crate::convert::MappingContext;
use crate::error::Result;
use crate::types::{PrimitiveKind, Type};
use crate::value::Value;

/// Converts to `String` and `char`.
///
/// Numbers are rendered with the configured number format, byte buffers
/// are decoded with the configured charset and enums become their variant
/// name. Containers and objects use their `Display` form. A `char` target accepts a char, a one-character string or a
/// valid code point, and null maps to `'\0'`.
#[derive(Debug, Default)]
pub struct TextHandler;

impl Handler<MappingContext, Result<Value>> for TextHandler {
    fn name(&self) -> &str {
        "text"
    }

    fn handle(&self, ctx: &mut MappingContext) -> Flow<Result<Value>> {
        if ctx.dst == Type::String {
            to_string(ctx)
        } else if ctx.dst == Type::CHAR {
            to_char(ctx)
        } else {
            Flow::Continue
        }
    }
}

fn to_string(ctx: &mut MappingContext) -> Flow<Result<Value>> {
    if matches!(ctx.value, Value::String(_)) {
        return Flow::Value(Ok(ctx.take_value()));
    }
    let options = ctx.env.options();
    let text = match &ctx.value {
        Value::Null => return Flow::Continue,
        Value::Bool(v) => v.to_string(),
        Value::Char(v) => v.to_string(),
        Value::Enum(_, variant) => variant.to_string(),
        Value::Bytes(bytes) => match options.charset.decode(bytes) {
            Some(text) => text,
            None => return Flow::Continue,
        },
        Value::ByteBuffer(bytes) => match options.charset.decode(bytes) {
            Some(text) => text,
            None => return Flow::Continue,
        },
        other => match Number::of(other) {
            Some(Number::Int(v)) => options.number_format.format_int(v),
            Some(Number::UInt(v)) => options.number_format.format_uint(v),
            Some(Number::Float(v)) => options.number_format.format_float(v),
            None => other.to_string(),
        },
    };
    Flow::Value(Ok(Value::String(text)))
}

fn to_char(ctx: &mut MappingContext) -> Flow<Result<Value>> {
    let ch = match &ctx.value {
        Value::Null => Some('\0'),
        Value::Char(v) => Some(*v),
        Value::String(text) => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => Some(ch),
                _ => None,
            }
        }
        other => match Number::of(other) {
            Some(number @ (Number::Int(_) | Number::UInt(_))) => {
                number.to_kind(PrimitiveKind::Char).and_then(|v| v.as_char())
            }
            _ => None,
        },
    };
    match ch {
        Some(ch) => Flow::Value(Ok(Value::Char(ch))),
        None => Flow::Continue,
    }
}
