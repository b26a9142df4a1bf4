// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use crate::chain::{Flow, Handler};
use crate::convert::MappingContext;
use crate::error::Result;
use crate::types::Type;
use crate::value::Value;
use bytes::{Bytes, BytesMut};

/// Converts to byte buffers.
///
/// A [`Bytes`] source is shared (same backing storage) unless reuse is
/// disabled or a deep copy is requested; a [`BytesMut`] source is frozen
/// under the same condition. Strings are encoded with the configured
/// charset and lists of small integers become their bytes.
#[derive(Debug, Default)]
pub struct BytesHandler;

impl Handler<MappingContext, Result<Value>> for BytesHandler {
    fn name(&self) -> &str {
        "bytes"
    }

    fn handle(&self, ctx: &mut MappingContext) -> Flow<Result<Value>> {
        let shared = match ctx.dst {
            Type::ByteBuffer => true,
            Type::Bytes => false,
            _ => return Flow::Continue,
        };
        let share = ctx.env.share_buffers();

        let result = match ctx.take_value() {
            Value::ByteBuffer(buf) if shared => {
                if share {
                    Value::ByteBuffer(buf)
                } else {
                    Value::ByteBuffer(Bytes::copy_from_slice(&buf))
                }
            }
            Value::Bytes(buf) if shared => {
                if share {
                    Value::ByteBuffer(buf.freeze())
                } else {
                    Value::ByteBuffer(Bytes::copy_from_slice(&buf))
                }
            }
            Value::ByteBuffer(buf) => Value::Bytes(BytesMut::from(&buf[..])),
            Value::Bytes(buf) => Value::Bytes(buf),
            other => {
                let raw = match raw_bytes(&other, ctx) {
                    Some(raw) => raw,
                    None => {
                        ctx.value = other;
                        return Flow::Continue;
                    }
                };
                if shared {
                    Value::ByteBuffer(Bytes::from(raw))
                } else {
                    Value::Bytes(BytesMut::from(&raw[..]))
                }
            }
        };
        Flow::Value(Ok(result))
    }
}

fn raw_bytes(value: &Value, ctx: &MappingContext) -> Option<Vec<u8>> {
    match value {
        Value::String(text) => ctx.env.options().charset.encode(text),
        Value::List(items) => items
            .iter()
            .map(|item| match *item {
                Value::U8(b) => Some(b),
                Value::I8(b) => u8::try_from(b).ok(),
                Value::I16(b) => u8::try_from(b).ok(),
                Value::I32(b) => u8::try_from(b).ok(),
                Value::I64(b) => u8::try_from(b).ok(),
                Value::U16(b) => u8::try_from(b).ok(),
                Value::U32(b) => u8::try_from(b).ok(),
                Value::U64(b) => u8::try_from(b).ok(),
                _ => None,
            })
            .collect(),
        _ => None,
    }
}
